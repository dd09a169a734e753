//! Reminder derivation rules.
//!
//! How an expense's date turns into a scheduled notification:
//!
//! - downloaded record dated after today  -> 11:00 local on that date
//! - downloaded record dated today       -> 15 seconds from now (catch-up)
//! - downloaded record dated before today -> nothing
//! - locally added record dated after today -> 10:00 local on that date
//!
//! The 10:00/11:00 split between the creation and download paths is
//! inherited behavior. Reminders are keyed by expense id, so the split can
//! no longer break cancellation.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::models::{Expense, Reminder};

/// Hour of day for reminders derived from a download.
pub const DOWNLOAD_REMINDER_HOUR: u32 = 11;

/// Hour of day for reminders created with a new local expense.
pub const NEW_EXPENSE_REMINDER_HOUR: u32 = 10;

/// Catch-up delay for records dated today.
pub const SAME_DAY_CATCH_UP_SECONDS: i64 = 15;

/// Derive the reminder for a freshly downloaded record, if any.
pub fn for_downloaded_expense(
    expense: &Expense,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Option<Reminder> {
    if expense.date > today {
        Some(build(expense, at_hour(expense.date, DOWNLOAD_REMINDER_HOUR)))
    } else if expense.date == today {
        Some(build(
            expense,
            now + Duration::seconds(SAME_DAY_CATCH_UP_SECONDS),
        ))
    } else {
        None
    }
}

/// Derive the reminder for a locally created expense, if any. Only future
/// dates get one; a record for today is assumed already noticed.
pub fn for_new_expense(expense: &Expense, today: NaiveDate) -> Option<Reminder> {
    if expense.date > today {
        Some(build(
            expense,
            at_hour(expense.date, NEW_EXPENSE_REMINDER_HOUR),
        ))
    } else {
        None
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
}

fn build(expense: &Expense, scheduled_time: NaiveDateTime) -> Reminder {
    Reminder {
        expense_id: expense.id.clone(),
        scheduled_time,
        // Each reminder is labeled with its own record's owner.
        title: format!("{}: {} is coming up", expense.user_id, expense.name),
        body: format!(
            "{} ({}) - {:.2}",
            expense.name,
            expense.category.display_name(),
            expense.amount
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Category;

    fn expense(id: &str, user: &str, date: NaiveDate) -> Expense {
        Expense {
            id: id.to_string(),
            name: "Cinema".to_string(),
            amount: 8.5,
            date,
            category: Category::Activity,
            latitude: 0.0,
            longitude: 0.0,
            user_id: user.to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(9, 30, 0).unwrap()
    }

    #[test]
    fn future_download_fires_at_eleven() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let reminder =
            for_downloaded_expense(&expense("a", "u1", date), today(), now()).unwrap();
        assert_eq!(reminder.scheduled_time, date.and_hms_opt(11, 0, 0).unwrap());
        assert_eq!(reminder.expense_id, "a");
    }

    #[test]
    fn same_day_download_fires_fifteen_seconds_out() {
        let reminder =
            for_downloaded_expense(&expense("a", "u1", today()), today(), now()).unwrap();
        let delay = reminder.scheduled_time - now();
        assert_eq!(delay, Duration::seconds(15));
    }

    #[test]
    fn past_download_gets_no_reminder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(for_downloaded_expense(&expense("a", "u1", date), today(), now()).is_none());
    }

    #[test]
    fn new_expense_fires_at_ten_only_for_future_dates() {
        let future = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let reminder = for_new_expense(&expense("a", "u1", future), today()).unwrap();
        assert_eq!(
            reminder.scheduled_time,
            future.and_hms_opt(10, 0, 0).unwrap()
        );

        assert!(for_new_expense(&expense("b", "u1", today()), today()).is_none());
    }

    #[test]
    fn reminder_text_names_the_records_own_user() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let reminder =
            for_downloaded_expense(&expense("a", "jon@example.com", date), today(), now())
                .unwrap();
        assert!(reminder.title.starts_with("jon@example.com:"));
        assert!(reminder.body.contains("Activity"));
        assert!(reminder.body.contains("8.50"));
    }
}
