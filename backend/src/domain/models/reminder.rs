//! Domain model for a scheduled reminder notification.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A one-shot notification tied to an expense's date.
///
/// `expense_id` is the cancellation key: it survives rescheduling and does
/// not depend on the reminder's time or text, so deleting an expense can
/// always find its pending reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub expense_id: String,
    pub scheduled_time: NaiveDateTime,
    pub title: String,
    pub body: String,
}
