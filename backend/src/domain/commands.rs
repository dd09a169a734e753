//! Domain-level command and result types.
//!
//! These structs are the inputs and outputs of the services in this crate.
//! Callers (a UI shell, a CLI, tests) build commands and read results; the
//! wire DTOs in the `shared` crate never leak past the service boundary.

pub mod expenses {
    use chrono::NaiveDate;

    use crate::domain::models::Category;

    /// Input for recording a new expense. The record id is assigned by the
    /// service.
    #[derive(Debug, Clone)]
    pub struct AddExpenseCommand {
        pub name: String,
        pub amount: f64,
        pub date: NaiveDate,
        pub category: Category,
        /// 0.0/0.0 means no location.
        pub latitude: f64,
        pub longitude: f64,
        pub user_id: String,
    }

    /// Input for replacing an existing expense's fields. The id and owner
    /// stay fixed.
    #[derive(Debug, Clone)]
    pub struct UpdateExpenseCommand {
        pub id: String,
        pub name: String,
        pub amount: f64,
        pub date: NaiveDate,
        pub category: Category,
        pub latitude: f64,
        pub longitude: f64,
        pub user_id: String,
    }

    /// Aggregate spend for one calendar day.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DailyTotal {
        pub date: NaiveDate,
        pub amount: f64,
    }

    /// Aggregate spend for one category.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CategoryTotal {
        pub category: Category,
        pub amount: f64,
    }
}

pub mod sync {
    /// Result of downloading a user's remote records.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DownloadResult {
        /// Records upserted into the local store.
        pub inserted: usize,
        /// Reminders successfully handed to the scheduler.
        pub reminders_scheduled: usize,
    }

    /// Result of uploading a user's local records.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UploadResult {
        pub uploaded: usize,
    }

    /// Result of the backup-all pass over logged-in users.
    #[derive(Debug, Clone, PartialEq)]
    pub struct BackupResult {
        /// Users whose upload completed.
        pub users_backed_up: usize,
        /// Total records uploaded across those users.
        pub records_uploaded: usize,
        /// Users whose upload failed (the pass continues past them).
        pub users_failed: usize,
    }
}

pub mod auth {
    use crate::domain::models::User;

    /// Input for registering a new account.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub name: String,
        pub email: String,
        pub password: String,
        pub password_repeat: String,
    }

    /// Per-check outcome of a registration attempt, displayed inline by
    /// callers. Registration succeeded only when every flag is true.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RegisterResult {
        /// Name is non-blank.
        pub name: bool,
        /// Email matches the address pattern.
        pub email: bool,
        /// Passwords are non-empty and equal.
        pub password: bool,
        /// The remote account creation went through.
        pub server: bool,
        /// No account with this email existed yet.
        pub not_exist: bool,
    }

    impl RegisterResult {
        pub fn succeeded(&self) -> bool {
            self.name && self.email && self.password && self.server && self.not_exist
        }
    }

    /// Input for a login attempt.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }

    /// Outcome of a login attempt; `user` is set only on success.
    #[derive(Debug, Clone, PartialEq)]
    pub struct LoginResult {
        pub user: Option<User>,
    }
}
