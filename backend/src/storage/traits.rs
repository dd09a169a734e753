//! Storage abstraction traits.
//!
//! The domain layer talks to these traits only, so the CSV backend can be
//! swapped without touching the services. All operations are synchronous;
//! the suspension points of the sync flow are the network calls.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::{Category, Expense, User};

/// Durable keyed storage of expense records, partitioned per user.
///
/// Inserts are upserts keyed by record id: writing an id that already
/// exists replaces the stored record in place. The batch form applies each
/// record independently and is not transactional; a failure mid-batch
/// leaves the earlier records applied.
pub trait ExpenseStorage: Send + Sync {
    /// Upsert a single record.
    fn insert(&self, expense: &Expense) -> Result<()>;

    /// Upsert a batch of records, not atomically.
    fn insert_many(&self, expenses: &[Expense]) -> Result<()>;

    /// Replace the fields of an existing record. Returns the number of
    /// records affected (0 when the id is unknown).
    fn update(&self, expense: &Expense) -> Result<usize>;

    /// Delete a record. Returns the number of records affected.
    fn delete(&self, expense: &Expense) -> Result<usize>;

    /// All records for a user, in insertion order.
    fn all_for_user(&self, user_id: &str) -> Result<Vec<Expense>>;

    /// Records for a user attributed to one calendar date.
    fn for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Expense>>;

    /// Sum of amounts over all of a user's records.
    fn total_for_user(&self, user_id: &str) -> Result<f64>;

    /// Sum of amounts over a user's records on one date.
    fn total_for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<f64>;

    fn count_for_user(&self, user_id: &str) -> Result<usize>;

    fn count_for_user_and_date(&self, user_id: &str, date: NaiveDate) -> Result<usize>;

    fn count_for_user_and_category(&self, user_id: &str, category: Category) -> Result<usize>;
}

/// Storage of device-local user accounts.
pub trait UserStorage: Send + Sync {
    /// Store a new account. Fails if the email is already taken.
    fn store_user(&self, user: &User) -> Result<()>;

    fn get_user(&self, email: &str) -> Result<Option<User>>;

    /// Replace an existing account's fields, matched by email.
    fn update_user(&self, user: &User) -> Result<usize>;

    fn list_users(&self) -> Result<Vec<User>>;

    /// Accounts currently flagged as logged in.
    fn list_logged_in(&self) -> Result<Vec<User>>;

    /// Set or clear the logged-in flag. Returns false when the email is
    /// unknown.
    fn set_logged_in(&self, email: &str, logged_in: bool) -> Result<bool>;
}
