//! Domain models for the expense sync core.

pub mod expense;
pub mod reminder;
pub mod user;

pub use expense::{Category, Expense};
pub use reminder::Reminder;
pub use user::User;
