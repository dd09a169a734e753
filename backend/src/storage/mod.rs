//! Storage layer: abstraction traits plus the CSV backend.

pub mod csv;
pub mod traits;

pub use csv::{CsvConnection, ExpenseRepository, UserRepository};
pub use traits::{ExpenseStorage, UserStorage};
