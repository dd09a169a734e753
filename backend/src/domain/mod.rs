//! Domain layer: models, command/result types, and the services that own
//! the storage, remote, and scheduler seams.

pub mod commands;
pub mod expense_service;
pub mod models;
pub mod reminders;
pub mod sync_service;
pub mod user_service;

#[cfg(test)]
pub mod test_support;

pub use expense_service::ExpenseService;
pub use sync_service::SyncService;
pub use user_service::UserService;
