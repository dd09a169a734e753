//! Reminder scheduling.
//!
//! The trait is the contract the domain layer consumes; the platform
//! notification plumbing stays behind it. [`local::LocalScheduler`] is the
//! in-process implementation used when no OS alarm facility is available.

pub mod local;

use anyhow::Result;

use crate::domain::models::Reminder;

/// Registers one-shot reminder triggers. Best effort on both sides: firing
/// may be deferred by the platform and is not guaranteed at-least-once.
pub trait ReminderScheduler: Send + Sync {
    /// Register a trigger at `reminder.scheduled_time`. Scheduling again
    /// for the same expense replaces the pending trigger.
    fn schedule(&self, reminder: Reminder) -> Result<()>;

    /// Remove the pending trigger for an expense; no-op when none exists.
    fn cancel(&self, expense_id: &str) -> Result<()>;
}

pub use local::LocalScheduler;
