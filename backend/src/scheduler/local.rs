//! In-process reminder scheduler backed by tokio timers.

use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ReminderScheduler;
use crate::domain::models::Reminder;

/// Schedules reminders as sleeping tokio tasks and delivers due ones on a
/// channel. The caller decides what a delivered [`Reminder`] turns into
/// (a desktop notification, a log line, a test assertion).
///
/// Pending tasks are keyed by expense id; dropping the scheduler aborts
/// all of them, so reminders do not outlive the process — the same
/// best-effort contract the trait documents.
pub struct LocalScheduler {
    sink: mpsc::UnboundedSender<Reminder>,
    pending: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl LocalScheduler {
    /// Create a scheduler and the receiving end of its delivery channel.
    /// Must be called within a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reminder>) {
        let (sink, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sink,
                pending: Arc::new(Mutex::new(HashMap::new())),
            },
            receiver,
        )
    }

    /// Number of reminders waiting to fire.
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock().unwrap();
        pending.retain(|_, handle| !handle.is_finished());
        pending.len()
    }
}

impl ReminderScheduler for LocalScheduler {
    fn schedule(&self, reminder: Reminder) -> Result<()> {
        let delay = (reminder.scheduled_time - Local::now().naive_local())
            .to_std()
            .unwrap_or(Duration::ZERO);

        info!(
            "Scheduling reminder for expense {} in {:?}",
            reminder.expense_id, delay
        );

        let sink = self.sink.clone();
        let pending = Arc::clone(&self.pending);
        let expense_id = reminder.expense_id.clone();
        let task_id = expense_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.lock().unwrap().remove(&task_id);
            if sink.send(reminder).is_err() {
                warn!("Reminder sink closed, dropping reminder for {}", task_id);
            }
        });

        // Re-scheduling the same expense replaces the pending trigger.
        if let Some(previous) = self.pending.lock().unwrap().insert(expense_id, handle) {
            previous.abort();
        }
        Ok(())
    }

    fn cancel(&self, expense_id: &str) -> Result<()> {
        if let Some(handle) = self.pending.lock().unwrap().remove(expense_id) {
            info!("Cancelled reminder for expense {}", expense_id);
            handle.abort();
        }
        Ok(())
    }
}
