//! In-memory fakes for the remote client and reminder scheduler, shared by
//! the service tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::models::Reminder;
use crate::remote::{RemoteClient, RemoteError};
use crate::scheduler::ReminderScheduler;
use shared::{RemoteExpense, RemoteUser};

/// In-memory stand-in for the expense server, with failure injection.
#[derive(Default)]
pub struct FakeRemote {
    expenses: Mutex<Vec<RemoteExpense>>,
    users: Mutex<Vec<RemoteUser>>,
    profile_images: Mutex<HashMap<String, Vec<u8>>>,
    fail_downloads: AtomicBool,
    fail_user_creation: AtomicBool,
    /// 1-based upload attempt that should fail, if any.
    fail_upload_at: Mutex<Option<usize>>,
    upload_attempts: AtomicUsize,
}

impl FakeRemote {
    pub fn seed_expenses(&self, expenses: Vec<RemoteExpense>) {
        self.expenses.lock().unwrap().extend(expenses);
    }

    pub fn fail_downloads(&self) {
        self.fail_downloads.store(true, Ordering::SeqCst);
    }

    pub fn fail_user_creation(&self) {
        self.fail_user_creation.store(true, Ordering::SeqCst);
    }

    pub fn fail_upload_at(&self, attempt: usize) {
        *self.fail_upload_at.lock().unwrap() = Some(attempt);
    }

    pub fn expense_count(&self, email: &str) -> usize {
        self.expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == email)
            .count()
    }

    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn server_error() -> RemoteError {
        RemoteError::Status {
            code: 500,
            detail: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl RemoteClient for FakeRemote {
    async fn create_user(&self, user: &RemoteUser) -> Result<(), RemoteError> {
        if self.fail_user_creation.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RemoteError::UserExists);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, email: &str) -> Result<RemoteUser, RemoteError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RemoteError::Status {
                code: 404,
                detail: "user not found".to_string(),
            })
    }

    async fn download_user_data(&self, email: &str) -> Result<Vec<RemoteExpense>, RemoteError> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == email)
            .cloned()
            .collect())
    }

    async fn delete_user_data(&self, email: &str) -> Result<(), RemoteError> {
        self.expenses.lock().unwrap().retain(|e| e.user_id != email);
        Ok(())
    }

    async fn upload_expense(
        &self,
        _email: &str,
        expense: &RemoteExpense,
    ) -> Result<RemoteExpense, RemoteError> {
        let attempt = self.upload_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_upload_at.lock().unwrap() == Some(attempt) {
            return Err(Self::server_error());
        }
        self.expenses.lock().unwrap().push(expense.clone());
        Ok(expense.clone())
    }

    async fn get_profile_image(&self, email: &str) -> Result<Vec<u8>, RemoteError> {
        self.profile_images
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or(RemoteError::Status {
                code: 404,
                detail: "no profile image".to_string(),
            })
    }

    async fn put_profile_image(&self, email: &str, png: Vec<u8>) -> Result<(), RemoteError> {
        self.profile_images
            .lock()
            .unwrap()
            .insert(email.to_string(), png);
        Ok(())
    }
}

/// Scheduler that records calls instead of arming timers.
#[derive(Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<Reminder>>,
    cancelled: Mutex<Vec<String>>,
    fail_for: Mutex<Vec<String>>,
}

impl RecordingScheduler {
    pub fn scheduled(&self) -> Vec<Reminder> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    /// Make `schedule` fail for this expense id.
    pub fn fail_for(&self, expense_id: &str) {
        self.fail_for.lock().unwrap().push(expense_id.to_string());
    }
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&self, reminder: Reminder) -> Result<()> {
        if self
            .fail_for
            .lock()
            .unwrap()
            .contains(&reminder.expense_id)
        {
            return Err(anyhow!("injected scheduling failure"));
        }
        self.scheduled.lock().unwrap().push(reminder);
        Ok(())
    }

    fn cancel(&self, expense_id: &str) -> Result<()> {
        self.cancelled.lock().unwrap().push(expense_id.to_string());
        Ok(())
    }
}
