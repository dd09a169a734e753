//! Sync coordinator: reconciles a user's expense records between the local
//! store and the remote server, deriving reminder schedules from downloads.
//!
//! Each operation is independent and stateless; the service holds no data
//! between calls beyond the records it is actively moving. Network calls
//! are the suspension points, storage stays synchronous.

use anyhow::{Context, Result};
use chrono::Local;
use log::{error, info};
use std::sync::Arc;

use crate::domain::commands::sync::{BackupResult, DownloadResult, UploadResult};
use crate::domain::models::Expense;
use crate::domain::reminders;
use crate::remote::RemoteClient;
use crate::scheduler::ReminderScheduler;
use crate::storage::csv::{ExpenseRepository, UserRepository};
use crate::storage::traits::{ExpenseStorage, UserStorage};

pub struct SyncService {
    expense_repository: ExpenseRepository,
    user_repository: UserRepository,
    client: Arc<dyn RemoteClient>,
    scheduler: Arc<dyn ReminderScheduler>,
}

impl SyncService {
    pub fn new(
        expense_repository: ExpenseRepository,
        user_repository: UserRepository,
        client: Arc<dyn RemoteClient>,
        scheduler: Arc<dyn ReminderScheduler>,
    ) -> Self {
        Self {
            expense_repository,
            user_repository,
            client,
            scheduler,
        }
    }

    /// Download a user's remote records into the local store and schedule
    /// reminders for the ones dated today or later.
    ///
    /// A network failure propagates before anything is written. The batch
    /// insert is an upsert per record and not transactional, so a storage
    /// failure mid-batch can leave earlier records applied. Reminder
    /// scheduling is best effort: one failed schedule is logged and the
    /// rest still run.
    pub async fn download_user_data(&self, email: &str) -> Result<DownloadResult> {
        info!("Downloading expense data for {}", email);
        let remote_expenses = self
            .client
            .download_user_data(email)
            .await
            .with_context(|| format!("downloading expense data for {}", email))?;

        let expenses = remote_expenses
            .iter()
            .map(Expense::from_remote)
            .collect::<Result<Vec<_>>>()
            .context("translating downloaded records")?;

        self.expense_repository
            .insert_many(&expenses)
            .context("storing downloaded records")?;

        let today = Local::now().date_naive();
        let now = Local::now().naive_local();
        let mut reminders_scheduled = 0;
        for expense in &expenses {
            let Some(reminder) = reminders::for_downloaded_expense(expense, today, now) else {
                continue;
            };
            match self.scheduler.schedule(reminder) {
                Ok(()) => reminders_scheduled += 1,
                Err(e) => {
                    error!(
                        "Failed to schedule reminder for expense {}: {}",
                        expense.id, e
                    );
                }
            }
        }

        info!(
            "Downloaded {} records for {}, scheduled {} reminders",
            expenses.len(),
            email,
            reminders_scheduled
        );
        Ok(DownloadResult {
            inserted: expenses.len(),
            reminders_scheduled,
        })
    }

    /// Upload all of a user's local records to the server.
    ///
    /// Records go up one request at a time; the first failure aborts the
    /// remainder and propagates. Nothing is retried and nothing is rolled
    /// back on the server side.
    pub async fn upload_user_data(&self, email: &str) -> Result<UploadResult> {
        let expenses = self.expense_repository.all_for_user(email)?;
        let payloads: Vec<_> = expenses.iter().map(Expense::to_remote).collect();

        info!("Uploading {} records for {}", payloads.len(), email);
        let uploaded = self
            .client
            .upload_expenses(email, &payloads)
            .await
            .with_context(|| format!("uploading expense data for {}", email))?;

        Ok(UploadResult { uploaded })
    }

    /// Upload every logged-in user's records. A failing user is logged and
    /// skipped so one dead account cannot block the rest of the backup.
    pub async fn backup_logged_in_users(&self) -> Result<BackupResult> {
        let users = self.user_repository.list_logged_in()?;
        info!("Backing up {} logged-in users", users.len());

        let mut result = BackupResult {
            users_backed_up: 0,
            records_uploaded: 0,
            users_failed: 0,
        };
        for user in users {
            match self.upload_user_data(&user.email).await {
                Ok(upload) => {
                    result.users_backed_up += 1;
                    result.records_uploaded += upload.uploaded;
                }
                Err(e) => {
                    error!("Backup failed for {}: {:#}", user.email, e);
                    result.users_failed += 1;
                }
            }
        }
        Ok(result)
    }

    /// Wipe a user's records on the server. The local store is left
    /// untouched: local data deliberately survives a remote wipe, so a
    /// re-upload can restore the server copy.
    pub async fn delete_user_data(&self, email: &str) -> Result<()> {
        info!("Deleting remote expense data for {}", email);
        self.client
            .delete_user_data(email)
            .await
            .with_context(|| format!("deleting remote expense data for {}", email))?;
        Ok(())
    }
}
