//! Backend for a personal expense tracker.
//!
//! Expenses live in per-user CSV files under a data directory and are
//! mirrored to a remote expense server. The [`Backend`] struct wires the
//! three services together over shared storage, one remote client, and one
//! reminder scheduler:
//!
//! - [`domain::ExpenseService`] — local create/update/delete and the
//!   aggregate queries.
//! - [`domain::UserService`] — registration, login, and session state.
//! - [`domain::SyncService`] — download/upload against the remote server
//!   and the backup pass over logged-in users.

pub mod domain;
pub mod remote;
pub mod scheduler;
pub mod storage;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{ExpenseService, SyncService, UserService};
use crate::remote::http_client::{HttpService, RemoteConfig};
use crate::remote::RemoteClient;
use crate::scheduler::ReminderScheduler;
use crate::storage::csv::{CsvConnection, ExpenseRepository, UserRepository};

/// The wired-up application core.
pub struct Backend {
    pub expense_service: ExpenseService,
    pub user_service: UserService,
    pub sync_service: SyncService,
}

impl Backend {
    /// Wire the services over CSV storage rooted at `data_directory` and
    /// the HTTP remote described by `config`.
    pub fn new<P: AsRef<Path>>(
        data_directory: P,
        config: RemoteConfig,
        scheduler: Arc<dyn ReminderScheduler>,
    ) -> Result<Self> {
        let client: Arc<dyn RemoteClient> =
            Arc::new(HttpService::new(config).context("building remote client")?);
        Self::with_client(data_directory, client, scheduler)
    }

    /// Wire the services with an arbitrary remote client.
    pub fn with_client<P: AsRef<Path>>(
        data_directory: P,
        client: Arc<dyn RemoteClient>,
        scheduler: Arc<dyn ReminderScheduler>,
    ) -> Result<Self> {
        let connection = CsvConnection::new(&data_directory)?;
        info!(
            "Backend data directory: {}",
            data_directory.as_ref().display()
        );

        let expenses = ExpenseRepository::new(connection.clone());
        let users = UserRepository::new(connection);

        Ok(Self {
            expense_service: ExpenseService::new(expenses.clone(), scheduler.clone()),
            user_service: UserService::new(users.clone(), client.clone()),
            sync_service: SyncService::new(expenses, users, client, scheduler),
        })
    }
}
