//! Remote expense server interface.
//!
//! The [`RemoteClient`] trait is the contract the sync layer consumes; the
//! reqwest implementation lives in [`http_client`]. Tests substitute an
//! in-memory fake.

pub mod http_client;

use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;

use shared::{RemoteExpense, RemoteUser};

/// Failures of the remote API.
///
/// 401 and 409 get their own variants so callers can treat them as
/// non-fatal outcomes (a bad session, a duplicate account) instead of
/// pattern-matching on status codes.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("authentication rejected by server")]
    Authentication,
    #[error("user already exists on server")]
    UserExists,
    #[error("server returned status {code}: {detail}")]
    Status { code: u16, detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// CRUD access to user accounts and expense records on the remote server.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// `POST /users/` — create an account.
    async fn create_user(&self, user: &RemoteUser) -> Result<(), RemoteError>;

    /// `GET /users/{email}` — fetch an account.
    async fn get_user(&self, email: &str) -> Result<RemoteUser, RemoteError>;

    /// `GET /gastos/{email}/` — all expense records for a user.
    async fn download_user_data(&self, email: &str) -> Result<Vec<RemoteExpense>, RemoteError>;

    /// `DELETE /gastos/{email}/` — wipe a user's remote records.
    async fn delete_user_data(&self, email: &str) -> Result<(), RemoteError>;

    /// `POST /gastos/{email}/` — store one expense record.
    async fn upload_expense(
        &self,
        email: &str,
        expense: &RemoteExpense,
    ) -> Result<RemoteExpense, RemoteError>;

    /// Upload a batch of records. The default runs one call per record in
    /// order and stops at the first failure, reporting how many made it;
    /// a transport with a batch endpoint may override this.
    async fn upload_expenses(
        &self,
        email: &str,
        expenses: &[RemoteExpense],
    ) -> Result<usize, RemoteError> {
        let mut uploaded = 0;
        for expense in expenses {
            info!("Uploading expense {} for {}", expense.id, email);
            if let Err(e) = self.upload_expense(email, expense).await {
                warn!(
                    "Upload aborted at record {} after {} of {} uploads: {}",
                    expense.id,
                    uploaded,
                    expenses.len(),
                    e
                );
                return Err(e);
            }
            uploaded += 1;
        }
        Ok(uploaded)
    }

    /// `GET /profile/{email}` — profile image as raw PNG bytes. Thin
    /// passthrough, not part of the sync core.
    async fn get_profile_image(&self, email: &str) -> Result<Vec<u8>, RemoteError>;

    /// `PUT /profile/{email}` — upload a profile image.
    async fn put_profile_image(&self, email: &str, png: Vec<u8>) -> Result<(), RemoteError>;
}
