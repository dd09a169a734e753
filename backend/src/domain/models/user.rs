//! Domain model for a user account.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::RemoteUser;

/// A device-local user account. `email` is the unique identifier; the
/// `logged_in` flag marks accounts included in the backup-all sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub logged_in: bool,
}

impl User {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password),
            logged_in: false,
        }
    }

    /// Check a plain password against the stored hash.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }

    /// Account payload for the remote API.
    pub fn to_remote(&self) -> RemoteUser {
        RemoteUser {
            name: self.name.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
        }
    }
}

/// Sha256 hex digest, matching what the deployed server stores.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
