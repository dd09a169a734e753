//! Base-directory handle for the CSV storage backend.

use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CsvConnection manages file paths and bootstraps the CSV files for each
/// user. Cloning is cheap; all clones share the same base directory.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<PathBuf>,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating it when
    /// missing.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Generate a safe filesystem identifier from a user's email.
    /// "Ane.Smith@example.com" -> "ane_smith_example_com".
    pub fn safe_directory_name(email: &str) -> String {
        let mapped = email
            .chars()
            .map(|c| match c {
                c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
                _ => '_',
            })
            .collect::<String>();

        // Collapse runs of underscores so "a@@b" and "a@b" stay distinct
        // from readable but not from each other; good enough for one
        // device's account set.
        let mut collapsed = String::new();
        let mut last_was_underscore = false;
        for c in mapped.chars() {
            if c == '_' {
                if !last_was_underscore {
                    collapsed.push('_');
                }
                last_was_underscore = true;
            } else {
                collapsed.push(c);
                last_was_underscore = false;
            }
        }
        collapsed.trim_matches('_').to_string()
    }

    /// Directory holding one user's data files.
    pub fn user_directory(&self, email: &str) -> PathBuf {
        self.base_directory.join(Self::safe_directory_name(email))
    }

    /// Path of a user's expense file.
    pub fn expenses_file_path(&self, email: &str) -> PathBuf {
        self.user_directory(email).join("expenses.csv")
    }

    /// Path of the device-wide accounts file.
    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join("users.csv")
    }

    /// Ensure a user's expense file exists with its header row.
    pub fn ensure_expenses_file_exists(&self, email: &str) -> Result<()> {
        let user_dir = self.user_directory(email);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }

        let file_path = self.expenses_file_path(email);
        if !file_path.exists() {
            let mut writer = csv::Writer::from_path(&file_path)?;
            writer.write_record([
                "id",
                "name",
                "amount",
                "date",
                "category",
                "latitude",
                "longitude",
                "user_id",
            ])?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Ensure the accounts file exists with its header row.
    pub fn ensure_users_file_exists(&self) -> Result<()> {
        let file_path = self.users_file_path();
        if !file_path.exists() {
            let mut writer = csv::Writer::from_path(&file_path)?;
            writer.write_record(["name", "email", "password_hash", "logged_in"])?;
            writer.flush()?;
        }
        Ok(())
    }
}
