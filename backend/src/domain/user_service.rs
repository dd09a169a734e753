//! Account registration, login, and session state.
//!
//! Registration validates the command locally, then creates the account on
//! the remote server before recording it in the local user store. Login is
//! purely local: it checks the stored password hash and flips the
//! logged-in flag that the backup pass keys off.

use anyhow::Result;
use log::{error, info, warn};
use regex::Regex;
use std::sync::Arc;

use crate::domain::commands::auth::{LoginCommand, LoginResult, RegisterCommand, RegisterResult};
use crate::domain::models::User;
use crate::remote::{RemoteClient, RemoteError};
use crate::storage::csv::UserRepository;
use crate::storage::traits::UserStorage;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

pub struct UserService {
    users: UserRepository,
    client: Arc<dyn RemoteClient>,
}

impl UserService {
    pub fn new(users: UserRepository, client: Arc<dyn RemoteClient>) -> Self {
        Self { users, client }
    }

    /// Register a new account. Each validation check gets its own flag in
    /// the result so callers can surface them inline; the account is only
    /// created (remotely, then locally) when every local check passes.
    pub async fn register(&self, command: RegisterCommand) -> Result<RegisterResult> {
        let email_pattern = Regex::new(EMAIL_PATTERN)?;
        let mut result = RegisterResult {
            name: !command.name.trim().is_empty(),
            email: email_pattern.is_match(&command.email),
            password: !command.password.is_empty() && command.password == command.password_repeat,
            server: true,
            not_exist: true,
        };

        if !(result.name && result.email && result.password) {
            return Ok(result);
        }

        if self.users.get_user(&command.email)?.is_some() {
            result.not_exist = false;
            return Ok(result);
        }

        let user = User::new(&command.name, &command.email, &command.password);
        match self.client.create_user(&user.to_remote()).await {
            Ok(()) => {}
            Err(RemoteError::UserExists) => {
                result.not_exist = false;
                return Ok(result);
            }
            Err(e) => {
                error!("Account creation failed for {}: {}", command.email, e);
                result.server = false;
                return Ok(result);
            }
        }

        self.users.store_user(&user)?;
        info!("Registered account {}", command.email);
        Ok(result)
    }

    /// Check credentials against the local store. On success the user is
    /// marked logged in and returned with the flag set.
    pub fn login(&self, command: LoginCommand) -> Result<LoginResult> {
        if command.email.is_empty() || command.password.is_empty() {
            return Ok(LoginResult { user: None });
        }

        let Some(mut user) = self.users.get_user(&command.email)? else {
            warn!("Login attempt for unknown account {}", command.email);
            return Ok(LoginResult { user: None });
        };
        if !user.password_matches(&command.password) {
            warn!("Bad password for {}", command.email);
            return Ok(LoginResult { user: None });
        }

        self.users.set_logged_in(&command.email, true)?;
        user.logged_in = true;
        info!("Logged in {}", command.email);
        Ok(LoginResult { user: Some(user) })
    }

    /// Clear the logged-in flag. Returns whether the account was known.
    pub fn logout(&self, email: &str) -> Result<bool> {
        let known = self.users.set_logged_in(email, false)?;
        if known {
            info!("Logged out {}", email);
        }
        Ok(known)
    }

    pub async fn profile_image(&self, email: &str) -> Result<Vec<u8>, RemoteError> {
        self.client.get_profile_image(email).await
    }

    pub async fn store_profile_image(&self, email: &str, png: Vec<u8>) -> Result<(), RemoteError> {
        self.client.put_profile_image(email, png).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::FakeRemote;
    use crate::storage::csv::CsvConnection;

    fn create_test_service() -> (UserService, Arc<FakeRemote>, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let remote = Arc::new(FakeRemote::default());
        let service = UserService::new(UserRepository::new(connection), remote.clone());
        (service, remote, temp_dir)
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            password_repeat: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn register_creates_the_account_remotely_and_locally() {
        let (service, remote, _temp_dir) = create_test_service();
        let result = service.register(register_command()).await.unwrap();

        assert!(result.succeeded());
        assert_eq!(remote.user_count(), 1);
        let stored = service.users.get_user("ana@example.com").unwrap().unwrap();
        assert_eq!(stored.name, "Ana");
        assert!(!stored.logged_in);
    }

    #[tokio::test]
    async fn register_flags_each_invalid_field() {
        let (service, remote, _temp_dir) = create_test_service();
        let result = service
            .register(RegisterCommand {
                name: "  ".to_string(),
                email: "not-an-address".to_string(),
                password: "a".to_string(),
                password_repeat: "b".to_string(),
            })
            .await
            .unwrap();

        assert!(!result.name);
        assert!(!result.email);
        assert!(!result.password);
        // Remote was never called, so the server-side flags stay clean.
        assert!(result.server);
        assert!(result.not_exist);
        assert_eq!(remote.user_count(), 0);
    }

    #[tokio::test]
    async fn register_rejects_empty_passwords_even_when_equal() {
        let (service, _remote, _temp_dir) = create_test_service();
        let mut command = register_command();
        command.password.clear();
        command.password_repeat.clear();
        let result = service.register(command).await.unwrap();
        assert!(!result.password);
    }

    #[tokio::test]
    async fn register_reports_an_existing_remote_account() {
        let (service, remote, _temp_dir) = create_test_service();
        remote
            .create_user(&User::new("Ana", "ana@example.com", "other").to_remote())
            .await
            .unwrap();

        let result = service.register(register_command()).await.unwrap();
        assert!(!result.not_exist);
        assert!(result.server);
        assert!(service.users.get_user("ana@example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn register_reports_an_existing_local_account_without_calling_remote() {
        let (service, remote, _temp_dir) = create_test_service();
        service.register(register_command()).await.unwrap();
        assert_eq!(remote.user_count(), 1);

        let result = service.register(register_command()).await.unwrap();
        assert!(!result.not_exist);
        assert_eq!(remote.user_count(), 1);
    }

    #[tokio::test]
    async fn register_reports_server_failure_and_stores_nothing() {
        let (service, remote, _temp_dir) = create_test_service();
        remote.fail_user_creation();

        let result = service.register(register_command()).await.unwrap();
        assert!(!result.server);
        assert!(result.not_exist);
        assert!(service.users.get_user("ana@example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn login_succeeds_only_with_the_right_password() {
        let (service, _remote, _temp_dir) = create_test_service();
        service.register(register_command()).await.unwrap();

        let denied = service
            .login(LoginCommand {
                email: "ana@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .unwrap();
        assert_eq!(denied.user, None);

        let granted = service
            .login(LoginCommand {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        let user = granted.user.unwrap();
        assert!(user.logged_in);
        assert_eq!(user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn login_with_empty_fields_never_touches_the_store() {
        let (service, _remote, _temp_dir) = create_test_service();
        let result = service
            .login(LoginCommand {
                email: String::new(),
                password: String::new(),
            })
            .unwrap();
        assert_eq!(result.user, None);
    }

    #[tokio::test]
    async fn logout_clears_the_flag_the_backup_pass_reads() {
        let (service, _remote, _temp_dir) = create_test_service();
        service.register(register_command()).await.unwrap();
        service
            .login(LoginCommand {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        assert_eq!(service.users.list_logged_in().unwrap().len(), 1);

        assert!(service.logout("ana@example.com").unwrap());
        assert!(service.users.list_logged_in().unwrap().is_empty());
        assert!(!service.logout("nobody@example.com").unwrap());
    }

    #[tokio::test]
    async fn profile_image_round_trips_through_the_remote() {
        let (service, _remote, _temp_dir) = create_test_service();
        service
            .store_profile_image("ana@example.com", vec![0x89, 0x50, 0x4e, 0x47])
            .await
            .unwrap();
        let png = service.profile_image("ana@example.com").await.unwrap();
        assert_eq!(png, vec![0x89, 0x50, 0x4e, 0x47]);
    }
}
