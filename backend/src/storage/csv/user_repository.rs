//! CSV-backed user account repository.
//!
//! Every account on the device lives in a single `users.csv` at the base
//! directory, mirroring the per-user expense files next to it.

use anyhow::{anyhow, Result};
use csv::{Reader, Writer};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::domain::models::User;
use crate::storage::traits::UserStorage;

#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_users(&self) -> Result<Vec<User>> {
        self.connection.ensure_users_file_exists()?;

        let file = File::open(self.connection.users_file_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut users = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            users.push(User {
                name: record.get(0).unwrap_or("").to_string(),
                email: record.get(1).unwrap_or("").to_string(),
                password_hash: record.get(2).unwrap_or("").to_string(),
                logged_in: record.get(3).unwrap_or("false") == "true",
            });
        }
        Ok(users)
    }

    fn write_users(&self, users: &[User]) -> Result<()> {
        self.connection.ensure_users_file_exists()?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.connection.users_file_path())?;
        let mut csv_writer = Writer::from_writer(BufWriter::new(file));

        csv_writer.write_record(["name", "email", "password_hash", "logged_in"])?;
        for user in users {
            csv_writer.write_record([
                user.name.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                if user.logged_in { "true" } else { "false" },
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl UserStorage for UserRepository {
    fn store_user(&self, user: &User) -> Result<()> {
        let mut users = self.read_users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(anyhow!("user {} already exists", user.email));
        }
        users.push(user.clone());
        self.write_users(&users)
    }

    fn get_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.read_users()?.into_iter().find(|u| u.email == email))
    }

    fn update_user(&self, user: &User) -> Result<usize> {
        let mut users = self.read_users()?;
        match users.iter_mut().find(|u| u.email == user.email) {
            Some(existing) => {
                *existing = user.clone();
                self.write_users(&users)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.read_users()
    }

    fn list_logged_in(&self) -> Result<Vec<User>> {
        Ok(self
            .read_users()?
            .into_iter()
            .filter(|u| u.logged_in)
            .collect())
    }

    fn set_logged_in(&self, email: &str, logged_in: bool) -> Result<bool> {
        let mut users = self.read_users()?;
        match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.logged_in = logged_in;
                self.write_users(&users)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_repository() -> (UserRepository, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        (UserRepository::new(connection), temp_dir)
    }

    #[test]
    fn store_then_get() {
        let (repo, _temp_dir) = create_test_repository();
        let user = User::new("Ane", "ane@example.com", "secret");
        repo.store_user(&user).unwrap();

        let fetched = repo.get_user("ane@example.com").unwrap().unwrap();
        assert_eq!(fetched, user);
        assert!(repo.get_user("other@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (repo, _temp_dir) = create_test_repository();
        let user = User::new("Ane", "ane@example.com", "secret");
        repo.store_user(&user).unwrap();
        assert!(repo.store_user(&user).is_err());
        assert_eq!(repo.list_users().unwrap().len(), 1);
    }

    #[test]
    fn login_flags_round_trip() {
        let (repo, _temp_dir) = create_test_repository();
        repo.store_user(&User::new("Ane", "ane@example.com", "s"))
            .unwrap();
        repo.store_user(&User::new("Jon", "jon@example.com", "s"))
            .unwrap();

        assert!(repo.set_logged_in("ane@example.com", true).unwrap());
        assert!(!repo.set_logged_in("ghost@example.com", true).unwrap());

        let logged_in = repo.list_logged_in().unwrap();
        assert_eq!(logged_in.len(), 1);
        assert_eq!(logged_in[0].email, "ane@example.com");

        assert!(repo.set_logged_in("ane@example.com", false).unwrap());
        assert!(repo.list_logged_in().unwrap().is_empty());
    }
}
