//! reqwest implementation of [`RemoteClient`].

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{multipart, Client, Response, StatusCode};
use std::time::Duration;

use super::{RemoteClient, RemoteError};
use shared::{RemoteExpense, RemoteUser};

/// Default deployment of the expense server.
const DEFAULT_BASE_URL: &str = "http://34.135.202.124:8000";

/// Environment variable overriding the server location.
const BASE_URL_ENV: &str = "BUDGET_BUDDY_API_URL";

/// Connection settings for the expense server.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl RemoteConfig {
    /// Read the base URL from `BUDGET_BUDDY_API_URL`, falling back to the
    /// default deployment.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// HTTP client for the expense server.
pub struct HttpService {
    client: Client,
    config: RemoteConfig,
}

impl HttpService {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a response to our error taxonomy. 401 and 409 become their own
    /// variants; any other non-2xx carries the server's JSON `detail`
    /// field when one is present.
    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Server rejected credentials (401)");
                Err(RemoteError::Authentication)
            }
            StatusCode::CONFLICT => {
                warn!("Server reported a conflicting user (409)");
                Err(RemoteError::UserExists)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
                    .unwrap_or(body);
                warn!("Server returned {}: {}", status, detail);
                Err(RemoteError::Status {
                    code: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

#[async_trait]
impl RemoteClient for HttpService {
    async fn create_user(&self, user: &RemoteUser) -> Result<(), RemoteError> {
        info!("POST /users/ for {}", user.email);
        let response = self
            .client
            .post(self.url("/users/"))
            .json(user)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_user(&self, email: &str) -> Result<RemoteUser, RemoteError> {
        info!("GET /users/{}", email);
        let response = self
            .client
            .get(self.url(&format!("/users/{}", email)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn download_user_data(&self, email: &str) -> Result<Vec<RemoteExpense>, RemoteError> {
        info!("GET /gastos/{}/", email);
        let response = self
            .client
            .get(self.url(&format!("/gastos/{}/", email)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_user_data(&self, email: &str) -> Result<(), RemoteError> {
        info!("DELETE /gastos/{}/", email);
        let response = self
            .client
            .delete(self.url(&format!("/gastos/{}/", email)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload_expense(
        &self,
        email: &str,
        expense: &RemoteExpense,
    ) -> Result<RemoteExpense, RemoteError> {
        let response = self
            .client
            .post(self.url(&format!("/gastos/{}/", email)))
            .json(expense)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_profile_image(&self, email: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("/profile/{}", email)))
            .send()
            .await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }

    async fn put_profile_image(&self, email: &str, png: Vec<u8>) -> Result<(), RemoteError> {
        let part = multipart::Part::bytes(png)
            .file_name("profile_image.png")
            .mime_str("image/png")?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .put(self.url(&format!("/profile/{}", email)))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let service = HttpService::new(RemoteConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..RemoteConfig::default()
        })
        .unwrap();
        assert_eq!(
            service.url("/gastos/u1@example.com/"),
            "http://localhost:8000/gastos/u1@example.com/"
        );
    }

    #[test]
    fn config_defaults_to_deployed_host() {
        let config = RemoteConfig::default();
        assert_eq!(config.base_url, "http://34.135.202.124:8000");
    }
}
