use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::client::catalog::StoneCatalog;
use crate::types::dto::login::{LoginRequest, LoginResponse};
use crate::types::dto::stone::{Stone, StoneInput};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure talking to the stones API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The server answered with a non-success status
    #[error("Server responded with status {status}")]
    Status { status: u16 },

    /// The request never got a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not what the API documents
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// A successful admin login
#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    /// Admin token for write requests, when the server issues one
    pub token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Remote operations the UI controller needs
#[async_trait]
pub trait StonesBackend: Send + Sync {
    /// Fetch the full grouped stone list
    async fn list(&self) -> Result<StoneCatalog, BackendError>;

    async fn create(&self, stone: &StoneInput, token: Option<&str>) -> Result<Stone, BackendError>;

    async fn update(&self, id: &str, stone: &StoneInput, token: Option<&str>) -> Result<Stone, BackendError>;

    async fn delete(&self, id: &str, token: Option<&str>) -> Result<(), BackendError>;

    /// Check the admin password
    ///
    /// A wrong password surfaces as `Status { status: 401 }`.
    async fn login(&self, password: &str) -> Result<LoginGrant, BackendError>;

    /// Trade a still-valid admin token for a fresh one
    async fn refresh(&self, token: &str) -> Result<LoginGrant, BackendError>;
}

/// `StonesBackend` over the HTTP API
#[derive(Debug, Clone)]
pub struct HttpStonesBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStonesBackend {
    /// Create a backend for an API root such as `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder, token: Option<&str>) -> Result<Response, BackendError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Stones API request failed: {}", e);
            BackendError::Transport(e.to_string())
        })?;

        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::debug!(status = status.as_u16(), url = %response.url(), "Stones API returned an error status");
    Err(BackendError::Status {
        status: status.as_u16(),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl StonesBackend for HttpStonesBackend {
    async fn list(&self) -> Result<StoneCatalog, BackendError> {
        let response = Self::send(self.client.get(self.url("/stones")), None).await?;
        let body: Value = decode(response).await?;
        Ok(StoneCatalog::from_json(body))
    }

    async fn create(&self, stone: &StoneInput, token: Option<&str>) -> Result<Stone, BackendError> {
        let request = self.client.post(self.url("/stones")).json(stone);
        let response = Self::send(request, token).await?;
        decode(response).await
    }

    async fn update(&self, id: &str, stone: &StoneInput, token: Option<&str>) -> Result<Stone, BackendError> {
        let request = self.client.put(self.url(&format!("/stones/{}", id))).json(stone);
        let response = Self::send(request, token).await?;
        decode(response).await
    }

    async fn delete(&self, id: &str, token: Option<&str>) -> Result<(), BackendError> {
        Self::send(self.client.delete(self.url(&format!("/stones/{}", id))), token).await?;
        Ok(())
    }

    async fn login(&self, password: &str) -> Result<LoginGrant, BackendError> {
        let body = LoginRequest {
            password: Some(password.to_string()),
        };
        let response = Self::send(self.client.post(self.url("/login")).json(&body), None).await?;
        grant(decode(response).await?)
    }

    async fn refresh(&self, token: &str) -> Result<LoginGrant, BackendError> {
        let response = Self::send(self.client.post(self.url("/login/refresh")), Some(token)).await?;
        grant(decode(response).await?)
    }
}

fn grant(result: LoginResponse) -> Result<LoginGrant, BackendError> {
    if !result.success {
        return Err(BackendError::Status {
            status: StatusCode::UNAUTHORIZED.as_u16(),
        });
    }

    Ok(LoginGrant {
        token: result.token,
        expires_in: result.expires_in,
    })
}
