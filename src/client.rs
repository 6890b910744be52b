//! HTTP client for the update-check endpoint.

use crate::error::ErrorBody;
use crate::protocol::{UpdateCandidate, UpdateCheckPayload};
use crate::retry::{with_retry_if, RetryConfig};
use thiserror::Error;

/// Path of the update-check endpoint
pub const UPDATE_CHECK_PATH: &str = "/gp/translations/update-check/0.1";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a structured error.
    #[error("{code}: {message} (HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The server answered with a non-success status and an unexpected body.
    #[error("Unexpected response: HTTP {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Transport failures and 5xx responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } | Self::Unexpected { status, .. } => *status >= 500,
            Self::Transport(e) => !e.is_decode(),
        }
    }

    /// Machine-readable error code, if the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}

pub struct UpdateCheckClient {
    http: reqwest::Client,
    endpoint: String,
    retry: RetryConfig,
}

impl UpdateCheckClient {
    /// Client for the server at `server_url` (e.g. `https://translate.example.com`).
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), UPDATE_CHECK_PATH),
            retry: RetryConfig::update_check(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the server which packages are newer than the installed ones.
    ///
    /// An empty list means everything is up to date.
    pub async fn check(
        &self,
        payload: &UpdateCheckPayload,
    ) -> Result<Vec<UpdateCandidate>, ClientError> {
        with_retry_if(
            &self.retry,
            "Update check",
            || self.send(payload),
            ClientError::is_retryable,
        )
        .await
    }

    async fn send(&self, payload: &UpdateCheckPayload) -> Result<Vec<UpdateCandidate>, ClientError> {
        let response = self.http.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        Err(match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => ClientError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            },
            Err(_) => ClientError::Unexpected {
                status: status.as_u16(),
                body,
            },
        })
    }
}
