//! Error taxonomy of the update-check endpoint.
//!
//! Every public failure carries a machine-readable code and an HTTP status,
//! serialized in the WordPress REST error shape:
//! `{"code": "...", "message": "...", "data": {"status": 400}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Errors surfaced to update-check callers.
#[derive(Debug, Error)]
pub enum UpdateCheckError {
    #[error("Invalid data received.")]
    InvalidData,

    #[error("Invalid item data.")]
    InvalidItem,

    #[error("Invalid locale data.")]
    InvalidLocale,

    #[error("Invalid translations data.")]
    InvalidTranslations,

    #[error("No supported locales found.")]
    NoLocalesSupported,

    #[error("No translations found for the specified item and locales.")]
    NoTranslationsFound,

    /// A collaborator (database, registry file) failed.
    #[error("Internal server error.")]
    Internal(#[source] anyhow::Error),
}

impl UpdateCheckError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidData => "invalid_data",
            Self::InvalidItem => "invalid_item",
            Self::InvalidLocale => "invalid_locale",
            Self::InvalidTranslations => "invalid_translations",
            Self::NoLocalesSupported => "no_locales",
            Self::NoTranslationsFound => "no_translations",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidData
            | Self::InvalidItem
            | Self::InvalidLocale
            | Self::InvalidTranslations
            | Self::NoLocalesSupported => StatusCode::BAD_REQUEST,
            Self::NoTranslationsFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the JSON body sent to the client.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
            data: ErrorData {
                status: self.status().as_u16(),
            },
        }
    }
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub status: u16,
}

impl IntoResponse for UpdateCheckError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            error!("Update check failed: {:#}", e);
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}

/// Internal resolution failures.
///
/// `ProjectNotFound` and `NoTranslationSets` are collapsed into
/// `UpdateCheckError::NoTranslationsFound` so callers cannot probe for
/// project existence.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("No translation sets found for project: {0}")]
    NoTranslationSets(String),

    #[error(transparent)]
    Registry(#[from] anyhow::Error),
}

impl From<ResolveError> for UpdateCheckError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::ProjectNotFound(_) | ResolveError::NoTranslationSets(_) => {
                UpdateCheckError::NoTranslationsFound
            }
            ResolveError::Registry(e) => UpdateCheckError::Internal(e),
        }
    }
}
