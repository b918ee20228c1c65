use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::session::StoreError;

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401.
    #[error("unauthorized{}", detail_suffix(.detail))]
    Unauthorized { detail: Option<String> },

    /// Any other non-2xx status.
    #[error("server returned {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A login succeeded but the body carried no `access_token`.
    #[error("no access token received")]
    MissingToken,

    /// An authenticated call was attempted without a stored credential.
    #[error("not logged in")]
    NotAuthenticated,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist credential: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The backend's `detail` message, when one came with the error.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => String::new(),
    }
}

/// Pull the `detail` field out of a FastAPI-style error body.
///
/// Validation errors carry a list instead of a string; those are kept as
/// compact JSON.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
