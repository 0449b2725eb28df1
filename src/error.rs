//! Error types for TemboPlus gateway operations.
//!
//! Every fallible call in this crate returns [`TemboResult`]. Callers branch on
//! [`TemboError::kind`] to tell local validation failures apart from transport
//! problems, gateway error envelopes and rejected business outcomes.

use crate::payments::catalog::PaymentStatusCode;
use crate::payments::types::CollectionResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type TemboResult<T> = Result<T, TemboError>;

/// Coarse classification of a [`TemboError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Api,
    Business,
    Decode,
    Cancelled,
    Configuration,
}

#[derive(Debug, Error)]
pub enum TemboError {
    /// Rejected locally before any network call.
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// Connection failure, or a non-2xx reply without a decodable error envelope.
    #[error("Transport error{}: {message}", format_status(.status))]
    Transport {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Timeout error: request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error("Decode error: {message}")]
    Decode { message: String, body: Option<String> },

    #[error("Request cancelled; the gateway outcome is unknown")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl TemboError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Transport {
            status: Some(status),
            message: format!("unexpected status code: {}, body: {}", status, body),
            body: Some(body),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    pub fn decode(message: impl Into<String>, body: Option<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport { .. } | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Api,
            Self::Business(_) => ErrorKind::Business,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Whether resubmitting the same call might succeed. The client never
    /// retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status, .. } => status.map_or(true, |s| s >= 500 || s == 429),
            Self::Timeout { .. } => true,
            Self::Api(api) => api.status_code >= 500 || api.status_code == 429,
            _ => false,
        }
    }

    /// The full response for business rejections, which still carry the
    /// gateway transaction id.
    pub fn business_response(&self) -> Option<&CollectionResponse> {
        match self {
            Self::Business(err) => Some(&err.response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TemboError {
    fn from(err: reqwest::Error) -> Self {
        // The configured limit is unknown here; HttpTransport maps its own
        // timeouts to TemboError::Timeout.
        TemboError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Request error: {}", err),
            body: None,
        }
    }
}

impl From<serde_json::Error> for TemboError {
    fn from(err: serde_json::Error) -> Self {
        TemboError::decode(format!("JSON error: {}", err), None)
    }
}

/// Error envelope returned by the gateway on non-2xx replies, e.g.
/// `{"statusCode":401,"reason":"INVALID_CREDENTIALS"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.reason.as_deref(), self.message.as_deref()) {
            (Some(reason), _) if !reason.is_empty() => {
                write!(f, "TemboPlus API Error [{}]: {}", self.status_code, reason)
            }
            (_, Some(message)) if !message.is_empty() => {
                write!(f, "TemboPlus API Error [{}]: {}", self.status_code, message)
            }
            _ => write!(f, "TemboPlus API Error [{}]", self.status_code),
        }
    }
}

impl std::error::Error for ApiError {}

/// A 2xx reply whose payload reports a rejected or failed payment.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("TemboPlus API Error [{status_code}]: {message}")]
pub struct BusinessError {
    pub status_code: PaymentStatusCode,
    pub message: String,
    pub response: CollectionResponse,
}

impl BusinessError {
    pub fn from_response(response: CollectionResponse) -> Self {
        Self {
            status_code: response.status_code.clone(),
            message: "Request failed".to_string(),
            response,
        }
    }
}
