// ── Core error types ──
//
// User-facing errors from kennel-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<kennel_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

use crate::model::ValidationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach record store at {url}: {reason}")]
    StoreUnreachable { url: String, reason: String },

    #[error("Request to record store timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Record not found: {id}")]
    NotFound { id: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Missing or malformed field, caught before any remote call.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Operation rejected by record store: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Record store error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kennel_api::Error> for CoreError {
    fn from(err: kennel_api::Error) -> Self {
        match err {
            kennel_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::StoreUnreachable {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        id: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            kennel_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            kennel_api::Error::Tls(msg) => CoreError::StoreUnreachable {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            kennel_api::Error::Api {
                message,
                code: _,
                status,
            } => {
                if status == 404 {
                    CoreError::NotFound { id: message }
                } else {
                    CoreError::Api {
                        message,
                        status: Some(status),
                    }
                }
            }
            kennel_api::Error::Rejected { message } => CoreError::Rejected { message },
            kennel_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
