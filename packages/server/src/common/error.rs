//! Typed errors for the ingestion and summary pipeline.
//!
//! Uses `thiserror` for domain errors (not `anyhow`) so callers can match on
//! the failure mode; `anyhow` is reserved for the application boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur across the bill pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Required credential or setting missing — fatal before any I/O
    #[error("configuration error: {0}")]
    Configuration(String),

    /// congress.gov responded with a non-2xx status (not-found excluded,
    /// which is modeled as an absent result)
    #[error("congress.gov API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Insert hit the unique (congress, type, number) constraint
    #[error("bill {congress}-{bill_type}-{bill_number} already ingested")]
    DuplicateBill {
        congress: i32,
        bill_type: String,
        bill_number: i32,
    },

    /// Neither AI provider has a configured credential
    #[error("no AI provider configured")]
    NoProviderConfigured,

    /// Every configured provider failed; carries the last failure
    #[error("summary generation failed: {0}")]
    GenerationFailed(String),

    /// A single provider attempt failed (network, non-2xx, malformed output)
    #[error("provider error: {0}")]
    Provider(String),

    /// Requested bill id has no row
    #[error("bill {0} not found")]
    BillNotFound(i32),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Read-path response mapping. Not-found is explicit; everything else is a
/// generic failure so internal detail never leaks to end users (the
/// authenticated admin endpoints build their own diagnostic responses).
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::BillNotFound(_) => (StatusCode::NOT_FOUND, "Bill not found"),
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
