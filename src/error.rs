//! Service error types with HTTP status code mapping.
//!
//! Errors are grouped by the stage that produces them: [`ConfigError`] is
//! fatal at startup, [`LedgerError`]/[`GenerationError`]/[`DeliveryError`]
//! occur inside the processing pipeline and terminate in the ledger's status
//! column, and [`CheckInError`] is the only type surfaced to HTTP callers —
//! it maps to a specific status code and structured JSON error response.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Language;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "guest not found for bob@example.com",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`CheckInError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Fatal startup configuration error.
///
/// Raised once, before any traffic is served; never recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Failure while talking to the remote ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// HTTP transport failure reaching the ledger API.
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not obtain or refresh an access token.
    #[error("ledger authentication failed: {0}")]
    Auth(String),

    /// The ledger API answered with a non-success status.
    #[error("ledger API error (status {status}): {message}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Response body or error description.
        message: String,
    },

    /// The ledger answered with a payload this client cannot interpret.
    #[error("malformed ledger response: {0}")]
    Malformed(String),
}

/// Failure while rasterizing or persisting a QR credential.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The payload could not be encoded as a QR symbol.
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The rasterized image could not be written as PNG.
    #[error("image write failed: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure around the artifact directory.
    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while rendering or sending an invitation email.
///
/// The subdivision is for logging only; every variant is terminal for the
/// guest's current attempt and there is no differentiated retry policy.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// No HTML template exists for the requested language.
    #[error("message template missing for {language}: {path}")]
    TemplateMissing {
        /// Language the template was looked up for.
        language: Language,
        /// Path that was probed.
        path: PathBuf,
    },

    /// SMTP connection, negotiation, or protocol failure.
    #[error("smtp transport failure: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The message could not be assembled or encoded.
    #[error("message encoding failure: {0}")]
    Encoding(String),

    /// Anything else, e.g. a failed send task.
    #[error("delivery failed: {0}")]
    Other(String),
}

/// Union of the per-guest failure sources inside a processing cycle.
///
/// Every variant marks the guest's row `error`; the distinction exists so
/// the cycle log says which stage gave up.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Credential generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Invitation delivery failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// A ledger read or write inside the row handling failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Error surfaced to HTTP callers of the check-in and requeue endpoints.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    /// The scanned payload is empty or carries no `Email:` line.
    #[error("malformed payload: no email present")]
    MalformedPayload,

    /// No ledger row matches the extracted email.
    #[error("guest not found for {email}")]
    NotFound {
        /// Email that was looked up.
        email: String,
    },

    /// The ledger could not be read or written.
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),

    /// Internal invariant failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CheckInError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedPayload => 1001,
            Self::NotFound { .. } => 2001,
            Self::Ledger(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedPayload => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Ledger(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CheckInError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
