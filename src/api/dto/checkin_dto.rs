//! Check-in and requeue request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /check-in`: the raw text read from a scanned credential.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Raw QR payload exactly as the scanner produced it.
    pub qr_data: String,
}

/// Guest identity echoed back after a successful check-in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckedInGuest {
    /// 1-based ledger row that was marked.
    pub row: usize,
    /// Guest name from the ledger.
    pub name: String,
    /// Email the credential resolved to.
    pub email: String,
}

/// Response of `POST /check-in`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckInResponse {
    /// Human-readable confirmation for the door operator.
    pub message: String,
    /// The guest that was marked.
    pub guest: CheckedInGuest,
}

/// Body of `POST /guests/requeue`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequeueRequest {
    /// Email of the guest whose status should be cleared.
    pub email: String,
}

/// Response of `POST /guests/requeue`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequeueResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Email whose status cell was cleared.
    pub email: String,
}
