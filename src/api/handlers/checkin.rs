//! Check-in and requeue handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    CheckInRequest, CheckInResponse, CheckedInGuest, RequeueRequest, RequeueResponse,
};
use crate::app_state::AppState;
use crate::error::{CheckInError, ErrorResponse};

/// `POST /check-in` — Validate a scanned credential and mark arrival.
///
/// # Errors
///
/// Returns [`CheckInError`] when the payload carries no email, no ledger
/// row matches, or the ledger cannot be reached.
#[utoipa::path(
    post,
    path = "/check-in",
    tag = "CheckIn",
    summary = "Check a guest in",
    description = "Extracts the email from a scanned QR payload, finds the matching ledger row, and overwrites its check-in cell. Repeating a scan is harmless.",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Guest marked as checked in", body = CheckInResponse),
        (status = 400, description = "Payload carries no email", body = ErrorResponse),
        (status = 404, description = "No ledger row matches the email", body = ErrorResponse),
        (status = 500, description = "Ledger unavailable", body = ErrorResponse),
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    Json(req): Json<CheckInRequest>,
) -> Result<impl IntoResponse, CheckInError> {
    let outcome = state.guest_service.check_in(&req.qr_data).await?;

    let response = CheckInResponse {
        message: format!("guest {} checked in", outcome.email),
        guest: CheckedInGuest {
            row: outcome.row,
            name: outcome.name,
            email: outcome.email,
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

/// `POST /guests/requeue` — Clear a guest's status so the next cycle
/// reprocesses them.
///
/// # Errors
///
/// Returns [`CheckInError`] when no data row matches the email or the
/// ledger cannot be reached.
#[utoipa::path(
    post,
    path = "/guests/requeue",
    tag = "CheckIn",
    summary = "Requeue a guest",
    description = "Operator action for failed sends: clears the status cell of the matching row, so the background cycle generates and delivers the credential again.",
    request_body = RequeueRequest,
    responses(
        (status = 200, description = "Status cleared", body = RequeueResponse),
        (status = 404, description = "No data row matches the email", body = ErrorResponse),
        (status = 500, description = "Ledger unavailable", body = ErrorResponse),
    )
)]
pub async fn requeue(
    State(state): State<AppState>,
    Json(req): Json<RequeueRequest>,
) -> Result<impl IntoResponse, CheckInError> {
    state.guest_service.requeue(&req.email).await?;

    let response = RequeueResponse {
        message: "status cleared, guest will be reprocessed on the next cycle".to_string(),
        email: req.email,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Check-in routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(check_in))
        .route("/guests/requeue", post(requeue))
}
