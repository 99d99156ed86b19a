//! REST endpoint handlers organized by resource.

pub mod checkin;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the guest-facing routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(checkin::routes())
}
