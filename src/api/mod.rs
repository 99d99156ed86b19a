//! REST API layer: route handlers, DTOs, and router composition.
//!
//! The surface is small and unversioned: a liveness root, a health
//! check, and the two door-side operations.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
