//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::GuestService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Guest service for check-in and requeue; the background scheduler
    /// shares the same instance.
    pub guest_service: Arc<GuestService>,
}
