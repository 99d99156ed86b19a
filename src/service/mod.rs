//! Service layer: business logic orchestration.
//!
//! [`GuestService`] owns the processing cycle and the check-in and
//! requeue paths, coordinating the ledger, the credential generator,
//! and the mailer behind their seams.

pub mod guest_service;

pub use guest_service::{CheckInOutcome, CycleReport, GuestService};
