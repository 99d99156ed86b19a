//! Domain layer: guest records, the ledger schema, and credential payloads.
//!
//! This module contains the pure data model: positional row parsing into
//! [`GuestRecord`], the versioned column layout in [`LedgerSchema`], and the
//! text payload embedded in generated QR credentials.

pub mod credential;
pub mod guest;
pub mod schema;

pub use credential::{CredentialPayload, extract_email};
pub use guest::{GuestRecord, Language, SendStatus};
pub use schema::{LedgerSchema, SchemaVersion};
