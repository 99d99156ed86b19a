//! # qonaq-gate
//!
//! Guest QR credential delivery and check-in service.
//!
//! Guest registrations live in a shared Google Sheets ledger. A background
//! processor scans the ledger on a fixed interval, generates a scannable QR
//! credential for every eligible guest, emails it, and writes the outcome
//! back into the status column. A separate HTTP endpoint accepts scanned
//! credentials at the venue door and marks the matching guest as checked in.
//!
//! The ledger is the single source of truth: the processor keeps no state
//! across cycles, so a crash anywhere in the pipeline is healed by the next
//! full-table scan.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler (periodic task)          HTTP clients (door scanners)
//!     │                                  │
//!     ├── GuestService (service/)        ├── REST handlers (api/)
//!     │       │                          │       │
//!     │       ├── CredentialGenerator ───┘       │
//!     │       ├── Mailer (delivery/)     GuestService (check-in, requeue)
//!     │       │                                  │
//!     └───────┴── Ledger (ledger/) ──────────────┘
//!                     │
//!               Google Sheets
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod credential;
pub mod delivery;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod scheduler;
pub mod service;
