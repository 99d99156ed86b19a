//! Tabular ledger access.
//!
//! [`Ledger`] is the seam between the pipeline and the external store.
//! [`SheetsLedger`] talks to the Google Sheets v4 values API and is the
//! production implementation; [`InMemoryLedger`] backs tests and local
//! development without network access. Both address cells 1-based, the
//! way the sheet UI and the values API do.

pub mod auth;
mod memory;
mod sheets;

pub use memory::InMemoryLedger;
pub use sheets::SheetsLedger;

use async_trait::async_trait;

use crate::error::LedgerError;

/// Object-safe handle to the guest ledger.
///
/// Held as `Arc<dyn Ledger>` in application state so the processing
/// cycle, the check-in path, and tests all run against the same seam.
#[async_trait]
pub trait Ledger: Send + Sync + std::fmt::Debug {
    /// Reads the full table, header row included.
    ///
    /// Implementations must return rows of equal width (padded with empty
    /// cells where the backend right-trims), so positional parsing sees a
    /// rectangular grid.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the backend cannot be reached or
    /// returns an unusable response.
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, LedgerError>;

    /// Writes a single cell at the 1-based `(row, col)` address.
    ///
    /// Cell writes are the only mutation the pipeline performs and the
    /// backend applies each one atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Malformed`] for a 0 row or column, or any
    /// other [`LedgerError`] when the backend rejects the write.
    async fn write_cell(&self, row: usize, col: usize, value: &str) -> Result<(), LedgerError>;
}
