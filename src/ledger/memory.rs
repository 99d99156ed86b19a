//! In-memory ledger for tests and local development.
//!
//! Runs the full pipeline without a spreadsheet or network. Counters and
//! failure injection make cycle-isolation behavior observable from tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Ledger;
use crate::error::LedgerError;

/// [`Ledger`] over a plain in-process table.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    rows: RwLock<Vec<Vec<String>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryLedger {
    /// Creates a ledger seeded with `rows` (header first, like the sheet).
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Returns the cell at the 1-based `(row, col)` address, if present.
    pub async fn cell(&self, row: usize, col: usize) -> Option<String> {
        let table = self.rows.read().await;
        table
            .get(row.checked_sub(1)?)
            .and_then(|r| r.get(col.checked_sub(1)?))
            .cloned()
    }

    /// Number of completed read calls, failed ones included.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of completed write calls, failed ones included.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent read fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail until cleared.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn injected() -> LedgerError {
        LedgerError::Api {
            status: 503,
            message: "injected ledger failure".to_string(),
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        Ok(self.rows.read().await.clone())
    }

    async fn write_cell(&self, row: usize, col: usize, value: &str) -> Result<(), LedgerError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        if row == 0 || col == 0 {
            return Err(LedgerError::Malformed(
                "cell addresses are 1-based".to_string(),
            ));
        }
        let mut table = self.rows.write().await;
        if table.len() < row {
            table.resize_with(row, Vec::new);
        }
        if let Some(target) = table.get_mut(row - 1) {
            if target.len() < col {
                target.resize(col, String::new());
            }
            if let Some(cell) = target.get_mut(col - 1) {
                *cell = value.to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_returns_the_seeded_table() {
        let ledger = InMemoryLedger::new(vec![vec!["email".to_string(), "name".to_string()]]);
        let Ok(rows) = ledger.read_all_rows().await else {
            panic!("read should succeed");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(ledger.read_count(), 1);
    }

    #[tokio::test]
    async fn write_grows_the_table_as_needed() {
        let ledger = InMemoryLedger::default();
        let Ok(()) = ledger.write_cell(3, 10, "done").await else {
            panic!("write should succeed");
        };
        assert_eq!(ledger.cell(3, 10).await.as_deref(), Some("done"));
        assert_eq!(ledger.cell(1, 1).await, None, "grown rows stay empty");
        assert_eq!(ledger.write_count(), 1);
    }

    #[tokio::test]
    async fn write_rejects_zero_based_addresses() {
        let ledger = InMemoryLedger::default();
        assert!(ledger.write_cell(0, 1, "x").await.is_err());
        assert!(ledger.write_cell(1, 0, "x").await.is_err());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let ledger = InMemoryLedger::new(vec![vec!["a".to_string()]]);
        ledger.set_fail_reads(true);
        assert!(ledger.read_all_rows().await.is_err());
        ledger.set_fail_reads(false);
        assert!(ledger.read_all_rows().await.is_ok());

        ledger.set_fail_writes(true);
        assert!(ledger.write_cell(1, 1, "x").await.is_err());
        ledger.set_fail_writes(false);
        assert!(ledger.write_cell(1, 1, "x").await.is_ok());
        assert_eq!(ledger.cell(1, 1).await.as_deref(), Some("x"));
    }
}
