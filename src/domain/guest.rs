//! Guest records parsed positionally from ledger rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::LedgerSchema;

/// Message language selected per guest.
///
/// Exactly two locales are supported. Anything else in the language cell
/// (including an empty cell on older schemas) falls back deterministically
/// to Russian so a typo never crashes a send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Russian (the fixed fallback).
    #[default]
    Ru,
    /// Kazakh.
    Kz,
}

impl Language {
    /// Parses a language cell, falling back to [`Language::Ru`].
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().eq_ignore_ascii_case("kz") {
            Self::Kz
        } else {
            Self::Ru
        }
    }

    /// Lowercase locale code, also used as the template file suffix.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::Kz => "kz",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status parsed from the status cell.
///
/// `done` and `error` are terminal: the processor never touches such a row
/// again, which is what makes a cycle idempotent. Every other cell value
/// (including empty) reads as pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendStatus {
    /// Not processed yet, or status cleared by an operator requeue.
    #[default]
    Pending,
    /// Credential generated and delivered.
    Done,
    /// A previous attempt failed; waiting for an operator requeue.
    Error,
}

impl SendStatus {
    /// Parses a status cell, case-insensitively.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        let value = cell.trim();
        if value.eq_ignore_ascii_case(super::schema::STATUS_DONE) {
            Self::Done
        } else if value.eq_ignore_ascii_case(super::schema::STATUS_ERROR) {
            Self::Error
        } else {
            Self::Pending
        }
    }

    /// `true` for `done` and `error` — rows the processor must never touch.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// One data row of the ledger, parsed against a [`LedgerSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRecord {
    /// 0-based row index in the full table, header included. The 1-based
    /// sheet row for writes is `row_index + 1`.
    pub row_index: usize,
    /// Guest email — the identity key for credentials and check-in.
    pub email: String,
    /// Guest name as entered in the sheet.
    pub name: String,
    /// Guest phone number.
    pub phone: String,
    /// Message language for the invitation.
    pub language: Language,
    /// Current processing status.
    pub status: SendStatus,
}

impl GuestRecord {
    /// Parses a row positionally.
    ///
    /// Returns `None` when the row has fewer columns than the schema
    /// requires — a partially filled entry still being typed into the
    /// sheet, skipped without side effects.
    #[must_use]
    pub fn from_row(schema: &LedgerSchema, row_index: usize, row: &[String]) -> Option<Self> {
        if row.len() < schema.min_columns() {
            return None;
        }
        let cell = |col: usize| {
            row.get(col)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let language = schema
            .language_col()
            .map(|col| Language::from_cell(&cell(col)))
            .unwrap_or_default();
        Some(Self {
            row_index,
            email: cell(schema.email_col()),
            name: cell(schema.name_col()),
            phone: cell(schema.phone_col()),
            language,
            status: SendStatus::from_cell(&cell(schema.status_col())),
        })
    }

    /// The eligibility predicate of the processing cycle.
    ///
    /// A row is processed only when name, phone, and email are all present
    /// and the status is not terminal. Everything else is skipped with no
    /// side effect, so re-running a cycle never re-sends a credential.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.name.is_empty()
            && !self.phone.is_empty()
            && !self.email.is_empty()
            && !self.status.is_terminal()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row_v3(email: &str, name: &str, phone: &str, language: &str, status: &str) -> Vec<String> {
        let mut row = vec![String::new(); 11];
        for (col, value) in [(0, email), (1, name), (2, phone), (3, language), (9, status)] {
            if let Some(cell) = row.get_mut(col) {
                *cell = value.to_string();
            }
        }
        row
    }

    #[test]
    fn parses_a_full_row() {
        let schema = LedgerSchema::v3();
        let row = row_v3("alice@example.com", "Alice", "123", "kz", "");
        let Some(guest) = GuestRecord::from_row(&schema, 1, &row) else {
            panic!("full row should parse");
        };
        assert_eq!(guest.email, "alice@example.com");
        assert_eq!(guest.name, "Alice");
        assert_eq!(guest.phone, "123");
        assert_eq!(guest.language, Language::Kz);
        assert_eq!(guest.status, SendStatus::Pending);
        assert!(guest.is_eligible());
    }

    #[test]
    fn short_row_does_not_parse() {
        let schema = LedgerSchema::v3();
        let row = vec!["alice@example.com".to_string(), "Alice".to_string()];
        assert!(GuestRecord::from_row(&schema, 1, &row).is_none());
    }

    #[test]
    fn missing_required_fields_are_ineligible() {
        let schema = LedgerSchema::v3();
        for row in [
            row_v3("", "Alice", "123", "ru", ""),
            row_v3("alice@example.com", "", "123", "ru", ""),
            row_v3("alice@example.com", "Alice", "", "ru", ""),
        ] {
            let Some(guest) = GuestRecord::from_row(&schema, 1, &row) else {
                panic!("row should parse");
            };
            assert!(!guest.is_eligible());
        }
    }

    #[test]
    fn terminal_statuses_are_ineligible() {
        let schema = LedgerSchema::v3();
        for status in ["done", "Done", "DONE", "error", " Error "] {
            let row = row_v3("alice@example.com", "Alice", "123", "ru", status);
            let Some(guest) = GuestRecord::from_row(&schema, 1, &row) else {
                panic!("row should parse");
            };
            assert!(!guest.is_eligible(), "status {status:?} must be terminal");
        }
    }

    #[test]
    fn unknown_status_reads_as_pending() {
        assert_eq!(SendStatus::from_cell("sending..."), SendStatus::Pending);
        assert_eq!(SendStatus::from_cell(""), SendStatus::Pending);
    }

    #[test]
    fn language_falls_back_to_russian() {
        assert_eq!(Language::from_cell("kz"), Language::Kz);
        assert_eq!(Language::from_cell("KZ"), Language::Kz);
        assert_eq!(Language::from_cell("ru"), Language::Ru);
        assert_eq!(Language::from_cell("en"), Language::Ru);
        assert_eq!(Language::from_cell(""), Language::Ru);
    }

    #[test]
    fn v1_rows_have_no_language_column() {
        let schema = LedgerSchema::v1();
        let mut row = vec![String::new(); 8];
        for (col, value) in [(0, "bob@example.com"), (1, "Bob"), (2, "555")] {
            if let Some(cell) = row.get_mut(col) {
                *cell = value.to_string();
            }
        }
        let Some(guest) = GuestRecord::from_row(&schema, 2, &row) else {
            panic!("v1 row should parse");
        };
        assert_eq!(guest.language, Language::Ru);
        assert!(guest.is_eligible());
    }
}
