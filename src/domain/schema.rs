//! Versioned column layout of the guest ledger.
//!
//! The ledger is a plain spreadsheet whose column set changed across
//! revisions with no migration path, so the layout is an explicit startup
//! choice instead of hard-coded offsets: [`LedgerSchema`] maps every logical
//! field to a 0-based column index, and [`SchemaVersion`] selects one of the
//! known revisions. Adding a column to the sheet is a configuration change,
//! not a code change.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Status cell value for a successfully delivered credential.
pub const STATUS_DONE: &str = "done";

/// Status cell value for a failed delivery attempt. Terminal: the row is
/// never retried until an operator requeues it.
pub const STATUS_ERROR: &str = "error";

/// Value written into the check-in column. Idempotent to overwrite.
pub const CHECKIN_MARK: &str = "checked_in";

/// Known revisions of the ledger column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Legacy 8-column sheet: no language and no check-in column.
    V1,
    /// 9-column sheet adding the check-in column.
    V2,
    /// Current 11-column sheet adding the language column.
    V3,
}

impl FromStr for SchemaVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "v1" => Ok(Self::V1),
            "2" | "v2" => Ok(Self::V2),
            "3" | "v3" => Ok(Self::V3),
            other => Err(ConfigError::Invalid {
                key: "SCHEMA_VERSION",
                reason: format!("unknown schema version {other:?}"),
            }),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
            Self::V3 => write!(f, "v3"),
        }
    }
}

/// Named-field descriptor mapping logical guest fields to column indices.
///
/// All indices are 0-based positions inside a row as returned by
/// [`crate::ledger::Ledger::read_all_rows`]. Ledger writes use the 1-based
/// convention of the values API; callers convert with `+ 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    version: SchemaVersion,
    email: usize,
    name: usize,
    phone: usize,
    language: Option<usize>,
    status: usize,
    checkin: Option<usize>,
}

impl LedgerSchema {
    /// Layout of the legacy 8-column sheet.
    #[must_use]
    pub const fn v1() -> Self {
        Self {
            version: SchemaVersion::V1,
            email: 0,
            name: 1,
            phone: 2,
            language: None,
            status: 7,
            checkin: None,
        }
    }

    /// Layout of the 9-column sheet with a check-in column.
    #[must_use]
    pub const fn v2() -> Self {
        Self {
            version: SchemaVersion::V2,
            email: 0,
            name: 1,
            phone: 2,
            language: None,
            status: 7,
            checkin: Some(8),
        }
    }

    /// Layout of the current 11-column sheet.
    #[must_use]
    pub const fn v3() -> Self {
        Self {
            version: SchemaVersion::V3,
            email: 0,
            name: 1,
            phone: 2,
            language: Some(3),
            status: 9,
            checkin: Some(10),
        }
    }

    /// Returns the layout for the given version.
    #[must_use]
    pub const fn for_version(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::V1 => Self::v1(),
            SchemaVersion::V2 => Self::v2(),
            SchemaVersion::V3 => Self::v3(),
        }
    }

    /// The version this layout belongs to.
    #[must_use]
    pub const fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Column of the guest email (the check-in identity key).
    #[must_use]
    pub const fn email_col(&self) -> usize {
        self.email
    }

    /// Column of the guest name.
    #[must_use]
    pub const fn name_col(&self) -> usize {
        self.name
    }

    /// Column of the guest phone number.
    #[must_use]
    pub const fn phone_col(&self) -> usize {
        self.phone
    }

    /// Column of the message language, if this revision has one.
    #[must_use]
    pub const fn language_col(&self) -> Option<usize> {
        self.language
    }

    /// Column of the processing status.
    #[must_use]
    pub const fn status_col(&self) -> usize {
        self.status
    }

    /// Column of the check-in marker, if this revision has one.
    #[must_use]
    pub const fn checkin_col(&self) -> Option<usize> {
        self.checkin
    }

    /// Minimum row width required for positional parsing.
    ///
    /// Rows shorter than this are skipped by the processor — they are
    /// partially filled entries still being typed into the sheet.
    #[must_use]
    pub const fn min_columns(&self) -> usize {
        self.status + 1
    }
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self::v3()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn v1_matches_legacy_offsets() {
        let schema = LedgerSchema::v1();
        assert_eq!(schema.email_col(), 0);
        assert_eq!(schema.name_col(), 1);
        assert_eq!(schema.phone_col(), 2);
        assert_eq!(schema.status_col(), 7);
        assert_eq!(schema.language_col(), None);
        assert_eq!(schema.checkin_col(), None);
        assert_eq!(schema.min_columns(), 8);
    }

    #[test]
    fn v2_adds_checkin_column() {
        let schema = LedgerSchema::v2();
        assert_eq!(schema.status_col(), 7);
        assert_eq!(schema.checkin_col(), Some(8));
        assert_eq!(schema.min_columns(), 8);
    }

    #[test]
    fn v3_is_the_default() {
        let schema = LedgerSchema::default();
        assert_eq!(schema.version(), SchemaVersion::V3);
        assert_eq!(schema.language_col(), Some(3));
        assert_eq!(schema.status_col(), 9);
        assert_eq!(schema.checkin_col(), Some(10));
        assert_eq!(schema.min_columns(), 10);
    }

    #[test]
    fn version_parses_both_spellings() {
        let Ok(v) = "2".parse::<SchemaVersion>() else {
            panic!("bare digit should parse");
        };
        assert_eq!(v, SchemaVersion::V2);

        let Ok(v) = " v3 ".parse::<SchemaVersion>() else {
            panic!("prefixed form should parse");
        };
        assert_eq!(v, SchemaVersion::V3);
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!("4".parse::<SchemaVersion>().is_err());
        assert!("latest".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn for_version_round_trips() {
        for version in [SchemaVersion::V1, SchemaVersion::V2, SchemaVersion::V3] {
            assert_eq!(LedgerSchema::for_version(version).version(), version);
        }
    }
}
