//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Required variables fail startup
//! loudly with the variable name; optional ones fall back to defaults.
//! Blank values count as absent across the board.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::SchemaVersion;
use crate::error::ConfigError;
use crate::ledger::auth::ServiceAccountKey;

/// Which mail transport to wire at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailerKind {
    /// Authenticated STARTTLS relay (the default).
    #[default]
    Smtp,
    /// Log-only transport for dry runs against a real ledger.
    Console,
}

impl FromStr for MailerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "console" => Ok(Self::Console),
            other => Err(ConfigError::Invalid {
                key: "MAILER",
                reason: format!("unknown mailer {other:?}"),
            }),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Spreadsheet holding the guest ledger.
    pub spreadsheet_id: String,

    /// Sheet (tab) name inside the spreadsheet.
    pub sheet_name: String,

    /// Service-account key for the Sheets API.
    pub service_account: ServiceAccountKey,

    /// Ledger column layout revision.
    pub schema_version: SchemaVersion,

    /// Mail transport selection.
    pub mailer: MailerKind,

    /// SMTP relay host.
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS).
    pub smtp_port: u16,

    /// SMTP login, doubling as the sender address.
    pub smtp_user: String,

    /// SMTP password (an app password for personal accounts).
    pub smtp_password: String,

    /// Pause between processing cycles, at least one second.
    pub sync_interval: Duration,

    /// Pause between consecutive send attempts inside one cycle.
    pub send_delay: Duration,

    /// Directory for cached credential PNGs.
    pub qr_output_dir: PathBuf,

    /// Directory holding the `invite_{lang}.html` templates.
    pub template_dir: PathBuf,

    /// Optional PNG inlined into messages as the brand logo. Templates
    /// reference it as `cid:brand-logo`; the shipped defaults do not.
    pub brand_asset: Option<PathBuf>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("listen_addr", &self.listen_addr)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("service_account", &self.service_account)
            .field("schema_version", &self.schema_version)
            .field("mailer", &self.mailer)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &"<redacted>")
            .field("sync_interval", &self.sync_interval)
            .field("send_delay", &self.send_delay)
            .field("qr_output_dir", &self.qr_output_dir)
            .field("template_dir", &self.template_dir)
            .field("brand_asset", &self.brand_asset)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a required variable is unset
    /// or blank, and [`ConfigError::Invalid`] when a set variable cannot
    /// be parsed or the sync interval is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = require("PORT")?
            .trim()
            .parse()
            .map_err(|err| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{err}"),
            })?;
        let listen_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let spreadsheet_id = require("SPREADSHEET_ID")?;
        let sheet_name = env_or("SHEET_NAME", "Sheet1");
        let raw_key = require("GOOGLE_CREDENTIALS_JSON")?;
        let service_account =
            ServiceAccountKey::from_json(&raw_key).map_err(|err| ConfigError::Invalid {
                key: "GOOGLE_CREDENTIALS_JSON",
                reason: err.to_string(),
            })?;

        let schema_version = match env_nonblank("SCHEMA_VERSION") {
            Some(raw) => raw.parse()?,
            None => SchemaVersion::V3,
        };
        let mailer = match env_nonblank("MAILER") {
            Some(raw) => raw.parse()?,
            None => MailerKind::Smtp,
        };

        let smtp_host = env_or("SMTP_HOST", "smtp.gmail.com");
        let smtp_port = parse_optional("SMTP_PORT", 587)?;
        let smtp_user = require("SMTP_USER")?;
        let smtp_password = require("SMTP_PASSWORD")?;

        let sync_interval = nonzero_secs(
            "SYNC_INTERVAL_SECS",
            parse_optional("SYNC_INTERVAL_SECS", 30)?,
        )?;
        let send_delay = Duration::from_secs(parse_optional("SEND_DELAY_SECS", 1)?);

        let qr_output_dir = PathBuf::from(env_or("QR_OUTPUT_DIR", "qrcodes"));
        let template_dir = PathBuf::from(env_or("TEMPLATE_DIR", "templates"));
        let brand_asset = env_nonblank("BRAND_ASSET").map(PathBuf::from);

        Ok(Self {
            listen_addr,
            spreadsheet_id,
            sheet_name,
            service_account,
            schema_version,
            mailer,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_password,
            sync_interval,
            send_delay,
            qr_output_dir,
            template_dir,
            brand_asset,
        })
    }
}

/// Reads a required variable; unset or blank is a fatal error.
fn require(key: &'static str) -> Result<String, ConfigError> {
    env_nonblank(key).ok_or(ConfigError::Missing(key))
}

/// Reads an optional variable, falling back to `default` when unset.
fn env_or(key: &str, default: &str) -> String {
    env_nonblank(key).unwrap_or_else(|| default.to_string())
}

/// Reads a variable, mapping blank to absent.
fn env_nonblank(key: &str) -> Option<String> {
    nonblank(std::env::var(key).ok())
}

/// Blank values count as absent everywhere in this configuration.
fn nonblank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses an optional variable as `T`; blank counts as unset, while a
/// set-but-unparsable value is a fatal error rather than a silent
/// fallback.
fn parse_optional<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    parse_or_default(key, env_nonblank(key), default)
}

fn parse_or_default<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
        }),
        None => Ok(default),
    }
}

/// Whole seconds to a `Duration`, rejecting zero. The sync interval
/// drives a `tokio` interval timer, which needs a non-zero period.
fn nonzero_secs(key: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn mailer_kind_parses_both_transports() {
        assert_eq!("smtp".parse::<MailerKind>().ok(), Some(MailerKind::Smtp));
        assert_eq!("SMTP".parse::<MailerKind>().ok(), Some(MailerKind::Smtp));
        assert_eq!(
            "console".parse::<MailerKind>().ok(),
            Some(MailerKind::Console)
        );
    }

    #[test]
    fn mailer_kind_rejects_unknown_values() {
        let Err(ConfigError::Invalid { key, .. }) = "carrier-pigeon".parse::<MailerKind>() else {
            panic!("expected Invalid");
        };
        assert_eq!(key, "MAILER");
    }

    #[test]
    fn blank_values_count_as_absent() {
        assert_eq!(nonblank(Some(String::new())), None);
        assert_eq!(nonblank(Some("   ".to_string())), None);
        assert_eq!(nonblank(Some(" x ".to_string())).as_deref(), Some(" x "));
        assert_eq!(nonblank(None), None);
    }

    #[test]
    fn blank_optional_falls_back_to_its_default() {
        let Ok(port) = parse_or_default::<u16>("SMTP_PORT", None, 587) else {
            panic!("absent must use the default");
        };
        assert_eq!(port, 587);

        let Err(ConfigError::Invalid { key, .. }) =
            parse_or_default::<u16>("SMTP_PORT", Some("70000".to_string()), 587)
        else {
            panic!("unparsable must stay fatal");
        };
        assert_eq!(key, "SMTP_PORT");
    }

    #[test]
    fn zero_sync_interval_is_rejected() {
        let Err(ConfigError::Invalid { key, .. }) = nonzero_secs("SYNC_INTERVAL_SECS", 0) else {
            panic!("expected Invalid");
        };
        assert_eq!(key, "SYNC_INTERVAL_SECS");
        assert_eq!(
            nonzero_secs("SYNC_INTERVAL_SECS", 30).ok(),
            Some(Duration::from_secs(30))
        );
    }
}
