//! Logging mailer for local runs and tests.

use async_trait::async_trait;

use super::{Invite, Mailer};
use crate::error::DeliveryError;

/// [`Mailer`] that logs invitations instead of sending them.
///
/// Useful against a copy of the real ledger: the pipeline runs end to
/// end, rows still transition to `done`, and nobody gets mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Creates a console mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, invite: Invite) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %invite.to,
            subject = %invite.subject,
            qr_bytes = invite.qr_png.len(),
            has_logo = invite.logo_png.is_some(),
            "invitation rendered (console mailer, nothing sent)"
        );
        tracing::debug!(body = %invite.text, "invitation plain body");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_success() {
        let invite = Invite {
            to: "guest@example.com".to_string(),
            subject: "s".to_string(),
            text: "t".to_string(),
            html: "<p>h</p>".to_string(),
            qr_png: Vec::new(),
            logo_png: None,
        };
        assert!(ConsoleMailer::new().send(invite).await.is_ok());
    }
}
