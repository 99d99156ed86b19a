//! Invitation delivery.
//!
//! [`Mailer`] is the transport seam: [`SmtpMailer`] sends real mail over
//! a STARTTLS relay, [`ConsoleMailer`] logs instead of sending for local
//! runs and tests. Rendering happens before the seam, in
//! [`TemplateStore`], so every transport delivers the exact same bytes.

mod console;
mod smtp;
mod template;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;
pub use template::{RenderedTemplate, TemplateStore};

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Content ID the HTML templates use to reference the inline QR image.
pub const QR_CONTENT_ID: &str = "qr-code";

/// Content ID for the inline brand asset. The shipped templates do not
/// reference it; operator templates may, paired with `BRAND_ASSET`.
pub const LOGO_CONTENT_ID: &str = "brand-logo";

/// A fully rendered invitation, ready for transport.
///
/// Sent as `multipart/alternative` with a plain-text part and a
/// `multipart/related` HTML part carrying the inline images.
#[derive(Debug, Clone)]
pub struct Invite {
    /// Recipient address.
    pub to: String,
    /// Localized subject line.
    pub subject: String,
    /// Plain-text alternative body.
    pub text: String,
    /// HTML body referencing inline parts by content ID.
    pub html: String,
    /// Credential PNG inlined under [`QR_CONTENT_ID`].
    pub qr_png: Vec<u8>,
    /// Optional brand asset inlined under [`LOGO_CONTENT_ID`].
    pub logo_png: Option<Vec<u8>>,
}

/// Object-safe invitation transport.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Delivers one invitation.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the message cannot be assembled or
    /// the transport rejects it. Classification (transport vs. encoding)
    /// feeds logs only; the caller reacts to every failure the same way.
    async fn send(&self, invite: Invite) -> Result<(), DeliveryError>;
}
