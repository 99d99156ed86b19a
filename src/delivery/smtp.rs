//! SMTP transport over a STARTTLS relay.
//!
//! A fresh transport is built for every send, so a dropped relay
//! connection can never strand later messages in a stale pool. The
//! blocking send runs on the blocking thread pool.

use std::fmt;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{Invite, LOGO_CONTENT_ID, Mailer, QR_CONTENT_ID};
use crate::error::DeliveryError;

/// Production [`Mailer`] over an authenticated STARTTLS relay.
pub struct SmtpMailer {
    host: String,
    port: u16,
    user: String,
    password: String,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SmtpMailer {
    /// Creates a mailer for an authenticated relay.
    ///
    /// `user` doubles as the sender address, the way a personal SMTP
    /// account is normally used.
    #[must_use]
    pub fn new(host: String, port: u16, user: String, password: String) -> Self {
        Self {
            host,
            port,
            user,
            password,
        }
    }

    /// Builds a one-shot transport for a single send.
    fn build_transport(&self) -> Result<SmtpTransport, DeliveryError> {
        Ok(SmtpTransport::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(self.user.clone(), self.password.clone()))
            .build())
    }

    /// Assembles the MIME message: alternative(plain, related(html, images)).
    fn build_message(&self, invite: Invite) -> Result<Message, DeliveryError> {
        let from = self
            .user
            .parse::<Mailbox>()
            .map_err(|err| DeliveryError::Encoding(format!("invalid sender address: {err}")))?;
        let to = invite
            .to
            .parse::<Mailbox>()
            .map_err(|err| DeliveryError::Encoding(format!("invalid recipient address: {err}")))?;
        let png = ContentType::parse("image/png")
            .map_err(|err| DeliveryError::Encoding(format!("content type: {err}")))?;

        let mut related = MultiPart::related()
            .singlepart(SinglePart::html(invite.html))
            .singlepart(
                Attachment::new_inline(QR_CONTENT_ID.to_string())
                    .body(Body::new(invite.qr_png), png.clone()),
            );
        if let Some(logo) = invite.logo_png {
            related = related.singlepart(
                Attachment::new_inline(LOGO_CONTENT_ID.to_string()).body(Body::new(logo), png),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(invite.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(invite.text))
                    .multipart(related),
            )
            .map_err(|err| DeliveryError::Encoding(format!("message build failed: {err}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, invite: Invite) -> Result<(), DeliveryError> {
        let to = invite.to.clone();
        let message = self.build_message(invite)?;
        let transport = self.build_transport()?;

        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|err| DeliveryError::Other(format!("send task failed: {err}")))??;

        tracing::debug!(%to, code = %response.code(), "relay accepted message");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(
            "smtp.example.com".to_string(),
            587,
            "sender@example.com".to_string(),
            "app-password".to_string(),
        )
    }

    fn invite(to: &str, logo: Option<Vec<u8>>) -> Invite {
        Invite {
            to: to.to_string(),
            subject: "Ваш QR-код".to_string(),
            text: "plain".to_string(),
            html: format!("<img src=\"cid:{QR_CONTENT_ID}\">"),
            qr_png: vec![0x89, b'P', b'N', b'G'],
            logo_png: logo,
        }
    }

    #[test]
    fn message_carries_both_content_ids_when_logo_present() {
        let built = mailer().build_message(invite("guest@example.com", Some(vec![1, 2])));
        let Ok(message) = built else {
            panic!("message should build");
        };
        let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("multipart/related"));
        assert!(formatted.contains(&format!("<{QR_CONTENT_ID}>")));
        assert!(formatted.contains(&format!("<{LOGO_CONTENT_ID}>")));
    }

    #[test]
    fn message_omits_logo_part_when_absent() {
        let Ok(message) = mailer().build_message(invite("guest@example.com", None)) else {
            panic!("message should build");
        };
        let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(formatted.contains(&format!("<{QR_CONTENT_ID}>")));
        assert!(!formatted.contains(&format!("<{LOGO_CONTENT_ID}>")));
    }

    #[test]
    fn invalid_recipient_is_an_encoding_error() {
        let result = mailer().build_message(invite("not an address", None));
        assert!(matches!(result, Err(DeliveryError::Encoding(_))));
    }

    #[test]
    fn debug_never_prints_the_password() {
        let rendered = format!("{:?}", mailer());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("app-password"));
    }
}
