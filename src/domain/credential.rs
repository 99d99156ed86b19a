//! Credential payload encoded into QR codes and decoded at the door.

/// Line marker that carries the identity key inside a scanned payload.
pub const EMAIL_MARKER: &str = "Email:";

/// The plain-text payload encoded into a guest's QR credential.
///
/// The format is a fixed three-line key-value text, not JSON, so any
/// off-the-shelf scanner app shows something human-readable and the
/// check-in endpoint can recover the email with a line scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPayload {
    /// Guest name.
    pub name: String,
    /// Guest phone number.
    pub phone: String,
    /// Guest email, the identity key for check-in.
    pub email: String,
}

impl CredentialPayload {
    /// Renders the canonical three-line payload text.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "Name: {}\nPhone: {}\nEmail: {}",
            self.name, self.phone, self.email
        )
    }

    /// Filesystem-safe stem for the cached credential image of `email`.
    ///
    /// Every character outside `[A-Za-z0-9.-_+]` maps to `_`. The mapping
    /// is stable, so the same guest always hits the same cache file.
    #[must_use]
    pub fn artifact_stem(email: &str) -> String {
        email
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | '+') {
                    ch
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Recovers the email from a scanned payload.
///
/// Scans line by line for the first line containing [`EMAIL_MARKER`] and
/// returns the trimmed remainder after the marker. Returns `None` when no
/// line carries the marker or the remainder is empty, so a scan of some
/// unrelated QR code is rejected rather than matched against the ledger.
#[must_use]
pub fn extract_email(scanned: &str) -> Option<String> {
    for line in scanned.lines() {
        if let Some((_, rest)) = line.split_once(EMAIL_MARKER) {
            let email = rest.trim();
            if email.is_empty() {
                return None;
            }
            return Some(email.to_string());
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_three_lines() {
        let payload = CredentialPayload {
            name: "Alice".to_string(),
            phone: "+7 777 000 11 22".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert_eq!(
            payload.encode(),
            "Name: Alice\nPhone: +7 777 000 11 22\nEmail: alice@example.com"
        );
    }

    #[test]
    fn extract_round_trips_encode() {
        let payload = CredentialPayload {
            name: "Bob".to_string(),
            phone: "555".to_string(),
            email: "bob@example.com".to_string(),
        };
        assert_eq!(
            extract_email(&payload.encode()).as_deref(),
            Some("bob@example.com")
        );
    }

    #[test]
    fn extract_takes_first_marker_line() {
        let scanned = "Name: X\nEmail: first@example.com\nEmail: second@example.com";
        assert_eq!(extract_email(scanned).as_deref(), Some("first@example.com"));
    }

    #[test]
    fn extract_rejects_payload_without_marker() {
        assert!(extract_email("https://example.com/some-other-qr").is_none());
        assert!(extract_email("").is_none());
    }

    #[test]
    fn extract_rejects_empty_email() {
        assert!(extract_email("Name: X\nEmail:   ").is_none());
    }

    #[test]
    fn artifact_stem_keeps_safe_characters() {
        assert_eq!(
            CredentialPayload::artifact_stem("alice@example.com"),
            "alice_example.com"
        );
        assert_eq!(
            CredentialPayload::artifact_stem("a.b-c_d+e@x.kz"),
            "a.b-c_d+e_x.kz"
        );
        assert_eq!(CredentialPayload::artifact_stem("weird/\\name"), "weird__name");
    }
}
