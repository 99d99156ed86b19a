//! QR credential rendering and caching.
//!
//! Each guest gets one PNG under the output directory, named after the
//! email via [`CredentialPayload::artifact_stem`]. The payload is
//! deterministic, so an existing file is simply reused; fresh renders go
//! through a temp file renamed into place, so a concurrent reader never
//! sees a half-written image.

use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use image::{ImageFormat, Luma};
use qrcode::QrCode;
use tokio::fs;

use crate::domain::CredentialPayload;
use crate::error::GenerationError;

/// A rendered credential: the cached PNG and where it lives on disk.
#[derive(Debug, Clone)]
pub struct CredentialArtifact {
    /// Location of the cached PNG.
    pub path: PathBuf,
    /// PNG bytes, ready to inline into a message.
    pub png: Vec<u8>,
}

/// Renders guest payloads into cached QR PNGs.
#[derive(Debug, Clone)]
pub struct CredentialGenerator {
    output_dir: PathBuf,
}

impl CredentialGenerator {
    /// Creates a generator writing under `output_dir`.
    ///
    /// The directory is created on first use, not here, so constructing
    /// state cannot fail.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// The stable artifact path for a guest email.
    #[must_use]
    pub fn artifact_path(&self, email: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.png", CredentialPayload::artifact_stem(email)))
    }

    /// Returns the credential for `payload`, rendering it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the payload cannot be encoded as
    /// a QR symbol, the PNG cannot be produced, or the artifact cannot be
    /// written.
    pub async fn generate(
        &self,
        payload: &CredentialPayload,
    ) -> Result<CredentialArtifact, GenerationError> {
        let path = self.artifact_path(&payload.email);

        match fs::read(&path).await {
            Ok(png) => {
                tracing::debug!(path = %path.display(), "credential cache hit");
                return Ok(CredentialArtifact { path, png });
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(GenerationError::Io(err)),
        }

        let code = QrCode::new(payload.encode().as_bytes())?;
        let rendered = code.render::<Luma<u8>>().build();
        let mut png = Vec::new();
        rendered.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        fs::create_dir_all(&self.output_dir).await?;
        let staging = path.with_extension("png.tmp");
        fs::write(&staging, &png).await?;
        fs::rename(&staging, &path).await?;
        tracing::debug!(path = %path.display(), bytes = png.len(), "credential rendered");

        Ok(CredentialArtifact { path, png })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    fn payload(email: &str) -> CredentialPayload {
        CredentialPayload {
            name: "Alice".to_string(),
            phone: "+7 777 000 11 22".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn renders_a_png_at_the_email_derived_path() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let generator = CredentialGenerator::new(dir.path().to_path_buf());
        let Ok(artifact) = generator.generate(&payload("alice@example.com")).await else {
            panic!("generation should succeed");
        };
        assert_eq!(artifact.path, dir.path().join("alice_example.com.png"));
        assert!(artifact.path.is_file());
        assert!(artifact.png.starts_with(&PNG_MAGIC));
    }

    #[tokio::test]
    async fn reuses_an_existing_artifact() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let generator = CredentialGenerator::new(dir.path().to_path_buf());
        let path = generator.artifact_path("bob@example.com");
        if std::fs::write(&path, b"sentinel").is_err() {
            panic!("seed write");
        }
        let Ok(artifact) = generator.generate(&payload("bob@example.com")).await else {
            panic!("generation should succeed");
        };
        assert_eq!(artifact.png, b"sentinel");
    }

    #[tokio::test]
    async fn leaves_no_staging_file_behind() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let generator = CredentialGenerator::new(dir.path().to_path_buf());
        if generator.generate(&payload("carol@example.com")).await.is_err() {
            panic!("generation should succeed");
        }
        let Ok(entries) = std::fs::read_dir(dir.path()) else {
            panic!("read_dir");
        };
        let names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["carol_example.com.png".to_string()]);
    }
}
