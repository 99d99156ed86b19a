//! Localized invitation rendering.
//!
//! Subjects and plain-text bodies are fixed per language; the HTML body
//! is loaded from `invite_{lang}.html` under the template directory so
//! operators can restyle it without a rebuild. Rendering is plain
//! placeholder substitution of `{{name}}` and `{{nonce}}`, no template
//! engine.

use std::path::PathBuf;

use rand::Rng;
use tokio::fs;

use crate::domain::Language;
use crate::error::DeliveryError;

const SUBJECT_RU: &str = "Ваш QR-код";
const SUBJECT_KZ: &str = "Сіздің QR-кодыңыз";

const TEXT_RU: &str = "Здравствуйте, {{name}}!\n\n\
Ваш пригласительный QR-код во вложении. Пожалуйста, сохраните это письмо \
и предъявите код на входе.\n\nКод приглашения: {{nonce}}";

const TEXT_KZ: &str = "Сәлеметсіз бе, {{name}}!\n\n\
Шақыру QR-кодыңыз хатқа тіркелген. Осы хатты сақтап, кодты кіре берісте \
көрсетіңіз.\n\nШақыру коды: {{nonce}}";

/// A rendered subject, plain body, and HTML body for one guest.
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    /// Localized subject line.
    pub subject: String,
    /// Plain-text body with placeholders substituted.
    pub text: String,
    /// HTML body with placeholders substituted.
    pub html: String,
    /// The six-digit nonce substituted into both bodies.
    pub nonce: u32,
}

/// Loads and renders the localized invitation templates.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    template_dir: PathBuf,
}

impl TemplateStore {
    /// Creates a store reading templates under `template_dir`.
    #[must_use]
    pub fn new(template_dir: PathBuf) -> Self {
        Self { template_dir }
    }

    /// Path of the HTML template for `language`.
    #[must_use]
    pub fn template_path(&self, language: Language) -> PathBuf {
        self.template_dir.join(format!("invite_{language}.html"))
    }

    /// Renders the invitation for one guest.
    ///
    /// Each render draws a fresh six-digit nonce; uniqueness across
    /// guests is best-effort, the nonce is a human cross-check at the
    /// door rather than a credential.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::TemplateMissing`] when no template file
    /// exists for `language`, or [`DeliveryError::Other`] when the file
    /// cannot be read.
    pub async fn render(
        &self,
        language: Language,
        name: &str,
    ) -> Result<RenderedTemplate, DeliveryError> {
        let path = self.template_path(language);
        let html_template = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeliveryError::TemplateMissing { language, path });
            }
            Err(err) => {
                return Err(DeliveryError::Other(format!(
                    "template {} unreadable: {err}",
                    path.display()
                )));
            }
        };

        let nonce = rand::thread_rng().gen_range(100_000..=999_999);
        let (subject, text_template) = match language {
            Language::Ru => (SUBJECT_RU, TEXT_RU),
            Language::Kz => (SUBJECT_KZ, TEXT_KZ),
        };

        Ok(RenderedTemplate {
            subject: subject.to_string(),
            text: substitute(text_template, name, nonce),
            html: substitute(&html_template, name, nonce),
            nonce,
        })
    }
}

/// Replaces every `{{name}}` and `{{nonce}}` occurrence.
fn substitute(template: &str, name: &str, nonce: u32) -> String {
    template
        .replace("{{name}}", name)
        .replace("{{nonce}}", &nonce.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn store_with_templates() -> (tempfile::TempDir, TemplateStore) {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let ru = dir.path().join("invite_ru.html");
        if std::fs::write(&ru, "<p>Привет, {{name}}! Код: {{nonce}}</p>").is_err() {
            panic!("seed template");
        }
        let store = TemplateStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn substitutes_name_and_nonce() {
        let (_dir, store) = store_with_templates();
        let Ok(rendered) = store.render(Language::Ru, "Алия").await else {
            panic!("render should succeed");
        };
        assert!(rendered.html.contains("Привет, Алия!"));
        assert!(rendered.html.contains(&rendered.nonce.to_string()));
        assert!(!rendered.html.contains("{{name}}"));
        assert!(!rendered.html.contains("{{nonce}}"));
        assert!(rendered.text.contains("Алия"));
        assert!(rendered.text.contains(&rendered.nonce.to_string()));
        assert_eq!(rendered.subject, SUBJECT_RU);
    }

    #[tokio::test]
    async fn nonce_stays_six_digits() {
        let (_dir, store) = store_with_templates();
        for _ in 0..32 {
            let Ok(rendered) = store.render(Language::Ru, "x").await else {
                panic!("render should succeed");
            };
            assert!((100_000..=999_999).contains(&rendered.nonce));
        }
    }

    #[tokio::test]
    async fn missing_template_is_reported_with_language_and_path() {
        let (dir, store) = store_with_templates();
        let result = store.render(Language::Kz, "x").await;
        let Err(DeliveryError::TemplateMissing { language, path }) = result else {
            panic!("expected TemplateMissing");
        };
        assert_eq!(language, Language::Kz);
        assert_eq!(path, dir.path().join("invite_kz.html"));
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let rendered = substitute("{{name}} and {{name}}: {{nonce}}/{{nonce}}", "A", 123_456);
        assert_eq!(rendered, "A and A: 123456/123456");
    }

    #[test]
    fn shipped_templates_reference_only_the_qr_part() {
        use crate::delivery::{LOGO_CONTENT_ID, QR_CONTENT_ID};

        for lang in ["ru", "kz"] {
            let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("templates")
                .join(format!("invite_{lang}.html"));
            let Ok(raw) = std::fs::read_to_string(&path) else {
                panic!("shipped template for {lang} missing");
            };
            assert!(raw.contains(&format!("cid:{QR_CONTENT_ID}")));
            assert!(
                !raw.contains(&format!("cid:{LOGO_CONTENT_ID}")),
                "defaults must render without a brand asset configured"
            );
            assert!(raw.contains("{{name}}"));
            assert!(raw.contains("{{nonce}}"));
        }
    }
}
