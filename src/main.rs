//! qonaq-gate server entry point.
//!
//! Starts the background ledger sync loop and the Axum HTTP server.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use qonaq_gate::api;
use qonaq_gate::app_state::AppState;
use qonaq_gate::config::{AppConfig, MailerKind};
use qonaq_gate::credential::CredentialGenerator;
use qonaq_gate::delivery::{ConsoleMailer, Mailer, SmtpMailer, TemplateStore};
use qonaq_gate::domain::LedgerSchema;
use qonaq_gate::ledger::{Ledger, SheetsLedger};
use qonaq_gate::scheduler;
use qonaq_gate::service::GuestService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        schema = %config.schema_version,
        "starting qonaq-gate"
    );

    // Build ledger access
    let ledger: Arc<dyn Ledger> = Arc::new(SheetsLedger::new(
        config.service_account.clone(),
        config.spreadsheet_id.clone(),
        config.sheet_name.clone(),
    ));

    // Build mail transport
    let mailer: Arc<dyn Mailer> = match config.mailer {
        MailerKind::Smtp => Arc::new(SmtpMailer::new(
            config.smtp_host.clone(),
            config.smtp_port,
            config.smtp_user.clone(),
            config.smtp_password.clone(),
        )),
        MailerKind::Console => Arc::new(ConsoleMailer::new()),
    };

    // Optional brand logo, inlined into every invite
    let logo_png = match &config.brand_asset {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "brand asset unreadable, sending invites without a logo"
                );
                None
            }
        },
        None => None,
    };

    // Build service layer
    let guest_service = Arc::new(GuestService::new(
        ledger,
        mailer,
        CredentialGenerator::new(config.qr_output_dir.clone()),
        TemplateStore::new(config.template_dir.clone()),
        LedgerSchema::for_version(config.schema_version),
        config.send_delay,
        logo_png,
    ));

    // Start the background sync loop
    tokio::spawn(scheduler::run(
        Arc::clone(&guest_service),
        config.sync_interval,
    ));

    // Build application state and router
    let app_state = AppState { guest_service };
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
