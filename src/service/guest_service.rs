//! Guest service: the processing cycle, check-in, and requeue.
//!
//! A cycle re-reads the whole ledger and walks it top to bottom; the
//! only state the service keeps between cycles is what the ledger
//! itself records in the status column. Row failures mark the row
//! `error` and move on, read failures abandon the cycle until the next
//! tick, so one bad guest or one flaky request never stalls the rest.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::credential::CredentialGenerator;
use crate::delivery::{Invite, Mailer, TemplateStore};
use crate::domain::schema::{CHECKIN_MARK, STATUS_DONE, STATUS_ERROR};
use crate::domain::{CredentialPayload, GuestRecord, LedgerSchema, SendStatus, extract_email};
use crate::error::{CheckInError, PipelineError};
use crate::ledger::Ledger;

/// Counters of one processing cycle, for logs and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Rows skipped: short, incomplete, or already terminal.
    pub skipped: usize,
    /// Rows delivered and marked `done`.
    pub sent: usize,
    /// Rows that failed and were marked `error`.
    pub failed: usize,
    /// Active rows sharing an email with an earlier active row.
    pub duplicates: usize,
}

/// Result of a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    /// 1-based ledger row that was marked.
    pub row: usize,
    /// Guest name from the matched row.
    pub name: String,
    /// Email the credential resolved to.
    pub email: String,
}

/// Orchestration layer for the guest pipeline.
///
/// Stateless between cycles: every operation re-reads the ledger, and
/// the status column is the only durable record. That is what makes a
/// restart safe and two of these (accidentally) mostly harmless.
#[derive(Debug)]
pub struct GuestService {
    ledger: Arc<dyn Ledger>,
    mailer: Arc<dyn Mailer>,
    generator: CredentialGenerator,
    templates: TemplateStore,
    schema: LedgerSchema,
    send_delay: Duration,
    logo_png: Option<Vec<u8>>,
}

impl GuestService {
    /// Creates a new `GuestService`.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn Ledger>,
        mailer: Arc<dyn Mailer>,
        generator: CredentialGenerator,
        templates: TemplateStore,
        schema: LedgerSchema,
        send_delay: Duration,
        logo_png: Option<Vec<u8>>,
    ) -> Self {
        Self {
            ledger,
            mailer,
            generator,
            templates,
            schema,
            send_delay,
            logo_png,
        }
    }

    /// Runs one full processing cycle over the ledger.
    ///
    /// Never returns an error: a failed read abandons the cycle with an
    /// error log, and per-row failures are recorded in the status column.
    pub async fn process_all_records(&self) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let rows = match self.ledger.read_all_rows().await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(%cycle_id, error = %err, "ledger read failed, cycle abandoned");
                return CycleReport::default();
            }
        };

        let mut report = CycleReport::default();
        let mut active_emails: HashSet<String> = HashSet::new();

        // Row 0 is the header.
        for (row_index, row) in rows.iter().enumerate().skip(1) {
            let Some(guest) = GuestRecord::from_row(&self.schema, row_index, row) else {
                report.skipped += 1;
                continue;
            };
            // Active means non-error, so delivered rows are tracked too.
            if !guest.email.is_empty()
                && guest.status != SendStatus::Error
                && !active_emails.insert(guest.email.clone())
            {
                report.duplicates += 1;
                tracing::warn!(
                    email = %guest.email,
                    row = row_index + 1,
                    "duplicate active email, check-in will match the first row"
                );
            }
            if !guest.is_eligible() {
                report.skipped += 1;
                continue;
            }

            if !guest.email.is_ascii() {
                tracing::warn!(
                    row = row_index + 1,
                    "email contains non-ascii characters, marking error"
                );
                self.mark_status(guest.row_index, STATUS_ERROR).await;
                report.failed += 1;
                continue;
            }

            match self.process_guest(&guest).await {
                Ok(()) => {
                    self.mark_status(guest.row_index, STATUS_DONE).await;
                    report.sent += 1;
                    tracing::info!(%cycle_id, email = %guest.email, "invitation delivered");
                }
                Err(err) => {
                    tracing::error!(
                        %cycle_id,
                        email = %guest.email,
                        error = %err,
                        "guest processing failed, marking error"
                    );
                    self.mark_status(guest.row_index, STATUS_ERROR).await;
                    report.failed += 1;
                }
            }

            // Pace the relay between real send attempts only.
            if !self.send_delay.is_zero() {
                tokio::time::sleep(self.send_delay).await;
            }
        }

        tracing::info!(
            %cycle_id,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            duplicates = report.duplicates,
            "cycle complete"
        );
        report
    }

    /// Generate the credential, render the invitation, hand it to the
    /// transport. Any error marks the row and surfaces in the log.
    async fn process_guest(&self, guest: &GuestRecord) -> Result<(), PipelineError> {
        let payload = CredentialPayload {
            name: guest.name.clone(),
            phone: guest.phone.clone(),
            email: guest.email.clone(),
        };
        let artifact = self.generator.generate(&payload).await?;
        let rendered = self.templates.render(guest.language, &guest.name).await?;
        let invite = Invite {
            to: guest.email.clone(),
            subject: rendered.subject,
            text: rendered.text,
            html: rendered.html,
            qr_png: artifact.png,
            logo_png: self.logo_png.clone(),
        };
        self.mailer.send(invite).await?;
        Ok(())
    }

    /// Best-effort status write; failures are logged, not propagated.
    /// The row simply stays pending and the next cycle retries it.
    async fn mark_status(&self, row_index: usize, value: &str) {
        let row = row_index + 1;
        let col = self.schema.status_col() + 1;
        if let Err(err) = self.ledger.write_cell(row, col, value).await {
            tracing::error!(row, value, error = %err, "status write failed");
        }
    }

    /// Validates a scanned credential and marks the guest checked in.
    ///
    /// Scans the table top to bottom, first exact email match wins, and
    /// overwrites the check-in cell with its fixed marker, so repeating
    /// a scan is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`CheckInError::MalformedPayload`] when the payload has no
    /// email line, [`CheckInError::NotFound`] when no row matches, and
    /// [`CheckInError::Ledger`] or [`CheckInError::Internal`] when the
    /// ledger cannot be read or marked.
    pub async fn check_in(&self, scanned: &str) -> Result<CheckInOutcome, CheckInError> {
        let Some(email) = extract_email(scanned) else {
            return Err(CheckInError::MalformedPayload);
        };

        let rows = self.ledger.read_all_rows().await?;
        let Some((row_index, row)) = self.find_row(&rows, &email) else {
            tracing::warn!(%email, "check-in for unknown email");
            return Err(CheckInError::NotFound { email });
        };

        let Some(checkin_col) = self.schema.checkin_col() else {
            return Err(CheckInError::Internal(
                "ledger schema has no check-in column".to_string(),
            ));
        };
        self.ledger
            .write_cell(row_index + 1, checkin_col + 1, CHECKIN_MARK)
            .await?;

        let name = row
            .get(self.schema.name_col())
            .map(|cell| cell.trim().to_string())
            .unwrap_or_default();
        tracing::info!(%email, row = row_index + 1, "guest checked in");
        Ok(CheckInOutcome {
            row: row_index + 1,
            name,
            email,
        })
    }

    /// Clears the status cell of the guest so the next cycle reprocesses
    /// them. This is the operator path for failed sends, instead of
    /// hand-editing the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`CheckInError::NotFound`] when no data row matches the
    /// email, or [`CheckInError::Ledger`] when the ledger fails.
    pub async fn requeue(&self, email: &str) -> Result<(), CheckInError> {
        let email = email.trim();
        let rows = self.ledger.read_all_rows().await?;
        let found = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| self.email_matches(row, email));
        let Some((row_index, _)) = found else {
            return Err(CheckInError::NotFound {
                email: email.to_string(),
            });
        };

        self.ledger
            .write_cell(row_index + 1, self.schema.status_col() + 1, "")
            .await?;
        tracing::info!(email, row = row_index + 1, "guest requeued");
        Ok(())
    }

    /// First row whose email cell matches, header included, the way the
    /// door scanner has always matched.
    fn find_row<'a>(
        &self,
        rows: &'a [Vec<String>],
        email: &str,
    ) -> Option<(usize, &'a Vec<String>)> {
        rows.iter()
            .enumerate()
            .find(|(_, row)| self.email_matches(row, email))
    }

    fn email_matches(&self, row: &[String], email: &str) -> bool {
        row.get(self.schema.email_col())
            .is_some_and(|cell| cell.trim() == email)
    }
}
