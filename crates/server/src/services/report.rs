//! Report delivery over SMTP.
//!
//! Builds a summary of the current expiry records and mails it to a
//! comma-separated recipient list. Without an SMTP relay configured the
//! mailer runs in mock mode: the report is logged and the request still
//! succeeds, which keeps development setups working without credentials.

use chrono::NaiveDate;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;
use validade_core::{Email, ExpiryRecord, ExpiryStatus};

use crate::config::SmtpConfig;
use crate::store::DATE_FORMAT;

/// Report delivery failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The recipient field contained no addresses.
    #[error("no recipients provided")]
    NoRecipients,

    /// A recipient failed structural validation; nothing was sent.
    #[error("invalid recipient {0:?}")]
    InvalidRecipient(String),

    /// An address was rejected by the mail library.
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP transport failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// What happened to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Delivered over SMTP to this many recipients.
    Sent { recipients: usize },
    /// No relay configured; the report was logged instead.
    Logged,
}

/// Mailer for expiry reports.
#[derive(Clone)]
pub struct ReportMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl ReportMailer {
    /// Build a mailer from the optional SMTP config block.
    ///
    /// # Errors
    ///
    /// Returns an error when the relay cannot be resolved or the from
    /// address is malformed.
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, ReportError> {
        let Some(smtp) = smtp else {
            return Ok(Self {
                transport: None,
                from: None,
            });
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.relay)?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.expose_secret().to_string(),
            ))
            .build();

        Ok(Self {
            transport: Some(transport),
            from: Some(smtp.from.parse()?),
        })
    }

    /// Send (or, in mock mode, log) a report over the given records.
    ///
    /// # Errors
    ///
    /// Recipient validation errors occur before anything leaves the
    /// process; transport errors are surfaced as-is.
    pub async fn send_report(
        &self,
        recipients_raw: &str,
        records: &[ExpiryRecord],
        today: NaiveDate,
    ) -> Result<ReportOutcome, ReportError> {
        let recipients = parse_recipients(recipients_raw)?;
        let body = build_summary(records, today);

        let Some(transport) = &self.transport else {
            tracing::info!(
                recipients = recipients.len(),
                records = records.len(),
                "SMTP not configured; logging report\n{body}"
            );
            return Ok(ReportOutcome::Logged);
        };

        let mut builder = Message::builder().subject("Relatório de Validades");
        if let Some(from) = &self.from {
            builder = builder.from(from.clone());
        }
        for recipient in &recipients {
            builder = builder.to(recipient.as_str().parse::<Mailbox>()?);
        }
        let message = builder.body(body)?;

        transport.send(message).await?;
        Ok(ReportOutcome::Sent {
            recipients: recipients.len(),
        })
    }
}

/// Split a comma-separated recipient field and validate every address.
fn parse_recipients(raw: &str) -> Result<Vec<Email>, ReportError> {
    let mut recipients = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let email =
            Email::parse(part).map_err(|_| ReportError::InvalidRecipient(part.to_string()))?;
        recipients.push(email);
    }

    if recipients.is_empty() {
        return Err(ReportError::NoRecipients);
    }
    Ok(recipients)
}

/// Plain-text report body: totals first, then one line per record.
fn build_summary(records: &[ExpiryRecord], today: NaiveDate) -> String {
    let expired = records
        .iter()
        .filter(|r| r.status(today) == ExpiryStatus::Expired)
        .count();
    let expiring = records
        .iter()
        .filter(|r| r.status(today) == ExpiryStatus::ExpiringSoon)
        .count();

    let mut body = format!(
        "Relatório de Validades\n\nTotal verificado: {}\nCaducados: {expired}\nA expirar: {expiring}\n\n",
        records.len()
    );

    for record in records {
        let hora = record
            .hora_registo
            .map(|h| format!(" @ {}", h.format("%H:%M")))
            .unwrap_or_default();
        body.push_str(&format!(
            "- {} | {}{hora} | {} | registado por {}\n",
            record.produto,
            record.data_validade.format(DATE_FORMAT),
            record.status(today).label(),
            record.registado_por,
        ));
    }

    body
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(produto: &str, data: &str) -> ExpiryRecord {
        ExpiryRecord {
            produto: produto.to_string(),
            data_validade: data.parse().unwrap(),
            hora_registo: None,
            registado_por: "ricardo".to_string(),
            registado_em: Utc::now(),
        }
    }

    #[test]
    fn test_parse_recipients_splits_and_trims() {
        let recipients = parse_recipients(" a@b.pt , c@d.pt ,").unwrap();
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].as_str(), "a@b.pt");
    }

    #[test]
    fn test_parse_recipients_rejects_invalid() {
        assert!(matches!(
            parse_recipients("a@b.pt, not-an-email"),
            Err(ReportError::InvalidRecipient(_))
        ));
    }

    #[test]
    fn test_parse_recipients_requires_at_least_one() {
        assert!(matches!(parse_recipients("  ,  "), Err(ReportError::NoRecipients)));
    }

    #[test]
    fn test_summary_counts() {
        let today: NaiveDate = "2025-06-15".parse().unwrap();
        let records = vec![
            record("Leite", "2025-06-10"),
            record("Pão", "2025-06-16"),
            record("Molho", "2025-12-01"),
        ];
        let body = build_summary(&records, today);
        assert!(body.contains("Total verificado: 3"));
        assert!(body.contains("Caducados: 1"));
        assert!(body.contains("A expirar: 1"));
        assert!(body.contains("- Leite | 2025-06-10 | Caducado"));
    }

    #[tokio::test]
    async fn test_mock_mode_logs_instead_of_sending() {
        let mailer = ReportMailer::from_config(None).unwrap();
        let today: NaiveDate = "2025-06-15".parse().unwrap();
        let outcome = mailer
            .send_report("a@b.pt", &[record("Leite", "2025-06-20")], today)
            .await
            .unwrap();
        assert_eq!(outcome, ReportOutcome::Logged);
    }

    #[tokio::test]
    async fn test_mock_mode_still_validates_recipients() {
        let mailer = ReportMailer::from_config(None).unwrap();
        let today: NaiveDate = "2025-06-15".parse().unwrap();
        let result = mailer.send_report("nope", &[], today).await;
        assert!(matches!(result, Err(ReportError::InvalidRecipient(_))));
    }
}
