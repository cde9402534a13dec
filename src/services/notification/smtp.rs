//! Confirmation delivery over SMTP.
//!
//! [`SmtpDispatcher`] wraps the `lettre` async STARTTLS transport. The sender
//! address doubles as the SMTP username. When either credential is absent, or
//! the sender address does not parse, the dispatcher still constructs and
//! every send reports a failure.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{first_empty, NotificationDispatcher};
use crate::config::AppConfig;
use crate::models::{ConfirmationMessage, DispatchStatus};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP credentials missing")]
    MissingCredentials,

    #[error("SMTP sender address invalid")]
    InvalidSender,

    #[error("empty {0}")]
    EmptyArgument(&'static str),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl From<&AppConfig> for SmtpSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            sender: config.smtp_email.clone(),
            password: config.smtp_password.clone(),
            timeout: config.smtp_timeout,
        }
    }
}

struct Mailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unavailable {
    MissingCredentials,
    InvalidSender,
}

impl From<Unavailable> for EmailError {
    fn from(reason: Unavailable) -> Self {
        match reason {
            Unavailable::MissingCredentials => EmailError::MissingCredentials,
            Unavailable::InvalidSender => EmailError::InvalidSender,
        }
    }
}

pub struct SmtpDispatcher {
    mailer: Result<Mailer, Unavailable>,
}

impl SmtpDispatcher {
    pub fn new(settings: SmtpSettings) -> Result<Self, EmailError> {
        let (Some(sender), Some(password)) = (settings.sender, settings.password) else {
            tracing::warn!("SMTP credentials missing, confirmation emails will not be sent");
            return Ok(Self {
                mailer: Err(Unavailable::MissingCredentials),
            });
        };

        let sender_mailbox = match sender.trim().parse::<Mailbox>() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!(error = %e, "SMTP_EMAIL is not a valid address, confirmation emails will not be sent");
                return Ok(Self {
                    mailer: Err(Unavailable::InvalidSender),
                });
            }
        };
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(sender.trim().to_string(), password))
            .timeout(Some(settings.timeout))
            .build();

        tracing::info!(host = %settings.host, port = settings.port, "SMTP dispatcher configured");

        Ok(Self {
            mailer: Ok(Mailer {
                sender: sender_mailbox,
                transport,
            }),
        })
    }

    async fn deliver(&self, destination: &str, name: &str, time: &str) -> Result<(), EmailError> {
        if let Some(field) = first_empty(destination, name, time) {
            return Err(EmailError::EmptyArgument(field));
        }
        let mailer = self.mailer.as_ref().map_err(|reason| EmailError::from(*reason))?;

        let message = ConfirmationMessage::new(name, time);
        let email = Message::builder()
            .from(mailer.sender.clone())
            .to(destination.trim().parse()?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)?;

        mailer.transport.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for SmtpDispatcher {
    async fn send(&self, destination: &str, name: &str, time: &str) -> DispatchStatus {
        match self.deliver(destination, name, time).await {
            Ok(()) => {
                tracing::info!("confirmation email sent");
                DispatchStatus::Sent
            }
            Err(e) => DispatchStatus::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(sender: Option<&str>, password: Option<&str>) -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender: sender.map(str::to_string),
            password: password.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_reports_failure() {
        let dispatcher = SmtpDispatcher::new(settings(Some("bot@example.com"), None)).unwrap();
        assert!(dispatcher.mailer.is_err());

        let status = dispatcher.send("ana@x.com", "Ana", "Monday 3pm").await;
        assert_eq!(
            status,
            DispatchStatus::Failed("SMTP credentials missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_argument_reports_failure() {
        let dispatcher = SmtpDispatcher::new(settings(None, None)).unwrap();
        let status = dispatcher.send("ana@x.com", "Ana", "  ").await;
        assert_eq!(status, DispatchStatus::Failed("empty time".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_sender_reports_failure() {
        let dispatcher =
            SmtpDispatcher::new(settings(Some("not-an-email"), Some("secret"))).unwrap();
        assert!(matches!(dispatcher.mailer, Err(Unavailable::InvalidSender)));

        let status = dispatcher.send("ana@x.com", "Ana", "Monday 3pm").await;
        assert_eq!(
            status,
            DispatchStatus::Failed("SMTP sender address invalid".to_string())
        );
    }
}
