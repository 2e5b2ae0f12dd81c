//! Email alerts over SMTP.
//!
//! Uses a transport trait for the actual send. In tests, a recording
//! transport avoids network calls.

use chrono::Local;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::EmailConfig;
use crate::domain::NotificationOutcome;
use crate::notify::Notifier;

/// A fully composed email, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sends composed emails.
pub trait MailTransport {
    fn send(&self, email: &OutgoingEmail) -> Result<(), String>;
}

/// STARTTLS SMTP transport using lettre.
pub struct SmtpMailTransport {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SmtpMailTransport {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.sender.clone(),
            password: config.password.clone(),
        }
    }
}

impl MailTransport for SmtpMailTransport {
    fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let message = Message::builder()
            .from(
                email
                    .from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(email.to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        let creds = Credentials::new(self.username.clone(), self.password.clone());
        let mailer = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(self.port)
            .credentials(creds)
            .build();

        mailer
            .send(&message)
            .map_err(|e| format!("SMTP send error: {e}"))?;
        Ok(())
    }
}

/// Notifier that emails the configured receiver.
pub struct EmailNotifier {
    config: EmailConfig,
    transport: Box<dyn MailTransport>,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, transport: Box<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    fn compose(&self, message: &str, subject: &str, timestamp: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: self.config.sender.clone(),
            to: self.config.receiver.clone(),
            subject: subject.to_string(),
            body: format!("{message}\n\nTimestamp: {timestamp}"),
        }
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str, subject: &str) -> NotificationOutcome {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let email = self.compose(message, subject, &timestamp);

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            %timestamp,
            "sending alert email:\n{message}"
        );

        match self.transport.send(&email) {
            Ok(()) => {
                tracing::info!(to = %email.to, "alert email sent");
                NotificationOutcome::Delivered { recipient: email.to }
            }
            Err(reason) => {
                tracing::error!(to = %email.to, %reason, "alert email failed");
                NotificationOutcome::Failed { reason }
            }
        }
    }
}
