//! Alert delivery.
//!
//! A `Notifier` never fails past its boundary: every attempt ends in a
//! `NotificationOutcome`, either `Delivered` or `Failed`.

use crate::config::EmailConfig;
use crate::domain::NotificationOutcome;
use crate::error::ConfigError;

pub mod email;

pub use email::{EmailNotifier, MailTransport, OutgoingEmail, SmtpMailTransport};

pub trait Notifier {
    fn notify(&self, message: &str, subject: &str) -> NotificationOutcome;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, message: &str, subject: &str) -> NotificationOutcome {
        (**self).notify(message, subject)
    }
}

/// Stand-in used when alert settings were missing at startup.
#[derive(Debug, Clone)]
pub struct UnconfiguredNotifier {
    reason: String,
}

impl UnconfiguredNotifier {
    pub fn new(err: &ConfigError) -> Self {
        Self {
            reason: format!("email alerts are not configured: {err}"),
        }
    }
}

impl Notifier for UnconfiguredNotifier {
    fn notify(&self, _message: &str, subject: &str) -> NotificationOutcome {
        tracing::error!(subject, reason = %self.reason, "cannot send alert");
        NotificationOutcome::Failed {
            reason: self.reason.clone(),
        }
    }
}

/// Pick the SMTP notifier when configured, otherwise one that always fails.
pub fn build_notifier(email: &Result<EmailConfig, ConfigError>) -> Box<dyn Notifier> {
    match email {
        Ok(config) => Box::new(EmailNotifier::new(config.clone(), Box::new(SmtpMailTransport::new(config)))),
        Err(err) => {
            tracing::warn!(error = %err, "email alerts disabled");
            Box::new(UnconfiguredNotifier::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_notifier_always_fails_with_reason() {
        let notifier = UnconfiguredNotifier::new(&ConfigError::Missing("ALERT_EMAIL_PASSWORD"));
        let outcome = notifier.notify("Net_Income is negative for at least one row.", "subject");
        match outcome {
            NotificationOutcome::Failed { reason } => assert!(reason.contains("ALERT_EMAIL_PASSWORD")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_config_builds_failing_notifier() {
        let notifier = build_notifier(&Err(ConfigError::Missing("ALERT_SENDER_EMAIL")));
        assert!(!notifier.notify("msg", "subject").is_delivered());
    }
}
