//! Startup configuration.
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file) and are read exactly once, in `AppConfig::from_env`. The
//! `from_lookup` constructors take any key lookup so they can be exercised
//! without touching the real environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_GLOSSARY_PATH: &str = "documents/sec_glossary.txt";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TOP_K: usize = 2;

/// SMTP alert settings.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub sender: String,
    pub receiver: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

impl EmailConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            sender: required(&lookup, "ALERT_SENDER_EMAIL")?,
            receiver: required(&lookup, "ALERT_RECEIVER_EMAIL")?,
            password: required(&lookup, "ALERT_EMAIL_PASSWORD")?,
            smtp_host: lookup_nonempty(&lookup, "ALERT_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: parsed_or(&lookup, "ALERT_SMTP_PORT", DEFAULT_SMTP_PORT)?,
        })
    }
}

/// Question-answering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub glossary_path: PathBuf,
    pub top_k: usize,
    pub ollama_host: String,
    pub ollama_model: String,
    pub timeout_secs: u64,
    /// Dataset behind `OracleKind::Dataset`; taken from the command line.
    pub dataset_path: Option<PathBuf>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            glossary_path: PathBuf::from(DEFAULT_GLOSSARY_PATH),
            top_k: DEFAULT_TOP_K,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_OLLAMA_TIMEOUT_SECS,
            dataset_path: None,
        }
    }
}

impl OracleConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let top_k = parsed_or(&lookup, "GLOSSARY_TOP_K", defaults.top_k)?;
        if top_k == 0 {
            return Err(ConfigError::Invalid {
                key: "GLOSSARY_TOP_K",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = parsed_or(&lookup, "OLLAMA_TIMEOUT_SECS", defaults.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "OLLAMA_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            glossary_path: lookup_nonempty(&lookup, "GLOSSARY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.glossary_path),
            top_k,
            ollama_host: lookup_nonempty(&lookup, "OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            ollama_model: lookup_nonempty(&lookup, "OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            timeout_secs,
            dataset_path: None,
        })
    }
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `Err` when alerts cannot be sent; kept so the reason can be reported.
    pub email: Result<EmailConfig, ConfigError>,
    pub oracle: OracleConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            email: EmailConfig::from_lookup(&lookup),
            oracle: OracleConfig::from_lookup(&lookup)?,
        })
    }
}

fn lookup_nonempty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ConfigError> {
    lookup_nonempty(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parsed_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup_nonempty(lookup, key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
