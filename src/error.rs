use std::path::PathBuf;

use thiserror::Error;

/// Process-level error: a message plus the exit code `main` should return.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        AppError::new(4, err.to_string())
    }
}

/// Dataset could not be loaded or parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no columns to parse from file")]
    Empty,

    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("line {line}: expected {expected} fields, found {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("column {column}, line {line}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        line: u64,
        value: String,
    },
}

/// Question answering failed.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("error loading glossary '{}': {source}", .path.display())]
    Glossary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glossary '{}' is empty or malformed", .path.display())]
    EmptyGlossary { path: PathBuf },

    #[error("error loading dataset '{}': {source}", .path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("dataset '{}' has no rows", .path.display())]
    EmptyDataset { path: PathBuf },

    #[error("no dataset given; pass --data")]
    NoDataset,

    #[error("question answering unavailable: {0}")]
    Unavailable(String),

    #[error("no glossary entry matches the question")]
    NoMatch,

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Configuration missing or invalid at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing {0} in environment (.env)")]
    Missing(&'static str),

    #[error("invalid {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
