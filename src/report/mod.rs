//! Reporting utilities: terminal formatting of validation and pipeline results.

pub mod format;

pub use format::*;
