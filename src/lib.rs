//! `finassist` library crate.
//!
//! The binary (`finassist`) is a thin wrapper around this library so that:
//!
//! - the validation rules and the pipeline are testable without spawning processes
//! - the oracle and notifier can be swapped for fakes in tests
//! - other front-ends can reuse the same workflow

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod notify;
pub mod oracle;
pub mod report;
pub mod validate;

pub use app::pipeline::{Pipeline, run_pipeline};
