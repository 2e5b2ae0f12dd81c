//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validation findings and the report that groups them (`Finding`, `ValidationReport`)
//! - notification outcomes (`NotificationOutcome`)
//! - the assembled output of one run (`PipelineResult`)

pub mod types;

pub use types::*;
