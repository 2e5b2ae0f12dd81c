//! Input/output helpers.
//!
//! - CSV ingest into a `Dataset` (`ingest`)
//! - pipeline result export to JSON (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
