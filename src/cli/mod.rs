//! Command-line parsing for the financial assistant.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the validation and orchestration code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_ALERT_SUBJECT;
use crate::oracle::OracleKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "finassist", version, about = "Financial statement validation, glossary Q&A and alerting")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a CSV, answer a question and email an alert if validation fails.
    Run(RunArgs),
    /// Validate a CSV and print the findings (exit code 1 on failure).
    Validate(ValidateArgs),
    /// Answer a single question about a financial term.
    Ask(AskArgs),
}

/// Oracle selection shared by `run` and `ask`.
#[derive(Debug, Args, Clone)]
pub struct OracleArgs {
    /// Question-answering backend.
    #[arg(long, value_enum, default_value_t = OracleKind::Glossary)]
    pub oracle: OracleKind,

    /// Glossary file (`tag = description` per line). Overrides GLOSSARY_PATH.
    #[arg(long, value_name = "PATH")]
    pub glossary: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Financial statement CSV to validate.
    #[arg(short, long, value_name = "CSV")]
    pub data: PathBuf,

    /// Question to answer (defaults to a sample glossary question).
    #[arg(long)]
    pub question: Option<String>,

    #[command(flatten)]
    pub oracle: OracleArgs,

    /// Subject line for the alert email.
    #[arg(long, default_value = DEFAULT_ALERT_SUBJECT)]
    pub subject: String,

    /// Write the full pipeline result to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ValidateArgs {
    /// Financial statement CSV to validate.
    #[arg(short, long, value_name = "CSV")]
    pub data: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    /// The question, e.g. "What is us-gaap:NetIncomeLoss?".
    pub question: String,

    /// Dataset CSV searched by `--oracle dataset`.
    #[arg(short, long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub oracle: OracleArgs,
}
