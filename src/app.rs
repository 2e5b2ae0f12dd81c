//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - reads configuration once from the environment
//! - builds the oracle and notifier
//! - runs the pipeline (or a single stage) and prints the results

use std::path::Path;

use clap::Parser;

use crate::cli::{AskArgs, Command, OracleArgs, RunArgs, ValidateArgs};
use crate::config::{AppConfig, OracleConfig};
use crate::error::AppError;
use crate::oracle::{Oracle, build_oracle};

pub mod pipeline;

use pipeline::Pipeline;

/// Entry point for the `finassist` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose, cli.quiet);

    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Run(args) => handle_run(args, &config),
        Command::Validate(args) => handle_validate(args),
        Command::Ask(args) => handle_ask(args, &config),
    }
}

fn handle_run(args: RunArgs, config: &AppConfig) -> Result<(), AppError> {
    let oracle = oracle_or_degraded(&args.oracle, Some(args.data.as_path()), &config.oracle);
    let notifier = crate::notify::build_notifier(&config.email);

    let result = Pipeline::new(oracle.as_ref(), notifier.as_ref())
        .with_subject(args.subject.clone())
        .run(&args.data, args.question.as_deref());

    println!("{}", crate::report::format_pipeline_result(&result));

    if let Some(path) = &args.export {
        crate::io::export::write_result_json(path, &result)?;
        tracing::info!(path = %path.display(), "result exported");
    }

    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let report = crate::validate::validate_path(&args.data);
    print!("{}", crate::report::format_validation_report(&report));

    if report.has_problems() {
        return Err(AppError::new(
            1,
            format!("Validation failed with {} finding(s).", report.findings().len()),
        ));
    }
    Ok(())
}

fn handle_ask(args: AskArgs, config: &AppConfig) -> Result<(), AppError> {
    let oracle_config = oracle_config_from_args(&args.oracle, args.data.as_deref(), &config.oracle);
    let oracle = build_oracle(args.oracle.oracle, &oracle_config)?;
    let answer = oracle.answer(&args.question)?;
    println!("{answer}");
    Ok(())
}

pub fn oracle_config_from_args(args: &OracleArgs, data: Option<&Path>, base: &OracleConfig) -> OracleConfig {
    let mut config = base.clone();
    if let Some(path) = &args.glossary {
        config.glossary_path = path.clone();
    }
    if let Some(path) = data {
        config.dataset_path = Some(path.to_path_buf());
    }
    config
}

/// Build the oracle; if that fails the pipeline still runs and every answer
/// reports the construction error.
fn oracle_or_degraded(args: &OracleArgs, data: Option<&Path>, base: &OracleConfig) -> Box<dyn Oracle> {
    let config = oracle_config_from_args(args, data, base);
    match build_oracle(args.oracle, &config) {
        Ok(oracle) => oracle,
        Err(err) => {
            tracing::warn!(error = %err, "question answering unavailable");
            Box::new(UnavailableOracle {
                reason: err.to_string(),
            })
        }
    }
}

struct UnavailableOracle {
    reason: String,
}

impl Oracle for UnavailableOracle {
    fn answer(&self, _question: &str) -> Result<String, crate::error::OracleError> {
        Err(crate::error::OracleError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::oracle::OracleKind;

    #[test]
    fn glossary_flag_overrides_config() {
        let args = OracleArgs {
            oracle: OracleKind::Glossary,
            glossary: Some(PathBuf::from("custom.txt")),
        };
        let config = oracle_config_from_args(&args, None, &OracleConfig::default());
        assert_eq!(config.glossary_path, PathBuf::from("custom.txt"));
        assert_eq!(config.dataset_path, None);
    }

    #[test]
    fn run_dataset_feeds_the_dataset_oracle() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("statements.csv");
        std::fs::write(&data, "Year,Net_Income
2022,1520
2023,-500
").unwrap();
        let args = OracleArgs {
            oracle: OracleKind::Dataset,
            glossary: None,
        };

        let oracle = oracle_or_degraded(&args, Some(data.as_path()), &OracleConfig::default());
        let answer = oracle.answer("net income 2023").unwrap();
        assert!(answer.starts_with("statements.csv row 1: Year: 2023, Net_Income: -500"));
    }

    #[test]
    fn missing_glossary_degrades_to_unavailable_oracle() {
        let args = OracleArgs {
            oracle: OracleKind::Glossary,
            glossary: Some(PathBuf::from("/no/such/glossary.txt")),
        };
        let oracle = oracle_or_degraded(&args, None, &OracleConfig::default());
        let err = oracle.answer("What is us-gaap:Assets?").unwrap_err();
        assert!(err.to_string().contains("error loading glossary"));
    }
}
