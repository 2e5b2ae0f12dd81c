//! Question answering over financial reference text.
//!
//! The pipeline only sees the `Oracle` trait. Implementations:
//!
//! - `GlossaryOracle`: answers directly with the best matching entries, either
//!   from the glossary file or (for `OracleKind::Dataset`) from dataset rows
//! - `OllamaOracle`: hands the matching glossary entries to a local Ollama model as context

use clap::ValueEnum;

use crate::config::OracleConfig;
use crate::error::OracleError;

pub mod dataset;
pub mod glossary;
pub mod ollama;

pub use glossary::{Glossary, GlossaryEntry, GlossaryOracle};
pub use ollama::OllamaOracle;

/// Answers a free-text question.
pub trait Oracle {
    fn answer(&self, question: &str) -> Result<String, OracleError>;
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn answer(&self, question: &str) -> Result<String, OracleError> {
        (**self).answer(question)
    }
}

/// Which oracle backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OracleKind {
    /// Answer with the retrieved glossary entries themselves.
    Glossary,
    /// Ask a local Ollama model, grounded in the retrieved entries.
    Ollama,
    /// Answer with the dataset rows that best match the question.
    Dataset,
}

/// Build the configured oracle. Fails if its corpus cannot be loaded.
pub fn build_oracle(kind: OracleKind, config: &OracleConfig) -> Result<Box<dyn Oracle>, OracleError> {
    let oracle: Box<dyn Oracle> = match kind {
        OracleKind::Glossary => Box::new(GlossaryOracle::new(load_glossary(kind, config)?, config.top_k)),
        OracleKind::Ollama => Box::new(OllamaOracle::new(load_glossary(kind, config)?, config)?),
        OracleKind::Dataset => {
            let path = config.dataset_path.as_deref().ok_or(OracleError::NoDataset)?;
            let corpus = dataset::load_corpus(path)?;
            tracing::info!(backend = ?kind, rows = corpus.len(), path = %path.display(), "dataset corpus loaded");
            Box::new(GlossaryOracle::new(corpus, config.top_k))
        }
    };
    Ok(oracle)
}

fn load_glossary(kind: OracleKind, config: &OracleConfig) -> Result<Glossary, OracleError> {
    let glossary = Glossary::load(&config.glossary_path)?;
    tracing::info!(
        backend = ?kind,
        entries = glossary.len(),
        path = %config.glossary_path.display(),
        "glossary loaded"
    );
    Ok(glossary)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::DEFAULT_QUESTION;

    fn manifest_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
    }

    fn shipped_glossary() -> OracleConfig {
        OracleConfig {
            glossary_path: manifest_path("documents/sec_glossary.txt"),
            ..OracleConfig::default()
        }
    }

    #[test]
    fn shipped_glossary_answers_default_question() {
        let oracle = build_oracle(OracleKind::Glossary, &shipped_glossary()).unwrap();
        let answer = oracle.answer(DEFAULT_QUESTION).unwrap();
        assert!(answer.starts_with("us-gaap:NetIncomeLoss: "));
    }

    #[test]
    fn missing_glossary_fails_to_build() {
        let config = OracleConfig {
            glossary_path: PathBuf::from("/no/such/glossary.txt"),
            ..OracleConfig::default()
        };
        assert!(matches!(
            build_oracle(OracleKind::Glossary, &config),
            Err(OracleError::Glossary { .. })
        ));
    }

    #[test]
    fn shipped_dataset_answers_net_income_for_2023() {
        let config = OracleConfig {
            dataset_path: Some(manifest_path("datasets/financial_statements.csv")),
            top_k: 1,
            ..OracleConfig::default()
        };
        let oracle = build_oracle(OracleKind::Dataset, &config).unwrap();
        let answer = oracle.answer("What is the net income for 2023?").unwrap();
        assert!(answer.starts_with("financial_statements.csv row 2: Year: 2023,"));
        assert!(answer.contains("Net_Income: -500"));
    }

    #[test]
    fn dataset_oracle_ignores_glossary_path() {
        let config = OracleConfig {
            glossary_path: PathBuf::from("/no/such/glossary.txt"),
            dataset_path: Some(manifest_path("datasets/financial_statements.csv")),
            ..OracleConfig::default()
        };
        assert!(build_oracle(OracleKind::Dataset, &config).is_ok());
    }

    #[test]
    fn dataset_oracle_needs_a_dataset() {
        assert!(matches!(
            build_oracle(OracleKind::Dataset, &OracleConfig::default()),
            Err(OracleError::NoDataset)
        ));
    }

    #[test]
    fn dataset_is_a_cli_value() {
        assert_eq!(OracleKind::from_str("dataset", false), Ok(OracleKind::Dataset));
    }
}
