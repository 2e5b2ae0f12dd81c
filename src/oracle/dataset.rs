//! Question answering over the rows of a dataset.
//!
//! Each row becomes one document, `col: value, col: value, ...`, tagged with
//! the file name and 0-based row index. Retrieval is the same lexical scorer
//! the glossary uses, so `2023` in a question finds the 2023 row.

use std::path::Path;

use crate::error::OracleError;
use crate::io::Dataset;
use crate::oracle::glossary::{Glossary, GlossaryEntry};

/// Rendering of a missing cell.
const MISSING_CELL: &str = "NA";

/// Load `path` and turn every row into a retrievable document.
pub fn load_corpus(path: &Path) -> Result<Glossary, OracleError> {
    let dataset = Dataset::load(path).map_err(|source| OracleError::Dataset {
        path: path.to_path_buf(),
        source,
    })?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let corpus = corpus(&dataset, &source);
    if corpus.is_empty() {
        return Err(OracleError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    Ok(corpus)
}

pub fn corpus(dataset: &Dataset, source: &str) -> Glossary {
    let columns = dataset.columns();
    let entries = dataset
        .rows()
        .enumerate()
        .map(|(idx, cells)| GlossaryEntry {
            tag: format!("{source} row {idx}"),
            description: columns
                .iter()
                .zip(cells)
                .map(|(col, cell)| format!("{col}: {}", cell.unwrap_or(MISSING_CELL)))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    Glossary::from_entries(entries)
}
