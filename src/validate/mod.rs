//! Financial statement validation rules.
//!
//! The engine runs a fixed battery of checks and accumulates every finding;
//! it never stops at the first failure. Rules only look at columns that are
//! present, so a missing column is reported once (as missing) and nothing
//! else is said about it.
//!
//! Order of findings:
//! 1. per required column: `Missing column` or `Missing values in column`
//! 2. negative `Net_Income`
//! 3. negative `Shareholder_Equity`
//! 4. `Interest_Expense` above `Interest_Income`

use std::collections::HashMap;
use std::path::Path;

use crate::domain::{
    Finding, INTEREST_EXPENSE, INTEREST_INCOME, NET_INCOME, REQUIRED_COLUMNS, SHAREHOLDER_EQUITY,
    ValidationReport,
};
use crate::error::LoadError;
use crate::io::Dataset;

/// Load a CSV and validate it. Load errors become the report's only finding.
pub fn validate_path(path: &Path) -> ValidationReport {
    match Dataset::load(path) {
        Ok(dataset) => validate(&dataset),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "dataset could not be loaded");
            ValidationReport::load_failed(&err)
        }
    }
}

/// Validate an in-memory dataset.
pub fn validate(dataset: &Dataset) -> ValidationReport {
    let columns = match RequiredColumns::extract(dataset) {
        Ok(columns) => columns,
        Err(err) => return ValidationReport::load_failed(&err),
    };

    let mut findings = Vec::new();

    for name in REQUIRED_COLUMNS {
        match columns.get(name) {
            None => findings.push(Finding::MissingColumn(name.to_string())),
            Some(values) if values.iter().any(Option::is_none) => {
                findings.push(Finding::MissingValues(name.to_string()));
            }
            Some(_) => {}
        }
    }

    if let Some(net_income) = columns.get(NET_INCOME) {
        if any_negative(net_income) {
            findings.push(Finding::NegativeNetIncome);
        }
    }

    if let Some(equity) = columns.get(SHAREHOLDER_EQUITY) {
        if any_negative(equity) {
            findings.push(Finding::NegativeEquity);
        }
    }

    if let (Some(income), Some(expense)) = (columns.get(INTEREST_INCOME), columns.get(INTEREST_EXPENSE)) {
        if any_exceeds(expense, income) {
            findings.push(Finding::InterestExpenseExceedsIncome);
        }
    }

    let report = ValidationReport::from_problems(findings);
    tracing::debug!(
        rows = dataset.row_count(),
        findings = report.findings().len(),
        passed = report.passed(),
        "validation complete"
    );
    report
}

/// Numeric values of the required columns that are present.
struct RequiredColumns {
    values: HashMap<&'static str, Vec<Option<f64>>>,
}

impl RequiredColumns {
    fn extract(dataset: &Dataset) -> Result<Self, LoadError> {
        let mut values = HashMap::new();
        for name in REQUIRED_COLUMNS {
            if let Some(parsed) = dataset.numeric_column(name) {
                values.insert(name, parsed?);
            }
        }
        Ok(Self { values })
    }

    fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.values.get(name).map(Vec::as_slice)
    }
}

fn any_negative(values: &[Option<f64>]) -> bool {
    values.iter().flatten().any(|v| *v < 0.0)
}

/// True if any row has both values and `lhs > rhs`.
fn any_exceeds(lhs: &[Option<f64>], rhs: &[Option<f64>]) -> bool {
    lhs.iter().zip(rhs).any(|pair| match pair {
        (Some(a), Some(b)) => a > b,
        _ => false,
    })
}
