//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the validation engine and the pipeline stages
//! - printed by the CLI
//! - exported to JSON for downstream inspection

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::error::LoadError;

pub const NET_INCOME: &str = "Net_Income";
pub const SHAREHOLDER_EQUITY: &str = "Shareholder_Equity";
pub const INTEREST_INCOME: &str = "Interest_Income";
pub const INTEREST_EXPENSE: &str = "Interest_Expense";

/// Columns every financial statement dataset must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    INTEREST_INCOME,
    INTEREST_EXPENSE,
    "Average_Earning_Assets",
    NET_INCOME,
    "Total_Assets",
    SHAREHOLDER_EQUITY,
    "Operating_Expenses",
    "Operating_Income",
];

/// Question used when the caller does not supply one.
pub const DEFAULT_QUESTION: &str = "What is us-gaap:NetIncomeLoss?";

/// Subject line used for validation alerts.
pub const DEFAULT_ALERT_SUBJECT: &str = "\u{26a0}\u{fe0f} Financial Validation Alert";

/// One validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    MissingColumn(String),
    MissingValues(String),
    NegativeNetIncome,
    NegativeEquity,
    InterestExpenseExceedsIncome,
    /// The dataset could not be loaded; always the only finding in its report.
    LoadFailed(String),
    /// All checks passed; always the only finding in its report.
    Pass,
}

impl Finding {
    pub fn is_problem(&self) -> bool {
        !matches!(self, Finding::Pass)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingColumn(col) => write!(f, "Missing column: {col}"),
            Finding::MissingValues(col) => write!(f, "Missing values in column: {col}"),
            Finding::NegativeNetIncome => write!(f, "{NET_INCOME} is negative for at least one row."),
            Finding::NegativeEquity => {
                write!(f, "{SHAREHOLDER_EQUITY} is negative for at least one row.")
            }
            Finding::InterestExpenseExceedsIncome => write!(
                f,
                "{INTEREST_EXPENSE} exceeds {INTEREST_INCOME} for at least one row."
            ),
            Finding::LoadFailed(reason) => write!(f, "Error loading CSV: {reason}"),
            Finding::Pass => write!(f, "File passes all validation checks."),
        }
    }
}

/// Ordered validation findings.
///
/// Either exactly `[Finding::Pass]` or a non-empty list of problems; the
/// constructors are the only way to build one, so the two never mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// Build a report from accumulated problems (the pass sentinel if none).
    pub fn from_problems(problems: Vec<Finding>) -> Self {
        let findings: Vec<Finding> = problems.into_iter().filter(Finding::is_problem).collect();
        if findings.is_empty() {
            return Self::pass();
        }
        Self { findings }
    }

    pub fn pass() -> Self {
        Self {
            findings: vec![Finding::Pass],
        }
    }

    pub fn load_failed(err: &LoadError) -> Self {
        Self {
            findings: vec![Finding::LoadFailed(err.to_string())],
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn passed(&self) -> bool {
        !self.has_problems()
    }

    pub fn has_problems(&self) -> bool {
        self.findings.iter().any(Finding::is_problem)
    }

    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    /// All messages, one per line.
    pub fn joined(&self) -> String {
        self.messages().join("\n")
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.findings.iter().map(ToString::to_string))
    }
}

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Delivered { recipient: String },
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered { .. })
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationOutcome::Delivered { recipient } => write!(f, "Alert email sent to {recipient}."),
            NotificationOutcome::Failed { reason } => write!(f, "Failed to send email: {reason}"),
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub dataset_path: PathBuf,
    pub question: String,
    pub validation_report: ValidationReport,
    pub answer: String,
    pub notification_outcome: Option<NotificationOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_problem_list_becomes_pass_sentinel() {
        let report = ValidationReport::from_problems(Vec::new());
        assert_eq!(report.findings(), &[Finding::Pass]);
        assert!(report.passed());
        assert_eq!(report.joined(), "File passes all validation checks.");
    }

    #[test]
    fn pass_sentinel_is_dropped_when_problems_exist() {
        let report = ValidationReport::from_problems(vec![
            Finding::Pass,
            Finding::MissingColumn("Total_Assets".to_string()),
        ]);
        assert_eq!(report.findings(), &[Finding::MissingColumn("Total_Assets".to_string())]);
        assert!(report.has_problems());
    }

    #[test]
    fn messages_match_expected_wording() {
        let report = ValidationReport::from_problems(vec![
            Finding::MissingValues("Net_Income".to_string()),
            Finding::NegativeEquity,
            Finding::InterestExpenseExceedsIncome,
        ]);
        assert_eq!(
            report.messages(),
            vec![
                "Missing values in column: Net_Income".to_string(),
                "Shareholder_Equity is negative for at least one row.".to_string(),
                "Interest_Expense exceeds Interest_Income for at least one row.".to_string(),
            ]
        );
    }

    #[test]
    fn report_serializes_as_message_list() {
        let report = ValidationReport::from_problems(vec![Finding::NegativeNetIncome]);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"["Net_Income is negative for at least one row."]"#);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = NotificationOutcome::Failed {
            reason: "timeout".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"status":"failed","reason":"timeout"}"#);
    }
}
