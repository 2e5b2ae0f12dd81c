//! Export pipeline results to JSON.
//!
//! The export is meant to be easy to consume in downstream scripts: the
//! validation report is a plain list of messages and the notification outcome
//! carries a `status` tag.

use std::fs::File;
use std::path::Path;

use crate::domain::PipelineResult;
use crate::error::AppError;

/// Write a pipeline result as pretty-printed JSON.
pub fn write_result_json(path: &Path, result: &PipelineResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{Finding, NotificationOutcome, ValidationReport};

    #[test]
    fn writes_report_messages_and_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = PipelineResult {
            dataset_path: PathBuf::from("statements.csv"),
            question: "What is us-gaap:NetIncomeLoss?".to_string(),
            validation_report: ValidationReport::from_problems(vec![Finding::NegativeEquity]),
            answer: "Net income.".to_string(),
            notification_outcome: Some(NotificationOutcome::Failed {
                reason: "SMTP send error".to_string(),
            }),
        };

        write_result_json(&path, &result).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value["validation_report"][0],
            "Shareholder_Equity is negative for at least one row."
        );
        assert_eq!(value["notification_outcome"]["status"], "failed");
        assert_eq!(value["answer"], "Net income.");
    }

    #[test]
    fn unset_outcome_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = PipelineResult {
            dataset_path: PathBuf::from("statements.csv"),
            question: "q".to_string(),
            validation_report: ValidationReport::pass(),
            answer: "a".to_string(),
            notification_outcome: None,
        };

        write_result_json(&path, &result).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["notification_outcome"].is_null());
    }
}
