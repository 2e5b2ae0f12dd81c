//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the validation and pipeline code stays free of presentation details
//! - output changes are localized

use crate::domain::{NotificationOutcome, PipelineResult, ValidationReport};

/// Format the findings, one per line, with a pass/fail marker.
pub fn format_validation_report(report: &ValidationReport) -> String {
    let marker = if report.passed() { "[ok]" } else { "[!!]" };
    let mut out = String::new();
    for finding in report.findings() {
        out.push_str(&format!("{marker} {finding}\n"));
    }
    out
}

/// Format every stage of a pipeline run.
pub fn format_pipeline_result(result: &PipelineResult) -> String {
    let mut out = String::new();

    out.push_str("=== finassist - Validate -> Answer -> Notify ===\n");
    out.push_str(&format!("Dataset: {}\n", result.dataset_path.display()));

    let status = if result.validation_report.passed() {
        "passed".to_string()
    } else {
        format!("failed ({} finding(s))", result.validation_report.findings().len())
    };
    out.push_str(&format!("\n1. Validation: {status}\n"));
    out.push_str(&format_validation_report(&result.validation_report));

    out.push_str("\n2. Question\n");
    out.push_str(&format!("Q: {}\n", result.question));
    out.push_str(&format!("A: {}\n", indent_continuation(&result.answer, "   ")));

    out.push_str("\n3. Notification: ");
    out.push_str(&format_outcome(result.notification_outcome.as_ref()));
    out.push('\n');

    out
}

fn format_outcome(outcome: Option<&NotificationOutcome>) -> String {
    match outcome {
        None => "skipped (validation passed)".to_string(),
        Some(outcome) => outcome.to_string(),
    }
}

fn indent_continuation(text: &str, indent: &str) -> String {
    text.lines().collect::<Vec<_>>().join(&format!("\n{indent}"))
}
