//! The three-stage assistant pipeline: Validate -> Answer -> Notify.
//!
//! Shared by every front-end so the workflow lives in one place. Stages run
//! strictly in order on the calling thread. A failing stage turns its failure
//! into a value (a load-error finding, a degraded answer, a `Failed`
//! outcome) and the run continues, so callers always get a complete
//! `PipelineResult`.

use std::path::{Path, PathBuf};

use crate::domain::{DEFAULT_ALERT_SUBJECT, DEFAULT_QUESTION, NotificationOutcome, PipelineResult, ValidationReport};
use crate::notify::Notifier;
use crate::oracle::Oracle;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Validating,
    Answering,
    Notifying,
    Done,
}

/// Inputs and position of one run. Each stage hands back what it produced,
/// so the result is only assembled once every stage has returned.
#[derive(Debug, Clone)]
struct PipelineState {
    stage: Stage,
    dataset_path: PathBuf,
    question: String,
}

impl PipelineState {
    fn new(dataset_path: &Path, question: Option<&str>) -> Self {
        let question = match question.map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => DEFAULT_QUESTION.to_string(),
        };
        Self {
            stage: Stage::Start,
            dataset_path: dataset_path.to_path_buf(),
            question,
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = ?self.stage, to = ?stage, "pipeline stage transition");
        self.stage = stage;
    }
}

/// Validate -> Answer -> Notify over pluggable oracle and notifier.
pub struct Pipeline<'a> {
    oracle: &'a dyn Oracle,
    notifier: &'a dyn Notifier,
    subject: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(oracle: &'a dyn Oracle, notifier: &'a dyn Notifier) -> Self {
        Self {
            oracle,
            notifier,
            subject: DEFAULT_ALERT_SUBJECT.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Run all stages. `None` (or a blank question) uses `DEFAULT_QUESTION`.
    pub fn run(&self, dataset_path: &Path, question: Option<&str>) -> PipelineResult {
        let span = tracing::info_span!("pipeline", dataset = %dataset_path.display());
        let _guard = span.enter();

        let mut state = PipelineState::new(dataset_path, question);

        let validation_report = self.validate(&mut state);
        let answer = self.answer(&mut state);
        let notification_outcome = self.notify(&mut state, &validation_report);

        state.enter(Stage::Done);
        tracing::info!(
            passed = validation_report.passed(),
            notified = notification_outcome.is_some(),
            "pipeline finished"
        );

        PipelineResult {
            dataset_path: state.dataset_path,
            question: state.question,
            validation_report,
            answer,
            notification_outcome,
        }
    }

    fn validate(&self, state: &mut PipelineState) -> ValidationReport {
        state.enter(Stage::Validating);
        let report = crate::validate::validate_path(&state.dataset_path);
        if report.passed() {
            tracing::info!("validation passed");
        } else {
            tracing::warn!(problems = report.findings().len(), "validation failed");
        }
        report
    }

    fn answer(&self, state: &mut PipelineState) -> String {
        state.enter(Stage::Answering);
        match self.oracle.answer(&state.question) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, question = %state.question, "question answering failed");
                format!("Question answering failed: {err}")
            }
        }
    }

    fn notify(&self, state: &mut PipelineState, report: &ValidationReport) -> Option<NotificationOutcome> {
        if !report.has_problems() {
            tracing::debug!("no problems found; skipping notification");
            return None;
        }

        let message = report.joined();
        state.enter(Stage::Notifying);
        let outcome = self.notifier.notify(&message, &self.subject);
        tracing::info!(delivered = outcome.is_delivered(), "notification attempted");
        Some(outcome)
    }
}

/// One-shot convenience wrapper around `Pipeline`.
pub fn run_pipeline(
    dataset_path: &Path,
    question: Option<&str>,
    oracle: &dyn Oracle,
    notifier: &dyn Notifier,
) -> PipelineResult {
    Pipeline::new(oracle, notifier).run(dataset_path, question)
}
