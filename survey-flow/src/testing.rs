//! In-memory collaborators for running survey sessions without a backend.
//!
//! `StaticSource` serves a fixed question set, `FailingSource` always fails
//! (to exercise the fallback path), and `TestSink` records every submission.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_flow::{FlowConfig, QuestionSet, StaticSource, SurveyFlow, TestSink};
//!
//! let config = FlowConfig::default();
//! let source = StaticSource::new(records);
//! let questions = QuestionSet::load(&source, "onboarding", Vec::new(), &config).await;
//!
//! let sink = TestSink::new();
//! let mut flow = SurveyFlow::new("onboarding", questions, &config);
//! flow.set_answer("Alice")?;
//! flow.advance(&sink).await?;
//!
//! assert_eq!(sink.submissions().len(), 1);
//! ```

use std::cell::RefCell;

use crate::{Answers, QuestionRecord, QuestionSource, SubmissionReceipt, SubmissionSink};

/// Error type for the in-memory collaborators.
#[derive(Debug, thiserror::Error)]
pub enum TestCollaboratorError {
    #[error("Question source unavailable: {0}")]
    Unavailable(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// A question source that always returns the same records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<QuestionRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

impl QuestionSource for StaticSource {
    type Error = TestCollaboratorError;

    async fn fetch(&self, _survey_id: &str) -> Result<Vec<QuestionRecord>, Self::Error> {
        Ok(self.records.clone())
    }
}

/// A question source that is always down.
#[derive(Debug, Clone, Default)]
pub struct FailingSource;

impl QuestionSource for FailingSource {
    type Error = TestCollaboratorError;

    async fn fetch(&self, survey_id: &str) -> Result<Vec<QuestionRecord>, Self::Error> {
        Err(TestCollaboratorError::Unavailable(survey_id.to_string()))
    }
}

/// A sink that records submissions, or rejects them when configured to fail.
#[derive(Debug, Default)]
pub struct TestSink {
    submissions: RefCell<Vec<(String, Answers)>>,
    failure: RefCell<Option<String>>,
}

impl TestSink {
    /// Create a sink that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every submission with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let sink = Self::default();
        sink.fail_with(message);
        sink
    }

    /// Start rejecting submissions.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.failure.replace(Some(message.into()));
    }

    /// Start accepting submissions again.
    pub fn recover(&self) {
        self.failure.replace(None);
    }

    /// Every accepted submission as `(survey_id, answers)`, in order.
    pub fn submissions(&self) -> Vec<(String, Answers)> {
        self.submissions.borrow().clone()
    }
}

impl SubmissionSink for TestSink {
    type Error = TestCollaboratorError;

    async fn submit(&self, survey_id: &str, answers: &Answers) -> Result<SubmissionReceipt, Self::Error> {
        if let Some(message) = self.failure.borrow().as_ref() {
            return Err(TestCollaboratorError::Rejected(message.clone()));
        }

        let mut submissions = self.submissions.borrow_mut();
        submissions.push((survey_id.to_string(), answers.clone()));
        Ok(SubmissionReceipt::with_reference(format!(
            "{survey_id}-{}",
            submissions.len()
        )))
    }
}
