use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Answers, ChoiceOption, Kind, QuestionRecord};

/// Strategy that decides the semantic kind of a raw question.
///
/// The default implementation lives in `survey-flow` (`KeywordClassifier`);
/// implement this to plug in per-locale or per-tenant rules.
pub trait Classifier {
    /// Classify a question from its prompt text, optional type hint and options.
    fn classify(&self, text: &str, raw_type: Option<&str>, options: &[ChoiceOption]) -> Kind;
}

/// Supplies the ordered question set for a survey.
///
/// Fetched once per session. Failures are not fatal: the loader falls back to
/// a caller-supplied question set.
pub trait QuestionSource {
    /// The error type for this source.
    type Error: Into<anyhow::Error>;

    /// Fetch the question records for `survey_id`.
    fn fetch(
        &self,
        survey_id: &str,
    ) -> impl Future<Output = Result<Vec<QuestionRecord>, Self::Error>>;
}

/// Accepts the finalized answers of a survey session.
///
/// No retries happen on the caller's side; a failed submission is reported
/// and the session stays open.
pub trait SubmissionSink {
    /// The error type for this sink.
    type Error: Into<anyhow::Error>;

    /// Submit the answers for `survey_id`.
    fn submit(
        &self,
        survey_id: &str,
        answers: &Answers,
    ) -> impl Future<Output = Result<SubmissionReceipt, Self::Error>>;
}

/// What a sink reports back after accepting a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Sink-specific reference for the stored submission, if it hands one out.
    #[serde(default)]
    pub reference: Option<String>,
}

impl SubmissionReceipt {
    /// Receipt carrying a reference.
    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
        }
    }
}
