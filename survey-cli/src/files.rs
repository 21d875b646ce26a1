//! File-backed question source and submission sink.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use survey_flow::{
    Answers, QuestionRecord, QuestionSource, SubmissionReceipt, SubmissionSink,
};
use tracing::debug;

/// Reads the question set from a JSON file in the provider's wire format.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuestionSource for FileSource {
    type Error = anyhow::Error;

    async fn fetch(&self, survey_id: &str) -> Result<Vec<QuestionRecord>, Self::Error> {
        debug!(survey_id, path = %self.path.display(), "reading question file");
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("{} is not a valid question set", self.path.display()))
    }
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    survey_id: &'a str,
    answers: &'a Answers,
}

/// Writes finalized answers as pretty JSON to a file, or to stdout.
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    output: Option<PathBuf>,
}

impl JsonSink {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

impl SubmissionSink for JsonSink {
    type Error = anyhow::Error;

    async fn submit(&self, survey_id: &str, answers: &Answers) -> Result<SubmissionReceipt, Self::Error> {
        let json = serde_json::to_string_pretty(&Submission { survey_id, answers })?;
        match &self.output {
            Some(path) => {
                tokio::fs::write(path, format!("{json}\n"))
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                Ok(SubmissionReceipt::with_reference(path.display().to_string()))
            }
            None => {
                println!("{json}");
                Ok(SubmissionReceipt::default())
            }
        }
    }
}
