/// Error type for survey flow operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The session was already submitted; it accepts no further edits or navigation.
    #[error("Survey session already completed")]
    Completed,

    /// The submission sink rejected or failed to store the answers.
    /// The session is left intact so the submission can be retried.
    #[error("Submission failed: {0}")]
    Submission(#[source] anyhow::Error),
}

impl FlowError {
    /// Create a submission error from any error type.
    pub fn submission(err: impl Into<anyhow::Error>) -> Self {
        Self::Submission(err.into())
    }

    /// Check if this error means the session is already finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
