use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup timed out")]
    Timeout,
    #[error("Lookup service unavailable: {0}")]
    Unavailable(String),
    #[error("Lookup service has no answer for this variant: {0}")]
    NoAnswer(String),
    #[error("Invalid lookup response: {0}")]
    Invalid(String),
    #[error("No lookup service configured")]
    NotConfigured,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LookupError {
    /// Failures worth retrying: the service may answer on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Timeout | LookupError::Unavailable(_))
    }
}
