use reelfetch_sources::FetchError;
use thiserror::Error;

/// Failures that abort a lookup and are reported to the caller.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// One of the two providers failed, so no record can be merged.
    #[error("metadata unavailable: {0}")]
    MergeUnavailable(#[source] FetchError),
}

impl LookupError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        LookupError::MalformedInput(reason.into())
    }

    /// The underlying provider failure, when there is one.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            LookupError::MergeUnavailable(e) => Some(e),
            LookupError::MalformedInput(_) => None,
        }
    }
}
