//! Error taxonomy shared by the fetcher, normalizer and classifier.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// No API credential was supplied; the platform client cannot be built.
    #[error("no API key found: set YOUTUBE_API_KEY (environment or .env file)")]
    MissingCredential,

    /// The incoming batch does not carry a column the stage requires.
    #[error("column '{column}' not found in batch ({stage})")]
    MissingColumn { column: String, stage: &'static str },

    #[error("API error (status {status}): {reason}")]
    Api { status: u16, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    /// Raised by the orchestrated flow only; the core fetcher treats empty results as valid.
    /// Covers both an empty fetch and a fetch whose comments were all removed by cleaning.
    #[error("no comments found for video {video_id}")]
    NoComments { video_id: String },
}

impl PipelineError {
    pub fn missing_column(column: impl Into<String>, stage: &'static str) -> Self {
        Self::MissingColumn { column: column.into(), stage }
    }

    /// Whether a whole-task retry at the orchestration boundary may help.
    /// An empty result is final: a video without comments fails the flow at once.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Transport(_) => true,
            PipelineError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Errors worth pairing with a "check your credential" hint when reported to the operator.
    pub fn suggests_credential_check(&self) -> bool {
        match self {
            PipelineError::MissingCredential => true,
            PipelineError::Api { status, .. } => matches!(status, 400 | 401 | 403),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PipelineError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            PipelineError::Api { status: status.as_u16(), reason: e.to_string() }
        } else {
            PipelineError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(PipelineError::Transport("reset".into()).is_retryable());
        assert!(PipelineError::Api { status: 503, reason: String::new() }.is_retryable());
        assert!(PipelineError::Api { status: 429, reason: String::new() }.is_retryable());
        assert!(!PipelineError::Api { status: 403, reason: String::new() }.is_retryable());
        assert!(!PipelineError::NoComments { video_id: "v".into() }.is_retryable());
        assert!(!PipelineError::MissingCredential.is_retryable());
    }

    #[test]
    fn credential_hint_for_auth_failures() {
        assert!(PipelineError::MissingCredential.suggests_credential_check());
        assert!(PipelineError::Api { status: 403, reason: String::new() }.suggests_credential_check());
        assert!(!PipelineError::Transport("x".into()).suggests_credential_check());
    }
}
