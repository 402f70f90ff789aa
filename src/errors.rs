use std::path::PathBuf;

use thiserror::Error;

use crate::ai::types::Usage;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("File not found: {}", .0.display())]
    EnvFileNotFound(PathBuf),

    #[error("Failed to load env file {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },

    #[error("OPENAI_API_KEY not found in environment variables")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("OpenAI API error (status {status}): {message}")]
    OpenAIError { status: u16, message: String },

    #[error("Failed to parse OpenAI response: {0}")]
    ParseError(String),

    #[error("Completion stopped at the token limit before the output was complete")]
    LengthLimit,

    #[error("Completion was blocked by the content filter")]
    ContentFilter,

    /// The model declined to answer; `usage` is what the refusal cost.
    #[error("Model refused the request: {message}")]
    Refusal {
        message: String,
        usage: Option<Usage>,
    },
}

impl AdapterError {
    /// Whether another attempt of the same request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::ParseError(_) | Self::LengthLimit => true,
            Self::OpenAIError { status, .. } => {
                matches!(*status, 408 | 409 | 429) || *status >= 500
            }
            Self::EnvFileNotFound(_)
            | Self::EnvFile { .. }
            | Self::MissingApiKey
            | Self::InvalidConfig(_)
            | Self::InvalidRequest(_)
            | Self::ContentFilter
            | Self::Refusal { .. } => false,
        }
    }

    /// Configuration problems are fatal and surface before any request is sent.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::EnvFileNotFound(_)
                | Self::EnvFile { .. }
                | Self::MissingApiKey
                | Self::InvalidConfig(_)
                | Self::InvalidRequest(_)
        )
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(error: reqwest::Error) -> Self {
        AdapterError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(error: serde_json::Error) -> Self {
        AdapterError::ParseError(error.to_string())
    }
}
