use gemini_api::GeminiApiError;
use response_schema::SchemaError;
use session_store::SessionStoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Every failure that ends an invocation, grouped by what the operator has
/// to fix.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("attachment error: {0}")]
    File(#[source] GeminiApiError),

    #[error("network error: {0}")]
    Network(#[source] GeminiApiError),

    #[error("service error: {0}")]
    Protocol(#[source] GeminiApiError),

    #[error("session error: {0}")]
    Session(#[from] SessionStoreError),

    #[error("unable to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("unable to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Short category name, stable across messages.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::File(_) => "file",
            Self::Network(_) | Self::Runtime(_) => "network",
            Self::Protocol(_) => "protocol",
            Self::Session(_) => "session",
            Self::Output(_) => "output",
        }
    }
}

impl From<SchemaError> for AppError {
    fn from(error: SchemaError) -> Self {
        Self::Validation(format!("invalid schema definition: {error}"))
    }
}

impl From<GeminiApiError> for AppError {
    fn from(error: GeminiApiError) -> Self {
        match error {
            GeminiApiError::MissingApiKey => Self::Config(ConfigError::MissingApiKey {
                var: crate::config::API_KEY_ENV,
            }),
            GeminiApiError::InvalidRequest(_) | GeminiApiError::InvalidSchema(_) => {
                Self::Validation(error.to_string())
            }
            GeminiApiError::File { .. } => Self::File(error),
            GeminiApiError::Request { .. } => Self::Network(error),
            GeminiApiError::Status { .. }
            | GeminiApiError::MissingUploadUrl { .. }
            | GeminiApiError::Decode { .. }
            | GeminiApiError::NoValidCandidate { .. }
            | GeminiApiError::Encode(_) => Self::Protocol(error),
        }
    }
}
