use std::path::PathBuf;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiApiError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response schema is not valid JSON: {0}")]
    InvalidSchema(#[source] serde_json::Error),

    #[error("unable to {operation} '{}': {source}", path.display())]
    File {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request error during {operation}: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed with HTTP {status}: {message}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        message: String,
        body: String,
    },

    #[error("upload url not found in start-upload response header '{header}'")]
    MissingUploadUrl { header: &'static str },

    #[error("unable to decode {operation} response: {source}. body: {body}")]
    Decode {
        operation: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no valid response candidates returned (finish reason: {}). response: {body}", finish_reason.as_deref().unwrap_or("none"))]
    NoValidCandidate {
        finish_reason: Option<String>,
        body: String,
    },

    #[error("unable to encode request as JSON: {0}")]
    Encode(#[source] serde_json::Error),
}

impl GeminiApiError {
    #[must_use]
    pub fn file(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::File {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn request(operation: &'static str, source: reqwest::Error) -> Self {
        Self::Request { operation, source }
    }

    #[must_use]
    pub fn status(operation: &'static str, status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Status {
            operation,
            status,
            message: parse_error_message(status, &body),
            body,
        }
    }

    /// Raw response body attached to the error, when there is one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. }
            | Self::Decode { body, .. }
            | Self::NoValidCandidate { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorPayloadFields {
    pub fn message_with_status(&self) -> Option<String> {
        let message = self.message.as_deref().and_then(non_empty_string)?;
        Some(match self.status.as_deref().and_then(non_empty_string) {
            Some(status) => format!("{status}: {message}"),
            None => message.to_owned(),
        })
    }
}

/// Extract a readable message from an error response body.
///
/// Prefers the service's `error.message` (prefixed by `error.status`), then
/// the raw body, then the canonical reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorPayload { value: Some(error) }) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = error.message_with_status() {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
