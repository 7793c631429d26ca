use std::time::Duration;

use crate::url::{DEFAULT_API_URL, DEFAULT_UPLOAD_URL};

/// Transport configuration for Gemini API requests.
#[derive(Debug, Clone)]
pub struct GeminiApiConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL under which `models/<model>:generateContent` is resolved.
    pub api_url: String,
    /// Endpoint that starts resumable file uploads.
    pub upload_url: String,
    /// Optional transport timeout. Unset means the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Default for GeminiApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: None,
        }
    }
}

impl GeminiApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
