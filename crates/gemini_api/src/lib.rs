//! Transport and protocol layer for the Gemini `generateContent` API.
//!
//! This crate owns request assembly, the two-phase resumable file upload and
//! response validation. It contains no session persistence and no terminal
//! coupling: callers hand in history and receive a [`Generation`].
//!
//! Nothing here retries. Every failure is terminal for the call and carries
//! the status code and response body needed to diagnose it.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod mime;
pub mod payload;
pub mod request;
pub mod response;
pub mod url;

pub use client::GeminiApiClient;
pub use config::GeminiApiConfig;
pub use error::GeminiApiError;
pub use payload::{GenerateContentRequest, GenerateContentResponse, FINISH_REASON_STOP};
pub use request::{build_request, GenerationSettings, Prompt, UserProfile};
pub use response::{parse_response, Generation};
pub use url::{generate_content_url, DEFAULT_API_URL, DEFAULT_UPLOAD_URL};
