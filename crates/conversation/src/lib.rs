//! Shared conversation contract for `gen`.
//!
//! This crate defines only the message history types that are persisted by
//! `session_store` and replayed by `gemini_api`, plus the debug logging
//! capability both of them accept. It excludes transport payloads and any
//! on-disk layout concerns.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Speaker of one conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Returns the wire name used by the remote service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a file previously uploaded to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub uri: String,
    pub mime_type: String,
    pub label: String,
}

impl FileReference {
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            label: label.into(),
        }
    }
}

/// One turn half of a conversation. Never mutated once appended to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileReference>,
}

impl Message {
    /// Constructs a user message carrying the given attachments.
    #[must_use]
    pub fn user(text: impl Into<String>, files: Vec<FileReference>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            files,
        }
    }

    /// Constructs a model message. Model turns never carry attachments.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            files: Vec::new(),
        }
    }
}

/// Debug logging capability injected into components that want to report
/// request/response detail.
pub trait DebugLog: Send + Sync {
    /// Records one debug event. `detail` is free-form diagnostic text.
    fn debug(&self, event: &str, detail: &str);
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLog;

impl DebugLog for NoopLog {
    fn debug(&self, _event: &str, _detail: &str) {}
}

/// Shared handle to a debug logger.
pub type SharedLog = Arc<dyn DebugLog>;

/// Returns a shared no-op logger, the default for every component.
#[must_use]
pub fn noop_log() -> SharedLog {
    Arc::new(NoopLog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_files_are_omitted_when_empty() {
        let json = serde_json::to_value(Message::model("hi")).expect("serialize");
        assert_eq!(json, serde_json::json!({"role": "model", "text": "hi"}));
    }

    #[test]
    fn message_files_use_camel_case_keys() {
        let message = Message::user(
            "look",
            vec![FileReference::new("files/abc", "image/png", "cat.png")],
        );
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["role"], "user");
        assert_eq!(json["files"][0]["mimeType"], "image/png");
        assert_eq!(json["files"][0]["label"], "cat.png");
    }

    #[test]
    fn message_without_files_field_deserializes() {
        let message: Message =
            serde_json::from_str(r#"{"role":"user","text":"hello"}"#).expect("deserialize");
        assert_eq!(message, Message::user("hello", Vec::new()));
    }

    #[test]
    fn role_display_matches_wire_name() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Model.to_string(), "model");
    }
}
