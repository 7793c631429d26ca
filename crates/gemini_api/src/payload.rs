use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Finish reason of a candidate that completed normally.
pub const FINISH_REASON_STOP: &str = "STOP";

pub const RESPONSE_MIME_JSON: &str = "application/json";
pub const RESPONSE_MIME_TEXT: &str = "text/plain";

/// Request payload for the `generateContent` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part: either text or a reference to an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "fileData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_data: Option<FileData>,
}

impl Part {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    #[must_use]
    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "fileUri")]
    pub file_uri: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Tool {
    #[serde(rename = "googleSearch", skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl Tool {
    #[must_use]
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

/// Search grounding tool. Carries no options.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(rename = "topP")]
    pub top_p: f64,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    /// Schema embedded verbatim, byte for byte.
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Box<RawValue>>,
}

/// Response payload of the `generateContent` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    pub usage_metadata: UsageMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u64,
}

/// Response of the finalize phase of a file upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub file: UploadedFile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mime_type: String,
    pub uri: String,
}
