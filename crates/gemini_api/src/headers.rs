use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::GeminiApiError;

pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_CONTENT_LENGTH: &str = "content-length";
pub const HEADER_UPLOAD_PROTOCOL: &str = "x-goog-upload-protocol";
pub const HEADER_UPLOAD_COMMAND: &str = "x-goog-upload-command";
pub const HEADER_UPLOAD_CONTENT_LENGTH: &str = "x-goog-upload-header-content-length";
pub const HEADER_UPLOAD_CONTENT_TYPE: &str = "x-goog-upload-header-content-type";
pub const HEADER_UPLOAD_OFFSET: &str = "x-goog-upload-offset";
pub const HEADER_UPLOAD_URL: &str = "x-goog-upload-url";

pub const UPLOAD_PROTOCOL_RESUMABLE: &str = "resumable";
pub const UPLOAD_COMMAND_START: &str = "start";
pub const UPLOAD_COMMAND_FINALIZE: &str = "upload, finalize";

/// Headers for the metadata-only request that opens an upload session.
pub fn start_upload_headers(byte_len: u64, content_type: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_UPLOAD_PROTOCOL.to_owned(),
        UPLOAD_PROTOCOL_RESUMABLE.to_owned(),
    );
    headers.insert(
        HEADER_UPLOAD_COMMAND.to_owned(),
        UPLOAD_COMMAND_START.to_owned(),
    );
    headers.insert(
        HEADER_UPLOAD_CONTENT_LENGTH.to_owned(),
        byte_len.to_string(),
    );
    headers.insert(
        HEADER_UPLOAD_CONTENT_TYPE.to_owned(),
        content_type.to_owned(),
    );
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    headers
}

/// Headers for the request that sends all bytes and closes the session.
pub fn finalize_upload_headers(byte_len: u64) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(HEADER_CONTENT_LENGTH.to_owned(), byte_len.to_string());
    headers.insert(HEADER_UPLOAD_OFFSET.to_owned(), "0".to_owned());
    headers.insert(
        HEADER_UPLOAD_COMMAND.to_owned(),
        UPLOAD_COMMAND_FINALIZE.to_owned(),
    );
    headers
}

pub(crate) fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, GeminiApiError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        out.insert(
            HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                GeminiApiError::InvalidRequest(format!("invalid header key: {key}"))
            })?,
            HeaderValue::from_str(value).map_err(|_| {
                GeminiApiError::InvalidRequest(format!("invalid header value for {key}"))
            })?,
        );
    }
    Ok(out)
}
