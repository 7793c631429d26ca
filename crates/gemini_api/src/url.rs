/// Default base URL for generation requests.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default endpoint for starting resumable uploads.
pub const DEFAULT_UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";

const GENERATE_CONTENT_METHOD: &str = ":generateContent";

/// Resolve the `generateContent` endpoint for a model.
///
/// Resolution rules:
/// 1) a base already ending in `:generateContent` is used unchanged
/// 2) a base ending in `/models` gets `/<model>:generateContent`
/// 3) anything else gets `/models/<model>:generateContent`
pub fn generate_content_url(base: &str, model: &str) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_API_URL
    } else {
        base.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(GENERATE_CONTENT_METHOD) {
        return trimmed.to_string();
    }
    if trimmed.ends_with("/models") {
        return format!("{trimmed}/{model}{GENERATE_CONTENT_METHOD}");
    }
    format!("{trimmed}/models/{model}{GENERATE_CONTENT_METHOD}")
}

/// Normalize the upload endpoint, falling back to the default when blank.
pub fn upload_start_url(base: &str) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_UPLOAD_URL
    } else {
        base.trim()
    };
    base.trim_end_matches('/').to_string()
}
