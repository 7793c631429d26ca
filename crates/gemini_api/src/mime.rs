use std::path::Path;

/// Content type used for anything not in [`MIME_TYPES`].
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Extension to content type table for attachments the service renders
/// natively.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("webp", "image/webp"),
];

/// Best-effort content type for a local file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    let extension = extension.to_ascii_lowercase();

    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
