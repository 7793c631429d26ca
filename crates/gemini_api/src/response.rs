use conversation::FileReference;

use crate::error::GeminiApiError;
use crate::payload::{GenerateContentResponse, FINISH_REASON_STOP};

/// Usable result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub tokens: u64,
    /// References uploaded for this turn, to be persisted with the prompt.
    pub files: Vec<FileReference>,
}

/// Validates a raw `generateContent` body and extracts the first candidate.
///
/// Only the first candidate is considered, and only when it finished with
/// [`FINISH_REASON_STOP`]; the raw body is kept in every error.
pub fn parse_response(
    body: &str,
    files: Vec<FileReference>,
) -> Result<Generation, GeminiApiError> {
    let response = serde_json::from_str::<GenerateContentResponse>(body).map_err(|source| {
        GeminiApiError::Decode {
            operation: "generate content",
            body: body.to_owned(),
            source,
        }
    })?;

    let Some(candidate) = response.candidates.first() else {
        return Err(GeminiApiError::NoValidCandidate {
            finish_reason: None,
            body: body.to_owned(),
        });
    };

    if candidate.finish_reason.as_deref() != Some(FINISH_REASON_STOP) {
        return Err(GeminiApiError::NoValidCandidate {
            finish_reason: candidate.finish_reason.clone(),
            body: body.to_owned(),
        });
    }

    let text = candidate
        .content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect::<String>();

    Ok(Generation {
        text,
        tokens: response.usage_metadata.total_token_count,
        files,
    })
}
