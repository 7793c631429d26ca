use conversation::Message;
use time::OffsetDateTime;

use crate::paths::is_active_name;

/// Maximum number of characters of the first message shown in a summary.
pub const SUMMARY_LIMIT: usize = 50;

const EMPTY_SUMMARY: &str = "no content";

/// One session file as read from the directory, before numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub name: String,
    pub modified: OffsetDateTime,
    pub summary: String,
}

/// Listing entry for a session.
///
/// `id` is the 1-based position in modification-time order and changes
/// whenever sessions are deleted; it is not a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: usize,
    pub name: String,
    pub summary: String,
    pub timestamp: OffsetDateTime,
    pub active: bool,
}

/// Orders session files by modification time (then name) and assigns
/// contiguous ordinals starting at 1.
#[must_use]
pub fn number_records(mut files: Vec<SessionFile>) -> Vec<SessionRecord> {
    files.sort_by(|left, right| {
        left.modified
            .cmp(&right.modified)
            .then_with(|| left.name.cmp(&right.name))
    });

    files
        .into_iter()
        .enumerate()
        .map(|(index, file)| SessionRecord {
            id: index + 1,
            active: is_active_name(&file.name),
            name: file.name,
            summary: file.summary,
            timestamp: file.modified,
        })
        .collect()
}

/// Summarizes a session by its first message.
#[must_use]
pub fn summarize(messages: &[Message]) -> String {
    let Some(first) = messages.first() else {
        return EMPTY_SUMMARY.to_owned();
    };

    // Text of exactly SUMMARY_LIMIT characters is still marked as cut.
    if first.text.chars().count() < SUMMARY_LIMIT {
        return first.text.clone();
    }
    let head = first.text.chars().take(SUMMARY_LIMIT).collect::<String>();
    format!("{head}...")
}
