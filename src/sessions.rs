use session_store::SessionRecord;
use time::macros::format_description;

const ACTIVE_MARKER: &str = "* ";
const INACTIVE_MARKER: &str = "  ";

/// One line per session, oldest first, the active one marked with `*`.
#[must_use]
pub fn format_records(records: &[SessionRecord]) -> String {
    records.iter().map(format_record).collect()
}

fn format_record(record: &SessionRecord) -> String {
    let marker = if record.active {
        ACTIVE_MARKER
    } else {
        INACTIVE_MARKER
    };
    let date = record
        .timestamp
        .format(format_description!("[month repr:long] [day] [year]"))
        .unwrap_or_else(|_| record.timestamp.date().to_string());

    format!(
        "{marker}#{} ({date}): {}\n",
        record.id,
        record.summary.to_lowercase()
    )
}
