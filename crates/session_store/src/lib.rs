//! File-backed conversation sessions.
//!
//! Each session is one JSON file under `<app_dir>/session`. Exactly one file at
//! most carries the [`ACTIVE_SESSION_SUFFIX`] and receives new turns; the rest
//! are stashed sessions that can be restored by their listing ordinal.
//!
//! The store assumes a single writer: concurrent invocations against the same
//! app directory are not coordinated.

mod error;
mod paths;
mod records;
mod store;

pub use error::SessionStoreError;
pub use paths::{new_session_file_name, session_root, ACTIVE_SESSION_SUFFIX, SESSION_DIR};
pub use records::{number_records, summarize, SessionFile, SessionRecord, SUMMARY_LIMIT};
pub use store::SessionStore;
