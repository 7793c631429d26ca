use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Subdirectory of the app directory that holds session files.
pub const SESSION_DIR: &str = "session";

/// File name suffix marking the session that receives new turns.
pub const ACTIVE_SESSION_SUFFIX: &str = ".active";

#[must_use]
pub fn session_root(app_dir: &Path) -> PathBuf {
    app_dir.join(SESSION_DIR)
}

/// Name for a freshly created active session: `<unix-nanos>_<random>.active`.
///
/// The timestamp prefix gives a natural creation-order sort key that survives
/// the active-suffix rename.
#[must_use]
pub fn new_session_file_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    session_file_name(nanos, rand::random::<u64>())
}

#[must_use]
pub(crate) fn session_file_name(nanos: u128, random: u64) -> String {
    format!("{nanos}_{random}{ACTIVE_SESSION_SUFFIX}")
}

#[must_use]
pub(crate) fn is_active_name(name: &str) -> bool {
    name.ends_with(ACTIVE_SESSION_SUFFIX)
}

#[must_use]
pub(crate) fn stashed_name(name: &str) -> &str {
    name.strip_suffix(ACTIVE_SESSION_SUFFIX).unwrap_or(name)
}

#[must_use]
pub(crate) fn activated_name(name: &str) -> String {
    format!("{name}{ACTIVE_SESSION_SUFFIX}")
}
