use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use conversation::{noop_log, FileReference, Message, SharedLog};
use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::paths::{activated_name, is_active_name, new_session_file_name, session_root, stashed_name};
use crate::records::{number_records, summarize, SessionFile, SessionRecord};

/// Session lifecycle over one app directory.
///
/// Holds no cached state: every operation reads the directory afresh, so
/// ordinals returned by [`SessionStore::list`] are only meaningful until the
/// next mutating call.
pub struct SessionStore {
    root: PathBuf,
    log: SharedLog,
}

struct DirEntryInfo {
    name: String,
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(app_dir: &Path) -> Self {
        Self {
            root: session_root(app_dir),
            log: noop_log(),
        }
    }

    #[must_use]
    pub fn with_logger(mut self, log: SharedLog) -> Self {
        self.log = log;
        self
    }

    /// Directory holding the session files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the active session file, if one exists.
    pub fn active_session_path(&self) -> Result<Option<PathBuf>, SessionStoreError> {
        Ok(self
            .session_files()?
            .into_iter()
            .find(|entry| is_active_name(&entry.name))
            .map(|entry| entry.path))
    }

    /// Returns the active session's messages, or an empty history when there
    /// is no active session yet. Never creates files.
    pub fn read(&self) -> Result<Vec<Message>, SessionStoreError> {
        match self.active_session_path()? {
            Some(path) => read_messages(&path),
            None => Ok(Vec::new()),
        }
    }

    /// Appends one user/model exchange to the active session, creating it
    /// when needed.
    ///
    /// The file is rewritten whole: the new document is serialized before the
    /// file is truncated, so an encode failure never clobbers history.
    pub fn write(
        &self,
        user_text: &str,
        files: Vec<FileReference>,
        response_text: &str,
    ) -> Result<(), SessionStoreError> {
        let (path, mut messages) = match self.active_session_path()? {
            Some(path) => {
                let messages = read_messages(&path)?;
                (path, messages)
            }
            None => {
                fs::create_dir_all(&self.root).map_err(|source| {
                    SessionStoreError::io("creating session directory", &self.root, source)
                })?;
                let path = self.root.join(new_session_file_name());
                self.log
                    .debug("session_created", &path.display().to_string());
                (path, Vec::new())
            }
        };

        messages.push(Message::user(user_text, files));
        messages.push(Message::model(response_text));

        let mut encoded = serde_json::to_vec_pretty(&messages)
            .map_err(|source| SessionStoreError::encode(&path, source))?;
        encoded.push(b'\n');

        fs::write(&path, encoded)
            .map_err(|source| SessionStoreError::io("writing session file", &path, source))?;
        self.log.debug(
            "session_written",
            &format!("path={} messages={}", path.display(), messages.len()),
        );

        Ok(())
    }

    /// Lists every session, oldest modification first, numbered from 1.
    pub fn list(&self) -> Result<Vec<SessionRecord>, SessionStoreError> {
        let mut files = Vec::new();

        for entry in self.session_files()? {
            let metadata = fs::metadata(&entry.path).map_err(|source| {
                SessionStoreError::io("reading session file metadata", &entry.path, source)
            })?;
            let modified = metadata.modified().map_err(|source| {
                SessionStoreError::io("reading session file timestamp", &entry.path, source)
            })?;
            let messages = read_messages(&entry.path)?;

            files.push(SessionFile {
                name: entry.name,
                modified: OffsetDateTime::from(modified),
                summary: summarize(&messages),
            });
        }

        Ok(number_records(files))
    }

    /// Demotes the active session to a stashed one. No-op without an active
    /// session.
    pub fn stash(&self) -> Result<(), SessionStoreError> {
        let Some(path) = self.active_session_path()? else {
            return Ok(());
        };

        let target = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => path.with_file_name(stashed_name(name)),
            None => return Ok(()),
        };

        fs::rename(&path, &target)
            .map_err(|source| SessionStoreError::io("stashing active session", &path, source))?;
        self.log
            .debug("session_stashed", &target.display().to_string());

        Ok(())
    }

    /// Makes the session with ordinal `id` active, stashing the current one.
    pub fn restore(&self, id: usize) -> Result<(), SessionStoreError> {
        let record = self.resolve(id)?;
        if record.active {
            return Ok(());
        }

        self.stash()?;

        let source = self.root.join(&record.name);
        let target = self.root.join(activated_name(&record.name));
        fs::rename(&source, &target)
            .map_err(|error| SessionStoreError::io("restoring session", &source, error))?;
        self.log
            .debug("session_restored", &target.display().to_string());

        Ok(())
    }

    /// Removes the session with ordinal `id`, active or not.
    pub fn delete(&self, id: usize) -> Result<(), SessionStoreError> {
        let record = self.resolve(id)?;
        let path = self.root.join(&record.name);

        fs::remove_file(&path)
            .map_err(|source| SessionStoreError::io("deleting session file", &path, source))?;
        self.log
            .debug("session_deleted", &path.display().to_string());

        Ok(())
    }

    /// Removes the whole session directory.
    pub fn delete_all(&self) -> Result<(), SessionStoreError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                self.log
                    .debug("sessions_deleted", &self.root.display().to_string());
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::io(
                "deleting session directory",
                &self.root,
                source,
            )),
        }
    }

    fn resolve(&self, id: usize) -> Result<SessionRecord, SessionStoreError> {
        let records = self.list()?;
        let available = records.len();

        id.checked_sub(1)
            .and_then(|index| records.into_iter().nth(index))
            .ok_or(SessionStoreError::InvalidRecordId { id, available })
    }

    fn session_files(&self) -> Result<Vec<DirEntryInfo>, SessionStoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SessionStoreError::io(
                    "reading session directory",
                    &self.root,
                    source,
                ))
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                SessionStoreError::io("reading session directory", &self.root, source)
            })?;
            let file_type = entry.file_type().map_err(|source| {
                SessionStoreError::io("reading session file type", entry.path(), source)
            })?;
            if !file_type.is_file() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            files.push(DirEntryInfo {
                name,
                path: entry.path(),
            });
        }

        files.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(files)
    }
}

fn read_messages(path: &Path) -> Result<Vec<Message>, SessionStoreError> {
    let bytes =
        fs::read(path).map_err(|source| SessionStoreError::io("reading session file", path, source))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&bytes).map_err(|source| SessionStoreError::decode(path, source))
}
