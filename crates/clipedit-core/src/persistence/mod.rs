//! Persistence layer for sessions, histories and clipboards.
//!
//! # Overview
//!
//! This module is the only part of the engine that touches storage:
//!
//! - **Index** - `Metadata/Available_Sessions.txt`, the ordered list of session files
//! - **Metadata** - `Metadata/Sessions/<name>`, name, cursor and every command
//! - **Clipboard** - `Metadata/Clipboard/<name>`, clipboard entries
//! - **Documents** - `Sessions/<name>`, the live document text
//!
//! See [`crate::paths::Layout`] for the directory tree.
//!
//! # Design Principles
//!
//! ## Atomic Writes
//!
//! Every file is written to `<file>.tmp` and then renamed over the target,
//! so an interrupted save leaves either the old or the new content.
//!
//! ## Missing Files Are Empty
//!
//! A missing index means no sessions; a missing metadata, clipboard or
//! document file means an empty history, clipboard or text. Only malformed
//! content is an error.
//!
//! # Usage
//!
//! ```ignore
//! use clipedit_core::persistence::{load, save};
//!
//! let mut store = load(&layout)?;
//! // ... edit ...
//! save(&layout, &store)?;
//! ```

pub mod clipboard;
pub mod documents;
pub mod index;
pub mod metadata;

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::history::CommandHistory;
use crate::paths::Layout;
use crate::session::{validate_name, Session, SessionStore, SESSION_EXTENSION};

/// Line that terminates every text block and clipboard entry.
pub const DELIMITER: &str = "---";

/// Whether `text` has a line equal to [`DELIMITER`], which no text block can hold.
pub fn contains_delimiter_line(text: &str) -> bool {
    text.split('\n')
        .any(|line| line.strip_suffix('\r').unwrap_or(line) == DELIMITER)
}

/// Error type for persistence operations.
#[derive(Debug)]
pub enum PersistenceError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// File content does not follow the metadata format
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "IO error: {e}"),
            PersistenceError::Malformed { file, line, reason } => {
                write!(f, "Malformed {file} at line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

/// Write every session to disk and drop files of sessions that no longer exist.
pub fn save(layout: &Layout, store: &SessionStore) -> Result<(), PersistenceError> {
    let live: HashSet<String> = store.names().into_iter().collect();
    let removed = remove_stale(&layout.session_metadata_dir(), &live)?
        + remove_stale(&layout.clipboard_dir(), &live)?;
    if removed > 0 {
        log::debug!("removed {} stale metadata file(s)", removed);
    }

    index::write_index(layout, store)?;
    for session in store.iter() {
        metadata::write_metadata(layout, session)?;
        clipboard::write_clipboard(layout, session)?;
    }

    log::info!("saved {} session(s) to {}", store.len(), layout.root().display());
    Ok(())
}

/// Rebuild every session listed in the index.
///
/// Returns an empty store when no index exists. An index entry that is not a
/// valid session name is skipped; IO errors abort the load.
pub fn load(layout: &Layout) -> Result<SessionStore, PersistenceError> {
    let mut store = SessionStore::new();
    for file_name in index::read_index(layout)? {
        match load_session(layout, &file_name) {
            Ok(session) => {
                store.push(session);
            }
            Err(e @ PersistenceError::Malformed { .. }) => {
                log::warn!("skipping session {:?}: {}", file_name, e);
            }
            Err(e) => return Err(e),
        }
    }
    log::info!("loaded {} session(s) from {}", store.len(), layout.root().display());
    Ok(store)
}

fn load_session(layout: &Layout, file_name: &str) -> Result<Session, PersistenceError> {
    let stem = file_name.strip_suffix(SESSION_EXTENSION).unwrap_or(file_name);
    if let Err(e) = validate_name(stem) {
        return Err(PersistenceError::Malformed {
            file: index::INDEX_LABEL.to_string(),
            line: 0,
            reason: e.to_string(),
        });
    }

    let history = match metadata::read_metadata(layout, file_name) {
        Ok(Some((stored_name, history))) => {
            if stored_name != file_name {
                log::warn!(
                    "session file {} names itself {:?}; keeping the indexed name",
                    file_name,
                    stored_name
                );
            }
            history
        }
        Ok(None) => {
            log::warn!("no metadata for session {}, starting with empty history", file_name);
            CommandHistory::new()
        }
        Err(e @ PersistenceError::Malformed { .. }) => {
            log::warn!("{}; starting session {} with empty history", e, file_name);
            CommandHistory::new()
        }
        Err(e) => return Err(e),
    };

    let clipboard = clipboard::read_clipboard(layout, file_name)?;
    let text = documents::read_document(layout, file_name)?;

    Ok(Session::restore(file_name.to_string(), history, clipboard, text))
}

/// Delete every `*.txt` in `dir` whose file name is not in `keep`.
///
/// Returns the number of files removed. A missing directory has nothing to remove.
pub fn remove_stale(dir: &Path, keep: &HashSet<String>) -> Result<usize, PersistenceError> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e != "txt").unwrap_or(true) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !keep.contains(file_name) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// Write to `<path>.tmp`, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp: OsString = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp_path = PathBuf::from(temp);

    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a file, `None` if it does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Line-oriented reader shared by the metadata and clipboard decoders.
pub(crate) struct LineReader<'a> {
    file: &'a str,
    lines: std::str::Split<'a, char>,
    line: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(file: &'a str, contents: &'a str) -> Self {
        Self {
            file,
            lines: contents.split('\n'),
            line: 0,
        }
    }

    /// Next raw line, without its `\n`.
    pub(crate) fn next_raw(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line)
    }

    /// Next line with a trailing `\r` stripped; end of file is an error.
    pub(crate) fn next_line(&mut self, what: &str) -> Result<&'a str, PersistenceError> {
        match self.next_raw() {
            Some(line) => Ok(line.trim_end_matches('\r')),
            None => Err(self.malformed(format!("unexpected end of file, expected {what}"))),
        }
    }

    pub(crate) fn number<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, PersistenceError> {
        let line = self.next_line(what)?;
        line.trim()
            .parse()
            .map_err(|_| self.malformed(format!("expected {what}, found {line:?}")))
    }

    pub(crate) fn delimiter(&mut self) -> Result<(), PersistenceError> {
        let line = self.next_line(DELIMITER)?;
        if line != DELIMITER {
            return Err(self.malformed(format!("expected {DELIMITER:?}, found {line:?}")));
        }
        Ok(())
    }

    /// Lines up to the next delimiter, joined with `\n`.
    pub(crate) fn block(&mut self, what: &str) -> Result<String, PersistenceError> {
        let mut lines = Vec::new();
        loop {
            let Some(line) = self.next_raw() else {
                return Err(self.malformed(format!("unterminated {what}")));
            };
            if line.trim_end_matches('\r') == DELIMITER {
                return Ok(lines.join("\n"));
            }
            lines.push(line);
        }
    }

    pub(crate) fn malformed(&self, reason: String) -> PersistenceError {
        PersistenceError::Malformed {
            file: self.file.to_string(),
            line: self.line,
            reason,
        }
    }
}

/// Append `text` as a delimited block.
pub(crate) fn push_block(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
    out.push_str(DELIMITER);
    out.push('\n');
}

// ============================================================================
// TESTS
// ============================================================================
