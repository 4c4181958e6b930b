//! Master session index.
//!
//! `Metadata/Available_Sessions.txt` lists one session file name per line,
//! in store order. It is the entry point for [`super::load`].

use crate::paths::{Layout, INDEX_FILE};
use crate::session::SessionStore;

use super::{read_optional, write_atomic, PersistenceError};

/// Name used for the index in error messages.
pub const INDEX_LABEL: &str = INDEX_FILE;

pub fn encode_index(names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Parse the index. Blank lines are skipped.
pub fn decode_index(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Save the index for `store`.
pub fn write_index(layout: &Layout, store: &SessionStore) -> Result<(), PersistenceError> {
    write_atomic(&layout.index_file(), &encode_index(&store.names()))
}

/// Load the index.
///
/// Returns an empty list if the file doesn't exist.
pub fn read_index(layout: &Layout) -> Result<Vec<String>, PersistenceError> {
    match read_optional(&layout.index_file())? {
        Some(contents) => Ok(decode_index(&contents)),
        None => {
            log::debug!("no session index at {}", layout.index_file().display());
            Ok(Vec::new())
        }
    }
}
