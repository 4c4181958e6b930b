//! Clipboard files.
//!
//! `Metadata/Clipboard/<name>` holds every entry, oldest first, each
//! followed by a `---` line.

use crate::history::Clipboard;
use crate::paths::Layout;
use crate::session::Session;

use super::{push_block, read_optional, write_atomic, LineReader, PersistenceError};

pub fn encode_clipboard(clipboard: &Clipboard) -> String {
    let mut out = String::new();
    for entry in clipboard.iter() {
        push_block(&mut out, entry);
    }
    out
}

/// Parse clipboard entries. A trailing entry without its delimiter is dropped.
pub fn decode_clipboard(file: &str, contents: &str) -> Clipboard {
    let mut reader = LineReader::new(file, contents);
    let mut entries = Vec::new();

    while let Ok(entry) = reader.block("clipboard entry") {
        entries.push(entry);
    }

    // Everything after the last delimiter; normally the empty tail after the final newline.
    let tail = contents
        .rsplit_once(super::DELIMITER)
        .map_or(contents, |(_, tail)| tail);
    if !tail.trim().is_empty() {
        log::warn!("{}: dropping unterminated clipboard entry", file);
    }

    Clipboard::from_entries(entries)
}

pub fn write_clipboard(layout: &Layout, session: &Session) -> Result<(), PersistenceError> {
    write_atomic(
        &layout.clipboard_file(session.name()),
        &encode_clipboard(session.clipboard()),
    )
}

/// Load a session's clipboard. A missing file is an empty clipboard.
pub fn read_clipboard(layout: &Layout, file_name: &str) -> Result<Clipboard, PersistenceError> {
    Ok(read_optional(&layout.clipboard_file(file_name))?
        .map(|contents| decode_clipboard(file_name, &contents))
        .unwrap_or_default())
}
