//! Session metadata files.
//!
//! # File Format
//!
//! `Metadata/Sessions/<name>`:
//!
//! ```text
//! report.txt            session name
//! 3                     command count
//! 1                     history cursor (-1 = nothing applied)
//! PasteCommand          one record per command, oldest first
//! ---
//!                       text before the edit (here: empty)
//! ---
//! hello                 text to paste (Paste only)
//! ---
//! 0                     start position
//! 0                     end position
//! CopyCommand           Copy records are the kind line only
//! DeleteCommand
//! ---
//! hello
//! ---
//! 1
//! 2
//! ```
//!
//! Each text block is the text, a newline, then a `---` line, so a block
//! round-trips exactly unless the text itself contains a `---` line.

use crate::history::{Command, CommandHistory, CommandKind, Span};
use crate::paths::Layout;
use crate::session::Session;

use super::{push_block, read_optional, write_atomic, LineReader, PersistenceError, DELIMITER};

pub fn encode_metadata(session: &Session) -> String {
    let history = session.history();
    let mut out = format!(
        "{}\n{}\n{}\n",
        session.name(),
        history.len(),
        history.cursor()
    );

    for command in history.commands() {
        let kind = command.kind();
        out.push_str(kind.persisted_name());
        out.push('\n');

        // Copy only touches the clipboard, which is saved separately.
        if kind == CommandKind::Copy {
            continue;
        }

        out.push_str(DELIMITER);
        out.push('\n');
        push_block(&mut out, command.snapshot().unwrap_or_default());
        if let Some(text) = command.text_to_paste() {
            push_block(&mut out, text);
        }

        let span = command.span().unwrap_or_default();
        out.push_str(&format!("{}\n{}\n", span.start, span.end));
    }

    out
}

/// Parse a metadata file into the stored session name and its history.
///
/// `file` labels error messages.
pub fn decode_metadata(file: &str, contents: &str) -> Result<(String, CommandHistory), PersistenceError> {
    let mut reader = LineReader::new(file, contents);

    let name = reader.next_line("session name")?.to_string();
    let count: usize = reader.number("command count")?;
    let cursor: isize = reader.number("history cursor")?;

    let mut commands = Vec::new();
    for _ in 0..count {
        commands.push(decode_command(&mut reader)?);
    }

    let current = match cursor {
        -1 => None,
        index if index >= 0 => Some(index as usize),
        _ => return Err(reader.malformed(format!("invalid history cursor {cursor}"))),
    };

    let history = CommandHistory::restore(commands, current).ok_or_else(|| {
        reader.malformed(format!("history cursor {cursor} out of range for {count} command(s)"))
    })?;

    Ok((name, history))
}

fn decode_command(reader: &mut LineReader<'_>) -> Result<Command, PersistenceError> {
    let line = reader.next_line("command kind")?;
    let kind = CommandKind::from_persisted_name(line)
        .ok_or_else(|| reader.malformed(format!("unknown command kind {line:?}")))?;

    if kind == CommandKind::Copy {
        return Ok(Command::Copy {
            snapshot: String::new(),
            span: Span::default(),
        });
    }

    reader.delimiter()?;
    let snapshot = reader.block("text snapshot")?;
    let text_to_paste = if kind == CommandKind::Paste {
        reader.block("text to paste")?
    } else {
        String::new()
    };
    let start: usize = reader.number("start position")?;
    let end: usize = reader.number("end position")?;

    let len = snapshot.chars().count();
    if start > end || end >= len.max(1) {
        return Err(reader.malformed(format!(
            "range {start}..={end} does not fit a text of {len} char(s)"
        )));
    }

    Command::from_parts(kind, snapshot, text_to_paste, Span { start, end })
        .ok_or_else(|| reader.malformed(format!("{kind} cannot be stored")))
}

pub fn write_metadata(layout: &Layout, session: &Session) -> Result<(), PersistenceError> {
    write_atomic(
        &layout.session_metadata_file(session.name()),
        &encode_metadata(session),
    )
}

/// Load a session's history. `None` if no metadata file exists.
pub fn read_metadata(
    layout: &Layout,
    file_name: &str,
) -> Result<Option<(String, CommandHistory)>, PersistenceError> {
    read_optional(&layout.session_metadata_file(file_name))?
        .map(|contents| decode_metadata(file_name, &contents))
        .transpose()
}

// ============================================================================
// TESTS
// ============================================================================
