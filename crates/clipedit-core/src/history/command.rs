//! The command abstraction.
//!
//! Every edit command carries the full document text as it was before the
//! edit ran. Undo restores by replacing the document with that snapshot
//! instead of computing an inverse edit.

use serde::Serialize;

use super::clipboard::Clipboard;

/// The six command kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandKind {
    Copy,
    Paste,
    Cut,
    Delete,
    Undo,
    Redo,
}

impl CommandKind {
    /// Kinds that edit the document or clipboard and are recorded in history.
    pub fn is_edit(self) -> bool {
        !matches!(self, CommandKind::Undo | CommandKind::Redo)
    }

    /// Kinds that need a non-empty document to select a range from.
    pub fn needs_text(self) -> bool {
        matches!(self, CommandKind::Copy | CommandKind::Cut | CommandKind::Delete)
    }

    /// The literal kind line used in session metadata files.
    pub fn persisted_name(self) -> &'static str {
        match self {
            CommandKind::Copy => "CopyCommand",
            CommandKind::Paste => "PasteCommand",
            CommandKind::Cut => "CutCommand",
            CommandKind::Delete => "DeleteCommand",
            CommandKind::Undo => "UndoCommand",
            CommandKind::Redo => "RedoCommand",
        }
    }

    /// Parse a kind line. Only the four edit kinds are ever persisted.
    pub fn from_persisted_name(name: &str) -> Option<Self> {
        match name {
            "CopyCommand" => Some(CommandKind::Copy),
            "PasteCommand" => Some(CommandKind::Paste),
            "CutCommand" => Some(CommandKind::Cut),
            "DeleteCommand" => Some(CommandKind::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.persisted_name())
    }
}

/// Inclusive character range `start..=end`.
///
/// Always satisfies `start <= end`. On a non-empty document `end < len`;
/// on an empty document both bounds are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Normalize caller-supplied positions against a document of `len` chars.
    ///
    /// Reversed bounds are swapped, then `end` is clamped to the last
    /// character and `start` is pulled down to `end` if it overshoots.
    pub fn clamped(start: usize, end: usize, len: usize) -> Self {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let end = end.min(len.saturating_sub(1));
        Span {
            start: start.min(end),
            end,
        }
    }

    /// A span that is a single position: pastes insert instead of replacing.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

/// Mutable view of the active session that commands operate on.
pub struct EditContext<'a> {
    pub text: &'a mut String,
    pub clipboard: &'a mut Clipboard,
}

/// A single edit intent with the state needed to reverse it.
///
/// Undo and Redo reference their target by position in the owning history
/// and are never stored there themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Copy {
        snapshot: String,
        span: Span,
    },
    Paste {
        snapshot: String,
        text: String,
        span: Span,
    },
    Cut {
        snapshot: String,
        span: Span,
    },
    Delete {
        snapshot: String,
        span: Span,
    },
    Undo {
        target: usize,
    },
    Redo {
        target: usize,
    },
}

impl Command {
    /// Build an edit command against the current document text.
    ///
    /// Positions are normalized with [`Span::clamped`]. `text_to_paste` is
    /// ignored for everything but Paste. Returns `None` for Undo/Redo, which
    /// only the history can construct.
    pub fn edit(
        kind: CommandKind,
        current_text: &str,
        start: usize,
        end: usize,
        text_to_paste: &str,
    ) -> Option<Self> {
        let span = Span::clamped(start, end, current_text.chars().count());
        Self::from_parts(kind, current_text.to_string(), text_to_paste.to_string(), span)
    }

    /// Assemble an edit command from already-normalized parts.
    pub fn from_parts(
        kind: CommandKind,
        snapshot: String,
        text_to_paste: String,
        span: Span,
    ) -> Option<Self> {
        let command = match kind {
            CommandKind::Copy => Command::Copy { snapshot, span },
            CommandKind::Paste => Command::Paste {
                snapshot,
                text: text_to_paste,
                span,
            },
            CommandKind::Cut => Command::Cut { snapshot, span },
            CommandKind::Delete => Command::Delete { snapshot, span },
            CommandKind::Undo | CommandKind::Redo => return None,
        };
        Some(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Copy { .. } => CommandKind::Copy,
            Command::Paste { .. } => CommandKind::Paste,
            Command::Cut { .. } => CommandKind::Cut,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Undo { .. } => CommandKind::Undo,
            Command::Redo { .. } => CommandKind::Redo,
        }
    }

    /// Document text before this edit ran.
    pub fn snapshot(&self) -> Option<&str> {
        match self {
            Command::Copy { snapshot, .. }
            | Command::Paste { snapshot, .. }
            | Command::Cut { snapshot, .. }
            | Command::Delete { snapshot, .. } => Some(snapshot),
            Command::Undo { .. } | Command::Redo { .. } => None,
        }
    }

    pub fn text_to_paste(&self) -> Option<&str> {
        match self {
            Command::Paste { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Command::Copy { span, .. }
            | Command::Paste { span, .. }
            | Command::Cut { span, .. }
            | Command::Delete { span, .. } => Some(*span),
            Command::Undo { .. } | Command::Redo { .. } => None,
        }
    }

    /// History position referenced by an Undo or Redo.
    pub fn target(&self) -> Option<usize> {
        match self {
            Command::Undo { target } | Command::Redo { target } => Some(*target),
            _ => None,
        }
    }

    /// Apply the command.
    ///
    /// `history` is the owning command sequence, used to resolve the target
    /// of an Undo or Redo.
    pub fn execute(&self, history: &[Command], ctx: &mut EditContext<'_>) {
        match self {
            Command::Copy { snapshot, span } => {
                ctx.clipboard.push(select(snapshot, *span));
            }
            Command::Paste {
                snapshot,
                text,
                span,
            } => {
                *ctx.text = paste(snapshot, text, *span);
            }
            Command::Cut { snapshot, span } => {
                ctx.clipboard.push(select(snapshot, *span));
                *ctx.text = remove(snapshot, *span);
            }
            Command::Delete { snapshot, span } => {
                *ctx.text = remove(snapshot, *span);
            }
            Command::Undo { target } => match history.get(*target) {
                Some(command) => command.undo(ctx),
                None => log::warn!("Undo target {} is not in history", target),
            },
            Command::Redo { target } => match history.get(*target) {
                Some(command) => command.execute(history, ctx),
                None => log::warn!("Redo target {} is not in history", target),
            },
        }
    }

    /// Document text once this edit has run, without running it.
    pub fn edited_text(&self) -> Option<String> {
        match self {
            Command::Copy { snapshot, .. } => Some(snapshot.clone()),
            Command::Paste {
                snapshot,
                text,
                span,
            } => Some(paste(snapshot, text, *span)),
            Command::Cut { snapshot, span } | Command::Delete { snapshot, span } => {
                Some(remove(snapshot, *span))
            }
            Command::Undo { .. } | Command::Redo { .. } => None,
        }
    }

    /// Text this edit pushes onto the clipboard, if any.
    pub fn fragment(&self) -> Option<String> {
        match self {
            Command::Copy { snapshot, span } | Command::Cut { snapshot, span } => {
                Some(select(snapshot, *span))
            }
            _ => None,
        }
    }

    /// Reverse the command. Undo and Redo have nothing to reverse.
    pub fn undo(&self, ctx: &mut EditContext<'_>) {
        match self {
            Command::Copy { .. } => {
                ctx.clipboard.pop_last();
            }
            Command::Paste { snapshot, .. } | Command::Delete { snapshot, .. } => {
                ctx.text.clone_from(snapshot);
            }
            Command::Cut { snapshot, .. } => {
                ctx.text.clone_from(snapshot);
                ctx.clipboard.pop_last();
            }
            Command::Undo { .. } | Command::Redo { .. } => {}
        }
    }
}

/// Byte offset of the char at `index`, or `text.len()` past the end.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

fn byte_range(text: &str, span: Span) -> std::ops::Range<usize> {
    byte_offset(text, span.start)..byte_offset(text, span.end.saturating_add(1))
}

/// `text[start..=end]`, empty for an empty document.
pub fn select(text: &str, span: Span) -> String {
    text[byte_range(text, span)].to_string()
}

/// `text` with `start..=end` removed.
pub fn remove(text: &str, span: Span) -> String {
    let mut result = text.to_string();
    result.replace_range(byte_range(text, span), "");
    result
}

/// Insert at `start` for a point span, otherwise replace `start..=end`.
pub fn paste(text: &str, insert: &str, span: Span) -> String {
    let mut result = text.to_string();
    if span.is_point() {
        result.insert_str(byte_offset(text, span.start), insert);
    } else {
        result.replace_range(byte_range(text, span), insert);
    }
    result
}
