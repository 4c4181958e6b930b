//! Per-session state.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::history::{Clipboard, Command, CommandHistory, CommandKind, EditContext, HistoryError};

/// Extension appended to every session name; the name doubles as a file name.
pub const SESSION_EXTENSION: &str = ".txt";

/// Characters that cannot appear in a file name, plus line breaks, which
/// would split an entry of the line-based session index.
static FORBIDDEN_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\":?*|<>\r\n]"#).unwrap());

/// Check a candidate session name (without extension).
pub fn validate_name(candidate: &str) -> Result<(), ValidationError> {
    if candidate.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if let Some(found) = FORBIDDEN_NAME_CHARS.find(candidate) {
        let found = found.as_str().chars().next().unwrap_or_default();
        return Err(ValidationError::InvalidName {
            name: candidate.to_string(),
            found,
        });
    }
    Ok(())
}

/// A named document with its own history and clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// File name, extension included
    name: String,

    history: CommandHistory,

    clipboard: Clipboard,

    /// Live document text, mutated by command execution
    text: String,
}

impl Session {
    /// Create an empty session named `candidate` + `.txt`.
    pub fn new(candidate: &str) -> Result<Self, ValidationError> {
        validate_name(candidate)?;
        Ok(Self::restore(
            format!("{candidate}{SESSION_EXTENSION}"),
            CommandHistory::new(),
            Clipboard::new(),
            String::new(),
        ))
    }

    /// Rebuild a session from storage. `name` is taken verbatim.
    pub fn restore(name: String, history: CommandHistory, clipboard: Clipboard, text: String) -> Self {
        Self {
            name,
            history,
            clipboard,
            text,
        }
    }

    /// File name of the session, e.g. `report.txt`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the `.txt` extension.
    pub fn display_name(&self) -> &str {
        self.name
            .strip_suffix(SESSION_EXTENSION)
            .unwrap_or(&self.name)
    }

    /// Rename to `candidate` + `.txt`. The name is unchanged on error.
    pub fn rename(&mut self, candidate: &str) -> Result<(), ValidationError> {
        validate_name(candidate)?;
        self.name = format!("{candidate}{SESSION_EXTENSION}");
        Ok(())
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the live text without recording a command.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Run `command` against this session's text and clipboard.
    pub fn invoke(&mut self, command: Command) -> Result<(), HistoryError> {
        let mut ctx = EditContext {
            text: &mut self.text,
            clipboard: &mut self.clipboard,
        };
        self.history.invoke(command, &mut ctx)
    }

    /// Build and run an edit of `kind` against the current text.
    ///
    /// Undo and Redo ignore the positions and paste text.
    pub fn invoke_kind(
        &mut self,
        kind: CommandKind,
        start: usize,
        end: usize,
        text_to_paste: &str,
    ) -> Result<(), HistoryError> {
        let command = match Command::edit(kind, &self.text, start, end, text_to_paste) {
            Some(command) => command,
            None if kind == CommandKind::Undo => Command::Undo { target: 0 },
            None => Command::Redo { target: 0 },
        };
        self.invoke(command)
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let mut ctx = EditContext {
            text: &mut self.text,
            clipboard: &mut self.clipboard,
        };
        self.history.undo(&mut ctx)
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let mut ctx = EditContext {
            text: &mut self.text,
            clipboard: &mut self.clipboard,
        };
        self.history.redo(&mut ctx)
    }

    pub fn command(&self, index: usize) -> Option<&Command> {
        self.history.get(index)
    }

    pub fn remove_command(&mut self, index: usize) -> Option<Command> {
        self.history.remove(index)
    }

    /// Kinds of the recorded commands, oldest first.
    pub fn history_kinds(&self) -> Vec<CommandKind> {
        self.history.kinds()
    }
}
