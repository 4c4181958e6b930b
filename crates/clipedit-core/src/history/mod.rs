//! Command history with undo/redo.
//!
//! # State
//!
//! The history is a single linear timeline of executed edit commands plus a
//! cursor pointing at the most recently applied one:
//!
//! ```text
//!   commands:  [ Paste, Copy, Delete, Cut ]
//!   cursor:                  ^ (2)         Cut is available for redo
//! ```
//!
//! - `cursor == None` (`-1` on disk): nothing applied, undo disabled
//! - `cursor == len - 1`: at head, redo disabled
//! - `cursor < len - 1`: redo available
//!
//! A new edit made while redo commands exist discards them first
//! (branch pruning), so the timeline never forks.

mod clipboard;
mod command;

pub use clipboard::{ClipSelection, Clipboard};
pub use command::{paste, remove, select, Command, CommandKind, EditContext, Span};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Document is empty")]
    EmptyDocument,
}

/// Executed edit commands of one session, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    commands: Vec<Command>,
    current: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history read back from storage.
    ///
    /// Returns `None` if `current` is not a valid position or if `commands`
    /// contains an Undo/Redo.
    pub fn restore(commands: Vec<Command>, current: Option<usize>) -> Option<Self> {
        if commands.iter().any(|c| !c.kind().is_edit()) {
            return None;
        }
        if matches!(current, Some(index) if index >= commands.len()) {
            return None;
        }
        Some(Self { commands, current })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Position of the most recently executed command.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The cursor as stored on disk: `-1` when nothing is applied.
    pub fn cursor(&self) -> isize {
        self.current.map_or(-1, |index| index as isize)
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.commands.len()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn kinds(&self) -> Vec<CommandKind> {
        self.commands.iter().map(Command::kind).collect()
    }

    /// Run a command.
    ///
    /// Edit commands prune any redo branch, execute, and become the new head.
    /// An Undo or Redo is routed to [`undo`](Self::undo) or
    /// [`redo`](Self::redo); its own target is ignored in favour of the cursor.
    pub fn invoke(&mut self, command: Command, ctx: &mut EditContext<'_>) -> Result<(), HistoryError> {
        match command {
            Command::Undo { .. } => self.undo(ctx),
            Command::Redo { .. } => self.redo(ctx),
            edit => {
                self.prune();
                edit.execute(&self.commands, ctx);
                log::debug!("executed {} at {}", edit.kind(), self.commands.len());
                self.commands.push(edit);
                self.current = Some(self.commands.len() - 1);
                Ok(())
            }
        }
    }

    /// Reverse the command at the cursor and step back.
    pub fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<(), HistoryError> {
        let target = self.current.ok_or(HistoryError::NothingToUndo)?;
        Command::Undo { target }.execute(&self.commands, ctx);
        self.current = target.checked_sub(1);
        log::debug!("undo {} -> cursor {}", target, self.cursor());
        Ok(())
    }

    /// Re-apply the command after the cursor and step forward.
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) -> Result<(), HistoryError> {
        let target = self.next_index();
        if target >= self.commands.len() {
            return Err(HistoryError::NothingToRedo);
        }
        Command::Redo { target }.execute(&self.commands, ctx);
        self.current = Some(target);
        log::debug!("redo -> cursor {}", target);
        Ok(())
    }

    /// Remove the command at `index`, keeping the cursor on the same
    /// applied command (or the one before it, if it was removed).
    pub fn remove(&mut self, index: usize) -> Option<Command> {
        if index >= self.commands.len() {
            return None;
        }
        let removed = self.commands.remove(index);
        if let Some(current) = self.current {
            if index <= current {
                self.current = current.checked_sub(1);
            }
        }
        Some(removed)
    }

    /// Discard every command after the cursor.
    fn prune(&mut self) {
        let keep = self.next_index();
        if keep < self.commands.len() {
            log::debug!("pruning {} redo command(s)", self.commands.len() - keep);
            self.commands.truncate(keep);
        }
    }

    fn next_index(&self) -> usize {
        self.current.map_or(0, |index| index + 1)
    }
}
