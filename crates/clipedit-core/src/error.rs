//! Error taxonomy for the operation API.
//!
//! Every failure is recoverable. Validation and history failures abort the
//! operation and leave engine state as it was before the call. A persistence
//! failure during autosave is reported after the edit itself has been applied.

use thiserror::Error;

use crate::history::HistoryError;
use crate::persistence::PersistenceError;

/// Bad input from the caller. Nothing is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Session name is empty")]
    EmptyName,

    #[error("Session name contains forbidden character {found:?}: {name}")]
    InvalidName { name: String, found: char },

    #[error("Session already exists: {0}")]
    DuplicateName(String),

    #[error("Session index {index} out of range (sessions: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No session is open")]
    NoActiveSession,

    #[error("Clipboard position {position} out of range (entries: {len})")]
    InvalidClipboardPosition { position: usize, len: usize },

    #[error("Text would contain a \"---\" line, which session files reserve")]
    ReservedLine,
}

/// Umbrella error returned by [`crate::Editor`].
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
