//! # clipedit-core
//!
//! Core engine for clipedit, a single-user text editor built around
//! Copy/Paste/Cut/Delete commands with full undo/redo history.
//!
//! This crate is framework-agnostic and can be driven by:
//! - the `clipedit` command-line tool
//! - an interactive menu front end
//! - tests, through [`Editor`] directly
//!
//! ## Key Concepts
//!
//! - **Session**: A named document with its own command history and clipboard
//! - **Command**: One edit intent plus the pre-edit snapshot needed to reverse it
//! - **History cursor**: Index of the most recently executed command
//! - **Branch pruning**: Forward commands are discarded once a new edit is made after an undo

pub mod context;
pub mod error;
pub mod history;
pub mod paths;
pub mod persistence;
pub mod session;

// Re-export commonly used types
pub use context::{Editor, EditorBuilder, EditorStatus, SessionSummary};
pub use error::{EditorError, ValidationError};
pub use history::{ClipSelection, Clipboard, Command, CommandHistory, CommandKind, HistoryError, Span};
pub use paths::Layout;
pub use persistence::PersistenceError;
pub use session::{Session, SessionStore};
