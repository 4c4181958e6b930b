//! Editor - the operation API consumed by front ends.
//!
//! The `Editor` owns every session plus the choice of which one is current.
//! Front ends hold one `Editor` and call into it; no state lives in globals.
//!
//! ## Lifecycle
//!
//! ```text
//!   EditorBuilder::load()  ──►  Editor  ──►  new_session / open_session
//!        (reads disk)             │          invoke(kind, start, end, text)
//!                                 │          delete_session (flushes)
//!                                 ▼
//!                          Editor::shutdown()  (writes disk)
//! ```
//!
//! Arguments are assumed to be validated by the caller (ranges inside the
//! document). Out-of-range positions are still clamped, never rejected.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{EditorError, ValidationError};
use crate::history::{ClipSelection, Clipboard, Command, CommandKind, HistoryError};
use crate::paths::Layout;
use crate::persistence::{self, documents, PersistenceError};
use crate::session::{Session, SessionStore};

/// Configuration for building an [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorBuilder {
    root: Option<PathBuf>,
    autosave_text: bool,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self {
            root: None,
            autosave_text: true,
        }
    }
}

impl EditorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working root for all files. Defaults to the current directory.
    pub fn root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root = Some(dir.into());
        self
    }

    /// Write `Sessions/<name>` after every successful invoke. On by default.
    pub fn autosave_text(mut self, enabled: bool) -> Self {
        self.autosave_text = enabled;
        self
    }

    fn layout(&self) -> Layout {
        self.root.clone().map(Layout::new).unwrap_or_default()
    }

    /// Build an editor with no sessions, ignoring anything on disk.
    pub fn build(self) -> Editor {
        Editor {
            layout: self.layout(),
            autosave_text: self.autosave_text,
            store: SessionStore::new(),
            current: None,
        }
    }

    /// Build an editor restored from disk.
    pub fn load(self) -> Result<Editor, PersistenceError> {
        let layout = self.layout();
        let store = persistence::load(&layout)?;
        Ok(Editor {
            layout,
            autosave_text: self.autosave_text,
            store,
            current: None,
        })
    }
}

/// One row of the session listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub index: usize,
    pub name: String,
    pub commands: usize,
    pub cursor: isize,
    pub clipboard_entries: usize,
    pub chars: usize,
}

impl SessionSummary {
    fn of(index: usize, session: &Session) -> Self {
        Self {
            index,
            name: session.name().to_string(),
            commands: session.history().len(),
            cursor: session.history().cursor(),
            clipboard_entries: session.clipboard().len(),
            chars: session.text().chars().count(),
        }
    }
}

/// State of the current session, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStatus {
    pub session: String,
    pub chars: usize,
    pub commands: usize,
    pub cursor: isize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub clipboard_entries: usize,
}

/// All sessions of the running process, with at most one open.
#[derive(Debug)]
pub struct Editor {
    layout: Layout,
    autosave_text: bool,
    store: SessionStore,
    current: Option<usize>,
}

impl Editor {
    /// Create a new Editor with a builder.
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Every session, in order.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.store
            .iter()
            .enumerate()
            .map(|(index, session)| SessionSummary::of(index, session))
            .collect()
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Create a session named `name` + `.txt` with an empty document file.
    ///
    /// Returns the index of the new session. It is not opened.
    pub fn new_session(&mut self, name: &str) -> Result<usize, EditorError> {
        let session = Session::new(name)?;
        if self.store.position(session.name()).is_some() {
            return Err(ValidationError::DuplicateName(session.name().to_string()).into());
        }

        documents::write_document(&self.layout, &session)?;
        let index = self.store.push(session);
        log::info!("created session {} at {}", name, index);
        Ok(index)
    }

    /// Make the session at `index` current.
    pub fn open_session(&mut self, index: usize) -> Result<&Session, EditorError> {
        let len = self.store.len();
        let session = self
            .store
            .get(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        self.current = Some(index);
        log::debug!("opened session {}", session.name());
        Ok(session)
    }

    pub fn close_session(&mut self) {
        self.current = None;
    }

    /// Remove the session at `index` along with its files.
    ///
    /// Returns the removed session's file name. The remaining sessions are
    /// flushed so the index and metadata directories match the store.
    pub fn delete_session(&mut self, index: usize) -> Result<String, EditorError> {
        let len = self.store.len();
        let session = self
            .store
            .remove(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;

        self.current = match self.current {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        documents::delete_document(&self.layout, session.name())?;
        persistence::save(&self.layout, &self.store)?;

        log::info!("deleted session {}", session.name());
        Ok(session.name().to_string())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_session(&self) -> Result<&Session, EditorError> {
        self.current
            .and_then(|index| self.store.get(index))
            .ok_or_else(|| ValidationError::NoActiveSession.into())
    }

    pub fn current_text(&self) -> Result<&str, EditorError> {
        Ok(self.current_session()?.text())
    }

    pub fn clipboard(&self) -> Result<&Clipboard, EditorError> {
        Ok(self.current_session()?.clipboard())
    }

    /// Kinds of the current session's recorded commands.
    pub fn history(&self) -> Result<Vec<CommandKind>, EditorError> {
        Ok(self.current_session()?.history_kinds())
    }

    pub fn status(&self) -> Result<EditorStatus, EditorError> {
        let session = self.current_session()?;
        let history = session.history();
        Ok(EditorStatus {
            session: session.name().to_string(),
            chars: session.text().chars().count(),
            commands: history.len(),
            cursor: history.cursor(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            clipboard_entries: session.clipboard().len(),
        })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Run a command against the current session.
    ///
    /// Copy, Cut and Delete fail with [`HistoryError::EmptyDocument`] on an
    /// empty document. An edit that would put a `---` line into the document,
    /// the clipboard or its stored record fails with
    /// [`ValidationError::ReservedLine`]. Undo and Redo ignore the positions
    /// and paste text.
    ///
    /// With autosave on, a failed document write is returned as
    /// [`EditorError::Persistence`] after the edit has been applied; the edit
    /// is kept and the write can be retried with [`flush_text`](Self::flush_text).
    pub fn invoke(
        &mut self,
        kind: CommandKind,
        start: usize,
        end: usize,
        text_to_paste: &str,
    ) -> Result<(), EditorError> {
        let index = self.current.ok_or(ValidationError::NoActiveSession)?;
        let session = self
            .store
            .get_mut(index)
            .ok_or(ValidationError::NoActiveSession)?;

        if kind.needs_text() && session.text().is_empty() {
            return Err(HistoryError::EmptyDocument.into());
        }

        match Command::edit(kind, session.text(), start, end, text_to_paste) {
            Some(command) => {
                ensure_storable(&command)?;
                session.invoke(command)?;
            }
            None => session.invoke_kind(kind, start, end, text_to_paste)?,
        }

        if self.autosave_text {
            documents::write_document(&self.layout, session)?;
        }
        Ok(())
    }

    pub fn copy(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        self.invoke(CommandKind::Copy, start, end, "")
    }

    pub fn paste(&mut self, start: usize, end: usize, text: &str) -> Result<(), EditorError> {
        self.invoke(CommandKind::Paste, start, end, text)
    }

    pub fn cut(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        self.invoke(CommandKind::Cut, start, end, "")
    }

    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        self.invoke(CommandKind::Delete, start, end, "")
    }

    pub fn undo(&mut self) -> Result<(), EditorError> {
        self.invoke(CommandKind::Undo, 0, 0, "")
    }

    pub fn redo(&mut self) -> Result<(), EditorError> {
        self.invoke(CommandKind::Redo, 0, 0, "")
    }

    /// Paste a clipboard entry of the current session.
    pub fn paste_from_clipboard(
        &mut self,
        selection: ClipSelection,
        start: usize,
        end: usize,
    ) -> Result<(), EditorError> {
        let clipboard = self.clipboard()?;
        let text = match clipboard.select(selection) {
            Some(text) => text.to_string(),
            None => {
                let position = match selection {
                    ClipSelection::Position(position) => position,
                    ClipSelection::MostRecent => clipboard.len(),
                    ClipSelection::Oldest => 1,
                };
                return Err(ValidationError::InvalidClipboardPosition {
                    position,
                    len: clipboard.len(),
                }
                .into());
            }
        };
        self.paste(start, end, &text)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the current document to `Sessions/<name>`.
    pub fn flush_text(&self) -> Result<(), EditorError> {
        documents::write_document(&self.layout, self.current_session()?)?;
        Ok(())
    }

    /// Write every session's metadata and clipboard.
    pub fn save(&self) -> Result<(), PersistenceError> {
        persistence::save(&self.layout, &self.store)
    }

    /// Save and drop the editor.
    pub fn shutdown(self) -> Result<(), PersistenceError> {
        self.save()
    }
}

/// Reject an edit whose texts could not be written back as text blocks.
fn ensure_storable(command: &Command) -> Result<(), ValidationError> {
    let stored = [command.snapshot(), command.text_to_paste()];
    let produced = [command.edited_text(), command.fragment()];

    let reserved = stored
        .into_iter()
        .flatten()
        .any(persistence::contains_delimiter_line)
        || produced
            .iter()
            .flatten()
            .any(|text| persistence::contains_delimiter_line(text));

    if reserved {
        return Err(ValidationError::ReservedLine);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn editor_in(dir: &std::path::Path) -> Editor {
        Editor::builder().root(dir).build()
    }

    mod builder {
        use super::*;

        #[test]
        fn defaults() {
            let editor = EditorBuilder::new().build();
            assert_eq!(editor.layout(), &Layout::default());
            assert!(editor.autosave_text);
            assert!(editor.sessions().is_empty());
        }

        #[test]
        fn load_from_empty_root() {
            let dir = tempdir().unwrap();
            let editor = Editor::builder().root(dir.path()).load().unwrap();
            assert!(editor.store().is_empty());
            assert_eq!(editor.current_index(), None);
        }
    }

    mod sessions {
        use super::*;

        #[test]
        fn new_session_creates_document_file() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());

            assert_eq!(editor.new_session("notes").unwrap(), 0);
            assert!(editor.layout().document_file("notes.txt").exists());
            assert_eq!(editor.current_index(), None);
        }

        #[test]
        fn invalid_and_duplicate_names_are_rejected() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());

            assert!(matches!(
                editor.new_session("a:b"),
                Err(EditorError::Validation(ValidationError::InvalidName { .. }))
            ));
            editor.new_session("report").unwrap();
            assert!(matches!(
                editor.new_session("report"),
                Err(EditorError::Validation(ValidationError::DuplicateName(_)))
            ));
            assert_eq!(editor.sessions().len(), 1);
        }

        #[test]
        fn open_out_of_range_is_rejected() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());
            assert!(matches!(
                editor.open_session(0),
                Err(EditorError::Validation(ValidationError::IndexOutOfRange {
                    index: 0,
                    len: 0
                }))
            ));
        }

        #[test]
        fn delete_session_removes_files_and_shifts_current() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());
            editor.new_session("a").unwrap();
            editor.new_session("b").unwrap();
            editor.new_session("c").unwrap();
            editor.save().unwrap();
            editor.open_session(2).unwrap();

            assert_eq!(editor.delete_session(0).unwrap(), "a.txt");
            assert_eq!(editor.current_index(), Some(1));
            assert_eq!(editor.current_session().unwrap().name(), "c.txt");
            assert!(!editor.layout().document_file("a.txt").exists());
            assert!(!editor.layout().session_metadata_file("a.txt").exists());

            editor.delete_session(1).unwrap();
            assert_eq!(editor.current_index(), None);
        }

        #[test]
        fn summaries_list_sessions_in_order() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());
            editor.new_session("one").unwrap();
            editor.new_session("two").unwrap();
            editor.open_session(1).unwrap();
            editor.paste(0, 0, "héllo").unwrap();

            let summaries = editor.sessions();
            assert_eq!(summaries[0].name, "one.txt");
            assert_eq!(summaries[1].commands, 1);
            assert_eq!(summaries[1].cursor, 0);
            assert_eq!(summaries[1].chars, 5);
        }
    }

    mod commands {
        use super::*;

        fn open_editor(dir: &std::path::Path) -> Editor {
            let mut editor = editor_in(dir);
            editor.new_session("doc").unwrap();
            editor.open_session(0).unwrap();
            editor
        }

        #[test]
        fn invoke_without_session_fails() {
            let dir = tempdir().unwrap();
            let mut editor = editor_in(dir.path());
            assert!(matches!(
                editor.paste(0, 0, "x"),
                Err(EditorError::Validation(ValidationError::NoActiveSession))
            ));
        }

        #[test]
        fn empty_document_guard() {
            let dir = tempdir().unwrap();
            let mut editor = open_editor(dir.path());
            for kind in [CommandKind::Copy, CommandKind::Cut, CommandKind::Delete] {
                assert!(matches!(
                    editor.invoke(kind, 0, 0, ""),
                    Err(EditorError::History(HistoryError::EmptyDocument))
                ));
            }
            assert!(editor.history().unwrap().is_empty());
        }

        #[test]
        fn autosave_writes_live_text() {
            let dir = tempdir().unwrap();
            let mut editor = open_editor(dir.path());
            editor.paste(0, 0, "saved").unwrap();

            let on_disk = std::fs::read_to_string(editor.layout().document_file("doc.txt")).unwrap();
            assert_eq!(on_disk, "saved");
        }

        #[test]
        fn autosave_off_waits_for_flush() {
            let dir = tempdir().unwrap();
            let mut editor = Editor::builder()
                .root(dir.path())
                .autosave_text(false)
                .build();
            editor.new_session("doc").unwrap();
            editor.open_session(0).unwrap();
            editor.paste(0, 0, "later").unwrap();

            let path = editor.layout().document_file("doc.txt");
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
            editor.flush_text().unwrap();
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "later");
        }

        #[test]
        fn paste_from_clipboard_uses_selected_entry() {
            let dir = tempdir().unwrap();
            let mut editor = open_editor(dir.path());
            editor.paste(0, 0, "abcdef").unwrap();
            editor.copy(0, 1).unwrap();
            editor.copy(4, 5).unwrap();

            editor
                .paste_from_clipboard(ClipSelection::Oldest, 2, 2)
                .unwrap();
            assert_eq!(editor.current_text().unwrap(), "ababcdef");

            editor
                .paste_from_clipboard(ClipSelection::MostRecent, 0, 1)
                .unwrap();
            assert_eq!(editor.current_text().unwrap(), "efabcdef");

            assert!(matches!(
                editor.paste_from_clipboard(ClipSelection::Position(3), 0, 0),
                Err(EditorError::Validation(
                    ValidationError::InvalidClipboardPosition { position: 3, len: 2 }
                ))
            ));
        }

        #[test]
        fn status_reflects_cursor() {
            let dir = tempdir().unwrap();
            let mut editor = open_editor(dir.path());
            editor.paste(0, 0, "abc").unwrap();
            editor.undo().unwrap();

            let status = editor.status().unwrap();
            assert_eq!(status.session, "doc.txt");
            assert_eq!(status.cursor, -1);
            assert!(!status.can_undo);
            assert!(status.can_redo);

            let json = serde_json::to_value(&status).unwrap();
            assert_eq!(json["canRedo"], true);
            assert_eq!(json["clipboardEntries"], 0);
        }

        #[test]
        fn autosave_failure_keeps_the_edit() {
            let dir = tempdir().unwrap();
            let mut editor = open_editor(dir.path());
            let documents = editor.layout().documents_dir();
            std::fs::remove_dir_all(&documents).unwrap();
            std::fs::write(&documents, "not a directory").unwrap();

            assert!(matches!(
                editor.paste(0, 0, "kept"),
                Err(EditorError::Persistence(_))
            ));
            assert_eq!(editor.current_text().unwrap(), "kept");
            assert_eq!(editor.status().unwrap().commands, 1);
        }
    }

    mod reserved_lines {
        use super::*;

        fn editor_with(dir: &std::path::Path, text: &str) -> Editor {
            let mut editor = editor_in(dir);
            editor.new_session("doc").unwrap();
            editor.open_session(0).unwrap();
            editor.paste(0, 0, text).unwrap();
            editor
        }

        fn assert_rejected(editor: &mut Editor, kind: CommandKind, start: usize, end: usize, text: &str) {
            let before = editor.status().unwrap();
            let text_before = editor.current_text().unwrap().to_string();
            assert!(matches!(
                editor.invoke(kind, start, end, text),
                Err(EditorError::Validation(ValidationError::ReservedLine))
            ));
            assert_eq!(editor.status().unwrap(), before);
            assert_eq!(editor.current_text().unwrap(), text_before);
        }

        #[test]
        fn paste_text_with_delimiter_line() {
            let dir = tempdir().unwrap();
            let mut editor = editor_with(dir.path(), "x");
            assert_rejected(&mut editor, CommandKind::Paste, 0, 0, "a\n---\nb");
        }

        #[test]
        fn paste_completing_a_delimiter_line() {
            let dir = tempdir().unwrap();
            let mut editor = editor_with(dir.path(), "--\n");
            assert_rejected(&mut editor, CommandKind::Paste, 2, 2, "-");
        }

        #[test]
        fn delete_joining_a_delimiter_line() {
            let dir = tempdir().unwrap();
            let mut editor = editor_with(dir.path(), "-x--");
            assert_rejected(&mut editor, CommandKind::Delete, 1, 1, "");
            assert_rejected(&mut editor, CommandKind::Cut, 1, 1, "");
        }

        #[test]
        fn copy_of_a_delimiter_fragment() {
            let dir = tempdir().unwrap();
            let mut editor = editor_with(dir.path(), "----");
            assert_rejected(&mut editor, CommandKind::Copy, 0, 2, "");
            editor.copy(0, 3).unwrap();
            assert_eq!(editor.clipboard().unwrap().entries(), ["----"]);
        }

        #[test]
        fn undo_and_redo_are_unaffected() {
            let dir = tempdir().unwrap();
            let mut editor = editor_with(dir.path(), "abc");
            editor.undo().unwrap();
            editor.redo().unwrap();
            assert_eq!(editor.current_text().unwrap(), "abc");
        }
    }
}
