//! Editor Session Tests
//!
//! Drives the public `Editor` API end to end: editing, undo/redo, branch
//! pruning and the on-disk round trip between two editor instances.

use clipedit_core::{CommandKind, Editor, EditorError, HistoryError, ValidationError};
use tempfile::{tempdir, TempDir};

fn open_doc(dir: &TempDir, name: &str) -> Editor {
    let mut editor = Editor::builder().root(dir.path()).build();
    let index = editor.new_session(name).unwrap();
    editor.open_session(index).unwrap();
    editor
}

/// Paste, Copy, then walk all the way back and forward again.
#[test]
fn test_paste_copy_undo_redo() {
    let dir = tempdir().unwrap();
    let mut editor = open_doc(&dir, "doc");

    editor.paste(0, 0, "ab").unwrap();
    editor.copy(0, 1).unwrap();
    assert_eq!(editor.current_text().unwrap(), "ab");
    assert_eq!(editor.clipboard().unwrap().entries(), ["ab"]);

    // Copy is an entry of its own, so the first undo only empties the clipboard.
    editor.undo().unwrap();
    assert!(editor.clipboard().unwrap().is_empty());
    assert_eq!(editor.current_text().unwrap(), "ab");

    editor.undo().unwrap();
    assert_eq!(editor.current_text().unwrap(), "");
    assert_eq!(editor.status().unwrap().cursor, -1);
    assert!(matches!(
        editor.undo(),
        Err(EditorError::History(HistoryError::NothingToUndo))
    ));

    editor.redo().unwrap();
    assert_eq!(editor.current_text().unwrap(), "ab");
    assert_eq!(editor.status().unwrap().cursor, 0);
}

/// Cut moves text to the clipboard; undo and redo move it back and forth.
#[test]
fn test_cut_cycle() {
    let dir = tempdir().unwrap();
    let mut editor = open_doc(&dir, "doc");
    editor.paste(0, 0, "hello world").unwrap();

    editor.cut(0, 4).unwrap();
    assert_eq!(editor.current_text().unwrap(), " world");
    assert_eq!(editor.clipboard().unwrap().entries(), ["hello"]);

    editor.undo().unwrap();
    assert_eq!(editor.current_text().unwrap(), "hello world");
    assert!(editor.clipboard().unwrap().is_empty());

    editor.redo().unwrap();
    assert_eq!(editor.current_text().unwrap(), " world");
    assert_eq!(editor.clipboard().unwrap().entries(), ["hello"]);
}

/// A new edit after undo discards the undone branch.
#[test]
fn test_new_edit_prunes_redo_branch() {
    let dir = tempdir().unwrap();
    let mut editor = open_doc(&dir, "doc");

    editor.paste(0, 0, "abc").unwrap();
    editor.paste(0, 0, "X").unwrap();
    assert_eq!(editor.current_text().unwrap(), "Xabc");

    editor.undo().unwrap();
    editor.delete(0, 0).unwrap();

    assert_eq!(editor.current_text().unwrap(), "bc");
    assert_eq!(
        editor.history().unwrap(),
        vec![CommandKind::Paste, CommandKind::Delete]
    );
    let status = editor.status().unwrap();
    assert_eq!(status.cursor, 1);
    assert!(!status.can_redo);
    assert!(matches!(
        editor.redo(),
        Err(EditorError::History(HistoryError::NothingToRedo))
    ));
}

/// Copy, Cut and Delete need text to work on.
#[test]
fn test_empty_document_rejects_selection_commands() {
    let dir = tempdir().unwrap();
    let mut editor = open_doc(&dir, "doc");

    for kind in [CommandKind::Copy, CommandKind::Cut, CommandKind::Delete] {
        assert!(matches!(
            editor.invoke(kind, 0, 0, ""),
            Err(EditorError::History(HistoryError::EmptyDocument))
        ));
    }
    editor.paste(0, 0, "ok").unwrap();
    assert_eq!(editor.status().unwrap().commands, 1);
}

#[test]
fn test_session_names() {
    let dir = tempdir().unwrap();
    let mut editor = Editor::builder().root(dir.path()).build();

    assert!(matches!(
        editor.new_session("a:b"),
        Err(EditorError::Validation(ValidationError::InvalidName { found: ':', .. }))
    ));

    let index = editor.new_session("report").unwrap();
    assert_eq!(editor.sessions()[index].name, "report.txt");
    assert!(matches!(
        editor.new_session("report"),
        Err(EditorError::Validation(ValidationError::DuplicateName(_)))
    ));
}

/// Everything saved by one editor is restored by the next.
#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    {
        let mut editor = Editor::builder().root(dir.path()).build();
        editor.new_session("first").unwrap();
        editor.new_session("second").unwrap();

        editor.open_session(0).unwrap();
        editor.paste(0, 0, "hello world").unwrap();
        editor.copy(6, 10).unwrap();
        editor.delete(0, 5).unwrap();
        editor.undo().unwrap();

        editor.open_session(1).unwrap();
        editor.paste(0, 0, "second\ntext\n").unwrap();

        editor.shutdown().unwrap();
    }

    let mut editor = Editor::builder().root(dir.path()).load().unwrap();
    let names: Vec<_> = editor.sessions().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["first.txt", "second.txt"]);

    editor.open_session(0).unwrap();
    assert_eq!(editor.current_text().unwrap(), "hello world");
    assert_eq!(editor.clipboard().unwrap().entries(), ["world"]);
    assert_eq!(
        editor.history().unwrap(),
        vec![CommandKind::Paste, CommandKind::Copy, CommandKind::Delete]
    );
    assert_eq!(editor.status().unwrap().cursor, 1);

    // The restored Delete re-applies from its stored snapshot.
    editor.redo().unwrap();
    assert_eq!(editor.current_text().unwrap(), "world");

    editor.open_session(1).unwrap();
    assert_eq!(editor.current_text().unwrap(), "second\ntext\n");
}

/// Deleting a session removes it from the next load.
#[test]
fn test_deleted_session_stays_deleted() {
    let dir = tempdir().unwrap();
    {
        let mut editor = Editor::builder().root(dir.path()).build();
        editor.new_session("keep").unwrap();
        editor.new_session("drop").unwrap();
        editor.save().unwrap();
        assert_eq!(editor.delete_session(1).unwrap(), "drop.txt");
    }

    let editor = Editor::builder().root(dir.path()).load().unwrap();
    assert_eq!(editor.store().names(), ["keep.txt"]);
    assert!(!editor.layout().document_file("drop.txt").exists());
    assert!(!editor.layout().clipboard_file("drop.txt").exists());
}

/// A `---` line cannot be stored, so it never enters a session and the
/// saved sessions stay loadable.
#[test]
fn test_delimiter_line_is_rejected_and_sessions_reload() {
    let dir = tempdir().unwrap();
    {
        let mut editor = open_doc(&dir, "notes");
        assert!(matches!(
            editor.paste(0, 0, "title\n---\nbody"),
            Err(EditorError::Validation(ValidationError::ReservedLine))
        ));
        assert_eq!(editor.current_text().unwrap(), "");
        assert!(editor.history().unwrap().is_empty());

        editor.paste(0, 0, "title\n--\nbody").unwrap();
        editor.new_session("other").unwrap();
        editor.shutdown().unwrap();
    }

    let mut editor = Editor::builder().root(dir.path()).load().unwrap();
    assert_eq!(editor.store().names(), ["notes.txt", "other.txt"]);
    editor.open_session(0).unwrap();
    assert_eq!(editor.current_text().unwrap(), "title\n--\nbody");
}

/// A corrupt metadata file costs only that session's history.
#[test]
fn test_corrupt_metadata_does_not_block_load() {
    let dir = tempdir().unwrap();
    {
        let mut editor = open_doc(&dir, "bad");
        editor.paste(0, 0, "text").unwrap();
        editor.new_session("good").unwrap();
        editor.open_session(1).unwrap();
        editor.paste(0, 0, "fine").unwrap();
        editor.shutdown().unwrap();
    }
    let layout = clipedit_core::Layout::new(dir.path());
    std::fs::write(layout.session_metadata_file("bad.txt"), "bad.txt\nmany\n-1\n").unwrap();

    let mut editor = Editor::builder().root(dir.path()).load().unwrap();
    assert_eq!(editor.store().names(), ["bad.txt", "good.txt"]);

    editor.open_session(0).unwrap();
    assert_eq!(editor.current_text().unwrap(), "text");
    assert!(editor.history().unwrap().is_empty());

    editor.open_session(1).unwrap();
    assert_eq!(editor.history().unwrap(), vec![CommandKind::Paste]);
    editor.undo().unwrap();
    assert_eq!(editor.current_text().unwrap(), "");
}
