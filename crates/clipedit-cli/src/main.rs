//! `clipedit` - command-line front end for clipedit-core.
//!
//! Every invocation loads all sessions from `--root`, runs one operation
//! against the chosen session and saves everything back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clipedit_core::{ClipSelection, CommandKind, Editor};

#[derive(Parser, Debug)]
#[command(name = "clipedit", version, about = "Session-based text editing with undo/redo")]
struct Cli {
    /// Directory holding `Sessions/` and `Metadata/`
    #[arg(long, env = "CLIPEDIT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Only write documents on save instead of after every edit
    #[arg(long)]
    no_autosave: bool,

    #[command(subcommand)]
    command: Op,
}

/// Inclusive character range inside a session's document.
#[derive(Args, Debug, Clone, Copy)]
struct Range {
    /// Session index, as shown by `list`
    session: usize,
    start: usize,
    end: usize,
}

#[derive(Subcommand, Debug)]
enum Op {
    /// List sessions
    List,

    /// Create a session; `.txt` is appended to NAME
    Create { name: String },

    /// Delete a session and its files
    Remove { session: usize },

    /// Print a session's document
    Show { session: usize },

    /// Print a session's recorded commands, oldest first
    History { session: usize },

    /// Print a session's clipboard, oldest first
    Clipboard { session: usize },

    /// Print a session's state as JSON
    Status { session: usize },

    /// Insert TEXT at START, or replace START..=END with it
    Paste {
        #[command(flatten)]
        range: Range,
        text: String,
    },

    /// Paste a clipboard entry (most recent unless told otherwise)
    PasteClip {
        #[command(flatten)]
        range: Range,

        /// 1-based clipboard position
        #[arg(long, conflicts_with = "oldest")]
        position: Option<usize>,

        /// Use the oldest entry
        #[arg(long)]
        oldest: bool,
    },

    /// Push START..=END onto the clipboard
    Copy {
        #[command(flatten)]
        range: Range,
    },

    /// Push START..=END onto the clipboard and remove it
    Cut {
        #[command(flatten)]
        range: Range,
    },

    /// Remove START..=END
    Erase {
        #[command(flatten)]
        range: Range,
    },

    Undo { session: usize },

    Redo { session: usize },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut editor = Editor::builder()
        .root(&cli.root)
        .autosave_text(!cli.no_autosave)
        .load()
        .with_context(|| format!("failed to load sessions from {}", cli.root.display()))?;

    log::debug!("{:?} in {}", cli.command, cli.root.display());

    let dirty = run(&mut editor, cli.command)?;
    if dirty {
        save(editor, &cli.root)?;
    }
    Ok(())
}

/// Write the open document and every session's metadata.
fn save(editor: Editor, root: &Path) -> Result<()> {
    editor.flush_text()?;
    editor.shutdown().context("failed to save sessions")?;
    log::info!("saved sessions to {}", root.display());
    Ok(())
}

/// Run one operation. Returns whether sessions need saving.
fn run(editor: &mut Editor, op: Op) -> Result<bool> {
    match op {
        Op::List => {
            for summary in editor.sessions() {
                println!(
                    "{:>3}  {}  ({} command(s), {} char(s))",
                    summary.index, summary.name, summary.commands, summary.chars
                );
            }
            Ok(false)
        }
        Op::Create { name } => {
            let index = editor.new_session(&name)?;
            editor.save()?;
            println!("{index}");
            Ok(false)
        }
        Op::Remove { session } => {
            let name = editor.delete_session(session)?;
            println!("removed {name}");
            Ok(false)
        }
        Op::Show { session } => {
            editor.open_session(session)?;
            print!("{}", editor.current_text()?);
            Ok(false)
        }
        Op::History { session } => {
            editor.open_session(session)?;
            let cursor = editor.status()?.cursor;
            for (i, kind) in editor.history()?.iter().enumerate() {
                let marker = if i as isize == cursor { '>' } else { ' ' };
                println!("{marker}{i:>3}  {kind}");
            }
            Ok(false)
        }
        Op::Clipboard { session } => {
            editor.open_session(session)?;
            for (i, entry) in editor.clipboard()?.iter().enumerate() {
                println!("[{}] {:?}", i + 1, entry);
            }
            Ok(false)
        }
        Op::Status { session } => {
            editor.open_session(session)?;
            println!("{}", serde_json::to_string_pretty(&editor.status()?)?);
            Ok(false)
        }
        Op::Paste { range, text } => edit(editor, CommandKind::Paste, range, &text),
        Op::PasteClip {
            range,
            position,
            oldest,
        } => {
            let selection = match (position, oldest) {
                (Some(position), _) => ClipSelection::Position(position),
                (None, true) => ClipSelection::Oldest,
                (None, false) => ClipSelection::MostRecent,
            };
            editor.open_session(range.session)?;
            editor.paste_from_clipboard(selection, range.start, range.end)?;
            Ok(true)
        }
        Op::Copy { range } => edit(editor, CommandKind::Copy, range, ""),
        Op::Cut { range } => edit(editor, CommandKind::Cut, range, ""),
        Op::Erase { range } => edit(editor, CommandKind::Delete, range, ""),
        Op::Undo { session } => {
            editor.open_session(session)?;
            editor.undo()?;
            Ok(true)
        }
        Op::Redo { session } => {
            editor.open_session(session)?;
            editor.redo()?;
            Ok(true)
        }
    }
}

fn edit(editor: &mut Editor, kind: CommandKind, range: Range, text: &str) -> Result<bool> {
    editor.open_session(range.session)?;
    editor
        .invoke(kind, range.start, range.end, text)
        .with_context(|| format!("{kind} failed"))?;
    Ok(true)
}
