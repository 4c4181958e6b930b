//! On-disk layout under the working root.
//!
//! ```text
//! <root>/
//! ├── Metadata/
//! │   ├── Available_Sessions.txt   # Master index, one session file name per line
//! │   ├── Sessions/<name>.txt      # Command history per session
//! │   └── Clipboard/<name>.txt     # Clipboard entries per session
//! └── Sessions/<name>.txt          # Live document text
//! ```

use std::path::{Path, PathBuf};

pub const METADATA_DIR: &str = "Metadata";
pub const SESSIONS_DIR: &str = "Sessions";
pub const CLIPBOARD_DIR: &str = "Clipboard";
pub const INDEX_FILE: &str = "Available_Sessions.txt";

/// Resolves every path the persistence layer touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn index_file(&self) -> PathBuf {
        self.metadata_dir().join(INDEX_FILE)
    }

    pub fn session_metadata_dir(&self) -> PathBuf {
        self.metadata_dir().join(SESSIONS_DIR)
    }

    pub fn clipboard_dir(&self) -> PathBuf {
        self.metadata_dir().join(CLIPBOARD_DIR)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// `file_name` already carries its extension (e.g. `report.txt`).
    pub fn session_metadata_file(&self, file_name: &str) -> PathBuf {
        self.session_metadata_dir().join(file_name)
    }

    pub fn clipboard_file(&self, file_name: &str) -> PathBuf {
        self.clipboard_dir().join(file_name)
    }

    pub fn document_file(&self, file_name: &str) -> PathBuf {
        self.documents_dir().join(file_name)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}
