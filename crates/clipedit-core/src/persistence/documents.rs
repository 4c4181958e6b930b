//! Live document files under `Sessions/`.

use std::fs;
use std::io;

use crate::paths::Layout;
use crate::session::Session;

use super::{read_optional, write_atomic, PersistenceError};

/// Read the live text of `file_name`. A missing file is an empty document.
pub fn read_document(layout: &Layout, file_name: &str) -> Result<String, PersistenceError> {
    Ok(read_optional(&layout.document_file(file_name))?.unwrap_or_default())
}

/// Overwrite the live text of `session`.
pub fn write_document(layout: &Layout, session: &Session) -> Result<(), PersistenceError> {
    let path = layout.document_file(session.name());
    write_atomic(&path, session.text())?;
    log::debug!("wrote {} char(s) to {}", session.text().chars().count(), path.display());
    Ok(())
}

/// Remove the live text of `file_name`. Succeeds if it didn't exist.
pub fn delete_document(layout: &Layout, file_name: &str) -> Result<(), PersistenceError> {
    match fs::remove_file(layout.document_file(file_name)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
