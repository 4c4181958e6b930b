//! Sessions: named documents, each with its own history and clipboard.

mod manager;
mod state;

pub use manager::SessionStore;
pub use state::{validate_name, Session, SESSION_EXTENSION};
