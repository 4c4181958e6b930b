//! SessionStore - every session known to the running process.

use super::state::Session;

/// Sessions in creation/load order.
///
/// Removal drops one session without reordering the rest. Names are not
/// required to be unique here; [`crate::Editor`] enforces that on creation.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session, returns its index.
    pub fn push(&mut self, session: Session) -> usize {
        self.sessions.push(session);
        self.sessions.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Session> {
        self.sessions.get_mut(index)
    }

    pub fn first(&self) -> Option<&Session> {
        self.sessions.first()
    }

    pub fn last(&self) -> Option<&Session> {
        self.sessions.last()
    }

    /// Remove a session entirely.
    pub fn remove(&mut self, index: usize) -> Option<Session> {
        if index < self.sessions.len() {
            Some(self.sessions.remove(index))
        } else {
            None
        }
    }

    pub fn remove_first(&mut self) -> Option<Session> {
        self.remove(0)
    }

    pub fn remove_last(&mut self) -> Option<Session> {
        self.sessions.pop()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Session file names, in order.
    pub fn names(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.name().to_string()).collect()
    }

    /// Index of the first session with file name `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.name() == name)
    }
}
