//! Per-session clipboard stack.

/// Which clipboard entry to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSelection {
    MostRecent,
    Oldest,
    /// 1-based position, oldest first.
    Position(usize),
}

/// Copied and cut fragments, oldest first.
///
/// Grows by push; the only removal is [`Clipboard::pop_last`], used when a
/// Copy or Cut is undone. Equal fragments are stored as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    entries: Vec<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, fragment: String) {
        self.entries.push(fragment);
    }

    /// Remove and return the most recent entry.
    pub fn pop_last(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn oldest(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Entry at 1-based `position`.
    pub fn get(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(String::as_str)
    }

    pub fn select(&self, selection: ClipSelection) -> Option<&str> {
        match selection {
            ClipSelection::MostRecent => self.most_recent(),
            ClipSelection::Oldest => self.oldest(),
            ClipSelection::Position(position) => self.get(position),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
