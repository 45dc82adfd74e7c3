use crate::message::ChatMessage;

/// Tracks how much of the server's chat history has already been shown.
///
/// Never moves backwards, so a history that shrinks (server restart) shows
/// nothing new until it grows past the old length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCursor {
    displayed: usize,
}

impl DisplayCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of history entries already shown.
    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// Index of the last shown history entry, `None` before anything is shown.
    pub fn last_index(&self) -> Option<usize> {
        self.displayed.checked_sub(1)
    }

    /// Entries of `history` that have not been shown yet, in order.
    pub fn pending<'a>(&self, history: &'a [ChatMessage]) -> &'a [ChatMessage] {
        history.get(self.displayed..).unwrap_or(&[])
    }

    /// Mark everything up to and including `index` as shown.
    pub fn advance_to(&mut self, index: usize) {
        self.displayed = self.displayed.max(index + 1);
    }
}
