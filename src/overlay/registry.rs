use chrono::Local;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::message::ChatMessage;

/// Handle for an element on the overlay. Ids increase with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// A labelled piece of text inside an element (`author` or `text`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub class: &'static str,
    pub text: String,
}

/// One rendered chat message.
///
/// Span contents are plain text taken from the message fields; nothing in
/// them is interpreted as markup.
#[derive(Clone, Debug)]
pub struct OverlayElement {
    pub class: String,
    pub author: Span,
    pub text: Span,
    pub message: ChatMessage,
    pub inserted_at: Instant,
    pub expires_at: Instant,
    /// Local wall-clock time of insertion, `HH:MM:SS`
    pub shown_at: String,
}

impl OverlayElement {
    pub fn new(message: ChatMessage, inserted_at: Instant, dwell: Duration) -> Self {
        Self {
            class: message.css_class(),
            author: Span {
                class: "author",
                text: format!("{}:", message.author),
            },
            text: Span {
                class: "text",
                text: message.text.clone(),
            },
            message,
            inserted_at,
            expires_at: inserted_at + dwell,
            shown_at: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time left on screen, zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// Every element currently on the overlay, in display order.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: BTreeMap<ElementId, OverlayElement>,
    next_id: u64,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: OverlayElement) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&OverlayElement> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Detach an element. Returns `None` if it was already gone.
    pub fn remove(&mut self, id: ElementId) -> Option<OverlayElement> {
        self.elements.remove(&id)
    }

    /// Detach every element whose deadline has passed, returning their ids.
    pub fn remove_expired(&mut self, now: Instant) -> Vec<ElementId> {
        let expired: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(_, el)| el.is_expired(now))
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            self.elements.remove(id);
        }
        expired
    }

    /// Earliest pending expiry, used to schedule the next repaint.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.elements.values().map(|el| el.expires_at).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &OverlayElement)> {
        self.elements.iter().map(|(id, el)| (*id, el))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
