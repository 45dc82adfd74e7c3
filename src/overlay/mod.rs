//! Overlay renderer state.
//!
//! `Overlay` owns the display cursor and the element registry. The backend
//! only fetches history; deciding what is new, when it appears and when it
//! goes away all happens here, driven by explicit `Instant`s so the logic
//! is independent of the UI and of wall-clock sleeps.
//!
//! - `cursor`: how much of the history has been shown
//! - `registry`: elements currently on screen and their deadlines

mod cursor;
mod registry;

pub use cursor::DisplayCursor;
pub use registry::{ElementId, ElementRegistry, OverlayElement, Span};

use std::time::{Duration, Instant};

use crate::config::OverlayConfig;
use crate::message::ChatMessage;

pub struct Overlay {
    container_id: String,
    dwell: Duration,
    fade: Duration,
    cursor: DisplayCursor,
    elements: ElementRegistry,
    scroll_requested: bool,
    // Consecutive polls whose history was shorter than what is displayed
    shrunk_polls: u32,
}

impl Overlay {
    /// Create the overlay and show the welcome message right away.
    pub fn new(config: &OverlayConfig, now: Instant) -> Self {
        let mut overlay = Self {
            container_id: config.container_id.clone(),
            dwell: config.dwell(),
            fade: config.fade().min(config.dwell()),
            cursor: DisplayCursor::new(),
            elements: ElementRegistry::new(),
            scroll_requested: false,
            shrunk_polls: 0,
        };
        let welcome = ChatMessage::new(config.welcome_author.clone(), config.welcome_text.clone());
        overlay.show(welcome, now);
        overlay
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn cursor(&self) -> DisplayCursor {
        self.cursor
    }

    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    pub fn shrunk_polls(&self) -> u32 {
        self.shrunk_polls
    }

    /// Render one message. It is removed once `dwell` has elapsed from `now`.
    pub fn show(&mut self, message: ChatMessage, now: Instant) -> ElementId {
        let id = self
            .elements
            .insert(OverlayElement::new(message, now, self.dwell));
        self.scroll_requested = true;
        tracing::debug!(event = "overlay.element.shown", id = id.0);
        id
    }

    /// Render every message of `history` not shown yet, oldest first.
    ///
    /// Returns how many elements were added.
    pub fn ingest(&mut self, history: &[ChatMessage], now: Instant) -> usize {
        if history.len() < self.cursor.displayed() {
            self.shrunk_polls += 1;
            if self.shrunk_polls == 1 {
                tracing::warn!(
                    event = "overlay.history.shrunk",
                    history_len = history.len(),
                    displayed = self.cursor.displayed(),
                );
            } else {
                tracing::debug!(
                    event = "overlay.history.shrunk",
                    history_len = history.len(),
                    displayed = self.cursor.displayed(),
                    polls = self.shrunk_polls,
                );
            }
            return 0;
        }
        if self.shrunk_polls > 0 {
            tracing::info!(
                event = "overlay.history.recovered",
                history_len = history.len(),
                polls = self.shrunk_polls,
            );
            self.shrunk_polls = 0;
        }

        let start = self.cursor.displayed();
        let pending = self.cursor.pending(history).to_vec();
        for (offset, message) in pending.into_iter().enumerate() {
            self.show(message, now);
            self.cursor.advance_to(start + offset);
        }
        let rendered = self.cursor.displayed() - start;
        if rendered > 0 {
            tracing::info!(
                event = "overlay.history.ingested",
                rendered = rendered,
                displayed = self.cursor.displayed(),
            );
        }
        rendered
    }

    /// Remove every element whose dwell time has elapsed.
    pub fn expire(&mut self, now: Instant) -> Vec<ElementId> {
        let removed = self.elements.remove_expired(now);
        for id in &removed {
            tracing::debug!(event = "overlay.element.expired", id = id.0);
        }
        removed
    }

    /// Detach an element early. Returns false if it was no longer present.
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.elements.remove(id).is_some()
    }

    /// Opacity for an element: fully opaque until the last `fade` of its
    /// dwell, then linearly down to zero at expiry.
    pub fn opacity(&self, id: ElementId, now: Instant) -> f32 {
        let Some(element) = self.elements.get(id) else {
            return 0.0;
        };
        let remaining = element.remaining(now);
        if self.fade.is_zero() {
            return if remaining.is_zero() { 0.0 } else { 1.0 };
        }
        (remaining.as_secs_f32() / self.fade.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether the view should scroll to the newest element. Consumed on read.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// How long until something on screen changes (fade start or expiry).
    pub fn next_change(&self, now: Instant) -> Option<Duration> {
        let expiry = self.elements.next_expiry()?;
        let fade_start = expiry.checked_sub(self.fade).unwrap_or(expiry);
        let target = if fade_start > now { fade_start } else { expiry };
        Some(target.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OverlayConfig {
        OverlayConfig {
            dwell_ms: 60_000,
            fade_ms: 1_000,
            ..Default::default()
        }
    }

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage::new(format!("user{}", i), format!("msg{}", i)).with_platform("Twitch"))
            .collect()
    }

    #[test]
    fn test_welcome_message_present_before_any_poll() {
        let now = Instant::now();
        let overlay = Overlay::new(&config(), now);
        assert_eq!(overlay.elements().len(), 1);
        let (_, el) = overlay.elements().iter().next().unwrap();
        assert_eq!(el.message.author, "LiveQuest");
        assert_eq!(el.text.text, "ready to receive messages");
        assert_eq!(el.class, "message ");
        assert_eq!(overlay.cursor().last_index(), None);
        assert_eq!(overlay.container_id(), "chat-overlay");
    }

    #[test]
    fn test_single_message_from_fresh_cursor() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        let h = vec![ChatMessage::new("A", "hi").with_platform("Twitch")];
        assert_eq!(overlay.ingest(&h, now), 1);
        let classes: Vec<&str> = overlay.elements().iter().map(|(_, el)| el.class.as_str()).collect();
        assert_eq!(classes, vec!["message ", "message twitch"]);
        assert_eq!(overlay.cursor().last_index(), Some(0));
    }

    #[test]
    fn test_ingest_renders_only_new_entries() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        assert_eq!(overlay.ingest(&history(3), now), 3);
        assert_eq!(overlay.cursor().last_index(), Some(2));

        // len(H) - 1 - C new elements, counter ends at len(H) - 1
        let h = history(7);
        let before = overlay.elements().len();
        assert_eq!(overlay.ingest(&h, now), 7 - 1 - 2);
        assert_eq!(overlay.elements().len(), before + 4);
        assert_eq!(overlay.cursor().last_index(), Some(6));
    }

    #[test]
    fn test_ingest_is_idempotent() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        let h = history(4);
        overlay.ingest(&h, now);
        let count = overlay.elements().len();
        assert_eq!(overlay.ingest(&h, now), 0);
        assert_eq!(overlay.ingest(&h, now), 0);
        assert_eq!(overlay.elements().len(), count);
    }

    #[test]
    fn test_ingest_preserves_order() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        overlay.ingest(&history(3), now);
        let texts: Vec<&str> = overlay
            .elements()
            .iter()
            .skip(1)
            .map(|(_, el)| el.text.text.as_str())
            .collect();
        assert_eq!(texts, vec!["msg0", "msg1", "msg2"]);
    }

    #[test]
    fn test_shrunk_history_renders_nothing() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        overlay.ingest(&history(5), now);
        assert_eq!(overlay.ingest(&history(2), now), 0);
        assert_eq!(overlay.cursor().last_index(), Some(4));
        // Growth past the old length shows only the newer tail
        assert_eq!(overlay.ingest(&history(6), now), 1);
    }

    #[test]
    fn test_shrunk_history_counted_across_polls() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        overlay.ingest(&history(5), now);
        assert_eq!(overlay.shrunk_polls(), 0);

        // Only the first shrunk poll warns; later ones are counted quietly
        overlay.ingest(&history(2), now);
        assert_eq!(overlay.shrunk_polls(), 1);
        overlay.ingest(&history(3), now);
        assert_eq!(overlay.shrunk_polls(), 2);

        // Back at the displayed length clears the streak
        assert_eq!(overlay.ingest(&history(5), now), 0);
        assert_eq!(overlay.shrunk_polls(), 0);
        overlay.ingest(&history(1), now);
        assert_eq!(overlay.shrunk_polls(), 1);
    }

    #[test]
    fn test_elements_expire_no_earlier_than_dwell() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&config(), start);
        overlay.ingest(&history(2), start);
        assert_eq!(overlay.elements().len(), 3);

        let just_before = start + Duration::from_millis(59_999);
        assert!(overlay.expire(just_before).is_empty());
        assert_eq!(overlay.elements().len(), 3);

        assert_eq!(overlay.expire(start + Duration::from_secs(60)).len(), 3);
        assert!(overlay.elements().is_empty());
        assert!(overlay.expire(start + Duration::from_secs(61)).is_empty());
    }

    #[test]
    fn test_remove_checks_presence() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        let id = overlay.show(ChatMessage::new("a", "b"), now);
        assert!(overlay.remove(id));
        assert!(!overlay.remove(id));
        // Expiry after manual removal does not fail
        assert_eq!(overlay.expire(now + Duration::from_secs(120)).len(), 1);
    }

    #[test]
    fn test_opacity_fades_in_last_second() {
        let start = Instant::now();
        let mut overlay = Overlay::new(&config(), start);
        let id = overlay.show(ChatMessage::new("a", "b"), start);

        assert_eq!(overlay.opacity(id, start), 1.0);
        assert_eq!(overlay.opacity(id, start + Duration::from_secs(58)), 1.0);
        let half = overlay.opacity(id, start + Duration::from_millis(59_500));
        assert!((half - 0.5).abs() < 0.01);
        assert_eq!(overlay.opacity(id, start + Duration::from_secs(60)), 0.0);
        assert_eq!(overlay.opacity(ElementId(999), start), 0.0);
    }

    #[test]
    fn test_scroll_request_consumed_once() {
        let now = Instant::now();
        let mut overlay = Overlay::new(&config(), now);
        assert!(overlay.take_scroll_request());
        assert!(!overlay.take_scroll_request());
        overlay.ingest(&history(1), now);
        assert!(overlay.take_scroll_request());
    }

    #[test]
    fn test_next_change() {
        let start = Instant::now();
        let overlay = Overlay::new(&config(), start);
        assert_eq!(overlay.next_change(start), Some(Duration::from_secs(59)));
        assert_eq!(
            overlay.next_change(start + Duration::from_millis(59_500)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_earlier_variant_dwell() {
        let cfg = OverlayConfig { dwell_ms: 20_000, ..Default::default() };
        let start = Instant::now();
        let mut overlay = Overlay::new(&cfg, start);
        assert!(overlay.expire(start + Duration::from_secs(19)).is_empty());
        assert_eq!(overlay.expire(start + Duration::from_secs(20)).len(), 1);
    }
}
