//! Backend event processing (chat history, poll failures, shutdown).

use std::time::Instant;

use super::OverlayApp;
use crate::protocol::GuiEvent;

impl OverlayApp {
    /// Process all pending events from the backend.
    ///
    /// Returns how many new elements were rendered.
    pub fn process_events(&mut self, now: Instant) -> usize {
        let mut rendered = 0;

        // Drain all pending events from the backend
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                GuiEvent::History(history) => {
                    rendered += self.overlay.ingest(&history, now);
                    self.status.last_error = None;
                }

                GuiEvent::PollFailed(err) => {
                    self.status.last_error = Some(err);
                }

                GuiEvent::Stopped => {
                    self.status.stopped = true;
                }
            }
        }

        rendered
    }
}
