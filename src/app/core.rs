//! Core OverlayApp struct definition and initialization

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::thread;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::backend::run_backend;
use crate::config::OverlayConfig;
use crate::overlay::Overlay;
use crate::protocol::{BackendAction, GuiEvent};
use crate::ui::{self, OverlayTheme, PollStatus};

pub struct OverlayApp {
    // Renderer state (cursor + on-screen elements)
    pub overlay: Overlay,

    pub config: OverlayConfig,
    pub theme: OverlayTheme,
    pub status: PollStatus,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<GuiEvent>,

    // Cancels the polling loop on shutdown
    pub shutdown: CancellationToken,
}

impl OverlayApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: OverlayConfig) -> Self {
        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();
        let shutdown = CancellationToken::new();

        // Spawn the backend thread
        let backend_config = config.clone();
        let backend_shutdown = shutdown.clone();
        thread::spawn(move || {
            run_backend(backend_config, action_rx, event_tx, backend_shutdown);
        });

        let app = Self::with_channels(config, action_tx, event_rx, shutdown, Instant::now());
        ui::apply_overlay_style(&cc.egui_ctx, &app.theme);
        app
    }

    /// Build the app around existing backend channels. The welcome message
    /// is on screen as soon as this returns.
    pub fn with_channels(
        config: OverlayConfig,
        action_tx: Sender<BackendAction>,
        event_rx: Receiver<GuiEvent>,
        shutdown: CancellationToken,
        now: Instant,
    ) -> Self {
        Self {
            overlay: Overlay::new(&config, now),
            theme: OverlayTheme::from_name(&config.theme),
            status: PollStatus::default(),
            config,
            action_tx,
            event_rx,
            shutdown,
        }
    }

    /// Ask the backend for an immediate poll cycle.
    pub fn request_poll(&self) {
        let _ = self.action_tx.send(BackendAction::PollNow);
    }

    /// Stop the backend. Safe to call more than once.
    pub fn stop_backend(&self) {
        if !self.shutdown.is_cancelled() {
            tracing::info!(event = "overlay.app.shutdown_requested");
            let _ = self.action_tx.send(BackendAction::Shutdown);
            self.shutdown.cancel();
        }
    }

    /// How long the UI can sleep before something needs redrawing.
    pub fn repaint_hint(&self, now: Instant) -> std::time::Duration {
        let poll = self.config.poll_interval();
        match self.overlay.next_change(now) {
            Some(change) if self.overlay.elements().iter().any(|(id, _)| self.overlay.opacity(id, now) < 1.0) => {
                // Mid-fade: repaint smoothly
                change.min(std::time::Duration::from_millis(16))
            }
            Some(change) => change.min(poll),
            None => poll,
        }
    }

    pub(super) fn handle_shortcuts(&self, ctx: &egui::Context) {
        ctx.input(|i| {
            // F5: poll now
            if i.key_pressed(egui::Key::F5) {
                self.request_poll();
            }
        });
    }
}

impl Drop for OverlayApp {
    fn drop(&mut self) {
        self.stop_backend();
    }
}
