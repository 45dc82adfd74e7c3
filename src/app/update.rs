//! Main update loop

use eframe::egui;
use std::time::Instant;

use super::OverlayApp;
use crate::ui;

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Process backend events, then drop anything past its dwell time
        self.process_events(now);
        self.overlay.expire(now);

        self.handle_shortcuts(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.stop_backend();
        }

        ui::render_overlay(
            ctx,
            &mut self.overlay,
            &self.theme,
            &self.status,
            self.config.show_timestamps,
            now,
        );

        // Wake up for the next poll result or the next fade/expiry
        ctx.request_repaint_after(self.repaint_hint(now));
    }
}
