//! The overlay container: one card per on-screen element, newest at the bottom.

use eframe::egui::{self, Color32, RichText};
use std::time::Instant;

use crate::overlay::{Overlay, OverlayElement};

use super::theme::{author_color, OverlayTheme};

/// Connection state shown under the messages when something is wrong.
#[derive(Debug, Default, Clone)]
pub struct PollStatus {
    pub last_error: Option<String>,
    pub stopped: bool,
}

/// Render the overlay container and its elements.
pub fn render_overlay(
    ctx: &egui::Context,
    overlay: &mut Overlay,
    theme: &OverlayTheme,
    status: &PollStatus,
    show_timestamps: bool,
    now: Instant,
) {
    let scroll_to_bottom = overlay.take_scroll_request();

    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(theme.surface[0]).inner_margin(egui::Margin::same(8)))
        .show(ctx, |ui| {
            if status.last_error.is_some() || status.stopped {
                egui::TopBottomPanel::bottom("poll_status")
                    .frame(egui::Frame::new().fill(theme.surface[2]).inner_margin(egui::Margin::symmetric(8, 4)))
                    .show_inside(ui, |ui| render_status(ui, status, theme));
            }

            egui::ScrollArea::vertical()
                .id_salt(overlay.container_id().to_string())
                .auto_shrink([false; 2])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for (id, element) in overlay.elements().iter() {
                        let alpha = overlay.opacity(id, now);
                        render_element(ui, element, theme, alpha, show_timestamps);
                        ui.add_space(4.0);
                    }
                    if scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });
}

/// One message card. Author and text are laid out as plain labels.
fn render_element(
    ui: &mut egui::Ui,
    element: &OverlayElement,
    theme: &OverlayTheme,
    alpha: f32,
    show_timestamps: bool,
) {
    let accent = theme.platform_accent(&element.class).gamma_multiply(alpha);
    let fill = theme.surface[1].gamma_multiply(alpha);

    egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, accent))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                if show_timestamps {
                    ui.label(
                        RichText::new(&element.shown_at)
                            .text_style(egui::TextStyle::Name("overlay_timestamp".into()))
                            .color(theme.text_muted.gamma_multiply(alpha)),
                    );
                }
                ui.label(
                    RichText::new(&element.author.text)
                        .text_style(egui::TextStyle::Name("overlay_author".into()))
                        .strong()
                        .color(author_color(&element.message.author).gamma_multiply(alpha)),
                );
                ui.label(RichText::new(&element.text.text).color(theme.text_primary.gamma_multiply(alpha)));
            });
        });
}

fn render_status(ui: &mut egui::Ui, status: &PollStatus, theme: &OverlayTheme) {
    let (text, color): (String, Color32) = if status.stopped {
        ("Polling stopped".into(), theme.text_muted)
    } else if let Some(err) = &status.last_error {
        (format!("⚠ {}", err), theme.error)
    } else {
        return;
    };
    ui.label(RichText::new(text).small().color(color));
}
