//! Chat Overlay - shows live-stream chat as transient on-screen messages
//!
//! Architecture:
//! - Main thread: runs the egui overlay window
//! - Backend thread: runs a Tokio runtime that polls the chat endpoint
//! - Communication via crossbeam channels (lock-free, sync-safe)

use clap::Parser;
use eframe::egui;

use chat_overlay::app::OverlayApp;
use chat_overlay::config::{self, CliArgs};
use chat_overlay::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    logging::init_logging(args.log_level.as_deref())?;

    // Configuration problems are fatal before any window opens
    let config = config::resolve(&args).map_err(|e| {
        tracing::error!(event = "overlay.config.invalid", error = %e);
        e
    })?;

    if args.save_config {
        config::save_effective(&args, &config)?;
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Chat Overlay")
        .with_inner_size([config.window_width, config.window_height])
        .with_min_inner_size([200.0, 120.0]);
    if config.always_on_top {
        viewport = viewport.with_window_level(egui::WindowLevel::AlwaysOnTop);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!(
        event = "overlay.app.starting",
        endpoint = %config.endpoint,
        dwell_ms = config.dwell_ms,
        response_shape = ?config.response_shape,
    );

    eframe::run_native(
        "Chat Overlay",
        options,
        Box::new(move |cc| Ok(Box::new(OverlayApp::new(cc, config)))),
    )?;
    Ok(())
}
