//! Chat Overlay library.
//!
//! This module re-exports the core components for testing and extension.

pub mod app;
pub mod backend;
pub mod config;
pub mod errors;
pub mod logging;
pub mod message;
pub mod overlay;
pub mod protocol;
pub mod ui;
