//! Application module structure for OverlayApp
//!
//! - `core`: OverlayApp struct, initialization and backend lifecycle
//! - `events`: Event processing from the backend
//! - `update`: Main update loop and shortcuts

pub mod core;
pub mod events;
pub mod update;

// Re-export OverlayApp for public API
pub use self::core::OverlayApp;
