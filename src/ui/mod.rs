//! UI rendering modules for the chat overlay.
//!
//! - `overlay`: the overlay container and its message cards
//! - `theme`: color schemes, platform accents and text styles

pub mod overlay;
pub mod theme;

pub use overlay::{render_overlay, PollStatus};
pub use theme::{apply_overlay_style, OverlayTheme};
