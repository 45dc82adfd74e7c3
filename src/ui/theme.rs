//! Color themes and styling for the chat overlay.
//!
//! # Overview
//!
//! The overlay has very few visual parts: the container background, one card
//! per message, the author label and the message text. Cards are tinted by
//! the platform the message came from, so a viewer can tell Twitch and
//! YouTube chat apart at a glance.
//!
//! ## Surfaces
//!
//! - `surface[0]`: Container background
//! - `surface[1]`: Message card background
//! - `surface[2]`: Status line background
//!
//! ## Platform Accents
//!
//! Each card gets a left stripe and a tinted fill from its platform class:
//!
//! - `message twitch`: purple
//! - `message youtube`: red
//! - anything else: the neutral default accent
//!
//! ## Author Colors
//!
//! Author names are colored with `author_color()`, a stable hash of the
//! name into a fixed palette, so the same viewer keeps the same color for the
//! whole stream.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use chat_overlay::ui::theme::OverlayTheme;
//!
//! let theme = OverlayTheme::from_name("dark");
//! let accent = theme.platform_accent("message twitch");
//! ```

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle};
use std::collections::BTreeMap;

/// Theme with platform accents for message cards
#[derive(Clone, Debug)]
pub struct OverlayTheme {
    pub name: String,
    pub surface: [Color32; 3],
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub error: Color32,
    pub accent_default: Color32,
    pub accent_twitch: Color32,
    pub accent_youtube: Color32,
}

impl OverlayTheme {
    /// Dark theme, the default for stream overlays
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            surface: [
                Color32::from_rgb(10, 10, 15), // surface_0: Container background
                Color32::from_rgb(28, 28, 38), // surface_1: Message card
                Color32::from_rgb(46, 46, 62), // surface_2: Status line
            ],
            text_primary: Color32::WHITE,
            text_muted: Color32::from_rgb(114, 118, 125),
            error: Color32::from_rgb(240, 71, 71),
            accent_default: Color32::from_rgb(88, 101, 242),
            accent_twitch: Color32::from_rgb(145, 70, 255),
            accent_youtube: Color32::from_rgb(255, 0, 0),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            surface: [
                Color32::from_rgb(255, 255, 255), // surface_0: Container background
                Color32::from_rgb(242, 243, 245), // surface_1: Message card
                Color32::from_rgb(227, 229, 232), // surface_2: Status line
            ],
            text_primary: Color32::from_rgb(6, 6, 7),
            text_muted: Color32::from_rgb(116, 127, 141),
            error: Color32::from_rgb(200, 40, 40),
            accent_default: Color32::from_rgb(88, 101, 242),
            accent_twitch: Color32::from_rgb(100, 65, 165),
            accent_youtube: Color32::from_rgb(204, 0, 0),
        }
    }

    /// Pick a theme by its settings name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "Dark"
    }

    /// Accent for an element class such as `message twitch`.
    ///
    /// Matches on the platform part of the class, so `message ` and
    /// unrecognised platforms share the default accent.
    pub fn platform_accent(&self, class: &str) -> Color32 {
        match class.split_whitespace().nth(1) {
            Some("twitch") => self.accent_twitch,
            Some("youtube") => self.accent_youtube,
            _ => self.accent_default,
        }
    }
}

/// Text styles used by the overlay cards.
pub fn configure_text_styles() -> BTreeMap<TextStyle, FontId> {
    use FontFamily::{Monospace, Proportional};

    [
        (TextStyle::Small, FontId::new(11.0, Proportional)),
        (TextStyle::Body, FontId::new(16.0, Proportional)),
        (TextStyle::Button, FontId::new(13.0, Proportional)),
        (TextStyle::Heading, FontId::new(18.0, Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, Monospace)),
        (TextStyle::Name("overlay_author".into()), FontId::new(16.0, Proportional)),
        (TextStyle::Name("overlay_timestamp".into()), FontId::new(11.0, Monospace)),
    ]
    .into()
}

/// Apply the theme to the egui context. Call once during app setup.
pub fn apply_overlay_style(ctx: &egui::Context, theme: &OverlayTheme) {
    ctx.set_visuals(if theme.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let mut style = (*ctx.style()).clone();
    style.text_styles = configure_text_styles();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.visuals.panel_fill = theme.surface[0];
    ctx.set_style(style);
}

/// Author palette. Use `author_color(name)` rather than indexing directly.
const AUTHOR_COLORS: [Color32; 12] = [
    Color32::from_rgb(231, 76, 60),   // Vibrant red
    Color32::from_rgb(46, 204, 113),  // Emerald green
    Color32::from_rgb(52, 152, 219),  // Bright blue
    Color32::from_rgb(155, 89, 182),  // Amethyst purple
    Color32::from_rgb(241, 196, 15),  // Sunflower yellow
    Color32::from_rgb(230, 126, 34),  // Carrot orange
    Color32::from_rgb(26, 188, 156),  // Turquoise
    Color32::from_rgb(236, 100, 166), // Pink
    Color32::from_rgb(41, 128, 185),  // Belize blue
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(22, 160, 133),  // Green sea
    Color32::from_rgb(102, 178, 255), // Light blue
];

/// Stable color for an author name (FNV-1a over the bytes).
pub fn author_color(author: &str) -> Color32 {
    let mut hash: u64 = 1469598103934665603u64;
    for b in author.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    let idx = (hash as usize) % AUTHOR_COLORS.len();
    AUTHOR_COLORS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_accent() {
        let theme = OverlayTheme::dark();
        assert_eq!(theme.platform_accent("message twitch"), theme.accent_twitch);
        assert_eq!(theme.platform_accent("message youtube"), theme.accent_youtube);
        assert_eq!(theme.platform_accent("message "), theme.accent_default);
        assert_eq!(theme.platform_accent("message kick"), theme.accent_default);
    }

    #[test]
    fn test_from_name() {
        assert!(OverlayTheme::from_name("dark").is_dark());
        assert!(!OverlayTheme::from_name("light").is_dark());
        assert!(OverlayTheme::from_name("neon").is_dark());
    }

    #[test]
    fn test_author_color_is_stable() {
        assert_eq!(author_color("gopher"), author_color("gopher"));
        assert!(AUTHOR_COLORS.contains(&author_color("")));
    }
}
