//! Chat message model shared by the backend and the overlay.
//!
//! The chat server hands out its whole history on every request, oldest
//! first. Position in that list is the only identity a message has here.

use serde::{Deserialize, Serialize};

use crate::errors::OverlayError;

pub const PLATFORM_YOUTUBE: &str = "Youtube";
pub const PLATFORM_TWITCH: &str = "Twitch";

/// A single viewer message as served by the chat endpoint.
///
/// Field aliases cover servers that serialize their message struct without
/// renaming (`Author`, `Text`, ...).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ChatMessage {
    #[serde(alias = "Author")]
    pub author: String,
    #[serde(alias = "Text")]
    pub text: String,
    /// Source platform; empty means default styling.
    #[serde(default, alias = "Platform")]
    pub platform: String,
    /// Platform-dependent id, not unique across platforms.
    #[serde(default, alias = "UID", skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Style class for the rendered element: `message <platform-lowercased>`.
    ///
    /// An empty platform keeps the trailing space.
    pub fn css_class(&self) -> String {
        format!("message {}", self.platform.to_lowercase())
    }

    pub fn is_youtube(&self) -> bool {
        self.platform.eq_ignore_ascii_case(PLATFORM_YOUTUBE)
    }

    pub fn is_twitch(&self) -> bool {
        self.platform.eq_ignore_ascii_case(PLATFORM_TWITCH)
    }
}

/// JSON layout of the `/chat` response body.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `[ChatMessage, ...]`
    #[default]
    Bare,
    /// `{ "chatHistory": [ChatMessage, ...] }`
    Wrapped,
}

#[derive(Deserialize)]
struct WrappedHistory {
    #[serde(rename = "chatHistory", alias = "ChatHistory", default)]
    chat_history: Vec<ChatMessage>,
}

/// Decode a response body into the ordered chat history.
///
/// A JSON `null` body (a server with no messages yet) is an empty history.
pub fn decode_history(body: &[u8], shape: ResponseShape) -> Result<Vec<ChatMessage>, OverlayError> {
    let history = match shape {
        ResponseShape::Bare => serde_json::from_slice::<Option<Vec<ChatMessage>>>(body)?.unwrap_or_default(),
        ResponseShape::Wrapped => serde_json::from_slice::<WrappedHistory>(body)?.chat_history,
    };
    Ok(history)
}
