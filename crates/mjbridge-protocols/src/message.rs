//! Chat message records.
//!
//! A [`ChatMessage`] is rebuilt from the rendered chat view on every poll and
//! never persisted. Its only identity is the `id` attribute of the list item
//! it was read from.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// A single message as currently rendered in the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identifier of the message within the chat stream.
    pub id: String,
    /// Plain-text rendering of the message body.
    pub content: String,
    /// Image URLs attached to the message, in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ChatMessage {
    /// Create a message without attachments.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// Attach an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Whether at least one image is attached.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// The only attached image, if there is exactly one.
    pub fn single_image(&self) -> Option<&str> {
        match self.images.as_slice() {
            [url] => Some(url.as_str()),
            _ => None,
        }
    }
}

/// Kind of finished generation result a message represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageKind {
    /// Single refined tile of a previous grid.
    Upscale,
    /// 2x2 composite, either a fresh grid or a variation batch.
    Grid,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Upscale => write!(f, "upscale"),
            ImageKind::Grid => write!(f, "grid"),
        }
    }
}
