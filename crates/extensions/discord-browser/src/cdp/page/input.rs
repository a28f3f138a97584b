//! Keyboard input.

use serde_json::json;
use tracing::debug;

use super::PageSession;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::{Key, KeyEventType};

impl PageSession {
    /// Insert text into the focused element.
    pub async fn type_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({ "text": text })))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release a key on the focused element.
    pub async fn press_key(&self, key: Key) -> Result<(), CdpError> {
        let mut down = json!({
            "type": KeyEventType::RawKeyDown,
            "key": key.key(),
            "code": key.code(),
            "windowsVirtualKeyCode": key.virtual_key_code(),
        });
        if let Some(text) = key.text() {
            down["type"] = json!(KeyEventType::KeyDown);
            down["text"] = json!(text);
        }
        self.call("Input.dispatchKeyEvent", Some(down)).await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyUp,
                "key": key.key(),
                "code": key.code(),
                "windowsVirtualKeyCode": key.virtual_key_code(),
            })),
        )
        .await?;

        debug!("Pressed {}", key.key());
        Ok(())
    }
}
