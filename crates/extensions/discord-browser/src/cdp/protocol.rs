//! CDP protocol types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// CDP response or event message.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    /// Set for events.
    pub method: Option<String>,
    pub params: Option<Value>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

/// Page entry from `/json/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

impl PageInfo {
    /// Whether this target is a regular tab.
    pub fn is_page(&self) -> bool {
        self.page_type == "page"
    }
}

/// Browser version info from `/json/version`.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Key event types for `Input.dispatchKeyEvent`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
    RawKeyDown,
}

/// Keys the session presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
}

impl Key {
    /// DOM `key` value.
    pub fn key(self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Tab => "Tab",
        }
    }

    /// DOM `code` value.
    pub fn code(self) -> &'static str {
        self.key()
    }

    pub fn virtual_key_code(self) -> u32 {
        match self {
            Key::Enter => 13,
            Key::Tab => 9,
        }
    }

    /// Text generated by the key, if any. Editors only submit on Enter
    /// when the key down carries `"\r"`.
    pub fn text(self) -> Option<&'static str> {
        match self {
            Key::Enter => Some("\r"),
            Key::Tab => None,
        }
    }
}
