//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome via WebSocket and speaks the CDP JSON-RPC protocol.
//! Only the handful of domains the Discord session needs are wrapped:
//! `Target`, `Page`, `Runtime` and `Input`.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page("about:blank").await?;
//! page.navigate("https://discord.com/app", Duration::from_secs(30)).await?;
//! ```

mod client;
mod connection;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::PageSession;
pub use protocol::*;
