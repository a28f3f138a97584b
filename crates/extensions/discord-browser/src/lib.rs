//! Discord channel automation for mjbridge.
//!
//! Drives a Chrome page over the Chrome DevTools Protocol (CDP) and exposes
//! it through the collaborator traits of `mjbridge-protocols`:
//!
//! - [`DiscordSession`] implements `SessionBootstrap`, `MessageSource` and
//!   `PromptSubmitter` on top of a single page.
//! - [`BrowserSession`] owns the CDP connection, the page and, when it had to
//!   start one, the Chrome process.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  mjbridge       │ ◄──────────────► │   Chrome         │
//! │  (this crate)   │       CDP        │  discord.com tab │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! Chrome is launched automatically with a persistent profile. To reuse a
//! running browser instead, start it with remote debugging enabled:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```

pub mod cdp;
pub mod discord;
mod launcher;
mod session;

pub use cdp::{CdpClient, CdpError, Key, PageSession};
pub use discord::{DiscordSelectors, DiscordSession};
pub use launcher::{BrowserError, ChromeLauncher, LaunchConfig};
pub use session::BrowserSession;
