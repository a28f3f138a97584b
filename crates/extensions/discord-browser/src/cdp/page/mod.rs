//! Page session: commands scoped to one attached tab.
//!
//! Split across submodules:
//! - `core`: construction, raw calls and domain setup
//! - `js`: script evaluation
//! - `navigation`: navigation and bounded waits
//! - `input`: keyboard and mouse
//! - `dom`: selector helpers built on evaluation and input

mod core;
mod dom;
mod input;
mod js;
mod navigation;

use std::sync::Arc;

use super::connection::CdpConnection;

/// A CDP session attached to one page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    connection: Arc<CdpConnection>,
}
