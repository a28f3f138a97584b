//! # mjbridge Protocols
//!
//! Records and collaborator traits shared by the mjbridge crates.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`MessageSource`] - Snapshot of the chat messages currently rendered
//! - [`PromptSubmitter`] - Sends an `/imagine` prompt into the channel
//! - [`SessionBootstrap`] - Logs in and navigates to the target channel

pub mod credentials;
pub mod error;
pub mod message;
pub mod session;

pub use credentials::Credentials;
pub use error::SessionError;
pub use message::{ChatMessage, ImageKind};
pub use session::{MessageSource, PromptSubmitter, SessionBootstrap, SessionReady};
