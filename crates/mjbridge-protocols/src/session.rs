//! Collaborator traits for the chat session.
//!
//! The polling logic only ever talks to these traits. The production
//! implementation drives a Discord page over CDP; tests use a fixed list of
//! snapshots.

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::SessionError;
use crate::message::ChatMessage;

/// Outcome of [`SessionBootstrap::ensure_authenticated_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionReady {
    /// The channel was reachable without submitting the login form.
    AlreadyLoggedIn,
    /// Credentials were submitted and the channel became reachable.
    LoggedIn,
}

/// Source of the chat messages currently rendered in the channel.
///
/// Only rendered messages are visible; there is no scroll-back guarantee.
/// Implementations skip messages that disappear while being read and only
/// fail the whole call when the session itself is unreachable.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn list_visible_messages(&self) -> Result<Vec<ChatMessage>, SessionError>;
}

/// Sends a prompt through the channel's `/imagine` command.
#[async_trait]
pub trait PromptSubmitter: Send + Sync {
    async fn submit_prompt(&self, text: &str) -> Result<(), SessionError>;
}

/// Logs in and navigates to the configured channel.
#[async_trait]
pub trait SessionBootstrap: Send + Sync {
    async fn ensure_authenticated_session(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionReady, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    #[async_trait]
    impl MessageSource for Empty {
        async fn list_visible_messages(&self) -> Result<Vec<ChatMessage>, SessionError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_message_source_object_safe() {
        let source: Box<dyn MessageSource> = Box::new(Empty);
        let messages = source.list_visible_messages().await.unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_session_ready_eq() {
        assert_eq!(SessionReady::LoggedIn, SessionReady::LoggedIn);
        assert_ne!(SessionReady::LoggedIn, SessionReady::AlreadyLoggedIn);
    }
}
