//! Scripted session for exercising the pipeline without a browser.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use mjbridge_protocols::{ChatMessage, MessageSource, PromptSubmitter, SessionError};

#[derive(Debug, Clone)]
enum Frame {
    Messages(Vec<ChatMessage>),
    Stale,
    Unavailable,
}

/// A [`MessageSource`] and [`PromptSubmitter`] backed by a fixed list of
/// snapshots.
///
/// Every call to `list_visible_messages` consumes the next frame; once the
/// script runs out the last frame is repeated. Submitted prompts are recorded.
#[derive(Debug, Default)]
pub struct FixtureSource {
    frames: Mutex<VecDeque<Frame>>,
    last: Mutex<Option<Frame>>,
    polls: Mutex<usize>,
    submitted: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of visible messages.
    pub fn frame(self, messages: Vec<ChatMessage>) -> Self {
        self.frames.lock().push_back(Frame::Messages(messages));
        self
    }

    /// Append a snapshot that fails with a transient stale-element error.
    pub fn stale_frame(self) -> Self {
        self.frames.lock().push_back(Frame::Stale);
        self
    }

    /// Append a snapshot that fails because the session went away.
    pub fn unavailable_frame(self) -> Self {
        self.frames.lock().push_back(Frame::Unavailable);
        self
    }

    /// Number of `list_visible_messages` calls so far.
    pub fn polls(&self) -> usize {
        *self.polls.lock()
    }

    pub fn submitted_prompts(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }

    fn next_frame(&self) -> Option<Frame> {
        *self.polls.lock() += 1;
        let mut last = self.last.lock();
        if let Some(frame) = self.frames.lock().pop_front() {
            *last = Some(frame);
        }
        last.clone()
    }
}

#[async_trait]
impl MessageSource for FixtureSource {
    async fn list_visible_messages(&self) -> Result<Vec<ChatMessage>, SessionError> {
        match self.next_frame() {
            None => Ok(Vec::new()),
            Some(Frame::Messages(messages)) => Ok(messages),
            Some(Frame::Stale) => Err(SessionError::StaleElement("fixture".to_string())),
            Some(Frame::Unavailable) => {
                Err(SessionError::Unavailable("fixture session closed".to_string()))
            }
        }
    }
}

#[async_trait]
impl PromptSubmitter for FixtureSource {
    async fn submit_prompt(&self, text: &str) -> Result<(), SessionError> {
        self.submitted.lock().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_fixture() {
        let source = FixtureSource::new();
        assert!(source.list_visible_messages().await.unwrap().is_empty());
        assert_eq!(source.polls(), 1);
    }

    #[tokio::test]
    async fn test_frames_in_order_then_repeat_last() {
        let source = FixtureSource::new()
            .frame(vec![ChatMessage::new("1", "first")])
            .frame(vec![ChatMessage::new("2", "second")]);

        assert_eq!(source.list_visible_messages().await.unwrap()[0].id, "1");
        assert_eq!(source.list_visible_messages().await.unwrap()[0].id, "2");
        assert_eq!(source.list_visible_messages().await.unwrap()[0].id, "2");
        assert_eq!(source.polls(), 3);
    }

    #[tokio::test]
    async fn test_error_frames() {
        let source = FixtureSource::new().stale_frame().unavailable_frame();
        let first = source.list_visible_messages().await.unwrap_err();
        assert!(first.is_transient());
        let second = source.list_visible_messages().await.unwrap_err();
        assert!(matches!(second, SessionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_records_prompts() {
        let source = FixtureSource::new();
        source.submit_prompt("a cat").await.unwrap();
        source.submit_prompt("a dog").await.unwrap();
        assert_eq!(source.submitted_prompts(), vec!["a cat", "a dog"]);
    }
}
