//! Waiting for a finished grid.
//!
//! The channel is re-read on a fixed interval. A message is accepted when it
//! echoes the submitted prompt, was not on screen before the prompt was sent,
//! and is a finished grid with exactly one image. That image is downloaded,
//! split into quadrants and written to the artifact store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use mjbridge_protocols::{ChatMessage, ImageKind, MessageSource};

use crate::classifier::MessageClassifier;
use crate::download::ImageDownloader;
use crate::error::ImagineError;
use crate::matcher;
use crate::store::ArtifactStore;

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

/// Polling cadence and optional upper bound on the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between two snapshots.
    pub interval: Duration,
    /// Give up after this long. `None` waits until cancelled.
    pub deadline: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            deadline: None,
        }
    }
}

/// Message ids that were already visible before the prompt was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenMessages(HashSet<String>);

impl SeenMessages {
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        messages.iter().map(|m| m.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for SeenMessages {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A message accepted as the final deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deliverable<'a> {
    pub message: &'a ChatMessage,
    pub image_url: &'a str,
}

/// Polls a [`MessageSource`] until the grid for a prompt arrives.
#[derive(Debug, Clone)]
pub struct ResultPoller {
    classifier: MessageClassifier,
    downloader: ImageDownloader,
    store: ArtifactStore,
    options: PollOptions,
}

impl ResultPoller {
    pub fn new(
        classifier: MessageClassifier,
        downloader: ImageDownloader,
        store: ArtifactStore,
        options: PollOptions,
    ) -> Self {
        Self {
            classifier,
            downloader,
            store,
            options,
        }
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Pick the finished grid for `prompt` out of one snapshot, if present.
    pub fn select_deliverable<'m>(
        &self,
        messages: &'m [ChatMessage],
        seen: &SeenMessages,
        prompt: &str,
    ) -> Option<Deliverable<'m>> {
        for message in messages {
            if seen.contains(&message.id)
                || !message.has_images()
                || !matcher::matches(prompt, &message.content)
            {
                continue;
            }

            let Some(kind) = self.classifier.classify(message) else {
                continue;
            };

            match (kind, message.single_image()) {
                (ImageKind::Grid, Some(image_url)) => {
                    return Some(Deliverable { message, image_url });
                }
                _ => debug!(
                    "Skipping {} result {} with {} image(s)",
                    kind,
                    message.id,
                    message.images.len()
                ),
            }
        }

        None
    }

    /// Re-read the channel until the grid for `prompt` arrives, then download,
    /// split and store it.
    ///
    /// Returns the four quadrant paths. A transient extraction failure only
    /// skips the current iteration; an unreachable session is returned as an
    /// error right away.
    pub async fn await_result(
        &self,
        source: &dyn MessageSource,
        seen: &SeenMessages,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>, ImagineError> {
        let started = Instant::now();
        let mut iteration: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(ImagineError::Cancelled);
            }
            iteration += 1;

            let messages = match source.list_visible_messages().await {
                Ok(messages) => messages,
                Err(e) if e.is_transient() => {
                    debug!("Poll {} skipped: {}", iteration, e);
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };
            debug!("Poll {}: {} visible message(s)", iteration, messages.len());

            if let Some(found) = self.select_deliverable(&messages, seen, prompt) {
                info!("Grid finished in message {}", found.message.id);
                return self.deliver(found.image_url).await;
            }

            if let Some(deadline) = self.options.deadline {
                if started.elapsed() >= deadline {
                    return Err(ImagineError::DeadlineExceeded(deadline));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(ImagineError::Cancelled),
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        }
    }

    async fn deliver(&self, image_url: &str) -> Result<Vec<PathBuf>, ImagineError> {
        let base = ArtifactStore::base_name(image_url);
        info!("Downloading image: {}", base);

        let grid = self.downloader.fetch(image_url).await?;
        self.store
            .save_quadrants(&base, &grid.split(), grid.icc_profile.as_deref())
    }
}
