//! One prompt, end to end.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::info;

use mjbridge_protocols::{MessageSource, PromptSubmitter};

use crate::error::ImagineError;
use crate::poller::{ResultPoller, SeenMessages};

/// Submits prompts through a session and waits for their grids.
///
/// Holds the session exclusively: only one prompt is in flight at a time.
pub struct ImageCreator<S> {
    session: S,
    poller: ResultPoller,
}

impl<S> ImageCreator<S>
where
    S: MessageSource + PromptSubmitter,
{
    pub fn new(session: S, poller: ResultPoller) -> Self {
        Self { session, poller }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Give the session back, e.g. to close it.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Send `prompt` and return the paths of the four stored quadrants.
    pub async fn create_image(
        &mut self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>, ImagineError> {
        let before = self.session.list_visible_messages().await?;
        let seen = SeenMessages::from_messages(&before);

        info!("Sending prompt ...");
        self.session.submit_prompt(prompt).await?;
        info!("Prompt sent, monitoring for results ...");

        self.poller
            .await_result(&self.session, &seen, prompt, cancel)
            .await
    }
}
