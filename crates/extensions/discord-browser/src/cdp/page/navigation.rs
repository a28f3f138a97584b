//! Navigation and bounded waits.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::debug;

use super::PageSession;
use crate::cdp::error::CdpError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to `url` and wait until the document is interactive.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({ "url": url })))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        self.wait_for_load(timeout).await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait until `document.readyState` is `interactive` or `complete`.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        self.wait_until(
            "document.readyState === 'interactive' || document.readyState === 'complete'",
            timeout,
            "page load",
        )
        .await
    }

    /// Poll `condition` until it evaluates to `true`.
    ///
    /// Script errors while polling are treated as "not yet" since the page
    /// may be mid-navigation. Fails with [`CdpError::Timeout`] naming `what`.
    pub async fn wait_until(
        &self,
        condition: &str,
        timeout: Duration,
        what: &str,
    ) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.evaluate_bool(condition).await {
                Ok(true) => return Ok(()),
                Ok(false) | Err(CdpError::JavaScript(_)) => {}
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Err(CdpError::Timeout(what.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
