//! Scoped browser resource: Chrome process, CDP connection and one page.

use tokio::process::Child;
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, PageSession};
use crate::launcher::{BrowserError, ChromeLauncher, LaunchConfig};

/// An acquired browser. Released by [`BrowserSession::close`]; dropping it
/// also kills a Chrome this session started.
pub struct BrowserSession {
    client: CdpClient,
    page: PageSession,
    /// Whether `page` was opened by this session rather than reused.
    opened_page: bool,
    chrome: Option<Child>,
}

impl BrowserSession {
    /// Connect to Chrome (launching it when nothing listens on the debug
    /// port) and attach to a page.
    ///
    /// An existing tab on `prefer_host` (or one of its subdomains) is
    /// reused; otherwise a blank tab is opened.
    pub async fn acquire(config: LaunchConfig, prefer_host: &str) -> Result<Self, BrowserError> {
        let launcher = ChromeLauncher::new(config);
        let chrome = launcher.ensure_running().await?;
        let config = launcher.config();

        let client = CdpClient::connect(&config.endpoint(), config.request_timeout).await?;
        info!("Connected to Chrome at {}", config.endpoint());

        let pages = client.list_pages().await?;
        let existing = pages
            .iter()
            .filter(|p| p.is_page())
            .find(|p| on_host(&p.url, prefer_host));

        let (page, opened_page) = match existing {
            Some(info) => {
                debug!("Reusing page {} at {}", info.id, info.url);
                (client.attach_page(&info.id).await?, false)
            }
            None => (client.new_page("about:blank").await?, true),
        };
        page.bring_to_front().await?;

        Ok(Self {
            client,
            page,
            opened_page,
            chrome,
        })
    }

    pub fn page(&self) -> &PageSession {
        &self.page
    }

    /// Release the session. A Chrome started by [`BrowserSession::acquire`]
    /// is shut down; in a pre-existing one only a tab opened here is closed.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        let Some(mut chrome) = self.chrome.take() else {
            if self.opened_page {
                self.client.close_page(self.page.target_id()).await?;
            }
            debug!("Leaving externally started Chrome running");
            return Ok(());
        };

        if let Err(e) = self.client.close_browser().await {
            warn!("Browser.close failed, killing Chrome: {}", e);
        }
        match tokio::time::timeout(std::time::Duration::from_secs(5), chrome.wait()).await {
            Ok(Ok(status)) => debug!("Chrome exited: {}", status),
            _ => {
                chrome
                    .kill()
                    .await
                    .map_err(|e| BrowserError::LaunchFailed(format!("kill: {}", e)))?;
            }
        }
        info!("Browser session closed");
        Ok(())
    }
}

fn on_host(page_url: &str, host: &str) -> bool {
    let Ok(url) = url::Url::parse(page_url) else {
        return false;
    };
    match url.host_str() {
        Some(h) => h == host || h.strip_suffix(host).is_some_and(|sub| sub.ends_with('.')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_host() {
        assert!(on_host("https://discord.com/channels/1/2", "discord.com"));
        assert!(on_host("https://canary.discord.com/app", "discord.com"));
        assert!(!on_host("https://notdiscord.com/", "discord.com"));
        assert!(!on_host("about:blank", "discord.com"));
        assert!(!on_host("not a url", "discord.com"));
    }
}
