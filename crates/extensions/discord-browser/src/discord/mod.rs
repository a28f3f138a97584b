//! Discord channel session.
//!
//! [`DiscordSession`] turns one attached page into the three collaborators
//! the image pipeline needs. Every wait on the Discord UI is bounded by
//! the ready timeout given to [`DiscordSession::new`].

mod selectors;
mod snapshot;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use mjbridge_protocols::{
    ChatMessage, Credentials, MessageSource, PromptSubmitter, SessionBootstrap, SessionError,
    SessionReady,
};

use crate::cdp::{CdpError, Key};
use crate::launcher::BrowserError;
use crate::session::BrowserSession;

pub use selectors::DiscordSelectors;
pub use snapshot::{extraction_script, parse_snapshot};

/// Discord web origin.
pub const DISCORD_ORIGIN: &str = "https://discord.com";

/// Pause between focusing the composer and typing the command.
const FOCUS_SETTLE: Duration = Duration::from_secs(1);

/// Full channel URL for the given credentials.
pub fn channel_url(credentials: &Credentials) -> String {
    format!("{}{}", DISCORD_ORIGIN, credentials.channel_path())
}

/// A Discord channel driven through an owned [`BrowserSession`].
pub struct DiscordSession {
    browser: BrowserSession,
    selectors: DiscordSelectors,
    ready_timeout: Duration,
}

impl DiscordSession {
    pub fn new(browser: BrowserSession, ready_timeout: Duration) -> Self {
        Self {
            browser,
            selectors: DiscordSelectors::default(),
            ready_timeout,
        }
    }

    /// Release the underlying browser.
    pub async fn close(self) -> Result<(), BrowserError> {
        self.browser.close().await
    }

    fn page(&self) -> &crate::cdp::PageSession {
        self.browser.page()
    }

    async fn dismiss_app_prompt(&self) -> Result<(), CdpError> {
        if self
            .page()
            .click_button_with_text(&self.selectors.continue_button_text)
            .await?
        {
            debug!("Dismissed \"{}\" prompt", self.selectors.continue_button_text);
        }
        Ok(())
    }

    async fn submit_login(&self, credentials: &Credentials) -> Result<(), CdpError> {
        let page = self.page();
        page.focus(&self.selectors.email_input).await?;
        page.type_text(&credentials.email).await?;
        page.focus(&self.selectors.password_input).await?;
        page.type_text(&credentials.password).await?;
        page.press_key(Key::Enter).await
    }

    /// Focus the page and move keyboard focus into the composer.
    async fn focus_composer(&self) -> Result<(), CdpError> {
        let page = self.page();
        page.evaluate("window.focus(); document.body.focus(); true")
            .await?;
        page.press_key(Key::Tab).await?;
        match page.focus(&self.selectors.message_input).await {
            Ok(()) | Err(CdpError::ElementNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Map readiness timeouts to the element that never showed up.
fn waiting_for(what: &str) -> impl FnOnce(CdpError) -> SessionError + '_ {
    move |e| match e {
        CdpError::Timeout(_) => SessionError::Timeout(what.to_string()),
        other => other.into(),
    }
}

#[async_trait]
impl SessionBootstrap for DiscordSession {
    async fn ensure_authenticated_session(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionReady, SessionError> {
        let page = self.page();
        let url = channel_url(credentials);
        info!("Opening {}", url);
        page.navigate(&url, self.ready_timeout).await?;

        self.dismiss_app_prompt().await?;

        let text_area = self.selectors.channel_text_area.as_str();
        page.wait_for_any(
            &[self.selectors.email_input.as_str(), text_area],
            self.ready_timeout,
            "login form or channel",
        )
        .await
        .map_err(waiting_for("login form or channel"))?;

        if page.exists(text_area).await? {
            info!("Already logged in");
            return Ok(SessionReady::AlreadyLoggedIn);
        }

        info!("Logging in as {}", credentials.email);
        self.submit_login(credentials).await?;

        match page.wait_for_selector(text_area, self.ready_timeout).await {
            Ok(()) => {
                info!("Logged in");
                Ok(SessionReady::LoggedIn)
            }
            Err(CdpError::Timeout(_)) => Err(SessionError::AuthenticationFailed(
                "channel did not load after submitting credentials".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl MessageSource for DiscordSession {
    async fn list_visible_messages(&self) -> Result<Vec<ChatMessage>, SessionError> {
        let script = extraction_script(&self.selectors);
        let value = self.page().evaluate(&script).await.map_err(|e| match e {
            CdpError::JavaScript(msg) => SessionError::StaleElement(msg),
            other => other.into(),
        })?;
        Ok(parse_snapshot(value))
    }
}

#[async_trait]
impl PromptSubmitter for DiscordSession {
    async fn submit_prompt(&self, text: &str) -> Result<(), SessionError> {
        let page = self.page();

        let ready = format!(
            "document.querySelector({}) !== null || Array.from(document.querySelectorAll('button')).some((b) => b.textContent.includes({}))",
            serde_json::Value::String(self.selectors.channel_text_area.clone()),
            serde_json::Value::String(self.selectors.close_button_text.clone()),
        );
        page.wait_until(&ready, self.ready_timeout, "message input")
            .await
            .map_err(waiting_for("message input"))?;

        self.focus_composer().await?;
        debug!("Focused on message input box");
        tokio::time::sleep(FOCUS_SETTLE).await;

        page.type_text("/imagine").await?;
        page.wait_for_selector(&self.selectors.autocomplete_heading, self.ready_timeout)
            .await
            .map_err(waiting_for("/imagine autocomplete"))?;
        page.press_key(Key::Enter).await?;

        page.type_text(text).await?;
        page.press_key(Key::Enter).await?;
        debug!("Submitted /imagine {}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_url() {
        let credentials = Credentials::new("a@b.c", "pw", "111", "222");
        assert_eq!(
            channel_url(&credentials),
            "https://discord.com/channels/111/222"
        );
    }

    #[test]
    fn test_waiting_for_names_element() {
        let err = waiting_for("/imagine autocomplete")(CdpError::Timeout("x".into()));
        assert_eq!(err.to_string(), "Timed out waiting for /imagine autocomplete");
    }

    #[test]
    fn test_waiting_for_passes_other_errors() {
        let err = waiting_for("channel")(CdpError::SessionClosed);
        assert!(matches!(err, SessionError::Unavailable(_)));
    }
}
