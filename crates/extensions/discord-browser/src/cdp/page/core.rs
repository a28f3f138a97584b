//! Core page session plumbing.

use std::sync::Arc;

use serde_json::Value;

use super::PageSession;
use crate::cdp::connection::CdpConnection;
use crate::cdp::error::CdpError;

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        connection: Arc<CdpConnection>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            connection,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a command scoped to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        Ok(())
    }

    /// Bring the tab to the foreground.
    pub async fn bring_to_front(&self) -> Result<(), CdpError> {
        self.call("Page.bringToFront", None).await?;
        Ok(())
    }
}
