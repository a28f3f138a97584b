//! Session errors.

use thiserror::Error;

/// Errors raised by the browser-side collaborators.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The browser session is not initialized or has gone away.
    #[error("Session unavailable: {0}")]
    Unavailable(String),

    /// A single element became invalid between listing and reading it.
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// A UI element did not become ready in time.
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl SessionError {
    /// Whether the error only affects a single element and the caller may
    /// carry on with the rest of the snapshot.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionError::StaleElement(_))
    }
}
