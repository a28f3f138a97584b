//! Discord credentials used by the session bootstrap.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login and channel coordinates for the Midjourney channel.
///
/// All values are opaque strings; how they are loaded is up to the caller.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub server_id: String,
    pub channel_id: String,
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        server_id: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            server_id: server_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Path of the channel page, relative to the Discord origin.
    pub fn channel_path(&self) -> String {
        format!("/channels/{}/{}", self.server_id, self.channel_id)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_path() {
        let creds = Credentials::new("a@b.c", "pw", "111", "222");
        assert_eq!(creds.channel_path(), "/channels/111/222");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("a@b.c", "hunter2", "111", "222");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.c"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_default_is_empty() {
        let creds = Credentials::default();
        assert!(creds.email.is_empty());
        assert!(creds.channel_id.is_empty());
    }
}
