//! Discord DOM selectors.

/// Every selector the session relies on.
///
/// Discord hashes its class names (`messageListItem-3Xt8Q`), so most entries
/// match on a class prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordSelectors {
    /// One rendered chat message.
    pub message_item: String,
    /// Text node of a message, relative to `message_item`.
    pub message_content: String,
    /// Attachment link of a message, relative to `message_item`.
    pub image_link: String,
    /// Composer wrapper; present once the channel is usable.
    pub channel_text_area: String,
    /// Editable element inside the composer.
    pub message_input: String,
    /// Slash command suggestion heading.
    pub autocomplete_heading: String,
    pub email_input: String,
    pub password_input: String,
    /// Button text of the "open in app" interstitial.
    pub continue_button_text: String,
    /// Button text of dismissable modals.
    pub close_button_text: String,
}

impl Default for DiscordSelectors {
    fn default() -> Self {
        Self {
            message_item: r#"li[class*="messageListItem-"]"#.to_string(),
            message_content: r#"div[class*="messageContent-"]"#.to_string(),
            image_link: r#"a[class*="originalLink-"]"#.to_string(),
            channel_text_area: r#"div[class*="channelTextArea-"]"#.to_string(),
            message_input: r#"div[class*="channelTextArea-"] [role="textbox"]"#.to_string(),
            autocomplete_heading: r#"div[class*="autocompleteRowHeading-"]"#.to_string(),
            email_input: r#"input[name="email"]"#.to_string(),
            password_input: r#"input[name="password"]"#.to_string(),
            continue_button_text: "Continue in Browser".to_string(),
            close_button_text: "Close".to_string(),
        }
    }
}
