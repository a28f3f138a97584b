//! Message snapshot extraction: one script evaluation per poll.

use serde_json::Value;
use tracing::trace;

use mjbridge_protocols::ChatMessage;

use super::DiscordSelectors;

/// Script returning `[{id, content, image}]` for every rendered message.
pub fn extraction_script(selectors: &DiscordSelectors) -> String {
    format!(
        r#"(() => Array.from(document.querySelectorAll({item})).map((li) => {{
    const content = li.querySelector({content});
    const link = li.querySelector({link});
    return {{
        id: li.isConnected && li.id ? li.id : null,
        content: content ? content.innerText : "",
        image: link ? link.href : null,
    }};
}}))()"#,
        item = quote(&selectors.message_item),
        content = quote(&selectors.message_content),
        link = quote(&selectors.image_link),
    )
}

/// Turn the script result into messages, in DOM order.
///
/// Entries without an id are elements that detached mid-read and are
/// skipped. A non-array value yields no messages.
pub fn parse_snapshot(value: Value) -> Vec<ChatMessage> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.get("id").and_then(Value::as_str).filter(|id| !id.is_empty());
            let Some(id) = id else {
                trace!("Skipping message without id");
                return None;
            };
            let content = entry
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let message = ChatMessage::new(id, content);
            match entry.get("image").and_then(Value::as_str) {
                Some(url) if !url.is_empty() => Some(message.with_image(url)),
                _ => Some(message),
            }
        })
        .collect()
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_snapshot_keeps_order_and_images() {
        let messages = parse_snapshot(json!([
            {"id": "chat-messages-1", "content": "hello", "image": null},
            {"id": "chat-messages-2", "content": "**cat** - <@42> (fast)", "image": "https://cdn.example/cat.png"}
        ]));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "chat-messages-1");
        assert!(!messages[0].has_images());
        assert_eq!(messages[1].single_image(), Some("https://cdn.example/cat.png"));
    }

    #[test]
    fn test_parse_snapshot_skips_detached() {
        let messages = parse_snapshot(json!([
            {"id": null, "content": "gone", "image": null},
            {"id": "", "content": "also gone"},
            {"id": "chat-messages-3", "content": "kept"}
        ]));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "kept");
    }

    #[test]
    fn test_parse_snapshot_defaults() {
        let messages = parse_snapshot(json!([{"id": "m", "image": ""}]));
        assert_eq!(messages[0].content, "");
        assert!(!messages[0].has_images());
    }

    #[test]
    fn test_parse_snapshot_non_array() {
        assert!(parse_snapshot(Value::Null).is_empty());
        assert!(parse_snapshot(json!({"id": "m"})).is_empty());
    }

    #[test]
    fn test_extraction_script_embeds_selectors() {
        let script = extraction_script(&DiscordSelectors::default());
        assert!(script.contains(r#"querySelectorAll("li[class*=\"messageListItem-\"]")"#));
        assert!(script.contains(r#"querySelector("a[class*=\"originalLink-\"]")"#));
        assert!(script.contains("link.href"));
    }
}
