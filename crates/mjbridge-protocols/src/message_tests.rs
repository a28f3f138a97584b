use super::*;

#[test]
fn test_chat_message_new() {
    let msg = ChatMessage::new("chat-messages-1", "a cat - @alice (fast)");
    assert_eq!(msg.id, "chat-messages-1");
    assert_eq!(msg.content, "a cat - @alice (fast)");
    assert!(msg.images.is_empty());
    assert!(!msg.has_images());
}

#[test]
fn test_chat_message_with_image() {
    let msg = ChatMessage::new("1", "x")
        .with_image("https://cdn.example.com/a.png")
        .with_image("https://cdn.example.com/b.png");
    assert!(msg.has_images());
    assert_eq!(msg.images.len(), 2);
    assert_eq!(msg.images[0], "https://cdn.example.com/a.png");
}

#[test]
fn test_single_image() {
    let none = ChatMessage::new("1", "x");
    assert!(none.single_image().is_none());

    let one = ChatMessage::new("1", "x").with_image("https://cdn.example.com/a.png");
    assert_eq!(one.single_image(), Some("https://cdn.example.com/a.png"));

    let two = one.clone().with_image("https://cdn.example.com/b.png");
    assert!(two.single_image().is_none());
}

#[test]
fn test_chat_message_deserialize_without_images() {
    let json = r#"{"id":"42","content":"hello"}"#;
    let msg: ChatMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.id, "42");
    assert!(msg.images.is_empty());
}

#[test]
fn test_chat_message_deserialize_with_images() {
    let json = r#"{"id":"42","content":"hello","images":["https://x/y.png"]}"#;
    let msg: ChatMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.images, vec!["https://x/y.png".to_string()]);
}

#[test]
fn test_image_kind_display() {
    assert_eq!(ImageKind::Upscale.to_string(), "upscale");
    assert_eq!(ImageKind::Grid.to_string(), "grid");
}

#[test]
fn test_image_kind_serialization() {
    assert_eq!(
        serde_json::to_string(&ImageKind::Upscale).unwrap(),
        r#""UPSCALE""#
    );
    let kind: ImageKind = serde_json::from_str(r#""GRID""#).unwrap();
    assert_eq!(kind, ImageKind::Grid);
}
