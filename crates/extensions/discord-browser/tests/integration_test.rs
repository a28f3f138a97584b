//! Integration tests against a real Chrome.
//!
//! These tests launch Chrome and are ignored by default.
//! Run with: cargo test -p mjbridge-discord-browser --test integration_test -- --ignored

use std::time::Duration;

use mjbridge_discord_browser::{BrowserSession, ChromeLauncher, DiscordSession, Key, LaunchConfig};
use mjbridge_protocols::MessageSource;

const CHANNEL_FIXTURE: &str = r#"<html><body>
<ol>
  <li class="messageListItem-a1" id="chat-messages-1">
    <div class="messageContent-b2">just chatting</div>
  </li>
  <li class="messageListItem-a1" id="chat-messages-2">
    <div class="messageContent-b2">**a red fox** - Image #1 &lt;@42&gt;</div>
    <a class="originalLink-c3" href="https://cdn.example/fox.png"></a>
  </li>
  <li class="messageListItem-a1">
    <div class="messageContent-b2">no id</div>
  </li>
</ol>
<div class="channelTextArea-d4"><div role="textbox" contenteditable="true"></div></div>
</body></html>"#;

/// Each test gets its own port and profile so they can run in parallel.
fn test_config(debug_port: u16) -> LaunchConfig {
    LaunchConfig {
        debug_port,
        profile_dir: Some(std::env::temp_dir().join(format!("mjbridge-test-profile-{}", debug_port))),
        headless: true,
        startup_timeout: Duration::from_secs(15),
        ..Default::default()
    }
}

fn data_url(html: &str) -> String {
    format!(
        "data:text/html,{}",
        html.replace('%', "%25").replace('#', "%23")
    )
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_chrome_detection() {
    let chrome_path = ChromeLauncher::find_chrome();
    assert!(chrome_path.is_some(), "Chrome should be installed on the system");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_extracts_rendered_messages() {
    let browser = BrowserSession::acquire(test_config(9333), "example.invalid")
        .await
        .expect("acquire browser");
    browser
        .page()
        .navigate(&data_url(CHANNEL_FIXTURE), Duration::from_secs(10))
        .await
        .expect("navigate");

    let session = DiscordSession::new(browser, Duration::from_secs(5));
    let messages = session.list_visible_messages().await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, "chat-messages-1");
    assert!(!messages[0].has_images());
    assert_eq!(messages[1].single_image(), Some("https://cdn.example/fox.png"));
    assert!(messages[1].content.contains("Image #1"));

    session.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_typing_into_focused_input() {
    let browser = BrowserSession::acquire(test_config(9334), "example.invalid")
        .await
        .expect("acquire browser");
    let page = browser.page();
    page.navigate(
        &data_url(r#"<input name="email"><script>document.querySelector('input').addEventListener('keydown', (e) => { if (e.key === 'Enter') document.title = 'submitted'; });</script>"#),
        Duration::from_secs(10),
    )
    .await
    .unwrap();

    page.focus(r#"input[name="email"]"#).await.unwrap();
    page.type_text("someone@example.com").await.unwrap();
    page.press_key(Key::Enter).await.unwrap();

    let value = page
        .evaluate("document.querySelector('input').value")
        .await
        .unwrap();
    assert_eq!(value, "someone@example.com");
    let title = page.evaluate("document.title").await.unwrap();
    assert_eq!(title, "submitted");

    browser.close().await.unwrap();
}
