//! Prompt matching.
//!
//! Midjourney echoes the prompt back in its result messages, but Discord
//! rewrites any URL in it (link previews, `<...>` wrapping, shortened CDN
//! links). URLs are therefore replaced by a placeholder on both sides before
//! the substring check. Nothing else is normalized.

use std::sync::LazyLock;

use regex::Regex;

const URL_PLACEHOLDER: &str = "<URL>";

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<?https?://[^\s]+>?").expect("url pattern is valid"));

/// Lower-case `text` and replace every URL with a placeholder.
pub fn normalize(text: &str) -> String {
    URL_PATTERN
        .replace_all(&text.to_lowercase(), URL_PLACEHOLDER)
        .into_owned()
}

/// Whether `message_content` contains `prompt`, ignoring case and URL differences.
///
/// An empty prompt matches every message.
pub fn matches(prompt: &str, message_content: &str) -> bool {
    normalize(message_content).contains(&normalize(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_substring() {
        assert!(matches("a cat", "**a cat** - @alice (fast)"));
        assert!(!matches("a dog", "**a cat** - @alice (fast)"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("A Cat On A Mat", "**a cat on a mat** - @alice (relaxed)"));
        assert!(matches("a cat", "**A CAT** - @alice"));
    }

    #[test]
    fn test_urls_are_wildcards() {
        assert!(matches(
            "a cat https://x.com/a",
            "a cat <https://x.com/b> - @alice ("
        ));
        assert!(matches(
            "https://s.mj.run/abc a cat",
            "**<https://s.mj.run/zzz> a cat** - @alice (fast)"
        ));
    }

    #[test]
    fn test_url_replacement_invariance() {
        let contents = [
            "a cat http://example.com/one.png --ar 16:9 - @bob (fast)",
            "a cat <https://cdn.discordapp.com/attachments/1/2/x.png?ex=1> --ar 16:9 - @bob (fast)",
            "a cat https://s.mj.run/q --ar 16:9 - @bob (fast)",
        ];
        let prompts = [
            "a cat https://i.imgur.com/cat.jpg --ar 16:9",
            "a cat <http://localhost:8080/cat> --ar 16:9",
        ];
        for prompt in prompts {
            for content in contents {
                assert!(matches(prompt, content), "{prompt:?} vs {content:?}");
            }
        }
    }

    #[test]
    fn test_no_whitespace_normalization() {
        assert!(!matches("a  cat", "a cat - @alice ("));
        assert!(!matches("a cat.", "a cat - @alice ("));
    }

    #[test]
    fn test_url_does_not_match_plain_text() {
        assert!(!matches("a cat https://x.com/a", "a cat plain words - @alice ("));
    }

    #[test]
    fn test_empty_prompt_matches_everything() {
        assert!(matches("", "anything at all"));
        assert!(matches("", ""));
    }

    #[test]
    fn test_prompt_longer_than_content() {
        assert!(!matches("a cat wearing a hat", "a cat"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("See <HTTPS://X.COM/A> Now"), "see <URL> now");
        assert_eq!(normalize("two http://a.b c https://d.e"), "two <URL> c <URL>");
        assert_eq!(normalize("no links"), "no links");
    }
}
