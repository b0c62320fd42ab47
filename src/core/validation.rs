//! Link classification for incoming messages
//!
//! This is pattern matching, not URL parsing: a message is accepted when it
//! contains one of the known domain fragments. Shortened or redirecting links
//! outside those fragments are rejected, and a fragment that appears in
//! unrelated text is accepted. Both are known limitations.

use thiserror::Error;

/// Domain fragments the bot accepts
pub const SUPPORTED_FRAGMENTS: &[&str] = &["youtube.com", "youtu.be"];

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text does not contain a supported domain fragment
    #[error("not a supported video link: {0}")]
    UnsupportedLink(String),
}

/// Returns true when the text contains a supported domain fragment.
///
/// # Examples
/// ```
/// use tubegrab::core::validation::is_supported_link;
///
/// assert!(is_supported_link("https://youtu.be/dQw4w9WgXcQ"));
/// assert!(is_supported_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(!is_supported_link("hello"));
/// ```
pub fn is_supported_link(text: &str) -> bool {
    SUPPORTED_FRAGMENTS.iter().any(|fragment| text.contains(fragment))
}

/// Classifies the message and picks the link to hand to the extractor.
///
/// The first whitespace-separated token carrying a fragment wins, so
/// "look at https://youtu.be/x" yields just the link.
pub fn extract_link(text: &str) -> Result<String, ValidationError> {
    if !is_supported_link(text) {
        return Err(ValidationError::UnsupportedLink(text.chars().take(64).collect()));
    }

    let link = text
        .split_whitespace()
        .find(|token| is_supported_link(token))
        .unwrap_or_else(|| text.trim());

    Ok(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_text_without_fragments() {
        for text in ["hello", "", "https://vimeo.com/123", "youtube", "youtu. be", "https://example.com/watch?v=1"] {
            assert!(!is_supported_link(text), "{:?} should be rejected", text);
            assert!(extract_link(text).is_err());
        }
    }

    /// Random text over `alphabet`, up to `max_len` characters
    fn random_text(alphabet: &[u8], max_len: u8) -> String {
        let len = rand::random::<u8>() % max_len;
        (0..len)
            .map(|_| char::from(alphabet[usize::from(rand::random::<u8>()) % alphabet.len()]))
            .collect()
    }

    fn contains_fragment(text: &str) -> bool {
        text.contains("youtube.com") || text.contains("youtu.be")
    }

    #[test]
    fn test_random_ascii_without_fragments_is_rejected() {
        let printable: Vec<u8> = (0x20..0x7f).collect();
        let mut checked = 0;
        while checked < 5_000 {
            let text = random_text(&printable, 120);
            if contains_fragment(&text) {
                continue;
            }
            assert!(!is_supported_link(&text), "{:?} should be rejected", text);
            assert!(extract_link(&text).is_err(), "{:?} should be rejected", text);
            checked += 1;
        }
    }

    #[test]
    fn test_near_miss_text_matches_fragment_presence() {
        // Letters of the fragments only, so near misses like "youtu.b" and
        // "yotube.com" come up constantly
        let alphabet = b"youtbe.cm/ ";
        for _ in 0..5_000 {
            let text = random_text(alphabet, 40);
            assert_eq!(is_supported_link(&text), contains_fragment(&text), "{:?}", text);
            assert_eq!(extract_link(&text).is_ok(), contains_fragment(&text), "{:?}", text);
        }
    }

    #[test]
    fn test_fragment_anywhere_in_random_text_is_accepted() {
        let printable: Vec<u8> = (0x20..0x7f).collect();
        for fragment in SUPPORTED_FRAGMENTS {
            for _ in 0..500 {
                let text = format!("{}{}{}", random_text(&printable, 60), fragment, random_text(&printable, 60));
                assert!(is_supported_link(&text), "{:?}", text);
                assert!(contains_fragment(&extract_link(&text).unwrap()), "{:?}", text);
            }
        }
    }

    #[test]
    fn test_accepts_both_fragments() {
        assert!(is_supported_link("https://youtu.be/abc123"));
        assert!(is_supported_link("https://m.youtube.com/watch?v=abc123"));
        assert!(is_supported_link("music.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn test_substring_false_positive_is_accepted() {
        // Known limitation: fragment inside unrelated text still classifies as a link
        assert!(is_supported_link("I don't like youtube.com much"));
    }

    #[test]
    fn test_extract_link_picks_token() {
        assert_eq!(
            extract_link("watch this https://youtu.be/abc123 now").unwrap(),
            "https://youtu.be/abc123"
        );
        assert_eq!(extract_link("  https://youtu.be/abc123\n").unwrap(), "https://youtu.be/abc123");
    }
}
