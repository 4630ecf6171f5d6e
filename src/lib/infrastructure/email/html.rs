//! Plain text fallback for HTML bodies

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap();
}

/// Removes markup and comments, leaving text and entities untouched.
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_keeps_text() {
        assert_eq!(
            strip_tags("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
    }

    #[test]
    fn test_strip_tags_removes_comments_across_lines() {
        assert_eq!(strip_tags("a<!-- one\ntwo -->b<br/>c"), "abc");
    }

    #[test]
    fn test_strip_tags_leaves_entities() {
        assert_eq!(strip_tags("<b>Fish &amp; chips</b>"), "Fish &amp; chips");
    }
}
