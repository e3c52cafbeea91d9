//! Scraped page cleanup before chunking

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Markdown images served from Facebook's CDN
static CDN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*?\]\(https://scontent[^)]*\)").expect("valid image pattern")
});

static EXTRA_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*){2,}").expect("valid blank line pattern"));

/// Strip CDN image links and squeeze runs of blank lines
///
/// Image links carry no ad data but take up a large share of each chunk.
pub fn clean_scraped_text(text: &str) -> Cow<'_, str> {
    let without_images = CDN_IMAGE.replace_all(text, "");
    let squeezed = match EXTRA_BLANK_LINES.replace_all(&without_images, "\n\n") {
        Cow::Borrowed(_) => None,
        Cow::Owned(squeezed) => Some(squeezed),
    };
    squeezed.map_or(without_images, Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_cdn_images() {
        let text = "Shop A ![ad image](https://scontent.fdac1-1.fna.fbcdn.net/v/t39.jpg?x=1) Library ID: 1";
        assert_eq!(clean_scraped_text(text), "Shop A  Library ID: 1");
    }

    #[test]
    fn test_keeps_other_images() {
        let text = "![logo](https://example.com/logo.png)";
        assert_eq!(clean_scraped_text(text), text);
    }

    #[test]
    fn test_squeezes_blank_lines() {
        assert_eq!(clean_scraped_text("a\n\n \n\nb"), "a\n\nb");
        assert_eq!(clean_scraped_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_clean_text_is_borrowed() {
        assert!(matches!(clean_scraped_text("nothing to do"), Cow::Borrowed(_)));
    }
}
