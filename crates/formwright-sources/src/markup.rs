//! Markup stripping for fetched pages and local HTML files

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>")
        .expect("valid regex")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Strip markup and collapse whitespace into single spaces
///
/// Script, style and comment bodies are dropped entirely; tags are replaced
/// by a space so adjacent cells do not run together.
pub fn strip_markup(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE.replace_all(html, " ");
    let without_comments = COMMENT.replace_all(&without_scripts, " ");
    let text = TAG.replace_all(&without_comments, " ");
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_collapses() {
        let html = "<html><body><h1>Case  Number:</h1>\n<p>24STFL00615</p></body></html>";
        assert_eq!(strip_markup(html), "Case Number: 24STFL00615");
    }

    #[test]
    fn test_drops_script_and_style() {
        let html = "<style>p { color: red }</style><p>Name: Jane</p><script>var x = 1;</script>";
        assert_eq!(strip_markup(html), "Name: Jane");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(strip_markup("<p>Smith &amp; Jones &lt;LLP&gt;</p>"), "Smith & Jones <LLP>");
    }
}
