//! Conversion of GitHub-rendered HTML bodies into Slack mrkdwn.
//!
//! GitHub's `*.html+json` media types return markdown bodies rendered to
//! HTML. Slack wants its own mrkdwn dialect, so the supported subset
//! (bold, italic, strikethrough, inline code, code blocks, links) is
//! rewritten and every other tag is stripped. The first embedded image is
//! pulled out separately so it can become the attachment image.

use regex::Regex;

/// Result of converting an HTML body.
#[derive(Debug, Default, PartialEq)]
pub struct Mrkdwn {
    pub text: String,
    pub image: Option<String>,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern")
}

pub fn from_html(html: &str) -> Mrkdwn {
    let img = re(r#"(?s)<img[^>]*?\bsrc\s*=\s*"([^"]*)"[^>]*?>"#);
    let image = img.captures(html).map(|c| c[1].to_string());
    let text = img.replace_all(html, "");

    // fenced blocks first, so their contents survive the inline passes
    let text = re(r#"(?s)<pre[^>]*>\s*(?:<code[^>]*>)?(.*?)(?:</code>)?\s*</pre>"#)
        .replace_all(&text, "```\n$1\n```");

    let text = re(r#"(?s)<(?:strong|b)>(.*?)</(?:strong|b)>"#).replace_all(&text, "*$1*");
    let text = re(r#"(?s)<(?:em|i)>(.*?)</(?:em|i)>"#).replace_all(&text, "_$1_");
    let text = re(r#"(?s)<(?:del|s|strike)>(.*?)</(?:del|s|strike)>"#).replace_all(&text, "~$1~");
    let text = re(r#"(?s)<code[^>]*>(.*?)</code>"#).replace_all(&text, "`$1`");
    let text = re(r#"(?s)<h[1-6][^>]*>(.*?)</h[1-6]>"#).replace_all(&text, "*$1*");
    let text =
        re(r#"(?s)<a[^>]*?\bhref\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).replace_all(&text, "<$1|$2>");
    let text = re(r"<br\s*/?>").replace_all(&text, "\n");
    let text = re(r"<li[^>]*>").replace_all(&text, "• ");
    let text = re(r"(?s)</p>\s*").replace_all(&text, "\n\n");
    let text = re(r"(?s)</li>\s*").replace_all(&text, "\n");
    let text = re(r"(?s)</(?:ul|ol|blockquote|div|table|tr)>\s*").replace_all(&text, "\n");

    // anything left is markup we don't render. The tag-name shape keeps the
    // Slack links produced above (`<url|text>`) out of reach.
    let text = re(r"(?s)</?[a-zA-Z][a-zA-Z0-9]*(\s[^>]*)?/?>\s*").replace_all(&text, "");

    let text = unescape(&text);

    let text = re(r"[ \t]+\n").replace_all(&text, "\n");
    let text = re(r"\n{3,}").replace_all(&text, "\n\n");
    let text = text.trim().to_string();

    Mrkdwn { text, image }
}

/// Collapses a plain-text body for display: line breaks become spaces and
/// runs of spaces shrink to one. Used when the HTML body yields no text.
pub fn collapse_plain(text: &str) -> String {
    let text = re(r"\s*\r?\n\s*").replace_all(text, " ");
    let text = re(r" {2,}").replace_all(&text, " ");
    text.trim().to_string()
}

// Slack parses `&`, `<` and `>` in message text, so those entities must stay
// escaped. Only the entities Slack does not understand are decoded here.
fn unescape(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_inline_markup() {
        let converted = from_html(
            "<p>Some <strong>bold</strong>, <em>italic</em>, <del>gone</del> and <code>inline</code></p>",
        );

        assert_eq!(converted.text, "Some *bold*, _italic_, ~gone~ and `inline`");
        assert_eq!(converted.image, None);
    }

    #[test]
    fn converts_links_to_slack_syntax() {
        let converted = from_html(r#"<p>see <a href="https://example.com/docs">the docs</a></p>"#);
        assert_eq!(converted.text, "see <https://example.com/docs|the docs>");
    }

    #[test]
    fn extracts_the_leading_image() {
        let converted = from_html(
            r#"<p><img src="https://example.com/shot.png" alt="screenshot"></p><p>description</p>"#,
        );

        assert_eq!(converted.image.as_deref(), Some("https://example.com/shot.png"));
        assert_eq!(converted.text, "description");
    }

    #[test]
    fn converts_code_blocks() {
        let converted = from_html("<pre><code>let x = 1;\nlet y = 2;</code></pre>");
        assert_eq!(converted.text, "```\nlet x = 1;\nlet y = 2;\n```");
    }

    #[test]
    fn converts_headings_and_lists() {
        let converted =
            from_html("<h2>Changes</h2>\n<ul>\n<li>first</li>\n<li>second</li>\n</ul>");
        assert_eq!(converted.text, "*Changes*\n• first\n• second");
    }

    #[test]
    fn keeps_slack_significant_entities_escaped() {
        let converted = from_html("<p>a &quot;b&#39;s&quot; &amp; c &lt;d&gt;</p>");
        assert_eq!(converted.text, "a \"b's\" &amp; c &lt;d&gt;");
    }

    #[test]
    fn empty_html_yields_no_text() {
        assert_eq!(from_html(""), Mrkdwn::default());
        assert_eq!(from_html("<p></p>").text, "");
    }

    #[test]
    fn collapses_plain_text() {
        assert_eq!(
            collapse_plain("line one\nline  two\r\n\r\nline three"),
            "line one line two line three"
        );
    }
}
