//! Pretty-printer for serialized HTML.
//!
//! Works on the flat output, not the tree: the string is split into tag and
//! text tokens and re-emitted one token per line, indented by nesting depth.
//! Content of preserve-whitespace tags (`pre`, `code`, `textarea`, `script`)
//! is copied untouched until the matching close tag; nested preserve tags are
//! counted so leaving an inner one does not resume indentation early.

use std::sync::LazyLock;

use regex::Regex;

use crate::serialize::is_void;

/// Tags whose content is never re-indented or trimmed.
const PRESERVE_TAGS: &[&str] = &["pre", "code", "textarea", "script"];

/// Tags whose content is tokenized as a single text run.
const OPAQUE_CONTENT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

/// A whole comment, or else any tag.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]+>").expect("invalid tag regex"));

/// Formatting options for pretty output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrettyConfig {
    /// Whitespace written once per nesting level.
    pub indent: String,
    /// Put simple leaf elements (`<p>text</p>`) on a single line.
    pub collapse_leaves: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_owned(),
            collapse_leaves: true,
        }
    }
}

/// Re-indent flat HTML.
///
/// Pretty-printing is a formatting transform only: tags, attributes and
/// non-whitespace text come out in the same order. Text outside preserve tags
/// is trimmed.
///
/// # Example
///
/// ```
/// use elem::{PrettyConfig, indent_html};
///
/// let pretty = indent_html("<ul><li>a</li><li>b</li></ul>", &PrettyConfig::default());
/// assert_eq!(pretty, "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
/// ```
#[must_use]
pub fn indent_html(html: &str, config: &PrettyConfig) -> String {
    let html = html.trim();
    if html.is_empty() {
        return String::new();
    }

    let tokens = tokenize(html);
    let mut out = String::with_capacity(html.len() * 2);
    let mut depth = 0usize;
    let mut preserving = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        let raw = tokens[index];
        index += 1;

        let token = if preserving == 0 { raw.trim() } else { raw };
        if token.is_empty() {
            continue;
        }

        if let Some(name) = closing_tag_name(token) {
            let was_preserving = preserving > 0;
            if is_preserve(name) {
                preserving = preserving.saturating_sub(1);
            }
            depth = depth.saturating_sub(1);

            if was_preserving {
                out.push_str(token);
                if preserving == 0 {
                    out.push('\n');
                }
            } else {
                push_line(&mut out, config, depth, token);
            }
        } else if let Some(name) = opening_tag_name(token) {
            let self_closing = is_void(name) || token.ends_with("/>");

            if preserving > 0 {
                out.push_str(token);
            } else if self_closing {
                push_line(&mut out, config, depth, token);
                continue;
            } else if is_preserve(name) {
                // No newline: it would become part of the preserved content.
                push_indent(&mut out, config, depth);
                out.push_str(token);
            } else if config.collapse_leaves
                && let Some((text, consumed)) = collapsible_leaf(&tokens[index..], name)
            {
                push_indent(&mut out, config, depth);
                out.push_str(token);
                out.push_str(text);
                out.push_str(tokens[index + consumed - 1].trim());
                out.push('\n');
                index += consumed;
                continue;
            } else {
                push_line(&mut out, config, depth, token);
            }

            if !self_closing {
                depth += 1;
                if is_preserve(name) {
                    preserving += 1;
                }
            }
        } else if preserving > 0 {
            out.push_str(token);
        } else {
            push_line(&mut out, config, depth, token);
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// Split flat HTML into tag and text tokens.
///
/// Content of script, style, textarea and title elements is one token, so a
/// `<` inside inline code is never mistaken for a tag.
fn tokenize(html: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let Some(tag) = TAG_PATTERN.find_at(html, pos) else {
            tokens.push(&html[pos..]);
            break;
        };
        if tag.start() > pos {
            tokens.push(&html[pos..tag.start()]);
        }
        tokens.push(tag.as_str());
        pos = tag.end();

        if let Some(name) = opening_tag_name(tag.as_str())
            && is_opaque(name)
            && !tag.as_str().ends_with("/>")
        {
            let end = find_closing_tag(html, pos, name).unwrap_or(html.len());
            if end > pos {
                tokens.push(&html[pos..end]);
            }
            pos = end;
        }
    }

    tokens
}

/// Byte offset of the next `</name` at or after `from`, case-insensitive.
fn find_closing_tag(html: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{}", name.to_ascii_lowercase());
    html[from..]
        .to_ascii_lowercase()
        .find(&needle)
        .map(|offset| from + offset)
}

/// Look ahead for `[text] </name>` right after an opening tag.
///
/// Returns the trimmed text and how many tokens the leaf spans.
fn collapsible_leaf<'a>(rest: &[&'a str], name: &str) -> Option<(&'a str, usize)> {
    let mut consumed = 0;
    let mut text = "";

    for token in rest {
        consumed += 1;
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(closing) = closing_tag_name(trimmed) {
            return closing.eq_ignore_ascii_case(name).then_some((text, consumed));
        }
        if !text.is_empty() || opening_tag_name(trimmed).is_some() {
            return None;
        }
        text = trimmed;
    }

    None
}

fn opening_tag_name(token: &str) -> Option<&str> {
    tag_name(token.strip_prefix('<')?)
}

fn closing_tag_name(token: &str) -> Option<&str> {
    tag_name(token.strip_prefix("</")?)
}

/// Leading tag-name characters, if any.
fn tag_name(s: &str) -> Option<&str> {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(s.len());
    (end > 0).then(|| &s[..end])
}

fn is_preserve(tag: &str) -> bool {
    PRESERVE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

fn is_opaque(tag: &str) -> bool {
    OPAQUE_CONTENT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

fn push_indent(out: &mut String, config: &PrettyConfig, depth: usize) {
    for _ in 0..depth {
        out.push_str(&config.indent);
    }
}

fn push_line(out: &mut String, config: &PrettyConfig, depth: usize, token: &str) {
    push_indent(out, config, depth);
    out.push_str(token);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pretty(html: &str) -> String {
        indent_html(html, &PrettyConfig::default())
    }

    fn expanded(html: &str) -> String {
        let config = PrettyConfig {
            collapse_leaves: false,
            ..PrettyConfig::default()
        };
        indent_html(html, &config)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pretty(""), "");
        assert_eq!(pretty("   \n "), "");
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            pretty(r#"<div id="app"><ul><li>a</li><li>b</li></ul></div>"#),
            "<div id=\"app\">\n  <ul>\n    <li>a</li>\n    <li>b</li>\n  </ul>\n</div>"
        );
    }

    #[test]
    fn test_without_leaf_collapse() {
        assert_eq!(expanded("<div><p>x</p></div>"), "<div>\n  <p>\n    x\n  </p>\n</div>");
    }

    #[test]
    fn test_empty_element_collapses() {
        assert_eq!(pretty("<div><span></span></div>"), "<div>\n  <span></span>\n</div>");
    }

    #[test]
    fn test_void_tags_do_not_indent() {
        assert_eq!(
            pretty(r#"<form><input type="text"><br><button>Go</button></form>"#),
            "<form>\n  <input type=\"text\">\n  <br>\n  <button>Go</button>\n</form>"
        );
    }

    #[test]
    fn test_self_closing_syntax_does_not_indent() {
        assert_eq!(
            pretty("<svg><path d=\"M0\"/><g></g></svg>"),
            "<svg>\n  <path d=\"M0\"/>\n  <g></g>\n</svg>"
        );
    }

    #[test]
    fn test_mixed_content_is_not_collapsed() {
        assert_eq!(
            pretty("<p>Hello <b>world</b>!</p>"),
            "<p>\n  Hello\n  <b>world</b>\n  !\n</p>"
        );
    }

    #[test]
    fn test_pre_content_is_preserved() {
        let html = "<div><pre>  line 1\n    line 2\n</pre><p>after</p></div>";
        assert_eq!(
            pretty(html),
            "<div>\n  <pre>  line 1\n    line 2\n</pre>\n  <p>after</p>\n</div>"
        );
    }

    #[test]
    fn test_nested_preserve_tags_use_counter() {
        let html = "<div><pre><code>a\n  b</code>\n  tail</pre><p>x</p></div>";
        assert_eq!(
            pretty(html),
            "<div>\n  <pre><code>a\n  b</code>\n  tail</pre>\n  <p>x</p>\n</div>"
        );
    }

    #[test]
    fn test_whitespace_only_text_inside_pre_is_kept() {
        let html = "<pre><b>a</b> <b>b</b></pre>";
        assert_eq!(pretty(html), "<pre><b>a</b> <b>b</b></pre>");
    }

    #[test]
    fn test_script_with_angle_brackets() {
        let html = "<body><script>if (a < b && c > d) { x('</div>'); }</script><p>x</p></body>";
        assert_eq!(
            pretty(html),
            "<body>\n  <script>if (a < b && c > d) { x('</div>'); }</script>\n  <p>x</p>\n</body>"
        );
    }

    #[test]
    fn test_textarea_is_preserved() {
        let html = "<form><textarea name=\"m\">  keep\n me</textarea></form>";
        assert_eq!(
            pretty(html),
            "<form>\n  <textarea name=\"m\">  keep\n me</textarea>\n</form>"
        );
    }

    #[test]
    fn test_style_content_is_one_token() {
        assert_eq!(
            pretty("<head><style>a>b{color:red}</style></head>"),
            "<head>\n  <style>a>b{color:red}</style>\n</head>"
        );
    }

    #[test]
    fn test_comments_and_doctype_are_lines() {
        assert_eq!(
            pretty("<div><!--elem-raw:3--><p>x</p></div>"),
            "<div>\n  <!--elem-raw:3-->\n  <p>x</p>\n</div>"
        );
    }

    #[test]
    fn test_comment_with_angle_bracket_stays_whole() {
        assert_eq!(
            pretty("<div><!-- a > b --><p>x</p></div>"),
            "<div>\n  <!-- a > b -->\n  <p>x</p>\n</div>"
        );
        assert_eq!(tokenize("<!--\n<i>\n-->x"), vec!["<!--\n<i>\n-->", "x"]);
    }

    #[test]
    fn test_custom_indent() {
        let config = PrettyConfig {
            indent: "\t".to_owned(),
            collapse_leaves: true,
        };
        assert_eq!(
            indent_html("<div><div><p>x</p></div></div>", &config),
            "<div>\n\t<div>\n\t\t<p>x</p>\n\t</div>\n</div>"
        );
    }

    #[test]
    fn test_reindenting_pretty_output_is_stable() {
        let flat = r#"<html lang="en"><head><title>T</title></head><body><div id="app" class="container"><h1>Hello</h1><p>World</p></div></body></html>"#;
        let once = pretty(flat);
        assert_eq!(pretty(&once), once);
    }

    #[test]
    fn test_tokenize_keeps_script_body_whole() {
        assert_eq!(
            tokenize("<script>a<b</script>c"),
            vec!["<script>", "a<b", "</script>", "c"]
        );
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(opening_tag_name("<div class=\"x\">"), Some("div"));
        assert_eq!(opening_tag_name("<h1>"), Some("h1"));
        assert_eq!(opening_tag_name("<my-widget>"), Some("my-widget"));
        assert_eq!(opening_tag_name("</div>"), None);
        assert_eq!(opening_tag_name("<!--x-->"), None);
        assert_eq!(closing_tag_name("</div>"), Some("div"));
        assert_eq!(closing_tag_name("<div>"), None);
    }
}
