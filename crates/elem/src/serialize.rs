//! Flat HTML serialization of an arena subtree.

use std::fmt::Write;

use crate::document::DocumentInner;
use crate::node::{NodeId, NodeKind};
use crate::raw::defuse_markers;

/// Tags that never have children or a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Prefix written before a root `html` element.
pub(crate) const DOCTYPE: &str = "<!DOCTYPE html>\n";

/// Whether `tag` is a void element.
#[must_use]
pub fn is_void(tag: &str) -> bool {
    VOID_TAGS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Escape HTML special characters for text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serialize `node` and its descendants, leaving raw markers as tokens.
pub(crate) fn serialize_node(doc: &DocumentInner, node: NodeId) -> String {
    let mut out = String::with_capacity(256);
    write_node(doc, node, &mut out);
    tracing::trace!(bytes = out.len(), "Serialized subtree");
    out
}

fn write_node(doc: &DocumentInner, node: NodeId, out: &mut String) {
    let data = doc.node(node);
    match &data.kind {
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
            }
            out.push('>');

            if is_void(tag) {
                return;
            }

            for &child in &data.children {
                write_node(doc, child, out);
            }
            write!(out, "</{tag}>").unwrap();
        }
        NodeKind::Text(text) => out.push_str(&escape_html(text)),
        NodeKind::RawText(code) => out.push_str(code),
        NodeKind::Comment(text) => write!(out, "<!--{}-->", defuse_markers(text)).unwrap(),
        NodeKind::RawMarker(id) => out.push_str(&doc.raw.token(*id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use crate::node::Node;

    fn serialize_foreign(node: &Node) -> String {
        let doc = Document::new();
        let id = doc.import_foreign(node);
        serialize_node(&doc.borrow(), id)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
        assert_eq!(escape_html("plain ünïcode"), "plain ünïcode");
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("INPUT"));
        assert!(!is_void("div"));
        assert!(!is_void("script"));
    }

    #[test]
    fn test_serialize_nested_elements() {
        let node = Node::element("ul")
            .with_attr("class", "list")
            .with_child(Node::element("li").with_child(Node::text("one")))
            .with_child(Node::element("li").with_child(Node::text("two")));
        assert_eq!(
            serialize_foreign(&node),
            r#"<ul class="list"><li>one</li><li>two</li></ul>"#
        );
    }

    #[test]
    fn test_serialize_attribute_order_is_insertion_order() {
        let node = Node::element("input")
            .with_attr("type", "text")
            .with_attr("name", "q")
            .with_attr("id", "search");
        assert_eq!(
            serialize_foreign(&node),
            r#"<input type="text" name="q" id="search">"#
        );
    }

    #[test]
    fn test_void_element_children_are_not_emitted() {
        let node = Node::element("br").with_child(Node::text("ignored"));
        assert_eq!(serialize_foreign(&node), "<br>");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let node = Node::element("a").with_attr("title", r#"say "hi" & <bye>"#);
        assert_eq!(
            serialize_foreign(&node),
            r#"<a title="say &quot;hi&quot; &amp; &lt;bye&gt;"></a>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let node = Node::element("p").with_child(Node::text("1 < 2 && 3 > 2"));
        assert_eq!(
            serialize_foreign(&node),
            "<p>1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"
        );
    }

    #[test]
    fn test_raw_text_is_verbatim() {
        let doc = Document::new();
        let script = doc.alloc(NodeKind::Element {
            tag: "script".to_owned(),
            attrs: Vec::new(),
        });
        let code = doc.alloc(NodeKind::RawText("if (a < b && c) { x('y'); }".to_owned()));
        doc.borrow_mut().append_child(script, code);
        assert_eq!(
            serialize_node(&doc.borrow(), script),
            "<script>if (a < b && c) { x('y'); }</script>"
        );
    }

    #[test]
    fn test_text_inside_script_is_escaped() {
        let node = Node::element("script")
            .with_child(Node::text("</script><img src=x onerror=alert(1)>"));
        assert_eq!(
            serialize_foreign(&node),
            "<script>&lt;/script&gt;&lt;img src=x onerror=alert(1)&gt;</script>"
        );
    }

    #[test]
    fn test_comment() {
        let node = Node::element("div").with_child(Node::comment(" note "));
        assert_eq!(serialize_foreign(&node), "<div><!-- note --></div>");
    }

    #[test]
    fn test_comment_cannot_spell_a_marker() {
        let node = Node::element("div").with_child(Node::comment("elem-raw:0123456789abcdef:1"));
        assert_eq!(
            serialize_foreign(&node),
            "<div><!--elem-raw :0123456789abcdef:1--></div>"
        );
    }

    #[test]
    fn test_raw_marker_emits_token() {
        let doc = Document::new();
        let marker = doc.create_raw_marker("<hr>".to_owned());
        let inner = doc.borrow();
        let NodeKind::RawMarker(id) = inner.node(marker).kind else {
            panic!("expected raw marker");
        };
        assert_eq!(serialize_node(&inner, marker), inner.raw.token(id));
    }
}
