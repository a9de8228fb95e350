//! Node model.
//!
//! Nodes built by this crate live in a [`Document`](crate::Document) arena and
//! are addressed by [`NodeId`]. Trees produced elsewhere are represented by the
//! owned [`Node`] value and are deep-imported into a document when appended.

/// Slab key of a node inside its owning [`Document`](crate::Document).
///
/// Ids are only meaningful together with the document that minted them, and
/// may be reused once the node they named has been reclaimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Payload of an arena node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Tag plus attributes in insertion order.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// Text, always escaped on output.
    Text(String),
    /// Script or style source, written verbatim.
    RawText(String),
    /// Comment adopted from a foreign tree.
    Comment(String),
    /// Placeholder for unescaped HTML kept in the document's raw store.
    RawMarker(u64),
}

/// Arena slot: payload plus tree links.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Scripts waiting to become next siblings once this (void) element is attached.
    pub(crate) pending_scripts: Vec<NodeId>,
    /// Live `Element` handles pointing at this node.
    pub(crate) handles: usize,
    /// Live handles pointing anywhere in this subtree, `handles` included.
    pub(crate) tree_handles: usize,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            pending_scripts: Vec::new(),
            handles: 0,
            tree_handles: 0,
        }
    }

    /// Tag name if this is an element.
    pub(crate) fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// Owned node tree produced outside of any document.
///
/// Appending a `Node` to an [`Element`](crate::Element) deep-imports it into
/// the element's document. Use it to adopt content from another tree source.
///
/// # Example
///
/// ```
/// use elem::{Node, div};
///
/// let badge = Node::element("b")
///     .with_attr("class", "badge")
///     .with_child(Node::text("new"));
/// let html = div().append(badge).to_html();
/// assert_eq!(html, r#"<div><b class="badge">new</b></div>"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Element with attributes (insertion order) and children.
    Element {
        /// Tag name.
        tag: String,
        /// Attribute name/value pairs; names are unique.
        attrs: Vec<(String, String)>,
        /// Child nodes in document order.
        children: Vec<Node>,
    },
    /// Text content, escaped on output.
    Text(String),
    /// Comment content.
    Comment(String),
}

impl Node {
    /// Create an empty element node.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Create a comment node.
    #[must_use]
    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment(content.into())
    }

    /// Set an attribute, overwriting any previous value. No-op for non-elements.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            upsert_attr(attrs, name.into(), value.into());
        }
        self
    }

    /// Append a child. No-op for non-elements.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }
}

/// Insert or overwrite an attribute, keeping the original position on overwrite.
pub(crate) fn upsert_attr(attrs: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(slot) = attrs.iter_mut().find(|(existing, _)| *existing == name) {
        slot.1 = value;
    } else {
        attrs.push((name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_attr_appends_new_names() {
        let mut attrs = Vec::new();
        upsert_attr(&mut attrs, "id".to_owned(), "a".to_owned());
        upsert_attr(&mut attrs, "class".to_owned(), "b".to_owned());
        assert_eq!(
            attrs,
            vec![
                ("id".to_owned(), "a".to_owned()),
                ("class".to_owned(), "b".to_owned())
            ]
        );
    }

    #[test]
    fn test_upsert_attr_overwrites_in_place() {
        let mut attrs = Vec::new();
        upsert_attr(&mut attrs, "id".to_owned(), "a".to_owned());
        upsert_attr(&mut attrs, "class".to_owned(), "b".to_owned());
        upsert_attr(&mut attrs, "id".to_owned(), "c".to_owned());
        assert_eq!(attrs[0], ("id".to_owned(), "c".to_owned()));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_node_builders() {
        let node = Node::element("a")
            .with_attr("href", "/")
            .with_attr("href", "/home")
            .with_child(Node::text("Home"));

        assert_eq!(
            node,
            Node::Element {
                tag: "a".to_owned(),
                attrs: vec![("href".to_owned(), "/home".to_owned())],
                children: vec![Node::Text("Home".to_owned())],
            }
        );
    }

    #[test]
    fn test_with_child_on_text_is_noop() {
        let node = Node::text("x").with_child(Node::text("y")).with_attr("a", "b");
        assert_eq!(node, Node::Text("x".to_owned()));
    }

    #[test]
    fn test_node_data_tag() {
        let data = NodeData::new(NodeKind::Element {
            tag: "div".to_owned(),
            attrs: Vec::new(),
        });
        assert_eq!(data.tag(), Some("div"));
        assert_eq!(NodeData::new(NodeKind::Text("x".to_owned())).tag(), None);
    }
}
