//! Element builder.
//!
//! An [`Element`] is a handle to one element node inside a [`Document`].
//! Mutators take `&self` and hand back a handle to the same node, so calls
//! chain on temporaries as well as on borrowed elements:
//!
//! ```
//! use elem::div;
//!
//! let card = div().id("card").class("card shadow");
//! card.class("card rounded").attr("data-kind", "info");
//! assert_eq!(card.get_attr("class"), "card shadow rounded");
//! ```

use std::fmt;

use crate::document::Document;
use crate::error::ElemError;
use crate::node::{NodeId, NodeKind, upsert_attr};
use crate::pretty::{PrettyConfig, indent_html};
use crate::raw::substitute_markers;
use crate::scope::current_scope;
use crate::serialize::{DOCTYPE, is_void, serialize_node};

/// Handle to an element node.
///
/// Cloning yields another handle to the same node, not a copy of the subtree.
/// A detached tree is reclaimed when the last handle into it is dropped.
pub struct Element {
    doc: Document,
    node: NodeId,
}

impl Element {
    /// Create an element in the active scope.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        current_scope().create_element(tag)
    }

    /// Create an element in the active scope with a single text child.
    ///
    /// An empty `text` adds no child.
    #[must_use]
    pub fn with_text(tag: impl Into<String>, text: &str) -> Self {
        let element = Self::new(tag);
        if !text.is_empty() {
            element.push_text(text.to_owned());
        }
        element
    }

    /// Create an element in an explicit document.
    #[must_use]
    pub fn new_in(doc: &Document, tag: impl Into<String>) -> Self {
        doc.create_element(tag)
    }

    pub(crate) fn from_parts(doc: Document, node: NodeId) -> Self {
        doc.borrow_mut().retain(node);
        Self { doc, node }
    }

    /// Document owning this element.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub(crate) fn node_id(&self) -> NodeId {
        self.node
    }

    /// Tag name as given at construction.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.doc
            .borrow()
            .node(self.node)
            .tag()
            .unwrap_or_default()
            .to_owned()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.doc.borrow().node(self.node).children.len()
    }

    /// Parent element, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Element> {
        let parent = self.doc.borrow().node(self.node).parent?;
        Some(Self::from_parts(self.doc.clone(), parent))
    }

    /// Whether both handles point at the same node.
    #[must_use]
    pub fn same_node(&self, other: &Element) -> bool {
        self.doc.ptr_eq(&other.doc) && self.node == other.node
    }

    /// Set an attribute, overwriting any previous value.
    pub fn attr(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(attrs) = self.doc.borrow_mut().attrs_mut(self.node) {
            upsert_attr(attrs, name.into(), value.into());
        }
        self.clone()
    }

    /// Current attribute value, or an empty string when unset.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> String {
        self.doc
            .borrow()
            .attrs(self.node)
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Whether the attribute is set (possibly to an empty value).
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.doc
            .borrow()
            .attrs(self.node)
            .iter()
            .any(|(existing, _)| existing == name)
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&self, name: &str) -> Self {
        if let Some(attrs) = self.doc.borrow_mut().attrs_mut(self.node) {
            attrs.retain(|(existing, _)| existing != name);
        }
        self.clone()
    }

    /// Set the `id` attribute.
    pub fn id(&self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Merge space-separated class names into the `class` attribute.
    pub fn class(&self, classes: &str) -> Self {
        self.add_classes(classes.split_whitespace())
    }

    /// Merge class tokens into the `class` attribute.
    ///
    /// Tokens keep their first-seen order and appear once. Empty tokens are
    /// dropped; the attribute is only written when at least one token exists.
    pub fn add_classes<I, S>(&self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = self
            .get_attr("class")
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        for class in classes {
            for token in class.as_ref().split_whitespace() {
                if !tokens.iter().any(|existing| existing == token) {
                    tokens.push(token.to_owned());
                }
            }
        }

        if tokens.is_empty() {
            return self.clone();
        }
        self.attr("class", tokens.join(" "))
    }

    /// Set the inline `style` attribute.
    pub fn style(&self, css: impl Into<String>) -> Self {
        self.attr("style", css)
    }

    /// Set a `data-{name}` attribute.
    pub fn data(&self, name: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{name}"), value)
    }

    /// Attach an inline script that sees this element as `el`.
    ///
    /// The code is wrapped in a block that looks the element up by id, so the
    /// element must have a non-empty `id`. Void elements cannot hold children:
    /// the script becomes their next sibling, immediately if the element is
    /// already attached, otherwise as soon as it is appended somewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ElemError::MissingId`] when the element has no `id`.
    ///
    /// # Example
    ///
    /// ```
    /// use elem::{form, input};
    ///
    /// let field = input("text").id("x").attach_script("el.focus();")?;
    /// let html = form("/go").append(field).to_html();
    /// assert!(html.contains(r#"<input type="text" id="x"><script>"#));
    /// assert!(html.contains("getElementById('x')"));
    /// # Ok::<(), elem::ElemError>(())
    /// ```
    pub fn attach_script(&self, code: &str) -> Result<Self, ElemError> {
        let id = self.get_attr("id");
        if id.is_empty() {
            return Err(ElemError::MissingId {
                tag: self.tag_name(),
            });
        }

        let wrapped = format!(
            "{{ const el = document.getElementById('{}'); {code} }}",
            escape_js_single_quoted(&id)
        );

        {
            let mut doc = self.doc.borrow_mut();
            let script = doc.alloc(NodeKind::Element {
                tag: "script".to_owned(),
                attrs: Vec::new(),
            });
            let body = doc.alloc(NodeKind::RawText(wrapped));
            doc.append_child(script, body);

            let tag = doc.node(self.node).tag().unwrap_or_default().to_owned();
            if !is_void(&tag) {
                doc.append_child(self.node, script);
            } else if !doc.insert_after(self.node, script) {
                doc.node_mut(self.node).pending_scripts.push(script);
            }
        }
        Ok(self.clone())
    }

    /// Run `f` on this element and return it.
    pub fn tap(&self, f: impl FnOnce(&Element)) -> Self {
        f(self);
        self.clone()
    }

    /// Run `f` on this element only when `condition` holds.
    pub fn when(&self, condition: bool, f: impl FnOnce(&Element)) -> Self {
        if condition {
            f(self);
        }
        self.clone()
    }

    /// Serialize without formatting.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_html_with(false, &PrettyConfig::default())
    }

    /// Serialize with default pretty formatting.
    #[must_use]
    pub fn to_pretty_html(&self) -> String {
        self.to_html_with(true, &PrettyConfig::default())
    }

    /// Serialize, optionally pretty-printed with `config`.
    ///
    /// A root `html` element is preceded by `<!DOCTYPE html>`. Serialization
    /// does not modify the tree and can be repeated.
    #[must_use]
    pub fn to_html_with(&self, pretty: bool, config: &PrettyConfig) -> String {
        let doc = self.doc.borrow();
        let flat = serialize_node(&doc, self.node);
        let body = if pretty {
            indent_html(&flat, config)
        } else {
            flat
        };

        let is_document = matches!(
            &doc.node(self.node).kind,
            NodeKind::Element { tag, .. } if tag.eq_ignore_ascii_case("html")
        );
        let html = substitute_markers(&body, &doc.raw);
        if is_document {
            format!("{DOCTYPE}{html}")
        } else {
            html.into_owned()
        }
    }

    /// Append a text node without any filtering.
    pub(crate) fn push_text(&self, text: String) {
        self.push_kind(NodeKind::Text(text));
    }

    /// Append source text that is serialized unescaped.
    pub(crate) fn push_raw_text(&self, code: String) {
        self.push_kind(NodeKind::RawText(code));
    }

    fn push_kind(&self, kind: NodeKind) {
        let mut doc = self.doc.borrow_mut();
        let child = doc.alloc(kind);
        doc.append_child(self.node, child);
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self::from_parts(self.doc.clone(), self.node)
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // Skipped while the document is borrowed; the tree then lives as long as the document.
        if let Some(mut doc) = self.doc.try_borrow_mut() {
            doc.release(self.node);
        }
    }
}

/// Escape a value for use inside a single-quoted JavaScript string.
fn escape_js_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

impl fmt::Display for Element {
    /// `{}` writes flat HTML, `{:#}` pretty HTML.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html_with(f.alternate(), &PrettyConfig::default()))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name())
            .field("document", &self.doc.id())
            .field("node", &self.node)
            .finish()
    }
}
