//! Child inputs and the append algorithm.
//!
//! Everything that can be appended to an [`Element`] converts into a
//! [`Child`]. Appending walks the value left to right, depth first, and turns
//! each leaf into zero or one tree mutations:
//!
//! | Input                          | Effect                                    |
//! |--------------------------------|-------------------------------------------|
//! | `None` / [`Child::Null`]       | nothing                                   |
//! | [`Child::defer`] closure       | called with the parent, result appended   |
//! | [`Element`]                    | attached (imported if from another scope) |
//! | [`RawHtml`]                    | raw marker, unless empty                  |
//! | [`Text`]                       | text node, unless empty                   |
//! | [`Node`]                       | deep-imported and attached                |
//! | `Vec`, arrays, tuples, iters   | each item in order                        |
//! | `String` / `&str`              | text node, always (escaped)               |
//!
//! Plain strings are never interpreted as markup; only [`RawHtml`] is emitted
//! unescaped. Values of other types do not convert and fail to compile.

use std::fmt;

use crate::element::Element;
use crate::node::{Node, NodeId};
use crate::raw::RawHtml;

/// Text that is dropped when empty.
///
/// Plain strings always produce a text node, even when empty. Wrap content in
/// `Text` when an empty value should leave no trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    /// Wrap text content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Wrap text so that an empty value appends nothing.
#[must_use]
pub fn text(content: impl Into<String>) -> Text {
    Text::new(content)
}

/// A value that can be appended to an element.
pub enum Child<'a> {
    /// Contributes nothing.
    Null,
    Element(Element),
    Raw(RawHtml),
    Text(Text),
    Node(Node),
    /// Items appended in order, recursively.
    List(Vec<Child<'a>>),
    /// Plain string, escaped on output.
    Str(String),
    /// Producer called with the parent at append time.
    Deferred(Box<dyn FnOnce(&Element) -> Child<'a> + 'a>),
}

impl<'a> Child<'a> {
    /// Defer building a child until it is appended.
    ///
    /// The closure receives the parent element, which it may also modify.
    ///
    /// ```
    /// use elem::{Child, ul};
    ///
    /// let list = ul().append(Child::defer(|parent| {
    ///     parent.class("empty");
    ///     "Nothing here"
    /// }));
    /// assert_eq!(list.to_html(), r#"<ul class="empty">Nothing here</ul>"#);
    /// ```
    pub fn defer<F, C>(produce: F) -> Self
    where
        F: FnOnce(&Element) -> C + 'a,
        C: Into<Child<'a>>,
    {
        Self::Deferred(Box::new(move |parent| produce(parent).into()))
    }

    /// Whether this value is [`Child::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for Child<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
            Self::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Element> for Child<'_> {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&Element> for Child<'_> {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}

impl From<RawHtml> for Child<'_> {
    fn from(raw: RawHtml) -> Self {
        Self::Raw(raw)
    }
}

impl From<Text> for Child<'_> {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<Node> for Child<'_> {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<String> for Child<'_> {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Child<'_> {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<&String> for Child<'_> {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl<'a, T: Into<Child<'a>>> From<Option<T>> for Child<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<'a, T: Into<Child<'a>>> From<Vec<T>> for Child<'a> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T: Into<Child<'a>>, const N: usize> From<[T; N]> for Child<'a> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<'a, T: Into<Child<'a>>> FromIterator<T> for Child<'a> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_tuple {
    ($($name:ident),+) => {
        impl<'a, $($name: Into<Child<'a>>),+> From<($($name,)+)> for Child<'a> {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Self::List(vec![$($name.into()),+])
            }
        }
    };
}

impl_from_tuple!(A);
impl_from_tuple!(A, B);
impl_from_tuple!(A, B, C);
impl_from_tuple!(A, B, C, D);
impl_from_tuple!(A, B, C, D, E);
impl_from_tuple!(A, B, C, D, E, F);
impl_from_tuple!(A, B, C, D, E, F, G);
impl_from_tuple!(A, B, C, D, E, F, G, H);

/// Build a [`Child::List`] from values of mixed types.
///
/// ```
/// use elem::{children, div, p, raw_html};
///
/// let admin = false;
/// let html = div()
///     .append(children![
///         p().append("Hello"),
///         admin.then(|| p().append("Admin")),
///         raw_html("<hr>"),
///         "bye",
///     ])
///     .to_html();
/// assert_eq!(html, "<div><p>Hello</p><hr>bye</div>");
/// ```
#[macro_export]
macro_rules! children {
    ($($child:expr),* $(,)?) => {
        $crate::Child::List(::std::vec![$($crate::Child::from($child)),*])
    };
}

impl Element {
    /// Append a child value.
    ///
    /// Returns this element so appends chain. Appending an element that is
    /// already attached in the same document moves it. Appending an ancestor
    /// (or the element itself) would create a cycle and is skipped.
    pub fn append<'a>(&self, child: impl Into<Child<'a>>) -> Self {
        self.attach(child.into());
        self.clone()
    }

    /// Append every item of an iterator in order.
    pub fn append_all<'a, I>(&self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Child<'a>>,
    {
        for child in children {
            self.attach(child.into());
        }
        self.clone()
    }

    fn attach(&self, child: Child<'_>) {
        match child {
            Child::Null => {}
            Child::Deferred(produce) => {
                let produced = produce(self);
                self.attach(produced);
            }
            Child::Element(element) => self.attach_element(&element),
            Child::Raw(raw) => {
                if raw.is_empty() {
                    return;
                }
                let doc = self.document();
                let marker = doc.create_raw_marker(raw.into_string());
                doc.borrow_mut().append_child(self.node_id(), marker);
            }
            Child::Text(text) => {
                if !text.is_empty() {
                    self.push_text(text.0);
                }
            }
            Child::Node(node) => {
                let doc = self.document();
                let imported = doc.import_foreign(&node);
                doc.borrow_mut().append_child(self.node_id(), imported);
            }
            Child::List(items) => {
                for item in items {
                    self.attach(item);
                }
            }
            Child::Str(s) => self.push_text(s),
        }
    }

    fn attach_element(&self, child: &Element) {
        let doc = self.document();
        let source = child.document();
        let same_document = doc.ptr_eq(source);

        let node = if same_document {
            let cycle = doc.borrow().is_inclusive_ancestor(child.node_id(), self.node_id());
            if cycle {
                tracing::warn!(
                    parent = %self.tag_name(),
                    child = %child.tag_name(),
                    "Skipping append that would create a cycle"
                );
                return;
            }
            child.node_id()
        } else {
            doc.import_from(source, child.node_id())
        };

        let pending = {
            let mut source = source.borrow_mut();
            std::mem::take(&mut source.node_mut(child.node_id()).pending_scripts)
        };
        let scripts: Vec<NodeId> = if same_document {
            pending
        } else {
            pending
                .into_iter()
                .map(|script| {
                    let copy = doc.import_from(source, script);
                    source.borrow_mut().free_subtree(script);
                    copy
                })
                .collect()
        };

        let mut inner = doc.borrow_mut();
        inner.append_child(self.node_id(), node);
        let mut anchor = node;
        for script in scripts {
            inner.insert_after(anchor, script);
            anchor = script;
        }
    }
}
