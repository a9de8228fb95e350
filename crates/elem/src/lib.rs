//! Programmatic HTML document builder.
//!
//! Build HTML trees with ordinary function and method calls, then serialize
//! them with correct escaping and optional pretty-printing.
//!
//! # Architecture
//!
//! - [`Document`]: arena owning every node of one build. Builders allocate into
//!   the active scope ([`current_scope`]); [`with_isolated_scope`] swaps in a
//!   fresh document for the duration of a closure.
//! - [`Element`]: handle to one element node with attribute setters, a class
//!   merger, and [`Element::append`].
//! - [`Child`]: everything that can be appended (elements, strings, [`Text`],
//!   [`RawHtml`], foreign [`Node`]s, options, lists, deferred closures).
//! - Serialization escapes text and attribute values. [`RawHtml`] is stored
//!   out of tree and substituted after formatting, so it comes out byte-exact.
//!
//! # Example
//!
//! ```
//! use elem::{body, div, h, head, html, p, raw_html, title};
//!
//! let page = html("en").append((
//!     head().append(title("Demo")),
//!     body().append(
//!         div().id("app").class("container").append((
//!             h(1).append("Hello <world>"),
//!             p().append(raw_html("<em>trusted</em>")),
//!         )),
//!     ),
//! ));
//!
//! let out = page.to_html();
//! assert!(out.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
//! assert!(out.contains("<h1>Hello &lt;world&gt;</h1>"));
//! assert!(out.contains("<p><em>trusted</em></p>"));
//! ```

// Builder methods are also called for their side effect.
#![allow(clippy::return_self_not_must_use)]

mod child;
mod document;
mod element;
mod error;
mod node;
mod pretty;
mod raw;
mod scope;
mod serialize;
pub mod tags;

pub use child::{Child, Text, text};
pub use document::{Document, DocumentId};
pub use element::Element;
pub use error::ElemError;
pub use node::{Node, NodeId};
pub use pretty::{PrettyConfig, indent_html};
pub use raw::{RawHtml, raw_html};
pub use scope::{current_scope, reset_default_scope, with_isolated_scope};
pub use serialize::{VOID_TAGS, escape_html, is_void};
pub use tags::*;
