//! Raw HTML markers.
//!
//! Unescaped HTML never enters the tree as parsed nodes. Appending a
//! [`RawHtml`] stores its content in the owning document's [`RawStore`] and
//! attaches an inert marker node carrying only an id. Serialization emits the
//! marker as a comment token and a final pass swaps every token for the stored
//! content:
//!
//! ```text
//! tree:        <div> [RawMarker 7] </div>
//! serialized:  <div><!--elem-raw:5f0c9a3e12d4b877:7--></div>
//! substituted: <div><b>trusted</b></div>
//! ```
//!
//! Tokens carry the store's random nonce, so text that merely looks like a
//! marker is never substituted. The content is never re-parsed, so malformed
//! fragments come out exactly as they went in.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngExt;
use regex::{Captures, Regex};

/// Marker ids are unique for the lifetime of the process.
static NEXT_MARKER_ID: AtomicU64 = AtomicU64::new(1);

/// Comment text that starts a marker token.
const MARKER_PREFIX: &str = "elem-raw:";

/// Pattern for marker tokens in serialized output.
static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--elem-raw:([0-9a-f]{16}):(\d+)-->").expect("invalid marker regex")
});

/// HTML content that is emitted without escaping.
///
/// Only use this with trusted content: passing user input through `RawHtml`
/// opens the door to XSS. Plain strings are always escaped.
///
/// # Example
///
/// ```
/// use elem::{div, raw_html};
///
/// let html = div().append(raw_html("<strong>Bold</strong>")).to_html();
/// assert_eq!(html, "<div><strong>Bold</strong></div>");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawHtml {
    html: String,
}

impl RawHtml {
    /// Wrap trusted HTML.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The wrapped HTML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Whether there is nothing to insert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub(crate) fn into_string(self) -> String {
        self.html
    }
}

/// Wrap trusted HTML so it is inserted without escaping.
#[must_use]
pub fn raw_html(html: impl Into<String>) -> RawHtml {
    RawHtml::new(html)
}

/// Raw content keyed by marker id, owned by one document.
#[derive(Debug)]
pub(crate) struct RawStore {
    nonce: u64,
    entries: HashMap<u64, String>,
}

impl Default for RawStore {
    fn default() -> Self {
        Self {
            nonce: fresh_nonce(),
            entries: HashMap::new(),
        }
    }
}

fn fresh_nonce() -> u64 {
    rand::rng().random::<u64>()
}

impl RawStore {
    /// Store content under a freshly minted id.
    pub(crate) fn insert(&mut self, content: String) -> u64 {
        let id = NEXT_MARKER_ID.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id, content);
        id
    }

    pub(crate) fn get(&self, id: u64) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub(crate) fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and rotate the nonce.
    ///
    /// Tokens serialized before the clear can no longer resolve, even against
    /// entries stored later.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.nonce = fresh_nonce();
    }

    /// Token written in place of a marker node.
    pub(crate) fn token(&self, id: u64) -> String {
        format!("<!--{MARKER_PREFIX}{:016x}:{id}-->", self.nonce)
    }
}

/// Break up marker prefixes in comment text so it can never form a token.
pub(crate) fn defuse_markers(text: &str) -> Cow<'_, str> {
    if text.contains(MARKER_PREFIX) {
        Cow::Owned(text.replace(MARKER_PREFIX, "elem-raw :"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Replace every marker token with its stored content in a single pass.
///
/// Substituted content is not rescanned, so raw HTML that happens to contain
/// marker-like text is emitted unchanged. Tokens with another nonce or an
/// unknown id are left in place.
pub(crate) fn substitute_markers<'a>(html: &'a str, store: &RawStore) -> Cow<'a, str> {
    if store.is_empty() {
        return Cow::Borrowed(html);
    }

    MARKER_PATTERN.replace_all(html, |caps: &Captures| {
        let owned = u64::from_str_radix(&caps[1], 16).is_ok_and(|nonce| nonce == store.nonce);
        if !owned {
            return caps[0].to_owned();
        }
        match caps[2].parse::<u64>().ok().and_then(|id| store.get(id)) {
            Some(content) => content.to_owned(),
            None => {
                tracing::warn!(token = &caps[0], "Unresolved raw marker");
                caps[0].to_owned()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_ids_are_unique_across_stores() {
        let mut a = RawStore::default();
        let mut b = RawStore::default();
        let first = a.insert("x".to_owned());
        let second = b.insert("y".to_owned());
        let third = a.insert("z".to_owned());
        assert_ne!(first, second);
        assert!(third > first);
    }

    #[test]
    fn test_substitute_single_marker() {
        let mut store = RawStore::default();
        let id = store.insert("<b>bold</b>".to_owned());
        let html = format!("<p>{}</p>", store.token(id));
        assert_eq!(substitute_markers(&html, &store), "<p><b>bold</b></p>");
    }

    #[test]
    fn test_substitute_keeps_order() {
        let mut store = RawStore::default();
        let a = store.insert("A".to_owned());
        let b = store.insert("B".to_owned());
        let html = format!("{}-{}-{}", store.token(b), store.token(a), store.token(b));
        assert_eq!(substitute_markers(&html, &store), "B-A-B");
    }

    #[test]
    fn test_substituted_content_is_not_rescanned() {
        let mut store = RawStore::default();
        let inner = store.insert("never".to_owned());
        let outer = store.insert(store.token(inner));
        let html = store.token(outer);
        assert_eq!(substitute_markers(&html, &store), store.token(inner));
    }

    #[test]
    fn test_unknown_marker_left_in_place() {
        let mut store = RawStore::default();
        store.insert("x".to_owned());
        let html = format!("<p>{}</p>", store.token(0));
        assert_eq!(substitute_markers(&html, &store), html);
    }

    #[test]
    fn test_token_from_another_store_is_not_substituted() {
        let mut ours = RawStore::default();
        let mut theirs = RawStore::default();
        let id = ours.insert("<b>secret</b>".to_owned());
        theirs.insert("<i>other</i>".to_owned());

        let forged = theirs.token(id);
        assert_eq!(substitute_markers(&forged, &ours), forged);

        let legacy = format!("<!--elem-raw:{id}-->");
        assert_eq!(substitute_markers(&legacy, &ours), legacy);
    }

    #[test]
    fn test_clear_rotates_nonce() {
        let mut store = RawStore::default();
        let id = store.insert("<hr>".to_owned());
        let stale = store.token(id);
        store.clear();
        store.insert("<br>".to_owned());
        assert_ne!(store.token(id), stale);
        assert_eq!(substitute_markers(&stale, &store), stale);
    }

    #[test]
    fn test_empty_store_borrows() {
        let store = RawStore::default();
        let html = "<p>plain</p>";
        assert!(matches!(substitute_markers(html, &store), Cow::Borrowed(_)));
    }

    #[test]
    fn test_store_retains_entries_after_substitution() {
        let mut store = RawStore::default();
        let id = store.insert("<hr>".to_owned());
        let html = store.token(id);
        assert_eq!(substitute_markers(&html, &store), "<hr>");
        assert_eq!(substitute_markers(&html, &store), "<hr>");
        assert_eq!(store.len(), 1);

        store.remove(id);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_defuse_markers() {
        assert_eq!(defuse_markers(" note "), " note ");
        assert!(matches!(defuse_markers("plain"), Cow::Borrowed(_)));
        assert_eq!(
            defuse_markers("x--><!--elem-raw:00:1"),
            "x--><!--elem-raw :00:1"
        );
    }

    #[test]
    fn test_raw_html_wrapper() {
        let raw = raw_html("<i>x</i>");
        assert_eq!(raw.as_str(), "<i>x</i>");
        assert!(!raw.is_empty());
        assert!(RawHtml::default().is_empty());
    }
}
