//! Document scope: the arena that owns every node of a coherent build.
//!
//! Nodes from one [`Document`] are never linked into another. Attaching a
//! subtree across documents deep-imports it (raw marker content included)
//! into the target document first.
//!
//! Every [`Element`] handle is counted on its node and on each ancestor. When
//! the count of a detached tree drops to zero nothing can reach it any more,
//! so the tree and its raw entries are reclaimed.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;

use crate::element::Element;
use crate::node::{Node, NodeData, NodeId, NodeKind};
use crate::raw::RawStore;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

/// Handle to a document scope.
///
/// Cloning the handle is cheap and yields the same document. A tree is freed
/// once no [`Element`] handle points into it, and everything goes when the
/// last document handle is dropped.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

/// Arena storage behind a [`Document`] handle.
pub(crate) struct DocumentInner {
    id: DocumentId,
    nodes: Slab<NodeData>,
    pub(crate) raw: RawStore,
}

impl Document {
    /// Create a new, empty document scope.
    #[must_use]
    pub fn new() -> Self {
        let id = DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(document = id.0, "Created document scope");
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                id,
                nodes: Slab::new(),
                raw: RawStore::default(),
            })),
        }
    }

    /// Identity of this document.
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.inner.borrow().id
    }

    /// Whether both handles refer to the same document.
    #[must_use]
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create a detached element owned by this document.
    #[must_use]
    pub fn create_element(&self, tag: impl Into<String>) -> Element {
        let node = self.alloc(NodeKind::Element {
            tag: tag.into(),
            attrs: Vec::new(),
        });
        Element::from_parts(self.clone(), node)
    }

    /// Number of live nodes in this document, attached or not.
    ///
    /// Trees no handle can reach are not counted; they are reclaimed as soon
    /// as their last handle drops.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Number of raw HTML entries held for marker substitution.
    #[must_use]
    pub fn raw_entry_count(&self) -> usize {
        self.inner.borrow().raw.len()
    }

    /// Drop all stored raw HTML.
    ///
    /// Markers still present in a tree serialize as their placeholder comment
    /// afterwards. Intended for long-running processes that reuse one scope.
    pub fn clear_raw_store(&self) {
        let mut inner = self.inner.borrow_mut();
        tracing::debug!(entries = inner.raw.len(), "Clearing raw store");
        inner.raw.clear();
    }

    pub(crate) fn borrow(&self) -> Ref<'_, DocumentInner> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, DocumentInner> {
        self.inner.borrow_mut()
    }

    pub(crate) fn try_borrow_mut(&self) -> Option<RefMut<'_, DocumentInner>> {
        self.inner.try_borrow_mut().ok()
    }

    pub(crate) fn alloc(&self, kind: NodeKind) -> NodeId {
        self.inner.borrow_mut().alloc(kind)
    }

    /// Store raw content and allocate its marker node.
    pub(crate) fn create_raw_marker(&self, content: String) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let marker = inner.raw.insert(content);
        inner.alloc(NodeKind::RawMarker(marker))
    }

    /// Deep-copy a subtree of `source` into this document.
    ///
    /// The copy is detached; raw marker content is re-registered under new ids.
    pub(crate) fn import_from(&self, source: &Document, node: NodeId) -> NodeId {
        debug_assert!(!self.ptr_eq(source), "import within one document");
        let source = source.inner.borrow();
        let mut target = self.inner.borrow_mut();
        let before = target.nodes.len();
        let imported = target.import_subtree(&source, node);
        tracing::debug!(
            from = source.id.0,
            to = target.id.0,
            nodes = target.nodes.len() - before,
            "Imported subtree across documents"
        );
        imported
    }

    /// Deep-copy an owned foreign tree into this document.
    pub(crate) fn import_foreign(&self, node: &Node) -> NodeId {
        self.inner.borrow_mut().import_foreign(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("id", &inner.id)
            .field("nodes", &inner.nodes.len())
            .field("raw_entries", &inner.raw.len())
            .finish()
    }
}

impl DocumentInner {
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        NodeId(self.nodes.insert(NodeData::new(kind)))
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// Attribute list of an element node. Non-elements have none.
    pub(crate) fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub(crate) fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Count a new handle on `node`.
    pub(crate) fn retain(&mut self, node: NodeId) {
        self.node_mut(node).handles += 1;
        self.add_tree_handles(node, 1);
    }

    /// Drop a handle on `node`, reclaiming its tree if nothing else reaches it.
    pub(crate) fn release(&mut self, node: NodeId) {
        self.node_mut(node).handles -= 1;
        let root = self.sub_tree_handles(node, 1);
        self.collect(root);
    }

    /// Add `count` to the subtree totals from `node` up; returns the root.
    fn add_tree_handles(&mut self, node: NodeId, count: usize) -> NodeId {
        let mut current = node;
        loop {
            let data = self.node_mut(current);
            data.tree_handles += count;
            match data.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Subtract `count` from the subtree totals from `node` up; returns the root.
    fn sub_tree_handles(&mut self, node: NodeId, count: usize) -> NodeId {
        let mut current = node;
        loop {
            let data = self.node_mut(current);
            data.tree_handles -= count;
            match data.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Free the tree under `root` when no handle reaches it.
    fn collect(&mut self, root: NodeId) {
        if self.node(root).parent.is_none() && self.node(root).tree_handles == 0 {
            self.free_subtree(root);
        }
    }

    /// Remove `root`, its descendants and their pending scripts from the arena.
    pub(crate) fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        let mut freed = 0usize;
        while let Some(id) = stack.pop() {
            let data = self.nodes.remove(id.0);
            if let NodeKind::RawMarker(marker) = data.kind {
                self.raw.remove(marker);
            }
            stack.extend(data.children);
            stack.extend(data.pending_scripts);
            freed += 1;
        }
        tracing::trace!(document = self.id.0, nodes = freed, "Reclaimed unreachable tree");
    }

    /// Unlink a node from its parent, if any. Returns the root it was under.
    fn detach(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.node_mut(node).parent.take()?;
        self.node_mut(parent).children.retain(|&child| child != node);
        let count = self.node(node).tree_handles;
        Some(self.sub_tree_handles(parent, count))
    }

    /// Link a detached `node` under `parent` at `position` in its children.
    fn link(&mut self, parent: NodeId, node: NodeId, position: Option<usize>) -> NodeId {
        self.node_mut(node).parent = Some(parent);
        let siblings = &mut self.node_mut(parent).children;
        match position {
            Some(index) => siblings.insert(index, node),
            None => siblings.push(node),
        }
        let count = self.node(node).tree_handles;
        self.add_tree_handles(parent, count)
    }

    /// Reclaim the tree a node was moved out of once nothing reaches it.
    fn collect_after_move(&mut self, old_root: Option<NodeId>, new_root: NodeId) {
        if let Some(old_root) = old_root
            && old_root != new_root
        {
            self.collect(old_root);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if already attached.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let old_root = self.detach(child);
        let new_root = self.link(parent, child, None);
        self.collect_after_move(old_root, new_root);
    }

    /// Insert `node` as the next sibling of `anchor`.
    ///
    /// Returns `false` (and leaves `node` untouched) when `anchor` has no parent.
    pub(crate) fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.node(anchor).parent else {
            return false;
        };
        let old_root = self.detach(node);
        let siblings = &self.node(parent).children;
        let position = siblings
            .iter()
            .position(|&sibling| sibling == anchor)
            .map_or(siblings.len(), |index| index + 1);
        let new_root = self.link(parent, node, Some(position));
        self.collect_after_move(old_root, new_root);
        true
    }

    /// Whether `ancestor` is `node` itself or one of its ancestors.
    pub(crate) fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    fn import_subtree(&mut self, source: &DocumentInner, node: NodeId) -> NodeId {
        let data = source.node(node);
        let kind = match &data.kind {
            NodeKind::RawMarker(marker) => {
                let content = source.raw.get(*marker).unwrap_or_default().to_owned();
                NodeKind::RawMarker(self.raw.insert(content))
            }
            other => other.clone(),
        };
        let copy = self.alloc(kind);
        for &child in &data.children {
            let child_copy = self.import_subtree(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    fn import_foreign(&mut self, node: &Node) -> NodeId {
        match node {
            Node::Element {
                tag,
                attrs,
                children,
            } => {
                let copy = self.alloc(NodeKind::Element {
                    tag: tag.clone(),
                    attrs: attrs.clone(),
                });
                for child in children {
                    let child_copy = self.import_foreign(child);
                    self.append_child(copy, child_copy);
                }
                copy
            }
            Node::Text(text) => self.alloc(NodeKind::Text(text.clone())),
            Node::Comment(text) => self.alloc(NodeKind::Comment(text.clone())),
        }
    }
}
