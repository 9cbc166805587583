//! Box tree for the flowbox layout engine.
//!
//! This crate provides the persistent, document-shaped tree that layout
//! consumes: elements, text runs and replaced content (images and other
//! externally sized objects). It holds structure only; all geometry lives in
//! the per-pass layout tree built on top of it.
//!
//! # Design
//!
//! Nodes live in an arena and refer to each other through [`NodeId`]s. An id
//! carries the generation of the slot it was allocated in, so an id kept
//! after [`BoxTree::free`] is detected as stale instead of silently aliasing
//! whatever node reuses the slot. Links are intrusive (parent, first/last
//! child, next/previous sibling), giving O(1) insertion and removal
//! anywhere in a child list.

mod error;

use std::fmt::{self, Write as _};
use std::ops::Range;

pub use error::TreeError;

/// A generation-checked index into a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index of this id in its tree.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot at the time this id was handed out.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element name, used for diagnostics and tree dumps.
    pub name: String,
}

/// Text run data.
///
/// `text` is the source text as inserted by the document owner.
/// `processed_text` is what layout measures and breaks; it starts as a copy
/// of `text` and is rewritten by whitespace processing on every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextData {
    /// Source text.
    pub text: String,
    /// Text after white-space processing.
    pub processed_text: String,
    /// The selected part of this run, if any.
    pub selection: Option<TextSelection>,
}

/// The selected bytes of one text node, in both of its texts.
///
/// Both ranges lie on character boundaries. The processed range is clamped
/// again whenever the processed text is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSelection {
    /// Range into [`TextData::text`].
    pub source: Range<usize>,
    /// Range into [`TextData::processed_text`].
    pub processed: Range<usize>,
}

/// The ends of the current selection, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Text node the selection starts in.
    pub start: NodeId,
    /// Byte offset into the source text of `start`.
    pub start_offset: usize,
    /// Text node the selection ends in.
    pub end: NodeId,
    /// Byte offset into the source text of `end`.
    pub end_offset: usize,
}

/// Replaced content such as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedData {
    /// Element name, used for diagnostics and tree dumps.
    pub name: String,
    /// Key used to look up the intrinsic size of the content.
    pub source: String,
}

/// What a box node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxNodeKind {
    /// An element; the only kind that may have children.
    Element(ElementData),
    /// A run of text.
    Text(TextData),
    /// Replaced content whose size comes from outside the document.
    Replaced(ReplacedData),
}

/// A node in the box tree together with its links.
#[derive(Debug, Clone)]
pub struct BoxNode {
    /// What this node represents.
    pub kind: BoxNodeKind,
    /// Parent element, if attached.
    pub parent: Option<NodeId>,
    /// First child, if any.
    pub first_child: Option<NodeId>,
    /// Last child, if any.
    pub last_child: Option<NodeId>,
    /// Next sibling in the parent's child list.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling in the parent's child list.
    pub prev_sibling: Option<NodeId>,
}

impl BoxNode {
    const fn new(kind: BoxNodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<BoxNode>,
}

/// Arena-based box tree with O(1) node access, insertion and removal.
///
/// The tree has no implicit root: the document owner creates the nodes,
/// links them, and hands the id of the top element to layout. Dropping the
/// tree releases every node it owns.
#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    live: usize,
    selection: Option<Selection>,
}

impl BoxTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            live: 0,
            selection: None,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether the tree holds no live nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, kind: BoxNodeKind) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(BoxNode::new(kind));
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(BoxNode::new(kind)),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(BoxNodeKind::Element(ElementData {
            name: name.to_string(),
        }))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(BoxNodeKind::Text(TextData {
            text: text.to_string(),
            processed_text: text.to_string(),
            selection: None,
        }))
    }

    /// Allocate a detached replaced node.
    pub fn create_replaced(&mut self, name: &str, source: &str) -> NodeId {
        self.alloc(BoxNodeKind::Replaced(ReplacedData {
            name: name.to_string(),
            source: source.to_string(),
        }))
    }

    /// Whether `id` refers to a live node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a node by its id. Returns `None` for stale ids.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&BoxNode> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut BoxNode> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> Result<&BoxNode, TreeError> {
        self.get(id).ok_or(TreeError::StaleNode(id))
    }

    fn update(&mut self, id: NodeId, f: impl FnOnce(&mut BoxNode)) {
        if let Some(node) = self.get_mut(id) {
            f(node);
        }
    }

    /// Insert `node` as a child of `parent`, before `before` (or last when
    /// `before` is `None`).
    ///
    /// # Errors
    ///
    /// Fails without modifying the tree when any id is stale, when `parent`
    /// is not an element, when `node` already has a parent, when `before` is
    /// not a direct child of `parent`, or when `node` is `parent` or one of
    /// its ancestors.
    pub fn insert(
        &mut self,
        parent: NodeId,
        node: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), TreeError> {
        // STEP 1: Validate everything before touching a single link.
        let parent_node = self.node(parent)?;
        if !matches!(parent_node.kind, BoxNodeKind::Element(_)) {
            return Err(TreeError::LeafParent(parent));
        }
        if self.node(node)?.parent.is_some() {
            return Err(TreeError::AlreadyHasParent { node });
        }
        if node == parent || self.ancestors(parent).any(|ancestor| ancestor == node) {
            return Err(TreeError::WouldCreateCycle { node });
        }
        let prev = match before {
            Some(before) => {
                let before_node = self.node(before)?;
                if before_node.parent != Some(parent) {
                    return Err(TreeError::NotAChild { parent, before });
                }
                before_node.prev_sibling
            }
            None => parent_node.last_child,
        };

        // STEP 2: Splice the node between `prev` and `before`.
        self.update(node, |n| {
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = before;
        });
        match prev {
            Some(prev) => self.update(prev, |n| n.next_sibling = Some(node)),
            None => self.update(parent, |n| n.first_child = Some(node)),
        }
        match before {
            Some(before) => self.update(before, |n| n.prev_sibling = Some(node)),
            None => self.update(parent, |n| n.last_child = Some(node)),
        }
        Ok(())
    }

    /// Insert `node` as the first child of `parent`.
    ///
    /// # Errors
    ///
    /// Same contract as [`BoxTree::insert`].
    pub fn push_front(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        let first = self.node(parent)?.first_child;
        self.insert(parent, node, first)
    }

    /// Insert `node` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Same contract as [`BoxTree::insert`].
    pub fn push_back(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.insert(parent, node, None)
    }

    /// Unlink `node` from its parent and siblings.
    ///
    /// The node keeps its own children: removing a subtree root detaches the
    /// whole subtree, which can be re-inserted elsewhere. Removing a node
    /// that has no parent is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if `node` is not live.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let current = self.node(node)?;
        let Some(parent) = current.parent else {
            return Ok(());
        };
        let prev = current.prev_sibling;
        let next = current.next_sibling;

        match prev {
            Some(prev) => self.update(prev, |n| n.next_sibling = next),
            None => self.update(parent, |n| n.first_child = next),
        }
        match next {
            Some(next) => self.update(next, |n| n.prev_sibling = prev),
            None => self.update(parent, |n| n.last_child = prev),
        }
        self.update(node, |n| {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        });
        Ok(())
    }

    /// Detach `node` and release it together with its whole subtree.
    ///
    /// Every released id becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StaleNode`] if `node` is not live.
    pub fn free(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.remove(node)?;
        let doomed: Vec<NodeId> = self.descendants(node).collect();
        for id in doomed {
            let slot = &mut self.slots[id.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(id.index);
            self.live -= 1;
        }
        Ok(())
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over the children of a node, first to last.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            current: self.first_child(id),
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `root` and all its descendants in document order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.get(root).map(|_| root),
        }
    }

    /// The node following `current` in document order, staying inside the
    /// subtree rooted at `root`.
    ///
    /// Depth first: first child, else next sibling, else the next sibling of
    /// the nearest ancestor that has one.
    #[must_use]
    pub fn next_in_order(&self, current: NodeId, root: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(current) {
            return Some(child);
        }
        let mut node = current;
        loop {
            if node == root {
                return None;
            }
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent(node)?;
        }
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            BoxNodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&TextData> {
        self.get(id).and_then(|n| match &n.kind {
            BoxNodeKind::Text(data) => Some(data),
            _ => None,
        })
    }

    /// Get replaced data if this node is replaced content.
    #[must_use]
    pub fn as_replaced(&self, id: NodeId) -> Option<&ReplacedData> {
        self.get(id).and_then(|n| match &n.kind {
            BoxNodeKind::Replaced(data) => Some(data),
            _ => None,
        })
    }

    /// Processed text of a text node (empty for other nodes).
    #[must_use]
    pub fn processed_text(&self, id: NodeId) -> &str {
        self.as_text(id).map_or("", |t| t.processed_text.as_str())
    }

    /// Replace the processed text of a text node.
    ///
    /// Returns `false` if `id` is not a live text node.
    pub fn set_processed_text(&mut self, id: NodeId, processed: String) -> bool {
        match self.get_mut(id).map(|n| &mut n.kind) {
            Some(BoxNodeKind::Text(data)) => {
                data.processed_text = processed;
                if let Some(selection) = &mut data.selection {
                    selection.processed = clamp_range(&data.processed_text, selection.processed.clone());
                }
                true
            }
            _ => false,
        }
    }

    /// Restore every text node's processed text from its source text.
    pub fn reset_processed_text(&mut self) {
        for slot in &mut self.slots {
            if let Some(BoxNode {
                kind: BoxNodeKind::Text(data),
                ..
            }) = slot.node.as_mut()
            {
                data.processed_text.clone_from(&data.text);
                if let Some(selection) = &mut data.selection {
                    selection.processed = selection.source.clone();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// The current selection, if one is set.
    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Select from `start_offset` in text node `start` to `end_offset` in
    /// text node `end`, replacing any previous selection.
    ///
    /// Every text node from `start` to `end` in document order is marked:
    /// the two ends partially, the ones between in full. Offsets are clamped
    /// to the text and rounded down to a character boundary.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::StaleNode`] or [`TreeError::NotText`] when an
    /// end is not a live text node, and with
    /// [`TreeError::SelectionOutOfOrder`] when `end` does not follow
    /// `start` in document order. The tree is unchanged on error.
    pub fn set_selection(
        &mut self,
        start: NodeId,
        start_offset: usize,
        end: NodeId,
        end_offset: usize,
    ) -> Result<(), TreeError> {
        for id in [start, end] {
            if !matches!(self.node(id)?.kind, BoxNodeKind::Text(_)) {
                return Err(TreeError::NotText(id));
            }
        }

        // STEP 1: Collect the text nodes from start to end.
        let top = self.ancestors(start).last().unwrap_or(start);
        let mut texts = Vec::new();
        let mut current = Some(start);
        let mut reached = false;
        while let Some(id) = current {
            if self.as_text(id).is_some() {
                texts.push(id);
            }
            if id == end {
                reached = true;
                break;
            }
            current = self.next_in_order(id, top);
        }
        if !reached {
            return Err(TreeError::SelectionOutOfOrder { start, end });
        }

        // STEP 2: Replace the old marks.
        self.clear_selection();
        for id in texts {
            if let Some(BoxNodeKind::Text(data)) = self.get_mut(id).map(|n| &mut n.kind) {
                let from = if id == start { start_offset } else { 0 };
                let to = if id == end { end_offset } else { usize::MAX };
                data.selection = Some(TextSelection {
                    source: clamp_range(&data.text, from..to),
                    processed: clamp_range(&data.processed_text, from..to),
                });
            }
        }
        self.selection = Some(Selection {
            start,
            start_offset,
            end,
            end_offset,
        });
        Ok(())
    }

    /// Remove the selection from every text node.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        for slot in &mut self.slots {
            if let Some(BoxNode {
                kind: BoxNodeKind::Text(data),
                ..
            }) = slot.node.as_mut()
            {
                data.selection = None;
            }
        }
    }

    /// Render the subtree rooted at `id` as an indented outline.
    #[must_use]
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, id, 0);
        out
    }

    fn dump_into(&self, out: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        let Some(node) = self.get(id) else {
            return;
        };
        let _ = match &node.kind {
            BoxNodeKind::Element(data) => writeln!(out, "{indent}<{}> {id}", data.name),
            BoxNodeKind::Text(data) => writeln!(out, "{indent}{:?} {id}", data.processed_text),
            BoxNodeKind::Replaced(data) => {
                writeln!(out, "{indent}<{} src={:?}> {id}", data.name, data.source)
            }
        };
        for child in self.children(id) {
            self.dump_into(out, child, depth + 1);
        }
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    tree: &'a BoxTree,
    current: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Iterator over ancestors of a node.
pub struct Ancestors<'a> {
    tree: &'a BoxTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first document-order walk over a subtree.
pub struct Descendants<'a> {
    tree: &'a BoxTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next_in_order(id, self.root);
        Some(id)
    }
}

/// `range` clamped to `text`, both ends moved down to a character boundary.
fn clamp_range(text: &str, range: Range<usize>) -> Range<usize> {
    let floor = |offset: usize| {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    };
    let start = floor(range.start);
    start..floor(range.end).max(start)
}
