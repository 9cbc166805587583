//! CSS Stacking Contexts.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)

use super::node::LayoutNodeId;

/// Index of a stacking context in a [`StackingContexts`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StackingContextId(usize);

/// [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "Each box belongs to one stacking context. Each positioned box in a given
/// stacking context has an integer stack level, which is its position on the
/// z-axis relative to other stack levels within the same stacking context."
#[derive(Debug, Clone)]
pub(crate) struct StackingContext {
    /// The box that forms the context; `None` only before the root is built.
    pub root: Option<LayoutNodeId>,
    /// The stack level of this context in its parent.
    pub z_index: i32,
    /// Child contexts in document order.
    pub children: Vec<StackingContextId>,
}

/// Per-pass arena of stacking contexts. Index 0 is the root context.
#[derive(Debug, Clone, Default)]
pub(crate) struct StackingContexts {
    contexts: Vec<StackingContext>,
}

impl StackingContexts {
    /// Create a context with stack level `z_index` inside `parent`.
    pub fn create(&mut self, parent: Option<StackingContextId>, z_index: i32) -> StackingContextId {
        let id = StackingContextId(self.contexts.len());
        self.contexts.push(StackingContext {
            root: None,
            z_index,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.contexts[parent.0].children.push(id);
        }
        id
    }

    pub fn get(&self, id: StackingContextId) -> &StackingContext {
        &self.contexts[id.0]
    }

    pub fn set_root(&mut self, id: StackingContextId, root: LayoutNodeId) {
        self.contexts[id.0].root = Some(root);
    }

    /// Child contexts by stack level.
    ///
    /// "Boxes with the same stack level in a stacking context are stacked
    /// back-to-front according to document tree order."
    pub fn children_by_z(&self, id: StackingContextId) -> Vec<StackingContextId> {
        let mut children = self.get(id).children.clone();
        children.sort_by_key(|child| self.get(*child).z_index);
        children
    }
}
