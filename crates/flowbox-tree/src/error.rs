//! Errors reported by tree mutations.

use crate::NodeId;

/// A violated mutation contract.
///
/// Every mutation checks its preconditions before touching any link, so an
/// `Err` always means the tree is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id refers to a node that was freed (or never existed).
    #[error("node {0} is not part of this tree")]
    StaleNode(NodeId),

    /// The node being inserted is already attached somewhere.
    #[error("node {node} already has a parent")]
    AlreadyHasParent {
        /// The node that was being inserted.
        node: NodeId,
    },

    /// The `before` reference is not a direct child of the parent.
    #[error("node {before} is not a child of {parent}")]
    NotAChild {
        /// The parent the insertion targeted.
        parent: NodeId,
        /// The sibling the node was to be inserted before.
        before: NodeId,
    },

    /// Inserting the node would make it its own ancestor.
    #[error("node {node} cannot be inserted into its own subtree")]
    WouldCreateCycle {
        /// The node that was being inserted.
        node: NodeId,
    },

    /// Text and replaced nodes are leaves.
    #[error("node {0} cannot have children")]
    LeafParent(NodeId),

    /// A selection end must be a text node.
    #[error("node {0} is not a text node")]
    NotText(NodeId),

    /// The selection end comes before its start.
    #[error("selection end {end} does not follow {start}")]
    SelectionOutOfOrder {
        /// Where the selection was to start.
        start: NodeId,
        /// Where it was to end.
        end: NodeId,
    },
}
