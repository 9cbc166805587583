//! Errors reported when setting up a layout pass.

use flowbox_tree::NodeId;

/// The pass cannot start from the given root.
///
/// Layout itself never fails: contradictory values are clamped and missing
/// fonts or images degrade to zero-size metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The root id refers to a node that was freed (or never existed).
    #[error("layout root {0} is not part of this tree")]
    StaleRoot(NodeId),

    /// Text and replaced nodes cannot be the root of a layout.
    #[error("layout root {0} is not an element")]
    RootNotElement(NodeId),
}
