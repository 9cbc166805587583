//! Layout nodes and the per-pass arena that owns them.
//!
//! One [`LayoutNode`] exists per block container, table, table cell and
//! replaced box of the rendered tree. Inline elements and text do not get
//! nodes; they live in the [`InlineContent`] of the block container that
//! holds them.
//!
//! # Coordinates
//!
//! A node's content box is stored in local coordinates:
//!
//! - a node that establishes its own formatting context is positioned in
//!   its *parent* context (or absolutely, when it has none),
//! - any other node is positioned in the context it shares with its
//!   ancestors.
//!
//! Absolute coordinates add the context origins up the parent chain, plus the
//! accumulated relative-positioning offset.

use flowbox_tree::NodeId;

use super::box_model::{BoxGeometry, EdgeSizes, Point, Rect};
use super::formatting_context::{FormattingContextId, FormattingContexts};
use super::inline::InlineContent;
use super::replaced::ReplacedContent;
use super::stacking::{StackingContextId, StackingContexts};
use super::table::TableContent;
use super::values::{used_to_actual, UsedHeight, UsedWidth};
use crate::style::{ComputedBox, Display, Overflow, Position};

/// Index of a [`LayoutNode`] in a [`LayoutArena`]; nodes are stored in
/// document (pre-)order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct LayoutNodeId(usize);

/// What a node contains and how its content is laid out.
#[derive(Debug)]
pub(crate) enum LayoutKind {
    /// Only block-level children, stacked vertically.
    Block(Vec<LayoutNodeId>),
    /// Inline content broken into line boxes, possibly with embedded blocks.
    Inline(Box<InlineContent>),
    /// Rows of cells.
    Table(Box<TableContent>),
    /// An image or other opaque content.
    Replaced(ReplacedContent),
}

/// [§ 10.3.7](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
///
/// "the static position for 'left' is the distance from the left edge of
/// the containing block to the left margin edge of a hypothetical box that
/// would have been the first box of the element if its 'position' property
/// had been 'static'."
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StaticPosition {
    /// Margin-edge position inside `context`.
    pub point: Point,
    /// The formatting context the flow position was recorded in.
    pub context: FormattingContextId,
}

#[derive(Debug)]
pub(crate) struct LayoutNode {
    /// The element or replaced box this node lays out.
    pub node: NodeId,
    /// Style with `display` already blockified where needed.
    pub style: ComputedBox,
    pub parent: Option<LayoutNodeId>,
    pub kind: LayoutKind,

    /// The context the node's content is laid out in.
    pub bfc: FormattingContextId,
    /// The node established `bfc` itself.
    pub is_root: bool,
    pub stacking: StackingContextId,
    /// `stacking` was created by this node.
    pub establishes_stacking: bool,

    pub containing_width: UsedWidth,
    pub containing_height: UsedHeight,
    pub width: UsedWidth,
    pub height: UsedHeight,
    pub css_min_width: f32,
    pub css_max_width: Option<f32>,
    pub css_min_height: f32,
    pub css_max_height: Option<f32>,
    pub margin: EdgeSizes,
    pub border: EdgeSizes,
    pub padding: EdgeSizes,

    /// Total relative-positioning offset applied at paint and query time.
    pub relative: Point,
    /// Content box in local coordinates (see the module docs).
    pub content_box: Rect,

    /// Cached results of the minimum and preferred strategies.
    pub preferred_width: Option<f32>,
    pub minimum_width: Option<f32>,
    pub static_position: Option<StaticPosition>,
}

impl LayoutNode {
    pub fn new(node: NodeId, style: ComputedBox, kind: LayoutKind, bfc: FormattingContextId, stacking: StackingContextId) -> Self {
        Self {
            node,
            style,
            parent: None,
            kind,
            bfc,
            is_root: false,
            stacking,
            establishes_stacking: false,
            containing_width: UsedWidth::default(),
            containing_height: UsedHeight::content(),
            width: UsedWidth::default(),
            height: UsedHeight::content(),
            css_min_width: 0.0,
            css_max_width: None,
            css_min_height: 0.0,
            css_max_height: None,
            margin: EdgeSizes::default(),
            border: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            relative: Point::default(),
            content_box: Rect::default(),
            preferred_width: None,
            minimum_width: None,
            static_position: None,
        }
    }

    pub const fn is_replaced(&self) -> bool {
        matches!(self.kind, LayoutKind::Replaced(_))
    }

    pub const fn is_table(&self) -> bool {
        matches!(self.kind, LayoutKind::Table(_))
    }

    pub fn is_table_cell(&self) -> bool {
        self.style.display == Display::TableCell
    }

    pub const fn is_out_of_flow(&self) -> bool {
        self.style.position.is_out_of_flow()
    }

    pub const fn is_floated(&self) -> bool {
        self.style.is_floated()
    }

    /// Atomic inline-level: laid out as one opaque box on a line.
    pub fn is_inline_block(&self) -> bool {
        matches!(self.style.display, Display::InlineBlock | Display::InlineTable)
            || (self.is_replaced() && self.style.display == Display::Inline)
    }

    /// In-flow block that shares its parent's formatting context and lets
    /// margins collapse through it.
    pub fn is_in_flow_block(&self) -> bool {
        self.style.overflow == Overflow::Visible && !self.is_table() && !self.is_replaced() && !self.is_root
    }

    /// [§ 10.3.5](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    ///
    /// "If 'width' is computed as 'auto', the used value is the
    /// 'shrink-to-fit' width."
    pub fn is_shrink_to_fit(&self) -> bool {
        !self.is_replaced()
            && self.style.width.is_auto()
            && (self.is_floated()
                || self.is_out_of_flow()
                || self.is_table_cell()
                || matches!(self.style.display, Display::InlineBlock | Display::InlineTable))
    }

    pub fn is_positioned(&self) -> bool {
        self.style.position != Position::Static
    }

    /// Margin-box width with every part snapped to whole pixels.
    pub fn block_width(&self) -> f32 {
        [
            self.margin.left,
            self.border.left,
            self.padding.left,
            self.width.value,
            self.padding.right,
            self.border.right,
            self.margin.right,
        ]
        .into_iter()
        .map(used_to_actual)
        .sum()
    }

    /// Margin-box height with every part snapped to whole pixels.
    pub fn block_height(&self) -> f32 {
        [
            self.margin.top,
            self.border.top,
            self.padding.top,
            self.height.value,
            self.padding.bottom,
            self.border.bottom,
            self.margin.bottom,
        ]
        .into_iter()
        .map(used_to_actual)
        .sum()
    }

    /// Horizontal margin, border and padding.
    pub fn horizontal_mbp(&self) -> f32 {
        self.margin.horizontal() + self.border.horizontal() + self.padding.horizontal()
    }

    pub fn geometry(&self, content: Rect) -> BoxGeometry {
        BoxGeometry {
            content,
            padding: self.padding,
            border: self.border,
            margin: self.margin,
        }
    }
}

/// Everything one layout pass produces.
#[derive(Debug, Default)]
pub(crate) struct LayoutArena {
    pub nodes: Vec<LayoutNode>,
    pub contexts: FormattingContexts,
    pub stacking: StackingContexts,
}

impl LayoutArena {
    pub fn push(&mut self, node: LayoutNode) -> LayoutNodeId {
        let id = LayoutNodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: LayoutNodeId) -> &LayoutNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: LayoutNodeId) -> &mut LayoutNode {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = LayoutNodeId> + use<> {
        (0..self.nodes.len()).map(LayoutNodeId)
    }

    /// Absolute origin of the coordinate space `id`'s content box is stored
    /// in, relative offset excluded.
    pub fn box_origin(&self, id: LayoutNodeId) -> Point {
        let node = self.node(id);
        if node.is_root {
            self.contexts
                .get(node.bfc)
                .parent()
                .map_or_else(Point::default, |parent| self.contexts.origin(parent))
        } else {
            self.contexts.origin(node.bfc)
        }
    }

    /// Absolute origin of the coordinate space `id`'s line boxes and child
    /// boxes are stored in.
    pub fn content_origin(&self, id: LayoutNodeId) -> Point {
        self.contexts.origin(self.node(id).bfc)
    }

    /// Content box in absolute coordinates, relative offset applied.
    pub fn absolute_geometry(&self, id: LayoutNodeId) -> BoxGeometry {
        let node = self.node(id);
        let origin = self.box_origin(id);
        node.geometry(
            node.content_box
                .translate(origin.x + node.relative.x, origin.y + node.relative.y),
        )
    }

    /// Padding box in absolute coordinates without the relative offset, the
    /// containing block for absolutely positioned descendants.
    pub fn padding_box(&self, id: LayoutNodeId) -> Rect {
        let node = self.node(id);
        let origin = self.box_origin(id);
        node.geometry(node.content_box.translate(origin.x, origin.y))
            .padding_box()
    }

    /// Direct child nodes in document order.
    pub fn children(&self, id: LayoutNodeId) -> Vec<LayoutNodeId> {
        match &self.node(id).kind {
            LayoutKind::Block(children) => children.clone(),
            LayoutKind::Inline(content) => content.child_nodes(),
            LayoutKind::Table(table) => table.cells().collect(),
            LayoutKind::Replaced(_) => Vec::new(),
        }
    }
}
