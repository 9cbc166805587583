//! The inline box arena of one block container.
//!
//! [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
//!
//! "Inline-level elements are those elements of the source document that
//! do not form new blocks of content; the content is distributed in lines."
//!
//! Inline elements and text runs are flattened into a pre-order `Vec`.
//! Box 0 is the container itself; every element records `end`, one past its
//! last descendant, so a subtree is the index range `id..end`. Anything that
//! is laid out as a box of its own (inline-blocks, replaced content, floats,
//! blocks inside inlines, positioned boxes) appears as an atomic leaf that
//! points at its [`LayoutNodeId`].

use std::ops::Range;

use flowbox_tree::NodeId;

use crate::layout::box_model::{EdgeSizes, Point};
use crate::layout::float::FloatSide;
use crate::layout::node::LayoutNodeId;
use crate::style::ComputedBox;

/// Index into the inline box arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct InlineBoxId(pub usize);

/// How an atomic leaf takes part in the inline flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AtomicPlacement {
    /// Inline-block, inline-table or inline replaced content: sits on a line.
    Inline,
    /// Block-level box inside inline content: gets a line of its own.
    Block,
    /// Taken out of the line and floated to one side.
    Float(FloatSide),
    /// Absolutely or fixed positioned: only its static position is recorded.
    OutOfFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineBoxKind {
    /// The block container; never opened or closed by a walk.
    Root,
    Element,
    Text,
    Atomic {
        node: LayoutNodeId,
        placement: AtomicPlacement,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct InlineBox {
    pub node: NodeId,
    pub kind: InlineBoxKind,
    /// Text runs carry the style of their parent element.
    pub style: ComputedBox,
    /// Processed text of a text run, empty otherwise.
    pub text: String,
    /// Selected bytes of `text`.
    pub selection: Option<Range<usize>>,
    pub parent: Option<InlineBoxId>,
    /// One past the last descendant.
    pub end: usize,
    /// Accumulated relative offset, including the container's.
    pub relative: Point,
    pub margin: EdgeSizes,
    pub border: EdgeSizes,
    pub padding: EdgeSizes,
    /// Floats: already placed during the current pass.
    pub placed: bool,
}

impl InlineBox {
    pub fn new(node: NodeId, kind: InlineBoxKind, style: ComputedBox, parent: Option<InlineBoxId>) -> Self {
        Self {
            node,
            kind,
            style,
            text: String::new(),
            selection: None,
            parent,
            end: 0,
            relative: Point::default(),
            margin: EdgeSizes::default(),
            border: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            placed: false,
        }
    }

    pub const fn atomic(&self) -> Option<(LayoutNodeId, AtomicPlacement)> {
        match self.kind {
            InlineBoxKind::Atomic { node, placement } => Some((node, placement)),
            _ => None,
        }
    }

    /// A block-level or out-of-flow leaf that interrupts the lines.
    pub fn is_block_leaf(&self) -> bool {
        matches!(
            self.atomic(),
            Some((_, AtomicPlacement::Block | AtomicPlacement::OutOfFlow))
        )
    }
}

/// A point in the inline content: before box `index`, or at byte `offset`
/// of text run `index`.
///
/// Positions order lexicographically, which is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub(crate) struct InlinePosition {
    pub index: usize,
    pub offset: usize,
}

impl InlinePosition {
    pub const fn before(index: usize) -> Self {
        Self { index, offset: 0 }
    }

    /// The position after the last box of `boxes`.
    pub const fn end(boxes: &[InlineBox]) -> Self {
        Self::before(boxes.len())
    }

    /// The end of a text run is the start of whatever follows it, so a
    /// break there closes the elements that end with the run.
    pub fn normalized(self, boxes: &[InlineBox]) -> Self {
        match boxes.get(self.index) {
            Some(inline) if inline.kind == InlineBoxKind::Text && self.offset >= inline.text.len() => {
                Self::before(self.index + 1)
            }
            _ => self,
        }
    }
}

/// Callbacks for [`walk`]. Returning `false` stops the walk.
pub(crate) trait InlineVisitor {
    fn open(&mut self, _id: InlineBoxId, _inline: &InlineBox) -> bool {
        true
    }

    fn close(&mut self, _id: InlineBoxId, _inline: &InlineBox) -> bool {
        true
    }

    fn text(&mut self, _id: InlineBoxId, _inline: &InlineBox, _range: Range<usize>) -> bool {
        true
    }

    fn atomic(&mut self, _id: InlineBoxId, _inline: &InlineBox) -> bool {
        true
    }
}

/// Ancestors of `index`, outermost first, without the root.
pub(crate) fn open_ancestors(boxes: &[InlineBox], index: usize) -> Vec<InlineBoxId> {
    let mut chain = Vec::new();
    let mut parent = boxes.get(index).and_then(|inline| inline.parent);
    while let Some(id) = parent {
        if boxes[id.0].kind == InlineBoxKind::Root {
            break;
        }
        chain.push(id);
        parent = boxes[id.0].parent;
    }
    chain.reverse();
    chain
}

/// Visit the content between `start` and `end` in document order.
///
/// Elements that are already open at `start` are not reported as opened;
/// elements still open at `end` are only closed when `end` is the end of
/// the content.
pub(crate) fn walk(boxes: &[InlineBox], start: InlinePosition, end: InlinePosition, visitor: &mut dyn InlineVisitor) {
    let mut stack = open_ancestors(boxes, start.index);
    let mut index = start.index;

    while index < boxes.len() {
        while let Some(&top) = stack.last() {
            if boxes[top.0].end > index {
                break;
            }
            let _ = stack.pop();
            if !visitor.close(top, &boxes[top.0]) {
                return;
            }
        }
        if index > end.index || (index == end.index && end.offset == 0) {
            return;
        }

        let id = InlineBoxId(index);
        let inline = &boxes[index];
        let keep_going = match inline.kind {
            InlineBoxKind::Root => true,
            InlineBoxKind::Element => {
                stack.push(id);
                visitor.open(id, inline)
            }
            InlineBoxKind::Text => {
                let from = if index == start.index { start.offset } else { 0 };
                let to = if index == end.index {
                    end.offset.min(inline.text.len())
                } else {
                    inline.text.len()
                };
                from >= to || visitor.text(id, inline, from..to)
            }
            InlineBoxKind::Atomic { .. } => visitor.atomic(id, inline),
        };
        if !keep_going || index == end.index {
            return;
        }
        index += 1;
    }

    while let Some(top) = stack.pop() {
        if !visitor.close(top, &boxes[top.0]) {
            return;
        }
    }
}
