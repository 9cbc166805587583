//! Generated boxes: the per-line fragments of inline boxes.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "When an inline box exceeds the width of a line box, it is split into
//! several boxes and these boxes are distributed across several line boxes."
//!
//! Each finished line owns a small tree of [`GeneratedBox`]es rooted at a
//! [`GeneratedKind::Line`] box. An element split by a line boundary shows up
//! on both lines, without its closing edge on the first and without its
//! opening edge on the second.

use std::ops::Range;

use flowbox_tree::NodeId;

use super::boxes::{open_ancestors, walk, AtomicPlacement, InlineBox, InlineBoxId, InlinePosition, InlineVisitor};
use super::measure::strips_leading_spaces;
use crate::layout::box_model::Rect;
use crate::layout::node::LayoutNodeId;

/// Index into the generated box arena of one inline container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GeneratedBoxId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeneratedKind {
    Line,
    Element,
    Text,
    Atomic(LayoutNodeId),
}

#[derive(Debug, Clone)]
pub(crate) struct GeneratedBox {
    pub node: NodeId,
    pub inline_box: InlineBoxId,
    pub kind: GeneratedKind,
    /// Byte range of the text run shown by this box.
    pub range: Range<usize>,
    /// Text: content area. Element: border box. Atomic: margin box.
    pub rect: Rect,
    /// Extent above and below the baseline, half-leading included.
    pub ascent: f32,
    pub descent: f32,
    /// Baseline shift from the line's baseline, positive downward.
    pub baseline_offset: f32,
    /// The element's left edge is on this line.
    pub opening: bool,
    /// The element's right edge is on this line.
    pub closing: bool,
    /// A float anchored here; takes no room on the line.
    pub floated: bool,
    pub parent: Option<GeneratedBoxId>,
    pub children: Vec<GeneratedBoxId>,
}

impl GeneratedBox {
    pub fn new(inline: &InlineBox, inline_box: InlineBoxId, kind: GeneratedKind, parent: Option<GeneratedBoxId>) -> Self {
        Self {
            node: inline.node,
            inline_box,
            kind,
            range: 0..0,
            rect: Rect::default(),
            ascent: 0.0,
            descent: 0.0,
            baseline_offset: 0.0,
            opening: false,
            closing: false,
            floated: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, GeneratedKind::Text | GeneratedKind::Atomic(_))
    }
}

/// Builds the generated box tree of one line.
struct GenerateLine<'g> {
    generated: &'g mut Vec<GeneratedBox>,
    stack: Vec<GeneratedBoxId>,
    leaves: Vec<GeneratedBoxId>,
    start_of_line: bool,
}

impl GenerateLine<'_> {
    fn push(&mut self, generated: GeneratedBox) -> GeneratedBoxId {
        let id = GeneratedBoxId(self.generated.len());
        if let Some(parent) = generated.parent {
            self.generated[parent.0].children.push(id);
        }
        self.generated.push(generated);
        id
    }

    fn parent(&self) -> Option<GeneratedBoxId> {
        self.stack.last().copied()
    }
}

impl InlineVisitor for GenerateLine<'_> {
    fn open(&mut self, id: InlineBoxId, inline: &InlineBox) -> bool {
        let mut element = GeneratedBox::new(inline, id, GeneratedKind::Element, self.parent());
        element.opening = true;
        let element = self.push(element);
        self.stack.push(element);
        true
    }

    fn close(&mut self, _id: InlineBoxId, _inline: &InlineBox) -> bool {
        if self.stack.len() > 1 {
            if let Some(element) = self.stack.pop() {
                self.generated[element.0].closing = true;
            }
        }
        true
    }

    fn text(&mut self, id: InlineBoxId, inline: &InlineBox, range: Range<usize>) -> bool {
        let mut range = range;
        if self.start_of_line && strips_leading_spaces(inline.style.white_space) {
            let skipped = inline.text[range.clone()].len() - inline.text[range.clone()].trim_start_matches(' ').len();
            range.start += skipped;
        }
        if range.is_empty() {
            return true;
        }
        if inline.text[range.clone()].chars().any(|c| c != ' ') {
            self.start_of_line = false;
        }
        let mut text = GeneratedBox::new(inline, id, GeneratedKind::Text, self.parent());
        text.range = range;
        let text = self.push(text);
        self.leaves.push(text);
        true
    }

    fn atomic(&mut self, id: InlineBoxId, inline: &InlineBox) -> bool {
        let Some((node, placement)) = inline.atomic() else {
            return true;
        };
        let floated = match placement {
            AtomicPlacement::Inline => false,
            AtomicPlacement::Float(_) => true,
            AtomicPlacement::Block | AtomicPlacement::OutOfFlow => return true,
        };
        let mut atomic = GeneratedBox::new(inline, id, GeneratedKind::Atomic(node), self.parent());
        atomic.floated = floated;
        let atomic = self.push(atomic);
        if !floated {
            self.start_of_line = false;
            self.leaves.push(atomic);
        }
        true
    }
}

/// Build the generated boxes for the content between `start` and `end` and
/// return the line box at their root.
///
/// Leading spaces are stripped at the start of the line; trailing
/// collapsible spaces are trimmed off the end.
pub(crate) fn generate_line(
    boxes: &[InlineBox],
    generated: &mut Vec<GeneratedBox>,
    start: InlinePosition,
    end: InlinePosition,
) -> GeneratedBoxId {
    let root = GeneratedBoxId(generated.len());
    generated.push(GeneratedBox::new(&boxes[0], InlineBoxId(0), GeneratedKind::Line, None));

    let mut visitor = GenerateLine {
        generated,
        stack: vec![root],
        leaves: Vec::new(),
        start_of_line: true,
    };
    // Elements opened on an earlier line continue here without their
    // opening edge.
    for ancestor in open_ancestors(boxes, start.index) {
        let continued = GeneratedBox::new(&boxes[ancestor.0], ancestor, GeneratedKind::Element, visitor.parent());
        let continued = visitor.push(continued);
        visitor.stack.push(continued);
    }
    walk(boxes, start, end, &mut visitor);

    // "If a space (U+0020) at the end of a line has 'white-space' set to
    // 'normal', 'nowrap', or 'pre-line', it is also removed."
    let leaves = visitor.leaves;
    for leaf in leaves.into_iter().rev() {
        let generated_box = &mut generated[leaf.0];
        if generated_box.kind != GeneratedKind::Text {
            break;
        }
        let inline = &boxes[generated_box.inline_box.0];
        if !inline.style.white_space.collapses_spaces() {
            break;
        }
        let shown = &inline.text[generated_box.range.clone()];
        let trimmed = shown.trim_end_matches([' ', '\n']);
        generated_box.range.end = generated_box.range.start + trimmed.len();
        if !trimmed.is_empty() {
            break;
        }
    }
    root
}
