//! Painter - walks the layout arena in painting order.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Each stacking context is painted as:
//!
//! 1. the background and borders of the element forming it,
//! 2. child stacking contexts with negative stack levels,
//! 3. in-flow, non-positioned block-level descendants, in tree order,
//! 4. non-positioned floats, each painted atomically,
//! 5. in-flow inline-level content: line boxes, inline-blocks and replaced
//!    content,
//! 6. positioned descendants with 'z-index: auto', each painted atomically,
//! 7. child stacking contexts with stack levels of zero or more.

use std::ops::Range;

use super::{GraphicsSink, TextRun};
use crate::layout::inline::{GeneratedBox, GeneratedBoxId, GeneratedKind, InlineBox, InlineContent, visible_text};
use crate::layout::node::{LayoutArena, LayoutKind, LayoutNodeId};
use crate::layout::stacking::StackingContextId;
use crate::layout::{BoxGeometry, EdgeSizes, Point, Rect};
use crate::style::{Display, ListStyleType, Overflow, Visibility};

/// The descendant layers painted after the element's own box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Blocks,
    Floats,
    Inline,
    Positioned,
}

/// How a node takes part in the painting of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    /// Painted by its own stacking context.
    Context,
    Positioned,
    Float,
    InlineAtomic,
    Block,
}

pub(crate) struct Painter<'a> {
    arena: &'a LayoutArena,
}

impl<'a> Painter<'a> {
    pub const fn new(arena: &'a LayoutArena) -> Self {
        Self { arena }
    }

    /// Paint the stacking context of `root` and everything in it.
    pub fn paint(&self, root: LayoutNodeId, sink: &mut dyn GraphicsSink) {
        self.paint_stacking_context(self.arena.node(root).stacking, sink);
    }

    fn paint_stacking_context(&self, context: StackingContextId, sink: &mut dyn GraphicsSink) {
        let Some(root) = self.arena.stacking.get(context).root else {
            return;
        };
        let children = self.arena.stacking.children_by_z(context);
        let (negative, rest): (Vec<_>, Vec<_>) = children
            .into_iter()
            .partition(|child| self.arena.stacking.get(*child).z_index < 0);

        // STEP 1: The element's own box.
        self.paint_own_box(root, sink);
        // STEP 2: "the child stacking contexts with negative stack levels"
        for child in negative {
            self.paint_stacking_context(child, sink);
        }
        // STEP 3-6
        self.paint_descendants(root, sink);
        // STEP 7: "the child stacking contexts with positive stack levels"
        for child in rest {
            self.paint_stacking_context(child, sink);
        }
    }

    /// Paint a box "as if it created a new stacking context", except that
    /// positioned descendants and real stacking contexts stay with the
    /// enclosing context.
    fn paint_atomically(&self, id: LayoutNodeId, sink: &mut dyn GraphicsSink) {
        self.paint_own_box(id, sink);
        self.paint_descendants(id, sink);
    }

    fn paint_descendants(&self, id: LayoutNodeId, sink: &mut dyn GraphicsSink) {
        for phase in [Phase::Blocks, Phase::Floats, Phase::Inline, Phase::Positioned] {
            self.paint_phase(id, phase, sink);
        }
    }

    fn layer(&self, id: LayoutNodeId) -> Layer {
        let node = self.arena.node(id);
        if node.establishes_stacking {
            Layer::Context
        } else if node.is_positioned() {
            Layer::Positioned
        } else if node.is_floated() {
            Layer::Float
        } else if node.is_inline_block() {
            Layer::InlineAtomic
        } else {
            Layer::Block
        }
    }

    fn paint_phase(&self, id: LayoutNodeId, phase: Phase, sink: &mut dyn GraphicsSink) {
        let node = self.arena.node(id);
        let clip = node.style.overflow != Overflow::Visible;
        if clip {
            let geometry = self.arena.absolute_geometry(id);
            sink.push_clip(geometry.padding_box());
        }

        if phase == Phase::Inline {
            if let LayoutKind::Inline(content) = &node.kind {
                self.paint_lines(id, content, sink);
            }
        }
        for child in self.arena.children(id) {
            match (self.layer(child), phase) {
                (Layer::Block, Phase::Blocks) => {
                    self.paint_own_box(child, sink);
                    self.paint_phase(child, phase, sink);
                }
                (Layer::Block, _) => self.paint_phase(child, phase, sink),
                (Layer::Float, Phase::Floats)
                | (Layer::InlineAtomic, Phase::Inline)
                | (Layer::Positioned, Phase::Positioned) => self.paint_atomically(child, sink),
                _ => {}
            }
        }

        if clip {
            sink.pop_clip();
        }
    }

    /// Background, borders, marker and replaced content of one box.
    fn paint_own_box(&self, id: LayoutNodeId, sink: &mut dyn GraphicsSink) {
        let node = self.arena.node(id);
        // [§ 11.2 Visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
        //
        // "The generated box is invisible (fully transparent, nothing is
        // drawn), but still affects layout. Descendants of the element will
        // be visible if they have 'visibility: visible'."
        if node.style.visibility == Visibility::Hidden {
            return;
        }
        let geometry = self.arena.absolute_geometry(id);
        sink.draw_box(node.node, &geometry);

        if let LayoutKind::Replaced(content) = &node.kind {
            sink.draw_image(node.node, geometry.content, &content.source);
        }
        if node.style.display == Display::ListItem && node.style.list_style_type != ListStyleType::None {
            self.paint_marker(id, &geometry, sink);
        }
    }

    /// [§ 12.5.1 Lists](https://www.w3.org/TR/CSS2/generate.html#propdef-list-style-type)
    ///
    /// "disc: A disc (exact presentation is UA-dependent)". Drawn outside
    /// the principal box, centred on the first line.
    fn paint_marker(&self, id: LayoutNodeId, geometry: &BoxGeometry, sink: &mut dyn GraphicsSink) {
        let node = self.arena.node(id);
        let font_size = node.style.font_size;
        let size = (font_size / 3.0).round();
        let baseline = self
            .arena
            .first_baseline(id)
            .map_or(geometry.content.y + font_size, |baseline| geometry.content.y + baseline);
        let rect = Rect::new(
            geometry.border_box().x - font_size * 0.5 - size,
            baseline - font_size * 0.3 - size / 2.0,
            size,
            size,
        );
        sink.draw_marker(node.node, rect, node.style.list_style_type);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Line boxes
    // ─────────────────────────────────────────────────────────────────────

    fn paint_lines(&self, id: LayoutNodeId, content: &InlineContent, sink: &mut dyn GraphicsSink) {
        let origin = self.arena.content_origin(id);
        for line in &content.lines {
            if let Some(root) = line.root {
                let baseline = line.baseline;
                self.paint_generated(content, root, origin, baseline, sink);
            }
        }
    }

    fn paint_generated(
        &self,
        content: &InlineContent,
        id: GeneratedBoxId,
        origin: Point,
        baseline: f32,
        sink: &mut dyn GraphicsSink,
    ) {
        let generated = &content.generated[id.0];
        let inline = &content.boxes[generated.inline_box.0];
        let dx = origin.x + inline.relative.x;
        let dy = origin.y + inline.relative.y;
        let visible = inline.style.visibility == Visibility::Visible;
        match generated.kind {
            GeneratedKind::Element if visible => {
                sink.draw_box(generated.node, &fragment_geometry(generated, inline, dx, dy));
            }
            GeneratedKind::Text if visible => {
                let text = visible_text(&inline.text[generated.range.clone()]);
                if !text.is_empty() {
                    let run = TextRun {
                        rect: generated.rect.translate(dx, dy),
                        origin: Point::new(generated.rect.x + dx, baseline + generated.baseline_offset + dy),
                        text,
                        font: inline.style.font(),
                        selection: run_selection(inline, generated.range.clone()),
                    };
                    sink.draw_text(generated.node, &run);
                }
            }
            _ => {}
        }
        for child in &generated.children {
            self.paint_generated(content, *child, origin, baseline, sink);
        }
    }
}

/// The part of the selection of `inline` inside the fragment `range`, in
/// bytes of the drawn text.
fn run_selection(inline: &InlineBox, range: Range<usize>) -> Option<Range<usize>> {
    let selection = inline.selection.as_ref()?;
    let start = selection.start.clamp(range.start, range.end);
    let end = selection.end.clamp(range.start, range.end);
    if start >= end {
        return None;
    }
    let from = visible_text(&inline.text[range.start..start]).len();
    Some(from..from + visible_text(&inline.text[start..end]).len())
}

/// Geometry of one line fragment of an inline box. An edge the element was
/// split at has no border, padding or margin.
fn fragment_geometry(generated: &GeneratedBox, inline: &InlineBox, dx: f32, dy: f32) -> BoxGeometry {
    let split = |edges: EdgeSizes| EdgeSizes {
        left: if generated.opening { edges.left } else { 0.0 },
        right: if generated.closing { edges.right } else { 0.0 },
        ..edges
    };
    let padding = split(inline.padding);
    let border = split(inline.border);
    let margin = split(inline.margin);
    let border_box = generated.rect.translate(dx, dy);
    let inset = padding.plus(border);
    BoxGeometry {
        content: Rect::new(
            border_box.x + inset.left,
            border_box.y + inset.top,
            (border_box.width - inset.horizontal()).max(0.0),
            (border_box.height - inset.vertical()).max(0.0),
        ),
        padding,
        border,
        margin,
    }
}
