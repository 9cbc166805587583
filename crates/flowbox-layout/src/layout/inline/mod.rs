//! Inline formatting: breaking content into line boxes.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! A block container whose children are not all block-level keeps its inline
//! content here. Each layout of the container:
//!
//! 1. sizes every atomic box (inline-blocks, replaced content, floats),
//! 2. lists the line-break opportunities,
//! 3. fills lines opportunity by opportunity against the slot the floats
//!    leave, placing floats as they are met and handing block-level children
//!    their own full-width line,
//! 4. builds the generated boxes of each finished line and sets its height,
//! 5. aligns the lines.

mod align;
mod boxes;
mod generated;
mod line;
mod measure;

pub use align::justification_offsets;
pub(crate) use boxes::{AtomicPlacement, InlineBox, InlineBoxId, InlineBoxKind};
pub(crate) use generated::{GeneratedBox, GeneratedBoxId, GeneratedKind};
pub(crate) use measure::visible_text;

use std::mem;

use boxes::{walk, InlinePosition};
use generated::generate_line;
use measure::{break_opportunities, is_collapsible_only, IsEmptyLine, SegmentWidth, UnplacedFloat};

use super::block::UNBOUNDED_WIDTH;
use super::box_model::{EdgeSizes, Point, Rect};
use super::cursor::LayoutCursor;
use super::float::FloatSide;
use super::node::{LayoutArena, LayoutKind, LayoutNodeId, StaticPosition};
use super::pass::LayoutPass;
use super::values::{clamp_size, resolve_horizontal, resolve_horizontal_auto, used_to_actual, LayoutStrategy};
use crate::style::{ComputedBox, Float, LengthPercentage, LengthPercentageAuto, Position};

/// Inline boxes of one block container plus the lines of the last layout.
#[derive(Debug, Default)]
pub(crate) struct InlineContent {
    pub boxes: Vec<InlineBox>,
    pub lines: Vec<Line>,
    pub generated: Vec<GeneratedBox>,
}

impl InlineContent {
    /// Nodes laid out as boxes of their own, in document order.
    pub fn child_nodes(&self) -> Vec<LayoutNodeId> {
        self.boxes
            .iter()
            .filter_map(|inline| inline.atomic().map(|(node, _)| node))
            .collect()
    }
}

/// A line box, or the slot of a block-level child between lines.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    /// Root of the line's generated boxes; `None` for a block slot.
    pub root: Option<GeneratedBoxId>,
    /// The slot between the floats; `height` is the line height.
    pub rect: Rect,
    pub baseline: f32,
    /// Ends at a forced break, a block or the end of the content.
    pub hard_break: bool,
    pub block: Option<LayoutNodeId>,
}

impl Line {
    const fn block(node: LayoutNodeId) -> Self {
        Self {
            root: None,
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            baseline: 0.0,
            hard_break: true,
            block: Some(node),
        }
    }
}

/// Where the line being filled stands.
struct LineState {
    start: InlinePosition,
    end: InlinePosition,
    slot: Option<Rect>,
    used: f32,
    start_of_line: bool,
    hard_break: bool,
}

impl LineState {
    const fn new(start: InlinePosition, indent: f32) -> Self {
        Self {
            start,
            end: start,
            slot: None,
            used: indent,
            start_of_line: true,
            hard_break: false,
        }
    }
}

impl LayoutPass<'_> {
    /// Lay out the inline content of `id` at `cursor`.
    pub(crate) fn layout_inline(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor, strategy: LayoutStrategy) {
        let mut content = match &mut self.node_mut(id).kind {
            LayoutKind::Inline(content) => mem::take(&mut **content),
            _ => return,
        };
        self.layout_inline_content(id, &mut content, cursor, strategy);
        if let LayoutKind::Inline(slot) = &mut self.node_mut(id).kind {
            **slot = content;
        }
    }

    fn layout_inline_content(
        &mut self,
        id: LayoutNodeId,
        content: &mut InlineContent,
        cursor: &mut LayoutCursor,
        strategy: LayoutStrategy,
    ) {
        content.lines.clear();
        content.generated.clear();

        // STEP 1: Resolve edges and size every atomic box.
        self.prepare_inline_boxes(id, content, strategy);

        // STEP 2: Line-break opportunities.
        let opportunities = break_opportunities(&content.boxes);
        let end = InlinePosition::end(&content.boxes);

        let (bfc, width) = {
            let node = self.node(id);
            (node.bfc, node.width)
        };
        let root_style = content.boxes[0].style.clone();
        let strut = self.strut_height(&root_style);
        let text_indent = resolve_horizontal(root_style.text_indent, width);
        let measuring = strategy != LayoutStrategy::Normal && width.expanding;

        // STEP 3: Fill lines.
        let mut line_start = InlinePosition::default();
        let mut next = 0;
        while line_start < end {
            if self.layout_block_leaf(id, content, line_start, cursor, strategy) {
                line_start = InlinePosition::before(line_start.index + 1);
                while next < opportunities.len() && opportunities[next].position <= line_start {
                    next += 1;
                }
                continue;
            }

            let y = used_to_actual(cursor.y + cursor.total_margin());
            let indent = if content.lines.is_empty() { text_indent } else { 0.0 };
            let available = if measuring {
                let node = self.node(id);
                clamp_size(UNBOUNDED_WIDTH, node.css_min_width, node.css_max_width)
            } else {
                self.node(id).width.value
            };

            let line_next_start = next;
            let mut line = LineState::new(line_start, indent);
            while next < opportunities.len() {
                let opportunity = opportunities[next];
                let at_start = line.end == line.start;
                let (segment_width, fitting_width, start_of_line) = {
                    let mut segment = SegmentWidth::new(self, line.start_of_line);
                    walk(&content.boxes, line.end, opportunity.position, &mut segment);
                    (segment.width, segment.fitting_width(), segment.start_of_line)
                };
                let slot = *line.slot.get_or_insert_with(|| {
                    self.floats(bfc)
                        .find_line_box(cursor.x, cursor.x + available, y, strut, fitting_width + indent)
                });

                // A segment wider than the whole line still goes on it when
                // nothing precedes it.
                let fits = match strategy {
                    LayoutStrategy::Preferred => true,
                    LayoutStrategy::Minimum => at_start,
                    LayoutStrategy::Normal => at_start || line.used + fitting_width <= slot.width + 0.01,
                };
                if !fits {
                    break;
                }

                // A float met on this line is placed right away and the line
                // starts over in the space it leaves.
                let mut finder = UnplacedFloat::default();
                walk(&content.boxes, line.end, opportunity.position, &mut finder);
                if let Some((inline, node)) = finder.found {
                    self.place_inline_float(id, node, cursor, slot.y, strategy);
                    content.boxes[inline.0].placed = true;
                    line = LineState::new(line_start, indent);
                    next = line_next_start;
                    continue;
                }

                line.used += segment_width;
                line.end = opportunity.position;
                line.start_of_line = start_of_line;
                next += 1;
                let before_block = content
                    .boxes
                    .get(line.end.index)
                    .is_some_and(|inline| line.end.offset == 0 && inline.is_block_leaf());
                if opportunity.hard || before_block {
                    line.hard_break = true;
                    break;
                }
            }

            if line.end == line.start && next >= opportunities.len() {
                break;
            }

            // STEP 4: Generated boxes and line height.
            let mut empty = IsEmptyLine { empty: true };
            walk(&content.boxes, line.start, line.end, &mut empty);
            if !empty.empty {
                let slot = line.slot.unwrap_or_else(|| Rect::new(cursor.x, y, available, strut));
                let root = generate_line(&content.boxes, &mut content.generated, line.start, line.end);
                let metrics = self.layout_line(&content.boxes, &mut content.generated, root, slot, indent);
                let height = metrics.ascent + metrics.descent;
                cursor.apply_margin();
                cursor.y = slot.y + height;
                content.lines.push(Line {
                    root: Some(root),
                    rect: Rect::new(slot.x, slot.y, slot.width, height),
                    baseline: slot.y + metrics.ascent,
                    hard_break: line.hard_break || line.end == end,
                    block: None,
                });
                log::trace!(
                    target: "flowbox::inline",
                    "line {} {strategy}: {:?}..{:?} slot={slot:?} height={height}",
                    content.lines.len(),
                    line.start,
                    line.end
                );
                if measuring {
                    let right = content.generated[root.0].rect.right() - cursor.x;
                    let node = self.node_mut(id);
                    node.width.value = node.width.value.max(right);
                }
            }
            line_start = line.end;
        }

        // STEP 5: Alignment.
        if strategy == LayoutStrategy::Normal {
            for line in &content.lines {
                if let Some(root) = line.root {
                    self.align_line(
                        &content.boxes,
                        &mut content.generated,
                        root,
                        line.rect,
                        root_style.text_align,
                        line.hard_break,
                    );
                }
            }
        }

        // STEP 6: Inline-level atomic boxes sit where their line put them.
        for generated in &content.generated {
            if let GeneratedKind::Atomic(node) = generated.kind {
                if !generated.floated {
                    self.set_root_block_position(node, generated.rect.x, generated.rect.y);
                }
            }
        }
    }

    /// A block-level or positioned leaf at `position` takes no line space:
    /// blocks get a slot of their own, positioned boxes record their static
    /// position.
    fn layout_block_leaf(
        &mut self,
        id: LayoutNodeId,
        content: &mut InlineContent,
        position: InlinePosition,
        cursor: &mut LayoutCursor,
        strategy: LayoutStrategy,
    ) -> bool {
        let Some((node, placement)) = content
            .boxes
            .get(position.index)
            .filter(|_| position.offset == 0)
            .and_then(InlineBox::atomic)
        else {
            return false;
        };
        match placement {
            AtomicPlacement::Block => {
                content.lines.push(Line::block(node));
                let relative = mem::replace(&mut cursor.relative, content.boxes[position.index].relative);
                self.layout_block_child(id, node, cursor, strategy);
                cursor.relative = relative;
                true
            }
            AtomicPlacement::OutOfFlow => {
                let context = self.node(id).bfc;
                self.node_mut(node).static_position = Some(StaticPosition {
                    point: Point::new(cursor.x, cursor.y + cursor.total_margin()),
                    context,
                });
                true
            }
            AtomicPlacement::Inline | AtomicPlacement::Float(_) => false,
        }
    }

    /// Relative offsets and edges of the inline boxes, and the size of every
    /// atomic box at the container's width.
    fn prepare_inline_boxes(&mut self, id: LayoutNodeId, content: &mut InlineContent, strategy: LayoutStrategy) {
        let (width, height, relative) = {
            let node = self.node(id);
            (node.width, node.height, node.relative)
        };
        for index in 0..content.boxes.len() {
            let parent_relative = content.boxes[index]
                .parent
                .map_or(relative, |parent| content.boxes[parent.0].relative);
            let inline = &mut content.boxes[index];
            inline.placed = false;
            match inline.kind {
                InlineBoxKind::Root => inline.relative = relative,
                InlineBoxKind::Text => inline.relative = parent_relative,
                InlineBoxKind::Element => {
                    let offset = if inline.style.position == Position::Relative {
                        super::block::relative_offset(&inline.style, width, height)
                    } else {
                        Point::default()
                    };
                    inline.relative = Point::new(parent_relative.x + offset.x, parent_relative.y + offset.y);
                    let style = &inline.style;
                    inline.margin = EdgeSizes {
                        top: resolve_horizontal_auto(style.margin_top, width),
                        right: resolve_horizontal_auto(style.margin_right, width),
                        bottom: resolve_horizontal_auto(style.margin_bottom, width),
                        left: resolve_horizontal_auto(style.margin_left, width),
                    };
                    inline.border = EdgeSizes {
                        top: style.border_top_width,
                        right: style.border_right_width,
                        bottom: style.border_bottom_width,
                        left: style.border_left_width,
                    };
                    inline.padding = EdgeSizes {
                        top: resolve_horizontal(style.padding_top, width),
                        right: resolve_horizontal(style.padding_right, width),
                        bottom: resolve_horizontal(style.padding_bottom, width),
                        left: resolve_horizontal(style.padding_left, width),
                    };
                }
                InlineBoxKind::Atomic { node, placement } => {
                    inline.relative = parent_relative;
                    {
                        let child = self.node_mut(node);
                        child.containing_width = width;
                        child.containing_height = height;
                    }
                    let offset = self.local_relative_offset(node);
                    self.node_mut(node).relative =
                        Point::new(parent_relative.x + offset.x, parent_relative.y + offset.y);
                    if matches!(placement, AtomicPlacement::Inline | AtomicPlacement::Float(_)) {
                        self.layout_float(node, strategy);
                    }
                }
            }
        }
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// "The outer top of a floating box may not be higher than the top of
    /// any line-box containing a box generated by an element earlier in the
    /// source document."
    fn place_inline_float(
        &mut self,
        container: LayoutNodeId,
        float: LayoutNodeId,
        cursor: &LayoutCursor,
        y: f32,
        strategy: LayoutStrategy,
    ) {
        let (bfc, width) = {
            let node = self.node(container);
            (node.bfc, node.width)
        };
        let node = self.node(float);
        let (float_width, float_height) = (node.block_width(), node.block_height());
        let side = if node.style.float == Float::Right {
            FloatSide::Right
        } else {
            FloatSide::Left
        };
        let measuring = strategy != LayoutStrategy::Normal && width.expanding;
        let limit = if measuring { UNBOUNDED_WIDTH } else { width.value };

        let floats = self.floats_mut(bfc);
        let placed = match side {
            FloatSide::Left => floats.float_left(Rect::new(cursor.x, y, float_width, float_height), cursor.x + limit),
            FloatSide::Right if measuring => floats.float_right_shrink_to_fit(
                Rect::new(cursor.x, y, float_width, float_height),
                cursor.x + limit,
            ),
            FloatSide::Right => floats.float_right(
                Rect::new(cursor.x + limit - float_width, y, float_width, float_height),
                cursor.x,
            ),
        };
        if measuring {
            let node = self.node_mut(container);
            node.width.value = node.width.value.max(placed.right() - cursor.x);
        }
        self.set_root_block_position(float, placed.x, placed.y);
    }

    /// Collapse the top margins of the leading blocks of inline content.
    /// Returns `true` once something that forms a line is found.
    pub(crate) fn add_inline_content_margin_top(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor) -> bool {
        let leading_blocks = {
            let LayoutKind::Inline(content) = &self.node(id).kind else {
                return false;
            };
            let mut blocks = Vec::new();
            let mut stopped = false;
            for inline in content.boxes.iter().skip(1) {
                let forms_line = match inline.kind {
                    InlineBoxKind::Root => false,
                    InlineBoxKind::Text => !is_collapsible_only(&inline.text, inline.style.white_space),
                    InlineBoxKind::Element => has_inline_edges(&inline.style),
                    InlineBoxKind::Atomic { node, placement } => {
                        if placement == AtomicPlacement::Block {
                            blocks.push(node);
                        }
                        placement == AtomicPlacement::Inline
                    }
                };
                if forms_line {
                    stopped = true;
                    break;
                }
            }
            (blocks, stopped)
        };

        let (blocks, stopped) = leading_blocks;
        for block in blocks {
            if self.add_margin_top(block, cursor) {
                return true;
            }
        }
        stopped
    }
}

/// Non-zero margin, border or padding keeps an otherwise empty line.
fn has_inline_edges(style: &ComputedBox) -> bool {
    let margin = |value: LengthPercentageAuto| !matches!(value, LengthPercentageAuto::Length(px) if px == 0.0) && !value.is_auto();
    let padding = |value: LengthPercentage| !matches!(value, LengthPercentage::Length(px) if px == 0.0);
    style.border_left_width > 0.0
        || style.border_right_width > 0.0
        || margin(style.margin_left)
        || margin(style.margin_right)
        || padding(style.padding_left)
        || padding(style.padding_right)
}

// ─────────────────────────────────────────────────────────────────────────────
// Baselines
// ─────────────────────────────────────────────────────────────────────────────

impl LayoutArena {
    /// Baseline of the first line box inside `id`, from its content top.
    pub fn first_baseline(&self, id: LayoutNodeId) -> Option<f32> {
        self.baseline(id, true)
    }

    /// Baseline of the last line box inside `id`, from its content top.
    pub fn last_baseline(&self, id: LayoutNodeId) -> Option<f32> {
        self.baseline(id, false)
    }

    /// Top of the content box in the coordinates its children use.
    fn content_top(&self, id: LayoutNodeId) -> f32 {
        let node = self.node(id);
        if node.is_root { 0.0 } else { node.content_box.y }
    }

    fn baseline(&self, id: LayoutNodeId, first: bool) -> Option<f32> {
        let top = self.content_top(id);
        let from_child = |child: LayoutNodeId| {
            self.baseline(child, first)
                .map(|baseline| baseline + self.node(child).content_box.y - top)
        };
        match &self.node(id).kind {
            LayoutKind::Inline(content) => {
                let from_line = |line: &Line| match line.block {
                    Some(block) => from_child(block),
                    None => Some(line.baseline - top),
                };
                if first {
                    content.lines.iter().find_map(from_line)
                } else {
                    content.lines.iter().rev().find_map(from_line)
                }
            }
            LayoutKind::Block(children) => {
                let in_flow = |child: &&LayoutNodeId| {
                    let child = self.node(**child);
                    !child.is_floated() && !child.is_out_of_flow()
                };
                if first {
                    children.iter().filter(in_flow).find_map(|child| from_child(*child))
                } else {
                    children.iter().rev().filter(in_flow).find_map(|child| from_child(*child))
                }
            }
            LayoutKind::Table(table) => {
                let cells: Vec<LayoutNodeId> = if first {
                    table.rows.first().map(|row| row.cells.clone()).unwrap_or_default()
                } else {
                    table.rows.last().map(|row| row.cells.clone()).unwrap_or_default()
                };
                cells.into_iter().find_map(from_child)
            }
            LayoutKind::Replaced(_) => None,
        }
    }
}
