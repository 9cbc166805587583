//! Block-level layout and the width-resolution protocol.
//!
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! Every node resolves its widths and heights for an explicit
//! [`LayoutStrategy`]. Shrink-to-fit boxes run the content once under
//! [`LayoutStrategy::Minimum`], once under [`LayoutStrategy::Preferred`], and
//! then for real under [`LayoutStrategy::Normal`] at
//! `min(max(minimum, available), preferred)`.

use super::box_model::{EdgeSizes, Point, Rect};
use super::cursor::LayoutCursor;
use super::formatting_context::FormattingContextId;
use super::node::{LayoutKind, LayoutNode, LayoutNodeId};
use super::pass::LayoutPass;
use super::values::{
    clamp_size, resolve_horizontal, resolve_horizontal_auto, resolve_max_height,
    resolve_max_width, resolve_vertical, resolve_vertical_auto, used_to_actual, LayoutStrategy,
    UsedHeight, UsedWidth,
};
use crate::style::{Clear, ComputedBox, Direction, LengthPercentageAuto, Position};

#[cfg(feature = "layout-trace")]
use super::pass::DepthGuard;

/// Line width used while measuring the preferred width of a box whose
/// width is still expanding.
pub(crate) const UNBOUNDED_WIDTH: f32 = 1e6;

/// Vertical margin, border and padding resolved from style alone.
///
/// Margin collapsing looks ahead into children before their widths have
/// been resolved, so these come straight from the computed values.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct VerticalEdges {
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub border_top: f32,
    pub border_bottom: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
}

impl LayoutPass<'_> {
    // ─────────────────────────────────────────────────────────────────────
    // Widths and heights
    // ─────────────────────────────────────────────────────────────────────

    /// Resolve the used width, margins, borders and padding of `id`.
    pub(crate) fn calculate_top_down_widths(&mut self, id: LayoutNodeId, strategy: LayoutStrategy) {
        let node = self.node(id);
        if node.is_replaced() {
            self.calculate_replaced_widths(id);
        } else if node.is_out_of_flow() {
            self.calculate_absolute_widths(id);
        } else {
            self.calculate_static_widths(id, strategy);
        }
    }

    /// Resolve the used height of `id` (or mark it content-sized).
    pub(crate) fn calculate_top_down_heights(&mut self, id: LayoutNodeId) {
        let node = self.node(id);
        if node.is_replaced() {
            self.calculate_replaced_heights(id);
        } else if node.is_out_of_flow() {
            self.calculate_absolute_heights(id);
        } else {
            self.calculate_static_heights(id);
        }
    }

    /// Margins, borders and padding: horizontal ones and vertical ones both
    /// resolve percentages against the containing width.
    ///
    /// [§ 8.3](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "The percentage is calculated with respect to the width of the
    /// generated box's containing block. Note that this is true for
    /// 'margin-top' and 'margin-bottom' as well."
    pub(crate) fn resolve_edges(&mut self, id: LayoutNodeId) {
        let node = self.node_mut(id);
        let cw = node.containing_width;
        let style = &node.style;
        let margin = EdgeSizes {
            top: resolve_horizontal_auto(style.margin_top, cw),
            right: resolve_horizontal_auto(style.margin_right, cw),
            bottom: resolve_horizontal_auto(style.margin_bottom, cw),
            left: resolve_horizontal_auto(style.margin_left, cw),
        };
        let border = EdgeSizes {
            top: style.border_top_width,
            right: style.border_right_width,
            bottom: style.border_bottom_width,
            left: style.border_left_width,
        };
        let padding = EdgeSizes {
            top: resolve_horizontal(style.padding_top, cw),
            right: resolve_horizontal(style.padding_right, cw),
            bottom: resolve_horizontal(style.padding_bottom, cw),
            left: resolve_horizontal(style.padding_left, cw),
        };
        node.css_min_width = resolve_horizontal(style.min_width, cw);
        node.css_max_width = resolve_max_width(style.max_width, cw);
        node.margin = margin;
        node.border = border;
        node.padding = padding;
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right' = width of
    /// containing block"
    ///
    /// Floats, inline-blocks and table cells with `width: auto` are
    /// shrink-to-fit; their width stays `expanding` until measured.
    pub(crate) fn calculate_static_widths(&mut self, id: LayoutNodeId, strategy: LayoutStrategy) {
        self.resolve_edges(id);
        let node = self.node_mut(id);
        let cw = node.containing_width;
        let shrinks = node.is_floated() || node.is_table_cell() || node.is_inline_block();
        let mbp = node.horizontal_mbp();

        // STEP 1: Tentative width.
        let mut width = match node.style.width {
            LengthPercentageAuto::Length(px) => UsedWidth::fixed(px),
            LengthPercentageAuto::Percentage(pct) if !cw.expanding => {
                UsedWidth::fixed(cw.value * pct / 100.0)
            }
            LengthPercentageAuto::Percentage(_) => UsedWidth::expanding(),
            LengthPercentageAuto::Auto if cw.expanding || shrinks => UsedWidth::expanding(),
            LengthPercentageAuto::Auto => UsedWidth::fixed((cw.value - mbp).max(0.0)),
        };
        if width.expanding && strategy == LayoutStrategy::Normal {
            width.value = used_to_actual((cw.value - mbp).max(0.0));
        }

        // STEP 2: "If the tentative used width is greater than 'max-width',
        // the rules above are applied again ..."
        if !width.expanding {
            width.value = clamp_size(width.value, node.css_min_width, node.css_max_width);
        }
        node.width = width;

        // STEP 3: Auto margins and the over-constrained case.
        if width.expanding || cw.expanding || shrinks {
            return;
        }
        resolve_auto_margins(node);
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// "If 'height' is 'auto', the height depends on whether the element has
    /// any block-level children and whether it has padding or borders."
    pub(crate) fn calculate_static_heights(&mut self, id: LayoutNodeId) {
        let node = self.node_mut(id);
        let ch = node.containing_height;
        let mut height = match node.style.height {
            LengthPercentageAuto::Length(px) => UsedHeight::fixed(px),
            LengthPercentageAuto::Percentage(pct) if !ch.use_content => {
                UsedHeight::fixed(ch.value * pct / 100.0)
            }
            LengthPercentageAuto::Percentage(_) | LengthPercentageAuto::Auto => UsedHeight::content(),
        };
        node.css_min_height = resolve_vertical(node.style.min_height, ch);
        node.css_max_height = resolve_max_height(node.style.max_height, ch);
        if !height.use_content {
            height.value = clamp_size(height.value, node.css_min_height, node.css_max_height);
        }
        node.height = height;
    }

    /// Style-only vertical edges, resolved against the parent's width.
    pub(crate) fn vertical_edges(&self, id: LayoutNodeId) -> VerticalEdges {
        let node = self.node(id);
        let cw = node
            .parent
            .map_or(node.containing_width, |parent| self.node(parent).width);
        let style = &node.style;
        VerticalEdges {
            margin_top: resolve_horizontal_auto(style.margin_top, cw),
            margin_bottom: resolve_horizontal_auto(style.margin_bottom, cw),
            border_top: style.border_top_width,
            border_bottom: style.border_bottom_width,
            padding_top: resolve_horizontal(style.padding_top, cw),
            padding_bottom: resolve_horizontal(style.padding_bottom, cw),
        }
    }

    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    ///
    /// "If neither 'left' nor 'right' is 'auto', the position is
    /// over-constrained, and one of them has to be ignored" ('right' for
    /// `ltr`). 'top' wins over 'bottom' the same way.
    pub(crate) fn local_relative_offset(&self, id: LayoutNodeId) -> Point {
        let node = self.node(id);
        if node.style.position != Position::Relative {
            return Point::default();
        }
        relative_offset(&node.style, node.containing_width, node.containing_height)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Formatting roots
    // ─────────────────────────────────────────────────────────────────────

    /// Lay out the content of a node that establishes its own formatting
    /// context. Widths and heights must already be resolved; the content
    /// box size is final afterwards, its position is set by the caller.
    pub(crate) fn layout_formatting_root(&mut self, id: LayoutNodeId, strategy: LayoutStrategy) {
        #[cfg(feature = "layout-trace")]
        let guard = DepthGuard::enter();
        #[cfg(feature = "layout-trace")]
        eprintln!(
            "{:indent$}[ROOT] {} {strategy} width={:?}",
            "",
            self.node(id).node,
            self.node(id).width,
            indent = guard.depth() * 2
        );

        let (bfc, relative) = {
            let node = self.node(id);
            (node.bfc, node.relative)
        };
        self.floats_mut(bfc).clear();

        let mut cursor = LayoutCursor::new(0.0, 0.0, relative);
        let _ = self.add_content_margin_top(id, &mut cursor);
        self.layout_content(id, &mut cursor, strategy);
        cursor.apply_margin();

        // [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
        //
        // "In addition, if the element has any floating descendants whose
        // bottom margin edge is below the element's bottom content edge,
        // then the height is increased to include those edges."
        let float_bottom = self.floats(bfc).max_float_bottom();
        let node = self.node_mut(id);
        match strategy {
            LayoutStrategy::Minimum => node.minimum_width = Some(node.width.value),
            LayoutStrategy::Preferred => node.preferred_width = Some(node.width.value),
            LayoutStrategy::Normal => {}
        }
        if node.height.use_content {
            node.height.value = clamp_size(
                cursor.y.max(float_bottom),
                node.css_min_height,
                node.css_max_height,
            );
        }
        node.content_box.width = node.width.value;
        node.content_box.height = node.height.value;
    }

    /// Preferred width ("formatting the content without breaking lines
    /// other than where explicit line breaks occur").
    pub(crate) fn calc_preferred(&mut self, id: LayoutNodeId) -> f32 {
        if let Some(width) = self.node(id).preferred_width {
            return width;
        }
        self.measure(id, LayoutStrategy::Preferred)
    }

    /// Preferred minimum width ("trying all possible line breaks").
    pub(crate) fn calc_minimum(&mut self, id: LayoutNodeId) -> f32 {
        if let Some(width) = self.node(id).minimum_width {
            return width;
        }
        self.measure(id, LayoutStrategy::Minimum)
    }

    fn measure(&mut self, id: LayoutNodeId, strategy: LayoutStrategy) -> f32 {
        self.calculate_top_down_widths(id, strategy);
        self.calculate_top_down_heights(id);
        self.layout_formatting_root(id, strategy);
        let node = self.node_mut(id);
        let width = node.width.value;
        match strategy {
            LayoutStrategy::Minimum => node.minimum_width = Some(width),
            LayoutStrategy::Preferred => node.preferred_width = Some(width),
            LayoutStrategy::Normal => {}
        }
        width
    }

    /// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    ///
    /// "Then the shrink-to-fit width is: min(max(preferred minimum width,
    /// available width), preferred width)."
    pub(crate) fn layout_shrink_to_fit(&mut self, id: LayoutNodeId, available: f32) {
        let preferred = self.calc_preferred(id);
        let width = if preferred > available + 0.1 {
            self.calc_minimum(id).max(available)
        } else {
            preferred
        };

        self.calculate_top_down_widths(id, LayoutStrategy::Normal);
        self.calculate_top_down_heights(id);
        let node = self.node_mut(id);
        if node.width.expanding {
            node.width = UsedWidth::fixed(clamp_size(width, node.css_min_width, node.css_max_width));
        }
        log::trace!(
            target: "flowbox::layout",
            "shrink-to-fit {}: preferred={preferred} available={available} used={}",
            node.node,
            node.width.value
        );
        self.layout_formatting_root(id, LayoutStrategy::Normal);
    }

    /// Size a float, inline-block, inline replaced box or table cell at its
    /// own width, shrink-to-fit when its width is auto.
    pub(crate) fn layout_float(&mut self, id: LayoutNodeId, strategy: LayoutStrategy) {
        if strategy == LayoutStrategy::Normal && self.node(id).is_shrink_to_fit() {
            self.calculate_top_down_widths(id, LayoutStrategy::Normal);
            let node = self.node(id);
            let available = (node.containing_width.value - node.horizontal_mbp()).max(0.0);
            self.layout_shrink_to_fit(id, available);
        } else {
            self.calculate_top_down_widths(id, strategy);
            self.calculate_top_down_heights(id);
            self.layout_formatting_root(id, strategy);
        }
    }

    /// Place a formatting root whose margin box top-left is at `(x, y)` in
    /// its parent context.
    pub(crate) fn set_root_block_position(&mut self, id: LayoutNodeId, x: f32, y: f32) {
        let node = self.node(id);
        let content_x = x + node.margin.left + node.border.left + node.padding.left;
        let content_y = y + node.margin.top + node.border.top + node.padding.top;
        self.set_root_content_position(id, content_x, content_y);
    }

    /// Place a formatting root by its content box origin.
    pub(crate) fn set_root_content_position(&mut self, id: LayoutNodeId, x: f32, y: f32) {
        let node = self.node_mut(id);
        node.content_box.x = x;
        node.content_box.y = y;
        let bfc = node.bfc;
        self.arena.contexts.set_position(bfc, x, y);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Normal flow
    // ─────────────────────────────────────────────────────────────────────

    /// Lay out the content of `id` at `cursor`.
    pub(crate) fn layout_content(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor, strategy: LayoutStrategy) {
        match &self.node(id).kind {
            LayoutKind::Block(children) => {
                for child in children.clone() {
                    self.layout_block_child(id, child, cursor, strategy);
                }
            }
            LayoutKind::Inline(_) => self.layout_inline(id, cursor, strategy),
            LayoutKind::Table(_) => self.layout_table(id, cursor, strategy),
            LayoutKind::Replaced(_) => self.layout_replaced_content(id, cursor),
        }
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    ///
    /// Lays out an in-flow block that shares the context of its parent.
    pub(crate) fn layout_normal(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor, strategy: LayoutStrategy) {
        self.calculate_top_down_widths(id, strategy);
        self.calculate_top_down_heights(id);

        let saved_x = cursor.x;
        let saved_relative = cursor.relative;
        let offset = self.local_relative_offset(id);
        let (bfc, clear) = {
            let node = self.node_mut(id);
            cursor.x += node.margin.left + node.border.left + node.padding.left;
            cursor.relative.x += offset.x;
            cursor.relative.y += offset.y;
            node.relative = cursor.relative;
            (node.bfc, node.style.clear)
        };
        let edges = self.vertical_edges(id);

        // STEP 1: Top margin, collapsing with whatever is pending.
        let _ = self.add_margin_top(id, cursor);

        // STEP 2: Clearance.
        // [§ 9.5.2](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
        //
        // "Computing the clearance of an element on which 'clear' is set is
        // done by first determining the hypothetical position of the
        // element's top border edge."
        if clear != Clear::None {
            let clearance = self.clearance(bfc, clear);
            if cursor.y + cursor.total_margin() < clearance {
                cursor.y = clearance - cursor.total_margin();
            }
        }

        // STEP 3: A top border or padding stops margins from collapsing
        // with the first child.
        if edges.border_top > 0.0 || edges.padding_top > 0.0 {
            cursor.apply_margin();
            cursor.y += edges.border_top + edges.padding_top;
        }

        let before = cursor.y;
        let content_top = cursor.y + cursor.total_margin();
        {
            let node = self.node_mut(id);
            node.content_box.x = cursor.x;
            node.content_box.y = content_top;
        }

        // STEP 4: Content.
        self.layout_content(id, cursor, strategy);

        // STEP 5: Height.
        let content_placed = cursor.y != before;
        let closed_bottom = edges.border_bottom > 0.0 || edges.padding_bottom > 0.0;
        if closed_bottom && content_placed {
            cursor.apply_margin();
        }
        let node = self.node_mut(id);
        if node.height.use_content {
            let content_height = if content_placed {
                (cursor.y - content_top).max(0.0)
            } else {
                0.0
            };
            node.height.value = clamp_size(content_height, node.css_min_height, node.css_max_height);
        }
        let height = node.height.value;
        let use_content = node.height.use_content;
        node.content_box.width = node.width.value;
        node.content_box.height = height;

        if content_placed || height > 0.0 {
            if !content_placed {
                cursor.apply_margin();
            } else if !use_content {
                cursor.clear_margin();
            }
            cursor.y = content_top + height;
        }

        // STEP 6: Bottom border, padding and margin.
        if closed_bottom {
            cursor.apply_margin();
            cursor.y += edges.border_bottom + edges.padding_bottom;
        }
        cursor.add_margin(edges.margin_bottom);

        cursor.x = saved_x;
        cursor.relative = saved_relative;
    }

    /// Lay out one block-level child of `parent`.
    ///
    /// In-flow blocks share the context; tables, replaced boxes and other
    /// formatting roots are placed beside the floats of the context.
    pub(crate) fn layout_block_child(
        &mut self,
        parent: LayoutNodeId,
        child: LayoutNodeId,
        cursor: &mut LayoutCursor,
        strategy: LayoutStrategy,
    ) {
        let (parent_width, parent_height, bfc) = {
            let node = self.node(parent);
            (node.width, node.height, node.bfc)
        };
        {
            let node = self.node_mut(child);
            node.containing_width = parent_width;
            node.containing_height = parent_height;
        }

        if self.node(child).is_in_flow_block() {
            self.layout_normal(child, cursor, strategy);
            if strategy != LayoutStrategy::Normal && parent_width.expanding {
                let block_width = self.node(child).block_width();
                let node = self.node_mut(parent);
                node.width.value = node.width.value.max(block_width);
            }
            return;
        }

        // [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
        //
        // "The border box of a table, a block-level replaced element, or an
        // element in the normal flow that establishes a new block formatting
        // context ... must not overlap the margin box of any floats in the
        // same block formatting context as the element itself."
        let edges = self.vertical_edges(child);
        cursor.add_margin(edges.margin_top);
        let mut box_y = cursor.y + cursor.total_margin() - edges.margin_top;
        let clear = self.node(child).style.clear;
        if clear != Clear::None {
            let clearance = self.clearance(bfc, clear);
            if box_y + edges.margin_top < clearance {
                box_y = clearance - edges.margin_top;
            }
        }

        if strategy == LayoutStrategy::Normal {
            let slot = self.floats(bfc).find_line_box(
                cursor.x,
                cursor.x + parent_width.value,
                box_y,
                1.0,
                0.0,
            );
            self.node_mut(child).containing_width.value = slot.width;
        }
        let offset = self.local_relative_offset(child);
        self.node_mut(child).relative = Point::new(
            cursor.relative.x + offset.x,
            cursor.relative.y + offset.y,
        );
        self.calculate_top_down_widths(child, strategy);
        self.calculate_top_down_heights(child);
        self.layout_formatting_root(child, strategy);

        let limit = if strategy == LayoutStrategy::Preferred && parent_width.expanding {
            UNBOUNDED_WIDTH
        } else {
            parent_width.value
        };
        let (width, height, margin_bottom) = {
            let node = self.node(child);
            (node.block_width(), node.block_height(), node.margin.bottom)
        };
        let placed = self
            .floats(bfc)
            .place_left(Rect::new(cursor.x, box_y, width, height), cursor.x + limit);

        cursor.apply_margin();
        cursor.y = placed.bottom() - margin_bottom;
        cursor.add_margin(margin_bottom);
        if strategy != LayoutStrategy::Normal && parent_width.expanding {
            let node = self.node_mut(parent);
            node.width.value = node.width.value.max(placed.right() - cursor.x);
        }
        self.set_root_block_position(child, placed.x, placed.y);
    }

    /// Lowest float bottom the `clear` value requires clearing.
    pub(crate) fn clearance(&self, bfc: FormattingContextId, clear: Clear) -> f32 {
        let floats = self.floats(bfc);
        let left = if clear.clears_left() {
            floats.find_left_clearance()
        } else {
            0.0
        };
        let right = if clear.clears_right() {
            floats.find_right_clearance()
        } else {
            0.0
        };
        left.max(right)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Margin collapsing
    // ─────────────────────────────────────────────────────────────────────

    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// Add the top margin of `id` to the pending margins. When the box has
    /// no border, padding, height or content that separates them, its top
    /// margin adjoins the margins of its first child and its own bottom
    /// margin; those are added too.
    ///
    /// Returns `true` once something stops the collapse.
    pub(crate) fn add_margin_top(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor) -> bool {
        let node = self.node(id);
        // "Margins of floating/absolutely positioned/inline-block elements
        // do not collapse with any other margins."
        if node.is_floated() || node.is_out_of_flow() || node.is_inline_block() || node.is_table_cell() {
            return false;
        }
        let edges = self.vertical_edges(id);
        cursor.add_margin(edges.margin_top);
        if !self.node(id).is_in_flow_block() {
            return true;
        }
        if edges.border_top > 0.0 || edges.padding_top > 0.0 {
            return true;
        }
        if self.add_content_margin_top(id, cursor) {
            return true;
        }
        let node = self.node(id);
        let min_height = resolve_vertical(node.style.min_height, node.containing_height);
        let fixed_height = resolve_vertical_auto(node.style.height, node.containing_height);
        if min_height > 0.0 || fixed_height > 0.0 {
            return true;
        }
        if edges.border_bottom > 0.0 || edges.padding_bottom > 0.0 {
            return true;
        }
        // "top and bottom margins of a box that does not establish a new
        // block formatting context and that has zero computed 'min-height',
        // zero or 'auto' computed 'height', and no in-flow children"
        cursor.add_margin(edges.margin_bottom);
        false
    }

    /// Collapse the top margins of the leading children of `id` into
    /// `cursor`. Returns `true` if content stops the collapse.
    pub(crate) fn add_content_margin_top(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor) -> bool {
        match &self.node(id).kind {
            LayoutKind::Block(children) => {
                for child in children.clone() {
                    if self.add_margin_top(child, cursor) {
                        return true;
                    }
                }
                false
            }
            LayoutKind::Inline(_) => self.add_inline_content_margin_top(id, cursor),
            LayoutKind::Table(_) | LayoutKind::Replaced(_) => false,
        }
    }
}

/// Offsets of a relatively positioned box.
pub(crate) fn relative_offset(
    style: &ComputedBox,
    containing_width: UsedWidth,
    containing_height: UsedHeight,
) -> Point {
    let x = if style.left.is_auto() {
        -resolve_horizontal_auto(style.right, containing_width)
    } else {
        resolve_horizontal_auto(style.left, containing_width)
    };
    let y = if style.top.is_auto() {
        -resolve_vertical_auto(style.bottom, containing_height)
    } else {
        resolve_vertical_auto(style.top, containing_height)
    };
    Point::new(x, y)
}

/// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth) margins
/// of a block-level box whose width is known.
pub(crate) fn resolve_auto_margins(node: &mut LayoutNode) {
    let cw = node.containing_width.value;
    let used = node.width.value + node.border.horizontal() + node.padding.horizontal();
    let left_auto = node.style.margin_left.is_auto();
    let right_auto = node.style.margin_right.is_auto();
    match (left_auto, right_auto) {
        // "If both 'margin-left' and 'margin-right' are 'auto', their used
        // values are equal. This horizontally centers the element with
        // respect to the edges of the containing block."
        (true, true) => {
            let free = cw - used;
            node.margin.left = (free / 2.0).max(0.0);
            node.margin.right = free - node.margin.left;
        }
        // "If there is exactly one value specified as 'auto', its used
        // value follows from the equality."
        (true, false) => node.margin.left = cw - used - node.margin.right,
        (false, true) => node.margin.right = cw - used - node.margin.left,
        // "If all of the above have a computed value other than 'auto',
        // the values are said to be 'over-constrained' and one of the used
        // values will have to be different from its computed value. If
        // the 'direction' property of the containing block has the value
        // 'ltr', the specified value of 'margin-right' is ignored."
        (false, false) => {
            if node.style.direction == Direction::Rtl {
                node.margin.left = (cw - used - node.margin.right).max(0.0);
            }
        }
    }
}
