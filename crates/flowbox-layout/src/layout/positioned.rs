//! Absolutely positioned and fixed boxes.
//!
//! [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
//!
//! "In the absolute positioning model, a box is explicitly offset with
//! respect to its containing block. It is removed from the normal flow
//! entirely (it has no impact on later siblings)."
//!
//! Positioned boxes are laid out after the normal flow of the whole tree,
//! when every containing block has its final geometry. Relative
//! positioning needs no pass of its own; see
//! [`LayoutPass::local_relative_offset`].

use super::box_model::{Point, Rect};
use super::node::LayoutNodeId;
use super::pass::LayoutPass;
use super::values::{
    clamp_size, resolve_horizontal_auto, resolve_max_height, resolve_vertical, resolve_vertical_auto,
    LayoutStrategy, UsedHeight, UsedWidth,
};
use crate::style::{Direction, LengthPercentageAuto, Position};

/// The offsets of a box that are not `auto`.
#[derive(Debug, Clone, Copy, Default)]
struct Offsets {
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
}

fn offset(value: LengthPercentageAuto, resolve: impl Fn(LengthPercentageAuto) -> f32) -> Option<f32> {
    (!value.is_auto()).then(|| resolve(value))
}

impl LayoutPass<'_> {
    fn offsets(&self, id: LayoutNodeId) -> Offsets {
        let node = self.node(id);
        let cw = node.containing_width;
        let ch = node.containing_height;
        let style = &node.style;
        Offsets {
            top: offset(style.top, |v| resolve_vertical_auto(v, ch)),
            right: offset(style.right, |v| resolve_horizontal_auto(v, cw)),
            bottom: offset(style.bottom, |v| resolve_vertical_auto(v, ch)),
            left: offset(style.left, |v| resolve_horizontal_auto(v, cw)),
        }
    }

    /// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
    ///
    /// "'left' + 'margin-left' + 'border-left-width' + 'padding-left' +
    /// 'width' + 'padding-right' + 'border-right-width' + 'margin-right' +
    /// 'right' = width of containing block"
    ///
    /// A width that is left to shrink-to-fit stays `expanding`.
    pub(crate) fn calculate_absolute_widths(&mut self, id: LayoutNodeId) {
        self.resolve_edges(id);
        let offsets = self.offsets(id);
        let node = self.node_mut(id);
        let cw = node.containing_width;
        let mbp = node.horizontal_mbp();

        // STEP 1: Width.
        let mut width = match node.style.width {
            LengthPercentageAuto::Length(px) => UsedWidth::fixed(px),
            LengthPercentageAuto::Percentage(pct) if !cw.expanding => UsedWidth::fixed(cw.value * pct / 100.0),
            // "'width' is 'auto', 'left' and 'right' are not 'auto', then
            // solve for 'width'"
            LengthPercentageAuto::Auto if !cw.expanding => match (offsets.left, offsets.right) {
                (Some(left), Some(right)) => UsedWidth::fixed((cw.value - left - right - mbp).max(0.0)),
                _ => UsedWidth::expanding(),
            },
            LengthPercentageAuto::Percentage(_) | LengthPercentageAuto::Auto => UsedWidth::expanding(),
        };
        if !width.expanding {
            width.value = clamp_size(width.value, node.css_min_width, node.css_max_width);
        }
        node.width = width;

        // STEP 2: Auto margins, only when everything else is known.
        let (Some(left), Some(right)) = (offsets.left, offsets.right) else {
            return;
        };
        if width.expanding || cw.expanding {
            return;
        }
        let free = cw.value - left - right - width.value - node.border.horizontal() - node.padding.horizontal();
        match (node.style.margin_left.is_auto(), node.style.margin_right.is_auto()) {
            // "If both 'margin-left' and 'margin-right' are 'auto', solve the
            // equation under the extra constraint that the two margins get
            // equal values, unless this would make them negative, in which
            // case when direction of the containing block is 'ltr' ('rtl'),
            // set 'margin-left' ('margin-right') to zero"
            (true, true) => {
                let half = free / 2.0;
                if half >= 0.0 {
                    node.margin.left = half;
                    node.margin.right = half;
                } else if node.style.direction == Direction::Rtl {
                    node.margin.right = 0.0;
                    node.margin.left = free;
                } else {
                    node.margin.left = 0.0;
                    node.margin.right = free;
                }
            }
            (true, false) => node.margin.left = free - node.margin.right,
            (false, true) => node.margin.right = free - node.margin.left,
            (false, false) => {}
        }
    }

    /// [§ 10.6.4 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-height)
    ///
    /// "'top' + 'margin-top' + 'border-top-width' + 'padding-top' +
    /// 'height' + 'padding-bottom' + 'border-bottom-width' + 'margin-bottom'
    /// + 'bottom' = height of containing block"
    pub(crate) fn calculate_absolute_heights(&mut self, id: LayoutNodeId) {
        let offsets = self.offsets(id);
        let node = self.node_mut(id);
        let ch = node.containing_height;
        node.css_min_height = resolve_vertical(node.style.min_height, ch);
        node.css_max_height = resolve_max_height(node.style.max_height, ch);
        let edges = node.border.vertical() + node.padding.vertical();

        let mut height = match node.style.height {
            LengthPercentageAuto::Length(px) => UsedHeight::fixed(px),
            LengthPercentageAuto::Percentage(pct) if !ch.use_content => UsedHeight::fixed(ch.value * pct / 100.0),
            LengthPercentageAuto::Auto if !ch.use_content => match (offsets.top, offsets.bottom) {
                (Some(top), Some(bottom)) => {
                    let margins = node.margin.vertical();
                    UsedHeight::fixed((ch.value - top - bottom - margins - edges).max(0.0))
                }
                _ => UsedHeight::content(),
            },
            LengthPercentageAuto::Percentage(_) | LengthPercentageAuto::Auto => UsedHeight::content(),
        };
        if !height.use_content {
            height.value = clamp_size(height.value, node.css_min_height, node.css_max_height);
        }
        node.height = height;

        // "If none of the three are 'auto': If both 'margin-top' and
        // 'margin-bottom' are 'auto', solve the equation under the extra
        // constraint that the two margins get equal values."
        if let (Some(top), Some(bottom)) = (offsets.top, offsets.bottom) {
            if !height.use_content && !ch.use_content {
                let free = ch.value - top - bottom - height.value - edges;
                match (node.style.margin_top.is_auto(), node.style.margin_bottom.is_auto()) {
                    (true, true) => {
                        node.margin.top = free / 2.0;
                        node.margin.bottom = free / 2.0;
                    }
                    (true, false) => node.margin.top = free - node.margin.bottom,
                    (false, true) => node.margin.bottom = free - node.margin.top,
                    (false, false) => {}
                }
            }
        }
    }

    /// Lay out every absolutely positioned and fixed box below `root`,
    /// outermost first.
    ///
    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// "If the element has 'position: absolute', the containing block is
    /// established by the nearest ancestor with a 'position' of 'absolute',
    /// 'relative' or 'fixed' ... the containing block is formed by the
    /// padding edge of the ancestor." For 'fixed' it is the viewport.
    pub(crate) fn layout_absolute_and_fixed_content(&mut self, root: LayoutNodeId) {
        let viewport = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        let (containing, relative) = if self.node(root).is_positioned() {
            (self.arena.padding_box(root), self.node(root).relative)
        } else {
            (viewport, Point::default())
        };
        self.layout_positioned_descendants(root, containing, relative);
    }

    fn layout_positioned_descendants(&mut self, id: LayoutNodeId, containing: Rect, relative: Point) {
        for child in self.arena.children(id) {
            match self.node(child).style.position {
                Position::Absolute => self.layout_absolute_or_fixed(child, containing, relative),
                Position::Fixed => {
                    let viewport = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
                    self.layout_absolute_or_fixed(child, viewport, Point::default());
                }
                Position::Static | Position::Relative => {}
            }
            let node = self.node(child);
            if node.is_positioned() {
                let relative = node.relative;
                let padding_box = self.arena.padding_box(child);
                self.layout_positioned_descendants(child, padding_box, relative);
            } else {
                self.layout_positioned_descendants(child, containing, relative);
            }
        }
    }

    /// Size one positioned box against `containing` (absolute coordinates)
    /// and place it.
    pub(crate) fn layout_absolute_or_fixed(&mut self, id: LayoutNodeId, containing: Rect, relative: Point) {
        {
            let node = self.node_mut(id);
            node.containing_width = UsedWidth::fixed(containing.width);
            node.containing_height = UsedHeight::fixed(containing.height);
        }
        let offset = self.local_relative_offset(id);
        self.node_mut(id).relative = Point::new(relative.x + offset.x, relative.y + offset.y);
        let offsets = self.offsets(id);

        // STEP 1: Size, shrink-to-fit when the width is left open.
        self.calculate_top_down_widths(id, LayoutStrategy::Normal);
        if self.node(id).width.expanding {
            let node = self.node(id);
            let taken = offsets.left.unwrap_or(0.0) + offsets.right.unwrap_or(0.0);
            let available = (containing.width - node.horizontal_mbp() - taken).max(0.0);
            self.layout_shrink_to_fit(id, available);
        } else {
            self.calculate_top_down_heights(id);
            self.layout_formatting_root(id, LayoutStrategy::Normal);
        }

        // STEP 2: Position. Offsets that are auto fall back to the static
        // position.
        let node = self.node(id);
        let fallback = node.static_position.map_or(Point::new(containing.x, containing.y), |position| {
            let origin = self.arena.contexts.origin(position.context);
            Point::new(origin.x + position.point.x, origin.y + position.point.y)
        });
        let x = match (offsets.left, offsets.right) {
            (Some(left), _) => containing.x + left,
            (None, Some(right)) => containing.right() - right - node.block_width(),
            (None, None) => fallback.x,
        };
        let y = match (offsets.top, offsets.bottom) {
            (Some(top), _) => containing.y + top,
            (None, Some(bottom)) => containing.bottom() - bottom - node.block_height(),
            (None, None) => fallback.y,
        };
        log::debug!(
            target: "flowbox::layout",
            "positioned {} at ({x}, {y}) in {containing:?}",
            node.node
        );
        let origin = self.arena.box_origin(id);
        self.set_root_block_position(id, x - origin.x, y - origin.y);
    }
}
