//! Geometry of one line box.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)

use super::boxes::InlineBox;
use super::generated::{GeneratedBox, GeneratedBoxId, GeneratedKind};
use super::measure::visible_text;
use crate::layout::box_model::Rect;
use crate::layout::metrics::FontExtents;
use crate::layout::node::LayoutNodeId;
use crate::layout::pass::LayoutPass;
use crate::style::{ComputedBox, Overflow, VerticalAlign};

/// Vertical extent of the boxes on a line relative to its baseline;
/// `top` is negative above it.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    top: f32,
    bottom: f32,
}

impl Bounds {
    const EMPTY: Self = Self {
        top: f32::INFINITY,
        bottom: f32::NEG_INFINITY,
    };

    fn include(&mut self, top: f32, bottom: f32) {
        self.top = self.top.min(top);
        self.bottom = self.bottom.max(bottom);
    }

    fn height(self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }
}

/// A box aligned with 'top' or 'bottom', positioned once the rest of the
/// line is known.
struct LineRelative {
    id: GeneratedBoxId,
    align: VerticalAlign,
    bounds: Bounds,
}

/// Final ascent and descent of a line box.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LayoutPass<'_> {
    /// Assign x positions and widths left to right starting at `x`; returns
    /// the x after the box.
    pub(crate) fn place_horizontally(
        &self,
        boxes: &[InlineBox],
        generated: &mut [GeneratedBox],
        id: GeneratedBoxId,
        x: f32,
    ) -> f32 {
        let mut x = x;
        let current = &generated[id.0];
        let inline = &boxes[current.inline_box.0];
        let (opening, closing) = (current.opening, current.closing);
        match current.kind {
            GeneratedKind::Line | GeneratedKind::Element => {
                let is_element = current.kind == GeneratedKind::Element;
                if is_element && opening {
                    x += inline.margin.left;
                }
                let start = x;
                if is_element && opening {
                    x += inline.border.left + inline.padding.left;
                }
                for child in current.children.clone() {
                    x = self.place_horizontally(boxes, generated, child, x);
                }
                if is_element && closing {
                    x += inline.padding.right + inline.border.right;
                }
                let rect = &mut generated[id.0].rect;
                rect.x = start;
                rect.width = x - start;
                if is_element && closing {
                    x += inline.margin.right;
                }
            }
            GeneratedKind::Text => {
                let shown = visible_text(&inline.text[current.range.clone()]);
                let width = self.text_width(&shown, &inline.style.font());
                let rect = &mut generated[id.0].rect;
                rect.x = x;
                rect.width = width;
                x += width;
            }
            GeneratedKind::Atomic(node) => {
                let width = if current.floated {
                    0.0
                } else {
                    self.node(node).block_width()
                };
                let rect = &mut generated[id.0].rect;
                rect.x = x;
                rect.width = width;
                x += width;
            }
        }
        x
    }

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "Add the leading to the A and D ... L = 'line-height' - AD, A' = A +
    /// L/2, D' = D + L/2". With `line-height: normal` the font's own extents
    /// are used.
    pub(crate) fn leading_extents(&self, style: &ComputedBox) -> FontExtents {
        let font = self.extents(&style.font());
        match style.line_height.resolve(style.font_size) {
            None => font,
            Some(line_height) => {
                let half_leading = (line_height - (font.ascent + font.descent)) / 2.0;
                FontExtents {
                    ascent: font.ascent + half_leading,
                    descent: font.descent + half_leading,
                }
            }
        }
    }

    /// Height of a line holding only the container's strut.
    pub(crate) fn strut_height(&self, style: &ComputedBox) -> f32 {
        let extents = self.leading_extents(style);
        extents.ascent + extents.descent
    }

    /// "The baseline of an 'inline-block' is the baseline of its last line
    /// box in the normal flow, unless it has either no in-flow line boxes or
    /// if its 'overflow' property has a computed value other than 'visible',
    /// in which case the baseline is the bottom margin edge."
    fn atomic_extents(&self, node: LayoutNodeId) -> FontExtents {
        let layout = self.node(node);
        let height = layout.block_height();
        let baseline = if layout.is_replaced() || layout.style.overflow != Overflow::Visible {
            None
        } else {
            self.arena.last_baseline(node)
        };
        let ascent = baseline.map_or(height, |baseline| {
            layout.margin.top + layout.border.top + layout.padding.top + baseline
        });
        FontExtents {
            ascent,
            descent: height - ascent,
        }
    }

    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    ///
    /// Baseline shift of a box relative to its parent's baseline, positive
    /// downward.
    fn vertical_shift(&self, style: &ComputedBox, parent: &ComputedBox, extents: FontExtents) -> f32 {
        match style.vertical_align {
            VerticalAlign::Baseline | VerticalAlign::Top | VerticalAlign::Bottom => 0.0,
            VerticalAlign::Sub => parent.font_size * 0.2,
            VerticalAlign::Super => -parent.font_size * 0.4,
            VerticalAlign::Length(length) => -length,
            // "Raise (positive value) or lower (negative value) the box by
            // this distance (a percentage of the 'line-height' value)."
            VerticalAlign::Percentage(pct) => {
                let line_height = style
                    .line_height
                    .resolve(style.font_size)
                    .unwrap_or(extents.ascent + extents.descent);
                -pct * line_height / 100.0
            }
            // "Align the vertical midpoint of the box with the baseline of
            // the parent box plus half the x-height of the parent."
            VerticalAlign::Middle => (extents.ascent - extents.descent) / 2.0 - parent.font_size * 0.25,
            VerticalAlign::TextTop => extents.ascent - self.extents(&parent.font()).ascent,
            VerticalAlign::TextBottom => self.extents(&parent.font()).descent - extents.descent,
        }
    }

    /// Baseline offsets and extents for the subtree at `id`.
    fn align_subtree(
        &self,
        boxes: &[InlineBox],
        generated: &mut [GeneratedBox],
        id: GeneratedBoxId,
        parent: Option<(f32, &ComputedBox)>,
        bounds: &mut Bounds,
        deferred: Option<&mut Vec<LineRelative>>,
    ) {
        let current = &generated[id.0];
        let inline = &boxes[current.inline_box.0];
        let style = &inline.style;
        let extents = match current.kind {
            GeneratedKind::Atomic(_) if current.floated => return,
            GeneratedKind::Atomic(node) => self.atomic_extents(node),
            _ => self.leading_extents(style),
        };
        // Text runs share their element's style, so they sit on its baseline.
        let aligned = matches!(current.kind, GeneratedKind::Element | GeneratedKind::Atomic(_));
        let offset = match parent {
            Some((parent_offset, parent_style)) if aligned => {
                parent_offset + self.vertical_shift(style, parent_style, extents)
            }
            Some((parent_offset, _)) => parent_offset,
            None => 0.0,
        };
        let children = current.children.clone();
        {
            let current = &mut generated[id.0];
            current.ascent = extents.ascent;
            current.descent = extents.descent;
            current.baseline_offset = offset;
        }

        let line_relative =
            aligned && matches!(style.vertical_align, VerticalAlign::Top | VerticalAlign::Bottom);
        match deferred {
            Some(deferred) if line_relative => {
                let mut own = Bounds::EMPTY;
                own.include(offset - extents.ascent, offset + extents.descent);
                for child in children {
                    self.align_subtree(boxes, generated, child, Some((offset, style)), &mut own, None);
                }
                deferred.push(LineRelative {
                    id,
                    align: style.vertical_align,
                    bounds: own,
                });
            }
            mut deferred => {
                bounds.include(offset - extents.ascent, offset + extents.descent);
                for child in children {
                    self.align_subtree(
                        boxes,
                        generated,
                        child,
                        Some((offset, style)),
                        bounds,
                        deferred.as_deref_mut(),
                    );
                }
            }
        }
    }

    /// Lay out the generated boxes of a line inside `line_box` (the slot
    /// left by the floats), starting `indent` in from its left edge.
    ///
    /// [§ 10.8](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// "The line box height is the distance between the uppermost box top
    /// and the lowermost box bottom."
    pub(crate) fn layout_line(
        &self,
        boxes: &[InlineBox],
        generated: &mut [GeneratedBox],
        root: GeneratedBoxId,
        line_box: Rect,
        indent: f32,
    ) -> LineMetrics {
        let _ = self.place_horizontally(boxes, generated, root, line_box.x + indent);

        // STEP 1: Baseline offsets of everything not aligned to the line box.
        let mut bounds = Bounds::EMPTY;
        let mut deferred = Vec::new();
        self.align_subtree(boxes, generated, root, None, &mut bounds, Some(&mut deferred));

        // STEP 2: 'top' and 'bottom' boxes may grow the line, then move.
        for relative in &deferred {
            let height = relative.bounds.height();
            if height > bounds.height() {
                if relative.align == VerticalAlign::Top {
                    bounds.bottom = bounds.top + height;
                } else {
                    bounds.top = bounds.bottom - height;
                }
            }
        }
        for relative in deferred {
            let delta = if relative.align == VerticalAlign::Top {
                bounds.top - relative.bounds.top
            } else {
                bounds.bottom - relative.bounds.bottom
            };
            shift_subtree(generated, relative.id, delta);
        }

        let metrics = LineMetrics {
            ascent: -bounds.top,
            descent: bounds.bottom,
        };

        // STEP 3: Vertical rectangles.
        let baseline = line_box.y + metrics.ascent;
        self.place_vertically(boxes, generated, root, baseline);
        let line = &mut generated[root.0].rect;
        line.y = line_box.y;
        line.height = metrics.ascent + metrics.descent;
        metrics
    }

    fn place_vertically(&self, boxes: &[InlineBox], generated: &mut [GeneratedBox], id: GeneratedBoxId, baseline: f32) {
        let current = &generated[id.0];
        let inline = &boxes[current.inline_box.0];
        let y = baseline + current.baseline_offset;
        let rect = match current.kind {
            GeneratedKind::Line => None,
            GeneratedKind::Text => {
                let font = self.extents(&inline.style.font());
                Some((y - font.ascent, font.ascent + font.descent))
            }
            // [§ 10.6.1](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
            //
            // "The vertical padding, border and margin of an inline,
            // non-replaced box start at the top and bottom of the content
            // area, and has nothing to do with the 'line-height'."
            GeneratedKind::Element => {
                let font = self.extents(&inline.style.font());
                Some((
                    y - font.ascent - inline.padding.top - inline.border.top,
                    font.ascent + font.descent + inline.padding.vertical() + inline.border.vertical(),
                ))
            }
            GeneratedKind::Atomic(_) if current.floated => Some((y, 0.0)),
            GeneratedKind::Atomic(node) => Some((y - current.ascent, self.node(node).block_height())),
        };
        let children = current.children.clone();
        if let Some((top, height)) = rect {
            let rect = &mut generated[id.0].rect;
            rect.y = top;
            rect.height = height;
        }
        for child in children {
            self.place_vertically(boxes, generated, child, baseline);
        }
    }
}

fn shift_subtree(generated: &mut [GeneratedBox], id: GeneratedBoxId, delta: f32) {
    generated[id.0].baseline_offset += delta;
    for child in generated[id.0].children.clone() {
        shift_subtree(generated, child, delta);
    }
}
