//! Replaced elements.
//!
//! [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//! and [§ 10.6.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
//!
//! "An element whose content is outside the scope of the CSS formatting
//! model, such as an image, embedded document, or applet."

use flowbox_common::warning::warn_once;

use super::block::resolve_auto_margins;
use super::cursor::LayoutCursor;
use super::metrics::IntrinsicSize;
use super::node::{LayoutKind, LayoutNodeId};
use super::pass::LayoutPass;
use super::values::{clamp_size, resolve_max_height, resolve_vertical, UsedHeight, UsedWidth};
use crate::style::{Display, LengthPercentageAuto};

/// "Otherwise, if 'width' has a computed value of 'auto', but none of the
/// conditions above are met, then the used value of 'width' becomes 300px."
const FALLBACK_WIDTH: f32 = 300.0;

/// "Otherwise, if 'height' has a computed value of 'auto', but none of the
/// conditions above are met, then the used value of 'height' must be set to
/// the height of the largest rectangle that has a 2:1 ratio, has a height
/// not greater than 150px, and has a width not greater than the device
/// width."
const FALLBACK_HEIGHT: f32 = 150.0;

/// An image or other content sized from outside the document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReplacedContent {
    pub source: String,
    pub intrinsic: IntrinsicSize,
}

impl LayoutPass<'_> {
    /// Look up the intrinsic size of `source`; unknown content is an empty
    /// box.
    pub(crate) fn replaced_content(&self, source: &str) -> ReplacedContent {
        let intrinsic = self.images.intrinsic_size(source).unwrap_or_else(|| {
            let _ = warn_once("image", &format!("no intrinsic size for '{source}'"));
            IntrinsicSize::new(0.0, 0.0)
        });
        ReplacedContent {
            source: source.to_string(),
            intrinsic,
        }
    }

    fn intrinsic_size(&self, id: LayoutNodeId) -> IntrinsicSize {
        match &self.node(id).kind {
            LayoutKind::Replaced(content) => content.intrinsic,
            _ => IntrinsicSize::default(),
        }
    }

    pub(crate) fn calculate_replaced_widths(&mut self, id: LayoutNodeId) {
        self.resolve_edges(id);
        let intrinsic = self.intrinsic_size(id);
        let node = self.node_mut(id);
        let cw = node.containing_width;
        let ch = node.containing_height;
        let specified_height = specified_length(node.style.height, ch.use_content, ch.value);

        let width = match node.style.width {
            LengthPercentageAuto::Length(px) => px,
            LengthPercentageAuto::Percentage(pct) if !cw.expanding => cw.value * pct / 100.0,
            LengthPercentageAuto::Percentage(_) | LengthPercentageAuto::Auto => {
                match (specified_height, intrinsic.width, intrinsic.ratio) {
                    // A definite height and an intrinsic ratio decide the width.
                    (Some(height), _, Some(ratio)) if ratio > 0.0 => height / ratio,
                    // "If ... the element has an intrinsic width, then that
                    // intrinsic width is the used value of 'width'."
                    (_, Some(width), _) => width,
                    (None, None, Some(ratio)) if ratio > 0.0 && intrinsic.height.is_some() => {
                        intrinsic.height.unwrap_or_default() / ratio
                    }
                    (_, None, Some(_)) if !cw.expanding => (cw.value - node.horizontal_mbp()).max(0.0),
                    _ => FALLBACK_WIDTH,
                }
            }
        };
        node.width = UsedWidth::fixed(clamp_size(width, node.css_min_width, node.css_max_width));

        // [§ 10.3.4 Block-level, replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#block-replaced-width)
        //
        // "The used value of 'width' is determined as for inline replaced
        // elements. Then the rules for non-replaced block-level elements are
        // applied to determine the margins."
        let block_level = node.style.display != Display::Inline
            && !node.is_floated()
            && !node.is_out_of_flow()
            && !cw.expanding;
        if block_level {
            resolve_auto_margins(node);
        }
    }

    pub(crate) fn calculate_replaced_heights(&mut self, id: LayoutNodeId) {
        let intrinsic = self.intrinsic_size(id);
        let node = self.node_mut(id);
        let ch = node.containing_height;
        node.css_min_height = resolve_vertical(node.style.min_height, ch);
        node.css_max_height = resolve_max_height(node.style.max_height, ch);

        let width_auto = node.style.width.is_auto();
        let height = specified_length(node.style.height, ch.use_content, ch.value).unwrap_or_else(|| {
            match (intrinsic.height, intrinsic.ratio) {
                (Some(height), ratio) if width_auto || ratio.is_none() => height,
                // The used width and the intrinsic ratio decide the height.
                (_, Some(ratio)) => node.width.value * ratio,
                _ => FALLBACK_HEIGHT,
            }
        });
        node.height = UsedHeight::fixed(clamp_size(height, node.css_min_height, node.css_max_height));
    }

    /// The content of a replaced box is opaque; it only takes up its height.
    pub(crate) fn layout_replaced_content(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor) {
        let height = self.node(id).height.value;
        if height > 0.0 {
            cursor.apply_margin();
            cursor.y += height;
        }
    }
}

/// A length, or a percentage of a definite containing size.
fn specified_length(value: LengthPercentageAuto, indefinite: bool, containing: f32) -> Option<f32> {
    match value {
        LengthPercentageAuto::Length(px) => Some(px),
        LengthPercentageAuto::Percentage(pct) if !indefinite => Some(containing * pct / 100.0),
        LengthPercentageAuto::Percentage(_) | LengthPercentageAuto::Auto => None,
    }
}
