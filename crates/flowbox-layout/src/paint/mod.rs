//! CSS Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! This module turns finished layout geometry into drawing calls on a
//! [`GraphicsSink`]. Borders, backgrounds and glyphs are the sink's
//! business; the painter only decides what goes where and in which order.
//!
//! # Architecture
//!
//! ```text
//! Style → Layout → Paint → GraphicsSink
//!                           ↓
//!                      DisplayList (recording sink)
//! ```

mod display_list;
mod painter;

use std::ops::Range;

use flowbox_tree::NodeId;
use serde::Serialize;

pub use display_list::{DisplayCommand, DisplayList};
pub(crate) use display_list::serialize_node;
pub(crate) use painter::Painter;

use crate::layout::{BoxGeometry, Point, Rect};
use crate::style::{FontDescriptor, ListStyleType};

/// One run of text on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// Content area of the run in absolute coordinates.
    pub rect: Rect,
    /// Start of the baseline in absolute coordinates.
    pub origin: Point,
    /// The characters to draw, preserved newlines removed.
    pub text: String,
    /// The font to draw them with.
    pub font: FontDescriptor,
    /// Selected bytes of `text`, drawn highlighted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Range<usize>>,
}

/// Receives the drawing calls of a render, back to front.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
pub trait GraphicsSink {
    /// Background and borders of a box (or one line fragment of an inline
    /// box, whose split edges are zero).
    fn draw_box(&mut self, node: NodeId, geometry: &BoxGeometry);

    /// A run of text.
    fn draw_text(&mut self, node: NodeId, run: &TextRun);

    /// The content of a replaced box.
    fn draw_image(&mut self, node: NodeId, rect: Rect, source: &str);

    /// A list item marker.
    fn draw_marker(&mut self, node: NodeId, rect: Rect, style: ListStyleType);

    /// Clip everything that follows to `rect`, until the matching
    /// [`GraphicsSink::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    /// Drop the most recent clip.
    fn pop_clip(&mut self);
}
