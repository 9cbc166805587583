//! CSS Layout Engine
//!
//! This module implements the CSS 2.1 visual formatting model for a tree of
//! styled boxes.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 § 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS 2.1 § 16 Text](https://www.w3.org/TR/CSS2/text.html)
//! - [CSS 2.1 § 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! # Module Structure
//!
//! - `box_model` - Points, sizes, rectangles and edge sizes
//! - `values` - Used widths and heights, the layout strategy
//! - `whitespace` - White space processing before each pass
//! - `formatting_context` / `float` - Block formatting contexts and float placement
//! - `builder` - Layout nodes from the box tree
//! - `block` - Block layout and the width-resolution protocol
//! - `inline` - Line breaking, line boxes and alignment
//! - `table`, `replaced`, `positioned` - The other box kinds
//! - `stacking` - Stacking contexts for painting
//! - `tree` - The full pass and post-layout queries

mod block;
mod box_model;
mod builder;
mod cursor;
mod float;
mod formatting_context;
pub(crate) mod inline;
mod metrics;
pub(crate) mod node;
mod pass;
mod positioned;
mod replaced;
pub(crate) mod stacking;
mod table;
mod tree;
mod values;
mod whitespace;

pub use box_model::{BoxGeometry, EdgeSizes, Point, Rect, Size};
pub use float::{FloatContext, FloatSide};
pub use formatting_context::{BlockFormattingContext, FormattingContextId, FormattingContexts};
pub use inline::justification_offsets;
pub use metrics::{ApproximateFontMetrics, FontExtents, FontMetrics, ImageSizes, IntrinsicSize};
pub use tree::{FragmentContent, HitResult, LayoutContext, LayoutTree, LineBox, LineFragment};
pub use values::{used_to_actual, LayoutStrategy, UsedHeight, UsedWidth};
pub use whitespace::{collapse, normalize_whitespace};
