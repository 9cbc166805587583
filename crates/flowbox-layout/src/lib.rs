//! CSS 2.1 box layout for the flowbox engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Computed style input** ([§ 6.1 Value stages](https://www.w3.org/TR/CSS2/cascade.html#value-stages))
//!   - Typed keyword and length values, deserializable from kebab-case JSON
//!   - A per-node style map; text inherits its parent's box
//!
//! - **Layout** ([§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - White space processing
//!   - Block formatting contexts, margin collapsing, floats and clearance
//!   - Inline formatting: line breaking, split inline boxes, vertical
//!     alignment, text-align and justification
//!   - Minimum / preferred / normal width resolution for shrink-to-fit boxes
//!   - Tables, replaced content, relative, absolute and fixed positioning
//!
//! - **Paint** ([Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Stacking contexts in z-order
//!   - A recording display list
//!   - Hit testing and caret boxes
//!
//! # Not Implemented
//!
//! - Stylesheet parsing and the cascade
//! - Rasterization
//! - Incremental relayout
//! - Table spans and captions

/// Errors reported when setting up a layout pass.
pub mod error;
/// Box layout per [CSS 2.1 § 9-10](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Painting order per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Computed style values consumed by layout.
pub mod style;

pub use error::LayoutError;
pub use layout::{LayoutContext, LayoutTree};
