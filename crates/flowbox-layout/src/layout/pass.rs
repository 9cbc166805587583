//! State shared by every step of one layout pass.

use flowbox_common::warning::warn_once;
use flowbox_tree::BoxTree;

use super::box_model::Size;
use super::formatting_context::FormattingContextId;
use super::float::FloatContext;
use super::metrics::{FontExtents, FontMetrics, ImageSizes};
use super::node::{LayoutArena, LayoutNode, LayoutNodeId};
use crate::style::{FontDescriptor, StyleMap};

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Indents nested trace output while alive.
#[cfg(feature = "layout-trace")]
pub(crate) struct DepthGuard(usize);

#[cfg(feature = "layout-trace")]
impl DepthGuard {
    pub fn enter() -> Self {
        Self(LAYOUT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        }))
    }

    pub const fn depth(&self) -> usize {
        self.0
    }
}

#[cfg(feature = "layout-trace")]
impl Drop for DepthGuard {
    fn drop(&mut self) {
        LAYOUT_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// One layout pass: read-only inputs plus the arena being filled.
pub(crate) struct LayoutPass<'a> {
    pub boxes: &'a BoxTree,
    pub styles: &'a StyleMap,
    pub fonts: &'a dyn FontMetrics,
    pub images: &'a dyn ImageSizes,
    pub arena: LayoutArena,
    pub viewport: Size,
}

impl<'a> LayoutPass<'a> {
    pub fn node(&self, id: LayoutNodeId) -> &LayoutNode {
        self.arena.node(id)
    }

    pub fn node_mut(&mut self, id: LayoutNodeId) -> &mut LayoutNode {
        self.arena.node_mut(id)
    }

    pub fn floats(&self, bfc: FormattingContextId) -> &FloatContext {
        self.arena.contexts.floats(bfc)
    }

    pub fn floats_mut(&mut self, bfc: FormattingContextId) -> &mut FloatContext {
        self.arena.contexts.floats_mut(bfc)
    }

    /// Advance width of `text`; zero when the font is unavailable.
    pub fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.fonts.text_width(text, font).unwrap_or_else(|| {
            let _ = warn_once("font", &format!("no metrics for font '{}'", font.family));
            0.0
        })
    }

    /// Ascent and descent; zero when the font is unavailable.
    pub fn extents(&self, font: &FontDescriptor) -> FontExtents {
        self.fonts.extents(font).unwrap_or_else(|| {
            let _ = warn_once("font", &format!("no metrics for font '{}'", font.family));
            FontExtents::default()
        })
    }
}
