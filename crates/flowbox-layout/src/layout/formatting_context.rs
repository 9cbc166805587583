//! Block formatting contexts.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "Floats, absolutely positioned elements, block containers (such as
//! inline-blocks, table-cells, and table-captions) that are not block boxes,
//! and block boxes with 'overflow' other than 'visible' (except when that
//! value has been propagated to the viewport) establish new block formatting
//! contexts for their contents."
//!
//! Every context owns its floats and an offset from its parent context, so
//! geometry inside a context is local and nested contexts compose by adding
//! offsets up the parent chain.

use std::fmt;

use super::box_model::{Point, Rect};
use super::float::FloatContext;

/// Index of a [`BlockFormattingContext`] in its [`FormattingContexts`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormattingContextId(usize);

impl FormattingContextId {
    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FormattingContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bfc#{}", self.0)
    }
}

/// One block formatting context: its floats and its offset.
#[derive(Debug, Clone, Default)]
pub struct BlockFormattingContext {
    parent: Option<FormattingContextId>,
    position: Point,
    /// Floats placed in this context, in context coordinates.
    pub floats: FloatContext,
}

impl BlockFormattingContext {
    /// The enclosing context, `None` for the root of a pass and for fixed
    /// positioned boxes.
    #[must_use]
    pub const fn parent(&self) -> Option<FormattingContextId> {
        self.parent
    }

    /// Offset of this context's origin inside its parent context.
    #[must_use]
    pub const fn local_position(&self) -> Point {
        self.position
    }
}

/// Per-pass arena of formatting contexts.
#[derive(Debug, Clone, Default)]
pub struct FormattingContexts {
    contexts: Vec<BlockFormattingContext>,
}

impl FormattingContexts {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// True if no context was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Create a context nested in `parent`.
    pub fn create(&mut self, parent: Option<FormattingContextId>) -> FormattingContextId {
        let id = FormattingContextId(self.contexts.len());
        self.contexts.push(BlockFormattingContext {
            parent,
            ..BlockFormattingContext::default()
        });
        id
    }

    /// Borrow a context.
    ///
    /// # Panics
    ///
    /// Ids are only handed out by [`Self::create`] on this arena; an id from
    /// another arena may be out of bounds.
    #[must_use]
    pub fn get(&self, id: FormattingContextId) -> &BlockFormattingContext {
        &self.contexts[id.0]
    }

    /// Mutably borrow a context.
    ///
    /// # Panics
    ///
    /// Same contract as [`Self::get`].
    pub fn get_mut(&mut self, id: FormattingContextId) -> &mut BlockFormattingContext {
        &mut self.contexts[id.0]
    }

    /// Floats of a context.
    #[must_use]
    pub fn floats(&self, id: FormattingContextId) -> &FloatContext {
        &self.get(id).floats
    }

    /// Mutable floats of a context.
    pub fn floats_mut(&mut self, id: FormattingContextId) -> &mut FloatContext {
        &mut self.get_mut(id).floats
    }

    /// Set the offset of `id` inside its parent context.
    pub fn set_position(&mut self, id: FormattingContextId, x: f32, y: f32) {
        self.get_mut(id).position = Point::new(x, y);
    }

    /// Absolute x of the context origin.
    #[must_use]
    pub fn x(&self, id: FormattingContextId) -> f32 {
        self.origin(id).x
    }

    /// Absolute y of the context origin.
    #[must_use]
    pub fn y(&self, id: FormattingContextId) -> f32 {
        self.origin(id).y
    }

    /// Absolute origin of a context: the sum of the local offsets along the
    /// parent chain.
    #[must_use]
    pub fn origin(&self, id: FormattingContextId) -> Point {
        let mut origin = Point::default();
        let mut current = Some(id);
        while let Some(id) = current {
            let context = self.get(id);
            origin.x += context.position.x;
            origin.y += context.position.y;
            current = context.parent;
        }
        origin
    }

    /// Translate a rectangle from context `id` to absolute coordinates.
    #[must_use]
    pub fn to_absolute(&self, id: FormattingContextId, rect: Rect) -> Rect {
        let origin = self.origin(id);
        rect.translate(origin.x, origin.y)
    }
}
