//! CSS Float placement.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! All rectangles are margin boxes in the coordinate space of the owning
//! block formatting context.

use serde::Serialize;

use super::box_model::Rect;

/// [§ 9.5.1](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// "left: The element generates a block box that is floated to the left.
/// right: The element generates a block box that is floated to the right."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FloatSide {
    /// Content flows on the right side of the box.
    Left,
    /// Content flows on the left side of the box.
    Right,
}

/// The floats placed so far in one block formatting context.
#[derive(Debug, Clone, Default)]
pub struct FloatContext {
    left: Vec<Rect>,
    right: Vec<Rect>,
    /// Right floats placed while a shrink-to-fit width is measured. They
    /// sit where a left float would and carve lines from the left, but
    /// clear as right floats.
    stacked_right: Vec<Rect>,
}

/// Where the floats that overlap a horizontal band leave room.
struct Band {
    left_edge: f32,
    right_edge: f32,
    /// Smallest bottom among the floats that narrowed the band.
    next_top: Option<f32>,
}

impl Band {
    fn narrowed_by(&mut self, float: &Rect) {
        let bottom = float.bottom();
        self.next_top = Some(self.next_top.map_or(bottom, |top| top.min(bottom)));
    }
}

impl FloatContext {
    /// Create an empty float context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every float (start of a formatting root's layout).
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.stacked_right.clear();
    }

    /// True if no float has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty() && self.stacked_right.is_empty()
    }

    /// Carve `[left, right)` at the band `[y, y + height)`.
    ///
    /// A left float narrows the band when it reaches past `left`; a right
    /// float narrows it when it starts before `right`. Stacked right floats
    /// count as left ones.
    fn band(&self, left: f32, right: f32, y: f32, height: f32) -> Band {
        let probe = Rect::new(left, y, right - left, height.max(1.0));
        let mut band = Band {
            left_edge: left,
            right_edge: right,
            next_top: None,
        };

        for float in self.left.iter().chain(&self.stacked_right) {
            if float.intersects_vertically(&probe) && float.right() > left {
                band.left_edge = band.left_edge.max(float.right());
                band.narrowed_by(float);
            }
        }
        for float in &self.right {
            if float.intersects_vertically(&probe) && float.x < right {
                band.right_edge = band.right_edge.min(float.x);
                band.narrowed_by(float);
            }
        }
        band
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Find the highest position at or below `rect.y` where `rect` fits
    /// against the left floats without crossing a right float before
    /// `right_limit`.
    ///
    /// "A left-floating box must be put as far to the left as possible" and
    /// "A floating box must be placed as high as possible."
    #[must_use]
    pub fn place_left(&self, rect: Rect, right_limit: f32) -> Rect {
        let mut y = rect.y;
        loop {
            let band = self.band(rect.x, right_limit, y, rect.height);
            // STEP 1: Nothing in the way, or the box fits between the edges.
            let Some(next_top) = band.next_top else {
                return Rect::new(rect.x, y, rect.width, rect.height);
            };
            if band.left_edge + rect.width <= band.right_edge {
                return Rect::new(band.left_edge, y, rect.width, rect.height);
            }
            // STEP 2: Drop below the shortest float in the way. Every
            // intersecting float ends strictly below `y`.
            y = next_top;
        }
    }

    /// Mirror of [`Self::place_left`]: `rect.x` is the right-aligned
    /// candidate and the box may not cross a left float past `left_limit`.
    ///
    /// "a right-floating box [must be put] as far to the right as possible."
    #[must_use]
    pub fn place_right(&self, rect: Rect, left_limit: f32) -> Rect {
        let mut y = rect.y;
        loop {
            let band = self.band(left_limit, rect.right(), y, rect.height);
            let Some(next_top) = band.next_top else {
                return Rect::new(rect.x, y, rect.width, rect.height);
            };
            let x = band.right_edge - rect.width;
            if x >= band.left_edge {
                return Rect::new(x, y, rect.width, rect.height);
            }
            y = next_top;
        }
    }

    /// Place a left float and register it.
    pub fn float_left(&mut self, rect: Rect, right_limit: f32) -> Rect {
        let placed = self.place_left(rect, right_limit);
        log::trace!(target: "flowbox::float", "left float {rect:?} -> {placed:?}");
        self.left.push(placed);
        placed
    }

    /// Place a right float and register it.
    pub fn float_right(&mut self, rect: Rect, left_limit: f32) -> Rect {
        let placed = self.place_right(rect, left_limit);
        log::trace!(target: "flowbox::float", "right float {rect:?} -> {placed:?}");
        self.right.push(placed);
        placed
    }

    /// Place a right float inside a box whose width is still being measured.
    ///
    /// The final right edge is unknown, so the float is stacked like a left
    /// float. It narrows lines from the left and counts toward right
    /// clearance.
    pub fn float_right_shrink_to_fit(&mut self, rect: Rect, right_limit: f32) -> Rect {
        let placed = self.place_left(rect, right_limit);
        log::trace!(target: "flowbox::float", "stacked right float {rect:?} -> {placed:?}");
        self.stacked_right.push(placed);
        placed
    }

    /// [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the float."
    ///
    /// Find the first slot at or below `y` between `left` and `right` that is
    /// at least `minimum_width` wide. When no float overlaps the band the
    /// full span is returned even if it is narrower than requested.
    #[must_use]
    pub fn find_line_box(&self, left: f32, right: f32, y: f32, height: f32, minimum_width: f32) -> Rect {
        let mut y = y;
        loop {
            let band = self.band(left, right, y, height);
            let Some(next_top) = band.next_top else {
                return Rect::new(left, y, (right - left).max(0.0), height);
            };
            let width = band.right_edge - band.left_edge;
            if width >= minimum_width {
                return Rect::new(band.left_edge, y, width.max(0.0), height);
            }
            y = next_top;
        }
    }

    /// [§ 9.5.2](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any left-floating boxes."
    #[must_use]
    pub fn find_left_clearance(&self) -> f32 {
        self.left.iter().map(Rect::bottom).fold(0.0, f32::max)
    }

    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any right-floating boxes."
    #[must_use]
    pub fn find_right_clearance(&self) -> f32 {
        self.right
            .iter()
            .chain(&self.stacked_right)
            .map(Rect::bottom)
            .fold(0.0, f32::max)
    }

    /// [§ 10.6.7](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn max_float_bottom(&self) -> f32 {
        self.find_left_clearance().max(self.find_right_clearance())
    }
}
