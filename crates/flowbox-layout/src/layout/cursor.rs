//! The flow cursor and vertical margin collapsing.
//!
//! [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)

use super::box_model::Point;

/// The pen position while laying out a block formatting context.
///
/// Coordinates are relative to the formatting context the cursor walks.
/// Margins are not added to `y` directly: they accumulate as pending
/// positive and negative maxima and are applied once content arrives, which
/// is how adjoining margins collapse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutCursor {
    /// Left edge of the current content box.
    pub x: f32,
    /// Bottom of the last placed content, before pending margins.
    pub y: f32,
    /// Accumulated relative-positioning offset of the enclosing boxes.
    pub relative: Point,
    positive_margin: f32,
    negative_margin: f32,
}

impl LayoutCursor {
    /// A cursor at `(x, y)` with no pending margin.
    #[must_use]
    pub fn new(x: f32, y: f32, relative: Point) -> Self {
        Self {
            x,
            y,
            relative,
            positive_margin: 0.0,
            negative_margin: 0.0,
        }
    }

    /// Add a margin to the pending collapse set.
    ///
    /// "When two or more margins collapse, the resulting margin width is the
    /// maximum of the collapsing margins' widths. In the case of negative
    /// margins, the maximum of the absolute values of the negative adjoining
    /// margins is deducted from the maximum of the positive adjoining
    /// margins."
    pub fn add_margin(&mut self, margin: f32) {
        if margin > 0.0 {
            self.positive_margin = self.positive_margin.max(margin);
        } else {
            self.negative_margin = self.negative_margin.min(margin);
        }
    }

    /// The collapsed value of the pending margins.
    #[must_use]
    pub fn total_margin(&self) -> f32 {
        self.positive_margin + self.negative_margin
    }

    /// Commit the pending margins to `y`.
    pub fn apply_margin(&mut self) {
        self.y += self.total_margin();
        self.positive_margin = 0.0;
        self.negative_margin = 0.0;
    }

    /// Drop the pending margins without moving `y`.
    pub fn clear_margin(&mut self) {
        self.positive_margin = 0.0;
        self.negative_margin = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_margins_collapse_to_max() {
        let mut cursor = LayoutCursor::default();
        cursor.add_margin(20.0);
        cursor.add_margin(30.0);
        cursor.add_margin(10.0);
        assert!((cursor.total_margin() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_margin_is_deducted() {
        let mut cursor = LayoutCursor::new(0.0, 100.0, Point::default());
        cursor.add_margin(30.0);
        cursor.add_margin(-10.0);
        cursor.add_margin(-5.0);
        cursor.apply_margin();

        assert!((cursor.y - 120.0).abs() < f32::EPSILON);
        assert!(cursor.total_margin().abs() < f32::EPSILON);
    }
}
