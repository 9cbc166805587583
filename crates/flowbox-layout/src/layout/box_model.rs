//! Geometry primitives and the CSS box model.
//!
//! [CSS 2.1 § 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)

use serde::Serialize;

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the vertical spans `[y, bottom)` of both rectangles overlap.
    #[must_use]
    pub fn intersects_vertically(&self, other: &Self) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    /// Whether the two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersects_vertically(other) && self.x < other.right() && other.x < self.right()
    }

    /// Whether `point` lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// The rectangle grown outward by `edges`.
    #[must_use]
    pub fn expanded_by(&self, edges: EdgeSizes) -> Self {
        Self {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.horizontal(),
            height: self.height + edges.vertical(),
        }
    }
}

/// Edge sizes for padding, border, or margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// `left + right`.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

/// A content rectangle with its surrounding edges.
///
/// [§ 8.1](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
///
/// "Each box has a content area (e.g., text, an image, etc.) and optional
/// surrounding padding, border, and margin areas."
///
/// ```text
/// ┌──────────────── margin ─────────────────┐
/// │   ┌──────────── border ─────────────┐   │
/// │   │   ┌──────── padding ────────┐   │   │
/// │   │   │   ┌─────────────────┐   │   │   │
/// │   │   │   │     CONTENT     │   │   │   │
/// │   │   │   └─────────────────┘   │   │   │
/// │   │   └─────────────────────────┘   │   │
/// │   └─────────────────────────────────┘   │
/// └─────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// Content area.
    pub content: Rect,
    /// Padding widths.
    pub padding: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Used margins.
    pub margin: EdgeSizes,
}

impl BoxGeometry {
    /// "The padding edge surrounds the box padding."
    ///
    /// ```text
    /// x = content.x - padding.left
    /// width = content.width + padding.left + padding.right
    /// ```
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(self.padding)
    }

    /// "The border edge surrounds the box's border."
    ///
    /// ```text
    /// x = content.x - padding.left - border.left
    /// width = content.width + padding.left + padding.right
    ///       + border.left + border.right
    /// ```
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.content.expanded_by(self.padding.plus(self.border))
    }

    /// "The margin edge surrounds the box margin."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.content
            .expanded_by(self.padding.plus(self.border).plus(self.margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_nest_outward() {
        let edges = |n: f32| EdgeSizes {
            top: n,
            right: n,
            bottom: n,
            left: n,
        };
        let geometry = BoxGeometry {
            content: Rect::new(30.0, 30.0, 100.0, 50.0),
            padding: edges(10.0),
            border: edges(5.0),
            margin: edges(15.0),
        };

        assert_eq!(geometry.padding_box(), Rect::new(20.0, 20.0, 120.0, 70.0));
        assert_eq!(geometry.border_box(), Rect::new(15.0, 15.0, 130.0, 80.0));
        assert_eq!(geometry.margin_box(), Rect::new(0.0, 0.0, 160.0, 110.0));
    }

    #[test]
    fn test_vertical_intersection_is_half_open() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let overlapping = Rect::new(50.0, 9.0, 10.0, 10.0);

        assert!(!a.intersects_vertically(&below));
        assert!(a.intersects_vertically(&overlapping));
        assert!(!a.intersects(&overlapping));
        assert!(a.contains(Point::new(0.0, 0.0)));
        assert!(!a.contains(Point::new(10.0, 5.0)));
    }
}
