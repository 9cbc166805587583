//! Text measurement and intrinsic image sizes.
//!
//! Layout never loads fonts or decodes images itself. It asks a
//! [`FontMetrics`] for advances and extents and an [`ImageSizes`] for the
//! intrinsic dimensions of replaced content. A `None` from either degrades
//! to zero-size metrics with a one-time warning.

use std::collections::HashMap;

use serde::Deserialize;

use crate::style::FontDescriptor;

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it. In this
/// section we use A to mean that height (for a given font at a given size)
/// and D the depth."
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontExtents {
    /// A: height above the baseline.
    pub ascent: f32,
    /// D: depth below the baseline.
    pub descent: f32,
}

/// Font metrics interface for text measurement during layout.
pub trait FontMetrics {
    /// Advance width of `text` set in `font`, or `None` when the font is not
    /// available.
    fn text_width(&self, text: &str, font: &FontDescriptor) -> Option<f32>;

    /// Ascent and descent of `font`, or `None` when it is not available.
    fn extents(&self, font: &FontDescriptor) -> Option<FontExtents>;
}

/// Approximate font metrics using fixed ratios.
///
/// Every character advances by `advance_ratio × font-size`; ascent and
/// descent are 0.8 and 0.2 of the font size, so `line-height: normal` is
/// exactly the font size. Used by the command-line front end and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    /// Advance of one character as a fraction of the font size.
    pub advance_ratio: f32,
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font: &FontDescriptor) -> Option<f32> {
        Some(text.chars().count() as f32 * font.size * self.advance_ratio)
    }

    fn extents(&self, font: &FontDescriptor) -> Option<FontExtents> {
        Some(FontExtents {
            ascent: font.size * 0.8,
            descent: font.size * 0.2,
        })
    }
}

/// Intrinsic dimensions of replaced content.
///
/// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
///
/// `ratio` is height divided by width. Any of the three may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct IntrinsicSize {
    /// Intrinsic width in CSS pixels.
    #[serde(default)]
    pub width: Option<f32>,
    /// Intrinsic height in CSS pixels.
    #[serde(default)]
    pub height: Option<f32>,
    /// Intrinsic ratio (height / width).
    #[serde(default)]
    pub ratio: Option<f32>,
}

impl IntrinsicSize {
    /// A fixed-size image; the ratio follows from the dimensions.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ratio: (width > 0.0).then(|| height / width),
        }
    }
}

/// Intrinsic-size lookup for replaced content, keyed by source.
pub trait ImageSizes {
    /// Intrinsic dimensions of `source`, or `None` if it is unknown.
    fn intrinsic_size(&self, source: &str) -> Option<IntrinsicSize>;
}

impl ImageSizes for HashMap<String, IntrinsicSize> {
    fn intrinsic_size(&self, source: &str) -> Option<IntrinsicSize> {
        self.get(source).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f32) -> FontDescriptor {
        FontDescriptor {
            family: "serif".to_string(),
            size,
            weight: 400,
            style: crate::style::FontStyle::Normal,
        }
    }

    #[test]
    fn test_approximate_metrics_scale_with_size() {
        let metrics = ApproximateFontMetrics { advance_ratio: 0.5 };
        assert_eq!(metrics.text_width("abcd", &font(10.0)), Some(20.0));
        let extents = metrics.extents(&font(20.0)).unwrap();
        assert!((extents.ascent - 16.0).abs() < 1e-4);
        assert!((extents.descent - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_image_sizes_from_map() {
        let mut images = HashMap::new();
        let _ = images.insert("cat.png".to_string(), IntrinsicSize::new(200.0, 100.0));

        let size = images.intrinsic_size("cat.png").unwrap();
        assert_eq!(size.ratio, Some(0.5));
        assert!(images.intrinsic_size("dog.png").is_none());
    }
}
