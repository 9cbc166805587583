//! Used values threaded through the width-resolution protocol.
//!
//! [§ 6.1.3 Used values](https://www.w3.org/TR/CSS2/cascade.html#used-value)
//!
//! "If the computed value can be resolved without rendering the document,
//! the used value is the computed value. Otherwise it requires layout."

use serde::Serialize;
use strum_macros::Display as StrumDisplay;

use crate::style::{LengthPercentage, LengthPercentageAuto, LengthPercentageNone};

/// Which width a layout pass is computing.
///
/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// "Calculation of the shrink-to-fit width is similar to calculating the
/// width of a table cell using the automatic table layout algorithm.
/// Roughly: calculate the preferred width by formatting the content without
/// breaking lines other than where explicit line breaks occur, and also
/// calculate the preferred minimum width, e.g., by trying all possible line
/// breaks."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum LayoutStrategy {
    /// Break at every opportunity; the result is the preferred minimum width.
    Minimum,
    /// Break only at forced breaks; the result is the preferred width.
    Preferred,
    /// Final layout against the used width.
    Normal,
}

/// A used width, or a width still being measured.
///
/// When `expanding` is set, `value` is a running maximum that grows while
/// the content is laid out under [`LayoutStrategy::Minimum`] or
/// [`LayoutStrategy::Preferred`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsedWidth {
    /// Width in CSS pixels.
    pub value: f32,
    /// The width depends on content that has not been measured yet.
    pub expanding: bool,
}

impl UsedWidth {
    /// A resolved width.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            value,
            expanding: false,
        }
    }

    /// A width that grows with its content, starting at zero.
    #[must_use]
    pub const fn expanding() -> Self {
        Self {
            value: 0.0,
            expanding: true,
        }
    }
}

/// A used height, or `use_content` when the content decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsedHeight {
    /// Height in CSS pixels.
    pub value: f32,
    /// "If 'height' is 'auto', the height depends on ... children".
    pub use_content: bool,
}

impl UsedHeight {
    /// A resolved height.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            value,
            use_content: false,
        }
    }

    /// A height decided by the content.
    #[must_use]
    pub const fn content() -> Self {
        Self {
            value: 0.0,
            use_content: true,
        }
    }
}

/// [§ 6.1.4 Actual values](https://www.w3.org/TR/CSS2/cascade.html#actual-value)
///
/// "A used value is in principle the value used for rendering, but a user
/// agent may not be able to make use of the value in a given environment."
///
/// Rounds to the nearest whole pixel, halves upward.
#[must_use]
pub fn used_to_actual(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Resolve a horizontal length against the containing width.
///
/// [§ 8.3](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "The percentage is calculated with respect to the width of the generated
/// box's containing block." A containing width that is still being measured
/// has no value yet, so percentages against it count as zero.
pub(crate) fn resolve_horizontal(value: LengthPercentage, containing: UsedWidth) -> f32 {
    match value {
        LengthPercentage::Length(px) => px,
        LengthPercentage::Percentage(_) if containing.expanding => 0.0,
        LengthPercentage::Percentage(pct) => containing.value * pct / 100.0,
    }
}

/// Like [`resolve_horizontal`], with `auto` as zero.
pub(crate) fn resolve_horizontal_auto(value: LengthPercentageAuto, containing: UsedWidth) -> f32 {
    match value {
        LengthPercentageAuto::Auto => 0.0,
        LengthPercentageAuto::Length(px) => px,
        LengthPercentageAuto::Percentage(_) if containing.expanding => 0.0,
        LengthPercentageAuto::Percentage(pct) => containing.value * pct / 100.0,
    }
}

/// 'max-width' against the containing width; `None` means no constraint.
pub(crate) fn resolve_max_width(value: LengthPercentageNone, containing: UsedWidth) -> Option<f32> {
    match value {
        LengthPercentageNone::None => None,
        LengthPercentageNone::Length(px) => Some(px),
        LengthPercentageNone::Percentage(_) if containing.expanding => None,
        LengthPercentageNone::Percentage(pct) => Some(containing.value * pct / 100.0),
    }
}

/// Resolve a vertical length against the containing height.
///
/// [§ 10.5](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
///
/// "If the height of the containing block is not specified explicitly ...
/// the value computes to 'auto'."
pub(crate) fn resolve_vertical(value: LengthPercentage, containing: UsedHeight) -> f32 {
    match value {
        LengthPercentage::Length(px) => px,
        LengthPercentage::Percentage(_) if containing.use_content => 0.0,
        LengthPercentage::Percentage(pct) => containing.value * pct / 100.0,
    }
}

/// Like [`resolve_vertical`], with `auto` as zero.
pub(crate) fn resolve_vertical_auto(value: LengthPercentageAuto, containing: UsedHeight) -> f32 {
    match value {
        LengthPercentageAuto::Auto => 0.0,
        LengthPercentageAuto::Length(px) => px,
        LengthPercentageAuto::Percentage(_) if containing.use_content => 0.0,
        LengthPercentageAuto::Percentage(pct) => containing.value * pct / 100.0,
    }
}

/// 'max-height' against the containing height.
pub(crate) fn resolve_max_height(value: LengthPercentageNone, containing: UsedHeight) -> Option<f32> {
    match value {
        LengthPercentageNone::None => None,
        LengthPercentageNone::Length(px) => Some(px),
        LengthPercentageNone::Percentage(_) if containing.use_content => None,
        LengthPercentageNone::Percentage(pct) => Some(containing.value * pct / 100.0),
    }
}

/// [§ 10.4](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// "If the tentative used width is greater than 'max-width', the rules above
/// are applied again using the computed value of 'max-width' as the computed
/// value for 'width'. If the resulting width is smaller than 'min-width', the
/// rules above are applied again using the value of 'min-width'."
///
/// Max first, then min, so min wins when they conflict.
pub(crate) fn clamp_size(value: f32, min: f32, max: Option<f32>) -> f32 {
    let capped = max.map_or(value, |max| value.min(max));
    capped.max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_to_actual_rounds_half_up() {
        assert!((used_to_actual(10.4) - 10.0).abs() < f32::EPSILON);
        assert!((used_to_actual(10.5) - 11.0).abs() < f32::EPSILON);
        assert!((used_to_actual(-0.4) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_percentage_of_expanding_width_is_zero() {
        let pct = LengthPercentage::Percentage(50.0);
        assert!((resolve_horizontal(pct, UsedWidth::fixed(300.0)) - 150.0).abs() < f32::EPSILON);
        assert!(resolve_horizontal(pct, UsedWidth::expanding()).abs() < f32::EPSILON);
        assert_eq!(
            resolve_max_width(LengthPercentageNone::Percentage(50.0), UsedWidth::expanding()),
            None
        );
    }

    #[test]
    fn test_min_wins_over_max() {
        assert!((clamp_size(500.0, 100.0, Some(200.0)) - 200.0).abs() < f32::EPSILON);
        assert!((clamp_size(500.0, 300.0, Some(200.0)) - 300.0).abs() < f32::EPSILON);
        assert!((clamp_size(50.0, 100.0, None) - 100.0).abs() < f32::EPSILON);
    }
}
