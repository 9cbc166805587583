//! Computed value types consumed by layout.
//!
//! These are the already-resolved values handed over by the cascade: lengths
//! are in CSS pixels, keywords are typed enums, and percentages are kept as
//! percentages because they can only be resolved against a containing block
//! during layout.
//!
//! - [CSS 2.1 § 4.3 Values](https://www.w3.org/TR/CSS2/syndata.html#values)
//! - [CSS 2.1 § 6.1.2 Computed values](https://www.w3.org/TR/CSS2/cascade.html#computed-value)
//!
//! Every value type parses from its CSS text (`"12px"`, `"50%"`, `"auto"`,
//! `"pre-wrap"`), which is how the command-line front end reads documents.

use std::str::FromStr;

use serde::Deserialize;
use strum_macros::{Display as StrumDisplay, EnumString};

/// A computed value string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value '{text}'")]
pub struct ValueParseError {
    /// The kind of value that was expected.
    pub kind: &'static str,
    /// The rejected text.
    pub text: String,
}

impl ValueParseError {
    fn new(kind: &'static str, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Parse `"12px"`, `"12"` (unitless CSS pixels) or `"50%"`.
fn parse_length_or_percentage(text: &str) -> Option<LengthPercentage> {
    let text = text.trim();
    if let Some(number) = text.strip_suffix('%') {
        return number.trim().parse().ok().map(LengthPercentage::Percentage);
    }
    let number = text.strip_suffix("px").unwrap_or(text);
    number.trim().parse().ok().map(LengthPercentage::Length)
}

// ─────────────────────────────────────────────────────────────────────────────
// Length Values
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units) and
/// [§ 4.3.3 Percentages](https://www.w3.org/TR/CSS2/syndata.html#percentage-units)
///
/// Used by padding, min-width/min-height and text-indent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum LengthPercentage {
    /// A length in CSS pixels.
    Length(f32),
    /// "Percentage values are always relative to another value"
    Percentage(f32),
}

impl Default for LengthPercentage {
    fn default() -> Self {
        Self::Length(0.0)
    }
}

impl FromStr for LengthPercentage {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_length_or_percentage(text).ok_or_else(|| ValueParseError::new("length", text))
    }
}

impl TryFrom<String> for LengthPercentage {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// A length, a percentage, or `auto`.
///
/// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property):
/// "Value: <length> | <percentage> | auto | inherit"
///
/// Also used for margins and the box offsets (`top`, `right`, `bottom`, `left`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LengthPercentageAuto {
    /// "The value is computed by the user agent from other properties."
    #[default]
    Auto,
    /// A length in CSS pixels.
    Length(f32),
    /// A percentage of the containing block.
    Percentage(f32),
}

impl LengthPercentageAuto {
    /// Check if the value is `auto`.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl FromStr for LengthPercentageAuto {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match parse_length_or_percentage(text) {
            Some(LengthPercentage::Length(px)) => Ok(Self::Length(px)),
            Some(LengthPercentage::Percentage(pct)) => Ok(Self::Percentage(pct)),
            None => Err(ValueParseError::new("length", text)),
        }
    }
}

impl TryFrom<String> for LengthPercentageAuto {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// A length, a percentage, or `none`.
///
/// [§ 10.4 'max-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths):
/// "Value: <length> | <percentage> | none | inherit"
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LengthPercentageNone {
    /// "No limit on the width of the box."
    #[default]
    None,
    /// A length in CSS pixels.
    Length(f32),
    /// A percentage of the containing block.
    Percentage(f32),
}

impl FromStr for LengthPercentageNone {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.trim().eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        match parse_length_or_percentage(text) {
            Some(LengthPercentage::Length(px)) => Ok(Self::Length(px)),
            Some(LengthPercentage::Percentage(pct)) => Ok(Self::Percentage(pct)),
            None => Err(ValueParseError::new("length", text)),
        }
    }
}

impl TryFrom<String> for LengthPercentageNone {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
///
/// "Value: normal | <number> | <length> | <percentage> | inherit"
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value based
    /// on the font of the element."
    #[default]
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size."
    Number(f32),
    /// A length in CSS pixels.
    Length(f32),
    /// "relative to the font size of the element itself"
    Percentage(f32),
}

impl LineHeight {
    /// Resolve to pixels, or `None` for `normal` (font-defined).
    #[must_use]
    pub fn resolve(self, font_size: f32) -> Option<f32> {
        match self {
            Self::Normal => None,
            Self::Number(n) => Some(n * font_size),
            Self::Length(px) => Some(px),
            Self::Percentage(pct) => Some(pct * font_size / 100.0),
        }
    }
}

impl FromStr for LineHeight {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("normal") {
            return Ok(Self::Normal);
        }
        if let Ok(number) = trimmed.parse::<f32>() {
            return Ok(Self::Number(number));
        }
        match parse_length_or_percentage(trimmed) {
            Some(LengthPercentage::Length(px)) => Ok(Self::Length(px)),
            Some(LengthPercentage::Percentage(pct)) => Ok(Self::Percentage(pct)),
            None => Err(ValueParseError::new("line-height", text)),
        }
    }
}

impl TryFrom<String> for LineHeight {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum VerticalAlign {
    /// "Align the baseline of the box with the baseline of the parent box."
    #[default]
    Baseline,
    /// "Lower the baseline of the box to the proper position for subscripts."
    Sub,
    /// "Raise the baseline of the box to the proper position for superscripts."
    Super,
    /// "Align the top of the box with the top of the parent's content area."
    TextTop,
    /// "Align the vertical midpoint of the box with the baseline of the
    /// parent box plus half the x-height of the parent."
    Middle,
    /// "Align the bottom of the box with the bottom of the parent's content area."
    TextBottom,
    /// "Align the top of the aligned subtree with the top of the line box."
    Top,
    /// "Align the bottom of the aligned subtree with the bottom of the line box."
    Bottom,
    /// "Raise (positive value) or lower (negative value) the box by this distance."
    Length(f32),
    /// "Raise or lower the box by this percentage of the 'line-height' value."
    Percentage(f32),
}

impl FromStr for VerticalAlign {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let keyword = match text.trim().to_ascii_lowercase().as_str() {
            "baseline" => Some(Self::Baseline),
            "sub" => Some(Self::Sub),
            "super" => Some(Self::Super),
            "text-top" => Some(Self::TextTop),
            "middle" => Some(Self::Middle),
            "text-bottom" => Some(Self::TextBottom),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        };
        if let Some(keyword) = keyword {
            return Ok(keyword);
        }
        match parse_length_or_percentage(text) {
            Some(LengthPercentage::Length(px)) => Ok(Self::Length(px)),
            Some(LengthPercentage::Percentage(pct)) => Ok(Self::Percentage(pct)),
            None => Err(ValueParseError::new("vertical-align", text)),
        }
    }
}

impl TryFrom<String> for VerticalAlign {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "Value: auto | <integer> | inherit"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ZIndex {
    /// "The stack level of the generated box in the current stacking context
    /// is 0. The box does not establish a new stacking context."
    #[default]
    Auto,
    /// "This integer is the stack level of the generated box in the current
    /// stacking context. The box also establishes a new stacking context."
    Value(i32),
}

impl FromStr for ZIndex {
    type Err = ValueParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse()
            .map(Self::Value)
            .map_err(|_| ValueParseError::new("z-index", text))
    }
}

impl TryFrom<String> for ZIndex {
    type Error = ValueParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keywords
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Display {
    /// "This value causes an element to not generate any boxes in the
    /// formatting structure."
    None,
    /// "This value causes an element to generate one or more inline boxes."
    #[default]
    Inline,
    /// "This value causes an element to generate a block box."
    Block,
    /// "This value causes an element to generate an inline-level block container."
    InlineBlock,
    /// "This value causes an element to generate a principal block box and a
    /// marker box."
    ListItem,
    /// "Specifies that an element defines a block-level table."
    Table,
    /// "Specifies that an element defines an inline-level table."
    InlineTable,
    /// "Specifies that an element groups one or more rows."
    TableRowGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed before all other rows and row groups."
    TableHeaderGroup,
    /// "Like 'table-row-group', but ... displayed after all other rows."
    TableFooterGroup,
    /// "Specifies that an element is a row of cells."
    TableRow,
    /// "Specifies that an element represents a table cell."
    TableCell,
    /// "Specifies that an element describes a column of cells."
    TableColumn,
    /// "Specifies that an element groups one or more columns."
    TableColumnGroup,
    /// "Specifies a caption for the table."
    TableCaption,
}

impl Display {
    /// [§ 9.2.1](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// "Block-level elements are those elements of the source document that
    /// are formatted visually as blocks."
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::ListItem
                | Self::Table
                | Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableCell
                | Self::TableColumn
                | Self::TableColumnGroup
                | Self::TableCaption
        )
    }

    /// Inline-level boxes that are laid out as a single opaque block.
    #[must_use]
    pub const fn is_atomic_inline(self) -> bool {
        matches!(self, Self::InlineBlock | Self::InlineTable)
    }

    /// Whether this display value generates a table wrapper.
    #[must_use]
    pub const fn is_table(self) -> bool {
        matches!(self, Self::Table | Self::InlineTable)
    }

    /// [§ 9.7 Relationships between 'display', 'position', and 'float'](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
    ///
    /// "Otherwise, if 'position' has the value 'absolute' or 'fixed', the box
    /// is absolutely positioned, the computed value of 'float' is 'none', and
    /// display is set according to the table below."
    #[must_use]
    pub const fn blockified(self) -> Self {
        match self {
            Self::InlineTable => Self::Table,
            Self::Inline
            | Self::InlineBlock
            | Self::TableRowGroup
            | Self::TableHeaderGroup
            | Self::TableFooterGroup
            | Self::TableRow
            | Self::TableCell
            | Self::TableColumn
            | Self::TableColumnGroup
            | Self::TableCaption => Self::Block,
            other => other,
        }
    }
}

/// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow. Then
    /// the box is offset relative to its normal position."
    Relative,
    /// "The box's position (and possibly size) is specified with the 'top',
    /// 'right', 'bottom', and 'left' properties."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
}

impl Position {
    /// Absolutely positioned (absolute or fixed).
    #[must_use]
    pub const fn is_out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}

/// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Clear {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any left-floating boxes."
    Left,
    /// "... below the bottom outer edge of any right-floating boxes."
    Right,
    /// "... below the bottom outer edge of any right-floating and
    /// left-floating boxes."
    Both,
}

impl Clear {
    /// Whether left floats must be cleared.
    #[must_use]
    pub const fn clears_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    /// Whether right floats must be cleared.
    #[must_use]
    pub const fn clears_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

/// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Overflow {
    /// "This value indicates that content is not clipped."
    #[default]
    Visible,
    /// "This value indicates that the content is clipped."
    Hidden,
    /// "This value indicates that the content is clipped and that ... a
    /// scrolling mechanism should be provided."
    Scroll,
    /// "The behavior of the 'auto' value is user agent-dependent."
    Auto,
}

/// [§ 9.10 'direction'](https://www.w3.org/TR/CSS2/visuren.html#direction)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Direction {
    /// "Left-to-right direction."
    #[default]
    Ltr,
    /// "Right-to-left direction."
    Rtl,
}

/// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextAlign {
    /// Inline content is aligned to the left edge of the line box.
    #[default]
    Left,
    /// Inline content is aligned to the right edge of the line box.
    Right,
    /// Inline content is centred within the line box.
    Center,
    /// "Text is justified according to the method specified by the
    /// 'text-justify' property."
    Justify,
}

/// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WhiteSpace {
    /// "This value directs user agents to collapse sequences of white space,
    /// and break lines as necessary to fill line boxes."
    #[default]
    Normal,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are only broken at preserved newline characters."
    Pre,
    /// "This value collapses white space as for 'normal', but suppresses line
    /// breaks within text."
    Nowrap,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are broken at preserved newline characters, and as
    /// necessary to fill line boxes."
    PreWrap,
    /// "This value directs user agents to collapse sequences of white space.
    /// Lines are broken at preserved newline characters, and as necessary to
    /// fill line boxes."
    PreLine,
}

impl WhiteSpace {
    /// Spaces and tabs are collapsed.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Newlines are kept as forced breaks.
    #[must_use]
    pub const fn preserves_newlines(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap | Self::PreLine)
    }

    /// Lines may be broken at white space to fill line boxes.
    #[must_use]
    pub const fn allows_soft_wrap(self) -> bool {
        matches!(self, Self::Normal | Self::PreWrap | Self::PreLine)
    }
}

/// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is
    /// drawn), but still affects layout."
    Hidden,
}

/// [§ 12.5.1 'list-style-type'](https://www.w3.org/TR/CSS2/generate.html#list-style)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ListStyleType {
    /// "A disc (exact presentation is UA-dependent)"
    #[default]
    Disc,
    /// "No marker"
    None,
}

/// [§ 15.4 'font-style'](https://www.w3.org/TR/CSS2/fonts.html#font-styling)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FontStyle {
    /// Upright face.
    #[default]
    Normal,
    /// Italic face.
    Italic,
    /// Oblique face.
    Oblique,
}
