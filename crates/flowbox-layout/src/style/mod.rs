//! Computed style consumed by layout.
//!
//! [CSS 2.1 § 6.1 Specified, computed, and actual values](https://www.w3.org/TR/CSS2/cascade.html#value-stages)
//!
//! Selector matching and the cascade happen elsewhere. Layout receives one
//! [`ComputedBox`] per element or replaced node through a [`StyleMap`] and
//! never writes to it.

pub mod values;

use std::collections::HashMap;

use flowbox_tree::{BoxTree, NodeId};
use serde::{Deserialize, Serialize};

pub use values::{
    Clear, Direction, Display, Float, FontStyle, LengthPercentage, LengthPercentageAuto,
    LengthPercentageNone, LineHeight, ListStyleType, Overflow, Position, TextAlign,
    ValueParseError, VerticalAlign, Visibility, WhiteSpace, ZIndex,
};

/// The font a run of text is measured with.
///
/// [§ 15 Fonts](https://www.w3.org/TR/CSS2/fonts.html)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontDescriptor {
    /// 'font-family', a single family name.
    pub family: String,
    /// 'font-size' in CSS pixels.
    pub size: f32,
    /// 'font-weight' as a number (400 normal, 700 bold).
    pub weight: u16,
    /// 'font-style'.
    #[serde(skip)]
    pub style: FontStyle,
}

/// The computed values of every property layout looks at.
///
/// Field names follow the CSS property names (kebab-case when
/// deserialized), and every field falls back to its initial value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComputedBox {
    /// [§ 9.2.4 'display'](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
    pub display: Display,
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub position: Position,
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    pub overflow: Overflow,

    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: LengthPercentageAuto,
    /// [§ 10.5 'height'](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: LengthPercentageAuto,
    /// [§ 10.4 'min-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: LengthPercentage,
    /// 'max-width'.
    pub max_width: LengthPercentageNone,
    /// [§ 10.7 'min-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: LengthPercentage,
    /// 'max-height'.
    pub max_height: LengthPercentageNone,

    /// [§ 8.3 'margin-top'](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin_top: LengthPercentageAuto,
    /// 'margin-right'.
    pub margin_right: LengthPercentageAuto,
    /// 'margin-bottom'.
    pub margin_bottom: LengthPercentageAuto,
    /// 'margin-left'.
    pub margin_left: LengthPercentageAuto,

    /// [§ 8.5.1 'border-top-width'](https://www.w3.org/TR/CSS2/box.html#border-width-properties),
    /// already zero when the border style is `none`.
    pub border_top_width: f32,
    /// 'border-right-width'.
    pub border_right_width: f32,
    /// 'border-bottom-width'.
    pub border_bottom_width: f32,
    /// 'border-left-width'.
    pub border_left_width: f32,

    /// [§ 8.4 'padding-top'](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding_top: LengthPercentage,
    /// 'padding-right'.
    pub padding_right: LengthPercentage,
    /// 'padding-bottom'.
    pub padding_bottom: LengthPercentage,
    /// 'padding-left'.
    pub padding_left: LengthPercentage,

    /// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    pub top: LengthPercentageAuto,
    /// 'right'.
    pub right: LengthPercentageAuto,
    /// 'bottom'.
    pub bottom: LengthPercentageAuto,
    /// 'left'.
    pub left: LengthPercentageAuto,
    /// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    pub z_index: ZIndex,
    /// [§ 9.10 'direction'](https://www.w3.org/TR/CSS2/visuren.html#direction)
    pub direction: Direction,

    /// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    pub line_height: LineHeight,
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    pub vertical_align: VerticalAlign,
    /// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
    pub text_align: TextAlign,
    /// [§ 16.1 'text-indent'](https://www.w3.org/TR/CSS2/text.html#indentation-prop)
    pub text_indent: LengthPercentage,
    /// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
    pub white_space: WhiteSpace,
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    pub visibility: Visibility,
    /// [§ 12.5.1 'list-style-type'](https://www.w3.org/TR/CSS2/generate.html#list-style)
    pub list_style_type: ListStyleType,
    /// [§ 17.6.1 'border-spacing'](https://www.w3.org/TR/CSS2/tables.html#separated-borders),
    /// horizontal and vertical alike.
    pub border_spacing: f32,

    /// [§ 15.3 'font-family'](https://www.w3.org/TR/CSS2/fonts.html#font-family-prop)
    pub font_family: String,
    /// [§ 15.7 'font-size'](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
    pub font_size: f32,
    /// [§ 15.6 'font-weight'](https://www.w3.org/TR/CSS2/fonts.html#font-boldness)
    pub font_weight: u16,
    /// [§ 15.4 'font-style'](https://www.w3.org/TR/CSS2/fonts.html#font-styling)
    pub font_style: FontStyle,
}

impl Default for ComputedBox {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            overflow: Overflow::Visible,
            width: LengthPercentageAuto::Auto,
            height: LengthPercentageAuto::Auto,
            min_width: LengthPercentage::Length(0.0),
            max_width: LengthPercentageNone::None,
            min_height: LengthPercentage::Length(0.0),
            max_height: LengthPercentageNone::None,
            margin_top: LengthPercentageAuto::Length(0.0),
            margin_right: LengthPercentageAuto::Length(0.0),
            margin_bottom: LengthPercentageAuto::Length(0.0),
            margin_left: LengthPercentageAuto::Length(0.0),
            border_top_width: 0.0,
            border_right_width: 0.0,
            border_bottom_width: 0.0,
            border_left_width: 0.0,
            padding_top: LengthPercentage::Length(0.0),
            padding_right: LengthPercentage::Length(0.0),
            padding_bottom: LengthPercentage::Length(0.0),
            padding_left: LengthPercentage::Length(0.0),
            top: LengthPercentageAuto::Auto,
            right: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
            left: LengthPercentageAuto::Auto,
            z_index: ZIndex::Auto,
            direction: Direction::Ltr,
            line_height: LineHeight::Normal,
            vertical_align: VerticalAlign::Baseline,
            text_align: TextAlign::Left,
            text_indent: LengthPercentage::Length(0.0),
            white_space: WhiteSpace::Normal,
            visibility: Visibility::Visible,
            list_style_type: ListStyleType::Disc,
            border_spacing: 0.0,
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
        }
    }
}

impl ComputedBox {
    /// A block box with otherwise initial values.
    #[must_use]
    pub fn block() -> Self {
        Self {
            display: Display::Block,
            ..Self::default()
        }
    }

    /// The font descriptor assembled from the `font-*` properties.
    #[must_use]
    pub fn font(&self) -> FontDescriptor {
        FontDescriptor {
            family: self.font_family.clone(),
            size: self.font_size,
            weight: self.font_weight,
            style: self.font_style,
        }
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    #[must_use]
    pub const fn is_floated(&self) -> bool {
        !matches!(self.float, Float::None)
    }

    /// Absolutely or fixed positioned.
    #[must_use]
    pub const fn is_out_of_flow(&self) -> bool {
        self.position.is_out_of_flow()
    }

    /// [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    ///
    /// "the box establishes a new stacking context" when it is positioned
    /// and its 'z-index' is not `auto`.
    #[must_use]
    pub const fn establishes_stacking_context(&self) -> bool {
        !matches!(self.position, Position::Static) && matches!(self.z_index, ZIndex::Value(_))
    }
}

/// Computed style for every element and replaced node of a [`BoxTree`].
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<NodeId, ComputedBox>,
    fallback: ComputedBox,
}

impl StyleMap {
    /// Create an empty map; unknown nodes get initial values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style of a node, returning the previous one.
    pub fn insert(&mut self, node: NodeId, style: ComputedBox) -> Option<ComputedBox> {
        self.styles.insert(node, style)
    }

    /// The style recorded for exactly this node.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&ComputedBox> {
        self.styles.get(&node)
    }

    /// The style layout uses for `node`.
    ///
    /// Text nodes have no style of their own and use their parent
    /// element's. Nodes with no entry get initial values.
    #[must_use]
    pub fn computed(&self, tree: &BoxTree, node: NodeId) -> &ComputedBox {
        let owner = if tree.as_text(node).is_some() {
            tree.parent(node).unwrap_or(node)
        } else {
            node
        };
        self.styles.get(&owner).unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_kebab_case_style() {
        let json = r#"{
            "display": "inline-block",
            "white-space": "pre-line",
            "margin-left": "auto",
            "padding-top": "10%",
            "border-left-width": 2,
            "font-size": 20
        }"#;

        let style: ComputedBox = serde_json::from_str(json).unwrap();

        assert_eq!(style.display, Display::InlineBlock);
        assert_eq!(style.white_space, WhiteSpace::PreLine);
        assert_eq!(style.margin_left, LengthPercentageAuto::Auto);
        assert_eq!(style.padding_top, LengthPercentage::Percentage(10.0));
        assert!((style.border_left_width - 2.0).abs() < f32::EPSILON);
        assert!((style.font().size - 20.0).abs() < f32::EPSILON);
        // Unset properties keep their initial values.
        assert_eq!(style.margin_top, LengthPercentageAuto::Length(0.0));
        assert_eq!(style.position, Position::Static);
    }

    #[test]
    fn test_text_nodes_use_parent_style() {
        let mut tree = BoxTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("hi");
        tree.push_back(p, text).unwrap();
        let mut styles = StyleMap::new();
        let _ = styles.insert(
            p,
            ComputedBox {
                white_space: WhiteSpace::Pre,
                ..ComputedBox::block()
            },
        );

        assert_eq!(styles.computed(&tree, text).white_space, WhiteSpace::Pre);
        assert!(styles.get(text).is_none());
    }

    #[test]
    fn test_stacking_context_needs_position_and_z_index() {
        let mut style = ComputedBox {
            z_index: ZIndex::Value(1),
            ..ComputedBox::default()
        };
        assert!(!style.establishes_stacking_context());
        style.position = Position::Relative;
        assert!(style.establishes_stacking_context());
    }
}
