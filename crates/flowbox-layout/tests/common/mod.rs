//! Document fixtures shared by the layout integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use flowbox_layout::layout::{FontExtents, FontMetrics, IntrinsicSize, LayoutContext, LayoutTree, Size};
use flowbox_layout::style::{ComputedBox, FontDescriptor, StyleMap};
use flowbox_tree::{BoxTree, NodeId};

/// Letters advance 20px, spaces 15px; ascent 16px, descent 4px.
pub struct TestFont;

impl FontMetrics for TestFont {
    fn text_width(&self, text: &str, _font: &FontDescriptor) -> Option<f32> {
        Some(text.chars().map(|c| if c == ' ' { 15.0 } else { 20.0 }).sum())
    }

    fn extents(&self, _font: &FontDescriptor) -> Option<FontExtents> {
        Some(FontExtents {
            ascent: 16.0,
            descent: 4.0,
        })
    }
}

/// A box tree plus the styles and images it is laid out with.
pub struct Document {
    pub tree: BoxTree,
    pub styles: StyleMap,
    pub images: HashMap<String, IntrinsicSize>,
    pub root: NodeId,
}

impl Document {
    /// A document whose root is a block `div`.
    pub fn new() -> Self {
        let mut tree = BoxTree::new();
        let root = tree.create_element("div");
        let mut styles = StyleMap::new();
        let _ = styles.insert(root, ComputedBox::block());
        Self {
            tree,
            styles,
            images: HashMap::new(),
            root,
        }
    }

    /// Append an element with `style` to `parent`.
    pub fn element(&mut self, parent: NodeId, name: &str, style: ComputedBox) -> NodeId {
        let node = self.tree.create_element(name);
        self.tree.push_back(parent, node).unwrap();
        let _ = self.styles.insert(node, style);
        node
    }

    /// Append a text node to `parent`.
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.tree.create_text(text);
        self.tree.push_back(parent, node).unwrap();
        node
    }

    /// Append an image of intrinsic size `width`×`height` to `parent`.
    pub fn image(&mut self, parent: NodeId, source: &str, size: (f32, f32), style: ComputedBox) -> NodeId {
        let node = self.tree.create_replaced("img", source);
        self.tree.push_back(parent, node).unwrap();
        let _ = self.styles.insert(node, style);
        let _ = self.images.insert(source.to_string(), IntrinsicSize::new(size.0, size.1));
        node
    }

    /// Set the style of the root.
    pub fn root_style(&mut self, style: ComputedBox) {
        let _ = self.styles.insert(self.root, style);
    }

    /// Lay the document out with [`TestFont`] in a `width`×`height` viewport.
    pub fn layout(&mut self, width: f32, height: f32) -> LayoutTree {
        let mut layout = LayoutTree::new(&self.tree, self.root).unwrap();
        let cx = LayoutContext {
            styles: &self.styles,
            fonts: &TestFont,
            images: &self.images,
        };
        layout
            .layout(&mut self.tree, &cx, Size::new(width, height))
            .unwrap();
        layout
    }
}

/// The visible text of every text fragment on each line of `element`.
pub fn line_texts(layout: &LayoutTree, element: NodeId) -> Vec<String> {
    use flowbox_layout::layout::FragmentContent;

    layout
        .line_boxes(element)
        .iter()
        .map(|line| {
            line.fragments
                .iter()
                .filter_map(|fragment| match &fragment.content {
                    FragmentContent::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<String>()
        })
        .collect()
}
