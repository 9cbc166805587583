//! The layout tree: one full layout pass and the queries on its result.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! "In the visual formatting model, each element in the document tree
//! generates zero or more boxes according to the box model."
//!
//! A pass never reuses anything from the one before it. The box tree is
//! the only state that outlives it; layout nodes, formatting contexts,
//! stacking contexts and line boxes are rebuilt from scratch.

use std::collections::HashMap;

use flowbox_tree::{BoxTree, NodeId};
use serde::Serialize;

use super::box_model::{BoxGeometry, Point, Rect, Size};
use super::inline::{GeneratedBox, GeneratedBoxId, GeneratedKind, InlineBox, InlineBoxId, InlineContent, visible_text};
use super::metrics::{FontMetrics, ImageSizes};
use super::node::{LayoutArena, LayoutKind, LayoutNodeId};
use super::pass::LayoutPass;
use super::values::{LayoutStrategy, UsedHeight, UsedWidth};
use super::whitespace::normalize_whitespace;
use crate::error::LayoutError;
use crate::paint::{serialize_node, DisplayList, GraphicsSink, Painter, TextRun};
use crate::style::{ListStyleType, StyleMap};

/// What [`LayoutTree::hit_test`] found under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    /// The topmost node painted there.
    pub node: NodeId,
    /// For a text node, a byte offset into its processed text.
    pub offset: Option<usize>,
}

/// The read-only collaborators of a layout pass.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Computed style per element and replaced node.
    pub styles: &'a StyleMap,
    /// Text measurement.
    pub fonts: &'a dyn FontMetrics,
    /// Intrinsic sizes of replaced content.
    pub images: &'a dyn ImageSizes,
}

/// One line box of a block container, in absolute coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    /// The slot the line was laid out in; its height is the line height.
    pub rect: Rect,
    /// The baseline.
    pub baseline: f32,
    /// Every generated box on the line, in document order.
    pub fragments: Vec<LineFragment>,
}

/// A piece of an inline box on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFragment {
    /// The node the fragment was generated for.
    #[serde(serialize_with = "serialize_node")]
    pub node: NodeId,
    /// Text: content area. Element: border box. Atomic: margin box.
    pub rect: Rect,
    /// What the fragment shows.
    pub content: FragmentContent,
}

/// The kind of a [`LineFragment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FragmentContent {
    /// A run of text.
    Text {
        /// The visible characters of the run.
        text: String,
    },
    /// An inline element, possibly split across lines.
    Element {
        /// The element's left edge is on this line.
        opening: bool,
        /// The element's right edge is on this line.
        closing: bool,
    },
    /// An inline-block, inline table or replaced box.
    Atomic,
}

/// Where a box tree node ended up.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// The node has a layout node of its own.
    Node(LayoutNodeId),
    /// The node is an inline box of a block container.
    Inline(LayoutNodeId, InlineBoxId),
}

/// The result of the last pass.
#[derive(Debug)]
struct LaidOut {
    arena: LayoutArena,
    root: LayoutNodeId,
    index: HashMap<NodeId, Placement>,
}

/// Lays out the subtree of one element and answers geometry queries.
#[derive(Debug)]
pub struct LayoutTree {
    root: NodeId,
    laid_out: Option<LaidOut>,
}

fn check_root(tree: &BoxTree, root: NodeId) -> Result<(), LayoutError> {
    if !tree.contains(root) {
        return Err(LayoutError::StaleRoot(root));
    }
    if tree.as_element(root).is_none() {
        return Err(LayoutError::RootNotElement(root));
    }
    Ok(())
}

impl LayoutTree {
    /// A layout tree rooted at the element `root`.
    ///
    /// # Errors
    ///
    /// Fails when `root` is stale or not an element.
    pub fn new(tree: &BoxTree, root: NodeId) -> Result<Self, LayoutError> {
        check_root(tree, root)?;
        Ok(Self { root, laid_out: None })
    }

    /// The element the layout starts from.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Run a full layout pass at `viewport` size.
    ///
    /// The processed text of every text node is recomputed, so the tree may
    /// have been edited freely since the last pass.
    ///
    /// # Errors
    ///
    /// Fails when the root was freed or replaced since the tree was created.
    pub fn layout(&mut self, tree: &mut BoxTree, cx: &LayoutContext<'_>, viewport: Size) -> Result<(), LayoutError> {
        check_root(tree, self.root)?;
        self.laid_out = None;

        // STEP 1: White space.
        tree.reset_processed_text();
        normalize_whitespace(tree, cx.styles, self.root);

        let mut pass = LayoutPass {
            boxes: &*tree,
            styles: cx.styles,
            fonts: cx.fonts,
            images: cx.images,
            arena: LayoutArena::default(),
            viewport,
        };

        // STEP 2: Layout nodes.
        let root = pass.build(self.root);

        // STEP 3: Intrinsic widths, innermost first.
        for id in pass.arena.ids().rev() {
            if !pass.node(id).is_shrink_to_fit() {
                continue;
            }
            {
                let node = pass.node_mut(id);
                node.containing_width = UsedWidth::expanding();
                node.containing_height = UsedHeight::content();
            }
            let _ = pass.calc_minimum(id);
            let _ = pass.calc_preferred(id);
        }

        // STEP 4: Normal flow, top down.
        {
            let node = pass.node_mut(root);
            node.containing_width = UsedWidth::fixed(viewport.width);
            node.containing_height = UsedHeight::fixed(viewport.height);
        }
        pass.calculate_top_down_widths(root, LayoutStrategy::Normal);
        pass.calculate_top_down_heights(root);
        pass.layout_formatting_root(root, LayoutStrategy::Normal);
        pass.set_root_block_position(root, 0.0, 0.0);

        // STEP 5: Absolutely positioned and fixed boxes.
        pass.layout_absolute_and_fixed_content(root);

        let arena = pass.arena;
        let index = build_index(&arena);
        log::debug!(
            target: "flowbox::layout",
            "laid out {} at {}x{}: {} nodes",
            self.root,
            viewport.width,
            viewport.height,
            arena.nodes.len()
        );
        self.laid_out = Some(LaidOut { arena, root, index });
        Ok(())
    }

    /// Paint the last layout into `sink`, back to front. Paints nothing
    /// before the first [`LayoutTree::layout`].
    pub fn render(&self, sink: &mut dyn GraphicsSink) {
        if let Some(laid_out) = &self.laid_out {
            Painter::new(&laid_out.arena).paint(laid_out.root, sink);
        }
    }

    /// The drawing commands of [`LayoutTree::render`].
    #[must_use]
    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new();
        self.render(&mut list);
        list
    }

    /// The topmost node painted at `point`: a text node when the point is
    /// on a text run, otherwise the element whose border box contains it.
    ///
    /// A text hit also reports the character boundary nearest the point.
    #[must_use]
    pub fn hit_test(&self, fonts: &dyn FontMetrics, point: Point) -> Option<HitResult> {
        let mut sink = HitTest {
            point,
            clips: Vec::new(),
            hit: None,
        };
        self.render(&mut sink);
        let node = sink.hit?;
        Some(HitResult {
            node,
            offset: self.text_offset_at(fonts, node, point),
        })
    }

    /// Byte offset into the processed text of `text_node` of the boundary
    /// nearest `point`, on the fragment under it.
    fn text_offset_at(&self, fonts: &dyn FontMetrics, text_node: NodeId, point: Point) -> Option<usize> {
        let laid_out = self.laid_out.as_ref()?;
        let Some(Placement::Inline(container, inline_id)) = laid_out.index.get(&text_node).copied() else {
            return None;
        };
        let LayoutKind::Inline(content) = &laid_out.arena.node(container).kind else {
            return None;
        };
        let inline = &content.boxes[inline_id.0];
        let origin = laid_out.arena.content_origin(container);
        let (dx, dy) = (origin.x + inline.relative.x, origin.y + inline.relative.y);
        let fragment = content.generated.iter().find(|generated| {
            generated.inline_box == inline_id
                && generated.kind == GeneratedKind::Text
                && generated.rect.translate(dx, dy).contains(point)
        })?;

        // Walk the characters until the point falls before the middle of one.
        let font = inline.style.font();
        let x = point.x - (fragment.rect.x + dx);
        let text = &inline.text[fragment.range.clone()];
        let mut before = 0.0;
        for (index, c) in text.char_indices() {
            let prefix = visible_text(&text[..index + c.len_utf8()]);
            let after = if prefix.is_empty() {
                before
            } else {
                fonts.text_width(&prefix, &font).unwrap_or(before)
            };
            if x < (before + after) / 2.0 {
                return Some(fragment.range.start + index);
            }
            before = after;
        }
        Some(fragment.range.end)
    }

    /// The caret rectangle before byte `offset` of the processed text of
    /// `text_node`: zero width, as tall as the text run.
    ///
    /// `None` when the node is not laid out on any line or `offset` is not
    /// a character boundary of its processed text.
    #[must_use]
    pub fn cursor_box(&self, fonts: &dyn FontMetrics, text_node: NodeId, offset: usize) -> Option<Rect> {
        let laid_out = self.laid_out.as_ref()?;
        let Some(Placement::Inline(container, inline_id)) = laid_out.index.get(&text_node).copied() else {
            return None;
        };
        let LayoutKind::Inline(content) = &laid_out.arena.node(container).kind else {
            return None;
        };
        let inline = &content.boxes[inline_id.0];
        if !inline.text.is_char_boundary(offset) {
            return None;
        }

        // The fragment holding the offset, or the one ending right at it.
        let mut candidates = content
            .generated
            .iter()
            .filter(|generated| generated.inline_box == inline_id && generated.kind == GeneratedKind::Text);
        let fragment = candidates
            .clone()
            .find(|generated| generated.range.start <= offset && offset < generated.range.end)
            .or_else(|| candidates.find(|generated| generated.range.end == offset))?;

        let prefix = visible_text(&inline.text[fragment.range.start..offset]);
        let advance = if prefix.is_empty() {
            0.0
        } else {
            fonts.text_width(&prefix, &inline.style.font()).unwrap_or(0.0)
        };
        let origin = laid_out.arena.content_origin(container);
        let rect = fragment
            .rect
            .translate(origin.x + inline.relative.x, origin.y + inline.relative.y);
        Some(Rect::new(rect.x + advance, rect.y, 0.0, rect.height))
    }

    /// The content box of `element` in absolute coordinates. For an inline
    /// element this spans all its line fragments.
    #[must_use]
    pub fn content_box(&self, element: NodeId) -> Option<Rect> {
        let laid_out = self.laid_out.as_ref()?;
        match laid_out.index.get(&element).copied()? {
            Placement::Node(id) => Some(laid_out.arena.absolute_geometry(id).content),
            Placement::Inline(container, inline_id) => {
                laid_out.fragment_union(container, inline_id, |generated, inline| {
                    if generated.kind != GeneratedKind::Element {
                        return generated.rect;
                    }
                    let left = if generated.opening { inline.border.left + inline.padding.left } else { 0.0 };
                    let right = if generated.closing { inline.border.right + inline.padding.right } else { 0.0 };
                    let top = inline.border.top + inline.padding.top;
                    let bottom = inline.border.bottom + inline.padding.bottom;
                    Rect::new(
                        generated.rect.x + left,
                        generated.rect.y + top,
                        (generated.rect.width - left - right).max(0.0),
                        (generated.rect.height - top - bottom).max(0.0),
                    )
                })
            }
        }
    }

    /// The border box of `element` in absolute coordinates.
    #[must_use]
    pub fn border_box(&self, element: NodeId) -> Option<Rect> {
        let laid_out = self.laid_out.as_ref()?;
        match laid_out.index.get(&element).copied()? {
            Placement::Node(id) => Some(laid_out.arena.absolute_geometry(id).border_box()),
            Placement::Inline(container, inline_id) => {
                laid_out.fragment_union(container, inline_id, |generated, _| generated.rect)
            }
        }
    }

    /// The line boxes of the block container `element`, top to bottom.
    /// Empty for containers with block-level content only.
    #[must_use]
    pub fn line_boxes(&self, element: NodeId) -> Vec<LineBox> {
        let Some(laid_out) = self.laid_out.as_ref() else {
            return Vec::new();
        };
        let Some(Placement::Node(id)) = laid_out.index.get(&element).copied() else {
            return Vec::new();
        };
        let node = laid_out.arena.node(id);
        let LayoutKind::Inline(content) = &node.kind else {
            return Vec::new();
        };
        let origin = laid_out.arena.content_origin(id);
        let (dx, dy) = (origin.x + node.relative.x, origin.y + node.relative.y);
        content
            .lines
            .iter()
            .filter_map(|line| {
                let root = line.root?;
                let mut fragments = Vec::new();
                collect_fragments(content, root, origin, &mut fragments);
                Some(LineBox {
                    rect: line.rect.translate(dx, dy),
                    baseline: line.baseline + dy,
                    fragments,
                })
            })
            .collect()
    }

    /// The absolute baseline of the first line box inside `element`.
    #[must_use]
    pub fn first_line_baseline(&self, element: NodeId) -> Option<f32> {
        let laid_out = self.laid_out.as_ref()?;
        let Some(Placement::Node(id)) = laid_out.index.get(&element).copied() else {
            return None;
        };
        let baseline = laid_out.arena.first_baseline(id)?;
        Some(laid_out.arena.absolute_geometry(id).content.y + baseline)
    }
}

impl LaidOut {
    /// The union of `rect_of` over every fragment of an inline box, in
    /// absolute coordinates.
    fn fragment_union(
        &self,
        container: LayoutNodeId,
        inline_id: InlineBoxId,
        rect_of: impl Fn(&GeneratedBox, &InlineBox) -> Rect,
    ) -> Option<Rect> {
        let LayoutKind::Inline(content) = &self.arena.node(container).kind else {
            return None;
        };
        let inline = &content.boxes[inline_id.0];
        let origin = self.arena.content_origin(container);
        content
            .generated
            .iter()
            .filter(|generated| generated.inline_box == inline_id)
            .map(|generated| rect_of(generated, inline).translate(origin.x + inline.relative.x, origin.y + inline.relative.y))
            .reduce(|a, b| {
                let x = a.x.min(b.x);
                let y = a.y.min(b.y);
                Rect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
            })
    }
}

fn collect_fragments(content: &InlineContent, id: GeneratedBoxId, origin: Point, out: &mut Vec<LineFragment>) {
    let generated = &content.generated[id.0];
    let inline = &content.boxes[generated.inline_box.0];
    let fragment = match generated.kind {
        GeneratedKind::Line => None,
        GeneratedKind::Text => Some(FragmentContent::Text {
            text: visible_text(&inline.text[generated.range.clone()]),
        }),
        GeneratedKind::Element => Some(FragmentContent::Element {
            opening: generated.opening,
            closing: generated.closing,
        }),
        GeneratedKind::Atomic(_) if generated.floated => None,
        GeneratedKind::Atomic(_) => Some(FragmentContent::Atomic),
    };
    if let Some(content) = fragment {
        out.push(LineFragment {
            node: generated.node,
            rect: generated
                .rect
                .translate(origin.x + inline.relative.x, origin.y + inline.relative.y),
            content,
        });
    }
    for child in &generated.children {
        collect_fragments(content, *child, origin, out);
    }
}

/// Layout nodes first; inline boxes only for nodes without one.
fn build_index(arena: &LayoutArena) -> HashMap<NodeId, Placement> {
    let mut index = HashMap::new();
    for id in arena.ids() {
        let _ = index.insert(arena.node(id).node, Placement::Node(id));
    }
    for id in arena.ids() {
        if let LayoutKind::Inline(content) = &arena.node(id).kind {
            for (i, inline) in content.boxes.iter().enumerate().skip(1) {
                if inline.atomic().is_none() {
                    let _ = index
                        .entry(inline.node)
                        .or_insert(Placement::Inline(id, InlineBoxId(i)));
                }
            }
        }
    }
    index
}

// ─────────────────────────────────────────────────────────────────────────────
// Hit testing
// ─────────────────────────────────────────────────────────────────────────────

/// Replays a render and keeps the last thing painted under the point.
struct HitTest {
    point: Point,
    clips: Vec<Rect>,
    hit: Option<NodeId>,
}

impl HitTest {
    fn record(&mut self, node: NodeId, rect: Rect) {
        let point = self.point;
        if rect.contains(point) && self.clips.iter().all(|clip| clip.contains(point)) {
            self.hit = Some(node);
        }
    }
}

impl GraphicsSink for HitTest {
    fn draw_box(&mut self, node: NodeId, geometry: &BoxGeometry) {
        self.record(node, geometry.border_box());
    }

    fn draw_text(&mut self, node: NodeId, run: &TextRun) {
        self.record(node, run.rect);
    }

    fn draw_image(&mut self, node: NodeId, rect: Rect, _source: &str) {
        self.record(node, rect);
    }

    fn draw_marker(&mut self, _node: NodeId, _rect: Rect, _style: ListStyleType) {}

    fn push_clip(&mut self, rect: Rect) {
        self.clips.push(rect);
    }

    fn pop_clip(&mut self) {
        let _ = self.clips.pop();
    }
}
