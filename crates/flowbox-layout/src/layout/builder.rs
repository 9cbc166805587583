//! Building the layout nodes of one pass from the box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The display property, determines the type of box or boxes that are
//! generated for an element."
//!
//! Every block container, table, table cell and replaced box gets a
//! [`LayoutNode`]. Each node is wired to the block formatting context it
//! lays its content out in (its own when it establishes one) and to the
//! stacking context it paints in.

use flowbox_common::warning::warn_once;
use flowbox_tree::NodeId;

use super::float::FloatSide;
use super::formatting_context::FormattingContextId;
use super::inline::{AtomicPlacement, InlineBox, InlineBoxId, InlineBoxKind, InlineContent};
use super::node::{LayoutKind, LayoutNode, LayoutNodeId};
use super::pass::LayoutPass;
use super::stacking::StackingContextId;
use super::table::{TableContent, TableRow};
use crate::style::{ComputedBox, Display, Float, Overflow, Position, ZIndex};

/// Where a node is attached while building.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    parent: Option<LayoutNodeId>,
    bfc: Option<FormattingContextId>,
    stacking: Option<StackingContextId>,
}

impl LayoutPass<'_> {
    /// Build the layout nodes below (and including) `root`.
    pub(crate) fn build(&mut self, root: NodeId) -> LayoutNodeId {
        let id = self.build_node(
            root,
            Attachment {
                parent: None,
                bfc: None,
                stacking: None,
            },
        );
        log::debug!(
            target: "flowbox::layout",
            "built {} layout nodes, {} formatting contexts",
            self.arena.nodes.len(),
            self.arena.contexts.len()
        );
        id
    }

    /// The style a node is laid out with.
    ///
    /// [§ 9.7 Relationships between 'display', 'position', and 'float'](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
    ///
    /// "Otherwise, if 'position' has the value 'absolute' or 'fixed', the box
    /// is absolutely positioned, the computed value of 'float' is 'none',
    /// and display is set according to the table below." Floats and the
    /// root element are blockified the same way.
    fn used_style(&self, node: NodeId, is_root: bool) -> ComputedBox {
        let mut style = self.styles.computed(self.boxes, node).clone();
        if style.is_out_of_flow() {
            style.float = Float::None;
        }
        if style.is_out_of_flow() || style.is_floated() || is_root {
            style.display = style.display.blockified();
        }
        style
    }

    fn build_node(&mut self, node: NodeId, at: Attachment) -> LayoutNodeId {
        let style = self.used_style(node, at.parent.is_none());
        let replaced = self.boxes.as_replaced(node).map(|data| data.source.clone());

        // STEP 1: Formatting context.
        // [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
        let establishes = at.bfc.is_none()
            || style.is_out_of_flow()
            || style.is_floated()
            || replaced.is_some()
            || style.overflow != Overflow::Visible
            || matches!(
                style.display,
                Display::InlineBlock | Display::InlineTable | Display::Table | Display::TableCell
            );
        let bfc = match at.bfc {
            Some(bfc) if !establishes => bfc,
            // Fixed boxes are positioned against the viewport, outside every
            // other context.
            _ if style.position == Position::Fixed => self.arena.contexts.create(None),
            parent => self.arena.contexts.create(parent),
        };

        // STEP 2: Stacking context.
        // [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
        let (stacking, establishes_stacking) = match at.stacking {
            Some(parent) if style.establishes_stacking_context() => {
                let z_index = match style.z_index {
                    ZIndex::Value(z) => z,
                    ZIndex::Auto => 0,
                };
                (self.arena.stacking.create(Some(parent), z_index), true)
            }
            Some(parent) => (parent, false),
            None => (self.arena.stacking.create(None, 0), true),
        };

        // STEP 3: The node itself; its content is filled in once the
        // children exist.
        let mut layout_node = LayoutNode::new(node, style, LayoutKind::Block(Vec::new()), bfc, stacking);
        layout_node.parent = at.parent;
        layout_node.is_root = establishes;
        layout_node.establishes_stacking = establishes_stacking;
        let id = self.arena.push(layout_node);
        if establishes_stacking {
            self.arena.stacking.set_root(stacking, id);
        }

        // STEP 4: Content.
        let inner = Attachment {
            parent: Some(id),
            bfc: Some(bfc),
            stacking: Some(stacking),
        };
        let kind = if let Some(source) = replaced {
            LayoutKind::Replaced(self.replaced_content(&source))
        } else if self.node(id).style.display.is_table() {
            LayoutKind::Table(Box::new(self.build_table(node, inner)))
        } else if self.has_only_block_children(node) {
            let children = self
                .boxes
                .children(node)
                .filter(|child| !self.is_skipped(*child))
                .collect::<Vec<_>>();
            LayoutKind::Block(
                children
                    .into_iter()
                    .map(|child| self.build_node(child, inner))
                    .collect(),
            )
        } else {
            LayoutKind::Inline(Box::new(self.build_inline(node, inner)))
        };
        self.node_mut(id).kind = kind;
        id
    }

    /// Nodes that generate nothing: `display: none` elements and text that
    /// collapses away between blocks.
    fn is_skipped(&self, node: NodeId) -> bool {
        if self.boxes.as_text(node).is_some() {
            let white_space = self.styles.computed(self.boxes, node).white_space;
            let text = self.boxes.processed_text(node);
            return white_space.collapses_spaces()
                && text
                    .chars()
                    .all(|c| c == ' ' || (c == '\n' && !white_space.preserves_newlines()));
        }
        self.styles.computed(self.boxes, node).display == Display::None
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// A container whose children are all in-flow block-level boxes stacks
    /// them; anything else (text, inline boxes, floats, positioned boxes)
    /// makes it an inline formatting container with the blocks as leaves.
    fn has_only_block_children(&self, node: NodeId) -> bool {
        self.boxes.children(node).all(|child| {
            if self.is_skipped(child) {
                return true;
            }
            if self.boxes.as_text(child).is_some() {
                return false;
            }
            let style = self.styles.computed(self.boxes, child);
            style.display.is_block_level() && !style.is_floated() && !style.is_out_of_flow()
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inline content
    // ─────────────────────────────────────────────────────────────────────

    fn build_inline(&mut self, container: NodeId, at: Attachment) -> InlineContent {
        let style = self.styles.computed(self.boxes, container).clone();
        let mut boxes = vec![InlineBox::new(container, InlineBoxKind::Root, style, None)];
        self.build_inline_children(container, InlineBoxId(0), &mut boxes, at);
        boxes[0].end = boxes.len();
        InlineContent {
            boxes,
            ..InlineContent::default()
        }
    }

    fn build_inline_children(&mut self, parent: NodeId, parent_box: InlineBoxId, boxes: &mut Vec<InlineBox>, at: Attachment) {
        let children: Vec<NodeId> = self.boxes.children(parent).collect();
        for child in children {
            let index = boxes.len();
            let style = self.styles.computed(self.boxes, child).clone();
            if let Some(data) = self.boxes.as_text(child) {
                if data.processed_text.is_empty() {
                    continue;
                }
                let mut run = InlineBox::new(child, InlineBoxKind::Text, style, Some(parent_box));
                run.text.clone_from(&data.processed_text);
                run.selection = data
                    .selection
                    .as_ref()
                    .map(|selection| selection.processed.clone())
                    .filter(|range| !range.is_empty());
                run.end = index + 1;
                boxes.push(run);
                continue;
            }
            if style.display == Display::None {
                continue;
            }

            let is_inline_element = self.boxes.as_replaced(child).is_none()
                && style.display == Display::Inline
                && !style.is_floated()
                && !style.is_out_of_flow();
            if is_inline_element {
                boxes.push(InlineBox::new(child, InlineBoxKind::Element, style, Some(parent_box)));
                self.build_inline_children(child, InlineBoxId(index), boxes, at);
                boxes[index].end = boxes.len();
                continue;
            }

            let node = self.build_node(child, at);
            let used = &self.node(node).style;
            let placement = if used.is_out_of_flow() {
                AtomicPlacement::OutOfFlow
            } else if used.float == Float::Left {
                AtomicPlacement::Float(FloatSide::Left)
            } else if used.float == Float::Right {
                AtomicPlacement::Float(FloatSide::Right)
            } else if used.display.is_block_level() {
                AtomicPlacement::Block
            } else {
                AtomicPlacement::Inline
            };
            let mut leaf = InlineBox::new(child, InlineBoxKind::Atomic { node, placement }, style, Some(parent_box));
            leaf.end = index + 1;
            boxes.push(leaf);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tables
    // ─────────────────────────────────────────────────────────────────────

    /// [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
    ///
    /// Rows directly inside the table or inside row groups, cells directly
    /// inside rows. Anything else is dropped with a warning.
    fn build_table(&mut self, table: NodeId, at: Attachment) -> TableContent {
        let mut rows = Vec::new();
        let children: Vec<NodeId> = self.boxes.children(table).collect();
        for child in children {
            if self.is_skipped(child) {
                continue;
            }
            match self.styles.computed(self.boxes, child).display {
                Display::TableRow => rows.push(self.build_table_row(child, at)),
                Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup => {
                    let group: Vec<NodeId> = self.boxes.children(child).collect();
                    for row in group {
                        if self.is_skipped(row) {
                            continue;
                        }
                        if self.styles.computed(self.boxes, row).display == Display::TableRow {
                            rows.push(self.build_table_row(row, at));
                        } else {
                            self.unsupported_table_child(row);
                        }
                    }
                }
                _ => self.unsupported_table_child(child),
            }
        }
        TableContent {
            rows,
            columns: Vec::new(),
        }
    }

    fn build_table_row(&mut self, row: NodeId, at: Attachment) -> TableRow {
        let height = self.styles.computed(self.boxes, row).height;
        let mut cells = Vec::new();
        let children: Vec<NodeId> = self.boxes.children(row).collect();
        for child in children {
            if self.is_skipped(child) {
                continue;
            }
            if self.styles.computed(self.boxes, child).display == Display::TableCell {
                cells.push(self.build_node(child, at));
            } else {
                self.unsupported_table_child(child);
            }
        }
        TableRow { height, cells }
    }

    fn unsupported_table_child(&self, node: NodeId) {
        let display = self.styles.computed(self.boxes, node).display;
        let _ = warn_once("table", &format!("ignoring {display} box {node} inside a table"));
    }
}
