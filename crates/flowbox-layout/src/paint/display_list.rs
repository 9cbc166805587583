//! Display List - a recording [`GraphicsSink`].
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list keeps every drawing call of a render in painting order,
//! so a renderer (or a test) can replay or inspect it later.

use flowbox_tree::NodeId;
use serde::{Serialize, Serializer};

use super::{GraphicsSink, TextRun};
use crate::layout::{BoxGeometry, Rect};
use crate::style::ListStyleType;

pub(crate) fn serialize_node<S: Serializer>(node: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(node)
}

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum DisplayCommand {
    /// Background and borders of a box, or of one fragment of an inline box.
    Box {
        /// The element the box belongs to.
        #[serde(serialize_with = "serialize_node")]
        node: NodeId,
        /// Final geometry in absolute coordinates.
        geometry: BoxGeometry,
    },

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    Text {
        /// The text node the run comes from.
        #[serde(serialize_with = "serialize_node")]
        node: NodeId,
        /// The run to draw.
        run: TextRun,
    },

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 5: "the replaced content of replaced inline-level elements"
    Image {
        /// The replaced node.
        #[serde(serialize_with = "serialize_node")]
        node: NodeId,
        /// Content box in absolute coordinates.
        rect: Rect,
        /// Lookup key of the image data.
        source: String,
    },

    /// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
    Marker {
        /// The list item.
        #[serde(serialize_with = "serialize_node")]
        node: NodeId,
        /// Marker box in absolute coordinates.
        rect: Rect,
        /// The kind of marker.
        #[serde(serialize_with = "serialize_marker")]
        style: ListStyleType,
    },

    /// Push a clip rectangle onto the clip stack.
    ///
    /// [§ 11.1.1 overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    PushClip {
        /// Clip rectangle in absolute coordinates.
        rect: Rect,
    },

    /// Pop the most recent clip rectangle from the clip stack.
    PopClip,
}

fn serialize_marker<S: Serializer>(style: &ListStyleType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(style)
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// Append a command.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing was painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The text runs in painting order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|command| match command {
            DisplayCommand::Text { run, .. } => Some(run),
            _ => None,
        })
    }
}

impl GraphicsSink for DisplayList {
    fn draw_box(&mut self, node: NodeId, geometry: &BoxGeometry) {
        self.push(DisplayCommand::Box {
            node,
            geometry: *geometry,
        });
    }

    fn draw_text(&mut self, node: NodeId, run: &TextRun) {
        self.push(DisplayCommand::Text { node, run: run.clone() });
    }

    fn draw_image(&mut self, node: NodeId, rect: Rect, source: &str) {
        self.push(DisplayCommand::Image {
            node,
            rect,
            source: source.to_string(),
        });
    }

    fn draw_marker(&mut self, node: NodeId, rect: Rect, style: ListStyleType) {
        self.push(DisplayCommand::Marker { node, rect, style });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.push(DisplayCommand::PushClip { rect });
    }

    fn pop_clip(&mut self) {
        self.push(DisplayCommand::PopClip);
    }
}
