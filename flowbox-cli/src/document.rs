//! The JSON document format read by the command-line front end.
//!
//! ```json
//! {
//!   "root": {
//!     "type": "element",
//!     "name": "body",
//!     "style": { "display": "block", "padding-left": "8px" },
//!     "children": [
//!       { "type": "text", "text": "Hello, " },
//!       { "type": "replaced", "name": "img", "source": "cat.png" }
//!     ]
//!   },
//!   "images": { "cat.png": { "width": 64, "height": 48 } }
//! }
//! ```
//!
//! Styles are computed values keyed by CSS property name. Text nodes take
//! the style of their parent.

use std::collections::HashMap;

use anyhow::{Context, Result};
use flowbox_layout::layout::IntrinsicSize;
use flowbox_layout::style::{ComputedBox, StyleMap};
use flowbox_tree::{BoxTree, NodeId};
use serde::Deserialize;

/// A whole document file.
#[derive(Debug, Deserialize)]
pub struct DocumentFile {
    root: NodeSpec,
    #[serde(default)]
    images: HashMap<String, IntrinsicSize>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum NodeSpec {
    Element {
        name: String,
        #[serde(default)]
        style: ComputedBox,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    Text {
        text: String,
    },
    Replaced {
        name: String,
        source: String,
        #[serde(default)]
        style: ComputedBox,
    },
}

/// A box tree built from a [`DocumentFile`], ready to lay out.
pub struct Document {
    /// The box tree.
    pub tree: BoxTree,
    /// Computed style of every element and replaced node.
    pub styles: StyleMap,
    /// Intrinsic sizes keyed by image source.
    pub images: HashMap<String, IntrinsicSize>,
    /// The outermost element.
    pub root: NodeId,
}

impl DocumentFile {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown node types or invalid style values.
    pub fn parse(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("malformed document")
    }

    /// Build the box tree and style map.
    ///
    /// # Errors
    ///
    /// Fails when a child cannot be attached to its parent.
    pub fn load(self) -> Result<Document> {
        let mut tree = BoxTree::new();
        let mut styles = StyleMap::new();
        let root = build_node(&mut tree, &mut styles, self.root)?;
        log::debug!(target: "flowbox::cli", "loaded document with {} images", self.images.len());
        Ok(Document {
            tree,
            styles,
            images: self.images,
            root,
        })
    }
}

fn build_node(tree: &mut BoxTree, styles: &mut StyleMap, spec: NodeSpec) -> Result<NodeId> {
    match spec {
        NodeSpec::Element { name, style, children } => {
            let node = tree.create_element(&name);
            let _ = styles.insert(node, style);
            for child in children {
                let child = build_node(tree, styles, child)?;
                tree.push_back(node, child)
                    .with_context(|| format!("attaching {child} to <{name}>"))?;
            }
            Ok(node)
        }
        NodeSpec::Text { text } => Ok(tree.create_text(&text)),
        NodeSpec::Replaced { name, source, style } => {
            let node = tree.create_replaced(&name, &source);
            let _ = styles.insert(node, style);
            Ok(node)
        }
    }
}
