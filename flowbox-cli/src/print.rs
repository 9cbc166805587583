//! Human-readable dumps of a laid out document.

use std::fmt::Write;

use flowbox_layout::LayoutTree;
use flowbox_layout::layout::{FragmentContent, Rect};
use flowbox_layout::paint::{DisplayCommand, DisplayList};
use flowbox_tree::{BoxNodeKind, BoxTree, NodeId};
use owo_colors::{OwoColorize, Style};

/// Styles for the parts of an outline. Plain when color is off.
pub struct Palette {
    heading: Style,
    name: Style,
    id: Style,
    text: Style,
    geometry: Style,
}

impl Palette {
    /// Colored output, or plain text when `color` is false.
    #[must_use]
    pub fn new(color: bool) -> Self {
        if color {
            Self {
                heading: Style::new().bold(),
                name: Style::new().cyan(),
                id: Style::new().dimmed(),
                text: Style::new().green(),
                geometry: Style::new().yellow(),
            }
        } else {
            Self {
                heading: Style::new(),
                name: Style::new(),
                id: Style::new(),
                text: Style::new(),
                geometry: Style::new(),
            }
        }
    }

    /// `=== title ===`
    #[must_use]
    pub fn heading(&self, title: &str) -> String {
        format!("{}", format!("=== {title} ===").style(self.heading))
    }
}

fn format_rect(rect: Rect) -> String {
    format!("x={:.1} y={:.1} w={:.1} h={:.1}", rect.x, rect.y, rect.width, rect.height)
}

/// Name of a node as it appears in every outline.
fn label(tree: &BoxTree, id: NodeId, palette: &Palette) -> String {
    let name = match tree.get(id).map(|node| &node.kind) {
        Some(BoxNodeKind::Element(data)) => format!("<{}>", data.name),
        Some(BoxNodeKind::Replaced(data)) => format!("<{} src={:?}>", data.name, data.source),
        Some(BoxNodeKind::Text(_)) => "text".to_string(),
        None => "?".to_string(),
    };
    format!("{} {}", name.style(palette.name), id.style(palette.id))
}

/// A short preview of some text, newlines escaped.
fn preview(text: &str) -> String {
    let shown: String = text.chars().take(40).collect();
    let suffix = if text.chars().count() > 40 { "..." } else { "" };
    format!("\"{}{suffix}\"", shown.replace('\n', "\\n"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Outlines
// ─────────────────────────────────────────────────────────────────────────────

/// Every node under `root` with its border and content boxes.
#[must_use]
pub fn layout_outline(tree: &BoxTree, layout: &LayoutTree, root: NodeId, palette: &Palette) -> String {
    let mut out = String::new();
    outline_into(&mut out, tree, layout, root, 0, palette);
    out
}

fn outline_into(
    out: &mut String,
    tree: &BoxTree,
    layout: &LayoutTree,
    id: NodeId,
    depth: usize,
    palette: &Palette,
) {
    let indent = "  ".repeat(depth);
    if let Some(text) = tree.as_text(id) {
        let _ = writeln!(
            out,
            "{indent}{} {}",
            preview(&text.processed_text).style(palette.text),
            id.style(palette.id)
        );
        return;
    }

    let _ = writeln!(out, "{indent}{}", label(tree, id, palette));
    match (layout.border_box(id), layout.content_box(id)) {
        (Some(border), Some(content)) => {
            let _ = writeln!(out, "{indent}  border:  {}", format_rect(border).style(palette.geometry));
            let _ = writeln!(out, "{indent}  content: {}", format_rect(content).style(palette.geometry));
        }
        _ => {
            let _ = writeln!(out, "{indent}  (no box)");
        }
    }
    for child in tree.children(id) {
        outline_into(out, tree, layout, child, depth + 1, palette);
    }
}

/// The line boxes of every block container under `root`.
#[must_use]
pub fn line_outline(tree: &BoxTree, layout: &LayoutTree, root: NodeId, palette: &Palette) -> String {
    let mut out = String::new();
    for id in tree.descendants(root) {
        let lines = layout.line_boxes(id);
        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", label(tree, id, palette));
        for (index, line) in lines.iter().enumerate() {
            let _ = writeln!(
                out,
                "  line {index}: {} baseline={:.1}",
                format_rect(line.rect).style(palette.geometry),
                line.baseline
            );
            for fragment in &line.fragments {
                let what = match &fragment.content {
                    FragmentContent::Text { text } => format!("{}", preview(text).style(palette.text)),
                    FragmentContent::Element { opening, closing } => {
                        let open = if *opening { "[" } else { "" };
                        let close = if *closing { "]" } else { "" };
                        format!("{open}{}{close}", label(tree, fragment.node, palette))
                    }
                    FragmentContent::Atomic => format!("atomic {}", label(tree, fragment.node, palette)),
                };
                let _ = writeln!(out, "    x={:.1} w={:.1} {what}", fragment.rect.x, fragment.rect.width);
            }
        }
    }
    out
}

/// One line per drawing command, in painting order.
#[must_use]
pub fn display_list_outline(tree: &BoxTree, list: &DisplayList, palette: &Palette) -> String {
    let mut out = String::new();
    let mut depth = 0_usize;
    for command in list.commands() {
        if matches!(command, DisplayCommand::PopClip) {
            depth = depth.saturating_sub(1);
        }
        let indent = "  ".repeat(depth);
        let _ = match command {
            DisplayCommand::Box { node, geometry } => writeln!(
                out,
                "{indent}box    {} {}",
                label(tree, *node, palette),
                format_rect(geometry.border_box()).style(palette.geometry)
            ),
            DisplayCommand::Text { node, run } => writeln!(
                out,
                "{indent}text   {} at ({:.1}, {:.1}) {}",
                preview(&run.text).style(palette.text),
                run.origin.x,
                run.origin.y,
                node.style(palette.id)
            ),
            DisplayCommand::Image { node, rect, source } => writeln!(
                out,
                "{indent}image  {source} {} {}",
                format_rect(*rect).style(palette.geometry),
                node.style(palette.id)
            ),
            DisplayCommand::Marker { node, rect, style } => writeln!(
                out,
                "{indent}marker {style} {} {}",
                format_rect(*rect).style(palette.geometry),
                node.style(palette.id)
            ),
            DisplayCommand::PushClip { rect } => {
                writeln!(out, "{indent}clip   {}", format_rect(*rect).style(palette.geometry))
            }
            DisplayCommand::PopClip => writeln!(out, "{indent}unclip"),
        };
        if matches!(command, DisplayCommand::PushClip { .. }) {
            depth += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use flowbox_layout::LayoutContext;
    use flowbox_layout::layout::{ApproximateFontMetrics, IntrinsicSize, Size};
    use flowbox_layout::style::{ComputedBox, StyleMap};

    use super::*;

    fn laid_out(text: &str) -> (BoxTree, NodeId, LayoutTree) {
        let mut tree = BoxTree::new();
        let root = tree.create_element("body");
        let child = tree.create_text(text);
        tree.push_back(root, child).unwrap();
        let mut styles = StyleMap::new();
        let _ = styles.insert(root, ComputedBox::block());
        let images: HashMap<String, IntrinsicSize> = HashMap::new();
        let fonts = ApproximateFontMetrics { advance_ratio: 0.5 };
        let cx = LayoutContext {
            styles: &styles,
            fonts: &fonts,
            images: &images,
        };
        let mut layout = LayoutTree::new(&tree, root).unwrap();
        layout.layout(&mut tree, &cx, Size::new(200.0, 100.0)).unwrap();
        (tree, root, layout)
    }

    #[test]
    fn test_layout_outline_shows_boxes() {
        let (tree, root, layout) = laid_out("hello   world");

        let outline = layout_outline(&tree, &layout, root, &Palette::new(false));

        assert!(outline.starts_with(&format!("<body> {root}\n")));
        // One 16px line of text; the root is as tall as its content.
        assert!(outline.contains("border:  x=0.0 y=0.0 w=200.0 h=16.0"));
        assert!(outline.contains("\"hello world\""));
    }

    #[test]
    fn test_line_outline_lists_fragments() {
        let (tree, root, layout) = laid_out("hello");

        let outline = line_outline(&tree, &layout, root, &Palette::new(false));

        // 5 characters at 16px * 0.5.
        assert!(outline.contains("line 0: x=0.0 y=0.0"));
        assert!(outline.contains("x=0.0 w=40.0 \"hello\""));
    }

    #[test]
    fn test_preview_truncates_and_escapes() {
        assert_eq!(preview("a\nb"), "\"a\\nb\"");
        let long = "x".repeat(50);
        assert_eq!(preview(&long), format!("\"{}...\"", "x".repeat(40)));
    }
}
