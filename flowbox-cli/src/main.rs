//! Flowbox CLI - lay out a box tree and inspect the result
//!
//! Usage:
//!   flowbox <file.json>                   Print the layout outline
//!   flowbox <file.json> --dump lines      Print line boxes and fragments
//!   flowbox <file.json> --json            Print boxes, lines and the display list as JSON
//!
//! Set `RUST_LOG=flowbox=debug` for pass summaries; build with the
//! `layout-trace` feature for per-line traces.

mod document;
mod print;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flowbox_common::warning::clear_warnings;
use flowbox_layout::layout::{ApproximateFontMetrics, HitResult, Point, Size};
use flowbox_layout::{LayoutContext, LayoutTree};
use flowbox_tree::{BoxTree, NodeId};
use serde_json::{Value, json};

use document::DocumentFile;
use print::{Palette, display_list_outline, layout_outline, line_outline};

/// What to print after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dump {
    /// The box tree with processed text.
    Tree,
    /// Border and content box of every node.
    Layout,
    /// Line boxes and their fragments.
    Lines,
    /// Drawing commands in painting order.
    DisplayList,
}

/// Flowbox - CSS 2.1 box layout from the command line
#[derive(Parser, Debug)]
#[command(name = "flowbox")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Layout outline in an 800x600 viewport
    flowbox page.json

    # Line boxes in a narrow viewport
    flowbox page.json --width 320 --dump lines

    # Everything, colorless
    flowbox page.json -d tree -d layout -d lines -d display-list --no-color

    # Which node (and text offset) is painted at (40, 12)?
    flowbox page.json --hit 40 12
"#)]
struct Cli {
    /// JSON document with the box tree, styles and image sizes
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Viewport width in CSS pixels
    #[arg(long, default_value = "800")]
    width: f32,

    /// Viewport height in CSS pixels
    #[arg(long, default_value = "600")]
    height: f32,

    /// Character advance as a fraction of the font size
    #[arg(long, default_value = "0.6")]
    advance_ratio: f32,

    /// What to print (repeatable)
    #[arg(short, long, value_enum, default_value = "layout")]
    dump: Vec<Dump>,

    /// Print JSON instead of text outlines
    #[arg(short, long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Hit test a point after layout
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    hit: Option<Vec<f32>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let source =
        fs::read_to_string(&cli.path).with_context(|| format!("reading {}", cli.path.display()))?;
    let mut document = DocumentFile::parse(&source)
        .and_then(DocumentFile::load)
        .with_context(|| format!("loading {}", cli.path.display()))?;
    clear_warnings();

    let fonts = ApproximateFontMetrics {
        advance_ratio: cli.advance_ratio,
    };
    let viewport = Size::new(cli.width, cli.height);
    let mut layout = LayoutTree::new(&document.tree, document.root)?;
    let cx = LayoutContext {
        styles: &document.styles,
        fonts: &fonts,
        images: &document.images,
    };
    layout.layout(&mut document.tree, &cx, viewport)?;
    log::info!(
        target: "flowbox::cli",
        "laid out {} in {}x{}",
        cli.path.display(),
        viewport.width,
        viewport.height
    );

    let hit = cli.hit.as_deref().and_then(|point| match point {
        [x, y] => Some(Point::new(*x, *y)),
        _ => None,
    });

    if cli.json {
        let hit = hit.map(|point| (point, layout.hit_test(&fonts, point)));
        let dump = json_dump(&document.tree, &layout, document.root, &cli.dump, hit)?;
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let palette = Palette::new(!cli.no_color);
    for dump in &cli.dump {
        let (title, body) = match dump {
            Dump::Tree => ("Box Tree", document.tree.dump(document.root)),
            Dump::Layout => (
                "Layout",
                layout_outline(&document.tree, &layout, document.root, &palette),
            ),
            Dump::Lines => ("Line Boxes", line_outline(&document.tree, &layout, document.root, &palette)),
            Dump::DisplayList => (
                "Display List",
                display_list_outline(&document.tree, &layout.display_list(), &palette),
            ),
        };
        println!("{}", palette.heading(&format!("{title} (viewport: {}x{})", cli.width, cli.height)));
        println!("{body}");
    }
    if let Some(point) = hit {
        match layout.hit_test(&fonts, point) {
            Some(HitResult {
                node,
                offset: Some(offset),
            }) => println!("hit ({}, {}): {node} at byte {offset}", point.x, point.y),
            Some(HitResult { node, offset: None }) => println!("hit ({}, {}): {node}", point.x, point.y),
            None => println!("hit ({}, {}): nothing", point.x, point.y),
        }
    }
    Ok(())
}

/// The selected dumps as one JSON object.
fn json_dump(
    tree: &BoxTree,
    layout: &LayoutTree,
    root: NodeId,
    dumps: &[Dump],
    hit: Option<(Point, Option<HitResult>)>,
) -> Result<Value> {
    let mut out = serde_json::Map::new();
    for dump in dumps {
        let (key, value) = match dump {
            Dump::Tree => ("tree", json!(tree.dump(root))),
            Dump::Layout => {
                let boxes: Vec<Value> = tree
                    .descendants(root)
                    .filter(|id| tree.as_text(*id).is_none())
                    .map(|id| {
                        json!({
                            "node": id.to_string(),
                            "border-box": layout.border_box(id),
                            "content-box": layout.content_box(id),
                        })
                    })
                    .collect();
                ("boxes", Value::Array(boxes))
            }
            Dump::Lines => {
                let containers: Vec<Value> = tree
                    .descendants(root)
                    .filter_map(|id| {
                        let lines = layout.line_boxes(id);
                        (!lines.is_empty()).then(|| json!({ "node": id.to_string(), "lines": lines }))
                    })
                    .collect();
                ("lines", Value::Array(containers))
            }
            Dump::DisplayList => ("display-list", serde_json::to_value(layout.display_list())?),
        };
        let _ = out.insert(key.to_string(), value);
    }
    if let Some((point, result)) = hit {
        let node = result.map(|result| result.node.to_string());
        let offset = result.and_then(|result| result.offset);
        let _ = out.insert(
            "hit".to_string(),
            json!({ "point": point, "node": node, "offset": offset }),
        );
    }
    Ok(Value::Object(out))
}
