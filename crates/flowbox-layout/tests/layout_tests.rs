//! End-to-end tests: build a box tree, lay it out, then query and paint it.

mod common;

use common::{line_texts, Document, TestFont};
use flowbox_layout::layout::{HitResult, Point, Rect};
use flowbox_layout::paint::DisplayCommand;
use flowbox_layout::style::{
    Clear, ComputedBox, Display, Float, LengthPercentage, LengthPercentageAuto, ListStyleType, Overflow, Position,
    Visibility, ZIndex,
};
use flowbox_layout::{LayoutError, LayoutTree};
use flowbox_tree::BoxTree;
use quickcheck_macros::quickcheck;

fn block_with(style: ComputedBox) -> ComputedBox {
    ComputedBox {
        display: Display::Block,
        ..style
    }
}

fn fixed_block(width: f32, height: f32) -> ComputedBox {
    block_with(ComputedBox {
        width: LengthPercentageAuto::Length(width),
        height: LengthPercentageAuto::Length(height),
        ..ComputedBox::default()
    })
}

// ========== construction ==========

#[test]
fn test_text_root_is_rejected() {
    let mut tree = BoxTree::new();
    let text = tree.create_text("hello");

    assert_eq!(LayoutTree::new(&tree, text).err(), Some(LayoutError::RootNotElement(text)));
}

#[test]
fn test_root_from_other_tree_is_rejected() {
    let mut other = BoxTree::new();
    let _ = other.create_element("div");
    let foreign = other.create_element("div");
    let mut tree = BoxTree::new();
    let _ = tree.create_element("div");

    assert_eq!(LayoutTree::new(&tree, foreign).err(), Some(LayoutError::StaleRoot(foreign)));
}

#[test]
fn test_queries_are_empty_before_layout() {
    let doc = Document::new();
    let layout = LayoutTree::new(&doc.tree, doc.root).unwrap();

    assert_eq!(layout.border_box(doc.root), None);
    assert!(layout.line_boxes(doc.root).is_empty());
    assert!(layout.display_list().is_empty());
    assert_eq!(layout.hit_test(&TestFont, Point::new(1.0, 1.0)), None);
}

// ========== block layout ==========

#[test]
fn test_root_is_as_tall_as_its_content() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.element(root, "p", fixed_block(100.0, 30.0));

    let layout = doc.layout(300.0, 200.0);

    assert_eq!(layout.border_box(root), Some(Rect::new(0.0, 0.0, 300.0, 30.0)));
}

#[test]
fn test_root_with_fixed_height() {
    let mut doc = Document::new();
    doc.root_style(fixed_block(300.0, 200.0));

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(doc.root), Some(Rect::new(0.0, 0.0, 300.0, 200.0)));
}

#[test]
fn test_blocks_stack_with_collapsed_margins() {
    let mut doc = Document::new();
    let root = doc.root;
    let first = doc.element(
        root,
        "p",
        ComputedBox {
            margin_bottom: LengthPercentageAuto::Length(20.0),
            ..fixed_block(100.0, 30.0)
        },
    );
    let second = doc.element(
        root,
        "p",
        ComputedBox {
            margin_top: LengthPercentageAuto::Length(10.0),
            ..fixed_block(100.0, 30.0)
        },
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(first).map(|rect| rect.y), Some(0.0));
    // max(20, 10) between them.
    assert_eq!(layout.border_box(second).map(|rect| rect.y), Some(50.0));
    assert!(layout.line_boxes(root).is_empty());
}

#[test]
fn test_padding_and_border_surround_the_content_box() {
    let mut doc = Document::new();
    let root = doc.root;
    let boxed = doc.element(
        root,
        "div",
        ComputedBox {
            padding_left: LengthPercentage::Length(10.0),
            padding_top: LengthPercentage::Length(5.0),
            border_left_width: 2.0,
            border_top_width: 3.0,
            ..fixed_block(100.0, 40.0)
        },
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.content_box(boxed), Some(Rect::new(12.0, 8.0, 100.0, 40.0)));
    assert_eq!(layout.border_box(boxed), Some(Rect::new(0.0, 0.0, 112.0, 48.0)));
}

#[test]
fn test_layout_is_deterministic() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "The quick brown fox ");
    let span = doc.element(
        root,
        "span",
        ComputedBox {
            padding_left: LengthPercentage::Length(4.0),
            ..ComputedBox::default()
        },
    );
    let _ = doc.text(span, "jumps over   the");
    let _ = doc.element(
        root,
        "aside",
        ComputedBox {
            float: Float::Right,
            ..fixed_block(60.0, 60.0)
        },
    );
    let _ = doc.text(root, " lazy dog");

    let first = doc.layout(250.0, 600.0);
    let second = doc.layout(250.0, 600.0);

    assert_eq!(first.display_list(), second.display_list());
    assert_eq!(first.line_boxes(root), second.line_boxes(root));
}

// ========== shrink-to-fit ==========

#[quickcheck]
fn prop_float_width_is_clamped_between_minimum_and_preferred(width: u8) -> bool {
    // Words of 40, 80 and 20px: minimum 80px, preferred 40+15+80+15+20.
    let available = f32::from(width) + 10.0;
    let mut doc = Document::new();
    let root = doc.root;
    let float = doc.element(
        root,
        "aside",
        block_with(ComputedBox {
            float: Float::Left,
            ..ComputedBox::default()
        }),
    );
    let _ = doc.text(float, "aa aaaa a");

    let layout = doc.layout(available, 600.0);

    let expected = available.clamp(80.0, 170.0);
    layout.border_box(float).map(|rect| rect.width) == Some(expected)
}

#[test]
fn test_inline_block_shrinks_to_its_text() {
    let mut doc = Document::new();
    let root = doc.root;
    let inline_block = doc.element(
        root,
        "span",
        ComputedBox {
            display: Display::InlineBlock,
            ..ComputedBox::default()
        },
    );
    let _ = doc.text(inline_block, "aa aa");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(inline_block).map(|rect| rect.width), Some(95.0));
}

#[test]
fn test_float_with_right_float_shrinks_to_float_plus_text() {
    let mut doc = Document::new();
    let root = doc.root;
    let outer = doc.element(
        root,
        "aside",
        block_with(ComputedBox {
            float: Float::Left,
            ..ComputedBox::default()
        }),
    );
    let inner = doc.element(
        outer,
        "img",
        ComputedBox {
            float: Float::Right,
            ..fixed_block(50.0, 30.0)
        },
    );
    let _ = doc.text(outer, "aa bb");

    let layout = doc.layout(300.0, 600.0);

    // 50px float beside the 95px of "aa bb".
    assert_eq!(layout.border_box(outer).map(|rect| rect.width), Some(145.0));
    assert_eq!(line_texts(&layout, outer), vec!["aa bb"]);
    assert_eq!(layout.border_box(inner), Some(Rect::new(95.0, 0.0, 50.0, 30.0)));
}

#[test]
fn test_inline_block_with_right_float_keeps_text_on_one_line() {
    let mut doc = Document::new();
    let root = doc.root;
    let inline_block = doc.element(
        root,
        "span",
        ComputedBox {
            display: Display::InlineBlock,
            ..ComputedBox::default()
        },
    );
    let _ = doc.element(
        inline_block,
        "img",
        ComputedBox {
            float: Float::Right,
            ..fixed_block(50.0, 10.0)
        },
    );
    let _ = doc.text(inline_block, "aa bb");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(inline_block).map(|rect| rect.width), Some(145.0));
    assert_eq!(line_texts(&layout, inline_block), vec!["aa bb"]);
}

// ========== clearance ==========

#[test]
fn test_clear_moves_blocks_below_floats() {
    let mut doc = Document::new();
    let root = doc.root;
    let floats = doc.element(root, "div", ComputedBox::block());
    let _ = doc.element(
        floats,
        "aside",
        ComputedBox {
            float: Float::Left,
            ..fixed_block(100.0, 40.0)
        },
    );
    let _ = doc.element(
        floats,
        "aside",
        ComputedBox {
            float: Float::Right,
            ..fixed_block(50.0, 70.0)
        },
    );
    let left_cleared = doc.element(
        root,
        "p",
        ComputedBox {
            clear: Clear::Left,
            ..fixed_block(300.0, 10.0)
        },
    );
    let both_cleared = doc.element(
        root,
        "p",
        ComputedBox {
            clear: Clear::Both,
            ..fixed_block(300.0, 10.0)
        },
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(left_cleared).map(|rect| rect.y), Some(40.0));
    // Below the taller right float.
    assert_eq!(layout.border_box(both_cleared).map(|rect| rect.y), Some(70.0));
}

// ========== replaced content ==========

#[test]
fn test_image_height_follows_intrinsic_ratio() {
    let mut doc = Document::new();
    let root = doc.root;
    let image = doc.image(
        root,
        "wide.png",
        (200.0, 100.0),
        block_with(ComputedBox {
            width: LengthPercentageAuto::Length(100.0),
            ..ComputedBox::default()
        }),
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(image), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    let list = layout.display_list();
    let images: Vec<&str> = list
        .commands()
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::Image { source, .. } => Some(source.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(images, vec!["wide.png"]);
}

// ========== tables ==========

#[test]
fn test_table_cells_form_a_grid() {
    let mut doc = Document::new();
    let root = doc.root;
    let table = doc.element(
        root,
        "table",
        ComputedBox {
            display: Display::Table,
            border_spacing: 5.0,
            ..ComputedBox::default()
        },
    );
    let mut cells = Vec::new();
    for _ in 0..2 {
        let row = doc.element(
            table,
            "tr",
            ComputedBox {
                display: Display::TableRow,
                ..ComputedBox::default()
            },
        );
        for text in ["aa", "aaaa"] {
            let cell = doc.element(
                row,
                "td",
                ComputedBox {
                    display: Display::TableCell,
                    ..ComputedBox::default()
                },
            );
            let _ = doc.text(cell, text);
            cells.push(cell);
        }
    }

    let layout = doc.layout(300.0, 600.0);

    let boxes: Vec<Rect> = cells.iter().filter_map(|cell| layout.border_box(*cell)).collect();
    assert_eq!(boxes.len(), 4);
    // Columns of 40 and 80px, rows of 20px, 5px apart and around.
    assert_eq!((boxes[0].x, boxes[0].y, boxes[0].width), (5.0, 5.0, 40.0));
    assert_eq!((boxes[1].x, boxes[1].y, boxes[1].width), (50.0, 5.0, 80.0));
    assert_eq!((boxes[2].x, boxes[2].y), (5.0, 30.0));
    assert_eq!((boxes[3].x, boxes[3].y), (50.0, 30.0));
}

// ========== positioning ==========

#[test]
fn test_absolute_box_is_placed_in_relative_ancestor() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.element(root, "header", fixed_block(300.0, 25.0));
    let relative = doc.element(
        root,
        "section",
        ComputedBox {
            position: Position::Relative,
            left: LengthPercentageAuto::Length(5.0),
            top: LengthPercentageAuto::Length(10.0),
            ..fixed_block(200.0, 100.0)
        },
    );
    let absolute = doc.element(
        relative,
        "div",
        ComputedBox {
            position: Position::Absolute,
            left: LengthPercentageAuto::Length(20.0),
            top: LengthPercentageAuto::Length(30.0),
            ..fixed_block(50.0, 40.0)
        },
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(relative), Some(Rect::new(5.0, 35.0, 200.0, 100.0)));
    assert_eq!(layout.border_box(absolute), Some(Rect::new(25.0, 65.0, 50.0, 40.0)));
}

#[test]
fn test_fixed_box_uses_the_viewport() {
    let mut doc = Document::new();
    let root = doc.root;
    let wrapper = doc.element(
        root,
        "div",
        ComputedBox {
            position: Position::Relative,
            margin_top: LengthPercentageAuto::Length(50.0),
            ..fixed_block(100.0, 100.0)
        },
    );
    let fixed = doc.element(
        wrapper,
        "nav",
        ComputedBox {
            position: Position::Fixed,
            right: LengthPercentageAuto::Length(0.0),
            bottom: LengthPercentageAuto::Length(0.0),
            ..fixed_block(30.0, 20.0)
        },
    );

    let layout = doc.layout(300.0, 200.0);

    assert_eq!(layout.border_box(fixed), Some(Rect::new(270.0, 180.0, 30.0, 20.0)));
}

// ========== queries ==========

#[test]
fn test_inline_content_box_drops_padding() {
    let mut doc = Document::new();
    let root = doc.root;
    let span = doc.element(
        root,
        "span",
        ComputedBox {
            padding_left: LengthPercentage::Length(5.0),
            ..ComputedBox::default()
        },
    );
    let _ = doc.text(span, "aa");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(span).map(|rect| (rect.x, rect.width)), Some((0.0, 45.0)));
    assert_eq!(layout.content_box(span).map(|rect| (rect.x, rect.width)), Some((5.0, 40.0)));
}

#[test]
fn test_first_line_baseline_is_absolute() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.element(root, "header", fixed_block(300.0, 30.0));
    let paragraph = doc.element(root, "p", ComputedBox::block());
    let _ = doc.text(paragraph, "hello");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.first_line_baseline(paragraph), Some(46.0));
    assert_eq!(line_texts(&layout, paragraph), vec!["hello"]);
}

#[test]
fn test_hit_test_prefers_text_over_its_box() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(fixed_block(300.0, 200.0));
    let paragraph = doc.element(root, "p", fixed_block(300.0, 50.0));
    let text = doc.text(paragraph, "ab");

    let layout = doc.layout(300.0, 600.0);

    let hit = |x, y| layout.hit_test(&TestFont, Point::new(x, y));
    assert_eq!(hit(5.0, 5.0).map(|hit| hit.node), Some(text));
    assert_eq!(hit(250.0, 30.0), Some(HitResult { node: paragraph, offset: None }));
    assert_eq!(hit(10.0, 100.0), Some(HitResult { node: root, offset: None }));
    assert_eq!(hit(400.0, 10.0), None);
}

#[test]
fn test_hit_test_reports_nearest_text_offset() {
    let mut doc = Document::new();
    let root = doc.root;
    let paragraph = doc.element(root, "p", ComputedBox::block());
    let text = doc.text(paragraph, "ab");

    let layout = doc.layout(300.0, 600.0);

    // Each letter is 20px wide; the boundary nearest the point wins.
    let offset = |x| layout.hit_test(&TestFont, Point::new(x, 10.0)).and_then(|hit| hit.offset);
    assert_eq!(offset(5.0), Some(0));
    assert_eq!(offset(15.0), Some(1));
    assert_eq!(offset(25.0), Some(1));
    assert_eq!(offset(35.0), Some(2));
    assert_eq!(
        layout.hit_test(&TestFont, Point::new(25.0, 10.0)),
        Some(HitResult { node: text, offset: Some(1) })
    );
}

#[test]
fn test_hit_test_offset_counts_from_the_fragment_start() {
    let mut doc = Document::new();
    let root = doc.root;
    let paragraph = doc.element(root, "p", ComputedBox::block());
    let text = doc.text(paragraph, "aa bb");

    // "aa" and "bb" each fill a 50px line.
    let layout = doc.layout(50.0, 600.0);

    assert_eq!(line_texts(&layout, paragraph), vec!["aa", "bb"]);
    assert_eq!(
        layout.hit_test(&TestFont, Point::new(25.0, 30.0)),
        Some(HitResult { node: text, offset: Some(4) })
    );
}

#[test]
fn test_hit_test_respects_clip() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(fixed_block(300.0, 200.0));
    let clipped = doc.element(
        root,
        "div",
        ComputedBox {
            overflow: Overflow::Hidden,
            ..fixed_block(300.0, 10.0)
        },
    );
    let _ = doc.element(clipped, "div", fixed_block(300.0, 50.0));

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.hit_test(&TestFont, Point::new(10.0, 30.0)).map(|hit| hit.node), Some(root));
}

#[test]
fn test_cursor_box_after_first_character() {
    let mut doc = Document::new();
    let root = doc.root;
    let text = doc.text(root, "abc");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.cursor_box(&TestFont, text, 0), Some(Rect::new(0.0, 0.0, 0.0, 20.0)));
    assert_eq!(layout.cursor_box(&TestFont, text, 1), Some(Rect::new(20.0, 0.0, 0.0, 20.0)));
    assert_eq!(layout.cursor_box(&TestFont, text, 3), Some(Rect::new(60.0, 0.0, 0.0, 20.0)));
}

#[test]
fn test_cursor_box_rejects_offset_inside_character() {
    let mut doc = Document::new();
    let root = doc.root;
    let text = doc.text(root, "é");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.cursor_box(&TestFont, text, 1), None);
    assert!(layout.cursor_box(&TestFont, text, 2).is_some());
    assert_eq!(layout.cursor_box(&TestFont, root, 0), None);
}

// ========== painting ==========

#[test]
fn test_negative_z_index_paints_below_inline_content() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "front");
    let behind = doc.element(
        root,
        "div",
        ComputedBox {
            position: Position::Relative,
            z_index: ZIndex::Value(-1),
            ..ComputedBox::block()
        },
    );
    let _ = doc.text(behind, "back");

    let layout = doc.layout(300.0, 600.0);

    let runs: Vec<String> = layout.display_list().text_runs().map(|run| run.text.clone()).collect();
    assert_eq!(runs, vec!["back", "front"]);
}

#[test]
fn test_positive_z_index_paints_last() {
    let mut doc = Document::new();
    let root = doc.root;
    let above = doc.element(
        root,
        "div",
        ComputedBox {
            position: Position::Relative,
            z_index: ZIndex::Value(2),
            ..ComputedBox::block()
        },
    );
    let _ = doc.text(above, "top");
    let _ = doc.text(root, "under");

    let layout = doc.layout(300.0, 600.0);

    let runs: Vec<String> = layout.display_list().text_runs().map(|run| run.text.clone()).collect();
    assert_eq!(runs, vec!["under", "top"]);
}

#[test]
fn test_overflow_hidden_pushes_and_pops_a_clip() {
    let mut doc = Document::new();
    let root = doc.root;
    let clipped = doc.element(
        root,
        "div",
        ComputedBox {
            overflow: Overflow::Hidden,
            ..fixed_block(120.0, 20.0)
        },
    );
    let _ = doc.text(clipped, "a lot of text that overflows");

    let layout = doc.layout(300.0, 600.0);

    let list = layout.display_list();
    let first_clip = list
        .commands()
        .iter()
        .find(|command| matches!(command, DisplayCommand::PushClip { .. }));
    assert_eq!(
        first_clip,
        Some(&DisplayCommand::PushClip {
            rect: Rect::new(0.0, 0.0, 120.0, 20.0)
        })
    );
    // Every text run is drawn inside a clip, and the clips balance.
    let mut depth = 0_i32;
    for command in list.commands() {
        match command {
            DisplayCommand::PushClip { .. } => depth += 1,
            DisplayCommand::PopClip => depth -= 1,
            DisplayCommand::Text { .. } => assert!(depth > 0),
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
    assert!(list.text_runs().count() > 0);
}

#[test]
fn test_hidden_box_is_not_painted() {
    let mut doc = Document::new();
    let root = doc.root;
    let hidden = doc.element(
        root,
        "div",
        ComputedBox {
            visibility: Visibility::Hidden,
            ..fixed_block(100.0, 20.0)
        },
    );
    let after = doc.element(root, "div", fixed_block(100.0, 20.0));

    let layout = doc.layout(300.0, 600.0);

    let painted: Vec<_> = layout
        .display_list()
        .commands()
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::Box { node, .. } => Some(*node),
            _ => None,
        })
        .collect();
    assert!(!painted.contains(&hidden));
    assert!(painted.contains(&after));
    // It still takes up space.
    assert_eq!(layout.border_box(after).map(|rect| rect.y), Some(20.0));
}

#[test]
fn test_list_item_paints_a_marker() {
    for (style, markers) in [(ListStyleType::Disc, 1), (ListStyleType::None, 0)] {
        let mut doc = Document::new();
        let root = doc.root;
        let item = doc.element(
            root,
            "li",
            ComputedBox {
                display: Display::ListItem,
                list_style_type: style,
                ..ComputedBox::default()
            },
        );
        let _ = doc.text(item, "item");

        let layout = doc.layout(300.0, 600.0);

        let count = layout
            .display_list()
            .commands()
            .iter()
            .filter(|command| matches!(command, DisplayCommand::Marker { node, .. } if *node == item))
            .count();
        assert_eq!(count, markers, "{style}");
    }
}

#[test]
fn test_selection_reaches_the_text_runs() {
    let mut doc = Document::new();
    let root = doc.root;
    let text = doc.text(root, "aa bb");
    doc.tree.set_selection(text, 1, text, 4).unwrap();

    // "aa" and "bb" on separate lines.
    let layout = doc.layout(50.0, 600.0);

    let list = layout.display_list();
    let runs: Vec<_> = list.text_runs().collect();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].selection.as_ref().map(|range| range.start), Some(1));
    assert_eq!(runs[1].text, "bb");
    assert_eq!(runs[1].selection, Some(0..1));

    doc.tree.clear_selection();
    let layout = doc.layout(50.0, 600.0);
    assert!(layout.display_list().text_runs().all(|run| run.selection.is_none()));
}

#[test]
fn test_display_list_serializes_with_kebab_case_tags() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "hi");

    let layout = doc.layout(100.0, 100.0);

    let json = serde_json::to_value(layout.display_list()).unwrap();
    let commands = json["commands"].as_array().unwrap();
    assert_eq!(commands[0]["command"], "box");
    assert_eq!(commands[0]["node"], root.to_string());
    assert!(commands.iter().any(|command| command["command"] == "text"));
}
