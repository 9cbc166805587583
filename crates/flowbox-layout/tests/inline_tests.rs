//! Tests for line breaking, alignment and justification.

mod common;

use common::{line_texts, Document};
use flowbox_layout::layout::{justification_offsets, FragmentContent};
use flowbox_layout::style::{
    ComputedBox, Float, LengthPercentage, LengthPercentageAuto, TextAlign, VerticalAlign, WhiteSpace,
};
use flowbox_layout::LayoutTree;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn text_fragments(doc: &Document, layout: &LayoutTree, line: usize) -> Vec<(String, f32)> {
    layout.line_boxes(doc.root)[line]
        .fragments
        .iter()
        .filter_map(|fragment| match &fragment.content {
            FragmentContent::Text { text } => Some((text.clone(), fragment.rect.x)),
            _ => None,
        })
        .collect()
}

// ========== line breaking ==========

#[test]
fn test_quick_brown_fox_breaks_after_brown() {
    // "The quick brown" is 13 letters and 2 spaces = 290px; " fox" would
    // make it 365px.
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "The quick brown fox jumps");

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(line_texts(&layout, root), vec!["The quick brown", "fox jumps"]);
    let lines = layout.line_boxes(root);
    assert_eq!(lines[0].rect.y, 0.0);
    assert_eq!(lines[1].rect.y, 20.0);
    assert_eq!(lines[0].baseline, 16.0);
}

#[test]
fn test_overlong_word_is_forced_onto_its_own_line() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "a abcdefghijklmnop b");

    let layout = doc.layout(100.0, 600.0);

    assert_eq!(line_texts(&layout, root), vec!["a", "abcdefghijklmnop", "b"]);
}

#[test]
fn test_nowrap_keeps_one_line() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(ComputedBox {
        white_space: WhiteSpace::Nowrap,
        ..ComputedBox::block()
    });
    let _ = doc.text(root, "one two three four");

    let layout = doc.layout(100.0, 600.0);

    assert_eq!(line_texts(&layout, root), vec!["one two three four"]);
}

#[test]
fn test_pre_line_breaks_at_newlines() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(ComputedBox {
        white_space: WhiteSpace::PreLine,
        ..ComputedBox::block()
    });
    let _ = doc.text(root, "one   \n  two");

    let layout = doc.layout(500.0, 600.0);

    assert_eq!(line_texts(&layout, root), vec!["one", "two"]);
}

#[test]
fn test_text_indent_applies_to_first_line_only() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(ComputedBox {
        text_indent: LengthPercentage::Length(30.0),
        ..ComputedBox::block()
    });
    let _ = doc.text(root, "aaaa bbbb cccc");

    let layout = doc.layout(200.0, 600.0);

    // 30 + 80 + 15 + 80 = 205 does not fit the first line.
    assert_eq!(line_texts(&layout, root), vec!["aaaa", "bbbb cccc"]);
    assert_eq!(text_fragments(&doc, &layout, 0)[0].1, 30.0);
    assert_eq!(text_fragments(&doc, &layout, 1)[0].1, 0.0);
}

// ========== split inline boxes ==========

#[test]
fn test_split_inline_box_loses_inner_edges() {
    let mut doc = Document::new();
    let root = doc.root;
    let span = doc.element(
        root,
        "span",
        ComputedBox {
            border_left_width: 5.0,
            border_right_width: 5.0,
            ..ComputedBox::default()
        },
    );
    let _ = doc.text(span, "aaaa bbbb");

    let layout = doc.layout(120.0, 600.0);

    let elements: Vec<(bool, bool)> = layout
        .line_boxes(root)
        .iter()
        .flat_map(|line| line.fragments.clone())
        .filter_map(|fragment| match fragment.content {
            FragmentContent::Element { opening, closing } => Some((opening, closing)),
            _ => None,
        })
        .collect();
    assert_eq!(elements, vec![(true, false), (false, true)]);
}

// ========== floats in inline content ==========

#[test]
fn test_lines_are_shortened_beside_a_float() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.element(
        root,
        "aside",
        ComputedBox {
            float: Float::Left,
            width: LengthPercentageAuto::Length(100.0),
            height: LengthPercentageAuto::Length(50.0),
            ..ComputedBox::block()
        },
    );
    let _ = doc.text(root, "aaaa");

    let layout = doc.layout(300.0, 600.0);

    let lines = layout.line_boxes(root);
    assert_eq!(lines[0].rect.x, 100.0);
    assert_eq!(lines[0].rect.width, 200.0);
    assert_eq!(text_fragments(&doc, &layout, 0)[0].1, 100.0);
}

// ========== alignment ==========

#[test]
fn test_right_and_center_alignment() {
    for (align, expected) in [(TextAlign::Right, 220.0), (TextAlign::Center, 110.0)] {
        let mut doc = Document::new();
        let root = doc.root;
        doc.root_style(ComputedBox {
            text_align: align,
            ..ComputedBox::block()
        });
        let _ = doc.text(root, "aaaa");

        let layout = doc.layout(300.0, 600.0);

        assert_eq!(text_fragments(&doc, &layout, 0)[0].1, expected, "{align}");
    }
}

#[test]
fn test_justify_gives_whole_slack_to_single_gap() {
    // "aaaaaaa aaaaaa" is 140 + 15 + 120 = 275px in a 295px line.
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(ComputedBox {
        text_align: TextAlign::Justify,
        ..ComputedBox::block()
    });
    let _ = doc.text(root, "aaaaaaa aaaaaa bbbbbbbbbbbbbbbb");

    let layout = doc.layout(295.0, 600.0);

    let first = text_fragments(&doc, &layout, 0);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].1, 0.0);
    assert_eq!(first[1], ("aaaaaa".to_string(), 175.0));
    // The last line is not justified.
    assert_eq!(text_fragments(&doc, &layout, 1)[0].1, 0.0);
}

#[test]
fn test_justify_leaves_preserved_spaces_alone() {
    let mut doc = Document::new();
    let root = doc.root;
    doc.root_style(ComputedBox {
        text_align: TextAlign::Justify,
        white_space: WhiteSpace::PreWrap,
        ..ComputedBox::block()
    });
    let _ = doc.text(root, "aaaaaaa aaaaaa bbbbbbbbbbbbbbbb");

    let layout = doc.layout(295.0, 600.0);

    let first = text_fragments(&doc, &layout, 0);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].1, 0.0);
    assert!(first[0].0.starts_with("aaaaaaa aaaaaa"), "{:?}", first[0].0);
    let right = layout.line_boxes(root)[0]
        .fragments
        .iter()
        .filter(|fragment| matches!(fragment.content, FragmentContent::Text { .. }))
        .map(|fragment| fragment.rect.right())
        .fold(0.0, f32::max);
    assert!(right < 295.0, "line was stretched to {right}");
}

#[test]
fn test_justification_offsets_single_gap() {
    assert_eq!(justification_offsets(20.0, 1), vec![20.0]);
    assert_eq!(justification_offsets(10.0, 3), vec![3.0, 3.0, 4.0]);
    assert!(justification_offsets(10.0, 0).is_empty());
}

#[quickcheck]
fn prop_justification_offsets_sum_to_slack(slack: u16, gaps: u8) -> TestResult {
    if gaps == 0 || gaps > 64 {
        return TestResult::discard();
    }
    let offsets = justification_offsets(f32::from(slack), usize::from(gaps));
    let sum: f32 = offsets.iter().sum();
    TestResult::from_bool(
        offsets.len() == usize::from(gaps) && offsets.iter().all(|o| *o >= 0.0) && sum == f32::from(slack),
    )
}

// ========== vertical alignment ==========

#[test]
fn test_tall_image_raises_the_baseline() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "ab ");
    let _ = doc.image(root, "tall.png", (10.0, 40.0), ComputedBox::default());

    let layout = doc.layout(300.0, 600.0);

    let lines = layout.line_boxes(root);
    // The image sits on the baseline: 40px above it, text descent below.
    assert_eq!(lines[0].baseline, 40.0);
    assert_eq!(lines[0].rect.height, 44.0);
}

#[test]
fn test_vertical_align_top_aligns_to_line_top() {
    let mut doc = Document::new();
    let root = doc.root;
    let _ = doc.text(root, "ab ");
    let image = doc.image(
        root,
        "small.png",
        (10.0, 8.0),
        ComputedBox {
            vertical_align: VerticalAlign::Top,
            ..ComputedBox::default()
        },
    );

    let layout = doc.layout(300.0, 600.0);

    assert_eq!(layout.border_box(image).map(|rect| rect.y), Some(0.0));
}
