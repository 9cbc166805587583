//! Tests for white space processing.

mod common;

use common::Document;
use flowbox_layout::layout::{collapse, normalize_whitespace};
use flowbox_layout::style::{ComputedBox, Display, WhiteSpace};
use quickcheck_macros::quickcheck;

const MODES: [WhiteSpace; 5] = [
    WhiteSpace::Normal,
    WhiteSpace::Nowrap,
    WhiteSpace::Pre,
    WhiteSpace::PreWrap,
    WhiteSpace::PreLine,
];

/// Map arbitrary bytes onto text that is mostly white space.
fn spacey(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| match byte % 6 {
            0 | 1 => ' ',
            2 => '\n',
            3 => '\t',
            4 => 'a',
            _ => 'b',
        })
        .collect()
}

// ========== collapse ==========

#[quickcheck]
fn prop_collapse_is_idempotent(bytes: Vec<u8>) -> bool {
    let text = spacey(&bytes);
    MODES.iter().all(|mode| {
        let once = collapse(&text, *mode);
        collapse(&once, *mode) == once
    })
}

// ========== normalize_whitespace ==========

#[test]
fn test_space_is_dropped_across_inline_boundary() {
    let mut doc = Document::new();
    let root = doc.root;
    let first = doc.text(root, "one ");
    let span = doc.element(root, "span", ComputedBox::default());
    let second = doc.text(span, " two");

    normalize_whitespace(&mut doc.tree, &doc.styles, root);

    assert_eq!(doc.tree.processed_text(first), "one ");
    assert_eq!(doc.tree.processed_text(second), "two");
}

#[test]
fn test_run_restarts_after_block() {
    let mut doc = Document::new();
    let root = doc.root;
    let first = doc.text(root, "one ");
    let _ = doc.element(root, "div", ComputedBox::block());
    let second = doc.text(root, " two");

    normalize_whitespace(&mut doc.tree, &doc.styles, root);

    assert_eq!(doc.tree.processed_text(first), "one ");
    assert_eq!(doc.tree.processed_text(second), " two");
}

#[test]
fn test_source_text_is_kept() {
    let mut doc = Document::new();
    let root = doc.root;
    let text = doc.text(root, "a    b");

    normalize_whitespace(&mut doc.tree, &doc.styles, root);

    assert_eq!(doc.tree.processed_text(text), "a b");
    assert_eq!(doc.tree.as_text(text).map(|data| data.text.as_str()), Some("a    b"));
}

#[quickcheck]
fn prop_normalize_is_idempotent(pieces: Vec<(Vec<u8>, u8)>) -> bool {
    let mut doc = Document::new();
    let root = doc.root;
    let mut texts = Vec::new();
    for (bytes, kind) in pieces.iter().take(12) {
        let parent = match kind % 4 {
            0 => root,
            1 => doc.element(root, "span", ComputedBox::default()),
            2 => doc.element(
                root,
                "pre",
                ComputedBox {
                    white_space: MODES[usize::from(*kind) % MODES.len()],
                    ..ComputedBox::block()
                },
            ),
            _ => doc.element(
                root,
                "b",
                ComputedBox {
                    display: Display::InlineBlock,
                    ..ComputedBox::default()
                },
            ),
        };
        texts.push(doc.text(parent, &spacey(bytes)));
    }

    normalize_whitespace(&mut doc.tree, &doc.styles, root);
    let once: Vec<String> = texts.iter().map(|t| doc.tree.processed_text(*t).to_string()).collect();
    normalize_whitespace(&mut doc.tree, &doc.styles, root);
    let twice: Vec<String> = texts.iter().map(|t| doc.tree.processed_text(*t).to_string()).collect();

    once == twice
}
