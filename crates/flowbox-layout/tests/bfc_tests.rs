//! Tests for float placement and line-box carving in a block formatting
//! context.

use flowbox_layout::layout::{FloatContext, FormattingContexts, Point, Rect};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const CONTAINER: f32 = 300.0;

/// Overlap with positive area; touching edges do not count.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// A float from raw quickcheck input: 1-100 wide, 1-50 tall.
fn float_rect(width: u8, height: u8, y: u8) -> Rect {
    Rect::new(0.0, f32::from(y), f32::from(width % 100) + 1.0, f32::from(height % 50) + 1.0)
}

fn place(floats: &mut FloatContext, rect: Rect, left: bool) -> Rect {
    if left {
        floats.float_left(rect, CONTAINER)
    } else {
        floats.float_right(Rect::new(CONTAINER - rect.width, rect.y, rect.width, rect.height), 0.0)
    }
}

// ========== float placement ==========

#[quickcheck]
fn prop_floats_never_overlap(input: Vec<(u8, u8, u8, bool)>) -> TestResult {
    if input.len() > 40 {
        return TestResult::discard();
    }
    let mut floats = FloatContext::new();
    let mut placed: Vec<Rect> = Vec::new();
    for (width, height, y, left) in input {
        let rect = place(&mut floats, float_rect(width, height, y), left);
        if placed.iter().any(|other| overlaps(&rect, other)) {
            return TestResult::failed();
        }
        if rect.x < 0.0 || rect.right() > CONTAINER {
            return TestResult::failed();
        }
        placed.push(rect);
    }
    TestResult::passed()
}

#[quickcheck]
fn prop_placement_never_moves_up(input: Vec<(u8, u8, u8, bool)>, query: (u8, u8, u8)) -> TestResult {
    if input.len() > 40 {
        return TestResult::discard();
    }
    let mut floats = FloatContext::new();
    for (width, height, y, left) in input {
        let _ = place(&mut floats, float_rect(width, height, y), left);
    }
    let candidate = float_rect(query.0, query.1, query.2);

    let left = floats.place_left(candidate, CONTAINER);
    let right = floats.place_right(
        Rect::new(CONTAINER - candidate.width, candidate.y, candidate.width, candidate.height),
        0.0,
    );
    let line = floats.find_line_box(0.0, CONTAINER, candidate.y, candidate.height, candidate.width);

    TestResult::from_bool(left.y >= candidate.y && right.y >= candidate.y && line.y >= candidate.y)
}

#[test]
fn test_line_box_starts_after_left_float() {
    let mut floats = FloatContext::new();
    let _ = floats.float_left(Rect::new(0.0, 0.0, 100.0, 50.0), CONTAINER);

    for y in [0.0, 10.0, 25.0, 49.0] {
        let line = floats.find_line_box(0.0, CONTAINER, y, 10.0, 0.0);
        assert_eq!(line.x, 100.0, "line at y={y}");
        assert_eq!(line.width, 200.0);
        assert_eq!(line.y, y);
    }

    let below = floats.find_line_box(0.0, CONTAINER, 50.0, 10.0, 0.0);
    assert_eq!(below.x, 0.0);
    assert_eq!(below.width, CONTAINER);
}

#[test]
fn test_line_box_drops_below_float_when_too_narrow() {
    let mut floats = FloatContext::new();
    let _ = floats.float_left(Rect::new(0.0, 0.0, 250.0, 40.0), CONTAINER);

    let line = floats.find_line_box(0.0, CONTAINER, 0.0, 10.0, 80.0);

    assert_eq!(line.y, 40.0);
    assert_eq!(line.x, 0.0);
}

#[test]
fn test_left_and_right_floats_share_a_row() {
    let mut floats = FloatContext::new();
    let left = floats.float_left(Rect::new(0.0, 0.0, 100.0, 30.0), CONTAINER);
    let right = floats.float_right(Rect::new(200.0, 0.0, 100.0, 30.0), 0.0);

    assert_eq!(left, Rect::new(0.0, 0.0, 100.0, 30.0));
    assert_eq!(right, Rect::new(200.0, 0.0, 100.0, 30.0));

    let line = floats.find_line_box(0.0, CONTAINER, 0.0, 10.0, 0.0);
    assert_eq!(line.x, 100.0);
    assert_eq!(line.width, 100.0);
}

#[test]
fn test_right_float_in_shrinking_box_stacks_after_left_floats() {
    let mut floats = FloatContext::new();
    let left = floats.float_left(Rect::new(0.0, 0.0, 30.0, 20.0), f32::MAX);
    let right = floats.float_right_shrink_to_fit(Rect::new(0.0, 0.0, 50.0, 60.0), f32::MAX);

    assert_eq!(left, Rect::new(0.0, 0.0, 30.0, 20.0));
    assert_eq!(right, Rect::new(30.0, 0.0, 50.0, 60.0));

    // Lines start after both while the width is unknown.
    let line = floats.find_line_box(0.0, 1000.0, 0.0, 10.0, 10.0);
    assert_eq!(line.x, 80.0);
    assert_eq!(line.width, 920.0);
    let below_left = floats.find_line_box(0.0, 1000.0, 30.0, 10.0, 10.0);
    assert_eq!(below_left.x, 80.0);

    assert_eq!(floats.find_left_clearance(), 20.0);
    assert_eq!(floats.find_right_clearance(), 60.0);
    assert_eq!(floats.max_float_bottom(), 60.0);
}

// ========== nested contexts ==========

#[test]
fn test_nested_context_origins_add_up() {
    let mut contexts = FormattingContexts::new();
    let root = contexts.create(None);
    let child = contexts.create(Some(root));
    let grandchild = contexts.create(Some(child));
    contexts.set_position(root, 5.0, 5.0);
    contexts.set_position(child, 10.0, 20.0);
    contexts.set_position(grandchild, 1.0, 2.0);

    assert_eq!(contexts.origin(grandchild), Point::new(16.0, 27.0));
    assert_eq!(
        contexts.to_absolute(child, Rect::new(0.0, 0.0, 10.0, 10.0)),
        Rect::new(15.0, 25.0, 10.0, 10.0)
    );
}
