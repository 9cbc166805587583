//! Visitors that measure inline content and find line-break opportunities.
//!
//! [§ 16.6 White space: the 'white-space' property](https://www.w3.org/TR/CSS2/text.html#white-space-prop)

use std::ops::Range;

use super::boxes::{walk, AtomicPlacement, InlineBox, InlineBoxId, InlinePosition, InlineVisitor};
use crate::layout::node::LayoutNodeId;
use crate::layout::pass::LayoutPass;
use crate::style::WhiteSpace;

/// A place where a line may end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineBreakOpportunity {
    pub position: InlinePosition,
    /// The line must end here (preserved newline).
    pub hard: bool,
}

/// "As each line is laid out, ... If a space at the beginning of a line has
/// 'white-space' set to 'normal', 'nowrap', or 'pre-line', it is removed."
pub(crate) const fn strips_leading_spaces(white_space: WhiteSpace) -> bool {
    !matches!(white_space, WhiteSpace::Pre | WhiteSpace::PreWrap)
}

/// Characters that are drawn; preserved newlines only end lines.
pub(crate) fn visible_text(text: &str) -> String {
    text.chars().filter(|c| *c != '\n').collect()
}

/// The text would collapse away entirely at the start or end of a line.
pub(crate) fn is_collapsible_only(text: &str, white_space: WhiteSpace) -> bool {
    if white_space.collapses_spaces() {
        text.chars()
            .all(|c| c == ' ' || (c == '\n' && !white_space.preserves_newlines()))
    } else {
        text.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Opportunities
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CreateOpportunities {
    list: Vec<LineBreakOpportunity>,
}

impl InlineVisitor for CreateOpportunities {
    fn text(&mut self, id: InlineBoxId, inline: &InlineBox, range: Range<usize>) -> bool {
        let white_space = inline.style.white_space;
        let base = range.start;
        let mut chars = inline.text[range].char_indices().peekable();
        while let Some((offset, ch)) = chars.next() {
            let position = InlinePosition {
                index: id.0,
                offset: base + offset + ch.len_utf8(),
            };
            if ch == '\n' && white_space.preserves_newlines() {
                self.list.push(LineBreakOpportunity { position, hard: true });
            } else if matches!(ch, ' ' | '\t') && white_space.allows_soft_wrap() {
                let run_continues = matches!(chars.peek(), Some((_, ' ' | '\t')));
                if !run_continues {
                    self.list.push(LineBreakOpportunity { position, hard: false });
                }
            }
        }
        true
    }

    fn atomic(&mut self, id: InlineBoxId, inline: &InlineBox) -> bool {
        if inline.is_block_leaf() {
            self.list.push(LineBreakOpportunity {
                position: InlinePosition::before(id.0),
                hard: false,
            });
        }
        true
    }
}

/// [§ 5.2 Breaking Rules](https://www.w3.org/TR/css-text-3/#line-break-details)
///
/// Every place a line may end, in document order, ending with the end of
/// the content. Positions at the end of a text run are moved to the start of
/// the next box, and duplicates are merged.
pub(crate) fn break_opportunities(boxes: &[InlineBox]) -> Vec<LineBreakOpportunity> {
    let mut visitor = CreateOpportunities::default();
    walk(boxes, InlinePosition::default(), InlinePosition::end(boxes), &mut visitor);
    visitor.list.push(LineBreakOpportunity {
        position: InlinePosition::end(boxes),
        hard: false,
    });

    let mut merged: Vec<LineBreakOpportunity> = Vec::with_capacity(visitor.list.len());
    for mut opportunity in visitor.list {
        opportunity.position = opportunity.position.normalized(boxes);
        match merged.last_mut() {
            Some(last) if last.position == opportunity.position => last.hard |= opportunity.hard,
            _ => merged.push(opportunity),
        }
    }
    merged
}

// ─────────────────────────────────────────────────────────────────────────────
// Width of a segment
// ─────────────────────────────────────────────────────────────────────────────

/// Width of the content between two opportunities.
pub(crate) struct SegmentWidth<'p, 'a> {
    pass: &'p LayoutPass<'a>,
    /// Nothing visible has been placed on the line yet.
    pub start_of_line: bool,
    pub width: f32,
    /// Width of the collapsible spaces the segment ends with; they hang
    /// past the end of the line and do not count when fitting.
    pub trailing: f32,
}

impl<'p, 'a> SegmentWidth<'p, 'a> {
    pub const fn new(pass: &'p LayoutPass<'a>, start_of_line: bool) -> Self {
        Self {
            pass,
            start_of_line,
            width: 0.0,
            trailing: 0.0,
        }
    }

    /// Width once trailing spaces are dropped.
    pub fn fitting_width(&self) -> f32 {
        self.width - self.trailing
    }
}

impl InlineVisitor for SegmentWidth<'_, '_> {
    fn open(&mut self, _id: InlineBoxId, inline: &InlineBox) -> bool {
        self.width += inline.margin.left + inline.border.left + inline.padding.left;
        true
    }

    fn close(&mut self, _id: InlineBoxId, inline: &InlineBox) -> bool {
        self.width += inline.padding.right + inline.border.right + inline.margin.right;
        true
    }

    fn text(&mut self, _id: InlineBoxId, inline: &InlineBox, range: Range<usize>) -> bool {
        let white_space = inline.style.white_space;
        let mut piece = &inline.text[range];
        if self.start_of_line && strips_leading_spaces(white_space) {
            piece = piece.trim_start_matches(' ');
        }
        let piece = visible_text(piece);
        if piece.is_empty() {
            return true;
        }

        let font = inline.style.font();
        let width = self.pass.text_width(&piece, &font);
        if white_space.collapses_spaces() {
            let trimmed = piece.trim_end_matches(' ');
            if trimmed.is_empty() {
                self.trailing += width;
            } else {
                self.trailing = width - self.pass.text_width(trimmed, &font);
                self.start_of_line = false;
            }
        } else {
            self.trailing = 0.0;
            self.start_of_line = false;
        }
        self.width += width;
        true
    }

    fn atomic(&mut self, _id: InlineBoxId, inline: &InlineBox) -> bool {
        if let Some((node, AtomicPlacement::Inline)) = inline.atomic() {
            self.width += self.pass.node(node).block_width();
            self.trailing = 0.0;
            self.start_of_line = false;
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Empty lines and floats
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "Line boxes that contain no text, no preserved white space, no inline
/// elements with non-zero margins, padding, or borders or other in-flow
/// content (such as images, inline blocks or inline tables), and do not end
/// with a preserved newline must be treated as zero-height line boxes."
pub(crate) struct IsEmptyLine {
    pub empty: bool,
}

impl InlineVisitor for IsEmptyLine {
    fn open(&mut self, _id: InlineBoxId, inline: &InlineBox) -> bool {
        let edges = inline.margin.horizontal() + inline.border.horizontal() + inline.padding.horizontal();
        self.empty = edges == 0.0;
        self.empty
    }

    fn text(&mut self, _id: InlineBoxId, inline: &InlineBox, range: Range<usize>) -> bool {
        self.empty = is_collapsible_only(&inline.text[range], inline.style.white_space);
        self.empty
    }

    fn atomic(&mut self, _id: InlineBoxId, inline: &InlineBox) -> bool {
        self.empty = !matches!(inline.atomic(), Some((_, AtomicPlacement::Inline)));
        self.empty
    }
}

/// Finds the first float in a segment that has not been placed yet.
#[derive(Default)]
pub(crate) struct UnplacedFloat {
    pub found: Option<(InlineBoxId, LayoutNodeId)>,
}

impl InlineVisitor for UnplacedFloat {
    fn atomic(&mut self, id: InlineBoxId, inline: &InlineBox) -> bool {
        if let Some((node, AtomicPlacement::Float(_))) = inline.atomic() {
            if !inline.placed {
                self.found = Some((id, node));
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::inline::boxes::InlineBoxKind;
    use crate::style::ComputedBox;
    use flowbox_tree::BoxTree;

    fn text_content(text: &str, white_space: WhiteSpace) -> Vec<InlineBox> {
        let mut tree = BoxTree::new();
        let id = tree.create_element("p");
        let style = ComputedBox {
            white_space,
            ..ComputedBox::default()
        };
        let mut root = InlineBox::new(id, InlineBoxKind::Root, style.clone(), None);
        root.end = 2;
        let mut run = InlineBox::new(id, InlineBoxKind::Text, style, Some(InlineBoxId(0)));
        run.end = 2;
        run.text = text.to_string();
        vec![root, run]
    }

    fn positions(list: &[LineBreakOpportunity]) -> Vec<(usize, usize, bool)> {
        list.iter()
            .map(|o| (o.position.index, o.position.offset, o.hard))
            .collect()
    }

    #[test]
    fn test_soft_opportunities_after_space_runs() {
        let boxes = text_content("ab  cd ef", WhiteSpace::PreWrap);
        let list = break_opportunities(&boxes);
        assert_eq!(positions(&list), [(1, 4, false), (1, 7, false), (2, 0, false)]);
    }

    #[test]
    fn test_nowrap_and_pre_suppress_soft_wraps() {
        for white_space in [WhiteSpace::Nowrap, WhiteSpace::Pre] {
            let boxes = text_content("ab cd", white_space);
            assert_eq!(positions(&break_opportunities(&boxes)), [(2, 0, false)]);
        }
    }

    #[test]
    fn test_preserved_newlines_are_hard_breaks() {
        let boxes = text_content("ab\ncd", WhiteSpace::Pre);
        assert_eq!(
            positions(&break_opportunities(&boxes)),
            [(1, 3, true), (2, 0, false)]
        );
    }

    #[test]
    fn test_trailing_newline_merges_with_end() {
        let boxes = text_content("ab\n", WhiteSpace::PreLine);
        assert_eq!(positions(&break_opportunities(&boxes)), [(2, 0, true)]);
    }
}
