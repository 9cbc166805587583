//! Horizontal alignment of finished lines.
//!
//! [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)

use std::collections::HashSet;

use super::boxes::InlineBox;
use super::generated::{GeneratedBox, GeneratedBoxId, GeneratedKind};
use super::measure::visible_text;
use crate::layout::box_model::Rect;
use crate::layout::pass::LayoutPass;
use crate::style::TextAlign;

/// Extra width given to each of `gaps` word gaps so that together they
/// take up `slack` rounded down to whole pixels.
///
/// Gap `i` (1-based) receives `floor(slack·i/N) - floor(slack·(i-1)/N)`, so
/// no rounding error accumulates along the line.
#[must_use]
pub fn justification_offsets(slack: f32, gaps: usize) -> Vec<f32> {
    if gaps == 0 {
        return Vec::new();
    }
    let total = gaps as f32;
    (1..=gaps)
        .map(|i| {
            let before = (slack * (i - 1) as f32 / total).floor();
            (slack * i as f32 / total).floor() - before
        })
        .collect()
}

impl LayoutPass<'_> {
    /// Shift or stretch the line at `root` so its content lines up inside
    /// `line_box` as `text_align` asks.
    ///
    /// "If an element has a computed value for 'white-space' of 'pre' or
    /// 'pre-wrap', then neither the glyphs of that element's text content
    /// nor its white space may be altered by any stretching algorithm."
    /// Justification is skipped on lines that end the paragraph.
    pub(crate) fn align_line(
        &self,
        boxes: &[InlineBox],
        generated: &mut Vec<GeneratedBox>,
        root: GeneratedBoxId,
        line_box: Rect,
        text_align: TextAlign,
        ends_paragraph: bool,
    ) {
        let slack = line_box.right() - generated[root.0].rect.right();
        if slack <= 0.0 {
            return;
        }
        match text_align {
            TextAlign::Left => {}
            TextAlign::Right => shift_x(generated, root, slack),
            TextAlign::Center => shift_x(generated, root, (slack / 2.0).floor()),
            TextAlign::Justify if ends_paragraph => {}
            TextAlign::Justify => self.justify(boxes, generated, root, slack),
        }
    }

    fn justify(&self, boxes: &[InlineBox], generated: &mut Vec<GeneratedBox>, root: GeneratedBoxId, slack: f32) {
        self.split_at_spaces(boxes, generated, root);

        let mut leaves = Vec::new();
        collect_leaves(generated, root, &mut leaves);
        let Some((_, leading)) = leaves.split_last() else {
            return;
        };
        let gap_leaves: HashSet<usize> = leading
            .iter()
            .filter(|leaf| {
                let generated = &generated[leaf.0];
                let inline = &boxes[generated.inline_box.0];
                generated.kind == GeneratedKind::Text
                    && inline.style.white_space.collapses_spaces()
                    && inline.text[generated.range.clone()].ends_with(' ')
            })
            .map(|leaf| leaf.0)
            .collect();
        if gap_leaves.is_empty() {
            return;
        }

        let mut cumulative = vec![0.0];
        for offset in justification_offsets(slack, gap_leaves.len()) {
            let last = cumulative.last().copied().unwrap_or(0.0);
            cumulative.push(last + offset);
        }
        let mut state = Stretch {
            cumulative,
            gap_leaves,
            gaps_seen: 0,
        };
        state.apply(generated, root);
    }

    /// Split every text box on the line after each run of spaces, so each
    /// word can move on its own. Text that preserves its spaces stays whole.
    fn split_at_spaces(&self, boxes: &[InlineBox], generated: &mut Vec<GeneratedBox>, id: GeneratedBoxId) {
        let children = generated[id.0].children.clone();
        let mut rebuilt = Vec::with_capacity(children.len());
        for child in children {
            if generated[child.0].kind != GeneratedKind::Text {
                self.split_at_spaces(boxes, generated, child);
                rebuilt.push(child);
                continue;
            }
            let inline = &boxes[generated[child.0].inline_box.0];
            if !inline.style.white_space.collapses_spaces() {
                rebuilt.push(child);
                continue;
            }
            let range = generated[child.0].range.clone();
            let text = &inline.text[range.clone()];
            let mut cuts = Vec::new();
            let bytes = text.as_bytes();
            for (i, byte) in bytes.iter().enumerate() {
                let next_is_space = bytes.get(i + 1).is_some_and(|next| *next == b' ');
                if *byte == b' ' && !next_is_space && i + 1 < bytes.len() {
                    cuts.push(range.start + i + 1);
                }
            }
            if cuts.is_empty() {
                rebuilt.push(child);
                continue;
            }

            let font = inline.style.font();
            let mut start = range.start;
            let mut x = generated[child.0].rect.x;
            cuts.push(range.end);
            for (n, cut) in cuts.into_iter().enumerate() {
                let width = self.text_width(&visible_text(&inline.text[start..cut]), &font);
                let piece = if n == 0 {
                    child
                } else {
                    let id = GeneratedBoxId(generated.len());
                    generated.push(generated[child.0].clone());
                    id
                };
                let piece_box = &mut generated[piece.0];
                piece_box.range = start..cut;
                piece_box.rect.x = x;
                piece_box.rect.width = width;
                rebuilt.push(piece);
                x += width;
                start = cut;
            }
        }
        generated[id.0].children = rebuilt;
    }
}

/// Walks a line in order, moving each box by the space added before it.
struct Stretch {
    /// Shift after `g` gaps.
    cumulative: Vec<f32>,
    gap_leaves: HashSet<usize>,
    gaps_seen: usize,
}

impl Stretch {
    fn shift(&self) -> f32 {
        self.cumulative[self.gaps_seen.min(self.cumulative.len() - 1)]
    }

    fn apply(&mut self, generated: &mut [GeneratedBox], id: GeneratedBoxId) {
        let start = self.shift();
        if generated[id.0].is_leaf() {
            generated[id.0].rect.x += start;
            if self.gap_leaves.contains(&id.0) {
                self.gaps_seen += 1;
            }
            return;
        }
        for child in generated[id.0].children.clone() {
            self.apply(generated, child);
        }
        let end = self.shift();
        let rect = &mut generated[id.0].rect;
        rect.x += start;
        rect.width += end - start;
    }
}

fn collect_leaves(generated: &[GeneratedBox], id: GeneratedBoxId, leaves: &mut Vec<GeneratedBoxId>) {
    let current = &generated[id.0];
    if current.is_leaf() && !current.floated {
        leaves.push(id);
    }
    for child in &current.children {
        collect_leaves(generated, *child, leaves);
    }
}

fn shift_x(generated: &mut [GeneratedBox], id: GeneratedBoxId, dx: f32) {
    generated[id.0].rect.x += dx;
    for child in generated[id.0].children.clone() {
        shift_x(generated, child, dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_gap_takes_all_slack() {
        assert_eq!(justification_offsets(20.0, 1), vec![20.0]);
    }

    #[test]
    fn test_offsets_spread_remainder() {
        assert_eq!(justification_offsets(10.0, 3), vec![3.0, 3.0, 4.0]);
        assert!(justification_offsets(10.0, 0).is_empty());
    }
}
