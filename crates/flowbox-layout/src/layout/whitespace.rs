//! White space processing.
//!
//! [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
//!
//! Runs before every layout pass. Reads each text node's processed text and
//! writes the collapsed form back, so it must start from
//! [`BoxTree::reset_processed_text`] for the result to be stable.

use flowbox_tree::{BoxTree, NodeId};

use crate::style::{ComputedBox, Display, StyleMap, WhiteSpace};

/// Collapse white space in every text node under `root`.
///
/// Text is visited in document order. A leading collapsible space is dropped
/// when the text before it in the same inline run already ends in one; the
/// run is cut at block-level, atomic inline, floated, positioned and
/// replaced boxes.
pub fn normalize_whitespace(tree: &mut BoxTree, styles: &StyleMap, root: NodeId) {
    let mut pending_space = false;
    normalize_children(tree, styles, root, &mut pending_space);
}

fn normalize_children(tree: &mut BoxTree, styles: &StyleMap, parent: NodeId, pending_space: &mut bool) {
    let children: Vec<NodeId> = tree.children(parent).collect();
    for child in children {
        if tree.as_text(child).is_some() {
            normalize_text(tree, styles, child, pending_space);
        } else if tree.as_replaced(child).is_some() {
            *pending_space = false;
        } else if continues_inline_run(styles.computed(tree, child)) {
            normalize_children(tree, styles, child, pending_space);
        } else {
            // A new run starts inside the box and another one after it.
            let mut inner = false;
            normalize_children(tree, styles, child, &mut inner);
            *pending_space = false;
        }
    }
}

/// Inline boxes that text flows through without interruption.
fn continues_inline_run(style: &ComputedBox) -> bool {
    matches!(style.display, Display::Inline | Display::None)
        && !style.is_floated()
        && !style.is_out_of_flow()
}

fn normalize_text(tree: &mut BoxTree, styles: &StyleMap, text: NodeId, pending_space: &mut bool) {
    let white_space = styles.computed(tree, text).white_space;
    let mut processed = collapse(tree.processed_text(text), white_space);

    if white_space.collapses_spaces() && *pending_space && processed.starts_with(' ') {
        let _ = processed.remove(0);
    }
    if !processed.is_empty() {
        *pending_space = white_space.collapses_spaces() && processed.ends_with(' ');
    }
    let _ = tree.set_processed_text(text, processed);
}

/// Apply the per-node rules of one `white-space` value.
///
/// - `normal`, `nowrap`: "tabs and line feeds are converted to spaces" and
///   "any space immediately following another collapsible space ... is
///   collapsed to have zero advance width".
/// - `pre-line`: spaces collapse, "line feeds are preserved", and "any
///   collapsible spaces immediately preceding or following a segment break
///   are removed".
/// - `pre`, `pre-wrap`: untouched.
#[must_use]
pub fn collapse(text: &str, white_space: WhiteSpace) -> String {
    let keep_newlines = match white_space {
        WhiteSpace::Pre | WhiteSpace::PreWrap => return text.to_string(),
        WhiteSpace::PreLine => true,
        WhiteSpace::Normal | WhiteSpace::Nowrap => false,
    };

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = match ch {
            '\n' if keep_newlines => '\n',
            '\t' | '\r' | '\n' => ' ',
            other => other,
        };
        match ch {
            ' ' if out.ends_with(' ') || out.ends_with('\n') => {}
            '\n' => {
                while out.ends_with(' ') {
                    let _ = out.pop();
                }
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_normal() {
        assert_eq!(collapse("  a \t\n b  ", WhiteSpace::Normal), " a b ");
        assert_eq!(collapse("a\r\nb", WhiteSpace::Nowrap), "a b");
    }

    #[test]
    fn test_collapse_pre_line_keeps_newlines() {
        assert_eq!(collapse("a  \n   b\t c", WhiteSpace::PreLine), "a\nb c");
    }

    #[test]
    fn test_pre_untouched() {
        assert_eq!(collapse("  a \n\tb", WhiteSpace::Pre), "  a \n\tb");
        assert_eq!(collapse("  a \n\tb", WhiteSpace::PreWrap), "  a \n\tb");
    }
}
