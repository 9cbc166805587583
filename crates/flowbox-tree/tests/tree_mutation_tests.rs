//! Tests for box tree mutation: insert, push_front/push_back, remove, free.

use flowbox_tree::{BoxTree, NodeId, TextSelection, TreeError};
use quickcheck_macros::quickcheck;

/// Helper to build `parent` with three element children `a`, `b`, `c`.
fn three_children(tree: &mut BoxTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = tree.create_element("div");
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    let c = tree.create_element("c");
    tree.push_back(parent, a).unwrap();
    tree.push_back(parent, b).unwrap();
    tree.push_back(parent, c).unwrap();
    (parent, a, b, c)
}

fn child_list(tree: &BoxTree, parent: NodeId) -> Vec<NodeId> {
    tree.children(parent).collect()
}

/// Walk the child list backwards and check it mirrors the forward walk.
fn assert_links_consistent(tree: &BoxTree, parent: NodeId) {
    let forward = child_list(tree, parent);
    let mut backward = Vec::new();
    let mut current = tree.last_child(parent);
    while let Some(id) = current {
        backward.push(id);
        current = tree.prev_sibling(id);
    }
    backward.reverse();
    assert_eq!(forward, backward, "prev links disagree with next links");
    for child in forward {
        assert_eq!(tree.parent(child), Some(parent));
    }
}

// ========== insert ==========

#[test]
fn test_push_back_keeps_order() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    assert_eq!(child_list(&tree, parent), vec![a, b, c]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_push_front_prepends() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let z = tree.create_text("z");

    tree.push_front(parent, z).unwrap();

    assert_eq!(child_list(&tree, parent), vec![z, a, b, c]);
    assert_eq!(tree.prev_sibling(a), Some(z));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_middle_child() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = tree.create_element("x");

    tree.insert(parent, x, Some(b)).unwrap();

    assert_eq!(child_list(&tree, parent), vec![a, x, b, c]);
    assert_eq!(tree.next_sibling(a), Some(x));
    assert_eq!(tree.prev_sibling(b), Some(x));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_already_parented_fails_without_change() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = tree.create_element("section");

    let err = tree.push_back(other, b).unwrap_err();

    assert_eq!(err, TreeError::AlreadyHasParent { node: b });
    assert_eq!(child_list(&tree, parent), vec![a, b, c]);
    assert_eq!(tree.first_child(other), None);
}

#[test]
fn test_insert_before_non_child_fails() {
    let mut tree = BoxTree::new();
    let (parent, _, _, _) = three_children(&mut tree);
    let stranger = tree.create_element("span");
    let x = tree.create_element("x");

    let err = tree.insert(parent, x, Some(stranger)).unwrap_err();

    assert_eq!(
        err,
        TreeError::NotAChild {
            parent,
            before: stranger
        }
    );
    assert_eq!(tree.parent(x), None);
    assert_eq!(child_list(&tree, parent).len(), 3);
}

#[test]
fn test_insert_into_own_subtree_fails() {
    let mut tree = BoxTree::new();
    let (parent, a, _, _) = three_children(&mut tree);

    assert_eq!(
        tree.push_back(parent, parent),
        Err(TreeError::WouldCreateCycle { node: parent })
    );

    tree.remove(a).unwrap();
    let inner = tree.create_element("inner");
    tree.push_back(a, inner).unwrap();
    assert_eq!(
        tree.push_back(inner, a),
        Err(TreeError::WouldCreateCycle { node: a })
    );
}

#[test]
fn test_text_nodes_cannot_have_children() {
    let mut tree = BoxTree::new();
    let text = tree.create_text("hello");
    let child = tree.create_element("b");

    assert_eq!(tree.push_back(text, child), Err(TreeError::LeafParent(text)));
}

// ========== remove ==========

#[test]
fn test_remove_first_of_three() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove(a).unwrap();

    // b is now first child, c is second
    assert_eq!(child_list(&tree, parent), vec![b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.next_sibling(a), None);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_remove_middle_of_three() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove(b).unwrap();

    // a and c are siblings now
    assert_eq!(child_list(&tree, parent), vec![a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_remove_last_of_three() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove(c).unwrap();

    assert_eq!(child_list(&tree, parent), vec![a, b]);
    assert_eq!(tree.last_child(parent), Some(b));
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_keeps_subtree() {
    let mut tree = BoxTree::new();
    let (parent, a, _, _) = three_children(&mut tree);
    let text = tree.create_text("kept");
    tree.push_back(a, text).unwrap();

    tree.remove(a).unwrap();

    assert!(!tree.is_descendant_of(a, parent));
    assert_eq!(child_list(&tree, a), vec![text]);
    assert_eq!(tree.parent(text), Some(a));

    // The detached subtree can be re-inserted elsewhere.
    let other = tree.create_element("aside");
    tree.push_back(other, a).unwrap();
    assert!(tree.is_descendant_of(text, other));
}

#[test]
fn test_remove_detached_node_is_noop() {
    let mut tree = BoxTree::new();
    let lonely = tree.create_element("p");

    assert_eq!(tree.remove(lonely), Ok(()));
}

// ========== free ==========

#[test]
fn test_free_invalidates_subtree_ids() {
    let mut tree = BoxTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let text = tree.create_text("gone");
    tree.push_back(b, text).unwrap();
    assert_eq!(tree.len(), 5);

    tree.free(b).unwrap();

    assert_eq!(tree.len(), 3);
    assert!(!tree.contains(b));
    assert!(!tree.contains(text));
    assert_eq!(child_list(&tree, parent), vec![a, c]);
    assert_eq!(tree.remove(b), Err(TreeError::StaleNode(b)));
}

#[test]
fn test_reused_slot_does_not_alias_stale_id() {
    let mut tree = BoxTree::new();
    let old = tree.create_element("old");
    tree.free(old).unwrap();

    let new = tree.create_element("new");

    assert_eq!(old.index(), new.index());
    assert_ne!(old, new);
    assert!(tree.get(old).is_none());
    assert_eq!(tree.as_element(new).map(|e| e.name.as_str()), Some("new"));
}

// ========== traversal ==========

#[test]
fn test_descendants_document_order() {
    let mut tree = BoxTree::new();
    let root = tree.create_element("body");
    let p = tree.create_element("p");
    let t1 = tree.create_text("one");
    let em = tree.create_element("em");
    let t2 = tree.create_text("two");
    let img = tree.create_replaced("img", "cat.png");
    tree.push_back(root, p).unwrap();
    tree.push_back(p, t1).unwrap();
    tree.push_back(p, em).unwrap();
    tree.push_back(em, t2).unwrap();
    tree.push_back(root, img).unwrap();

    let order: Vec<NodeId> = tree.descendants(root).collect();

    assert_eq!(order, vec![root, p, t1, em, t2, img]);
    assert_eq!(tree.descendants(em).collect::<Vec<_>>(), vec![em, t2]);
}

#[test]
fn test_reset_processed_text() {
    let mut tree = BoxTree::new();
    let text = tree.create_text("a   b");
    assert!(tree.set_processed_text(text, "a b".to_string()));
    assert_eq!(tree.processed_text(text), "a b");

    tree.reset_processed_text();

    assert_eq!(tree.processed_text(text), "a   b");
}

// ========== selection ==========

/// `<p>"hello" <em>"big"</em> "world"</p>`
fn three_texts(tree: &mut BoxTree) -> (NodeId, NodeId, NodeId) {
    let p = tree.create_element("p");
    let em = tree.create_element("em");
    let first = tree.create_text("hello ");
    let middle = tree.create_text("big");
    let last = tree.create_text(" world");
    tree.push_back(p, first).unwrap();
    tree.push_back(p, em).unwrap();
    tree.push_back(em, middle).unwrap();
    tree.push_back(p, last).unwrap();
    (first, middle, last)
}

fn selected(tree: &BoxTree, id: NodeId) -> Option<TextSelection> {
    tree.as_text(id).and_then(|text| text.selection.clone())
}

#[test]
fn test_selection_marks_text_nodes_in_document_order() {
    let mut tree = BoxTree::new();
    let (first, middle, last) = three_texts(&mut tree);

    tree.set_selection(first, 2, last, 3).unwrap();

    assert_eq!(selected(&tree, first).map(|s| s.source), Some(2..6));
    assert_eq!(selected(&tree, middle).map(|s| s.source), Some(0..3));
    assert_eq!(selected(&tree, last).map(|s| s.processed), Some(0..3));
    let selection = tree.selection().unwrap();
    assert_eq!((selection.start, selection.end), (first, last));
}

#[test]
fn test_new_selection_replaces_the_old_one() {
    let mut tree = BoxTree::new();
    let (first, middle, last) = three_texts(&mut tree);
    tree.set_selection(first, 0, last, 6).unwrap();

    tree.set_selection(middle, 1, middle, 2).unwrap();

    assert_eq!(selected(&tree, first), None);
    assert_eq!(selected(&tree, middle).map(|s| s.source), Some(1..2));
    assert_eq!(selected(&tree, last), None);

    tree.clear_selection();
    assert_eq!(selected(&tree, middle), None);
    assert_eq!(tree.selection(), None);
}

#[test]
fn test_selection_out_of_order_fails_without_change() {
    let mut tree = BoxTree::new();
    let (first, middle, last) = three_texts(&mut tree);
    tree.set_selection(first, 0, middle, 1).unwrap();

    let err = tree.set_selection(last, 0, first, 1).unwrap_err();

    assert_eq!(err, TreeError::SelectionOutOfOrder { start: last, end: first });
    assert_eq!(selected(&tree, middle).map(|s| s.source), Some(0..1));
}

#[test]
fn test_selection_ends_must_be_text() {
    let mut tree = BoxTree::new();
    let (first, ..) = three_texts(&mut tree);
    let p = tree.parent(first).unwrap();

    assert_eq!(tree.set_selection(p, 0, first, 1), Err(TreeError::NotText(p)));
}

#[test]
fn test_selection_offsets_snap_to_the_processed_text() {
    let mut tree = BoxTree::new();
    let text = tree.create_text("a   é");
    tree.set_selection(text, 0, text, 100).unwrap();
    assert_eq!(selected(&tree, text).map(|s| s.source), Some(0..6));

    assert!(tree.set_processed_text(text, "a é".to_string()));
    assert_eq!(selected(&tree, text).map(|s| s.processed), Some(0..4));

    tree.set_selection(text, 5, text, 6).unwrap();
    // Byte 5 is inside "é".
    assert_eq!(selected(&tree, text).map(|s| s.source), Some(4..6));

    tree.reset_processed_text();
    assert_eq!(selected(&tree, text).map(|s| s.processed), Some(4..6));
}

// ========== properties ==========

/// Apply a random sequence of push/insert/remove operations and check that
/// every child list stays doubly linked and consistent.
#[quickcheck]
fn prop_random_mutations_keep_links_consistent(ops: Vec<(u8, u8, u8)>) -> bool {
    let mut tree = BoxTree::new();
    let nodes: Vec<NodeId> = (0..8).map(|i| tree.create_element(&format!("n{i}"))).collect();

    for (op, a, b) in ops {
        let a = nodes[usize::from(a) % nodes.len()];
        let b = nodes[usize::from(b) % nodes.len()];
        // Failures are expected for invalid combinations and must not
        // corrupt the tree.
        let _ = match op % 4 {
            0 => tree.push_back(a, b),
            1 => tree.push_front(a, b),
            2 => {
                let before = tree.first_child(a);
                tree.insert(a, b, before)
            }
            _ => tree.remove(b),
        };
    }

    nodes.iter().all(|&parent| {
        let forward: Vec<NodeId> = tree.children(parent).collect();
        let mut backward = Vec::new();
        let mut current = tree.last_child(parent);
        while let Some(id) = current {
            backward.push(id);
            current = tree.prev_sibling(id);
        }
        backward.reverse();
        forward == backward && forward.iter().all(|&c| tree.parent(c) == Some(parent))
    })
}
