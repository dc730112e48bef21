use super::*;
use crate::models::{Element, TextTree};

struct Doc {
    tree: TextTree,
    p1: NodeId,
    em: NodeId,
    hello: NodeId,
    wor: NodeId,
    ld: NodeId,
    next: NodeId,
}

/// body > p("Hello ", em("wor"), "ld"), p("Next")
fn doc() -> Doc {
    let mut tree = TextTree::new();
    let root = tree.root();
    let p1 = tree.append_element(root, Element::block("p")).unwrap();
    let hello = tree.append_text(p1, "Hello ").unwrap();
    let em = tree.append_element(p1, Element::inline("em")).unwrap();
    let wor = tree.append_text(em, "wor").unwrap();
    let ld = tree.append_text(p1, "ld").unwrap();
    let p2 = tree.append_element(root, Element::block("p")).unwrap();
    let next = tree.append_text(p2, "Next").unwrap();
    Doc {
        tree,
        p1,
        em,
        hello,
        wor,
        ld,
        next,
    }
}

#[test]
fn test_text_traversal_in_document_order() {
    let d = doc();
    let t = &d.tree;

    assert_eq!(next_text(t, d.hello), Some(d.wor));
    assert_eq!(next_text(t, d.wor), Some(d.ld));
    assert_eq!(next_text(t, d.ld), Some(d.next));
    assert_eq!(next_text(t, d.next), None);
    assert_eq!(prev_text(t, d.next), Some(d.ld));
    assert_eq!(prev_text(t, d.hello), None);
    assert_eq!(text_nodes(t, t.root()), vec![d.hello, d.wor, d.ld, d.next]);
}

#[test]
fn test_pre_order_steps() {
    let d = doc();
    let t = &d.tree;

    assert_eq!(next_in_order(t, d.hello), Some(d.em));
    assert_eq!(next_in_order(t, d.em), Some(d.wor));
    assert_eq!(prev_in_order(t, d.hello), Some(d.p1));
    assert_eq!(prev_in_order(t, d.ld), Some(d.wor));
    assert_eq!(prev_in_order(t, t.root()), None);
}

#[test]
fn test_block_scoped_traversal() {
    let d = doc();
    let t = &d.tree;

    assert_eq!(block_of(t, d.wor), d.p1);
    assert_eq!(next_text_in_block(t, d.wor), Some(d.ld));
    assert_eq!(next_text_in_block(t, d.ld), None);
    assert_eq!(prev_text_in_block(t, d.next), None);
}

#[test]
fn test_compare_and_common_ancestor() {
    let d = doc();
    let t = &d.tree;

    assert_eq!(compare_nodes(t, d.hello, d.wor), Ordering::Less);
    assert_eq!(compare_nodes(t, d.next, d.ld), Ordering::Greater);
    assert_eq!(compare_nodes(t, d.p1, d.wor), Ordering::Less);
    assert_eq!(
        compare_positions(t, Position::new(d.hello, 3), Position::new(d.ld, 0)),
        Ordering::Less
    );
    assert_eq!(
        compare_positions(t, Position::new(d.wor, 2), Position::new(d.wor, 1)),
        Ordering::Greater
    );

    assert_eq!(common_ancestor(t, d.hello, d.wor), d.p1);
    assert_eq!(common_ancestor(t, d.wor, d.next), t.root());
    assert_eq!(common_ancestor(t, d.wor, d.wor), d.wor);
}

#[test]
fn test_char_neighbors_cross_segments() {
    let d = doc();
    let t = &d.tree;

    let (ch, start, end) = char_after(t, Position::new(d.hello, 6)).unwrap();
    assert_eq!(ch, 'w');
    assert_eq!(start, Position::new(d.wor, 0));
    assert_eq!(end, Position::new(d.wor, 1));

    let (ch, start, end) = char_before(t, Position::new(d.wor, 0)).unwrap();
    assert_eq!(ch, ' ');
    assert_eq!(start, Position::new(d.hello, 5));
    assert_eq!(end, Position::new(d.hello, 6));

    assert!(char_after(t, Position::new(d.ld, 2)).is_none());
    assert!(char_before(t, Position::new(d.next, 0)).is_none());
}

#[test]
fn test_context_window_spans_inline_segments() {
    let d = doc();
    let window = ContextWindow::build(&d.tree, Position::new(d.wor, 1), 50);

    assert_eq!(window.text(), "Hello world");
    assert_eq!(window.cursor(), 7);
    assert_eq!(window.len(), 11);
    assert!(!window.truncated_start());
    assert!(!window.truncated_end());
    assert_eq!(window.start_position(0), Position::new(d.hello, 0));
    assert_eq!(window.start_position(6), Position::new(d.wor, 0));
    assert_eq!(window.end_position(11), Position::new(d.ld, 2));
}

#[test]
fn test_context_window_truncates_at_radius() {
    let d = doc();
    let window = ContextWindow::build(&d.tree, Position::new(d.wor, 1), 3);

    assert_eq!(window.text(), "o worl");
    assert_eq!(window.cursor(), 3);
    assert!(window.truncated_start());
    assert!(window.truncated_end());
}

#[test]
fn test_context_window_char_index_with_multibyte() {
    let mut tree = TextTree::new();
    let root = tree.root();
    let p = tree.append_element(root, Element::block("p")).unwrap();
    let t = tree.append_text(p, "naïve café").unwrap();

    let window = ContextWindow::build(&tree, Position::new(t, 0), 50);
    assert_eq!(window.len(), 10);
    // "naï" is 4 bytes.
    assert_eq!(window.char_index(4), 3);
    assert_eq!(window.end_position(3), Position::new(t, 4));
}

#[test]
fn test_ambient_text_color() {
    let mut tree = TextTree::new();
    let root = tree.root();
    let red = Rgb::new(0xCC, 0x00, 0x00);
    let p = tree
        .append_element(root, Element::block("p").with_color(red))
        .unwrap();
    let inner = tree.append_element(p, Element::inline("span")).unwrap();
    let colored = tree.append_text(inner, "red").unwrap();
    let plain_p = tree.append_element(root, Element::block("p")).unwrap();
    let plain = tree.append_text(plain_p, "plain").unwrap();

    assert_eq!(ambient_text_color(&tree, colored, Rgb::BLACK), red);
    assert_eq!(ambient_text_color(&tree, plain, Rgb::WHITE), Rgb::WHITE);
}

#[test]
fn test_annotation_nodes_empty_without_marks() {
    let d = doc();
    assert!(annotation_nodes(&d.tree, d.tree.root()).is_empty());
}
