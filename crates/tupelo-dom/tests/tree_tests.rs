//! Tests for tree mutation and query methods: append_child, remove_child,
//! insert_before, move_children, attribute lists, traversal.

use tupelo_dom::{Attribute, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    alloc_element_at(tree, tag, 0)
}

/// Helper to create an HTML element node with a source offset.
fn alloc_element_at(tree: &mut DomTree, tag: &str, offset: usize) -> NodeId {
    tree.alloc(
        NodeType::Element(ElementData::new(tag.to_string(), Namespace::Html)),
        offset,
    )
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, existing);

    // new_child should be first, existing second
    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.next_sibling(new_child), Some(existing));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

// ========== move_children ==========

#[test]
fn test_move_children_basic() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(from, a);
    tree.append_child(from, b);

    tree.move_children(from, to);

    // from should be empty
    assert_eq!(tree.children(from).len(), 0);
    // to should have both children
    assert_eq!(tree.children(to), &[a, b]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.parent(b), Some(to));
}

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);

    let moved = alloc_element(&mut tree, "y");
    tree.append_child(from, moved);

    tree.move_children(from, to);

    assert_eq!(tree.children(to), &[existing, moved]);
    // Sibling links between existing and moved
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));
}

// ========== attributes ==========

#[test]
fn test_attribute_first_occurrence_wins() {
    let mut data = ElementData::new("p".to_string(), Namespace::Html);
    assert!(data.push_attribute(Attribute::new("id".into(), "a".into(), 3)));
    assert!(!data.push_attribute(Attribute::new("id".into(), "b".into(), 10)));

    assert_eq!(data.attributes.len(), 1);
    assert_eq!(data.get("id"), Some("a"));
}

#[test]
fn test_attribute_insertion_order_preserved() {
    let mut data = ElementData::new("p".to_string(), Namespace::Html);
    let _ = data.push_attribute(Attribute::new("xmlns".into(), "x".into(), 0));
    let _ = data.push_attribute(Attribute::new("xml:lang".into(), "en".into(), 8));
    let _ = data.push_attribute(Attribute::new("lang".into(), "en-us".into(), 20));

    let names: Vec<&str> = data.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["xmlns", "xml:lang", "lang"]);
}

#[test]
fn test_element_classes() {
    let mut data = ElementData::new("p".to_string(), Namespace::Html);
    let _ = data.push_attribute(Attribute::new("class".into(), "foo  bar".into(), 0));

    let classes = data.classes();
    assert!(classes.contains("foo"));
    assert!(classes.contains("bar"));
    assert_eq!(classes.len(), 2);
}

// ========== document / traversal ==========

#[test]
fn test_document_defaults() {
    let tree = DomTree::new();
    let doc = tree.document();
    assert!(!doc.has_doctype);
    assert_eq!(doc.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(tree.get(NodeId::ROOT).unwrap().offset, 0);
}

#[test]
fn test_preorder_traversal_order() {
    let mut tree = DomTree::new();
    let html = alloc_element_at(&mut tree, "html", 0);
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element_at(&mut tree, "head", 6);
    let body = alloc_element_at(&mut tree, "body", 19);
    tree.append_child(html, head);
    tree.append_child(html, body);
    let p = alloc_element_at(&mut tree, "p", 25);
    tree.append_child(body, p);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, [NodeId::ROOT, html, head, body, p]);

    // Offsets are non-decreasing in document order.
    let offsets: Vec<usize> = order
        .iter()
        .map(|&id| tree.get(id).unwrap().offset)
        .collect();
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment(" hi ".into()), 0);
    tree.append_child(NodeId::ROOT, comment);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_text_content_skips_comments() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let t1 = tree.alloc(NodeType::Text("Hello".into()), 5);
    let c = tree.alloc(NodeType::Comment("nope".into()), 10);
    let ws = tree.alloc(NodeType::Whitespace(" ".into()), 21);
    let t2 = tree.alloc(NodeType::Text("World".into()), 22);
    tree.append_child(div, t1);
    tree.append_child(div, c);
    tree.append_child(div, ws);
    tree.append_child(div, t2);

    assert_eq!(tree.text_content(div), "Hello World");
}
