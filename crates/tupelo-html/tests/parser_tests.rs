//! Integration tests for the HTML parser.

use tupelo_dom::{DomTree, NodeId, NodeType, QuirksMode};
use tupelo_html::parse;

/// Helper to parse HTML and return the DOM tree
fn parse_tree(html: &str) -> DomTree {
    parse(html.as_bytes()).tree
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to collect the tag names of an element's element children
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child).map(|e| e.tag_name.clone()))
        .collect()
}

#[test]
fn test_document_structure() {
    let tree = parse_tree("<!DOCTYPE html><html><head></head><body></body></html>");

    let root = tree.get(NodeId::ROOT).expect("root node");
    assert!(matches!(root.node_type, NodeType::Document(_)));

    let html_id = tree.document_element().expect("html element");
    assert_eq!(child_tags(&tree, html_id), vec!["head", "body"]);
}

#[test]
fn test_implied_html_head_body() {
    // No tags at all still produces the full scaffolding.
    let tree = parse_tree("Hello");
    let html_id = tree.document_element().expect("html element");
    assert_eq!(child_tags(&tree, html_id), vec!["head", "body"]);
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "Hello");
}

#[test]
fn test_doctype_recorded_on_document() {
    let tree = parse_tree("<!DOCTYPE html><p>x</p>");
    let document = tree.document();
    assert!(document.has_doctype);
    assert_eq!(document.name.as_deref(), Some("html"));
    assert_eq!(document.quirks_mode, QuirksMode::NoQuirks);
}

#[test]
fn test_missing_doctype_is_quirks() {
    let output = parse(b"<p>x</p>");
    assert_eq!(output.tree.document().quirks_mode, QuirksMode::Quirks);
    assert!(!output.errors.is_empty());
}

#[test]
fn test_xhtml_1_1_doctype_is_no_quirks() {
    let html = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \
                \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\"><p>x</p>";
    let tree = parse_tree(html);
    assert_eq!(tree.document().quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(
        tree.document().public_identifier.as_deref(),
        Some("-//W3C//DTD XHTML 1.1//EN")
    );
}

#[test]
fn test_comment_node() {
    let tree = parse_tree("<!DOCTYPE html><body><!-- a comment --></body>");
    let body = tree.body().unwrap();
    let comment = tree.children(body).first().copied().expect("comment child");
    match &tree.get(comment).unwrap().node_type {
        NodeType::Comment(data) => assert_eq!(data, " a comment "),
        other => panic!("expected comment, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let output = parse(b"<!DOCTYPE html><div id=\"a\" id=\"b\"></div>");
    let div = find_element(&output.tree, NodeId::ROOT, "div").unwrap();
    let data = output.tree.as_element(div).unwrap();
    assert_eq!(data.get("id"), Some("a"));
    assert_eq!(data.attributes.len(), 1);
    assert!(output
        .errors
        .iter()
        .any(|e| e.message().contains("duplicate")));
}

#[test]
fn test_paragraph_auto_close() {
    let tree = parse_tree("<!DOCTYPE html><p>one<p>two");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "p"]);
    let paragraphs = tree.children(body).to_vec();
    assert_eq!(tree.text_content(paragraphs[0]), "one");
    assert_eq!(tree.text_content(paragraphs[1]), "two");
}

#[test]
fn test_list_item_auto_close() {
    let tree = parse_tree("<!DOCTYPE html><ul><li>a<li>b</ul>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_tags(&tree, ul), vec!["li", "li"]);
}

#[test]
fn test_heading_closes_open_heading() {
    let tree = parse_tree("<!DOCTYPE html><h1>one<h2>two</h2>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["h1", "h2"]);
}

#[test]
fn test_adoption_agency_misnested_formatting() {
    // <b>1<i>2</b>3</i> -> the i element is split around the b boundary.
    let tree = parse_tree("<!DOCTYPE html><b>1<i>2</b>3</i>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["b", "i"]);

    let b = find_element(&tree, body, "b").unwrap();
    assert_eq!(tree.text_content(b), "12");
    let inner_i = find_element(&tree, b, "i").unwrap();
    assert_eq!(tree.text_content(inner_i), "2");

    let children = tree.children(body).to_vec();
    let second_i = children[1];
    assert_eq!(tree.as_element(second_i).unwrap().tag_name, "i");
    assert_eq!(tree.text_content(second_i), "3");
}

#[test]
fn test_adoption_agency_records_error() {
    let output = parse(b"<!DOCTYPE html><b>1<i>2</b>3</i>");
    assert!(!output.errors.is_empty());
}

#[test]
fn test_block_nests_inside_open_formatting_element() {
    // An open b element stays on the stack, so the paragraph nests inside
    // it rather than closing it.
    let tree = parse_tree("<!DOCTYPE html><b>bold<p>still bold</p>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["b"]);
    let b = tree.children(body)[0];
    let p = find_element(&tree, b, "p").unwrap();
    assert_eq!(tree.text_content(p), "still bold");
}

#[test]
fn test_formatting_reconstruction_after_paragraph_close() {
    // </p> pops the b element off the stack but leaves it in the active
    // formatting list, so the next paragraph's text reconstructs it.
    let tree = parse_tree("<!DOCTYPE html><p>1<b>2</p><p>3</p>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "p"]);
    let paragraphs = tree.children(body).to_vec();

    let first_b = find_element(&tree, paragraphs[0], "b").unwrap();
    assert_eq!(tree.text_content(first_b), "2");

    let second_b = find_element(&tree, paragraphs[1], "b").unwrap();
    assert_eq!(tree.text_content(second_b), "3");
}

#[test]
fn test_foster_parenting() {
    // Non-table content inside a table is relocated before the table.
    let tree = parse_tree("<!DOCTYPE html><table><b>text</b><tr><td>cell</td></tr></table>");
    let body = tree.body().unwrap();
    let children = tree.children(body).to_vec();
    assert_eq!(child_tags(&tree, body), vec!["b", "table"]);
    assert_eq!(tree.text_content(children[0]), "text");

    let table = children[1];
    let td = find_element(&tree, table, "td").unwrap();
    assert_eq!(tree.text_content(td), "cell");
}

#[test]
fn test_table_implies_tbody() {
    let tree = parse_tree("<!DOCTYPE html><table><tr><td>x</td></tr></table>");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    assert_eq!(child_tags(&tree, table), vec!["tbody"]);
    let tbody = tree.children(table)[0];
    assert_eq!(child_tags(&tree, tbody), vec!["tr"]);
}

#[test]
fn test_table_cell_implies_row() {
    let tree = parse_tree("<!DOCTYPE html><table><td>x</td></table>");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    let td = find_element(&tree, table, "td").unwrap();
    let tr = tree.parent(td).unwrap();
    assert_eq!(tree.as_element(tr).unwrap().tag_name, "tr");
    let tbody = tree.parent(tr).unwrap();
    assert_eq!(tree.as_element(tbody).unwrap().tag_name, "tbody");
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    let tree = parse_tree("<!DOCTYPE html><table> <tr><td>x</td></tr></table>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["table"]);
}

#[test]
fn test_select_nested_option() {
    let tree = parse_tree("<!DOCTYPE html><select><option>a<option>b</select>");
    let select = find_element(&tree, NodeId::ROOT, "select").unwrap();
    assert_eq!(child_tags(&tree, select), vec!["option", "option"]);
}

#[test]
fn test_template_contents() {
    let tree = parse_tree("<!DOCTYPE html><template><p>inside</p></template>after");
    let template = find_element(&tree, NodeId::ROOT, "template").unwrap();
    let p = find_element(&tree, template, "p").unwrap();
    assert_eq!(tree.text_content(p), "inside");
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "after");
}

#[test]
fn test_script_raw_text() {
    let tree = parse_tree("<!DOCTYPE html><script>if (a < b) { x(); }</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(tree.text_content(script), "if (a < b) { x(); }");
}

#[test]
fn test_textarea_skips_leading_newline() {
    let tree = parse_tree("<!DOCTYPE html><textarea>\nvalue</textarea>");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(tree.text_content(textarea), "value");
}

#[test]
fn test_pre_skips_leading_newline() {
    let tree = parse_tree("<!DOCTYPE html><pre>\ncontent</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(tree.text_content(pre), "content");
}

#[test]
fn test_character_reference_in_text() {
    let tree = parse_tree("<!DOCTYPE html><p>fish &amp; chips &notin; x</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(tree.text_content(p), "fish & chips \u{2209} x");
}

#[test]
fn test_whitespace_only_text_is_whitespace_node() {
    let tree = parse_tree("<!DOCTYPE html><div>  \n  </div><div>text</div>");
    let body = tree.body().unwrap();
    let divs = tree.children(body).to_vec();

    let first_child = tree.children(divs[0])[0];
    assert!(matches!(
        tree.get(first_child).unwrap().node_type,
        NodeType::Whitespace(_)
    ));

    let second_child = tree.children(divs[1])[0];
    assert!(matches!(
        tree.get(second_child).unwrap().node_type,
        NodeType::Text(_)
    ));
}

#[test]
fn test_node_offsets_point_into_input() {
    let html = "<!DOCTYPE html><html><body><div>x</div></body></html>";
    let tree = parse_tree(html);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let offset = tree.get(div).unwrap().offset;
    assert_eq!(&html[offset..offset + 5], "<div>");
}

#[test]
fn test_offsets_monotonic_in_preorder() {
    // Without relocated content, pre-order matches input order.
    let html = "<!DOCTYPE html><html><head><title>t</title></head>\
                <body><div id=\"a\">one</div><div>two<span>three</span></div></body></html>";
    let tree = parse_tree(html);
    let mut last = 0;
    for id in tree.descendants(NodeId::ROOT) {
        let offset = tree.get(id).unwrap().offset;
        assert!(offset >= last, "offset {offset} went backwards");
        last = offset;
    }
}

#[test]
fn test_svg_foreign_content() {
    let tree = parse_tree("<!DOCTYPE html><svg viewbox=\"0 0 1 1\"><foreignobject></foreignobject></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    let data = tree.as_element(svg).unwrap();
    assert_eq!(data.namespace, tupelo_dom::Namespace::Svg);
    assert_eq!(data.get("viewBox"), Some("0 0 1 1"));
    // Tag name case is restored from the adjustment table.
    assert!(find_element(&tree, svg, "foreignObject").is_some());
}

#[test]
fn test_mathml_foreign_content() {
    let tree = parse_tree("<!DOCTYPE html><math><mi>x</mi></math>");
    let math = find_element(&tree, NodeId::ROOT, "math").unwrap();
    assert_eq!(
        tree.as_element(math).unwrap().namespace,
        tupelo_dom::Namespace::MathMl
    );
    let mi = find_element(&tree, math, "mi").unwrap();
    assert_eq!(tree.text_content(mi), "x");
}

#[test]
fn test_foreign_breakout_tag() {
    // A <p> inside <svg> pops the foreign content and lands in the body.
    let tree = parse_tree("<!DOCTYPE html><svg><p>back in html</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let parent = tree.parent(p).unwrap();
    assert_eq!(tree.as_element(parent).unwrap().tag_name, "body");
}

#[test]
fn test_cdata_in_svg_becomes_cdata_node() {
    let tree = parse_tree("<!DOCTYPE html><svg><![CDATA[raw < data]]></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    let child = tree.children(svg).first().copied().expect("cdata child");
    match &tree.get(child).unwrap().node_type {
        NodeType::Cdata(data) => assert_eq!(data, "raw < data"),
        other => panic!("expected CDATA node, got {other:?}"),
    }
}

#[test]
fn test_cdata_in_svg_inside_template() {
    let tree = parse_tree("<!DOCTYPE html><template><svg><![CDATA[x]]></svg></template>");
    let template = find_element(&tree, NodeId::ROOT, "template").unwrap();
    let svg = find_element(&tree, template, "svg").unwrap();
    let child = tree.children(svg).first().copied().expect("cdata child");
    assert!(matches!(
        tree.get(child).unwrap().node_type,
        NodeType::Cdata(_)
    ));
}

#[test]
fn test_cdata_outside_foreign_content_is_error() {
    let output = parse(b"<!DOCTYPE html><body><![CDATA[x]]></body>");
    assert!(!output.errors.is_empty());
    // The section is treated as a bogus comment, not text.
    let body = output.tree.body().unwrap();
    assert_eq!(output.tree.text_content(body), "");
}

#[test]
fn test_frameset_document() {
    let tree = parse_tree("<!DOCTYPE html><frameset><frame></frameset>");
    let html_id = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html_id), vec!["head", "frameset"]);
    let frameset = find_element(&tree, html_id, "frameset").unwrap();
    assert_eq!(child_tags(&tree, frameset), vec!["frame"]);
}

#[test]
fn test_errors_sorted_by_offset() {
    let output = parse(b"<p id=a id=b></p\0><b>1<i>2</b>3</i>");
    let offsets: Vec<usize> = output.errors.iter().map(|e| e.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn test_parser_is_total_on_garbage() {
    // Every input produces a tree; none of these may panic or loop.
    let inputs: &[&[u8]] = &[
        b"",
        b"<",
        b"</",
        b"<!",
        b"<!doctype",
        b"<a href=",
        b"<table><table><table>",
        b"</b></b></b>",
        b"<select><select>",
        b"\xff\xfe\x00garbage\x80",
        b"<svg><desc><table>",
        b"<template></template></template>",
    ];
    for input in inputs {
        let output = parse(input);
        assert!(output.tree.len() >= 1);
    }
}

#[test]
fn test_eof_in_tag_reported() {
    let output = parse(b"<!DOCTYPE html><div");
    assert!(!output.errors.is_empty());
}

#[test]
fn test_serialization_round_trip() {
    let html = "<!DOCTYPE html><html><head><title>t</title></head>\
                <body><p class=\"a\">one &amp; two</p><table><tbody><tr>\
                <td>cell</td></tr></tbody></table></body></html>";
    let first = parse(html.as_bytes());
    let serialized = tupelo_html::serialize_document(&first.tree);
    let second = parse(serialized.as_bytes());
    let reserialized = tupelo_html::serialize_document(&second.tree);
    assert_eq!(serialized, reserialized);

    let first_body = first.tree.body().unwrap();
    let second_body = second.tree.body().unwrap();
    assert_eq!(
        first.tree.text_content(first_body),
        second.tree.text_content(second_body)
    );
}

#[test]
fn test_serialize_void_and_escaping() {
    let output = parse(b"<!DOCTYPE html><body><img src=\"a&b\"><p>1 < 2</p></body>");
    let body = output.tree.body().unwrap();
    let markup = tupelo_html::serialize(&output.tree, body);
    assert_eq!(markup, "<img src=\"a&amp;b\"><p>1 &lt; 2</p>");
}
