//! Integration tests for the HTML fragment parsing algorithm.
//!
//! [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use tupelo_dom::{DomTree, Namespace, NodeId, NodeType};
use tupelo_html::{parse_fragment, FragmentContextError};

fn fragment(html: &str, context_tag: &str) -> tupelo_html::ParseOutput {
    parse_fragment(html.as_bytes(), context_tag, Namespace::Html).expect("valid context tag")
}

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

fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child).map(|e| e.tag_name.clone()))
        .collect()
}

#[test]
fn test_div_context_basic() {
    let output = fragment("<p>one</p><p>two</p>", "div");
    let root = output.root.expect("fragment root");
    assert_eq!(child_tags(&output.tree, root), vec!["p", "p"]);
}

#[test]
fn test_body_context_single_paragraph() {
    let output = fragment("<p>Lorem ipsum</p>", "body");
    let root = output.root.expect("fragment root");
    let children = output.tree.children(root).to_vec();
    assert_eq!(children.len(), 1);
    let p = children[0];
    assert_eq!(output.tree.as_element(p).unwrap().tag_name, "p");
    assert_eq!(output.tree.text_content(p), "Lorem ipsum");
}

#[test]
fn test_fragment_root_is_only_document_child() {
    let output = fragment("<p>x</p>", "div");
    let element_children: Vec<NodeId> = output
        .tree
        .children(output.document)
        .iter()
        .copied()
        .filter(|&id| matches!(output.tree.get(id).unwrap().node_type, NodeType::Element(_)))
        .collect();
    assert_eq!(element_children, vec![output.root.unwrap()]);
}

#[test]
fn test_no_implied_body_in_fragment() {
    // A div-context fragment does not grow head/body scaffolding.
    let output = fragment("text", "div");
    let root = output.root.unwrap();
    assert!(find_element(&output.tree, root, "body").is_none());
    assert_eq!(output.tree.text_content(root), "text");
}

#[test]
fn test_td_context_parses_cell_content() {
    let output = fragment("cell text", "td");
    let root = output.root.unwrap();
    assert_eq!(output.tree.text_content(root), "cell text");
}

#[test]
fn test_tbody_context_keeps_rows() {
    // In a document, <tr> outside a table is dropped. With a tbody context
    // it parses as a row.
    let output = fragment("<tr><td>a</td></tr>", "tbody");
    let root = output.root.unwrap();
    assert_eq!(child_tags(&output.tree, root), vec!["tr"]);
    let tr = output.tree.children(root)[0];
    assert_eq!(child_tags(&output.tree, tr), vec!["td"]);
}

#[test]
fn test_tr_context() {
    let output = fragment("<td>a</td><th>b</th>", "tr");
    let root = output.root.unwrap();
    assert_eq!(child_tags(&output.tree, root), vec!["td", "th"]);
}

#[test]
fn test_textarea_context_is_rcdata() {
    // Markup inside a textarea context is literal text.
    let output = fragment("<p>not an element</p>", "textarea");
    let root = output.root.unwrap();
    assert!(find_element(&output.tree, root, "p").is_none());
    assert_eq!(output.tree.text_content(root), "<p>not an element</p>");
}

#[test]
fn test_title_context_resolves_character_references() {
    // RCDATA keeps markup literal but still resolves references.
    let output = fragment("a &amp; b <i>", "title");
    let root = output.root.unwrap();
    assert_eq!(output.tree.text_content(root), "a & b <i>");
}

#[test]
fn test_style_context_is_rawtext() {
    let output = fragment("a &amp; b", "style");
    let root = output.root.unwrap();
    // RAWTEXT does not resolve character references.
    assert_eq!(output.tree.text_content(root), "a &amp; b");
}

#[test]
fn test_script_context_is_script_data() {
    let output = fragment("if (a < b) {}", "script");
    let root = output.root.unwrap();
    assert_eq!(output.tree.text_content(root), "if (a < b) {}");
}

#[test]
fn test_plaintext_context() {
    let output = fragment("</plaintext> everything is text", "plaintext");
    let root = output.root.unwrap();
    assert_eq!(
        output.tree.text_content(root),
        "</plaintext> everything is text"
    );
}

#[test]
fn test_template_context() {
    let output = fragment("<tr><td>x</td></tr>", "template");
    let root = output.root.unwrap();
    let tr = find_element(&output.tree, root, "tr");
    assert!(tr.is_some());
}

#[test]
fn test_select_context_drops_markup() {
    let output = fragment("<option>a</option><div>ignored</div>", "select");
    let root = output.root.unwrap();
    assert_eq!(child_tags(&output.tree, root), vec!["option"]);
    assert!(find_element(&output.tree, root, "div").is_none());
}

#[test]
fn test_svg_context_namespace() {
    let output =
        parse_fragment(b"<circle r=\"1\"></circle>", "svg", Namespace::Svg).expect("svg context");
    let root = output.root.unwrap();
    let circle = find_element(&output.tree, root, "circle").expect("circle element");
    assert_eq!(
        output.tree.as_element(circle).unwrap().namespace,
        Namespace::Svg
    );
}

#[test]
fn test_foreign_context_accepts_any_valid_name() {
    // Foreign context tags are not limited to a known list.
    assert!(parse_fragment(b"x", "madeupname", Namespace::Svg).is_ok());
}

#[test]
fn test_unknown_html_context_tag_rejected() {
    let result = parse_fragment(b"x", "notarealtag", Namespace::Html);
    assert!(matches!(
        result,
        Err(FragmentContextError::UnknownContextTag { .. })
    ));
}

#[test]
fn test_empty_context_tag_rejected() {
    assert!(parse_fragment(b"x", "", Namespace::Html).is_err());
    assert!(parse_fragment(b"x", "", Namespace::Svg).is_err());
}

#[test]
fn test_html_end_tag_ignored_in_fragment() {
    let output = fragment("before</html>after", "div");
    let root = output.root.unwrap();
    assert_eq!(output.tree.text_content(root), "beforeafter");
}

#[test]
fn test_fragment_errors_recorded() {
    let output = fragment("<b>1<i>2</b>3</i>", "div");
    assert!(!output.errors.is_empty());
}
