//! HTML serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a finished DOM tree back into markup. Re-parsing the output yields
//! an equivalent tree, which is what makes the serializer usable for
//! round-trip testing and for exporting parsed documents.

use tupelo_dom::{DomTree, Namespace, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// param, source, track, wbr"
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// "If current node is a style, script, xmp, iframe, noembed, noframes, or
/// plaintext element, or if current node is a noscript element and scripting
/// is enabled for the node, then append the value of current node's data IDL
/// attribute literally."
///
/// Scripting is never enabled here, so noscript text is escaped normally.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Escaping a string... consists of running the following steps:
///  1. Replace any occurrence of the '&' character by the string '&amp;'.
///  2. Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
///     string '&nbsp;'.
///  3. If the algorithm was invoked in the attribute mode, replace any
///     occurrences of the '\"' character by the string '&quot;'.
///  4. If the algorithm was not invoked in the attribute mode, replace any
///     occurrences of the '<' character by the string '&lt;', and any
///     occurrences of the '>' character by the string '&gt;'."
fn escape_string(out: &mut String, data: &str, attribute_mode: bool) {
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Serialize the children of `node` as HTML markup (the element's inner
/// HTML). This is the fragment serialization algorithm of § 13.3.
#[must_use]
pub fn serialize(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(node) {
        serialize_node(tree, child, &mut out);
    }
    out
}

/// Serialize the whole document, doctype included.
#[must_use]
pub fn serialize_document(tree: &DomTree) -> String {
    let mut out = String::new();
    let document = tree.document();
    if document.has_doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(document.name.as_deref().unwrap_or(""));
        out.push('>');
    }
    for &child in tree.children(tree.root()) {
        serialize_node(tree, child, &mut out);
    }
    out
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document(_) => {
            for &child in tree.children(id) {
                serialize_node(tree, child, out);
            }
        }
        // "If current node is an Element: ... Append a '<' character,
        //  followed by tagname. ... For each attribute..., append a ' '
        //  character, the attribute's serialized name..., a '=' character, a
        //  '\"' character, the attribute's value, escaped..., and a second
        //  '\"' character. ... Append a '>' character."
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for attr in &data.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_string(out, &attr.value, true);
                out.push('"');
            }
            out.push('>');
            // "If current node serializes as void, then continue on to the
            //  next child node at this point."
            if data.namespace == Namespace::Html
                && VOID_ELEMENTS.contains(&data.tag_name.as_str())
            {
                return;
            }
            for &child in tree.children(id) {
                serialize_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        NodeType::Text(data) | NodeType::Whitespace(data) => {
            let raw = node
                .parent
                .and_then(|parent| tree.as_element(parent))
                .is_some_and(|parent| {
                    parent.namespace == Namespace::Html
                        && RAW_TEXT_ELEMENTS.contains(&parent.tag_name.as_str())
                });
            if raw {
                out.push_str(data);
            } else {
                escape_string(out, data, false);
            }
        }
        // CDATA nodes only arise in foreign content, where the form is
        // preserved verbatim on re-parse.
        NodeType::Cdata(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        // "Append the literal string '<!--', followed by the value of
        //  current node's data..., followed by the literal string '-->'."
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}
