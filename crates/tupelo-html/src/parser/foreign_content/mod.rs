//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use tupelo_dom::{AttrNamespace, ElementData, Namespace};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a
/// namespaced attribute, with the prefix being the string in the second
/// column, the local name being the string in the third column, and the
/// namespace being the namespace in the fourth column."
///
/// The qualified name is kept as written in the source; only the namespace is
/// assigned. This step applies to foreign (SVG and MathML) elements only;
/// attributes on HTML elements always stay un-namespaced.
#[must_use]
pub fn foreign_attribute_namespace(name: &str) -> AttrNamespace {
    match name {
        "xlink:actuate" | "xlink:arcrole" | "xlink:href" | "xlink:role" | "xlink:show"
        | "xlink:title" | "xlink:type" => AttrNamespace::XLink,
        "xml:lang" | "xml:space" => AttrNamespace::Xml,
        "xmlns" | "xmlns:xlink" => AttrNamespace::Xmlns,
        _ => AttrNamespace::None,
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// The start tag names that pop foreign content off the stack and hand the
/// token back to the regular HTML rules.
///
/// "A start tag whose tag name is one of: 'b', 'big', 'blockquote', ..."
pub const BREAKOUT_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element,
/// A MathML ms element, A MathML mtext element."
#[must_use]
pub fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && matches!(element.tag_name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following
/// elements: A MathML annotation-xml element whose start tag token had an
/// attribute with the name 'encoding' whose value was an ASCII
/// case-insensitive match for the string 'text/html' [or]
/// 'application/xhtml+xml', An SVG foreignObject element, An SVG desc
/// element, An SVG title element."
#[must_use]
pub fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => {
            element.tag_name == "annotation-xml"
                && element.get("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
        }
        Namespace::Svg => {
            matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title")
        }
        Namespace::Html => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupelo_dom::Attribute;

    #[test]
    fn test_foreign_attribute_namespaces() {
        assert_eq!(foreign_attribute_namespace("xlink:href"), AttrNamespace::XLink);
        assert_eq!(foreign_attribute_namespace("xml:lang"), AttrNamespace::Xml);
        assert_eq!(foreign_attribute_namespace("xmlns"), AttrNamespace::Xmlns);
        assert_eq!(foreign_attribute_namespace("href"), AttrNamespace::None);
    }

    #[test]
    fn test_mathml_text_integration_points() {
        let mi = ElementData::new("mi".to_string(), Namespace::MathMl);
        assert!(is_mathml_text_integration_point(&mi));
        let math = ElementData::new("math".to_string(), Namespace::MathMl);
        assert!(!is_mathml_text_integration_point(&math));
        // Tag name alone is not enough: an HTML element named "mi" is not one.
        let html_mi = ElementData::new("mi".to_string(), Namespace::Html);
        assert!(!is_mathml_text_integration_point(&html_mi));
    }

    #[test]
    fn test_html_integration_points() {
        let foreign_object = ElementData::new("foreignObject".to_string(), Namespace::Svg);
        assert!(is_html_integration_point(&foreign_object));

        let mut annotation = ElementData::new("annotation-xml".to_string(), Namespace::MathMl);
        assert!(!is_html_integration_point(&annotation));
        annotation.push_attribute(Attribute::new(
            "encoding".to_string(),
            "Text/HTML".to_string(),
            0,
        ));
        assert!(is_html_integration_point(&annotation));
    }
}
