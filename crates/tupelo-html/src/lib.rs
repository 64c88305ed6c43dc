//! HTML tokenizer and parser for Tupelo.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input decoding** ([WHATWG § 13.2.3](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream))
//!   - UTF-8 with U+FFFD replacement for invalid sequences
//!   - CR and CRLF newline normalization with byte-offset tracking
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All tokenizer states, including script data and CDATA sections
//!   - DOCTYPE, comment, and character reference handling
//!   - Attribute parsing with duplicate detection
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes, foreign content (SVG and MathML),
//!     the adoption agency algorithm, and foster parenting
//!   - Fragment parsing ([§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! - **Serialization** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! Parsing never fails: every input produces a tree plus a list of recorded
//! parse errors, in source order.
//!
//! # Known limitations
//!
//! The named character reference table carries the Latin-1 repertoire, every
//! legacy (no-semicolon) entity, and the common symbol names rather than the
//! full 2,231-entry WHATWG list; references outside the subset are reported
//! as `unknown-named-character-reference` and left as literal text.
//!
//! ```
//! let output = tupelo_html::parse(b"<!DOCTYPE html><p>Hello</p>");
//! assert!(output.errors.is_empty());
//! let body = output.tree.body().unwrap();
//! assert_eq!(output.tree.text_content(body), "Hello");
//! ```

/// Parse error codes and caller-facing error types.
pub mod error;
/// Input byte stream decoding.
pub mod input;
/// HTML parser and tree construction.
pub mod parser;
/// HTML serialization.
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{ErrorCode, FragmentContextError, ParseError};
pub use parser::{print_tree, HTMLParser, InsertionMode};
pub use serialize::{serialize, serialize_document};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

use tupelo_dom::{DomTree, Namespace, NodeId};

/// The result of a parse: the tree, the interesting node ids, and every
/// parse error recorded along the way.
#[derive(Debug)]
pub struct ParseOutput {
    /// The finished DOM tree.
    pub tree: DomTree,
    /// The Document node.
    pub document: NodeId,
    /// The root `html` element, when one exists. Fragment parses put their
    /// parsed content under this node.
    pub root: Option<NodeId>,
    /// Every parse error recorded, ordered by source offset.
    pub errors: Vec<ParseError>,
}

/// Parse a complete HTML document.
///
/// Never fails; malformed markup is recovered per the WHATWG rules and
/// reported through [`ParseOutput::errors`].
#[must_use]
pub fn parse(input: &[u8]) -> ParseOutput {
    let parser = HTMLParser::new(input);
    let (tree, errors) = parser.run();
    let document = tree.root();
    let root = tree.document_element();
    ParseOutput {
        tree,
        document,
        root,
        errors,
    }
}

/// Parse an HTML fragment as if it appeared inside a `context_tag` element.
///
/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// The parsed content lands under the `html` root element returned in
/// [`ParseOutput::root`]. Unknown context tags are rejected before any
/// parsing happens.
///
/// # Errors
///
/// Returns [`FragmentContextError`] when `context_tag` is not a recognized
/// HTML element name (for [`Namespace::Html`]) or not a valid element name
/// (for the foreign namespaces).
pub fn parse_fragment(
    input: &[u8],
    context_tag: &str,
    context_namespace: Namespace,
) -> Result<ParseOutput, FragmentContextError> {
    let parser = HTMLParser::new_fragment(input, context_tag, context_namespace)?;
    let (tree, errors) = parser.run();
    let document = tree.root();
    let root = tree.document_element();
    Ok(ParseOutput {
        tree,
        document,
        root,
        errors,
    })
}
