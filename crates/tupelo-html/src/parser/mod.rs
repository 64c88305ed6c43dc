//! HTML parser module for tree construction.

/// HTML parser implementation.
pub mod core;
/// SVG and MathML foreign content adjustments.
pub mod foreign_content;
/// Doctype-based quirks mode selection.
pub mod quirks;

pub use self::core::{print_tree, HTMLParser, InsertionMode};
