//! Parse error reporting.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. ... Parse errors are only errors
//! with the syntax of HTML documents. In addition to checking for parse
//! errors, conforming checkers must also verify that the document obeys all
//! the other conformance requirements described in this specification."
//!
//! Parse errors never abort parsing. Every error encountered during a parse
//! is recorded with the byte offset of the input character that triggered it,
//! and the full list is returned alongside the finished tree.

use core::fmt;

use strum_macros::Display;
use thiserror::Error;

/// The parse error codes this parser can report.
///
/// The tokenizer codes use the names given in the error table of
/// [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors).
/// The tree construction stage has no named errors in the spec ("a parse
/// error" throughout), so those are grouped by the kind of token that was
/// unexpected.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCode {
    // Tokenizer errors, § 13.2.2 table.
    AbruptClosingOfEmptyComment,
    AbruptDoctypePublicIdentifier,
    AbruptDoctypeSystemIdentifier,
    AbsenceOfDigitsInNumericCharacterReference,
    CdataInHtmlContent,
    CharacterReferenceOutsideUnicodeRange,
    ControlCharacterReference,
    DuplicateAttribute,
    EndTagWithAttributes,
    EndTagWithTrailingSolidus,
    EofBeforeTagName,
    EofInCdata,
    EofInComment,
    EofInDoctype,
    EofInScriptHtmlCommentLikeText,
    EofInTag,
    IncorrectlyClosedComment,
    IncorrectlyOpenedComment,
    InvalidCharacterSequenceAfterDoctypeName,
    InvalidFirstCharacterOfTagName,
    MissingAttributeValue,
    MissingDoctypeName,
    MissingDoctypePublicIdentifier,
    MissingDoctypeSystemIdentifier,
    MissingEndTagName,
    MissingQuoteBeforeDoctypePublicIdentifier,
    MissingQuoteBeforeDoctypeSystemIdentifier,
    MissingSemicolonAfterCharacterReference,
    MissingWhitespaceAfterDoctypePublicKeyword,
    MissingWhitespaceAfterDoctypeSystemKeyword,
    MissingWhitespaceBeforeDoctypeName,
    MissingWhitespaceBetweenAttributes,
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    NestedComment,
    NoncharacterCharacterReference,
    NullCharacterReference,
    SurrogateCharacterReference,
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    UnexpectedCharacterInAttributeName,
    UnexpectedCharacterInUnquotedAttributeValue,
    UnexpectedEqualsSignBeforeAttributeName,
    UnexpectedNullCharacter,
    UnexpectedQuestionMarkInsteadOfTagName,
    UnexpectedSolidusInTag,
    UnknownNamedCharacterReference,

    // Tree construction errors, § 13.2.6 ("this is a parse error").
    MissingDoctype,
    UnexpectedDoctype,
    UnexpectedStartTag,
    UnexpectedEndTag,
    UnexpectedCharacter,
    UnexpectedEndOfFile,
    MisnestedFormattingElement,
}

/// A single recorded parse error.
///
/// `offset` is the byte offset into the original input of the character that
/// triggered the error (for end-of-file errors, the input length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// Which error occurred.
    pub code: ErrorCode,
    /// Byte offset into the original input.
    pub offset: usize,
}

impl ParseError {
    /// Create an error record at the given input offset.
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    /// Human-readable description, e.g. `"duplicate-attribute at byte 17"`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} at byte {}", self.code, self.offset)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.code, self.offset)
    }
}

/// Errors raised before parsing starts, for invalid API usage.
///
/// Unlike [`ParseError`], these abort the call: there is no tree to recover
/// into when the caller hands us an unusable fragment context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FragmentContextError {
    /// The fragment context tag is not a recognized tag name for the
    /// requested namespace.
    #[error("unknown fragment context tag: {tag:?}")]
    UnknownContextTag {
        /// The tag name that was rejected.
        tag: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display_uses_spec_names() {
        assert_eq!(
            ErrorCode::UnexpectedNullCharacter.to_string(),
            "unexpected-null-character"
        );
        assert_eq!(ErrorCode::DuplicateAttribute.to_string(), "duplicate-attribute");
        assert_eq!(
            ErrorCode::MissingSemicolonAfterCharacterReference.to_string(),
            "missing-semicolon-after-character-reference"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let error = ParseError::new(ErrorCode::EofInTag, 42);
        assert_eq!(error.message(), "eof-in-tag at byte 42");
        assert_eq!(error.to_string(), error.message());
    }
}
