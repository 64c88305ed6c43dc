//! HTML tokenization.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! The tokenizer turns the decoded input stream into DOCTYPE, tag, comment,
//! character, and end-of-file tokens, recording parse errors along the way.
//! It is driven one token at a time by the tree construction stage, which
//! also switches it between the data, RCDATA, RAWTEXT, script data, and
//! PLAINTEXT states as the parsed markup requires.

mod character_reference;
mod core;
mod helpers;
mod markup_declaration;
pub mod named_character_references;
mod raw_text;
mod states;
mod token;

pub use core::HTMLTokenizer;
pub use states::TokenizerState;
pub use token::{Attribute, Token};

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = HTMLTokenizer::new(input.as_bytes());
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn collect_text(tokens: &[Token]) -> String {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Character { data, .. } => Some(*data),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_simple_start_tag() {
        let tokens = tokenize("<p>");
        assert_eq!(
            tokens[0],
            Token::StartTag {
                name: "p".to_string(),
                self_closing: false,
                attributes: Vec::new(),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_tag_name_is_lowercased() {
        let tokens = tokenize("<DiV></DIV>");
        assert_eq!(tokens[0].tag_name(), Some("div"));
        assert_eq!(tokens[1].tag_name(), Some("div"));
        assert!(matches!(tokens[1], Token::EndTag { .. }));
    }

    #[test]
    fn test_attributes_with_offsets() {
        let tokens = tokenize(r#"<a href="x" id=y>"#);
        let Token::StartTag { attributes, .. } = &tokens[0] else {
            panic!("expected start tag, got {}", tokens[0]);
        };
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].name, "href");
        assert_eq!(attributes[0].value, "x");
        assert_eq!(attributes[0].offset, 3);
        assert_eq!(attributes[1].name, "id");
        assert_eq!(attributes[1].value, "y");
        assert_eq!(attributes[1].offset, 12);
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let mut tokenizer = HTMLTokenizer::new(b"<p id=a id=b>");
        let token = tokenizer.next_token();
        let Token::StartTag { attributes, .. } = token else {
            panic!("expected start tag");
        };
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].value, "a");
        let errors = tokenizer.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].code,
            crate::error::ErrorCode::DuplicateAttribute
        );
    }

    #[test]
    fn test_character_offsets() {
        let tokens = tokenize("ab");
        assert_eq!(tokens[0], Token::Character { data: 'a', offset: 0 });
        assert_eq!(tokens[1], Token::Character { data: 'b', offset: 1 });
        assert_eq!(tokens[2], Token::EndOfFile { offset: 2 });
    }

    #[test]
    fn test_comment() {
        let tokens = tokenize("<!-- hi -->");
        assert_eq!(
            tokens[0],
            Token::Comment {
                data: " hi ".to_string(),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_doctype_with_identifiers() {
        let tokens = tokenize(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">",
        );
        assert_eq!(
            tokens[0],
            Token::Doctype {
                name: Some("html".to_string()),
                public_identifier: Some("-//W3C//DTD XHTML 1.1//EN".to_string()),
                system_identifier: Some(
                    "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd".to_string()
                ),
                force_quirks: false,
                offset: 0,
            }
        );
    }

    #[test]
    fn test_named_character_reference() {
        let tokens = tokenize("a&amp;b");
        assert_eq!(collect_text(&tokens), "a&b");
        // The decoded character carries the offset of the ampersand.
        assert_eq!(tokens[1], Token::Character { data: '&', offset: 1 });
    }

    #[test]
    fn test_named_reference_without_semicolon() {
        let mut tokenizer = HTMLTokenizer::new(b"&ampx");
        let mut text = String::new();
        loop {
            match tokenizer.next_token() {
                Token::Character { data, .. } => text.push(data),
                Token::EndOfFile { .. } => break,
                token => panic!("unexpected token {token}"),
            }
        }
        assert_eq!(text, "&x");
        assert!(
            tokenizer
                .take_errors()
                .iter()
                .any(|e| e.code == crate::error::ErrorCode::MissingSemicolonAfterCharacterReference)
        );
    }

    #[test]
    fn test_longest_match_wins() {
        // "&notin;" must resolve as one entity, not as "&not" + "in;".
        let tokens = tokenize("&notin;");
        assert_eq!(collect_text(&tokens), "\u{2209}");
    }

    #[test]
    fn test_legacy_reference_in_attribute_followed_by_alphanumeric() {
        // "for historical reasons" the reference is not decoded when an
        // alphanumeric follows inside an attribute value.
        let tokens = tokenize("<a href=\"?a&ampb\">");
        let Token::StartTag { attributes, .. } = &tokens[0] else {
            panic!("expected start tag");
        };
        assert_eq!(attributes[0].value, "?a&ampb");
    }

    #[test]
    fn test_numeric_character_reference() {
        let tokens = tokenize("&#x41;&#66;");
        assert_eq!(collect_text(&tokens), "AB");
    }

    #[test]
    fn test_numeric_reference_c1_substitution() {
        // 0x80 maps to U+20AC per the Windows-1252 substitution table.
        let tokens = tokenize("&#x80;");
        assert_eq!(collect_text(&tokens), "\u{20AC}");
    }

    #[test]
    fn test_numeric_reference_out_of_range() {
        let mut tokenizer = HTMLTokenizer::new(b"&#x110000;");
        assert!(matches!(
            tokenizer.next_token(),
            Token::Character { data: '\u{FFFD}', .. }
        ));
        assert!(
            tokenizer
                .take_errors()
                .iter()
                .any(|e| e.code == crate::error::ErrorCode::CharacterReferenceOutsideUnicodeRange)
        );
    }

    #[test]
    fn test_bare_ampersand_is_literal() {
        let tokens = tokenize("a & b");
        assert_eq!(collect_text(&tokens), "a & b");
    }

    #[test]
    fn test_rcdata_end_tag_matching() {
        let mut tokenizer = HTMLTokenizer::new(b"<title>a</x></title>");
        let first = tokenizer.next_token();
        assert_eq!(first.tag_name(), Some("title"));
        // The tree constructor switches the state after seeing <title>.
        tokenizer.set_state(TokenizerState::RCDATA);
        let mut text = String::new();
        loop {
            match tokenizer.next_token() {
                Token::Character { data, .. } => text.push(data),
                Token::EndTag { name, .. } => {
                    assert_eq!(name, "title");
                    break;
                }
                token => panic!("unexpected token {token}"),
            }
        }
        // "</x>" is not an appropriate end tag, so it stays text.
        assert_eq!(text, "a</x>");
    }

    #[test]
    fn test_cdata_outside_foreign_content_is_bogus_comment() {
        let tokens = tokenize("<![CDATA[x]]>");
        assert_eq!(
            tokens[0],
            Token::Comment {
                data: "[CDATA[x]]".to_string(),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_cdata_in_foreign_content() {
        let mut tokenizer = HTMLTokenizer::new(b"<![CDATA[x]]>y");
        tokenizer.set_is_current_node_foreign(true);
        assert!(matches!(
            tokenizer.next_token(),
            Token::Cdata { data: 'x', .. }
        ));
        assert!(matches!(
            tokenizer.next_token(),
            Token::Character { data: 'y', .. }
        ));
    }

    #[test]
    fn test_script_data_escaped() {
        let mut tokenizer = HTMLTokenizer::new(b"<script><!-- </x> --></script>");
        let first = tokenizer.next_token();
        assert_eq!(first.tag_name(), Some("script"));
        tokenizer.set_state(TokenizerState::ScriptData);
        let mut text = String::new();
        loop {
            match tokenizer.next_token() {
                Token::Character { data, .. } => text.push(data),
                Token::EndTag { name, .. } => {
                    assert_eq!(name, "script");
                    break;
                }
                token => panic!("unexpected token {token}"),
            }
        }
        assert_eq!(text, "<!-- </x> -->");
    }

    #[test]
    fn test_eof_token_repeats() {
        let mut tokenizer = HTMLTokenizer::new(b"");
        assert!(tokenizer.next_token().is_eof());
        assert!(tokenizer.next_token().is_eof());
    }
}
