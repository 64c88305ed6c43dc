//! Integration tests for the HTML tokenizer.

use tupelo_html::{ErrorCode, HTMLTokenizer, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
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

/// Helper to tokenize and also return the recorded errors
fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<tupelo_html::ParseError>) {
    let mut tokenizer = HTMLTokenizer::new(input.as_bytes());
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    let errors = tokenizer.take_errors();
    (tokens, errors)
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
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H', offset: 0 }));
    assert!(matches!(tokens[4], Token::Character { data: 'o', offset: 4 }));
    assert!(tokens[5].is_eof());
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        other => panic!("expected start tag, got {other:?}"),
    }
}

#[test]
fn test_attribute_quoting_forms() {
    let tokens = tokenize("<a one=\"1\" two='2' three=3 four>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            let pairs: Vec<(&str, &str)> = attributes
                .iter()
                .map(|a| (a.name.as_str(), a.value.as_str()))
                .collect();
            assert_eq!(
                pairs,
                vec![("one", "1"), ("two", "2"), ("three", "3"), ("four", "")]
            );
        }
        other => panic!("expected start tag, got {other:?}"),
    }
}

#[test]
fn test_attribute_names_lowercased() {
    let tokens = tokenize("<DIV CLASS=Menu>");
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "div");
            assert_eq!(attributes[0].name, "class");
            // Values keep their case.
            assert_eq!(attributes[0].value, "Menu");
        }
        other => panic!("expected start tag, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_value_discarded_with_it() {
    // The duplicate's value must vanish with it, not be appended to the
    // surviving first occurrence.
    let (tokens, errors) = tokenize_with_errors("<div id=\"a\" id=\"b\">");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "id");
            assert_eq!(attributes[0].value, "a");
        }
        other => panic!("expected start tag, got {other:?}"),
    }
    assert!(errors
        .iter()
        .any(|e| e.code == ErrorCode::DuplicateAttribute));
}

#[test]
fn test_attribute_after_duplicate_survives() {
    let tokens = tokenize("<div id=a id=b class=c>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            let pairs: Vec<(&str, &str)> = attributes
                .iter()
                .map(|a| (a.name.as_str(), a.value.as_str()))
                .collect();
            assert_eq!(pairs, vec![("id", "a"), ("class", "c")]);
        }
        other => panic!("expected start tag, got {other:?}"),
    }
}

#[test]
fn test_crlf_normalized_to_lf() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(collect_text(&tokens), "a\nb\nc");
}

#[test]
fn test_crlf_offsets_preserved() {
    let tokens = tokenize("a\r\nb");
    // The 'b' sits at byte 3 in the raw input even after normalization.
    assert!(matches!(tokens[2], Token::Character { data: 'b', offset: 3 }));
}

#[test]
fn test_invalid_utf8_replaced() {
    let mut tokenizer = HTMLTokenizer::new(b"a\xffb");
    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data, .. } => text.push(data),
            token if token.is_eof() => break,
            _ => {}
        }
    }
    assert_eq!(text, "a\u{FFFD}b");
}

#[test]
fn test_comment_with_dashes() {
    let tokens = tokenize("<!-- a -- b -->");
    match &tokens[0] {
        Token::Comment { data, .. } => assert_eq!(data, " a -- b "),
        other => panic!("expected comment, got {other:?}"),
    }
}

#[test]
fn test_empty_comment() {
    let tokens = tokenize("<!---->");
    match &tokens[0] {
        Token::Comment { data, .. } => assert_eq!(data, ""),
        other => panic!("expected comment, got {other:?}"),
    }
}

#[test]
fn test_bogus_comment_from_question_mark() {
    let (tokens, errors) = tokenize_with_errors("<?xml version=\"1.0\"?>");
    match &tokens[0] {
        Token::Comment { data, .. } => assert_eq!(data, "?xml version=\"1.0\"?"),
        other => panic!("expected comment, got {other:?}"),
    }
    assert!(errors
        .iter()
        .any(|e| e.code == ErrorCode::UnexpectedQuestionMarkInsteadOfTagName));
}

#[test]
fn test_doctype_force_quirks_on_eof() {
    let tokens = tokenize("<!DOCTYPE htm");
    match &tokens[0] {
        Token::Doctype { force_quirks, .. } => assert!(force_quirks),
        other => panic!("expected doctype, got {other:?}"),
    }
}

#[test]
fn test_doctype_case_insensitive_keyword() {
    let tokens = tokenize("<!doctype HTML>");
    match &tokens[0] {
        Token::Doctype { name, .. } => assert_eq!(name.as_deref(), Some("html")),
        other => panic!("expected doctype, got {other:?}"),
    }
}

#[test]
fn test_null_character_in_data_replaced() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    assert_eq!(collect_text(&tokens), "a\0b");
    assert!(errors
        .iter()
        .any(|e| e.code == ErrorCode::UnexpectedNullCharacter));
}

#[test]
fn test_eof_in_tag_error() {
    let (_, errors) = tokenize_with_errors("<div class=");
    assert!(errors.iter().any(|e| e.code == ErrorCode::EofInTag));
}

#[test]
fn test_missing_end_tag_name() {
    let (tokens, errors) = tokenize_with_errors("</>x");
    // "</>" is dropped entirely.
    assert_eq!(collect_text(&tokens), "x");
    assert!(errors.iter().any(|e| e.code == ErrorCode::MissingEndTagName));
}

#[test]
fn test_end_tag_with_attributes_error() {
    let (_, errors) = tokenize_with_errors("</div class=\"x\">");
    assert!(errors
        .iter()
        .any(|e| e.code == ErrorCode::EndTagWithAttributes));
}

#[test]
fn test_script_data_double_escaped() {
    let mut tokenizer = HTMLTokenizer::new(b"<!--<script>if (a<b)</script>--></script>");
    tokenizer.set_state(TokenizerState::ScriptData);
    tokenizer.set_last_start_tag_name("script");
    let mut text = String::new();
    let mut end_tag = None;
    loop {
        match tokenizer.next_token() {
            Token::Character { data, .. } => text.push(data),
            Token::EndTag { name, .. } => end_tag = Some(name),
            token if token.is_eof() => break,
            _ => {}
        }
    }
    // Everything up to the real </script> is script text.
    assert_eq!(text, "<!--<script>if (a<b)</script>-->");
    assert_eq!(end_tag.as_deref(), Some("script"));
}

#[test]
fn test_rawtext_ignores_markup() {
    let mut tokenizer = HTMLTokenizer::new(b"<b>&amp;</style>");
    tokenizer.set_state(TokenizerState::RAWTEXT);
    tokenizer.set_last_start_tag_name("style");
    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data, .. } => text.push(data),
            Token::EndTag { .. } | Token::EndOfFile { .. } => break,
            _ => {}
        }
    }
    assert_eq!(text, "<b>&amp;");
}

#[test]
fn test_named_reference_attribute_legacy_exception() {
    // "&copy" in an attribute followed by "=" keeps the literal text.
    let tokens = tokenize("<a href=\"?a&copy=1\">");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "?a&copy=1");
        }
        other => panic!("expected start tag, got {other:?}"),
    }
    // In text, the legacy reference resolves without its semicolon.
    let tokens = tokenize("&copy 2024");
    assert_eq!(collect_text(&tokens), "\u{00A9} 2024");
}

#[test]
fn test_numeric_reference_surrogate_replaced() {
    let (tokens, errors) = tokenize_with_errors("&#xD800;");
    assert_eq!(collect_text(&tokens), "\u{FFFD}");
    assert!(errors
        .iter()
        .any(|e| e.code == ErrorCode::SurrogateCharacterReference));
}

#[test]
fn test_token_offsets_are_tag_open_positions() {
    let tokens = tokenize("ab<div>");
    assert_eq!(tokens[2].offset(), 2);
}

#[test]
fn test_eof_offset_is_input_length() {
    let tokens = tokenize("abc");
    assert_eq!(tokens.last().unwrap().offset(), 3);
}
