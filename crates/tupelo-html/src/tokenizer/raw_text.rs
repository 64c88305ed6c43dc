//! Raw text tokenizer states: RCDATA, RAWTEXT, script data (including the
//! escaped and double-escaped comment-like variants), and CDATA sections.
//!
//! [§ 13.2.5.2](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
//! through
//! [§ 13.2.5.31](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state),
//! and [§ 13.2.5.69](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
//! through § 13.2.5.71.
//!
//! The tree construction stage switches the tokenizer into these states:
//! RCDATA for `<title>`/`<textarea>`, RAWTEXT for `<style>` and friends,
//! script data for `<script>`, and the CDATA section state when it sees
//! `<![CDATA[` with a foreign adjusted current node.

use crate::error::ErrorCode;

use super::core::HTMLTokenizer;
use super::states::TokenizerState;
use super::token::Token;

impl HTMLTokenizer {
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    pub(super) fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the RCDATA
            // state. Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::RCDATA);
                self.character_reference_offset = self.current_input_offset;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the RCDATA less-than
            // sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::RCDATALessThanSign);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - Emit an end-of-file token."
            None => {
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    pub(super) fn handle_rcdata_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty
            // string. Switch to the RCDATA end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::RCDATAEndTagOpen);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.reconsume_in(TokenizerState::RCDATA);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    pub(super) fn handle_rcdata_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to
            // the empty string. Reconsume in the RCDATA end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag(self.current_token_offset));
                self.reconsume_in(TokenizerState::RCDATAEndTagName);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token
            // and a U+002F SOLIDUS character token. Reconsume in the RCDATA
            // state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.emit_character_token_at('/', self.current_token_offset);
                self.reconsume_in(TokenizerState::RCDATA);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    pub(super) fn handle_rcdata_end_tag_name_state(&mut self) {
        self.handle_raw_text_end_tag_name(TokenizerState::RCDATA);
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    pub(super) fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<) - Switch to the RAWTEXT less-than
            // sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::RAWTEXTLessThanSign);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - Emit an end-of-file token."
            None => {
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    pub(super) fn handle_rawtext_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty
            // string. Switch to the RAWTEXT end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::RAWTEXTEndTagOpen);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the RAWTEXT state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.reconsume_in(TokenizerState::RAWTEXT);
            }
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    pub(super) fn handle_rawtext_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to
            // the empty string. Reconsume in the RAWTEXT end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag(self.current_token_offset));
                self.reconsume_in(TokenizerState::RAWTEXTEndTagName);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token
            // and a U+002F SOLIDUS character token. Reconsume in the RAWTEXT
            // state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.emit_character_token_at('/', self.current_token_offset);
                self.reconsume_in(TokenizerState::RAWTEXT);
            }
        }
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    pub(super) fn handle_rawtext_end_tag_name_state(&mut self) {
        self.handle_raw_text_end_tag_name(TokenizerState::RAWTEXT);
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data
            // less-than sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::ScriptDataLessThanSign);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - Emit an end-of-file token."
            None => {
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty
            // string. Switch to the script data end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "U+0021 EXCLAMATION MARK (!) - Switch to the script data escape
            // start state. Emit a U+003C LESS-THAN SIGN character token and a
            // U+0021 EXCLAMATION MARK character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token_at('<', self.current_token_offset);
                self.emit_character_token('!');
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the script data state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    pub(super) fn handle_script_data_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to
            // the empty string. Reconsume in the script data end tag name
            // state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag(self.current_token_offset));
                self.reconsume_in(TokenizerState::ScriptDataEndTagName);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token
            // and a U+002F SOLIDUS character token. Reconsume in the script
            // data state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.emit_character_token_at('/', self.current_token_offset);
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    pub(super) fn handle_script_data_end_tag_name_state(&mut self) {
        self.handle_raw_text_end_tag_name(TokenizerState::ScriptData);
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escape
            // start dash state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
                self.emit_character_token('-');
            }
            // "Anything else - Reconsume in the script data state."
            _ => {
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escaped
            // dash dash state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            // "Anything else - Reconsume in the script data state."
            _ => {
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escaped
            // dash state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data escaped
            // less-than sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data escaped
            // dash dash state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data escaped
            // less-than sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Switch to the script data escaped state. Emit a U+FFFD
            // REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Switch to the script data escaped state. Emit
            // the current input character as a character token."
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Emit a U+002D HYPHEN-MINUS character
            // token."
            Some('-') => {
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data escaped
            // less-than sign state."
            Some('<') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the script data
            // state. Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Switch to the script data escaped state. Emit a U+FFFD
            // REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Switch to the script data escaped state. Emit
            // the current input character as a character token."
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty
            // string. Switch to the script data escaped end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "ASCII alpha - Set the temporary buffer to the empty string.
            // Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // script data double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token_at('<', self.current_token_offset);
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the script data escaped state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    pub(super) fn handle_script_data_escaped_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to
            // the empty string. Reconsume in the script data escaped end tag
            // name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag(self.current_token_offset));
                self.reconsume_in(TokenizerState::ScriptDataEscapedEndTagName);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token
            // and a U+002F SOLIDUS character token. Reconsume in the script
            // data escaped state."
            _ => {
                self.emit_character_token_at('<', self.current_token_offset);
                self.emit_character_token_at('/', self.current_token_offset);
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    pub(super) fn handle_script_data_escaped_end_tag_name_state(&mut self) {
        self.handle_raw_text_end_tag_name(TokenizerState::ScriptDataEscaped);
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    pub(super) fn handle_script_data_double_escape_start_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE, U+002F
            // SOLIDUS (/), U+003E GREATER-THAN SIGN (>) - If the temporary
            // buffer is the string 'script', then switch to the script data
            // double escaped state. Otherwise, switch to the script data
            // escaped state. Emit the current input character as a character
            // token."
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                } else {
                    self.switch_to(TokenizerState::ScriptDataEscaped);
                }
                self.emit_character_token(c);
            }
            // "ASCII upper alpha - Append the lowercase version of the
            // current input character ... to the temporary buffer. Emit the
            // current input character as a character token."
            Some(c) if c.is_ascii_uppercase() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            // "ASCII lower alpha - Append the current input character to the
            // temporary buffer. Emit the current input character as a
            // character token."
            Some(c) if c.is_ascii_lowercase() => {
                self.temporary_buffer.push(c);
                self.emit_character_token(c);
            }
            // "Anything else - Reconsume in the script data escaped state."
            _ => {
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data double
            // escaped dash state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data double
            // escaped less-than sign state. Emit a U+003C LESS-THAN SIGN
            // character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Emit a U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the script data double
            // escaped dash dash state. Emit a U+002D HYPHEN-MINUS character
            // token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data double
            // escaped less-than sign state. Emit a U+003C LESS-THAN SIGN
            // character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Switch to the script data double escaped state. Emit a
            // U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Switch to the script data double escaped
            // state. Emit the current input character as a character token."
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Emit a U+002D HYPHEN-MINUS character
            // token."
            Some('-') => {
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the script data double
            // escaped less-than sign state. Emit a U+003C LESS-THAN SIGN
            // character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the script data
            // state. Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Switch to the script data double escaped state. Emit a
            // U+FFFD REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF - This is an eof-in-script-html-comment-like-text parse
            // error. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            // "Anything else - Switch to the script data double escaped
            // state. Emit the current input character as a character token."
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/) - Set the temporary buffer to the empty
            // string. Switch to the script data double escape end state. Emit
            // a U+002F SOLIDUS character token."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
                self.emit_character_token('/');
            }
            // "Anything else - Reconsume in the script data double escaped
            // state."
            _ => {
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    pub(super) fn handle_script_data_double_escape_end_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE, U+002F
            // SOLIDUS (/), U+003E GREATER-THAN SIGN (>) - If the temporary
            // buffer is the string 'script', then switch to the script data
            // escaped state. Otherwise, switch to the script data double
            // escaped state. Emit the current input character as a character
            // token."
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(TokenizerState::ScriptDataEscaped);
                } else {
                    self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                }
                self.emit_character_token(c);
            }
            // "ASCII upper alpha - Append the lowercase version of the
            // current input character ... to the temporary buffer. Emit the
            // current input character as a character token."
            Some(c) if c.is_ascii_uppercase() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            // "ASCII lower alpha - Append the current input character to the
            // temporary buffer. Emit the current input character as a
            // character token."
            Some(c) if c.is_ascii_lowercase() => {
                self.temporary_buffer.push(c);
                self.emit_character_token(c);
            }
            // "Anything else - Reconsume in the script data double escaped
            // state."
            _ => {
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// "NULL characters are handled in the tree construction stage, as part
    /// of the in foreign content insertion mode, which is the only place
    /// where CDATA sections can appear."
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (]) - Switch to the CDATA section
            // bracket state."
            Some(']') => {
                self.current_token_offset = self.current_input_offset;
                self.switch_to(TokenizerState::CDATASectionBracket);
            }
            // "EOF - This is an eof-in-cdata parse error. Emit an end-of-file
            // token."
            None => {
                self.log_parse_error(ErrorCode::EofInCdata);
                self.emit_eof_token();
            }
            // "Anything else - Emit the current input character as a
            // character token."
            Some(c) => {
                self.emit_cdata_token(c);
            }
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (]) - Switch to the CDATA section
            // end state."
            Some(']') => {
                self.switch_to(TokenizerState::CDATASectionEnd);
            }
            // "Anything else - Emit a U+005D RIGHT SQUARE BRACKET character
            // token. Reconsume in the CDATA section state."
            _ => {
                self.emit_cdata_token_at(']', self.current_token_offset);
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (]) - Emit a U+005D RIGHT SQUARE
            // BRACKET character token."
            Some(']') => {
                self.emit_cdata_token_at(']', self.current_token_offset);
                self.current_token_offset += 1;
            }
            // "U+003E GREATER-THAN SIGN character - Switch to the data state."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
            }
            // "Anything else - Emit two U+005D RIGHT SQUARE BRACKET character
            // tokens. Reconsume in the CDATA section state."
            _ => {
                self.emit_cdata_token_at(']', self.current_token_offset);
                self.emit_cdata_token_at(']', self.current_token_offset + 1);
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }

    /// The shared body of the RCDATA, RAWTEXT, script data, and script data
    /// escaped end tag name states; they differ only in which state the
    /// "Anything else" entry falls back to.
    fn handle_raw_text_end_tag_name(&mut self, raw_text_state: TokenizerState) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - If the
            // current end tag token is an appropriate end tag token, then
            // switch to the before attribute name state. Otherwise, treat it
            // as per the 'anything else' entry below."
            Some(c) if Self::is_whitespace_char(c) => {
                if self.is_appropriate_end_tag_token() {
                    self.switch_to(TokenizerState::BeforeAttributeName);
                } else {
                    self.abort_raw_text_end_tag(raw_text_state);
                }
            }
            // "U+002F SOLIDUS (/) - If the current end tag token is an
            // appropriate end tag token, then switch to the self-closing
            // start tag state. Otherwise, treat it as per the 'anything else'
            // entry below."
            Some('/') => {
                if self.is_appropriate_end_tag_token() {
                    self.switch_to(TokenizerState::SelfClosingStartTag);
                } else {
                    self.abort_raw_text_end_tag(raw_text_state);
                }
            }
            // "U+003E GREATER-THAN SIGN (>) - If the current end tag token is
            // an appropriate end tag token, then switch to the data state and
            // emit the current tag token. Otherwise, treat it as per the
            // 'anything else' entry below."
            Some('>') => {
                if self.is_appropriate_end_tag_token() {
                    self.switch_to(TokenizerState::Data);
                    self.emit_current_token();
                } else {
                    self.abort_raw_text_end_tag(raw_text_state);
                }
            }
            // "ASCII upper alpha - Append the lowercase version of the
            // current input character ... to the current tag token's tag
            // name. Append the current input character to the temporary
            // buffer."
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut().append_to_tag_name(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            // "ASCII lower alpha - Append the current input character to the
            // current tag token's tag name. Append the current input
            // character to the temporary buffer."
            Some(c) if c.is_ascii_lowercase() => {
                self.current_token_mut().append_to_tag_name(c);
                self.temporary_buffer.push(c);
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token,
            // a U+002F SOLIDUS character token, and a character token for
            // each of the characters in the temporary buffer. Reconsume in
            // the [raw text] state."
            _ => {
                self.abort_raw_text_end_tag(raw_text_state);
            }
        }
    }

    /// Emit a CDATA character token at an explicit offset. Used when
    /// re-emitting `]` characters held back by the bracket states.
    fn emit_cdata_token_at(&mut self, c: char, offset: usize) {
        self.tokens.push_back(Token::Cdata { data: c, offset });
    }
}
