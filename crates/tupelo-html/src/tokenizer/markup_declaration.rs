//! Markup declaration tokenizer states: comments and DOCTYPEs.
//!
//! [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
//! through
//! [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state).

use crate::error::ErrorCode;

use super::core::HTMLTokenizer;
use super::states::TokenizerState;
use super::token::Token;

impl HTMLTokenizer {
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// This state matches on lookahead; the `!` that brought us here is the
    /// (ignored) current input character, and the unconsumed stream starts
    /// right after it.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "If the next few characters are:"
        if self.input.looking_at("--") {
            // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two
            // characters, create a comment token whose data is the empty
            // string, and switch to the comment start state."
            self.input.advance_by(2);
            self.current_token = Some(Token::new_comment(self.current_token_offset));
            self.switch_to(TokenizerState::CommentStart);
        } else if self.input.looking_at_ignore_ascii_case("doctype") {
            // "ASCII case-insensitive match for the word 'DOCTYPE' - Consume
            // those characters and switch to the DOCTYPE state."
            self.input.advance_by(7);
            self.switch_to(TokenizerState::DOCTYPE);
        } else if self.input.looking_at("[CDATA[") {
            // "The string '[CDATA[' ... - Consume those characters. If there
            // is an adjusted current node and it is not an element in the
            // HTML namespace, then switch to the CDATA section state.
            // Otherwise, this is a cdata-in-html-content parse error. Create
            // a comment token whose data is the '[CDATA[' string. Switch to
            // the bogus comment state."
            self.input.advance_by(7);
            if self.is_current_node_foreign {
                self.switch_to(TokenizerState::CDATASection);
            } else {
                self.log_parse_error(ErrorCode::CdataInHtmlContent);
                let mut comment = Token::new_comment(self.current_token_offset);
                comment.append_str_to_comment("[CDATA[");
                self.current_token = Some(comment);
                self.switch_to(TokenizerState::BogusComment);
            }
        } else {
            // "Anything else - This is an incorrectly-opened-comment parse
            // error. Create a comment token whose data is the empty string.
            // Switch to the bogus comment state (don't consume anything in
            // the current state)."
            self.log_parse_error(ErrorCode::IncorrectlyOpenedComment);
            self.current_token = Some(Token::new_comment(self.current_token_offset));
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment start dash state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentStartDash);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an
            // abrupt-closing-of-empty-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.log_parse_error(ErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "Anything else - Reconsume in the comment state."
            _ => {
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentEnd);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an
            // abrupt-closing-of-empty-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.log_parse_error(ErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInComment);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append a U+002D HYPHEN-MINUS character (-) to
            // the comment token's data. Reconsume in the comment state."
            Some(_) => {
                self.current_token_mut().append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<) - Append the current input character
            // to the comment token's data. Switch to the comment less-than
            // sign state."
            Some('<') => {
                self.current_token_mut().append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end dash state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Append a U+FFFD REPLACEMENT CHARACTER character to the
            // comment token's data."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.current_token_mut().append_to_comment('\u{FFFD}');
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInComment);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append the current input character to the
            // comment token's data."
            Some(c) => {
                self.current_token_mut().append_to_comment(c);
            }
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Append the current input
            // character to the comment token's data. Switch to the comment
            // less-than sign bang state."
            Some('!') => {
                self.current_token_mut().append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            // "U+003C LESS-THAN SIGN (<) - Append the current input character
            // to the comment token's data."
            Some('<') => {
                self.current_token_mut().append_to_comment('<');
            }
            // "Anything else - Reconsume in the comment state."
            _ => {
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment less-than sign
            // bang dash state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentLessThanSignBangDash);
            }
            // "Anything else - Reconsume in the comment state."
            _ => {
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment less-than sign
            // bang dash dash state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
            }
            // "Anything else - Reconsume in the comment end dash state."
            _ => {
                self.reconsume_in(TokenizerState::CommentEndDash);
            }
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>), EOF - Reconsume in the comment
            // end state."
            Some('>') | None => {
                self.reconsume_in(TokenizerState::CommentEnd);
            }
            // "Anything else - This is a nested-comment parse error.
            // Reconsume in the comment end state."
            Some(_) => {
                self.log_parse_error(ErrorCode::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Switch to the comment end state."
            Some('-') => {
                self.switch_to(TokenizerState::CommentEnd);
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInComment);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append a U+002D HYPHEN-MINUS character (-) to
            // the comment token's data. Reconsume in the comment state."
            Some(_) => {
                self.current_token_mut().append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0021 EXCLAMATION MARK (!) - Switch to the comment end bang
            // state."
            Some('!') => {
                self.switch_to(TokenizerState::CommentEndBang);
            }
            // "U+002D HYPHEN-MINUS (-) - Append a U+002D HYPHEN-MINUS
            // character (-) to the comment token's data."
            Some('-') => {
                self.current_token_mut().append_to_comment('-');
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInComment);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append two U+002D HYPHEN-MINUS characters (-)
            // to the comment token's data. Reconsume in the comment state."
            Some(_) => {
                self.current_token_mut().append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-) - Append two U+002D HYPHEN-MINUS
            // characters (-) and a U+0021 EXCLAMATION MARK character (!) to
            // the comment token's data. Switch to the comment end dash state."
            Some('-') => {
                self.current_token_mut().append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an
            // incorrectly-closed-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.log_parse_error(ErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInComment);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append two U+002D HYPHEN-MINUS characters (-)
            // and a U+0021 EXCLAMATION MARK character (!) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.current_token_mut().append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Switch to
            // the before DOCTYPE name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>) - Reconsume in the before DOCTYPE
            // name state."
            Some('>') => {
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
            // "EOF - This is an eof-in-doctype parse error. Create a new
            // DOCTYPE token. Set its force-quirks flag to on. Emit the
            // current token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.set_force_quirks();
                self.current_token = Some(doctype);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-whitespace-before-doctype-name parse error. Reconsume
            // in the before DOCTYPE name state."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "ASCII upper alpha - Create a new DOCTYPE token. Set the
            // token's name to the lowercase version of the current input
            // character ... Switch to the DOCTYPE name state."
            Some(c) if c.is_ascii_uppercase() => {
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.append_to_doctype_name(c.to_ascii_lowercase());
                self.current_token = Some(doctype);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Create a new DOCTYPE token. Set the token's name to a
            // U+FFFD REPLACEMENT CHARACTER character. Switch to the DOCTYPE
            // name state."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.append_to_doctype_name('\u{FFFD}');
                self.current_token = Some(doctype);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-doctype-name
            // parse error. Create a new DOCTYPE token. Set its force-quirks
            // flag to on. Switch to the data state. Emit the current token."
            Some('>') => {
                self.log_parse_error(ErrorCode::MissingDoctypeName);
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.set_force_quirks();
                self.current_token = Some(doctype);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. Create a new
            // DOCTYPE token. Set its force-quirks flag to on. Emit the
            // current token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.set_force_quirks();
                self.current_token = Some(doctype);
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Create a new DOCTYPE token. Set the token's
            // name to the current input character. Switch to the DOCTYPE name
            // state."
            Some(c) => {
                let mut doctype = Token::new_doctype(self.current_token_offset);
                doctype.append_to_doctype_name(c);
                self.current_token = Some(doctype);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Switch to
            // the after DOCTYPE name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "ASCII upper alpha - Append the lowercase version of the
            // current input character ... to the current DOCTYPE token's name."
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut()
                    .append_to_doctype_name(c.to_ascii_lowercase());
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Append a U+FFFD REPLACEMENT CHARACTER character to the
            // current DOCTYPE token's name."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.current_token_mut().append_to_doctype_name('\u{FFFD}');
            }
            // "EOF - This is an eof-in-doctype parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Emit the current
            // DOCTYPE token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append the current input character to the
            // current DOCTYPE token's name."
            Some(c) => {
                self.current_token_mut().append_to_doctype_name(c);
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Emit the current
            // DOCTYPE token. Emit an end-of-file token."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - If the six characters starting from the
            // current input character are an ASCII case-insensitive match for
            // the word 'PUBLIC', then consume those characters and switch to
            // the after DOCTYPE public keyword state. Otherwise, if ... a
            // match for the word 'SYSTEM', then consume those characters and
            // switch to the after DOCTYPE system keyword state. Otherwise,
            // this is an invalid-character-sequence-after-doctype-name parse
            // error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(c) => {
                if c.eq_ignore_ascii_case(&'p') && self.input.looking_at_ignore_ascii_case("ublic")
                {
                    self.input.advance_by(5);
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if c.eq_ignore_ascii_case(&'s')
                    && self.input.looking_at_ignore_ascii_case("ystem")
                {
                    self.input.advance_by(5);
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    self.log_parse_error(ErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                    self.current_token_mut().set_force_quirks();
                    self.reconsume_in(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Switch to
            // the before DOCTYPE public identifier state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEPublicIdentifier);
            }
            // "U+0022 QUOTATION MARK (\") - This is a
            // missing-whitespace-after-doctype-public-keyword parse error.
            // Set the current DOCTYPE token's public identifier to the empty
            // string (not missing), then switch to the DOCTYPE public
            // identifier (double-quoted) state."
            Some('"') => {
                self.log_parse_error(ErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.current_token_mut().set_empty_public_identifier();
                self.switch_to(TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... the DOCTYPE public identifier
            // (single-quoted) state."
            Some('\'') => {
                self.log_parse_error(ErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.current_token_mut().set_empty_public_identifier();
                self.switch_to(TokenizerState::DOCTYPEPublicIdentifierSingleQuoted);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a
            // missing-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.log_parse_error(ErrorCode::MissingDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-public-identifier parse error. Set
            // the current DOCTYPE token's force-quirks flag to on. Reconsume
            // in the bogus DOCTYPE state."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+0022 QUOTATION MARK (\") - Set the current DOCTYPE token's
            // public identifier to the empty string (not missing), then
            // switch to the DOCTYPE public identifier (double-quoted) state."
            Some('"') => {
                self.current_token_mut().set_empty_public_identifier();
                self.switch_to(TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... (single-quoted) state."
            Some('\'') => {
                self.current_token_mut().set_empty_public_identifier();
                self.switch_to(TokenizerState::DOCTYPEPublicIdentifierSingleQuoted);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a
            // missing-doctype-public-identifier parse error. ..."
            Some('>') => {
                self.log_parse_error(ErrorCode::MissingDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-public-identifier parse error. ..."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.59](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and [§ 13.2.5.60](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state):
    /// the two quoted public identifier states, parameterized by the closing
    /// quote.
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "U+0022 QUOTATION MARK (\") [or U+0027 APOSTROPHE] - Switch to
            // the after DOCTYPE public identifier state."
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Append a U+FFFD REPLACEMENT CHARACTER character to the
            // current DOCTYPE token's public identifier."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.current_token_mut().append_to_public_identifier('\u{FFFD}');
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an
            // abrupt-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.log_parse_error(ErrorCode::AbruptDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append the current input character to the
            // current DOCTYPE token's public identifier."
            Some(c) => {
                self.current_token_mut().append_to_public_identifier(c);
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Switch to
            // the between DOCTYPE public and system identifiers state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0022 QUOTATION MARK (\") - This is a
            // missing-whitespace-between-doctype-public-and-system-identifiers
            // parse error. Set the current DOCTYPE token's system identifier
            // to the empty string (not missing), then switch to the DOCTYPE
            // system identifier (double-quoted) state."
            Some('"') => {
                self.log_parse_error(
                    ErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... (single-quoted) state."
            Some('\'') => {
                self.log_parse_error(
                    ErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierSingleQuoted);
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-system-identifier parse error. ..."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0022 QUOTATION MARK (\") - Set the current DOCTYPE token's
            // system identifier to the empty string (not missing), then
            // switch to the DOCTYPE system identifier (double-quoted) state."
            Some('"') => {
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... (single-quoted) state."
            Some('\'') => {
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierSingleQuoted);
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-system-identifier parse error. ..."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Switch to
            // the before DOCTYPE system identifier state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPESystemIdentifier);
            }
            // "U+0022 QUOTATION MARK (\") - This is a
            // missing-whitespace-after-doctype-system-keyword parse error.
            // Set the current DOCTYPE token's system identifier to the empty
            // string (not missing), then switch to the DOCTYPE system
            // identifier (double-quoted) state."
            Some('"') => {
                self.log_parse_error(ErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... (single-quoted) state."
            Some('\'') => {
                self.log_parse_error(ErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierSingleQuoted);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a
            // missing-doctype-system-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.log_parse_error(ErrorCode::MissingDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-system-identifier parse error. ..."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+0022 QUOTATION MARK (\") - Set the current DOCTYPE token's
            // system identifier to the empty string (not missing), then
            // switch to the DOCTYPE system identifier (double-quoted) state."
            Some('"') => {
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierDoubleQuoted);
            }
            // "U+0027 APOSTROPHE (') - ... (single-quoted) state."
            Some('\'') => {
                self.current_token_mut().set_empty_system_identifier();
                self.switch_to(TokenizerState::DOCTYPESystemIdentifierSingleQuoted);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a
            // missing-doctype-system-identifier parse error. ..."
            Some('>') => {
                self.log_parse_error(ErrorCode::MissingDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is a
            // missing-quote-before-doctype-system-identifier parse error. ..."
            Some(_) => {
                self.log_parse_error(ErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.65](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// and [§ 13.2.5.66](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state):
    /// the two quoted system identifier states, parameterized by the closing
    /// quote.
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "U+0022 QUOTATION MARK (\") [or U+0027 APOSTROPHE] - Switch to
            // the after DOCTYPE system identifier state."
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Append a U+FFFD REPLACEMENT CHARACTER character to the
            // current DOCTYPE token's system identifier."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
                self.current_token_mut().append_to_system_identifier('\u{FFFD}');
            }
            // "U+003E GREATER-THAN SIGN (>) - This is an
            // abrupt-doctype-system-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.log_parse_error(ErrorCode::AbruptDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Append the current input character to the
            // current DOCTYPE token's system identifier."
            Some(c) => {
                self.current_token_mut().append_to_system_identifier(c);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            // "U+0009 ..., U+000A ..., U+000C ..., U+0020 SPACE - Ignore the
            // character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF - This is an eof-in-doctype parse error. ..."
            None => {
                self.log_parse_error(ErrorCode::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - This is an
            // unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set
            // the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.log_parse_error(ErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0000 NULL - This is an unexpected-null-character parse
            // error. Ignore the character."
            Some('\0') => {
                self.log_parse_error(ErrorCode::UnexpectedNullCharacter);
            }
            // "EOF - Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_current_token();
                self.emit_eof_token();
            }
            // "Anything else - Ignore the character."
            Some(_) => {}
        }
    }
}
