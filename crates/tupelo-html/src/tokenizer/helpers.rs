//! Shared helpers for the tokenizer state handlers.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions ("Switch to", "Reconsume in"), token emission ("Emit
//! the current token"), the appropriate-end-tag check used by the raw text
//! state families, duplicate attribute handling, and parse error recording.

use crate::error::{ErrorCode, ParseError};

use super::core::HTMLTokenizer;
use super::states::TokenizerState;
use super::token::Token;

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// Transitions to a new state. The next character will be consumed on
    /// the next step of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming a fresh character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer's whitespace set: "U+0009 CHARACTER TABULATION (tab),
    /// U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+0020 SPACE".
    /// CR never appears here: it is normalized away at decode time.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }

    /// The token currently under construction.
    ///
    /// # Panics
    ///
    /// Panics if there is none, indicating a tokenizer bug: every state that
    /// appends to a token is only reachable after the token was created.
    pub(super) fn current_token_mut(&mut self) -> &mut Token {
        self.current_token
            .as_mut()
            .expect("no token under construction")
    }

    /// "Emit the current token"
    ///
    /// Moves the token under construction to the output queue. End tags
    /// with attributes or a self-closing flag are reported here and the
    /// offending pieces dropped, per the token documentation in § 13.2.5:
    /// "if the end tag token is emitted with attributes, that is an
    /// end-tag-with-attributes parse error" and "if the end tag token is
    /// emitted with its self-closing flag set, that is an
    /// end-tag-with-trailing-solidus parse error".
    pub(super) fn emit_current_token(&mut self) {
        self.discard_duplicate_attribute();
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        match &mut token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
            }
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                if !attributes.is_empty() {
                    self.log_parse_error(ErrorCode::EndTagWithAttributes);
                    attributes.clear();
                }
                if *self_closing {
                    self.log_parse_error(ErrorCode::EndTagWithTrailingSolidus);
                    *self_closing = false;
                }
            }
            _ => {}
        }
        self.tokens.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.emit_character_token_at(c, self.current_input_offset);
    }

    /// Emit a character token at an explicit offset. Used when re-emitting
    /// characters that were consumed earlier, like the `<` of an aborted tag
    /// or the contents of the temporary buffer.
    pub(super) fn emit_character_token_at(&mut self, c: char, offset: usize) {
        self.tokens.push_back(Token::Character { data: c, offset });
    }

    /// Emit a CDATA character token for the current input character.
    pub(super) fn emit_cdata_token(&mut self, c: char) {
        self.tokens.push_back(Token::Cdata {
            data: c,
            offset: self.current_input_offset,
        });
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.tokens.push_back(Token::EndOfFile {
            offset: self.input.end_offset(),
        });
        self.at_eof = true;
    }

    /// "Emit a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer)."
    pub(super) fn emit_temporary_buffer(&mut self) {
        let buffer = core::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token_at(c, self.current_token_offset);
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// and its RAWTEXT / script data / script data escaped counterparts.
    ///
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any."
    ///
    /// Determines whether `</title>` ends the raw text of `<title>`.
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// The shared "Anything else" of the RCDATA, RAWTEXT, script data, and
    /// script data escaped end tag name states:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
    /// character token, and a character token for each of the characters in
    /// the temporary buffer (in the order they were added to the buffer).
    /// Reconsume in the [raw text] state."
    pub(super) fn abort_raw_text_end_tag(&mut self, raw_text_state: TokenizerState) {
        self.emit_character_token_at('<', self.current_token_offset);
        self.emit_character_token_at('/', self.current_token_offset);
        self.emit_temporary_buffer();
        self.current_token = None;
        self.reconsume_in(raw_text_state);
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state ... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// The duplicate cannot be popped here: its value is still being
    /// consumed, and the value-state appends always target the last
    /// attribute. It is only marked; [`Self::discard_duplicate_attribute`]
    /// removes it once the value is complete.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error(ErrorCode::DuplicateAttribute);
            self.current_attribute_is_duplicate = true;
        }
    }

    /// Drop the attribute under construction when it was marked as a
    /// duplicate, together with the value it accumulated.
    pub(super) fn discard_duplicate_attribute(&mut self) {
        if self.current_attribute_is_duplicate {
            self.current_attribute_is_duplicate = false;
            if let Some(ref mut token) = self.current_token {
                token.remove_current_attribute();
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token. Set that attribute
    /// name and value to the empty string."
    pub(super) fn begin_new_attribute(&mut self) {
        self.discard_duplicate_attribute();
        let offset = self.current_input_offset;
        self.current_token_mut().start_new_attribute(offset);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input character. Parse errors in
    /// HTML are not fatal; the tokenizer recovers and continues.
    pub(super) fn log_parse_error(&mut self, code: ErrorCode) {
        self.errors
            .push(ParseError::new(code, self.current_input_offset));
    }
}
