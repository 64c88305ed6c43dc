//! Character reference tokenizer states.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! through
//! [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state).
//!
//! Named references use a greedy longest-match scan over the entity table,
//! including the legacy no-semicolon entities and their historical exception
//! inside attribute values. Numeric references apply the C1 control
//! substitution table and the out-of-range, surrogate, noncharacter, and
//! control diagnostics of § 13.2.5.80.

use crate::error::ErrorCode;

use super::core::HTMLTokenizer;
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use super::states::TokenizerState;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set
/// the character reference code to the number in the second column of that
/// row." Windows-1252 leakage for the C1 control range.
const C1_SUBSTITUTIONS: [(u32, u32); 27] = [
    (0x80, 0x20AC), // EURO SIGN
    (0x82, 0x201A), // SINGLE LOW-9 QUOTATION MARK
    (0x83, 0x0192), // LATIN SMALL LETTER F WITH HOOK
    (0x84, 0x201E), // DOUBLE LOW-9 QUOTATION MARK
    (0x85, 0x2026), // HORIZONTAL ELLIPSIS
    (0x86, 0x2020), // DAGGER
    (0x87, 0x2021), // DOUBLE DAGGER
    (0x88, 0x02C6), // MODIFIER LETTER CIRCUMFLEX ACCENT
    (0x89, 0x2030), // PER MILLE SIGN
    (0x8A, 0x0160), // LATIN CAPITAL LETTER S WITH CARON
    (0x8B, 0x2039), // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
    (0x8C, 0x0152), // LATIN CAPITAL LIGATURE OE
    (0x8E, 0x017D), // LATIN CAPITAL LETTER Z WITH CARON
    (0x91, 0x2018), // LEFT SINGLE QUOTATION MARK
    (0x92, 0x2019), // RIGHT SINGLE QUOTATION MARK
    (0x93, 0x201C), // LEFT DOUBLE QUOTATION MARK
    (0x94, 0x201D), // RIGHT DOUBLE QUOTATION MARK
    (0x95, 0x2022), // BULLET
    (0x96, 0x2013), // EN DASH
    (0x97, 0x2014), // EM DASH
    (0x98, 0x02DC), // SMALL TILDE
    (0x99, 0x2122), // TRADE MARK SIGN
    (0x9A, 0x0161), // LATIN SMALL LETTER S WITH CARON
    (0x9B, 0x203A), // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
    (0x9C, 0x0153), // LATIN SMALL LIGATURE OE
    (0x9E, 0x017E), // LATIN SMALL LETTER Z WITH CARON
    (0x9F, 0x0178), // LATIN CAPITAL LETTER Y WITH DIAERESIS
];

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric - Reconsume in the named character
            // reference state." The whole longest-match scan of § 13.2.5.73
            // runs here, over the current character plus lookahead.
            Some(c) if c.is_ascii_alphanumeric() => {
                if !self.try_named_character_reference(c) {
                    // "Otherwise ... Flush code points consumed as a
                    // character reference. Switch to the ambiguous ampersand
                    // state."
                    self.flush_code_points_consumed_as_character_reference();
                    self.reconsume_in(TokenizerState::AmbiguousAmpersand);
                }
            }
            // "U+0023 NUMBER SIGN (#) - Append the current input character to
            // the temporary buffer. Switch to the numeric character reference
            // state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else - Flush code points consumed as a character
            // reference. Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric - If the character reference was consumed
            // as part of an attribute, then append the current input
            // character to the current attribute's value. Otherwise, emit the
            // current input character as a character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.current_token_mut().append_to_current_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;) - This is an
            // unknown-named-character-reference parse error. Reconsume in the
            // return state."
            Some(';') => {
                self.log_parse_error(ErrorCode::UnknownNamedCharacterReference);
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
            // "Anything else - Reconsume in the return state."
            _ => {
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X, U+0058 LATIN CAPITAL LETTER X -
            // Append the current input character to the temporary buffer.
            // Switch to the hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else - Reconsume in the decimal character reference
            // start state."
            _ => {
                self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart);
            }
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            // "ASCII hex digit - Reconsume in the hexadecimal character
            // reference state."
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            // "Anything else - This is an
            // absence-of-digits-in-numeric-character-reference parse error.
            // Flush code points consumed as a character reference. Reconsume
            // in the return state."
            _ => {
                self.log_parse_error(ErrorCode::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            // "ASCII digit - Reconsume in the decimal character reference
            // state."
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            // "Anything else - This is an
            // absence-of-digits-in-numeric-character-reference parse error.
            // Flush code points consumed as a character reference. Reconsume
            // in the return state."
            _ => {
                self.log_parse_error(ErrorCode::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        match self.current_input_character {
            // "ASCII hex digit - Multiply the character reference code by 16.
            // Add a numeric version of the current input character to the
            // character reference code."
            Some(c) if c.is_ascii_hexdigit() => {
                let digit = c.to_digit(16).unwrap_or(0);
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(16)
                    .saturating_add(digit);
            }
            // "U+003B SEMICOLON - Switch to the numeric character reference
            // end state."
            Some(';') => {
                self.switch_to(TokenizerState::NumericCharacterReferenceEnd);
            }
            // "Anything else - This is a
            // missing-semicolon-after-character-reference parse error.
            // Reconsume in the numeric character reference end state."
            _ => {
                self.log_parse_error(ErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        match self.current_input_character {
            // "ASCII digit - Multiply the character reference code by 10. Add
            // a numeric version of the current input character to the
            // character reference code."
            Some(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(10)
                    .saturating_add(digit);
            }
            // "U+003B SEMICOLON - Switch to the numeric character reference
            // end state."
            Some(';') => {
                self.switch_to(TokenizerState::NumericCharacterReferenceEnd);
            }
            // "Anything else - This is a
            // missing-semicolon-after-character-reference parse error.
            // Reconsume in the numeric character reference end state."
            _ => {
                self.log_parse_error(ErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// This state acts without consuming. The state machine driver has
    /// already loaded the character that follows the reference, so the
    /// handler ignores it, resolves the code, and reconsumes that character
    /// in the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        // "Check the character reference code:"
        let mut code = self.character_reference_code;

        if code == 0 {
            // "If the number is 0x00, then this is a null-character-reference
            // parse error. Set the character reference code to 0xFFFD."
            self.log_parse_error(ErrorCode::NullCharacterReference);
            code = 0xFFFD;
        } else if code > 0x0010_FFFF {
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error. Set the
            // character reference code to 0xFFFD."
            self.log_parse_error(ErrorCode::CharacterReferenceOutsideUnicodeRange);
            code = 0xFFFD;
        } else if (0xD800..=0xDFFF).contains(&code) {
            // "If the number is a surrogate, then this is a
            // surrogate-character-reference parse error. Set the character
            // reference code to 0xFFFD."
            self.log_parse_error(ErrorCode::SurrogateCharacterReference);
            code = 0xFFFD;
        } else if is_noncharacter(code) {
            // "If the number is a noncharacter, then this is a
            // noncharacter-character-reference parse error." (The code is
            // used as-is.)
            self.log_parse_error(ErrorCode::NoncharacterCharacterReference);
        } else if code == 0x0D || (is_control(code) && !is_ascii_whitespace(code)) {
            // "If the number is 0x0D, or a control that's not ASCII
            // whitespace, then this is a control-character-reference parse
            // error."
            self.log_parse_error(ErrorCode::ControlCharacterReference);
            if let Some(&(_, replacement)) =
                C1_SUBSTITUTIONS.iter().find(|&&(from, _)| from == code)
            {
                code = replacement;
            }
        }

        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer.
        // Flush code points consumed as a character reference. Switch to the
        // return state."
        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(code).unwrap_or('\u{FFFD}'));
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the
    /// consumed characters are one of the identifiers in the first column of
    /// the named character references table."
    ///
    /// `first` is the already-consumed current input character; the rest of
    /// the candidate comes from lookahead. Returns false when no identifier
    /// matches, leaving the lookahead untouched.
    fn try_named_character_reference(&mut self, first: char) -> bool {
        let mut candidate = String::from(first);
        let mut best: Option<(usize, &'static str)> = None;
        let mut lookahead = 0;

        loop {
            if let Some(replacement) = lookup_entity(&candidate) {
                best = Some((candidate.len(), replacement));
            }
            if candidate.ends_with(';') || !any_entity_has_prefix(&candidate) {
                break;
            }
            match self.input.peek(lookahead) {
                Some(c) if c.is_ascii_alphanumeric() || c == ';' => {
                    candidate.push(c);
                    lookahead += 1;
                }
                _ => break,
            }
        }

        let Some((matched_len, replacement)) = best else {
            return false;
        };
        // Entity names are ASCII, so byte length equals character count.
        self.input.advance_by(matched_len - 1);
        let matched = &candidate[..matched_len];
        let ends_with_semicolon = matched.ends_with(';');

        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical
        // reasons, flush code points consumed as a character reference and
        // switch to the return state."
        if self.is_consumed_as_part_of_attribute()
            && !ends_with_semicolon
            && self
                .input
                .peek(0)
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            let matched = matched.to_string();
            self.temporary_buffer.push_str(&matched);
            self.flush_code_points_consumed_as_character_reference();
            let return_state = self.take_return_state();
            self.switch_to(return_state);
            return true;
        }

        // "Otherwise: If the last character matched is not a U+003B
        // SEMICOLON character (;), then this is a
        // missing-semicolon-after-character-reference parse error."
        if !ends_with_semicolon {
            self.log_parse_error(ErrorCode::MissingSemicolonAfterCharacterReference);
        }

        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name ... to
        // the temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(replacement);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
        true
    }

    /// "When a state says to flush code points consumed as a character
    /// reference, it means that for each code point in the temporary buffer
    /// ... the user agent must append the code point to the current
    /// attribute's value if the character reference was consumed as part of
    /// an attribute, or emit the code point as a character token otherwise."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = core::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            self.current_token_mut()
                .append_str_to_current_attribute_value(&buffer);
        } else {
            for c in buffer.chars() {
                self.emit_character_token_at(c, self.character_reference_offset);
            }
        }
    }

    /// "A character reference is said to be consumed as part of an attribute
    /// if the return state is either attribute value (double-quoted) state,
    /// attribute value (single-quoted) state or attribute value (unquoted)
    /// state."
    pub(super) fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// Take the return state for the final transition out of the character
    /// reference machinery.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }
}

/// [Infra: noncharacter](https://infra.spec.whatwg.org/#noncharacter)
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || matches!(code & 0xFFFF, 0xFFFE | 0xFFFF)
}

/// [Infra: control](https://infra.spec.whatwg.org/#control)
const fn is_control(code: u32) -> bool {
    matches!(code, 0x00..=0x1F | 0x7F..=0x9F)
}

/// [Infra: ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
const fn is_ascii_whitespace(code: u32) -> bool {
    matches!(code, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}
