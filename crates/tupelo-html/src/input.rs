//! Input byte stream decoding.
//!
//! [§ 13.2.3 The input byte stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)
//!
//! The tokenizer operates on Unicode scalar values, but callers hand us raw
//! bytes. This module decodes the bytes as UTF-8, replacing invalid sequences
//! with U+FFFD, and applies the newline normalization of § 13.2.3.5. Every
//! decoded character keeps the byte offset it came from in the original
//! input, so tokens and nodes can report positions into the caller's buffer.

/// A decoded input stream: Unicode scalar values paired with the byte offset
/// each one started at in the raw input.
///
/// Decoding never fails. Invalid UTF-8 sequences become U+FFFD REPLACEMENT
/// CHARACTER, one replacement per maximal invalid sequence.
pub struct InputStream {
    chars: Vec<char>,
    offsets: Vec<usize>,
    pos: usize,
    end_offset: usize,
}

impl InputStream {
    /// Decode raw bytes into a stream of (character, offset) pairs.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream):
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines. Thus, newlines in HTML DOMs are represented by
    /// U+000A LF characters, and there are never any U+000D CR characters in
    /// the input to the tokenization stage."
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        let mut chars = Vec::new();
        let mut offsets = Vec::new();

        let mut base = 0;
        while base < input.len() {
            match core::str::from_utf8(&input[base..]) {
                Ok(valid) => {
                    for (i, c) in valid.char_indices() {
                        chars.push(c);
                        offsets.push(base + i);
                    }
                    base = input.len();
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    // The prefix up to valid_up_to is guaranteed valid UTF-8.
                    if let Ok(valid) = core::str::from_utf8(&input[base..base + valid_up_to]) {
                        for (i, c) in valid.char_indices() {
                            chars.push(c);
                            offsets.push(base + i);
                        }
                    }
                    chars.push('\u{FFFD}');
                    offsets.push(base + valid_up_to);
                    match error.error_len() {
                        Some(len) => base += valid_up_to + len,
                        // A truncated sequence at the very end of the input.
                        None => base = input.len(),
                    }
                }
            }
        }

        // "Any CR characters that are followed by LF characters must be
        // removed, and any CR characters not followed by LF characters must
        // be converted to LF characters."
        let mut normalized_chars = Vec::with_capacity(chars.len());
        let mut normalized_offsets = Vec::with_capacity(offsets.len());
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '\r' {
                normalized_chars.push('\n');
                normalized_offsets.push(offsets[i]);
                if i + 1 < chars.len() && chars[i + 1] == '\n' {
                    i += 1;
                }
            } else {
                normalized_chars.push(chars[i]);
                normalized_offsets.push(offsets[i]);
            }
            i += 1;
        }

        Self {
            chars: normalized_chars,
            offsets: normalized_offsets,
            pos: 0,
            end_offset: input.len(),
        }
    }

    /// "Consume the next input character"
    ///
    /// Returns the next character and advances past it, or None at the end
    /// of the stream.
    pub fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Byte offset of the next character to be consumed, or the total input
    /// length once the stream is exhausted.
    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.offsets
            .get(self.pos)
            .copied()
            .unwrap_or(self.end_offset)
    }

    /// Peek at the character `lookahead` positions past the next unconsumed
    /// character, without consuming anything.
    #[must_use]
    pub fn peek(&self, lookahead: usize) -> Option<char> {
        self.chars.get(self.pos + lookahead).copied()
    }

    /// "If the next few characters are..."
    ///
    /// True if the unconsumed input starts with `target` exactly.
    #[must_use]
    pub fn looking_at(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// "An ASCII case-insensitive match for the word..."
    ///
    /// True if the unconsumed input starts with `target`, compared ASCII
    /// case-insensitively.
    #[must_use]
    pub fn looking_at_ignore_ascii_case(&self, target: &str) -> bool {
        target.chars().enumerate().all(|(i, expected)| {
            self.peek(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    /// Consume `count` characters. Used after a successful lookahead match.
    pub fn advance_by(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.chars.len());
    }

    /// Total byte length of the raw input. Used as the offset of the
    /// end-of-file token.
    #[must_use]
    pub const fn end_offset(&self) -> usize {
        self.end_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<(char, usize)> {
        let mut stream = InputStream::new(input);
        let mut out = Vec::new();
        loop {
            let offset = stream.current_offset();
            match stream.next() {
                Some(c) => out.push((c, offset)),
                None => return out,
            }
        }
    }

    #[test]
    fn test_ascii_offsets() {
        assert_eq!(collect(b"ab"), [('a', 0), ('b', 1)]);
    }

    #[test]
    fn test_multibyte_offsets() {
        // "é" is two bytes in UTF-8.
        assert_eq!(collect("aéb".as_bytes()), [('a', 0), ('é', 1), ('b', 3)]);
    }

    #[test]
    fn test_invalid_utf8_becomes_replacement_character() {
        assert_eq!(collect(b"a\xFFb"), [('a', 0), ('\u{FFFD}', 1), ('b', 2)]);
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        // 0xE2 0x82 is a truncated three-byte sequence.
        assert_eq!(collect(b"a\xE2\x82"), [('a', 0), ('\u{FFFD}', 1)]);
    }

    #[test]
    fn test_crlf_collapses_to_lf() {
        assert_eq!(collect(b"a\r\nb"), [('a', 0), ('\n', 1), ('b', 3)]);
    }

    #[test]
    fn test_lone_cr_becomes_lf() {
        assert_eq!(collect(b"a\rb"), [('a', 0), ('\n', 1), ('b', 2)]);
    }

    #[test]
    fn test_lookahead() {
        let stream = InputStream::new(b"<!DOCTYPE html>");
        assert!(stream.looking_at("<!"));
        assert!(stream.looking_at_ignore_ascii_case("<!doctype"));
        assert!(!stream.looking_at("<!--"));
    }
}
