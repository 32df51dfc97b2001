// Copyright 2024 The Backtrack Regex Authors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! A tokenizer for regex patterns.
//!
//! The pattern is turned into one flat sequence of [`Token`]s in a single left-to-right scan.
//! Groups and alternation are not nested into a tree; they stay as `(`, `)` and `|` tokens and
//! the matcher works on contiguous index ranges of the sequence.

use bit_set::BitSet;
use std::convert::TryFrom;
use std::fmt;
use std::iter::FromIterator;

use crate::utf8util::char_at;
use crate::Error;
use crate::ParseError;
use crate::Result;

/// A set of characters, as used by `[...]` classes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CharSet(BitSet);

impl CharSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> CharSet {
        CharSet::default()
    }

    /// Add a character to the set.
    pub fn insert(&mut self, c: char) {
        self.0.insert(c as usize);
    }

    /// Check whether the set contains `c`.
    #[must_use]
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.0.contains(c as usize)
    }

    /// Iterate over the members in code point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0
            .iter()
            .filter_map(|cp| u32::try_from(cp).ok().and_then(char::from_u32))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no members. An empty class never matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = CharSet::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.iter() {
            if matches!(c, ']' | '\\' | '^') {
                write!(f, "\\")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// The unit produced by tokenizing a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A character that must appear verbatim
    Literal(char),
    /// `\d`, an ASCII decimal digit
    Digit,
    /// `\w`, a letter, digit or underscore
    WordChar,
    /// `[...]`
    CharClass(CharSet),
    /// `[^...]`
    NegatedCharClass(CharSet),
    /// `.`, any character
    AnyChar,
    /// `^`, the start of the subject
    StartAnchor,
    /// `$`, the end of the subject
    EndAnchor,
    /// `+` after an atom or group: one or more, greedy
    PlusQuantifier,
    /// `?` after an atom or group: zero or one, greedy
    QuestionQuantifier,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// `|`
    Alternation,
    /// `\1`, `\2`, ...: the text last captured by that group
    Backreference(usize),
}

impl Token {
    /// Whether a quantifier may follow this token.
    #[must_use]
    pub fn is_quantifiable(&self) -> bool {
        self.is_atom() || *self == Token::GroupClose
    }

    /// Whether this token tests exactly one subject character.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Token::Literal(_)
                | Token::Digit
                | Token::WordChar
                | Token::CharClass(_)
                | Token::NegatedCharClass(_)
                | Token::AnyChar
        )
    }

    /// Whether this token is `+` or `?`.
    #[must_use]
    pub fn is_quantifier(&self) -> bool {
        matches!(self, Token::PlusQuantifier | Token::QuestionQuantifier)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(c) => {
                if is_special(*c) {
                    write!(f, "\\")?;
                }
                write!(f, "{c}")
            }
            Token::Digit => f.write_str("\\d"),
            Token::WordChar => f.write_str("\\w"),
            Token::CharClass(set) => write!(f, "[{set}]"),
            Token::NegatedCharClass(set) => write!(f, "[^{set}]"),
            Token::AnyChar => f.write_str("."),
            Token::StartAnchor => f.write_str("^"),
            Token::EndAnchor => f.write_str("$"),
            Token::PlusQuantifier => f.write_str("+"),
            Token::QuestionQuantifier => f.write_str("?"),
            Token::GroupOpen => f.write_str("("),
            Token::GroupClose => f.write_str(")"),
            Token::Alternation => f.write_str("|"),
            Token::Backreference(group) => write!(f, "\\{group}"),
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        '\\' | '[' | '^' | '$' | '+' | '?' | '.' | '(' | ')' | '|'
    )
}

/// The tokens of a pattern, together with the byte offset in the pattern each one starts at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TokenStream {
    pub(crate) tokens: Vec<Token>,
    pub(crate) offsets: Vec<usize>,
}

/// Tokenize a pattern.
pub(crate) fn tokenize(re: &str) -> Result<TokenStream> {
    let mut tokenizer = Tokenizer {
        re,
        stream: TokenStream::default(),
    };
    let mut ix = 0;
    while let Some(c) = char_at(re, ix) {
        let (next, token) = tokenizer.parse_token(ix, c)?;
        tokenizer.stream.tokens.push(token);
        tokenizer.stream.offsets.push(ix);
        ix = next;
    }
    Ok(tokenizer.stream)
}

struct Tokenizer<'a> {
    re: &'a str,
    stream: TokenStream,
}

impl<'a> Tokenizer<'a> {
    // c is the character at ix
    fn parse_token(&self, ix: usize, c: char) -> Result<(usize, Token)> {
        let next = ix + c.len_utf8();
        let token = match c {
            '\\' => return self.parse_escape(ix),
            '[' => return self.parse_class(ix),
            '^' => Token::StartAnchor,
            '$' => Token::EndAnchor,
            '.' => Token::AnyChar,
            '(' => Token::GroupOpen,
            ')' => Token::GroupClose,
            '|' => Token::Alternation,
            '+' if self.after_quantifiable() => Token::PlusQuantifier,
            '?' if self.after_quantifiable() => Token::QuestionQuantifier,
            c => Token::Literal(c),
        };
        Ok((next, token))
    }

    // A quantifier with nothing to repeat is taken literally.
    fn after_quantifiable(&self) -> bool {
        self.stream
            .tokens
            .last()
            .map_or(false, Token::is_quantifiable)
    }

    // ix points at the backslash
    fn parse_escape(&self, ix: usize) -> Result<(usize, Token)> {
        let c = char_at(self.re, ix + 1)
            .ok_or(Error::ParseError(ix, ParseError::UnterminatedEscape))?;
        let next = ix + 1 + c.len_utf8();
        let token = match c {
            'd' => Token::Digit,
            'w' => Token::WordChar,
            '1'..='9' => return Ok(self.parse_backref(ix + 1)),
            c => Token::Literal(c),
        };
        Ok((next, token))
    }

    // ix points at the first digit, which is known to be 1-9
    fn parse_backref(&self, ix: usize) -> (usize, Token) {
        let bytes = self.re.as_bytes();
        let mut end = ix;
        let mut group: usize = 0;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            // an absurdly large group number saturates and can never match
            group = group
                .saturating_mul(10)
                .saturating_add(usize::from(bytes[end] - b'0'));
            end += 1;
        }
        (end, Token::Backreference(group))
    }

    // ix points at the opening bracket
    fn parse_class(&self, ix: usize) -> Result<(usize, Token)> {
        let mut pos = ix + 1;
        let negated = char_at(self.re, pos) == Some('^');
        if negated {
            pos += 1;
        }
        let mut set = CharSet::new();
        loop {
            let c = char_at(self.re, pos)
                .ok_or(Error::ParseError(ix, ParseError::UnterminatedCharClass))?;
            pos += c.len_utf8();
            match c {
                ']' => break,
                '\\' => {
                    let escaped = char_at(self.re, pos)
                        .ok_or(Error::ParseError(ix, ParseError::UnterminatedCharClass))?;
                    pos += escaped.len_utf8();
                    set.insert(escaped);
                }
                c => set.insert(c),
            }
        }
        let token = if negated {
            Token::NegatedCharClass(set)
        } else {
            Token::CharClass(set)
        };
        Ok((pos, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn tokens(re: &str) -> Vec<Token> {
        tokenize(re).unwrap().tokens
    }

    fn class(chars: &str) -> CharSet {
        chars.chars().collect()
    }

    #[test]
    fn empty() {
        assert_eq!(tokens(""), vec![]);
    }

    #[test]
    fn literals_and_meta() {
        assert_eq!(
            tokens("^a.b$"),
            vec![
                Token::StartAnchor,
                Token::Literal('a'),
                Token::AnyChar,
                Token::Literal('b'),
                Token::EndAnchor,
            ]
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(
            tokens(r"\d\w\.\\\q"),
            vec![
                Token::Digit,
                Token::WordChar,
                Token::Literal('.'),
                Token::Literal('\\'),
                Token::Literal('q'),
            ]
        );
    }

    #[test]
    fn backrefs_take_digit_run() {
        assert_eq!(
            tokens(r"\1\12x"),
            vec![
                Token::Backreference(1),
                Token::Backreference(12),
                Token::Literal('x'),
            ]
        );
        // zero does not start a backreference
        assert_eq!(tokens(r"\0"), vec![Token::Literal('0')]);
        assert_eq!(
            tokens(r"\99999999999999999999999999"),
            vec![Token::Backreference(usize::MAX)]
        );
    }

    #[test]
    fn trailing_backslash() {
        assert_matches!(
            tokenize(r"ab\"),
            Err(Error::ParseError(2, ParseError::UnterminatedEscape))
        );
    }

    #[test]
    fn classes() {
        assert_eq!(tokens("[abc]"), vec![Token::CharClass(class("abc"))]);
        assert_eq!(
            tokens("[^abc]"),
            vec![Token::NegatedCharClass(class("abc"))]
        );
        assert_eq!(tokens(r"[\]\\x]"), vec![Token::CharClass(class("]\\x"))]);
        assert_eq!(tokens("[a^]"), vec![Token::CharClass(class("a^"))]);
        assert_eq!(tokens("[]"), vec![Token::CharClass(CharSet::new())]);
        assert_eq!(tokens("[.+(]"), vec![Token::CharClass(class(".+("))]);
    }

    #[test]
    fn unterminated_class() {
        assert_matches!(
            tokenize("x[abc"),
            Err(Error::ParseError(1, ParseError::UnterminatedCharClass))
        );
        assert_matches!(
            tokenize(r"[ab\"),
            Err(Error::ParseError(0, ParseError::UnterminatedCharClass))
        );
    }

    #[test]
    fn quantifiers() {
        assert_eq!(
            tokens("a+(b)?"),
            vec![
                Token::Literal('a'),
                Token::PlusQuantifier,
                Token::GroupOpen,
                Token::Literal('b'),
                Token::GroupClose,
                Token::QuestionQuantifier,
            ]
        );
    }

    #[test]
    fn stray_quantifiers_are_literal() {
        assert_eq!(tokens("+"), vec![Token::Literal('+')]);
        assert_eq!(
            tokens("a+?"),
            vec![
                Token::Literal('a'),
                Token::PlusQuantifier,
                Token::Literal('?'),
            ]
        );
        assert_eq!(
            tokens("(?"),
            vec![Token::GroupOpen, Token::Literal('?')]
        );
        assert_eq!(
            tokens(r"(a)\1+"),
            vec![
                Token::GroupOpen,
                Token::Literal('a'),
                Token::GroupClose,
                Token::Backreference(1),
                Token::Literal('+'),
            ]
        );
    }

    #[test]
    fn offsets_are_byte_positions() {
        let stream = tokenize(r"é\d[ab]x").unwrap();
        assert_eq!(stream.offsets, vec![0, 2, 4, 8]);
    }

    #[test]
    fn multibyte_literals() {
        assert_eq!(
            tokens("日本+"),
            vec![
                Token::Literal('日'),
                Token::Literal('本'),
                Token::PlusQuantifier,
            ]
        );
    }

    #[test]
    fn display() {
        let rendered: String = tokens(r"^(\w+)[^a\]]\.\1|x?$")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, r"^(\w+)[^\]a]\.\1|x?$");
    }
}
