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

//! Skipping start offsets that cannot begin a match.
//!
//! The search tries every start offset in turn. Looking at how each top-level alternative
//! begins lets it skip most of them without running the matcher:
//!
//! * an alternative that begins with `^` can only match at offset 0;
//! * an alternative that begins with plain literals can only match where the subject has them.
//!
//! The literal prefixes of all unanchored alternatives are searched for together with an
//! Aho-Corasick automaton. If any unanchored alternative has no literal prefix, nothing can be
//! skipped.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::analyze::{split_alternatives, Program};
use crate::Token;

#[derive(Debug, Clone)]
pub(crate) struct Prefilter {
    /// Literal prefixes of the alternatives that begin with `^`
    anchored: Vec<String>,
    /// Finds the leftmost literal prefix of the other alternatives
    prefixer: Option<AhoCorasick>,
}

impl Prefilter {
    /// Derive a prefilter from the pattern, or `None` if nothing can be skipped.
    pub(crate) fn new(prog: &Program) -> Option<Self> {
        let tokens = &prog.tokens;
        let whole = 0..tokens.len();
        let alternatives = split_alternatives(tokens, whole.clone()).unwrap_or_else(|| vec![whole]);

        let mut anchored = Vec::new();
        let mut prefixes = Vec::new();
        for alt in alternatives {
            let (is_anchored, prefix) = literal_prefix(&tokens[alt]);
            if is_anchored {
                anchored.push(prefix);
            } else if prefix.is_empty() {
                return None;
            } else {
                prefixes.push(prefix);
            }
        }

        let prefixer = if prefixes.is_empty() {
            None
        } else {
            // leftmost, so that no candidate start is ever jumped over
            let aho = AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostFirst)
                .build(&prefixes)
                .ok()?;
            Some(aho)
        };
        Some(Prefilter { anchored, prefixer })
    }

    /// The first start offset at or after `from` where a match could begin.
    ///
    /// `from` must lie on a code point boundary of `text`.
    pub(crate) fn next_candidate(&self, text: &str, from: usize) -> Option<usize> {
        if from == 0 && self.anchored.iter().any(|prefix| text.starts_with(prefix.as_str())) {
            return Some(0);
        }
        let prefixer = self.prefixer.as_ref()?;
        prefixer.find(&text[from..]).map(|m| from + m.start())
    }
}

// Whether the alternative starts with `^`, and the literals that must follow.
fn literal_prefix(tokens: &[Token]) -> (bool, String) {
    let anchored = tokens.first() == Some(&Token::StartAnchor);
    let mut prefix = String::new();
    for (ix, token) in tokens.iter().enumerate().skip(usize::from(anchored)) {
        match token {
            // a quantified literal is optional or variable, so it ends the prefix
            Token::Literal(c) if !tokens.get(ix + 1).map_or(false, Token::is_quantifier) => {
                prefix.push(*c);
            }
            _ => break,
        }
    }
    (anchored, prefix)
}
