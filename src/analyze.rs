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

//! Analysis of tokenized patterns: group numbering and alternative splitting.

use std::ops::Range;

use crate::parse::TokenStream;
use crate::CompileError;
use crate::Result;
use crate::Token;

/// A capture group, keyed by the index of its opening token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Group {
    /// Group number, assigned left to right by position of the `(`, starting at 1
    pub(crate) id: usize,
    /// Index of the matching `)` token
    pub(crate) close: usize,
}

/// The group table of a pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Groups {
    by_open: Vec<Option<Group>>,
    count: usize,
}

impl Groups {
    /// The group opened by the token at `open`, if that token is a `(`.
    #[inline]
    pub(crate) fn get(&self, open: usize) -> Option<Group> {
        self.by_open.get(open).copied().flatten()
    }

    /// Number of capture groups, not counting group 0.
    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

/// A tokenized pattern with its group table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Program {
    pub(crate) tokens: Vec<Token>,
    pub(crate) groups: Groups,
}

/// Number the groups of a token stream and check that parentheses balance.
pub(crate) fn analyze(stream: TokenStream) -> Result<Program> {
    let groups = number_groups(&stream)?;
    Ok(Program {
        tokens: stream.tokens,
        groups,
    })
}

fn number_groups(stream: &TokenStream) -> Result<Groups> {
    let mut by_open = vec![None; stream.tokens.len()];
    let mut open = Vec::new();
    let mut next_id = 1;
    for (ix, token) in stream.tokens.iter().enumerate() {
        match token {
            Token::GroupOpen => {
                by_open[ix] = Some(Group {
                    id: next_id,
                    close: ix,
                });
                next_id += 1;
                open.push(ix);
            }
            Token::GroupClose => {
                let start = open
                    .pop()
                    .ok_or(CompileError::UnbalancedGroup(stream.offsets[ix]))?;
                if let Some(group) = &mut by_open[start] {
                    group.close = ix;
                }
            }
            _ => {}
        }
    }
    // whatever is left on the stack never got closed; report the leftmost
    if let Some(&ix) = open.first() {
        return Err(CompileError::UnbalancedGroup(stream.offsets[ix]).into());
    }
    Ok(Groups {
        by_open,
        count: next_id - 1,
    })
}

/// Split `tokens[range]` at every `|` outside of parentheses.
///
/// Returns `None` if there is no such `|`, so that the common case does not allocate.
pub(crate) fn split_alternatives(tokens: &[Token], range: Range<usize>) -> Option<Vec<Range<usize>>> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = range.start;
    for ix in range.clone() {
        match tokens[ix] {
            Token::GroupOpen => depth += 1,
            Token::GroupClose => depth = depth.saturating_sub(1),
            Token::Alternation if depth == 0 => {
                alternatives.push(start..ix);
                start = ix + 1;
            }
            _ => {}
        }
    }
    if alternatives.is_empty() {
        return None;
    }
    alternatives.push(start..range.end);
    Some(alternatives)
}
