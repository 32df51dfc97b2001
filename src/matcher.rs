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

//! Backtracking matcher over a flat token sequence.
//!
//! The unit of matching is always a contiguous range of token indices (a "slice") of the
//! compiled pattern. There is no tree: a group is the slice between its `(` and the matching
//! `)`, and an alternative is the slice between two `|` at the same nesting depth.
//!
//! Matching a slice against the subject from a byte offset (IX) works like this:
//!
//! 1. If the slice contains `|` outside of parentheses, it is split into alternatives. Each
//!    alternative is tried in order from the same IX, and the first one that matches wins.
//!    Later alternatives are never tried once one has succeeded.
//! 2. Otherwise the tokens are walked left to right. Anchors test IX, atoms consume one
//!    character, and a backreference consumes the text last captured by its group.
//! 3. A `+` after an atom first consumes as many characters as it can, then retries the rest of
//!    the slice with one character less each time until the rest matches or nothing is left.
//!    `?` tries one character before zero.
//! 4. A group matches its own slice once (recursively, so a group is committed to its first
//!    successful match) and records what it matched. A `+` after a group repeats it as long as
//!    it keeps matching and making progress, then retries the rest of the slice from the most
//!    repetitions down to one.
//!
//! Captures are a value, not shared state. Every choice point hands its own copy to each branch,
//! so the capture writes of a branch that failed are never seen by the branch tried after it.
//!
//! Example for the pattern `(a)+b` and input `aab`:
//!
//! ```text
//! ( a ) + b
//! 0 1 2 3 4
//! ```
//!
//! 1. Token 0 opens group 1; its slice is `1..2`. It matches at IX 0, 1 and fails at 2, so the
//!    repetitions end at IX 1 (group 1 = `0..1`) and IX 2 (group 1 = `1..2`).
//! 2. The rest of the slice (`4..5`) is tried after the most repetitions: `b` matches at IX 2.
//! 3. The match is `0..3` and group 1 holds `a`, from the last repetition.

use std::ops::Range;

use crate::analyze::{split_alternatives, Group, Program};
use crate::trace::{TraceEvent, Tracer};
use crate::utf8util::char_at;
use crate::Token;

/// Capture positions of one match attempt.
///
/// Slots `2 * i` and `2 * i + 1` hold the start and end of group `i`, `usize::MAX` while the
/// group has not matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Saves(Vec<usize>);

impl Saves {
    /// Unset slots for `n_groups` groups, counting group 0.
    pub(crate) fn new(n_groups: usize) -> Saves {
        Saves(vec![usize::MAX; n_groups * 2])
    }

    pub(crate) fn get(&self, group: usize) -> Option<Range<usize>> {
        let slot = group.checked_mul(2)?;
        match self.0.get(slot..slot.checked_add(2)?) {
            Some(&[start, end]) if start != usize::MAX => Some(start..end),
            _ => None,
        }
    }

    fn set(&mut self, group: usize, span: Range<usize>) {
        self.0[group * 2] = span.start;
        self.0[group * 2 + 1] = span.end;
    }

    pub(crate) fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

/// Outcome of matching a slice: the IX after the match and the captures at that point.
type Outcome = Option<(usize, Saves)>;

/// Matches one compiled pattern against one subject.
pub(crate) struct Matcher<'a> {
    prog: &'a Program,
    text: &'a str,
    tracer: Option<&'a dyn Tracer>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(prog: &'a Program, text: &'a str, tracer: Option<&'a dyn Tracer>) -> Self {
        Matcher { prog, text, tracer }
    }

    /// Try to match the whole pattern starting exactly at byte offset `start`.
    ///
    /// On success, the returned captures include group 0, spanning the whole match.
    pub(crate) fn run(&self, start: usize) -> Option<Saves> {
        self.trace(TraceEvent::Attempt { start });
        let saves = Saves::new(self.prog.groups.count() + 1);
        let (end, mut saves) = self.attempt(0..self.prog.tokens.len(), start, saves)?;
        saves.set(0, start..end);
        Some(saves)
    }

    /// Match the slice `range` of the pattern at `ix`.
    pub(crate) fn attempt(&self, range: Range<usize>, ix: usize, saves: Saves) -> Outcome {
        match split_alternatives(&self.prog.tokens, range.clone()) {
            Some(alternatives) => alternatives
                .into_iter()
                .find_map(|alt| self.sequence(alt.start, alt.end, ix, saves.clone())),
            None => self.sequence(range.start, range.end, ix, saves),
        }
    }

    // Walk tokens pc..end, which contain no `|` outside of parentheses.
    fn sequence(&self, mut pc: usize, end: usize, mut ix: usize, mut saves: Saves) -> Outcome {
        let tokens: &'a [Token] = &self.prog.tokens;
        while pc < end {
            let token = &tokens[pc];
            match token {
                Token::StartAnchor => {
                    if ix != 0 {
                        return None;
                    }
                    pc += 1;
                }
                Token::EndAnchor => {
                    if ix != self.text.len() {
                        return None;
                    }
                    pc += 1;
                }
                Token::GroupOpen => {
                    let group = self.prog.groups.get(pc)?;
                    match self.quantifier(group.close + 1, end) {
                        Some(Token::PlusQuantifier) => {
                            return self.group_plus(pc, group, end, ix, saves)
                        }
                        Some(Token::QuestionQuantifier) => {
                            return self.group_question(pc, group, end, ix, saves)
                        }
                        _ => {
                            let (next, next_saves) = self.group_once(pc, group, ix, saves)?;
                            ix = next;
                            saves = next_saves;
                            pc = group.close + 1;
                        }
                    }
                }
                Token::Backreference(group) => {
                    ix = self.backref(*group, ix, &saves)?;
                    pc += 1;
                }
                Token::PlusQuantifier
                | Token::QuestionQuantifier
                | Token::GroupClose
                | Token::Alternation => {
                    // quantifiers go with the token before them, `)` with its group, and `|` was
                    // split on before we got here
                    unreachable!("unexpected {} at token {}", token, pc)
                }
                atom => match self.quantifier(pc + 1, end) {
                    Some(Token::PlusQuantifier) => {
                        return self.atom_plus(atom, pc + 2, end, ix, saves)
                    }
                    Some(Token::QuestionQuantifier) => {
                        return self.atom_question(atom, pc + 2, end, ix, saves)
                    }
                    _ => {
                        ix = self.atom(atom, ix)?;
                        pc += 1;
                    }
                },
            }
        }
        Some((ix, saves))
    }

    fn quantifier(&self, pc: usize, end: usize) -> Option<&'a Token> {
        if pc < end {
            self.prog.tokens.get(pc).filter(|token| token.is_quantifier())
        } else {
            None
        }
    }

    /// Test a single atom at `ix`, returning the IX after the consumed character.
    fn atom(&self, token: &'a Token, ix: usize) -> Option<usize> {
        let c = char_at(self.text, ix);
        let matched = c.map_or(false, |c| atom_matches(token, c));
        self.trace(TraceEvent::Atom { token, ix, matched });
        if matched {
            c.map(|c| ix + c.len_utf8())
        } else {
            None
        }
    }

    fn atom_plus(
        &self,
        token: &'a Token,
        rest: usize,
        end: usize,
        ix: usize,
        saves: Saves,
    ) -> Outcome {
        let mut ends = Vec::new();
        let mut cur = ix;
        while let Some(next) = self.atom(token, cur) {
            ends.push(next);
            cur = next;
        }
        let longest = ends.len();
        while let Some(candidate) = ends.pop() {
            if ends.len() + 1 < longest {
                self.trace(TraceEvent::Backtrack {
                    token,
                    ix: candidate,
                });
            }
            if let Some(outcome) = self.sequence(rest, end, candidate, saves.clone()) {
                return Some(outcome);
            }
        }
        None
    }

    fn atom_question(
        &self,
        token: &'a Token,
        rest: usize,
        end: usize,
        ix: usize,
        saves: Saves,
    ) -> Outcome {
        if let Some(next) = self.atom(token, ix) {
            if let Some(outcome) = self.sequence(rest, end, next, saves.clone()) {
                return Some(outcome);
            }
            self.trace(TraceEvent::Backtrack { token, ix });
        }
        self.sequence(rest, end, ix, saves)
    }

    /// Match the group opened at `pc` once and record the capture.
    fn group_once(&self, pc: usize, group: Group, ix: usize, saves: Saves) -> Outcome {
        self.trace(TraceEvent::GroupEnter { group: group.id, ix });
        let outcome = self.attempt(pc + 1..group.close, ix, saves);
        self.trace(TraceEvent::GroupExit {
            group: group.id,
            ix,
            end: outcome.as_ref().map(|(end, _)| *end),
        });
        let (end, mut saves) = outcome?;
        saves.set(group.id, ix..end);
        Some((end, saves))
    }

    fn group_plus(&self, pc: usize, group: Group, end: usize, ix: usize, saves: Saves) -> Outcome {
        let mut reps: Vec<(usize, Saves)> = Vec::new();
        let mut from = ix;
        let mut current = saves;
        while let Some((next, next_saves)) = self.group_once(pc, group, from, current) {
            // an empty repetition only counts as the first one, so it cannot loop
            if next == from && !reps.is_empty() {
                break;
            }
            reps.push((next, next_saves.clone()));
            if next == from {
                break;
            }
            from = next;
            current = next_saves;
        }

        let close = &self.prog.tokens[group.close];
        let rest = group.close + 2;
        let most = reps.len();
        while let Some((candidate, saves)) = reps.pop() {
            if reps.len() + 1 < most {
                self.trace(TraceEvent::Backtrack {
                    token: close,
                    ix: candidate,
                });
            }
            if let Some(outcome) = self.sequence(rest, end, candidate, saves) {
                return Some(outcome);
            }
        }
        None
    }

    fn group_question(
        &self,
        pc: usize,
        group: Group,
        end: usize,
        ix: usize,
        saves: Saves,
    ) -> Outcome {
        let rest = group.close + 2;
        if let Some((next, next_saves)) = self.group_once(pc, group, ix, saves.clone()) {
            if let Some(outcome) = self.sequence(rest, end, next, next_saves) {
                return Some(outcome);
            }
            self.trace(TraceEvent::Backtrack {
                token: &self.prog.tokens[group.close],
                ix,
            });
        }
        self.sequence(rest, end, ix, saves)
    }

    /// Match the text last captured by `group` at `ix`. Fails if the group has not matched.
    fn backref(&self, group: usize, ix: usize, saves: &Saves) -> Option<usize> {
        let end = saves
            .get(group)
            .map(|span| &self.text[span])
            .filter(|captured| self.text[ix..].starts_with(captured))
            .map(|captured| ix + captured.len());
        self.trace(TraceEvent::Backref {
            group,
            ix,
            matched: end.is_some(),
        });
        end
    }

    #[inline]
    fn trace(&self, event: TraceEvent<'_>) {
        if let Some(tracer) = self.tracer {
            tracer.trace(&event);
        }
    }
}

fn atom_matches(token: &Token, c: char) -> bool {
    match token {
        Token::Literal(lit) => *lit == c,
        Token::Digit => c.is_ascii_digit(),
        Token::WordChar => c.is_alphanumeric() || c == '_',
        Token::CharClass(set) => set.contains(c),
        Token::NegatedCharClass(set) => !set.contains(c),
        Token::AnyChar => true,
        _ => false,
    }
}
