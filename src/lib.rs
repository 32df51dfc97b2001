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

/*!
A small backtracking regex engine with capture groups, alternation and backreferences.

A pattern is compiled into one flat sequence of tokens. Groups and alternatives are matched as
contiguous index ranges of that sequence, and captures are threaded by value through every
choice point, so a branch that fails never leaks its captures into the branch tried next.

Matching is leftmost-first and greedy, like most backtracking engines. Nothing bounds the amount
of backtracking: a pattern such as `((a+)+)+b` against a long run of `a`s can take exponential
time.

# Usage

Compile a pattern with [`Regex::new`], then search text with it.

## Example: Matching text

An example with backreferences to check if a text consists of two identical words:

```rust
use backtrack_regex::Regex;

let re = Regex::new(r"^(\w+) \1$").unwrap();
assert!(re.is_match("foo foo"));
assert!(!re.is_match("foo bar"));
```

Like in most regex engines, the pattern needs anchors like `^` and `$` to match against the
entire input text.

## Example: Finding the position of matches

```rust
use backtrack_regex::Regex;

let re = Regex::new(r"(\d)\1").unwrap();
let m = re.find("foo 22").expect("found a match");

assert_eq!(m.start(), 4);
assert_eq!(m.end(), 6);
assert_eq!(m.as_str(), "22");
```

## Example: Capturing groups

```rust
use backtrack_regex::Regex;

let re = Regex::new(r"(cat|dog) (\w+)").unwrap();
let captures = re.captures("I have a dog named Rex").expect("No match found");
assert_eq!(&captures[1], "dog");
assert_eq!(&captures[2], "named");
```

# Syntax

`x`
: the character `x`, if it has no special meaning below \
`\x`
: the character `x`, even if it is special (`\.`, `\(`, `\\`, ...) \
`.`
: any character \
`\d`
: ASCII digit (`[0-9]`) \
`\w`
: word character: a letter, a digit or `_` \
`[abc]`
: any of `a`, `b` or `c`; inside brackets `\x` is always the character `x` \
`[^abc]`
: any character except `a`, `b` and `c` \
`^`
: the start of the text \
`$`
: the end of the text \
`x+`
: one or more `x`, as many as possible \
`x?`
: zero or one `x`, one if possible \
`(exp)`
: match *exp* and capture it as the next group; groups are numbered by their `(` from the
left, starting at 1 \
`a|b`
: match `a`, or `b` if `a` fails \
`\1`
: match the exact string that the first capture group last matched \
`\2`
: backref to the second capture group, etc

`+` and `?` apply to the character, class or group right before them. Anywhere else, they stand
for themselves.

A group matches its contents once and is then fixed: when the rest of the pattern fails, the
engine does not go back into the group to look for a different match of it. So `(a|ab)c` does not
match `"abc"`, while `(ab|a)c` does. A `+` after a group can still give back whole repetitions.
*/

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::redundant_else)]
#![allow(clippy::similar_names)]

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, Range};
use std::slice::ChunksExact;
use std::str::FromStr;
use std::sync::Arc;

mod analyze;
mod error;
mod matcher;
mod parse;
mod prefilter;
mod trace;
mod utf8util;

use crate::analyze::{analyze, Program};
use crate::matcher::{Matcher, Saves};
use crate::parse::tokenize;
use crate::prefilter::Prefilter;
use crate::utf8util::{boundaries, next_codepoint_ix};

pub use crate::error::{CompileError, Error, ParseError, Result};
pub use crate::parse::{CharSet, Token};
pub use crate::trace::{StderrTracer, TraceEvent, Tracer};

// the public API

/// A compiled regular expression.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: Arc<String>,
    prog: Arc<Program>,
    prefilter: Option<Prefilter>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl Regex {
    /// Parse and compile a regex with default options, see [`RegexBuilder`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the pattern could not be parsed or its groups do not balance.
    #[inline]
    pub fn new(re: impl Into<String>) -> Result<Regex> {
        RegexBuilder::new().build(re)
    }

    fn new_with_options(pattern: String, options: RegexOptions) -> Result<Regex> {
        let prog = analyze(tokenize(&pattern)?)?;
        let prefilter = if options.prefilter {
            Prefilter::new(&prog)
        } else {
            None
        };

        Ok(Regex {
            pattern: Arc::new(pattern),
            prog: Arc::new(prog),
            prefilter,
            tracer: options.tracer,
        })
    }

    /// Returns the original pattern string used to create this regex.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the token sequence this regex was compiled into.
    ///
    /// Compiling is deterministic: the same pattern always yields an equal sequence.
    #[must_use]
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.prog.tokens
    }

    /// Returns the number of capture groups, counting group 0 (the whole match).
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// assert_eq!(Regex::new("a(b)(c(d))").unwrap().captures_len(), 4);
    /// ```
    #[must_use]
    #[inline]
    pub fn captures_len(&self) -> usize {
        self.prog.groups.count() + 1
    }

    /// Check if the regex matches the input text.
    ///
    /// # Example
    ///
    /// Test if some text contains the same word twice:
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"(\w+) \1").unwrap();
    /// assert!(re.is_match("mirror mirror on the wall"));
    /// ```
    #[must_use]
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.search(text, 0).is_some()
    }

    /// Find the first match in the input text.
    ///
    /// If you have capturing groups in your regex that you want to extract, use the
    /// [`Regex::captures()`] method.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"\d+").unwrap();
    /// assert_eq!(re.find("a123b").unwrap().as_str(), "123");
    /// ```
    #[must_use]
    #[inline]
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_from_pos(text, 0)
    }

    /// Returns the first match in `text` that starts at or after byte position `pos`.
    ///
    /// This is not the same as searching `&text[pos..]`: `^` still only matches at the start of
    /// `text`.
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"^\d").unwrap();
    /// assert!(re.find_from_pos("1 2", 2).is_none());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not on a character boundary of `text`.
    #[must_use]
    pub fn find_from_pos<'t>(&self, text: &'t str, pos: usize) -> Option<Match<'t>> {
        let saves = self.search(text, pos)?;
        let span = saves.get(0)?;
        Some(Match {
            text,
            start: span.start,
            end: span.end,
        })
    }

    /// Returns an iterator for each successive non-overlapping match in `text`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"\w+").unwrap();
    /// let words: Vec<&str> = re.find_iter("so simple, even with iterators").map(|m| m.as_str()).collect();
    /// assert_eq!(words, ["so", "simple", "even", "with", "iterators"]);
    /// ```
    #[must_use]
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            re: self,
            text,
            last_end: 0,
            last_match: None,
        }
    }

    /// Returns the capture groups for the first match in `text`.
    ///
    /// If no match is found, then `None` is returned. Group 0 is the whole match; a group that
    /// took no part in the match is `None` in the result.
    ///
    /// # Examples
    ///
    /// Finding matches and capturing parts of the match:
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"(\d+)-(\d+)(x)?").unwrap();
    /// let captures = re.captures("between 2018-04 and").unwrap();
    ///
    /// assert_eq!(captures.get(0).unwrap().as_str(), "2018-04");
    /// assert_eq!(captures.get(1).unwrap().as_str(), "2018");
    /// assert_eq!(captures.get(2).unwrap().as_str(), "04");
    /// assert!(captures.get(3).is_none());
    /// ```
    #[must_use]
    #[inline]
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.captures_from_pos(text, 0)
    }

    /// Returns the capture groups for the first match in `text` that starts at or after byte
    /// position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not on a character boundary of `text`.
    #[must_use]
    pub fn captures_from_pos<'t>(&self, text: &'t str, pos: usize) -> Option<Captures<'t>> {
        let saves = self.search(text, pos)?;
        Some(Captures {
            text,
            saves: saves.into_vec(),
        })
    }

    /// Returns an iterator over all the non-overlapping capture groups matched in `text`.
    ///
    /// ```rust
    /// # use backtrack_regex::Regex;
    /// let re = Regex::new(r"(\w)(\d)").unwrap();
    /// let pairs: Vec<String> = re
    ///     .captures_iter("a1 b2 c3")
    ///     .map(|caps| format!("{}={}", &caps[1], &caps[2]))
    ///     .collect();
    /// assert_eq!(pairs, ["a=1", "b=2", "c=3"]);
    /// ```
    #[must_use]
    #[inline]
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches(self.find_iter(text))
    }

    // Try every start offset from `pos` on, in order, and return the first match.
    fn search(&self, text: &str, pos: usize) -> Option<Saves> {
        assert!(
            text.is_char_boundary(pos),
            "position {} is not a character boundary",
            pos
        );
        let matcher = Matcher::new(&self.prog, text, self.tracer.as_deref());
        match &self.prefilter {
            None => boundaries(text)
                .skip_while(|&start| start < pos)
                .find_map(|start| matcher.run(start)),
            Some(prefilter) => {
                let mut start = pos;
                loop {
                    start = prefilter.next_candidate(text, start)?;
                    if let Some(saves) = matcher.run(start) {
                        return Some(saves);
                    }
                    if start == text.len() {
                        return None;
                    }
                    start = next_codepoint_ix(text, start);
                }
            }
        }
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    fn from_str(s: &str) -> Result<Regex> {
        Regex::new(s)
    }
}

impl fmt::Display for Regex {
    /// Shows the original regular expression
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
struct RegexOptions {
    prefilter: bool,
    tracer: Option<Arc<dyn Tracer>>,
}

impl Default for RegexOptions {
    fn default() -> Self {
        RegexOptions {
            prefilter: true,
            tracer: None,
        }
    }
}

/// A builder for a `Regex` to allow configuring options.
#[derive(Debug, Clone, Default)]
pub struct RegexBuilder(RegexOptions);

impl RegexBuilder {
    /// Create a new regex builder with default options.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [`Regex`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the pattern could not be parsed or its groups do not balance.
    #[inline]
    pub fn build(&self, pattern: impl Into<String>) -> Result<Regex> {
        Regex::new_with_options(pattern.into(), self.0.clone())
    }

    /// Print every decision of the matcher to standard error. Only for debugging.
    ///
    /// Turning this off also removes a tracer set with [`RegexBuilder::tracer`].
    #[inline]
    pub fn trace(&mut self, enable: bool) -> &mut Self {
        self.0.tracer = if enable {
            Some(Arc::new(StderrTracer))
        } else {
            None
        };
        self
    }

    /// Send every decision of the matcher to `tracer`. The tracer cannot change the outcome of
    /// a match.
    #[inline]
    pub fn tracer(&mut self, tracer: Arc<dyn Tracer>) -> &mut Self {
        self.0.tracer = Some(tracer);
        self
    }

    /// Skip start offsets that cannot begin a match, based on a leading `^` or leading literal
    /// characters of the pattern. This never changes the result.
    ///
    /// Default is `true`.
    #[inline]
    pub fn prefilter(&mut self, enable: bool) -> &mut Self {
        self.0.prefilter = enable;
        self
    }
}

/// A single match of a regex or group in an input text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Returns the starting byte offset of the match in the text.
    #[must_use]
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the ending byte offset of the match in the text.
    #[must_use]
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the range over the starting and ending byte offsets of the match in text.
    #[must_use]
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the matched text.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    /// Returns the length, in bytes, of this match.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.range().len()
    }

    /// Returns true if and only if this match has a length of zero.
    ///
    /// Note that an empty match can only occur when the regex itself can match the empty string.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range().is_empty()
    }
}

impl<'t> AsRef<str> for Match<'t> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<'t> From<Match<'t>> for Range<usize> {
    fn from(m: Match<'t>) -> Range<usize> {
        m.range()
    }
}

/// An iterator over all non-overlapping matches for a particular string.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the
/// lifetime of the matched string.
#[derive(Debug, Clone)]
pub struct Matches<'r, 't> {
    re: &'r Regex,
    text: &'t str,
    last_end: usize,
    last_match: Option<usize>,
}

impl<'r, 't> Matches<'r, 't> {
    /// Return the text being searched.
    #[must_use]
    #[inline]
    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Return the underlying regex.
    #[must_use]
    #[inline]
    pub fn regex(&self) -> &'r Regex {
        self.re
    }

    // Advance past `span`, returning false if it is an empty match right after the previous
    // match and should be skipped.
    fn advance(&mut self, span: &Range<usize>) -> bool {
        if span.is_empty() {
            // To ensure we make progress, start the next search at the smallest possible
            // starting position of the next match following this one.
            self.last_end = if span.end < self.text.len() {
                next_codepoint_ix(self.text, span.end)
            } else {
                self.text.len() + 1
            };
            // Don't accept empty matches immediately following a match.
            if Some(span.end) == self.last_match {
                return false;
            }
        } else {
            self.last_end = span.end;
        }
        self.last_match = Some(span.end);
        true
    }
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Match<'t>;

    /// Adapted from the `regex` crate. Calls `find_from_pos` repeatedly.
    /// Ignores empty matches immediately after a match.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.last_end > self.text.len() {
                return None;
            }
            let mat = self.re.find_from_pos(self.text, self.last_end)?;
            if self.advance(&mat.range()) {
                return Some(mat);
            }
        }
    }
}

impl<'r, 't> FusedIterator for Matches<'r, 't> {}

/// An iterator that yields all non-overlapping capture groups matching a
/// particular regular expression.
///
/// `'r` is the lifetime of the compiled regular expression and `'t` is the
/// lifetime of the matched string.
#[derive(Debug, Clone)]
pub struct CaptureMatches<'r, 't>(Matches<'r, 't>);

impl<'r, 't> CaptureMatches<'r, 't> {
    /// Return the text being searched.
    #[must_use]
    #[inline]
    pub fn text(&self) -> &'t str {
        self.0.text
    }

    /// Return the underlying regex.
    #[must_use]
    #[inline]
    pub fn regex(&self) -> &'r Regex {
        self.0.re
    }
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'t>;

    /// Adapted from the `regex` crate. Calls `captures_from_pos` repeatedly.
    /// Ignores empty matches immediately after a match.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.0.last_end > self.0.text.len() {
                return None;
            }
            let captures = self.0.re.captures_from_pos(self.0.text, self.0.last_end)?;
            let span = captures.get(0)?.range();
            if self.0.advance(&span) {
                return Some(captures);
            }
        }
    }
}

impl<'r, 't> FusedIterator for CaptureMatches<'r, 't> {}

/// A set of capture groups found for a regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'t> {
    text: &'t str,
    saves: Vec<usize>,
}

#[allow(clippy::len_without_is_empty)] // follow regex's API
impl<'t> Captures<'t> {
    /// Get the capture group by its index in the regex.
    ///
    /// If there is no match for that group or the index does not correspond to a group, `None` is
    /// returned. The index 0 returns the whole match.
    #[must_use]
    #[inline]
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let slot = i.checked_mul(2)?;
        match self.saves.get(slot..slot.checked_add(2)?) {
            Some(&[start, end]) => SubCaptureMatches::span(self.text, start, end),
            _ => None,
        }
    }

    /// Iterate over the captured groups in order in which they appeared in the regex. The first
    /// capture corresponds to the whole match.
    #[must_use]
    #[inline]
    pub fn iter<'c>(&'c self) -> SubCaptureMatches<'c, 't> {
        SubCaptureMatches(self.saves.chunks_exact(2), self.text)
    }

    /// How many groups were captured. This is always at least 1 because group 0 returns the whole
    /// match.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.saves.len() / 2
    }
}

impl<'t, 'c> IntoIterator for &'c Captures<'t> {
    type IntoIter = SubCaptureMatches<'c, 't>;
    type Item = std::option::Option<Match<'t>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Get a group by index.
///
/// `'t` is the lifetime of the matched text.
///
/// The text can't outlive the `Captures` object if this method is
/// used, because of how `Index` is defined (normally `a[i]` is part
/// of `a` and can't outlive it); to do that, use `get()` instead.
///
/// # Panics
///
/// If there is no group at the given index.
impl<'t> Index<usize> for Captures<'t> {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        self.get(i)
            .map_or_else(|| panic!("no group at index '{}'", i), |m| m.as_str())
    }
}

/// Iterator for captured groups in order in which they appear in the regex.
#[derive(Debug)]
pub struct SubCaptureMatches<'c, 't>(ChunksExact<'c, usize>, &'t str);

impl<'c, 't> SubCaptureMatches<'c, 't> {
    fn span(text: &'t str, start: usize, end: usize) -> Option<Match<'t>> {
        if start == usize::MAX {
            None
        } else {
            Some(Match { text, start, end })
        }
    }

    fn get(&self, span: &[usize]) -> Option<Match<'t>> {
        Self::span(self.1, span[0], span[1])
    }
}

impl<'c, 't> Iterator for SubCaptureMatches<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Option<Match<'t>>> {
        let span = self.0.next()?;
        Some(self.get(span))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }

    fn count(self) -> usize {
        self.0.count()
    }
}

impl<'c, 't> DoubleEndedIterator for SubCaptureMatches<'c, 't> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let span = self.0.next_back()?;
        Some(self.get(span))
    }
}

impl<'c, 't> ExactSizeIterator for SubCaptureMatches<'c, 't> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'c, 't> FusedIterator for SubCaptureMatches<'c, 't> {}
