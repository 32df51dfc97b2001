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

//! Tracing of matcher decisions. Only for debugging/investigating.
//!
//! A [`Tracer`] installed with [`RegexBuilder::tracer`](crate::RegexBuilder::tracer) is called at
//! every decision point of the matcher. It only observes; it cannot change the outcome.

use std::fmt;

use crate::Token;

/// A decision made by the matcher.
///
/// All positions are byte offsets into the subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TraceEvent<'a> {
    /// A new match attempt from start offset `start`
    Attempt {
        /// Start offset of the attempt
        start: usize,
    },
    /// An atom was tested against the character at `ix`
    Atom {
        /// The atom
        token: &'a Token,
        /// Position of the tested character
        ix: usize,
        /// Whether it matched
        matched: bool,
    },
    /// A quantifier gave back input and retries the rest of the pattern from `ix`
    Backtrack {
        /// The quantified atom, or `)` for a quantified group
        token: &'a Token,
        /// Position the rest of the pattern is retried from
        ix: usize,
    },
    /// A group is entered at `ix`
    GroupEnter {
        /// Group number
        group: usize,
        /// Entry position
        ix: usize,
    },
    /// A group was left
    GroupExit {
        /// Group number
        group: usize,
        /// Entry position
        ix: usize,
        /// Exit position, or `None` if the group failed to match
        end: Option<usize>,
    },
    /// A backreference was tested at `ix`
    Backref {
        /// Referenced group number
        group: usize,
        /// Position of the test
        ix: usize,
        /// Whether it matched
        matched: bool,
    },
}

impl<'a> fmt::Display for TraceEvent<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TraceEvent::Attempt { start } => write!(f, "attempt from {start}"),
            TraceEvent::Atom { token, ix, matched } => {
                let verdict = if matched { "matched" } else { "failed" };
                write!(f, "{ix}\t{token} {verdict}")
            }
            TraceEvent::Backtrack { token, ix } => write!(f, "{ix}\tbacktrack {token}"),
            TraceEvent::GroupEnter { group, ix } => write!(f, "{ix}\tenter group {group}"),
            TraceEvent::GroupExit {
                group,
                ix,
                end: Some(end),
            } => write!(f, "{ix}\tgroup {group} captured {ix}..{end}"),
            TraceEvent::GroupExit {
                group,
                ix,
                end: None,
            } => write!(f, "{ix}\tgroup {group} failed"),
            TraceEvent::Backref { group, ix, matched } => {
                let verdict = if matched { "matched" } else { "failed" };
                write!(f, "{ix}\tbackref \\{group} {verdict}")
            }
        }
    }
}

/// Receives [`TraceEvent`]s from the matcher.
pub trait Tracer: fmt::Debug + Send + Sync {
    /// Called for every decision the matcher makes.
    fn trace(&self, event: &TraceEvent<'_>);
}

/// A [`Tracer`] that prints every event to standard error.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    #[cold]
    fn trace(&self, event: &TraceEvent<'_>) {
        eprintln!("{event}");
    }
}
