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

use std::fmt;

/// Result type for this crate with specific error enum.
pub type Result<T> = ::std::result::Result<T, Error>;

/// An error as the result of parsing or compiling a regex pattern.
///
/// Matching itself never fails; a subject that does not match is reported as `None` or `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An error as the result of tokenizing a regex pattern, with the byte position where the
    /// error occurred
    ParseError(usize, ParseError),
    /// An error as the result of numbering the groups of a tokenized pattern
    CompileError(CompileError),
}

/// An error for the result of tokenizing a regex pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The pattern ends with a bare backslash
    UnterminatedEscape,
    /// A character class was opened with `[` but never closed with `]`
    UnterminatedCharClass,
}

/// An error as the result of numbering capture groups.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// An opening `(` has no matching `)`, or a `)` has no opening `(`. Holds the byte position
    /// of the offending parenthesis.
    UnbalancedGroup(usize),
}

impl Error {
    /// The byte position in the pattern that the error refers to.
    #[must_use]
    pub fn position(&self) -> usize {
        match *self {
            Error::ParseError(pos, _) => pos,
            Error::CompileError(CompileError::UnbalancedGroup(pos)) => pos,
        }
    }
}

impl ::std::error::Error for Error {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedEscape => write!(f, "Backslash without following character"),
            ParseError::UnterminatedCharClass => write!(f, "Character class is not closed"),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnbalancedGroup(pos) => {
                write!(f, "Unbalanced parenthesis at position {pos}")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError(position, parse_error) => {
                write!(f, "Parsing error at position {position}: {parse_error}")
            }
            Error::CompileError(compile_error) => {
                write!(f, "Error compiling regex: {compile_error}")
            }
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Error {
        Error::CompileError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = Error::ParseError(3, ParseError::UnterminatedCharClass);
        assert_eq!(
            err.to_string(),
            "Parsing error at position 3: Character class is not closed"
        );
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn compile_error_converts() {
        let err: Error = CompileError::UnbalancedGroup(0).into();
        assert_eq!(err.position(), 0);
        assert_eq!(
            err.to_string(),
            "Error compiling regex: Unbalanced parenthesis at position 0"
        );
    }
}
