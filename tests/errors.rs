use backtrack_regex::{CompileError, Error, ParseError, Regex};
use matches::assert_matches;

#[test]
fn trailing_backslash() {
    assert_matches!(
        Regex::new(r"abc\"),
        Err(Error::ParseError(3, ParseError::UnterminatedEscape))
    );
    assert_matches!(
        Regex::new(r"\"),
        Err(Error::ParseError(0, ParseError::UnterminatedEscape))
    );
}

#[test]
fn unclosed_class() {
    assert_matches!(
        Regex::new("[abc"),
        Err(Error::ParseError(0, ParseError::UnterminatedCharClass))
    );
    assert_matches!(
        Regex::new("a[^"),
        Err(Error::ParseError(1, ParseError::UnterminatedCharClass))
    );
    assert_matches!(
        Regex::new(r"[\]"),
        Err(Error::ParseError(0, ParseError::UnterminatedCharClass))
    );
}

#[test]
fn unbalanced_groups() {
    assert_matches!(
        Regex::new("(abc"),
        Err(Error::CompileError(CompileError::UnbalancedGroup(0)))
    );
    assert_matches!(
        Regex::new("abc)"),
        Err(Error::CompileError(CompileError::UnbalancedGroup(3)))
    );
    assert_matches!(
        Regex::new("(a))("),
        Err(Error::CompileError(CompileError::UnbalancedGroup(3)))
    );
}

#[test]
fn escaped_and_classed_parens_are_balanced() {
    assert!(Regex::new(r"\(").is_ok());
    assert!(Regex::new("[(]").is_ok());
    assert!(Regex::new(r"(\))").is_ok());
}

#[test]
fn tokenizer_errors_come_first() {
    // the tokenizer runs before the group numberer
    assert_matches!(
        Regex::new(r"(a\"),
        Err(Error::ParseError(2, ParseError::UnterminatedEscape))
    );
}

#[test]
fn error_messages() {
    let err = Regex::new("(x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error compiling regex: Unbalanced parenthesis at position 0"
    );
    let err = Regex::new("x[").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parsing error at position 1: Character class is not closed"
    );
    assert_eq!(err.position(), 1);
}

#[test]
fn errors_are_std_errors() {
    fn boxed(re: &str) -> Result<Regex, Box<dyn std::error::Error>> {
        Ok(Regex::new(re)?)
    }
    assert!(boxed("ok").is_ok());
    assert!(boxed("(").is_err());
}
