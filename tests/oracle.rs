//! Property tests. Patterns without groups or alternation have no committed sub-matches, so on
//! them this engine and the `regex` crate must agree on every match.

use backtrack_regex::Regex;
use quickcheck::{quickcheck, Arbitrary, Gen};

#[derive(Clone, Debug)]
struct FlatPattern(String);

impl Arbitrary for FlatPattern {
    fn arbitrary(g: &mut Gen) -> Self {
        const ATOMS: &[&str] = &["a", "b", "1", " ", ".", r"\d", r"\w", "[ab]", "[^a]", r"\."];
        const QUANTIFIERS: &[&str] = &["", "", "+", "?"];
        let mut re = String::new();
        if bool::arbitrary(g) {
            re.push('^');
        }
        for _ in 0..usize::arbitrary(g) % 6 {
            re.push_str(g.choose(ATOMS).unwrap());
            re.push_str(g.choose(QUANTIFIERS).unwrap());
        }
        if bool::arbitrary(g) {
            re.push('$');
        }
        FlatPattern(re)
    }
}

#[derive(Clone, Debug)]
struct Subject(String);

impl Arbitrary for Subject {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 10;
        Subject(
            (0..len)
                .map(|_| *g.choose(&['a', 'b', '1', ' ', '.']).unwrap())
                .collect(),
        )
    }
}

fn escape(literal: &str) -> String {
    let mut re = String::new();
    for c in literal.chars() {
        if "\\[^$+?.()|".contains(c) {
            re.push('\\');
        }
        re.push(c);
    }
    re
}

quickcheck! {
    fn agrees_with_regex_crate(pattern: FlatPattern, subject: Subject) -> bool {
        let ours = Regex::new(pattern.0.as_str()).unwrap();
        let theirs = regex::Regex::new(&pattern.0).unwrap();
        ours.find(&subject.0).map(|m| m.range()) == theirs.find(&subject.0).map(|m| m.range())
    }

    fn literal_matches_iff_substring(needle: String, prefix: String, suffix: String, embed: bool) -> bool {
        let subject = if embed {
            format!("{prefix}{needle}{suffix}")
        } else {
            format!("{prefix}{suffix}")
        };
        let re = Regex::new(escape(&needle)).unwrap();
        re.is_match(&subject) == subject.contains(needle.as_str())
    }

    fn compile_is_deterministic(pattern: String) -> bool {
        match (Regex::new(pattern.as_str()), Regex::new(pattern.as_str())) {
            (Ok(a), Ok(b)) => a.tokens() == b.tokens() && a.captures_len() == b.captures_len(),
            (Err(a), Err(b)) => a == b,
            _ => false,
        }
    }
}
