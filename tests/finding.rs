use backtrack_regex::Regex;

mod common;

#[cfg_attr(feature = "track_caller", track_caller)]
fn find(re: &str, text: &str) -> Option<(usize, usize)> {
    let regex = common::regex(re);
    regex.find(text).map(|m| (m.start(), m.end()))
}

#[test]
fn find_leftmost() {
    assert_eq!(find("a", "bab"), Some((1, 2)));
    assert_eq!(find("b+", "abbbcbb"), Some((1, 4)));
    assert_eq!(find("x", "abc"), None);
}

#[test]
fn find_empty_at_end() {
    assert_eq!(find("$", "abc"), Some((3, 3)));
    assert_eq!(find("a?$", "bb"), Some((2, 2)));
}

#[test]
fn find_is_leftmost_not_longest() {
    assert_eq!(find("a|ab", "xab"), Some((1, 2)));
    assert_eq!(find("ab|a", "xab"), Some((1, 3)));
}

#[test]
fn find_iter_words() {
    let regex = common::regex(r"\w+");
    let words: Vec<&str> = regex
        .find_iter("the quick, brown fox")
        .map(|m| m.as_str())
        .collect();
    assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
}

#[test]
fn find_iter_empty_matches() {
    let regex = common::regex("a?");
    let spans: Vec<(usize, usize)> = regex
        .find_iter("baa")
        .map(|m| (m.start(), m.end()))
        .collect();
    assert_eq!(spans, vec![(0, 0), (1, 2), (2, 3)]);
}

#[test]
fn find_iter_empty_pattern_over_multibyte() {
    let regex = common::regex("");
    let starts: Vec<usize> = regex.find_iter("é€").map(|m| m.start()).collect();
    assert_eq!(starts, vec![0, 2, 5]);
}

#[test]
fn find_iter_anchored() {
    let regex = common::regex("^a");
    assert_eq!(regex.find_iter("aaa").count(), 1);
}

#[test]
fn captures_iter_backrefs() {
    let regex = common::regex(r"(\w)\1");
    let doubled: Vec<String> = regex
        .captures_iter("aabccdd")
        .map(|caps| caps[1].to_string())
        .collect();
    assert_eq!(doubled, vec!["a", "c", "d"]);
}

#[test]
fn iterator_accessors() {
    let regex = Regex::new("a").unwrap();
    let matches = regex.find_iter("banana");
    assert_eq!(matches.text(), "banana");
    assert_eq!(matches.regex().as_str(), "a");
    let captures = regex.captures_iter("banana");
    assert_eq!(captures.text(), "banana");
    assert_eq!(captures.count(), 3);
}

#[test]
fn find_iter_literal_alternatives() {
    let regex = common::regex("cat|dog|^the");
    let found: Vec<&str> = regex
        .find_iter("the dog chased the cat")
        .map(|m| m.as_str())
        .collect();
    assert_eq!(found, vec!["the", "dog", "cat"]);
}
