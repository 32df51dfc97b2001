use backtrack_regex::{Regex, RegexBuilder, TraceEvent, Tracer};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Recorder(Mutex<Vec<String>>);

impl Tracer for Recorder {
    fn trace(&self, event: &TraceEvent<'_>) {
        self.0.lock().unwrap().push(event.to_string());
    }
}

fn traced(re: &str) -> (Regex, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let regex = RegexBuilder::new()
        .tracer(recorder.clone())
        .build(re)
        .unwrap();
    (regex, recorder)
}

#[test]
fn records_attempts_atoms_and_groups() {
    let (regex, recorder) = traced("(b)c");
    assert!(regex.is_match("abc"));
    let events = recorder.0.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "attempt from 0",
            "0\tenter group 1",
            "0\tb failed",
            "0\tgroup 1 failed",
            "attempt from 1",
            "1\tenter group 1",
            "1\tb matched",
            "1\tgroup 1 captured 1..2",
            "2\tc matched",
        ]
    );
}

#[test]
fn records_backtracking() {
    let (regex, recorder) = traced("^a+ab");
    assert!(regex.is_match("aaab"));
    let events = recorder.0.lock().unwrap().clone();
    assert!(events.contains(&"2\tbacktrack a".to_string()), "{:?}", events);
}

#[test]
fn records_backrefs() {
    let (regex, recorder) = traced(r"^(a)\1");
    assert!(!regex.is_match("ab"));
    let events = recorder.0.lock().unwrap().clone();
    assert!(events.contains(&"1\tbackref \\1 failed".to_string()), "{:?}", events);
}

#[test]
fn tracing_does_not_change_results() {
    let patterns = [r"(\w+) \1", "(cat|dog)s?", "^(a|b)+bd$", "x?y+", "[^abc]"];
    let texts = ["cat cat", "dogs", "aabbd", "xyy", "abc", ""];
    for pattern in &patterns {
        let plain = Regex::new(*pattern).unwrap();
        let (traced, _) = traced(pattern);
        for text in &texts {
            assert_eq!(plain.captures(text), traced.captures(text));
        }
    }
}

#[test]
fn trace_off_removes_tracer() {
    let recorder = Arc::new(Recorder::default());
    let regex = RegexBuilder::new()
        .tracer(recorder.clone())
        .trace(false)
        .build("a")
        .unwrap();
    assert!(regex.is_match("a"));
    assert!(recorder.0.lock().unwrap().is_empty());
}
