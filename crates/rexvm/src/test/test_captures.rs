// Tests for groups, back-references and balancing groups
use crate::*;

fn capture_values(text: &str, spans: &[Span]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    spans
        .iter()
        .map(|s| chars[s.index..s.end()].iter().collect())
        .collect()
}

#[test]
fn test_backreference() {
    let re = Regex::new("(\\w)\\1").unwrap();
    assert!(re.is_match("aa").unwrap());
    assert!(!re.is_match("ab").unwrap());
    assert_eq!(re.find("abccd").unwrap().unwrap().value(), "cc");
}

#[test]
fn test_backreference_ignore_case() {
    let re = Regex::with_options("(a)\\1", RegexOptions::IGNORE_CASE).unwrap();
    assert!(re.is_match("aA").unwrap());
    assert!(!Regex::new("(a)\\1").unwrap().is_match("aA").unwrap());
}

#[test]
fn test_unmatched_backreference_fails() {
    // a reference to a group that has not captured fails
    let re = Regex::new("(a)?\\1b").unwrap();
    assert!(!re.is_match("b").unwrap());
    assert!(re.is_match("aab").unwrap());
}

#[test]
fn test_named_groups() {
    let re = Regex::new("(?<first>\\w+)\\s(?<last>\\w+)").unwrap();
    let m = re.find("Ryan Byington").unwrap().unwrap();
    assert_eq!(m.group_by_name("first").unwrap().value, "Ryan");
    assert_eq!(m.group_by_name("last").unwrap().value, "Byington");
    assert_eq!(re.group_number_from_name("first"), Some(1));
    assert_eq!(re.group_number_from_name("last"), Some(2));
    assert!(m.group_by_name("middle").is_none());

    let last = m.group(2).unwrap();
    assert_eq!(last.name, "last");
    assert_eq!((last.index, last.length), (5, 8));
}

#[test]
fn test_quoted_group_names() {
    let re = Regex::new("(?'word'\\w+)-\\k'word'").unwrap();
    let m = re.find("x ab-ab").unwrap().unwrap();
    assert_eq!(m.value(), "ab-ab");
    assert_eq!(m.group_by_name("word").unwrap().value, "ab");
}

#[test]
fn test_unmatched_group() {
    let re = Regex::new("(a)|(b)").unwrap();
    let m = re.find("b").unwrap().unwrap();
    let first = m.group(1).unwrap();
    assert!(!first.success);
    assert_eq!(first.value, "");
    assert!(first.captures.is_empty());
    assert!(m.group(2).unwrap().success);
    assert!(m.group(3).is_none());
}

#[test]
fn test_repeated_group_keeps_every_capture() {
    let re = Regex::new("(?:(\\d)-)+").unwrap();
    let text = "1-2-3-";
    let m = re.find(text).unwrap().unwrap();
    assert_eq!(capture_values(text, m.captures(1)), vec!["1", "2", "3"]);
    assert_eq!(m.group(1).unwrap().value, "3");
    assert_eq!(m.captures(0).len(), 1);
}

#[test]
fn test_backtracking_undoes_captures() {
    let re = Regex::new("(a)+ab").unwrap();
    let text = "aaab";
    let m = re.find(text).unwrap().unwrap();
    assert_eq!(m.value(), "aaab");
    assert_eq!(capture_values(text, m.captures(1)), vec!["a", "a"]);
}

#[test]
fn test_groups_in_slot_order() {
    let re = Regex::new("(?<y>b)(a)").unwrap();
    let m = re.find("ba").unwrap().unwrap();
    let groups: Vec<(i32, String, String)> = m
        .groups()
        .into_iter()
        .map(|g| (g.number, g.name.to_string(), g.value))
        .collect();
    assert_eq!(
        groups,
        vec![
            (0, "0".to_string(), "ba".to_string()),
            (1, "1".to_string(), "a".to_string()),
            (2, "y".to_string(), "b".to_string()),
        ]
    );
}

#[test]
fn test_balancing_groups() {
    let re = Regex::new(
        "^[^<>]*(((?'Open'<)[^<>]*)+((?'Close-Open'>)[^<>]*)+)*(?(Open)(?!))$",
    )
    .unwrap();
    let text = "<abc><mno<xyz>>";
    let m = re.find(text).unwrap().unwrap();
    assert_eq!(m.value(), text);
    let close = m.group_by_name("Close").unwrap();
    assert_eq!(
        capture_values(text, &close.captures),
        vec!["abc", "xyz", "mno<xyz>"]
    );
    // every Open was balanced away
    assert!(!m.group_by_name("Open").unwrap().success);

    assert!(!re.is_match("<abc><mno<xyz>").unwrap());
    assert!(!re.is_match("<abc>>").unwrap());
    assert!(re.is_match("no brackets").unwrap());
}

#[test]
fn test_balancing_without_capture() {
    // (?<-n>) pops a capture of n without recording one
    let re = Regex::new("^(?:(?<n>a)|(?<-n>b))*(?(n)(?!))$").unwrap();
    assert!(re.is_match("aabb").unwrap());
    assert!(re.is_match("abab").unwrap());
    assert!(!re.is_match("aab").unwrap());
    assert!(!re.is_match("abb").unwrap());
}

#[test]
fn test_quick_match_exposes_only_group_zero() {
    let re = Regex::new("(a)(b)").unwrap();
    let text: std::sync::Arc<[char]> = "xab".chars().collect::<Vec<_>>().into();
    let m = re.execute(text, 0, 3, 0, None, true).unwrap().unwrap();
    assert_eq!((m.index(), m.length()), (1, 2));
    assert!(!m.group(1).unwrap().success);
}

#[test]
fn test_right_to_left_captures() {
    let re = Regex::with_options("(\\w+) (\\w+)", RegexOptions::RIGHT_TO_LEFT).unwrap();
    let m = re.find("one two three").unwrap().unwrap();
    assert_eq!(m.value(), "two three");
    assert_eq!(m.group(1).unwrap().value, "two");
    assert_eq!(m.group(2).unwrap().value, "three");
}
