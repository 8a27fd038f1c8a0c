// Tests for splitting text around matches
use crate::*;

fn split(pattern: &str, text: &str, limit: usize) -> Vec<String> {
    Regex::new(pattern).unwrap().split(text, limit).unwrap()
}

#[test]
fn test_split_basic() {
    assert_eq!(split(",", "a,b,,c", 0), vec!["a", "b", "", "c"]);
    assert_eq!(split(",", "no commas", 0), vec!["no commas"]);
    assert_eq!(split(",", "", 0), vec![""]);
    assert_eq!(split(",", ",a,", 0), vec!["", "a", ""]);
}

#[test]
fn test_split_limit() {
    assert_eq!(split(",", "a,b,,c", 1), vec!["a,b,,c"]);
    assert_eq!(split(",", "a,b,,c", 2), vec!["a", "b,,c"]);
    assert_eq!(split(",", "a,b,,c", 3), vec!["a", "b", ",c"]);
    assert_eq!(split(",", "a,b", 10), vec!["a", "b"]);
}

#[test]
fn test_split_includes_captures() {
    assert_eq!(split("(-)", "a-b", 0), vec!["a", "-", "b"]);
    assert_eq!(split("(-)|(\\+)", "1-2+3", 0), vec!["1", "-", "2", "+", "3"]);
}

#[test]
fn test_split_on_empty_matches() {
    assert_eq!(split("", "abc", 0), vec!["", "a", "b", "c", ""]);
}

#[test]
fn test_split_right_to_left() {
    let re = Regex::with_options(",", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert_eq!(re.split("a,b,c", 0).unwrap(), vec!["a", "b", "c"]);
    assert_eq!(re.split("a,b,c", 2).unwrap(), vec!["a,b", "c"]);
}
