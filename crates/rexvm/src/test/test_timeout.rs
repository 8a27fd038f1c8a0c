// Tests for the match deadline
use std::time::{Duration, Instant};

use crate::*;

fn catastrophic_input() -> String {
    format!("{}!", "a".repeat(40))
}

#[test]
fn test_catastrophic_pattern_times_out() {
    let config = RegexConfig::default().timeout(Duration::from_millis(50));
    let re = Regex::with_config("(a+)+$", &config).unwrap();
    let started = Instant::now();
    let err = re.is_match(&catastrophic_input()).unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(10));
    match err {
        RegexError::MatchTimeout(timeout) => {
            assert_eq!(timeout.pattern, "(a+)+$");
            assert_eq!(timeout.timeout, Duration::from_millis(50));
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[test]
fn test_timeout_ends_match_iteration() {
    let config = RegexConfig::default().timeout(Duration::from_millis(50));
    let re = Regex::with_config("(a+)+$", &config).unwrap();
    let text = catastrophic_input();
    let mut results = re.matches(&text);
    assert!(matches!(results.next(), Some(Err(RegexError::MatchTimeout(_)))));
    assert!(results.next().is_none());
}

#[test]
fn test_regex_usable_after_timeout() {
    let config = RegexConfig::default().timeout(Duration::from_millis(50));
    let re = Regex::with_config("(a+)+$", &config).unwrap();
    assert!(re.find(&catastrophic_input()).is_err());
    assert_eq!(re.find("xaaa").unwrap().unwrap().value(), "aaa");
}

#[test]
fn test_fast_match_within_deadline() {
    let config = RegexConfig::default().timeout(Duration::from_secs(5));
    let re = Regex::with_config("\\w+@\\w+", &config).unwrap();
    assert!(re.is_match("write to me@example").unwrap());
}
