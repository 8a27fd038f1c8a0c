// Tests for character classes as seen through patterns
use crate::*;

fn matches_all(pattern: &str, options: RegexOptions, yes: &str, no: &str) {
    let re = Regex::with_options(&format!("^{}$", pattern), options).unwrap();
    for ch in yes.chars() {
        assert!(re.is_match(&ch.to_string()).unwrap(), "{} should match {:?}", pattern, ch);
    }
    for ch in no.chars() {
        assert!(!re.is_match(&ch.to_string()).unwrap(), "{} should not match {:?}", pattern, ch);
    }
}

#[test]
fn test_ranges_and_negation() {
    matches_all("[a-cx]", RegexOptions::empty(), "abcx", "dA-");
    matches_all("[^a-c]", RegexOptions::empty(), "dA\n", "abc");
    matches_all("[]a]", RegexOptions::empty(), "]a", "b[");
    matches_all("[a\\-z]", RegexOptions::empty(), "a-z", "b");
}

#[test]
fn test_subtraction() {
    matches_all("[a-z-[aeiou]]", RegexOptions::empty(), "bxz", "aeu");
    matches_all("[a-z-[d-w-[m]]]", RegexOptions::empty(), "acmxz", "dlnw");
}

#[test]
fn test_shorthands() {
    matches_all("\\w", RegexOptions::empty(), "aZ_9\u{e9}", " -.");
    matches_all("\\W", RegexOptions::empty(), " -.", "a_");
    matches_all("\\s", RegexOptions::empty(), " \t\n\u{3000}", "a");
    matches_all("[\\d.]", RegexOptions::empty(), "7.\u{0664}", "a");
    matches_all("\\w", RegexOptions::ECMA_SCRIPT, "aZ_9", "\u{e9}");
    matches_all("\\s", RegexOptions::ECMA_SCRIPT, " \t", "\u{3000}");
}

#[test]
fn test_unicode_categories_and_blocks() {
    matches_all("\\p{Lu}", RegexOptions::empty(), "A\u{c9}\u{391}", "a1");
    matches_all("\\p{L}", RegexOptions::empty(), "a\u{e9}\u{4e2d}", "1 ");
    matches_all("\\p{N}", RegexOptions::empty(), "5\u{2163}", "x");
    matches_all("\\p{IsGreek}", RegexOptions::empty(), "\u{3b1}\u{391}", "a");
    matches_all("[^\\P{Ll}]", RegexOptions::empty(), "ab", "A1");
}

#[test]
fn test_case_insensitive_classes() {
    matches_all("[a-c]", RegexOptions::IGNORE_CASE, "aBC", "dD");
    matches_all("[\u{391}]", RegexOptions::IGNORE_CASE, "\u{3b1}\u{391}", "a");
    matches_all("\\p{Lu}", RegexOptions::IGNORE_CASE, "Aa", "1");
    matches_all("[^a]", RegexOptions::IGNORE_CASE, "b", "aA");
}

#[test]
fn test_dot() {
    matches_all(".", RegexOptions::empty(), "a \u{e9}", "\n");
    matches_all(".", RegexOptions::SINGLELINE, "a\n", "");
}

#[test]
fn test_class_errors() {
    for (pattern, kind) in [
        ("[z-a]", ParseErrorKind::ReversedCharRange),
        ("[a-\\w]", ParseErrorKind::BadClassInCharRange('w')),
        ("[a-z-[b]c]", ParseErrorKind::SubtractionMustBeLast),
        ("[abc", ParseErrorKind::UnterminatedBracket),
    ] {
        match Regex::new(pattern) {
            Err(RegexError::Parse(e)) => assert_eq!(e.kind, kind, "{}", pattern),
            other => panic!("{:?} should not parse, got {:?}", pattern, other),
        }
    }
}
