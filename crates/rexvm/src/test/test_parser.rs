// Tests for pattern errors and group numbering
use crate::compiler::parser::parse;
use crate::*;

fn parse_error(pattern: &str) -> ParseErrorKind {
    match Regex::new(pattern) {
        Err(RegexError::Parse(e)) => e.kind,
        other => panic!("{:?} should not parse, got {:?}", pattern, other),
    }
}

#[test]
fn test_paren_errors() {
    assert_eq!(parse_error("(a"), ParseErrorKind::NotEnoughParens);
    assert_eq!(parse_error("a)"), ParseErrorKind::TooManyParens);
    assert_eq!(parse_error("((a)"), ParseErrorKind::NotEnoughParens);
}

#[test]
fn test_quantifier_errors() {
    assert_eq!(parse_error("*a"), ParseErrorKind::QuantifierAfterNothing);
    assert_eq!(parse_error("a**"), ParseErrorKind::NestedQuantifiers('*'));
    assert_eq!(parse_error("a{3,2}"), ParseErrorKind::ReversedQuantifierRange);
    // not a quantifier, so a literal brace
    assert!(Regex::new("a{x}").is_ok());
    assert!(Regex::new("a{,2}").is_ok());
}

#[test]
fn test_quantifier_error_after_literal_run() {
    assert!(Regex::new("a*b+").is_ok());
    assert_eq!(parse_error("a*b**"), ParseErrorKind::NestedQuantifiers('*'));
    assert_eq!(parse_error("a*(?i)*"), ParseErrorKind::QuantifierAfterNothing);
    assert_eq!(parse_error("a*bc|*"), ParseErrorKind::QuantifierAfterNothing);
}

#[test]
fn test_escape_errors() {
    assert_eq!(parse_error("\\"), ParseErrorKind::IllegalEndEscape);
    assert_eq!(parse_error("\\q"), ParseErrorKind::UnrecognizedEscape('q'));
    assert_eq!(parse_error("\\xZ"), ParseErrorKind::TooFewHex);
    assert_eq!(parse_error("\\c"), ParseErrorKind::MissingControl);
    assert_eq!(
        parse_error("\\p{Foo}"),
        ParseErrorKind::UnknownProperty("Foo".to_string())
    );
    assert_eq!(parse_error("[a"), ParseErrorKind::UnterminatedBracket);
}

#[test]
fn test_reference_errors() {
    assert_eq!(parse_error("\\1"), ParseErrorKind::UndefinedBackref(1));
    assert_eq!(
        parse_error("\\k<x>"),
        ParseErrorKind::UndefinedNameRef("x".to_string())
    );
    assert_eq!(parse_error("(?<0>a)"), ParseErrorKind::CapnumNotZero);
    assert_eq!(
        parse_error("(?<a-b>c)"),
        ParseErrorKind::UndefinedNameRef("b".to_string())
    );
    // a forward reference to a group that exists is fine
    assert!(Regex::new("\\1(a)").is_ok());
}

#[test]
fn test_conditional_errors() {
    assert_eq!(parse_error("(?(2)a)"), ParseErrorKind::UndefinedReference(2));
    assert_eq!(parse_error("(?(?#x)a)"), ParseErrorKind::AlternationCantHaveComment);
    assert_eq!(parse_error("(?(?<n>a)b)"), ParseErrorKind::AlternationCantCapture);
    assert_eq!(parse_error("(a)(?(1)b|c|d)"), ParseErrorKind::TooManyAlternates);
    assert_eq!(parse_error("(?(a)b|c|d|e)"), ParseErrorKind::TooManyAlternates);
}

#[test]
fn test_error_message_names_pattern() {
    let err = Regex::new("a)").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("a)"));
    assert!(message.contains("Too many )'s"));
}

#[test]
fn test_numbered_before_named() {
    let re = Regex::new("(a)(?<x>b)(c)").unwrap();
    assert_eq!(re.group_numbers(), &[0, 1, 2, 3]);
    let names: Vec<&str> = re.group_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["0", "1", "2", "x"]);
    assert_eq!(re.group_number_from_name("x"), Some(3));
    assert_eq!(re.group_number_from_name("2"), Some(2));
    assert_eq!(re.group_number_from_name("nope"), None);
    assert_eq!(re.group_name_from_number(3), Some("x"));
    assert_eq!(re.group_name_from_number(4), None);
}

#[test]
fn test_explicit_numbers() {
    let re = Regex::new("(?<2>a)(b)").unwrap();
    assert_eq!(re.group_numbers(), &[0, 1, 2]);

    let re = Regex::new("(?<5>a)(b)").unwrap();
    assert_eq!(re.group_numbers(), &[0, 1, 5]);
    assert_eq!(re.group_name_from_number(5), Some("5"));
    assert_eq!(re.group_name_from_number(3), None);
    assert_eq!(re.program().cap_size, 3);
}

#[test]
fn test_duplicate_names_share_a_group() {
    let re = Regex::new("(?<x>a)|(?<x>b)").unwrap();
    assert_eq!(re.group_numbers(), &[0, 1]);
    let m = re.find("b").unwrap().unwrap();
    assert_eq!(m.group_by_name("x").unwrap().value, "b");
}

#[test]
fn test_explicit_capture() {
    let re = Regex::with_options("(a)(?<n>b)", RegexOptions::EXPLICIT_CAPTURE).unwrap();
    assert_eq!(re.group_numbers(), &[0, 1]);
    assert_eq!(re.group_number_from_name("n"), Some(1));

    let re = Regex::new("(?n:(a))(b)").unwrap();
    assert_eq!(re.group_numbers(), &[0, 1]);
    let m = re.find("ab").unwrap().unwrap();
    assert_eq!(m.group(1).unwrap().value, "b");
}

#[test]
fn test_tree_capture_bookkeeping() {
    let tree = parse("(a)|b", RegexOptions::empty()).unwrap();
    assert_eq!(tree.captop, 2);
    assert!(tree.capnumlist.is_none());
    assert!(tree.capslist.is_none());

    let tree = parse("(?<7>a)", RegexOptions::empty()).unwrap();
    assert_eq!(tree.captop, 8);
    assert_eq!(tree.capnumlist.as_deref(), Some(&[0, 7][..]));
}

#[test]
fn test_comments_and_whitespace() {
    let re = Regex::with_options(
        "a b # trailing comment\n c",
        RegexOptions::IGNORE_PATTERN_WHITESPACE,
    )
    .unwrap();
    assert!(re.is_match("abc").unwrap());
    assert!(!re.is_match("a b c").unwrap());

    let re = Regex::new("a(?#inline)b").unwrap();
    assert!(re.is_match("ab").unwrap());
    assert_eq!(parse_error("a(?#open"), ParseErrorKind::UnterminatedComment);
}
