use std::fmt;
use std::time::Duration;

use crate::regex_options::RegexOptions;

/// Why a pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedBracket,
    UnterminatedComment,
    /// More `(` than `)`.
    NotEnoughParens,
    /// A `)` with no group to close.
    TooManyParens,
    IllegalEndEscape,
    UnrecognizedEscape(char),
    UnrecognizedControl,
    MissingControl,
    TooFewHex,
    /// `{m,n}` with `m > n`.
    ReversedQuantifierRange,
    /// `*`, `+`, `?` or `{..}` with nothing before it.
    QuantifierAfterNothing,
    NestedQuantifiers(char),
    ReversedCharRange,
    BadClassInCharRange(char),
    SubtractionMustBeLast,
    IncompleteSlashP,
    MalformedSlashP,
    UnknownProperty(String),
    UndefinedBackref(i32),
    UndefinedNameRef(String),
    MalformedNameRef,
    UndefinedReference(i32),
    MalformedReference(i32),
    InvalidGroupName,
    CapnumNotZero,
    CaptureGroupOutOfRange,
    UnrecognizedGrouping,
    AlternationCantCapture,
    AlternationCantHaveComment,
    IllegalCondition,
    TooManyAlternates,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedBracket => write!(f, "Unterminated [] set"),
            ParseErrorKind::UnterminatedComment => write!(f, "Unterminated (?#...) comment"),
            ParseErrorKind::NotEnoughParens => write!(f, "Not enough )'s"),
            ParseErrorKind::TooManyParens => write!(f, "Too many )'s"),
            ParseErrorKind::IllegalEndEscape => write!(f, "Illegal \\ at end of pattern"),
            ParseErrorKind::UnrecognizedEscape(ch) => {
                write!(f, "Unrecognized escape sequence \\{}", ch)
            }
            ParseErrorKind::UnrecognizedControl => write!(f, "Unrecognized control character"),
            ParseErrorKind::MissingControl => write!(f, "Missing control character"),
            ParseErrorKind::TooFewHex => write!(f, "Insufficient hexadecimal digits"),
            ParseErrorKind::ReversedQuantifierRange => {
                write!(f, "Illegal {{x,y}} with x > y")
            }
            ParseErrorKind::QuantifierAfterNothing => {
                write!(f, "Quantifier {{x,y}} following nothing")
            }
            ParseErrorKind::NestedQuantifiers(ch) => write!(f, "Nested quantifier '{}'", ch),
            ParseErrorKind::ReversedCharRange => write!(f, "[x-y] range in reverse order"),
            ParseErrorKind::BadClassInCharRange(ch) => {
                write!(f, "Cannot include class \\{} in character range", ch)
            }
            ParseErrorKind::SubtractionMustBeLast => write!(
                f,
                "A subtraction must be the last element in a character class"
            ),
            ParseErrorKind::IncompleteSlashP => write!(f, "Incomplete \\p{{X}} character escape"),
            ParseErrorKind::MalformedSlashP => write!(f, "Malformed \\p{{X}} character escape"),
            ParseErrorKind::UnknownProperty(name) => {
                write!(f, "Unknown property '{}'", name)
            }
            ParseErrorKind::UndefinedBackref(n) => {
                write!(f, "Reference to undefined group number {}", n)
            }
            ParseErrorKind::UndefinedNameRef(name) => {
                write!(f, "Reference to undefined group name {}", name)
            }
            ParseErrorKind::MalformedNameRef => write!(f, "Malformed \\k<...> named back reference"),
            ParseErrorKind::UndefinedReference(n) => {
                write!(f, "(?({})then|else) with undefined group", n)
            }
            ParseErrorKind::MalformedReference(n) => {
                write!(f, "(?({}) ) malformed", n)
            }
            ParseErrorKind::InvalidGroupName => write!(f, "Invalid group name"),
            ParseErrorKind::CapnumNotZero => write!(f, "Capture number cannot be zero"),
            ParseErrorKind::CaptureGroupOutOfRange => {
                write!(
                    f,
                    "Capture group numbers must be less than or equal to {}",
                    i32::MAX
                )
            }
            ParseErrorKind::UnrecognizedGrouping => write!(f, "Unrecognized grouping construct"),
            ParseErrorKind::AlternationCantCapture => {
                write!(f, "Alternation conditions do not capture and cannot be named")
            }
            ParseErrorKind::AlternationCantHaveComment => {
                write!(f, "Alternation conditions cannot be comments")
            }
            ParseErrorKind::IllegalCondition => write!(f, "Illegal conditional (?(...)) expression"),
            ParseErrorKind::TooManyAlternates => {
                write!(f, "Too many | in (?()|)")
            }
        }
    }
}

/// A pattern that failed to parse, with the original pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pattern: String,
    pub kind: ParseErrorKind,
    /// Char offset in the pattern where the scanner stopped.
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parsing \"{}\" - {}", self.pattern, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// A match attempt that ran past its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTimeout {
    pub pattern: String,
    pub input: String,
    pub timeout: Duration,
}

impl fmt::Display for MatchTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The regex engine timed out after {:?} while matching pattern \"{}\"",
            self.timeout, self.pattern
        )
    }
}

impl std::error::Error for MatchTimeout {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    Parse(ParseError),
    /// `ECMA_SCRIPT` combined with anything but IGNORE_CASE, MULTILINE or
    /// CULTURE_INVARIANT.
    InvalidOptions(RegexOptions),
    /// A search bound outside `begin <= start <= end <= len`.
    InvalidArgument { name: &'static str, value: usize },
    MatchTimeout(MatchTimeout),
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Parse(e) => write!(f, "{}", e),
            RegexError::InvalidOptions(options) => {
                write!(f, "invalid regex options {:?}", options)
            }
            RegexError::InvalidArgument { name, value } => {
                write!(f, "argument '{}' out of range: {}", name, value)
            }
            RegexError::MatchTimeout(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegexError::Parse(e) => Some(e),
            RegexError::MatchTimeout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for RegexError {
    fn from(e: ParseError) -> Self {
        RegexError::Parse(e)
    }
}

impl From<MatchTimeout> for RegexError {
    fn from(e: MatchTimeout) -> Self {
        RegexError::MatchTimeout(e)
    }
}

pub type RegexResult<T> = Result<T, RegexError>;
