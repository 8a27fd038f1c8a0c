use icu_properties::GeneralCategory;
use icu_properties::maps;

/// General categories in the order the class encoding numbers them.
///
/// A class stores `category as i32 + 1` for "in category" and the negation
/// of that for "not in category"; zero is reserved as the group delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum UnicodeCategory {
    UppercaseLetter = 0,
    LowercaseLetter,
    TitlecaseLetter,
    ModifierLetter,
    OtherLetter,
    NonSpacingMark,
    SpacingCombiningMark,
    EnclosingMark,
    DecimalDigitNumber,
    LetterNumber,
    OtherNumber,
    SpaceSeparator,
    LineSeparator,
    ParagraphSeparator,
    Control,
    Format,
    Surrogate,
    PrivateUse,
    ConnectorPunctuation,
    DashPunctuation,
    OpenPunctuation,
    ClosePunctuation,
    InitialQuotePunctuation,
    FinalQuotePunctuation,
    OtherPunctuation,
    MathSymbol,
    CurrencySymbol,
    ModifierSymbol,
    OtherSymbol,
    OtherNotAssigned,
}

use UnicodeCategory as UC;

impl UnicodeCategory {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32 + 1
    }

    pub fn of(ch: char) -> UnicodeCategory {
        if ch.is_ascii() {
            return ascii_category(ch as u8);
        }
        #[allow(unreachable_patterns)]
        match maps::general_category().get(ch) {
            GeneralCategory::Unassigned => UC::OtherNotAssigned,
            GeneralCategory::UppercaseLetter => UC::UppercaseLetter,
            GeneralCategory::LowercaseLetter => UC::LowercaseLetter,
            GeneralCategory::TitlecaseLetter => UC::TitlecaseLetter,
            GeneralCategory::ModifierLetter => UC::ModifierLetter,
            GeneralCategory::OtherLetter => UC::OtherLetter,
            GeneralCategory::NonspacingMark => UC::NonSpacingMark,
            GeneralCategory::SpacingMark => UC::SpacingCombiningMark,
            GeneralCategory::EnclosingMark => UC::EnclosingMark,
            GeneralCategory::DecimalNumber => UC::DecimalDigitNumber,
            GeneralCategory::LetterNumber => UC::LetterNumber,
            GeneralCategory::OtherNumber => UC::OtherNumber,
            GeneralCategory::SpaceSeparator => UC::SpaceSeparator,
            GeneralCategory::LineSeparator => UC::LineSeparator,
            GeneralCategory::ParagraphSeparator => UC::ParagraphSeparator,
            GeneralCategory::Control => UC::Control,
            GeneralCategory::Format => UC::Format,
            GeneralCategory::PrivateUse => UC::PrivateUse,
            GeneralCategory::Surrogate => UC::Surrogate,
            GeneralCategory::DashPunctuation => UC::DashPunctuation,
            GeneralCategory::OpenPunctuation => UC::OpenPunctuation,
            GeneralCategory::ClosePunctuation => UC::ClosePunctuation,
            GeneralCategory::ConnectorPunctuation => UC::ConnectorPunctuation,
            GeneralCategory::InitialPunctuation => UC::InitialQuotePunctuation,
            GeneralCategory::FinalPunctuation => UC::FinalQuotePunctuation,
            GeneralCategory::OtherPunctuation => UC::OtherPunctuation,
            GeneralCategory::MathSymbol => UC::MathSymbol,
            GeneralCategory::CurrencySymbol => UC::CurrencySymbol,
            GeneralCategory::ModifierSymbol => UC::ModifierSymbol,
            GeneralCategory::OtherSymbol => UC::OtherSymbol,
            _ => UC::OtherNotAssigned,
        }
    }
}

fn ascii_category(b: u8) -> UnicodeCategory {
    match b {
        b'A'..=b'Z' => UC::UppercaseLetter,
        b'a'..=b'z' => UC::LowercaseLetter,
        b'0'..=b'9' => UC::DecimalDigitNumber,
        b' ' => UC::SpaceSeparator,
        0x00..=0x1F | 0x7F => UC::Control,
        b'_' => UC::ConnectorPunctuation,
        b'-' => UC::DashPunctuation,
        b'(' | b'[' | b'{' => UC::OpenPunctuation,
        b')' | b']' | b'}' => UC::ClosePunctuation,
        b'+' | b'<' | b'=' | b'>' | b'|' | b'~' => UC::MathSymbol,
        b'$' => UC::CurrencySymbol,
        b'^' | b'`' => UC::ModifierSymbol,
        _ => UC::OtherPunctuation,
    }
}

/// Encoded pseudo-category for "is white space".
pub const SPACE_CONST: i32 = 100;
/// Delimits a category group inside the category list.
pub const GROUP_MARK: i32 = 0;

const fn single(c: UnicodeCategory) -> [i32; 1] {
    [c.code()]
}

static LU: [i32; 1] = single(UC::UppercaseLetter);
static LL: [i32; 1] = single(UC::LowercaseLetter);
static LT: [i32; 1] = single(UC::TitlecaseLetter);
static LM: [i32; 1] = single(UC::ModifierLetter);
static LO: [i32; 1] = single(UC::OtherLetter);
static MN: [i32; 1] = single(UC::NonSpacingMark);
static MC: [i32; 1] = single(UC::SpacingCombiningMark);
static ME: [i32; 1] = single(UC::EnclosingMark);
static ND: [i32; 1] = single(UC::DecimalDigitNumber);
static NL: [i32; 1] = single(UC::LetterNumber);
static NO: [i32; 1] = single(UC::OtherNumber);
static ZS: [i32; 1] = single(UC::SpaceSeparator);
static ZL: [i32; 1] = single(UC::LineSeparator);
static ZP: [i32; 1] = single(UC::ParagraphSeparator);
static CC: [i32; 1] = single(UC::Control);
static CF: [i32; 1] = single(UC::Format);
static CS: [i32; 1] = single(UC::Surrogate);
static CO: [i32; 1] = single(UC::PrivateUse);
static CN: [i32; 1] = single(UC::OtherNotAssigned);
static PC: [i32; 1] = single(UC::ConnectorPunctuation);
static PD: [i32; 1] = single(UC::DashPunctuation);
static PS: [i32; 1] = single(UC::OpenPunctuation);
static PE: [i32; 1] = single(UC::ClosePunctuation);
static PI: [i32; 1] = single(UC::InitialQuotePunctuation);
static PF: [i32; 1] = single(UC::FinalQuotePunctuation);
static PO: [i32; 1] = single(UC::OtherPunctuation);
static SM: [i32; 1] = single(UC::MathSymbol);
static SC: [i32; 1] = single(UC::CurrencySymbol);
static SK: [i32; 1] = single(UC::ModifierSymbol);
static SO: [i32; 1] = single(UC::OtherSymbol);

static GROUP_L: [i32; 7] = [
    GROUP_MARK,
    UC::UppercaseLetter.code(),
    UC::LowercaseLetter.code(),
    UC::TitlecaseLetter.code(),
    UC::ModifierLetter.code(),
    UC::OtherLetter.code(),
    GROUP_MARK,
];
static GROUP_M: [i32; 5] = [
    GROUP_MARK,
    UC::NonSpacingMark.code(),
    UC::SpacingCombiningMark.code(),
    UC::EnclosingMark.code(),
    GROUP_MARK,
];
static GROUP_N: [i32; 5] = [
    GROUP_MARK,
    UC::DecimalDigitNumber.code(),
    UC::LetterNumber.code(),
    UC::OtherNumber.code(),
    GROUP_MARK,
];
static GROUP_Z: [i32; 5] = [
    GROUP_MARK,
    UC::SpaceSeparator.code(),
    UC::LineSeparator.code(),
    UC::ParagraphSeparator.code(),
    GROUP_MARK,
];
static GROUP_C: [i32; 7] = [
    GROUP_MARK,
    UC::Control.code(),
    UC::Format.code(),
    UC::Surrogate.code(),
    UC::PrivateUse.code(),
    UC::OtherNotAssigned.code(),
    GROUP_MARK,
];
static GROUP_P: [i32; 9] = [
    GROUP_MARK,
    UC::ConnectorPunctuation.code(),
    UC::DashPunctuation.code(),
    UC::OpenPunctuation.code(),
    UC::ClosePunctuation.code(),
    UC::InitialQuotePunctuation.code(),
    UC::FinalQuotePunctuation.code(),
    UC::OtherPunctuation.code(),
    GROUP_MARK,
];
static GROUP_S: [i32; 6] = [
    GROUP_MARK,
    UC::MathSymbol.code(),
    UC::CurrencySymbol.code(),
    UC::ModifierSymbol.code(),
    UC::OtherSymbol.code(),
    GROUP_MARK,
];

/// `\p{Lu}`, `\p{Ll}` and `\p{Lt}` all widen to this under ignore-case.
pub static CASED_LETTER_GROUP: [i32; 5] = [
    GROUP_MARK,
    UC::UppercaseLetter.code(),
    UC::LowercaseLetter.code(),
    UC::TitlecaseLetter.code(),
    GROUP_MARK,
];

/// Categories making up `\w`: letters, non-spacing marks, decimal digits
/// and connector punctuation.
pub static WORD_GROUP: [i32; 10] = [
    GROUP_MARK,
    UC::UppercaseLetter.code(),
    UC::LowercaseLetter.code(),
    UC::TitlecaseLetter.code(),
    UC::ModifierLetter.code(),
    UC::OtherLetter.code(),
    UC::NonSpacingMark.code(),
    UC::DecimalDigitNumber.code(),
    UC::ConnectorPunctuation.code(),
    GROUP_MARK,
];

static DEFINED_CATEGORIES: &[(&str, &[i32])] = &[
    ("C", &GROUP_C),
    ("Cc", &CC),
    ("Cf", &CF),
    ("Cn", &CN),
    ("Co", &CO),
    ("Cs", &CS),
    ("L", &GROUP_L),
    ("Ll", &LL),
    ("Lm", &LM),
    ("Lo", &LO),
    ("Lt", &LT),
    ("Lu", &LU),
    ("M", &GROUP_M),
    ("Mc", &MC),
    ("Me", &ME),
    ("Mn", &MN),
    ("N", &GROUP_N),
    ("Nd", &ND),
    ("Nl", &NL),
    ("No", &NO),
    ("P", &GROUP_P),
    ("Pc", &PC),
    ("Pd", &PD),
    ("Pe", &PE),
    ("Pf", &PF),
    ("Pi", &PI),
    ("Po", &PO),
    ("Ps", &PS),
    ("S", &GROUP_S),
    ("Sc", &SC),
    ("Sk", &SK),
    ("Sm", &SM),
    ("So", &SO),
    ("Z", &GROUP_Z),
    ("Zl", &ZL),
    ("Zp", &ZP),
    ("Zs", &ZS),
];

/// Encoded category list for a general-category name such as `Lu` or `L`.
pub fn lookup(name: &str) -> Option<&'static [i32]> {
    DEFINED_CATEGORIES
        .binary_search_by(|(n, _)| n.cmp(&name))
        .ok()
        .map(|i| DEFINED_CATEGORIES[i].1)
}

/// Writes `\p{..}` style text for an encoded category list.
pub fn describe(cats: &[i32], out: &mut String) {
    let mut i = 0;
    while i < cats.len() {
        let cur = cats[i];
        if cur == GROUP_MARK {
            let close = cats[i + 1..]
                .iter()
                .position(|&c| c == GROUP_MARK)
                .map_or(cats.len(), |p| i + 1 + p);
            let members = &cats[i + 1..close.min(cats.len())];
            let negated = members.first().is_some_and(|&c| c < 0);
            let mut group: Vec<i32> = Vec::with_capacity(members.len() + 2);
            group.push(GROUP_MARK);
            group.extend(members.iter().map(|c| c.abs()));
            group.push(GROUP_MARK);
            if group[..] == WORD_GROUP[..] {
                out.push_str(if negated { "\\W" } else { "\\w" });
            } else {
                push_property(out, name_for(&group), negated);
            }
            i = close + 1;
            continue;
        }
        let negated = cur < 0;
        match cur.abs() {
            SPACE_CONST => out.push_str(if negated { "\\S" } else { "\\s" }),
            code => push_property(out, name_for(&[code]), negated),
        }
        i += 1;
    }
}

fn name_for(codes: &[i32]) -> &'static str {
    DEFINED_CATEGORIES
        .iter()
        .find(|(_, c)| *c == codes)
        .map_or("?", |(n, _)| *n)
}

fn push_property(out: &mut String, name: &str, negated: bool) {
    out.push_str(if negated { "\\P{" } else { "\\p{" });
    out.push_str(name);
    out.push('}');
}

/// Appends `codes` to `out`, flipping every code when `invert` is set.
pub fn push_codes(out: &mut Vec<i32>, codes: &[i32], invert: bool) {
    if invert {
        out.extend(codes.iter().map(|c| -c));
    } else {
        out.extend_from_slice(codes);
    }
}

/// Membership of `ch` in an encoded category list.
pub fn char_in_category(ch: char, cats: &[i32]) -> bool {
    let chcat = UnicodeCategory::of(ch) as i32;
    let mut i = 0;
    while i < cats.len() {
        let cur = cats[i];
        if cur == GROUP_MARK {
            let (matched, next) = char_in_category_group(chcat, cats, i);
            if matched {
                return true;
            }
            i = next;
            continue;
        }
        if cur > 0 {
            if cur == SPACE_CONST {
                if ch.is_whitespace() {
                    return true;
                }
            } else if chcat == cur - 1 {
                return true;
            }
        } else if cur == -SPACE_CONST {
            if !ch.is_whitespace() {
                return true;
            }
        } else if chcat != -1 - cur {
            return true;
        }
        i += 1;
    }
    false
}

/// A positive group matches when any member matches; an inverted group
/// matches when no member does. Returns the result and the index after the
/// closing delimiter.
fn char_in_category_group(chcat: i32, cats: &[i32], open: usize) -> (bool, usize) {
    let mut i = open + 1;
    let positive = cats.get(i).is_some_and(|&c| c > 0);
    let mut result = !positive;
    while let Some(&cur) = cats.get(i) {
        if cur == GROUP_MARK {
            break;
        }
        if positive {
            if chcat == cur - 1 {
                result = true;
            }
        } else if chcat == -1 - cur {
            result = false;
        }
        i += 1;
    }
    (result, i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted() {
        for pair in DEFINED_CATEGORIES.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn test_category_of() {
        assert_eq!(UnicodeCategory::of('A'), UC::UppercaseLetter);
        assert_eq!(UnicodeCategory::of('\u{00E9}'), UC::LowercaseLetter);
        assert_eq!(UnicodeCategory::of('\u{0663}'), UC::DecimalDigitNumber);
        assert_eq!(UnicodeCategory::of('\u{2028}'), UC::LineSeparator);
        assert_eq!(UnicodeCategory::of('\u{00A0}'), UC::SpaceSeparator);
        assert_eq!(UnicodeCategory::of('\u{20AC}'), UC::CurrencySymbol);
        assert_eq!(UnicodeCategory::of('\u{0301}'), UC::NonSpacingMark);
    }

    #[test]
    fn test_ascii_fast_path_agrees() {
        for b in 0u8..0x80 {
            let ch = b as char;
            #[allow(unreachable_patterns)]
            let expected = match maps::general_category().get(ch) {
                GeneralCategory::UppercaseLetter => UC::UppercaseLetter,
                GeneralCategory::LowercaseLetter => UC::LowercaseLetter,
                GeneralCategory::DecimalNumber => UC::DecimalDigitNumber,
                GeneralCategory::SpaceSeparator => UC::SpaceSeparator,
                GeneralCategory::Control => UC::Control,
                GeneralCategory::ConnectorPunctuation => UC::ConnectorPunctuation,
                GeneralCategory::DashPunctuation => UC::DashPunctuation,
                GeneralCategory::OpenPunctuation => UC::OpenPunctuation,
                GeneralCategory::ClosePunctuation => UC::ClosePunctuation,
                GeneralCategory::MathSymbol => UC::MathSymbol,
                GeneralCategory::CurrencySymbol => UC::CurrencySymbol,
                GeneralCategory::ModifierSymbol => UC::ModifierSymbol,
                _ => UC::OtherPunctuation,
            };
            assert_eq!(ascii_category(b), expected, "byte {:#x}", b);
        }
    }

    #[test]
    fn test_groups() {
        let l = lookup("L").unwrap();
        assert!(char_in_category('x', l));
        assert!(!char_in_category('1', l));

        let mut not_l = Vec::new();
        push_codes(&mut not_l, l, true);
        assert!(!char_in_category('x', &not_l));
        assert!(char_in_category('1', &not_l));
    }

    #[test]
    fn test_space_const() {
        assert!(char_in_category(' ', &[SPACE_CONST]));
        assert!(char_in_category('\u{2003}', &[SPACE_CONST]));
        assert!(!char_in_category('a', &[SPACE_CONST]));
        assert!(char_in_category('a', &[-SPACE_CONST]));
    }

    #[test]
    fn test_describe() {
        let mut out = String::new();
        describe(&WORD_GROUP, &mut out);
        describe(&[-SPACE_CONST], &mut out);
        describe(lookup("Lu").unwrap(), &mut out);
        let mut not_p = Vec::new();
        push_codes(&mut not_p, lookup("P").unwrap(), true);
        describe(&not_p, &mut out);
        assert_eq!(out, "\\w\\S\\p{Lu}\\P{P}");
    }

    #[test]
    fn test_negated_single() {
        let nd = lookup("Nd").unwrap();
        let mut not_nd = Vec::new();
        push_codes(&mut not_nd, nd, true);
        assert!(char_in_category('7', nd));
        assert!(!char_in_category('7', &not_nd));
        assert!(char_in_category('q', &not_nd));
    }
}
