// Character classes: a mutable builder used while parsing, and the
// immutable encoded form stored in compiled programs.
//
// Encoded layout (`ClassCode`):
//   [flags, set_len, cat_len, ranges.., categories.., subtraction..]
// `flags` is 1 for a negated class. Ranges are stored as alternating
// inclusive start / exclusive end pairs, so membership is the parity of the
// number of bounds `<= ch`. A subtracted class, if any, follows in the same
// layout and is parsed recursively.

mod blocks;
mod category;
mod lowercase;

use std::fmt;
use std::sync::LazyLock;

pub use category::UnicodeCategory;
pub use lowercase::{lower_str, to_lower};

use crate::regex_error::ParseErrorKind;
use category::{CASED_LETTER_GROUP, SPACE_CONST, WORD_GROUP};

const FLAGS: usize = 0;
const SET_LENGTH: usize = 1;
const CATEGORY_LENGTH: usize = 2;
const SET_START: usize = 3;

pub const LAST_CHAR: u32 = char::MAX as u32;

const ECMA_WORD_SET: &[(u32, u32)] = &[
    ('0' as u32, '9' as u32),
    ('A' as u32, 'Z' as u32),
    ('_' as u32, '_' as u32),
    ('a' as u32, 'z' as u32),
];
const ECMA_SPACE_SET: &[(u32, u32)] = &[(0x09, 0x0D), (0x20, 0x20)];
const ECMA_DIGIT_SET: &[(u32, u32)] = &[('0' as u32, '9' as u32)];

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';

/// Mutable character-class builder.
#[derive(Debug, Clone)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
    categories: Vec<i32>,
    canonical: bool,
    negate: bool,
    subtractor: Option<Box<CharClass>>,
}

impl Default for CharClass {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClass {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            categories: Vec::new(),
            canonical: true,
            negate: false,
            subtractor: None,
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn set_negated(&mut self, negate: bool) {
        self.negate = negate;
    }

    /// True when the class is a plain union of ranges and categories.
    pub fn is_mergeable(&self) -> bool {
        !self.negate && self.subtractor.is_none()
    }

    pub fn add_char(&mut self, ch: char) {
        self.add_range_raw(ch as u32, ch as u32);
    }

    pub fn add_range(&mut self, first: char, last: char) {
        self.add_range_raw(first as u32, last as u32);
    }

    fn add_range_raw(&mut self, first: u32, last: u32) {
        if self.canonical
            && let Some(&(_, prev_last)) = self.ranges.last()
            && first <= prev_last
        {
            self.canonical = false;
        }
        self.ranges.push((first, last));
    }

    /// Union `other` into this class. Negation and subtraction of `other`
    /// are ignored; callers only merge mergeable classes.
    pub fn add_class(&mut self, other: &CharClass) {
        if !other.canonical {
            self.canonical = false;
        } else if self.canonical
            && let (Some(&(_, last)), Some(&(first, _))) = (self.ranges.last(), other.ranges.first())
            && first <= last
        {
            self.canonical = false;
        }
        self.ranges.extend_from_slice(&other.ranges);
        self.categories.extend_from_slice(&other.categories);
    }

    /// Adds inclusive `pairs` (sorted, disjoint), or their complement.
    fn add_set(&mut self, pairs: &[(u32, u32)], negate: bool) {
        if !negate {
            for &(first, last) in pairs {
                self.add_range_raw(first, last);
            }
            return;
        }
        let mut next = 0;
        for &(first, last) in pairs {
            if first > next {
                self.add_range_raw(next, first - 1);
            }
            next = last + 1;
        }
        if next <= LAST_CHAR {
            self.add_range_raw(next, LAST_CHAR);
        }
    }

    /// Adds `\p{name}` (or `\P{name}` when `invert`). Accepts general
    /// categories and `Is`-prefixed block names.
    pub fn add_category_from_name(
        &mut self,
        name: &str,
        invert: bool,
        case_insensitive: bool,
    ) -> Result<(), ParseErrorKind> {
        if let Some(codes) = category::lookup(name) {
            let codes = if case_insensitive && matches!(name, "Ll" | "Lu" | "Lt") {
                &CASED_LETTER_GROUP[..]
            } else {
                codes
            };
            category::push_codes(&mut self.categories, codes, invert);
            Ok(())
        } else if let Some((first, last)) = blocks::lookup(name) {
            self.add_set(&[(first, last)], invert);
            Ok(())
        } else {
            Err(ParseErrorKind::UnknownProperty(name.to_string()))
        }
    }

    pub fn add_word(&mut self, ecma: bool, negate: bool) {
        if ecma {
            self.add_set(ECMA_WORD_SET, negate);
        } else {
            category::push_codes(&mut self.categories, &WORD_GROUP, negate);
        }
    }

    pub fn add_space(&mut self, ecma: bool, negate: bool) {
        if ecma {
            self.add_set(ECMA_SPACE_SET, negate);
        } else {
            self.categories
                .push(if negate { -SPACE_CONST } else { SPACE_CONST });
        }
    }

    pub fn add_digit(&mut self, ecma: bool, negate: bool) {
        if ecma {
            self.add_set(ECMA_DIGIT_SET, negate);
        } else {
            let code = UnicodeCategory::DecimalDigitNumber.code();
            self.categories.push(if negate { -code } else { code });
        }
    }

    /// Adds the lowercase image of every range already in the class.
    pub fn add_lowercase(&mut self) {
        self.canonical = false;
        let original = self.ranges.len();
        for i in 0..original {
            let (first, last) = self.ranges[i];
            if first == last {
                let lower = char::from_u32(first).map_or(first, |ch| to_lower(ch) as u32);
                if lower != first {
                    self.add_range_raw(lower, lower);
                }
            } else {
                lowercase::add_lowercase_range(self, first, last);
            }
        }
    }

    pub fn add_subtraction(&mut self, sub: CharClass) {
        self.subtractor = Some(Box::new(sub));
    }

    /// Sorts ranges and merges overlapping or abutting ones.
    pub fn canonicalize(&mut self) {
        if self.canonical {
            return;
        }
        self.canonical = true;
        if self.ranges.len() <= 1 {
            return;
        }
        self.ranges.sort_unstable();
        let mut j = 0;
        for i in 1..self.ranges.len() {
            let (first, last) = self.ranges[i];
            let cur = &mut self.ranges[j];
            if first <= cur.1.saturating_add(1) {
                if last > cur.1 {
                    cur.1 = last;
                }
            } else {
                j += 1;
                self.ranges[j] = (first, last);
            }
        }
        self.ranges.truncate(j + 1);
    }

    /// Canonicalizes and encodes the class.
    pub fn to_code(&mut self) -> ClassCode {
        let mut code = Vec::new();
        self.encode_into(&mut code);
        ClassCode(code.into_boxed_slice())
    }

    fn encode_into(&mut self, out: &mut Vec<i32>) {
        self.canonicalize();
        out.push(self.negate as i32);
        out.push((self.ranges.len() * 2) as i32);
        out.push(self.categories.len() as i32);
        for &(first, last) in &self.ranges {
            out.push(first as i32);
            out.push(last as i32 + 1);
        }
        out.extend_from_slice(&self.categories);
        if let Some(sub) = &mut self.subtractor {
            sub.encode_into(out);
        }
    }

    /// Rebuilds a builder from an encoded class.
    pub fn from_code(code: &ClassCode) -> CharClass {
        Self::decode_at(&code.0, 0)
    }

    fn decode_at(code: &[i32], start: usize) -> CharClass {
        let set_len = code[start + SET_LENGTH] as usize;
        let cat_len = code[start + CATEGORY_LENGTH] as usize;
        let set_end = start + SET_START + set_len;
        let end = set_end + cat_len;

        let ranges = code[start + SET_START..set_end]
            .chunks_exact(2)
            .map(|pair| (pair[0] as u32, (pair[1] - 1) as u32))
            .collect();
        let subtractor = (code.len() > end).then(|| Box::new(Self::decode_at(code, end)));

        CharClass {
            ranges,
            categories: code[set_end..end].to_vec(),
            canonical: true,
            negate: code[start + FLAGS] == 1,
            subtractor,
        }
    }
}

/// Encoded, canonical, immutable character class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassCode(Box<[i32]>);

static ANY_CLASS: LazyLock<ClassCode> = LazyLock::new(|| {
    let mut cc = CharClass::new();
    cc.add_range_raw(0, LAST_CHAR);
    cc.to_code()
});

static WORD_CLASS: LazyLock<ClassCode> = LazyLock::new(|| ClassCode::word(false, false));
static ECMA_WORD_CLASS: LazyLock<ClassCode> = LazyLock::new(|| ClassCode::word(true, false));

impl ClassCode {
    /// Matches every character.
    pub fn any() -> ClassCode {
        ANY_CLASS.clone()
    }

    pub fn word(ecma: bool, negate: bool) -> ClassCode {
        let mut cc = CharClass::new();
        cc.add_word(ecma, negate);
        cc.to_code()
    }

    pub fn space(ecma: bool, negate: bool) -> ClassCode {
        let mut cc = CharClass::new();
        cc.add_space(ecma, negate);
        cc.to_code()
    }

    pub fn digit(ecma: bool, negate: bool) -> ClassCode {
        let mut cc = CharClass::new();
        cc.add_digit(ecma, negate);
        cc.to_code()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn contains(&self, ch: char) -> bool {
        char_in_class_recursive(ch, &self.0, 0)
    }

    pub fn is_negated(&self) -> bool {
        self.0[FLAGS] == 1
    }

    pub fn is_subtraction(&self) -> bool {
        self.0.len() > self.base_len()
    }

    pub fn is_mergeable(&self) -> bool {
        !self.is_negated() && !self.is_subtraction()
    }

    /// Matches nothing.
    pub fn is_empty(&self) -> bool {
        self.0[SET_LENGTH] == 0
            && self.0[CATEGORY_LENGTH] == 0
            && !self.is_negated()
            && !self.is_subtraction()
    }

    /// The single character `[c]` matches, if that is all it matches.
    pub fn singleton(&self) -> Option<char> {
        if self.is_negated() {
            return None;
        }
        self.single_range_char()
    }

    /// The single character `[^c]` excludes, if that is all it excludes.
    pub fn singleton_inverse(&self) -> Option<char> {
        if !self.is_negated() {
            return None;
        }
        self.single_range_char()
    }

    fn single_range_char(&self) -> Option<char> {
        if self.0[CATEGORY_LENGTH] != 0 || self.0[SET_LENGTH] != 2 || self.is_subtraction() {
            return None;
        }
        let first = self.0[SET_START];
        if first + 1 == self.0[SET_START + 1] {
            char::from_u32(first as u32)
        } else {
            None
        }
    }

    fn base_len(&self) -> usize {
        SET_START + self.0[SET_LENGTH] as usize + self.0[CATEGORY_LENGTH] as usize
    }
}

fn char_in_class_recursive(ch: char, code: &[i32], start: usize) -> bool {
    let set_len = code[start + SET_LENGTH] as usize;
    let cat_len = code[start + CATEGORY_LENGTH] as usize;
    let end = start + SET_START + set_len + cat_len;

    let subtracted = code.len() > end && char_in_class_recursive(ch, code, end);

    let mut found = char_in_class_internal(ch, code, start, set_len, cat_len);
    if code[start + FLAGS] == 1 {
        found = !found;
    }
    found && !subtracted
}

fn char_in_class_internal(ch: char, code: &[i32], start: usize, set_len: usize, cat_len: usize) -> bool {
    let set_start = start + SET_START;
    let bounds = &code[set_start..set_start + set_len];
    let cp = ch as i32;
    if bounds.partition_point(|&b| b <= cp) % 2 == 1 {
        return true;
    }
    if cat_len == 0 {
        return false;
    }
    category::char_in_category(ch, &code[set_start + set_len..set_start + set_len + cat_len])
}

/// Word test used by `\b` and `\B`. Zero-width joiners count as word chars.
pub fn is_word_char(ch: char) -> bool {
    WORD_CLASS.contains(ch) || ch == ZERO_WIDTH_JOINER || ch == ZERO_WIDTH_NON_JOINER
}

pub fn is_ecma_word_char(ch: char) -> bool {
    ECMA_WORD_CLASS.contains(ch)
}

fn push_class_char(out: &mut String, cp: u32) {
    match char::from_u32(cp) {
        Some(ch @ ('\\' | ']' | '[' | '-' | '^')) => {
            out.push('\\');
            out.push(ch);
        }
        Some(ch) if ch.is_ascii_graphic() || ch == ' ' => out.push(ch),
        _ if cp <= 0xFFFF => out.push_str(&format!("\\u{:04X}", cp)),
        _ => out.push_str(&format!("\\U{:06X}", cp)),
    }
}

fn describe_at(code: &[i32], start: usize, out: &mut String) {
    let set_len = code[start + SET_LENGTH] as usize;
    let cat_len = code[start + CATEGORY_LENGTH] as usize;
    let set_start = start + SET_START;
    let end = set_start + set_len + cat_len;

    out.push('[');
    if code[start + FLAGS] == 1 {
        out.push('^');
    }
    for pair in code[set_start..set_start + set_len].chunks_exact(2) {
        let (first, last) = (pair[0] as u32, (pair[1] - 1) as u32);
        push_class_char(out, first);
        if last > first {
            if last > first + 1 {
                out.push('-');
            }
            push_class_char(out, last);
        }
    }
    category::describe(&code[set_start + set_len..end], out);
    if code.len() > end {
        out.push('-');
        describe_at(code, end, out);
    }
    out.push(']');
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        describe_at(&self.0, 0, &mut out);
        f.write_str(&out)
    }
}
