// Boyer-Moore search for the literal prefix of a pattern.
//
// Positions are signed char indices. Right-to-left tables hold negative
// shifts, so the same scan loop walks either direction.

use std::fmt;

use ahash::AHashMap;

use crate::char_class::to_lower;

const ASCII_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct BoyerMoore {
    pattern: Box<[char]>,
    rtl: bool,
    ci: bool,
    /// Good-suffix shifts, indexed by pattern position.
    positive: Box<[i32]>,
    /// Bad-character shifts for ASCII.
    negative_ascii: [i32; ASCII_LEN],
    /// Bad-character shifts for other characters, one page per high byte
    /// that occurs in the pattern.
    negative_pages: AHashMap<u32, Box<[i32; 256]>>,
}

impl BoyerMoore {
    /// Builds tables for a non-empty literal. A case-insensitive literal is
    /// folded once here; input characters are folded as they are read.
    pub fn new(pattern: &[char], ci: bool, rtl: bool) -> Self {
        debug_assert!(!pattern.is_empty());
        let pattern: Box<[char]> = if ci {
            pattern.iter().map(|&c| to_lower(c)).collect()
        } else {
            pattern.into()
        };
        let len = pattern.len() as i32;

        let (before_first, last, bump) = if rtl { (len, 0, -1) } else { (-1, len - 1, 1) };
        let at = |i: i32| pattern[i as usize];

        // good suffix table
        let mut positive = vec![0i32; pattern.len()].into_boxed_slice();
        let mut examine = last;
        let ch = at(examine);
        positive[examine as usize] = bump;
        examine -= bump;

        'outer: loop {
            // find an internal char that matches the tail
            loop {
                if examine == before_first {
                    break 'outer;
                }
                if at(examine) == ch {
                    break;
                }
                examine -= bump;
            }

            let mut matched = last;
            let mut scan = examine;
            loop {
                if scan == before_first || at(matched) != at(scan) {
                    // distance from the internal match to the tail suffix
                    if positive[matched as usize] == 0 {
                        positive[matched as usize] = matched - scan;
                    }
                    break;
                }
                scan -= bump;
                matched -= bump;
            }
            examine -= bump;
        }

        let mut matched = last - bump;
        while matched != before_first {
            if positive[matched as usize] == 0 {
                positive[matched as usize] = bump;
            }
            matched -= bump;
        }

        // bad character tables
        let default_shift = last - before_first;
        let mut negative_ascii = [default_shift; ASCII_LEN];
        let mut negative_pages: AHashMap<u32, Box<[i32; 256]>> = AHashMap::new();
        let mut examine = last;
        while examine != before_first {
            let cp = at(examine) as u32;
            let slot = if (cp as usize) < ASCII_LEN {
                &mut negative_ascii[cp as usize]
            } else {
                let page = negative_pages
                    .entry(cp >> 8)
                    .or_insert_with(|| Box::new([default_shift; 256]));
                &mut page[(cp & 0xFF) as usize]
            };
            if *slot == default_shift {
                *slot = last - examine;
            }
            examine -= bump;
        }

        Self {
            pattern,
            rtl,
            ci,
            positive,
            negative_ascii,
            negative_pages,
        }
    }

    pub fn pattern(&self) -> &[char] {
        &self.pattern
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.ci
    }

    pub fn is_right_to_left(&self) -> bool {
        self.rtl
    }

    #[inline]
    fn fold(&self, ch: char) -> char {
        if self.ci { to_lower(ch) } else { ch }
    }

    #[inline]
    fn bad_char_shift(&self, ch: char) -> Option<i32> {
        let cp = ch as u32;
        if (cp as usize) < ASCII_LEN {
            Some(self.negative_ascii[cp as usize])
        } else {
            self.negative_pages
                .get(&(cp >> 8))
                .map(|page| page[(cp & 0xFF) as usize])
        }
    }

    /// Checks for the literal at `index` without scanning. In right-to-left
    /// mode `index` is where the literal ends.
    pub fn is_match(&self, text: &[char], index: i32, beg: i32, end: i32) -> bool {
        let len = self.pattern.len() as i32;
        if !self.rtl {
            if index < beg || end - index < len {
                return false;
            }
            self.match_at(text, index)
        } else {
            if index > end || index - beg < len {
                return false;
            }
            self.match_at(text, index - len)
        }
    }

    fn match_at(&self, text: &[char], index: i32) -> bool {
        let start = index as usize;
        text[start..start + self.pattern.len()]
            .iter()
            .zip(self.pattern.iter())
            .all(|(&t, &p)| self.fold(t) == p)
    }

    /// Finds the next occurrence at or after `index` (at or before, in
    /// right-to-left mode) within `[beg, end)`. Returns the start of the
    /// occurrence, or its end when scanning right to left.
    pub fn scan(&self, text: &[char], index: i32, beg: i32, end: i32) -> Option<i32> {
        let len = self.pattern.len() as i32;
        let (default_advance, start_match, end_match, bump) = if !self.rtl {
            (len, len - 1, 0, 1)
        } else {
            (-len, 0, len - 1, -1)
        };
        let mut test = if !self.rtl { index + len - 1 } else { index - len };
        let ch_match = self.pattern[start_match as usize];

        loop {
            if test >= end || test < beg {
                return None;
            }
            let ch_test = self.fold(text[test as usize]);

            if ch_test != ch_match {
                test += self.bad_char_shift(ch_test).unwrap_or(default_advance);
                continue;
            }

            let mut test2 = test;
            let mut matched = start_match;
            loop {
                if matched == end_match {
                    return Some(if self.rtl { test2 + 1 } else { test2 });
                }
                matched -= bump;
                test2 -= bump;

                let ch_test = self.fold(text[test2 as usize]);
                if ch_test != self.pattern[matched as usize] {
                    let mut advance = self.positive[matched as usize];
                    if let Some(shift) = self.bad_char_shift(ch_test) {
                        let candidate = (matched - start_match) + shift;
                        if (self.rtl && candidate < advance) || (!self.rtl && candidate > advance) {
                            advance = candidate;
                        }
                    }
                    test += advance;
                    break;
                }
            }
        }
    }
}

impl fmt::Display for BoyerMoore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.pattern.iter().collect();
        write!(f, "{:?}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn naive(text: &[char], pat: &[char], from: usize) -> Option<usize> {
        (from..=text.len().saturating_sub(pat.len())).find(|&i| text[i..].starts_with(pat))
    }

    #[test]
    fn test_forward_scan_agrees_with_naive() {
        let text = chars("here is a simple example with an example inside");
        for pat in ["example", "ample", "e", "simple ex", "zzz", "inside"] {
            let p = chars(pat);
            let bm = BoyerMoore::new(&p, false, false);
            for from in [0usize, 5, 20] {
                let got = bm.scan(&text, from as i32, 0, text.len() as i32);
                assert_eq!(got.map(|x| x as usize), naive(&text, &p, from), "{pat} from {from}");
            }
        }
    }

    #[test]
    fn test_rtl_scan_returns_end() {
        let text = chars("abcabcabc");
        let bm = BoyerMoore::new(&chars("abc"), false, true);
        assert_eq!(bm.scan(&text, 9, 0, 9), Some(9));
        assert_eq!(bm.scan(&text, 8, 0, 9), Some(6));
        assert_eq!(bm.scan(&text, 2, 0, 9), None);
    }

    #[test]
    fn test_case_insensitive() {
        let text = chars("xxHeLLo");
        let bm = BoyerMoore::new(&chars("HELLO"), true, false);
        assert_eq!(bm.scan(&text, 0, 0, 7), Some(2));
        assert!(bm.is_match(&text, 2, 0, 7));
        assert!(!bm.is_match(&text, 3, 0, 7));
    }

    #[test]
    fn test_non_ascii_pages() {
        let text = chars("αβγ δεζ αβγδ");
        let bm = BoyerMoore::new(&chars("γδ"), false, false);
        assert_eq!(bm.scan(&text, 0, 0, text.len() as i32), Some(10));
    }

    #[test]
    fn test_is_match_rtl_checks_before_index() {
        let text = chars("foobar");
        let bm = BoyerMoore::new(&chars("foo"), false, true);
        assert!(bm.is_match(&text, 3, 0, 6));
        assert!(!bm.is_match(&text, 2, 0, 6));
    }
}
