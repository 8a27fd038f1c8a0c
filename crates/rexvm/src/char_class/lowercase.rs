// Invariant lowercase mapping used for case-insensitive matching.
//
// The table is a sorted list of code-point intervals. Inside one interval
// every code point lowercases by the same rule, and each rule is
// non-decreasing, so clipping an input range to an interval and mapping its
// two end points yields the lowercase image of the whole clipped range.

use super::CharClass;

#[derive(Debug, Clone, Copy)]
enum LowerOp {
    /// Every code point maps to one constant.
    Set(u32),
    /// Add a fixed (possibly negative) offset.
    Add(i32),
    /// Bitwise-or with 1: even code points are upper, odd are lower.
    Bor,
    /// Bump odd code points by one: odd are upper, even are lower.
    Bad,
}

#[derive(Debug, Clone, Copy)]
struct LowerCaseMapping {
    min: u32,
    max: u32,
    op: LowerOp,
}

impl LowerCaseMapping {
    const fn new(min: u32, max: u32, op: LowerOp) -> Self {
        Self { min, max, op }
    }

    #[inline]
    fn apply(&self, cp: u32) -> u32 {
        match self.op {
            LowerOp::Set(target) => target,
            LowerOp::Add(delta) => (cp as i64 + delta as i64) as u32,
            LowerOp::Bor => cp | 1,
            LowerOp::Bad => cp + (cp & 1),
        }
    }
}

#[rustfmt::skip]
static LC_TABLE: &[LowerCaseMapping] = &[
    LowerCaseMapping::new(0x0041, 0x005A, LowerOp::Add(32)),
    LowerCaseMapping::new(0x00C0, 0x00D6, LowerOp::Add(32)),
    LowerCaseMapping::new(0x00D8, 0x00DE, LowerOp::Add(32)),
    LowerCaseMapping::new(0x0100, 0x012E, LowerOp::Bor),
    LowerCaseMapping::new(0x0130, 0x0130, LowerOp::Set(0x0069)),
    LowerCaseMapping::new(0x0132, 0x0136, LowerOp::Bor),
    LowerCaseMapping::new(0x0139, 0x0147, LowerOp::Bad),
    LowerCaseMapping::new(0x014A, 0x0176, LowerOp::Bor),
    LowerCaseMapping::new(0x0178, 0x0178, LowerOp::Set(0x00FF)),
    LowerCaseMapping::new(0x0179, 0x017D, LowerOp::Bad),
    LowerCaseMapping::new(0x0181, 0x0181, LowerOp::Set(0x0253)),
    LowerCaseMapping::new(0x0182, 0x0184, LowerOp::Bor),
    LowerCaseMapping::new(0x0186, 0x0186, LowerOp::Set(0x0254)),
    LowerCaseMapping::new(0x0187, 0x0187, LowerOp::Set(0x0188)),
    LowerCaseMapping::new(0x0189, 0x018A, LowerOp::Add(205)),
    LowerCaseMapping::new(0x018B, 0x018B, LowerOp::Set(0x018C)),
    LowerCaseMapping::new(0x018E, 0x018E, LowerOp::Set(0x01DD)),
    LowerCaseMapping::new(0x018F, 0x018F, LowerOp::Set(0x0259)),
    LowerCaseMapping::new(0x0190, 0x0190, LowerOp::Set(0x025B)),
    LowerCaseMapping::new(0x0191, 0x0191, LowerOp::Set(0x0192)),
    LowerCaseMapping::new(0x0193, 0x0193, LowerOp::Set(0x0260)),
    LowerCaseMapping::new(0x0194, 0x0194, LowerOp::Set(0x0263)),
    LowerCaseMapping::new(0x0196, 0x0196, LowerOp::Set(0x0269)),
    LowerCaseMapping::new(0x0197, 0x0197, LowerOp::Set(0x0268)),
    LowerCaseMapping::new(0x0198, 0x0198, LowerOp::Set(0x0199)),
    LowerCaseMapping::new(0x019C, 0x019C, LowerOp::Set(0x026F)),
    LowerCaseMapping::new(0x019D, 0x019D, LowerOp::Set(0x0272)),
    LowerCaseMapping::new(0x019F, 0x019F, LowerOp::Set(0x0275)),
    LowerCaseMapping::new(0x01A0, 0x01A4, LowerOp::Bor),
    LowerCaseMapping::new(0x01A6, 0x01A6, LowerOp::Set(0x0280)),
    LowerCaseMapping::new(0x01A7, 0x01A7, LowerOp::Set(0x01A8)),
    LowerCaseMapping::new(0x01A9, 0x01A9, LowerOp::Set(0x0283)),
    LowerCaseMapping::new(0x01AC, 0x01AC, LowerOp::Set(0x01AD)),
    LowerCaseMapping::new(0x01AE, 0x01AE, LowerOp::Set(0x0288)),
    LowerCaseMapping::new(0x01AF, 0x01AF, LowerOp::Set(0x01B0)),
    LowerCaseMapping::new(0x01B1, 0x01B2, LowerOp::Add(217)),
    LowerCaseMapping::new(0x01B3, 0x01B5, LowerOp::Bad),
    LowerCaseMapping::new(0x01B7, 0x01B7, LowerOp::Set(0x0292)),
    LowerCaseMapping::new(0x01B8, 0x01B8, LowerOp::Set(0x01B9)),
    LowerCaseMapping::new(0x01BC, 0x01BC, LowerOp::Set(0x01BD)),
    LowerCaseMapping::new(0x01C4, 0x01C5, LowerOp::Set(0x01C6)),
    LowerCaseMapping::new(0x01C7, 0x01C8, LowerOp::Set(0x01C9)),
    LowerCaseMapping::new(0x01CA, 0x01CB, LowerOp::Set(0x01CC)),
    LowerCaseMapping::new(0x01CD, 0x01DB, LowerOp::Bad),
    LowerCaseMapping::new(0x01DE, 0x01EE, LowerOp::Bor),
    LowerCaseMapping::new(0x01F1, 0x01F2, LowerOp::Set(0x01F3)),
    LowerCaseMapping::new(0x01F4, 0x01F4, LowerOp::Set(0x01F5)),
    LowerCaseMapping::new(0x01F6, 0x01F6, LowerOp::Set(0x0195)),
    LowerCaseMapping::new(0x01F7, 0x01F7, LowerOp::Set(0x01BF)),
    LowerCaseMapping::new(0x01F8, 0x021E, LowerOp::Bor),
    LowerCaseMapping::new(0x0220, 0x0220, LowerOp::Set(0x019E)),
    LowerCaseMapping::new(0x0222, 0x0232, LowerOp::Bor),
    LowerCaseMapping::new(0x023A, 0x023A, LowerOp::Set(0x2C65)),
    LowerCaseMapping::new(0x023B, 0x023B, LowerOp::Set(0x023C)),
    LowerCaseMapping::new(0x023D, 0x023D, LowerOp::Set(0x019A)),
    LowerCaseMapping::new(0x023E, 0x023E, LowerOp::Set(0x2C66)),
    LowerCaseMapping::new(0x0241, 0x0241, LowerOp::Set(0x0242)),
    LowerCaseMapping::new(0x0243, 0x0243, LowerOp::Set(0x0180)),
    LowerCaseMapping::new(0x0244, 0x0244, LowerOp::Set(0x0289)),
    LowerCaseMapping::new(0x0245, 0x0245, LowerOp::Set(0x028C)),
    LowerCaseMapping::new(0x0246, 0x024E, LowerOp::Bor),
    LowerCaseMapping::new(0x0370, 0x0372, LowerOp::Bor),
    LowerCaseMapping::new(0x0376, 0x0376, LowerOp::Set(0x0377)),
    LowerCaseMapping::new(0x037F, 0x037F, LowerOp::Set(0x03F3)),
    LowerCaseMapping::new(0x0386, 0x0386, LowerOp::Set(0x03AC)),
    LowerCaseMapping::new(0x0388, 0x038A, LowerOp::Add(37)),
    LowerCaseMapping::new(0x038C, 0x038C, LowerOp::Set(0x03CC)),
    LowerCaseMapping::new(0x038E, 0x038F, LowerOp::Add(63)),
    LowerCaseMapping::new(0x0391, 0x03A1, LowerOp::Add(32)),
    LowerCaseMapping::new(0x03A3, 0x03AB, LowerOp::Add(32)),
    LowerCaseMapping::new(0x03CF, 0x03CF, LowerOp::Set(0x03D7)),
    LowerCaseMapping::new(0x03D8, 0x03EE, LowerOp::Bor),
    LowerCaseMapping::new(0x03F4, 0x03F4, LowerOp::Set(0x03B8)),
    LowerCaseMapping::new(0x03F7, 0x03F7, LowerOp::Set(0x03F8)),
    LowerCaseMapping::new(0x03F9, 0x03F9, LowerOp::Set(0x03F2)),
    LowerCaseMapping::new(0x03FA, 0x03FA, LowerOp::Set(0x03FB)),
    LowerCaseMapping::new(0x03FD, 0x03FF, LowerOp::Add(-130)),
    LowerCaseMapping::new(0x0400, 0x040F, LowerOp::Add(80)),
    LowerCaseMapping::new(0x0410, 0x042F, LowerOp::Add(32)),
    LowerCaseMapping::new(0x0460, 0x0480, LowerOp::Bor),
    LowerCaseMapping::new(0x048A, 0x04BE, LowerOp::Bor),
    LowerCaseMapping::new(0x04C0, 0x04C0, LowerOp::Set(0x04CF)),
    LowerCaseMapping::new(0x04C1, 0x04CD, LowerOp::Bad),
    LowerCaseMapping::new(0x04D0, 0x052E, LowerOp::Bor),
    LowerCaseMapping::new(0x0531, 0x0556, LowerOp::Add(48)),
    LowerCaseMapping::new(0x10A0, 0x10C5, LowerOp::Add(7264)),
    LowerCaseMapping::new(0x10C7, 0x10C7, LowerOp::Set(0x2D27)),
    LowerCaseMapping::new(0x10CD, 0x10CD, LowerOp::Set(0x2D2D)),
    LowerCaseMapping::new(0x13A0, 0x13EF, LowerOp::Add(38864)),
    LowerCaseMapping::new(0x13F0, 0x13F5, LowerOp::Add(8)),
    LowerCaseMapping::new(0x1C90, 0x1CBA, LowerOp::Add(-3008)),
    LowerCaseMapping::new(0x1CBD, 0x1CBF, LowerOp::Add(-3008)),
    LowerCaseMapping::new(0x1E00, 0x1E94, LowerOp::Bor),
    LowerCaseMapping::new(0x1E9E, 0x1E9E, LowerOp::Set(0x00DF)),
    LowerCaseMapping::new(0x1EA0, 0x1EFE, LowerOp::Bor),
    LowerCaseMapping::new(0x1F08, 0x1F0F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F18, 0x1F1D, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F28, 0x1F2F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F38, 0x1F3F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F48, 0x1F4D, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F59, 0x1F59, LowerOp::Set(0x1F51)),
    LowerCaseMapping::new(0x1F5B, 0x1F5B, LowerOp::Set(0x1F53)),
    LowerCaseMapping::new(0x1F5D, 0x1F5D, LowerOp::Set(0x1F55)),
    LowerCaseMapping::new(0x1F5F, 0x1F5F, LowerOp::Set(0x1F57)),
    LowerCaseMapping::new(0x1F68, 0x1F6F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F88, 0x1F8F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1F98, 0x1F9F, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1FA8, 0x1FAF, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1FB8, 0x1FB9, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1FBA, 0x1FBB, LowerOp::Add(-74)),
    LowerCaseMapping::new(0x1FBC, 0x1FBC, LowerOp::Set(0x1FB3)),
    LowerCaseMapping::new(0x1FC8, 0x1FCB, LowerOp::Add(-86)),
    LowerCaseMapping::new(0x1FCC, 0x1FCC, LowerOp::Set(0x1FC3)),
    LowerCaseMapping::new(0x1FD8, 0x1FD9, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1FDA, 0x1FDB, LowerOp::Add(-100)),
    LowerCaseMapping::new(0x1FE8, 0x1FE9, LowerOp::Add(-8)),
    LowerCaseMapping::new(0x1FEA, 0x1FEB, LowerOp::Add(-112)),
    LowerCaseMapping::new(0x1FEC, 0x1FEC, LowerOp::Set(0x1FE5)),
    LowerCaseMapping::new(0x1FF8, 0x1FF9, LowerOp::Add(-128)),
    LowerCaseMapping::new(0x1FFA, 0x1FFB, LowerOp::Add(-126)),
    LowerCaseMapping::new(0x1FFC, 0x1FFC, LowerOp::Set(0x1FF3)),
    LowerCaseMapping::new(0x2126, 0x2126, LowerOp::Set(0x03C9)),
    LowerCaseMapping::new(0x212A, 0x212A, LowerOp::Set(0x006B)),
    LowerCaseMapping::new(0x212B, 0x212B, LowerOp::Set(0x00E5)),
    LowerCaseMapping::new(0x2132, 0x2132, LowerOp::Set(0x214E)),
    LowerCaseMapping::new(0x2160, 0x216F, LowerOp::Add(16)),
    LowerCaseMapping::new(0x2183, 0x2183, LowerOp::Set(0x2184)),
    LowerCaseMapping::new(0x24B6, 0x24CF, LowerOp::Add(26)),
    LowerCaseMapping::new(0x2C00, 0x2C2F, LowerOp::Add(48)),
    LowerCaseMapping::new(0x2C60, 0x2C60, LowerOp::Set(0x2C61)),
    LowerCaseMapping::new(0x2C62, 0x2C62, LowerOp::Set(0x026B)),
    LowerCaseMapping::new(0x2C63, 0x2C63, LowerOp::Set(0x1D7D)),
    LowerCaseMapping::new(0x2C64, 0x2C64, LowerOp::Set(0x027D)),
    LowerCaseMapping::new(0x2C67, 0x2C6B, LowerOp::Bad),
    LowerCaseMapping::new(0x2C6D, 0x2C6D, LowerOp::Set(0x0251)),
    LowerCaseMapping::new(0x2C6E, 0x2C6E, LowerOp::Set(0x0271)),
    LowerCaseMapping::new(0x2C6F, 0x2C6F, LowerOp::Set(0x0250)),
    LowerCaseMapping::new(0x2C70, 0x2C70, LowerOp::Set(0x0252)),
    LowerCaseMapping::new(0x2C72, 0x2C72, LowerOp::Set(0x2C73)),
    LowerCaseMapping::new(0x2C75, 0x2C75, LowerOp::Set(0x2C76)),
    LowerCaseMapping::new(0x2C7E, 0x2C7F, LowerOp::Add(-10815)),
    LowerCaseMapping::new(0x2C80, 0x2CE2, LowerOp::Bor),
    LowerCaseMapping::new(0x2CEB, 0x2CED, LowerOp::Bad),
    LowerCaseMapping::new(0x2CF2, 0x2CF2, LowerOp::Set(0x2CF3)),
    LowerCaseMapping::new(0xA640, 0xA66C, LowerOp::Bor),
    LowerCaseMapping::new(0xA680, 0xA69A, LowerOp::Bor),
    LowerCaseMapping::new(0xA722, 0xA72E, LowerOp::Bor),
    LowerCaseMapping::new(0xA732, 0xA76E, LowerOp::Bor),
    LowerCaseMapping::new(0xA779, 0xA77B, LowerOp::Bad),
    LowerCaseMapping::new(0xA77D, 0xA77D, LowerOp::Set(0x1D79)),
    LowerCaseMapping::new(0xA77E, 0xA786, LowerOp::Bor),
    LowerCaseMapping::new(0xA78B, 0xA78B, LowerOp::Set(0xA78C)),
    LowerCaseMapping::new(0xA78D, 0xA78D, LowerOp::Set(0x0265)),
    LowerCaseMapping::new(0xA790, 0xA792, LowerOp::Bor),
    LowerCaseMapping::new(0xA796, 0xA7A8, LowerOp::Bor),
    LowerCaseMapping::new(0xA7AA, 0xA7AA, LowerOp::Set(0x0266)),
    LowerCaseMapping::new(0xA7AB, 0xA7AB, LowerOp::Set(0x025C)),
    LowerCaseMapping::new(0xA7AC, 0xA7AC, LowerOp::Set(0x0261)),
    LowerCaseMapping::new(0xA7AD, 0xA7AD, LowerOp::Set(0x026C)),
    LowerCaseMapping::new(0xA7AE, 0xA7AE, LowerOp::Set(0x026A)),
    LowerCaseMapping::new(0xA7B0, 0xA7B0, LowerOp::Set(0x029E)),
    LowerCaseMapping::new(0xA7B1, 0xA7B1, LowerOp::Set(0x0287)),
    LowerCaseMapping::new(0xA7B2, 0xA7B2, LowerOp::Set(0x029D)),
    LowerCaseMapping::new(0xA7B3, 0xA7B3, LowerOp::Set(0xAB53)),
    LowerCaseMapping::new(0xA7B4, 0xA7C2, LowerOp::Bor),
    LowerCaseMapping::new(0xA7C4, 0xA7C4, LowerOp::Set(0xA794)),
    LowerCaseMapping::new(0xA7C5, 0xA7C5, LowerOp::Set(0x0282)),
    LowerCaseMapping::new(0xA7C6, 0xA7C6, LowerOp::Set(0x1D8E)),
    LowerCaseMapping::new(0xA7C7, 0xA7C9, LowerOp::Bad),
    LowerCaseMapping::new(0xA7D0, 0xA7D0, LowerOp::Set(0xA7D1)),
    LowerCaseMapping::new(0xA7D6, 0xA7D8, LowerOp::Bor),
    LowerCaseMapping::new(0xA7F5, 0xA7F5, LowerOp::Set(0xA7F6)),
    LowerCaseMapping::new(0xFF21, 0xFF3A, LowerOp::Add(32)),
    LowerCaseMapping::new(0x10400, 0x10427, LowerOp::Add(40)),
    LowerCaseMapping::new(0x104B0, 0x104D3, LowerOp::Add(40)),
    LowerCaseMapping::new(0x10570, 0x1057A, LowerOp::Add(39)),
    LowerCaseMapping::new(0x1057C, 0x1058A, LowerOp::Add(39)),
    LowerCaseMapping::new(0x1058C, 0x10592, LowerOp::Add(39)),
    LowerCaseMapping::new(0x10594, 0x10595, LowerOp::Add(39)),
    LowerCaseMapping::new(0x10C80, 0x10CB2, LowerOp::Add(64)),
    LowerCaseMapping::new(0x118A0, 0x118BF, LowerOp::Add(32)),
    LowerCaseMapping::new(0x16E40, 0x16E5F, LowerOp::Add(32)),
    LowerCaseMapping::new(0x1E900, 0x1E921, LowerOp::Add(34)),
];

/// Index of the first interval whose upper bound is `>= cp`.
#[inline]
fn first_interval_ending_at_or_after(cp: u32) -> usize {
    LC_TABLE.partition_point(|lc| lc.max < cp)
}

/// Lowercase a single character with the invariant table.
#[inline]
pub fn to_lower(ch: char) -> char {
    let cp = ch as u32;
    if cp < 0x80 {
        return ch.to_ascii_lowercase();
    }
    let i = first_interval_ending_at_or_after(cp);
    match LC_TABLE.get(i) {
        Some(lc) if lc.min <= cp => char::from_u32(lc.apply(cp)).unwrap_or(ch),
        _ => ch,
    }
}

/// Lowercase every character of `s`.
pub fn lower_str(s: &str) -> String {
    s.chars().map(to_lower).collect()
}

/// Add the lowercase image of `[min, max]` to `class`.
pub(super) fn add_lowercase_range(class: &mut CharClass, min: u32, max: u32) {
    let mut i = first_interval_ending_at_or_after(min);
    while let Some(lc) = LC_TABLE.get(i) {
        if lc.min > max {
            break;
        }
        let lo = lc.min.max(min);
        let hi = lc.max.min(max);
        let (lo_t, hi_t) = (lc.apply(lo), lc.apply(hi));
        if lo_t < min || hi_t > max {
            class.add_range_raw(lo_t, hi_t);
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_disjoint() {
        for pair in LC_TABLE.windows(2) {
            assert!(pair[0].min <= pair[0].max);
            assert!(pair[0].max < pair[1].min);
        }
    }

    #[test]
    fn test_to_lower() {
        assert_eq!(to_lower('A'), 'a');
        assert_eq!(to_lower('z'), 'z');
        assert_eq!(to_lower('\u{00C9}'), '\u{00E9}');
        assert_eq!(to_lower('\u{0130}'), 'i');
        assert_eq!(to_lower('\u{0100}'), '\u{0101}');
        assert_eq!(to_lower('\u{0101}'), '\u{0101}');
        assert_eq!(to_lower('\u{0139}'), '\u{013A}');
        assert_eq!(to_lower('\u{0391}'), '\u{03B1}');
        assert_eq!(to_lower('\u{0416}'), '\u{0436}');
        assert_eq!(to_lower('1'), '1');
    }

    #[test]
    fn test_matches_std_single_char_lowercase() {
        for cp in 0..0x3000u32 {
            let Some(ch) = char::from_u32(cp) else { continue };
            let mut std_lower = ch.to_lowercase();
            let first = std_lower.next().unwrap_or(ch);
            assert_eq!(to_lower(ch), first, "mismatch at U+{:04X}", cp);
        }
    }
}
