// Named Unicode blocks accepted by `\p{IsName}`. Ranges are half-open.

#[rustfmt::skip]
static BLOCKS: &[(&str, u32, u32)] = &[
    ("IsAlphabeticPresentationForms", 0xFB00, 0xFB50),
    ("IsArabic", 0x0600, 0x0700),
    ("IsArabicPresentationForms-A", 0xFB50, 0xFE00),
    ("IsArabicPresentationForms-B", 0xFE70, 0xFF00),
    ("IsArmenian", 0x0530, 0x0590),
    ("IsArrows", 0x2190, 0x2200),
    ("IsBasicLatin", 0x0000, 0x0080),
    ("IsBengali", 0x0980, 0x0A00),
    ("IsBlockElements", 0x2580, 0x25A0),
    ("IsBopomofo", 0x3100, 0x3130),
    ("IsBopomofoExtended", 0x31A0, 0x31C0),
    ("IsBoxDrawing", 0x2500, 0x2580),
    ("IsBraillePatterns", 0x2800, 0x2900),
    ("IsBuhid", 0x1740, 0x1760),
    ("IsCJKCompatibility", 0x3300, 0x3400),
    ("IsCJKCompatibilityForms", 0xFE30, 0xFE50),
    ("IsCJKCompatibilityIdeographs", 0xF900, 0xFB00),
    ("IsCJKRadicalsSupplement", 0x2E80, 0x2F00),
    ("IsCJKSymbolsandPunctuation", 0x3000, 0x3040),
    ("IsCJKUnifiedIdeographs", 0x4E00, 0xA000),
    ("IsCJKUnifiedIdeographsExtensionA", 0x3400, 0x4DC0),
    ("IsCherokee", 0x13A0, 0x1400),
    ("IsCombiningDiacriticalMarks", 0x0300, 0x0370),
    ("IsCombiningDiacriticalMarksforSymbols", 0x20D0, 0x2100),
    ("IsCombiningHalfMarks", 0xFE20, 0xFE30),
    ("IsCombiningMarksforSymbols", 0x20D0, 0x2100),
    ("IsControlPictures", 0x2400, 0x2440),
    ("IsCurrencySymbols", 0x20A0, 0x20D0),
    ("IsCyrillic", 0x0400, 0x0500),
    ("IsCyrillicSupplement", 0x0500, 0x0530),
    ("IsDevanagari", 0x0900, 0x0980),
    ("IsDingbats", 0x2700, 0x27C0),
    ("IsEnclosedAlphanumerics", 0x2460, 0x2500),
    ("IsEnclosedCJKLettersandMonths", 0x3200, 0x3300),
    ("IsEthiopic", 0x1200, 0x1380),
    ("IsGeneralPunctuation", 0x2000, 0x2070),
    ("IsGeometricShapes", 0x25A0, 0x2600),
    ("IsGeorgian", 0x10A0, 0x1100),
    ("IsGreek", 0x0370, 0x0400),
    ("IsGreekExtended", 0x1F00, 0x2000),
    ("IsGreekandCoptic", 0x0370, 0x0400),
    ("IsGujarati", 0x0A80, 0x0B00),
    ("IsGurmukhi", 0x0A00, 0x0A80),
    ("IsHalfwidthandFullwidthForms", 0xFF00, 0xFFF0),
    ("IsHangulCompatibilityJamo", 0x3130, 0x3190),
    ("IsHangulJamo", 0x1100, 0x1200),
    ("IsHangulSyllables", 0xAC00, 0xD7B0),
    ("IsHanunoo", 0x1720, 0x1740),
    ("IsHebrew", 0x0590, 0x0600),
    ("IsHighPrivateUseSurrogates", 0xDB80, 0xDC00),
    ("IsHighSurrogates", 0xD800, 0xDB80),
    ("IsHiragana", 0x3040, 0x30A0),
    ("IsIPAExtensions", 0x0250, 0x02B0),
    ("IsIdeographicDescriptionCharacters", 0x2FF0, 0x3000),
    ("IsKanbun", 0x3190, 0x31A0),
    ("IsKangxiRadicals", 0x2F00, 0x2FE0),
    ("IsKannada", 0x0C80, 0x0D00),
    ("IsKatakana", 0x30A0, 0x3100),
    ("IsKatakanaPhoneticExtensions", 0x31F0, 0x3200),
    ("IsKhmer", 0x1780, 0x1800),
    ("IsKhmerSymbols", 0x19E0, 0x1A00),
    ("IsLao", 0x0E80, 0x0F00),
    ("IsLatin-1Supplement", 0x0080, 0x0100),
    ("IsLatinExtended-A", 0x0100, 0x0180),
    ("IsLatinExtended-B", 0x0180, 0x0250),
    ("IsLatinExtendedAdditional", 0x1E00, 0x1F00),
    ("IsLetterlikeSymbols", 0x2100, 0x2150),
    ("IsLimbu", 0x1900, 0x1950),
    ("IsLowSurrogates", 0xDC00, 0xE000),
    ("IsMalayalam", 0x0D00, 0x0D80),
    ("IsMathematicalOperators", 0x2200, 0x2300),
    ("IsMiscellaneousMathematicalSymbols-A", 0x27C0, 0x27F0),
    ("IsMiscellaneousMathematicalSymbols-B", 0x2980, 0x2A00),
    ("IsMiscellaneousSymbols", 0x2600, 0x2700),
    ("IsMiscellaneousSymbolsandArrows", 0x2B00, 0x2C00),
    ("IsMiscellaneousTechnical", 0x2300, 0x2400),
    ("IsMongolian", 0x1800, 0x18B0),
    ("IsMyanmar", 0x1000, 0x10A0),
    ("IsNumberForms", 0x2150, 0x2190),
    ("IsOgham", 0x1680, 0x16A0),
    ("IsOpticalCharacterRecognition", 0x2440, 0x2460),
    ("IsOriya", 0x0B00, 0x0B80),
    ("IsPhoneticExtensions", 0x1D00, 0x1D80),
    ("IsPrivateUse", 0xE000, 0xF900),
    ("IsPrivateUseArea", 0xE000, 0xF900),
    ("IsRunic", 0x16A0, 0x1700),
    ("IsSinhala", 0x0D80, 0x0E00),
    ("IsSmallFormVariants", 0xFE50, 0xFE70),
    ("IsSpacingModifierLetters", 0x02B0, 0x0300),
    ("IsSpecials", 0xFFF0, 0x10000),
    ("IsSuperscriptsandSubscripts", 0x2070, 0x20A0),
    ("IsSupplementalArrows-A", 0x27F0, 0x2800),
    ("IsSupplementalArrows-B", 0x2900, 0x2980),
    ("IsSupplementalMathematicalOperators", 0x2A00, 0x2B00),
    ("IsSyriac", 0x0700, 0x0750),
    ("IsTagalog", 0x1700, 0x1720),
    ("IsTagbanwa", 0x1760, 0x1780),
    ("IsTaiLe", 0x1950, 0x1980),
    ("IsTamil", 0x0B80, 0x0C00),
    ("IsTelugu", 0x0C00, 0x0C80),
    ("IsThaana", 0x0780, 0x07C0),
    ("IsThai", 0x0E00, 0x0E80),
    ("IsTibetan", 0x0F00, 0x1000),
    ("IsUnifiedCanadianAboriginalSyllabics", 0x1400, 0x1680),
    ("IsVariationSelectors", 0xFE00, 0xFE10),
    ("IsYiRadicals", 0xA490, 0xA4D0),
    ("IsYiSyllables", 0xA000, 0xA490),
    ("IsYijingHexagramSymbols", 0x4DC0, 0x4E00),
];

/// Inclusive code-point range of a named block.
pub fn lookup(name: &str) -> Option<(u32, u32)> {
    BLOCKS
        .binary_search_by(|(n, _, _)| n.cmp(&name))
        .ok()
        .map(|i| (BLOCKS[i].1, BLOCKS[i].2 - 1))
}

/// Name of the first block whose range is exactly `[first, last]`.
pub fn name_of(first: u32, last: u32) -> Option<&'static str> {
    BLOCKS
        .iter()
        .find(|(_, lo, hi)| *lo == first && *hi == last + 1)
        .map(|(n, _, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_sorted_for_binary_search() {
        for pair in BLOCKS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("IsGreek"), Some((0x0370, 0x03FF)));
        assert_eq!(lookup("IsBasicLatin"), Some((0, 0x7F)));
        assert_eq!(lookup("IsKlingon"), None);
    }
}
