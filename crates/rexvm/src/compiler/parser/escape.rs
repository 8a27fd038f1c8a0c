// Backslash sequences, numbers and names inside patterns, plus the public
// escape/unescape helpers.

use smol_str::SmolStr;

use super::{ParseResult, Parser, is_metachar};
use crate::char_class::{CharClass, ClassCode, is_word_char, to_lower};
use crate::compiler::node::{CharTest, NodeId, NodeKind};
use crate::regex_error::{ParseError, ParseErrorKind};
use crate::regex_limits::{
    HEX_ESCAPE_DIGITS, MAX_DECIMAL, MAX_OCTAL_DIGITS, UNICODE_ESCAPE_DIGITS,
};
use crate::regex_options::RegexOptions;

/// Escapes the minimal set of characters (`\`, `*`, `+`, `?`, `|`, `{`,
/// `[`, `(`, `)`, `^`, `$`, `.`, `#` and whitespace) so that `input` is
/// matched literally.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if !is_metachar(ch) {
            out.push(ch);
            continue;
        }
        out.push('\\');
        out.push(match ch {
            '\n' => 'n',
            '\r' => 'r',
            '\t' => 't',
            '\x0C' => 'f',
            _ => ch,
        });
    }
    out
}

/// Replaces escape sequences in `input` with the characters they denote.
/// A trailing lone backslash is dropped.
pub fn unescape(input: &str) -> Result<String, ParseError> {
    if !input.contains('\\') {
        return Ok(input.to_string());
    }
    let mut parser = Parser::new(input, RegexOptions::empty());
    let mut out = String::with_capacity(input.len());
    while parser.chars_right() > 0 {
        let ch = parser.move_right_get_char();
        if ch != '\\' {
            out.push(ch);
        } else if parser.chars_right() > 0 {
            out.push(parser.scan_char_escape()?);
        }
    }
    Ok(out)
}

impl Parser {
    /// Scans what follows a `\` outside a character class.
    pub(super) fn scan_backslash(&mut self) -> ParseResult<NodeId> {
        if self.chars_right() == 0 {
            return Err(self.error(ParseErrorKind::IllegalEndEscape));
        }
        let ecma = self.use_option_e();
        let ch = self.right_char();
        let kind = match ch {
            'b' if ecma => NodeKind::EcmaBoundary,
            'b' => NodeKind::Boundary,
            'B' if ecma => NodeKind::NonEcmaBoundary,
            'B' => NodeKind::Nonboundary,
            'A' => NodeKind::Beginning,
            'G' => NodeKind::Start,
            'Z' => NodeKind::EndZ,
            'z' => NodeKind::End,
            'w' | 'W' => NodeKind::Char(CharTest::Set(ClassCode::word(ecma, ch == 'W'))),
            's' | 'S' => NodeKind::Char(CharTest::Set(ClassCode::space(ecma, ch == 'S'))),
            'd' | 'D' => NodeKind::Char(CharTest::Set(ClassCode::digit(ecma, ch == 'D'))),
            'p' | 'P' => {
                self.move_right();
                let name = self.parse_property()?;
                let mut cc = CharClass::new();
                let ci = self.use_option_i();
                cc.add_category_from_name(&name, ch == 'P', ci)
                    .map_err(|kind| self.error(kind))?;
                if ci {
                    cc.add_lowercase();
                }
                return Ok(self.ast.add(NodeKind::Char(CharTest::Set(cc.to_code())), self.options));
            }
            _ => return self.scan_basic_backslash(),
        };
        self.move_right();
        Ok(self.ast.add(kind, self.options))
    }

    /// Back-references (`\1`, `\k<name>`, `\<name>`) and character escapes.
    fn scan_basic_backslash(&mut self) -> ParseResult<NodeId> {
        let backpos = self.textpos();
        let mut ch = self.right_char();
        let mut angled = false;
        let mut close = '\0';

        if ch == 'k' {
            if self.chars_right() >= 2 {
                self.move_right();
                ch = self.move_right_get_char();
                if ch == '<' || ch == '\'' {
                    angled = true;
                    close = if ch == '\'' { '\'' } else { '>' };
                }
            }
            if !angled || self.chars_right() == 0 {
                return Err(self.error(ParseErrorKind::MalformedNameRef));
            }
            ch = self.right_char();
        } else if (ch == '<' || ch == '\'') && self.chars_right() > 1 {
            angled = true;
            close = if ch == '\'' { '\'' } else { '>' };
            self.move_right();
            ch = self.right_char();
        }

        if angled && ch.is_ascii_digit() {
            let capnum = self.scan_decimal()?;
            if self.chars_right() > 0 && self.move_right_get_char() == close {
                if self.is_capture_slot(capnum) {
                    return Ok(self.ast.add(NodeKind::Ref(capnum), self.options));
                }
                return Err(self.error(ParseErrorKind::UndefinedBackref(capnum)));
            }
        } else if !angled && ('1'..='9').contains(&ch) {
            if self.use_option_e() {
                // longest prefix naming a group opened before this reference
                let mut capnum = -1;
                let mut newcapnum = ch as i32 - '0' as i32;
                let pos = self.textpos() as i32 - 1;
                while newcapnum <= self.captop {
                    if self.is_capture_slot(newcapnum)
                        && self.caps.get(&newcapnum).is_none_or(|&open| open < pos)
                    {
                        capnum = newcapnum;
                    }
                    self.move_right();
                    if self.chars_right() == 0 || !self.right_char().is_ascii_digit() {
                        break;
                    }
                    let Some(next) = newcapnum
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(self.right_char() as i32 - '0' as i32))
                    else {
                        break;
                    };
                    newcapnum = next;
                }
                if capnum >= 0 {
                    return Ok(self.ast.add(NodeKind::Ref(capnum), self.options));
                }
            } else {
                let capnum = self.scan_decimal()?;
                if self.is_capture_slot(capnum) {
                    return Ok(self.ast.add(NodeKind::Ref(capnum), self.options));
                }
                if capnum <= 9 {
                    return Err(self.error(ParseErrorKind::UndefinedBackref(capnum)));
                }
            }
        } else if angled && is_word_char(ch) {
            let capname = self.scan_capname();
            if self.chars_right() > 0 && self.move_right_get_char() == close {
                return match self.capture_slot_from_name(&capname) {
                    Some(capnum) => Ok(self.ast.add(NodeKind::Ref(capnum), self.options)),
                    None => Err(self.error(ParseErrorKind::UndefinedNameRef(capname.to_string()))),
                };
            }
        }

        // not a reference: an escaped character
        self.textto(backpos);
        let mut ch = self.scan_char_escape()?;
        if self.use_option_i() {
            ch = to_lower(ch);
        }
        Ok(self.ast.add(NodeKind::Char(CharTest::One(ch)), self.options))
    }

    /// Scans a single escaped character; the backslash is already consumed.
    pub(super) fn scan_char_escape(&mut self) -> ParseResult<char> {
        let ch = self.move_right_get_char();
        if ('0'..='7').contains(&ch) {
            self.move_left();
            return Ok(self.scan_octal());
        }
        Ok(match ch {
            'x' => self.scan_hex(HEX_ESCAPE_DIGITS)?,
            'u' => self.scan_hex(UNICODE_ESCAPE_DIGITS)?,
            'a' => '\x07',
            'b' => '\x08',
            'e' => '\x1B',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            'c' => self.scan_control()?,
            _ if !self.use_option_e() && is_word_char(ch) => {
                return Err(self.error(ParseErrorKind::UnrecognizedEscape(ch)));
            }
            _ => ch,
        })
    }

    /// Up to three octal digits; values above 0xFF lose their high bits.
    fn scan_octal(&mut self) -> char {
        let digits = MAX_OCTAL_DIGITS.min(self.chars_right());
        let mut value: u32 = 0;
        for _ in 0..digits {
            let Some(d) = self.right_char().to_digit(8) else {
                break;
            };
            self.move_right();
            value = value * 8 + d;
            if self.use_option_e() && value >= 0x20 {
                break;
            }
        }
        char::from(value as u8)
    }

    fn scan_hex(&mut self, digits: usize) -> ParseResult<char> {
        let mut value: u32 = 0;
        let mut remaining = digits;
        if self.chars_right() >= digits {
            while remaining > 0 {
                let Some(d) = self.move_right_get_char().to_digit(16) else {
                    break;
                };
                value = value * 16 + d;
                remaining -= 1;
            }
        }
        if remaining > 0 {
            return Err(self.error(ParseErrorKind::TooFewHex));
        }
        // lone surrogates have no char representation
        char::from_u32(value).ok_or_else(|| self.error(ParseErrorKind::UnrecognizedEscape('u')))
    }

    /// `\cX`: the control character for letter `X`.
    fn scan_control(&mut self) -> ParseResult<char> {
        if self.chars_right() == 0 {
            return Err(self.error(ParseErrorKind::MissingControl));
        }
        let ch = self.move_right_get_char().to_ascii_uppercase();
        match (ch as u32).checked_sub('@' as u32) {
            Some(code) if code < ' ' as u32 => Ok(char::from(code as u8)),
            _ => Err(self.error(ParseErrorKind::UnrecognizedControl)),
        }
    }

    /// Decimal digits at the cursor; errors past `i32::MAX`.
    pub(super) fn scan_decimal(&mut self) -> ParseResult<i32> {
        let mut value: i32 = 0;
        while self.chars_right() > 0 {
            let Some(d) = self.right_char().to_digit(10) else {
                break;
            };
            self.move_right();
            let d = d as i32;
            if value > MAX_DECIMAL / 10 || (value == MAX_DECIMAL / 10 && d > MAX_DECIMAL % 10) {
                return Err(self.error(ParseErrorKind::CaptureGroupOutOfRange));
            }
            value = value * 10 + d;
        }
        Ok(value)
    }

    /// A run of word characters.
    pub(super) fn scan_capname(&mut self) -> SmolStr {
        let startpos = self.textpos();
        while self.chars_right() > 0 && is_word_char(self.right_char()) {
            self.move_right();
        }
        self.chars[startpos..self.pos].iter().copied().collect()
    }

    /// `{Name}` after `\p` or `\P`.
    pub(super) fn parse_property(&mut self) -> ParseResult<String> {
        if self.chars_right() < 3 {
            return Err(self.error(ParseErrorKind::IncompleteSlashP));
        }
        if self.move_right_get_char() != '{' {
            return Err(self.error(ParseErrorKind::MalformedSlashP));
        }
        let startpos = self.textpos();
        while self.chars_right() > 0 {
            let ch = self.right_char();
            if !(is_word_char(ch) || ch == '-') {
                break;
            }
            self.move_right();
        }
        let name: String = self.chars[startpos..self.pos].iter().collect();
        if self.chars_right() == 0 || self.move_right_get_char() != '}' {
            return Err(self.error(ParseErrorKind::IncompleteSlashP));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_metachars() {
        assert_eq!(escape("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape("x y\tz\n"), "x\\ y\\tz\\n");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("]}"), "]}");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a\\.b").unwrap(), "a.b");
        assert_eq!(unescape("\\x41\\u0042\\101\\n").unwrap(), "ABA\n");
        assert_eq!(unescape("\\cA").unwrap(), "\x01");
        assert_eq!(unescape("tail\\").unwrap(), "tail");
        assert!(matches!(
            unescape("\\q").unwrap_err().kind,
            ParseErrorKind::UnrecognizedEscape('q')
        ));
        let text = "a+b (c)";
        assert_eq!(unescape(&escape(text)).unwrap(), text);
    }

    #[test]
    fn test_escape_every_metachar() {
        let text = "\\*+?|{[()^$.# \t\n\r\x0C end";
        let escaped = escape(text);
        assert!(!escaped.contains('\n'));
        assert_eq!(unescape(&escaped).unwrap(), text);

        let re = crate::Regex::new(&escaped).unwrap();
        let haystack = format!("xx{}yy", text);
        let m = re.find(&haystack).unwrap().unwrap();
        assert_eq!((m.index(), m.value()), (2, text.to_string()));
        assert!(!re.is_match("*+?|{[()^$.#").unwrap());
    }

    #[test]
    fn test_octal_truncates() {
        assert_eq!(unescape("\\777").unwrap(), "\u{FF}");
    }
}
