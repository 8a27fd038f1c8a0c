use super::{ParseResult, Parser};
use crate::char_class::CharClass;
use crate::regex_error::ParseErrorKind;

impl Parser {
    /// Scans a `[...]` class; the opening bracket is already consumed.
    ///
    /// With `scan_only` nothing is built and the result is an empty class;
    /// the capture pre-pass uses this to step over brackets.
    pub(super) fn scan_char_class(
        &mut self,
        case_insensitive: bool,
        scan_only: bool,
    ) -> ParseResult<CharClass> {
        let mut cc = CharClass::new();
        let mut ch_prev = '\0';
        let mut in_range = false;
        let mut first = true;
        let mut closed = false;

        if self.chars_right() > 0 && self.right_char() == '^' {
            self.move_right();
            if !scan_only {
                cc.set_negated(true);
            }
        }

        while self.chars_right() > 0 {
            let first_char = std::mem::replace(&mut first, false);
            let mut translated = false;
            let mut ch = self.move_right_get_char();

            if ch == ']' {
                if !first_char {
                    closed = true;
                    break;
                }
            } else if ch == '\\' && self.chars_right() > 0 {
                ch = self.move_right_get_char();
                match ch {
                    'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                        if !scan_only {
                            if in_range {
                                return Err(self.error(ParseErrorKind::BadClassInCharRange(ch)));
                            }
                            let ecma = self.use_option_e();
                            let negate = ch.is_ascii_uppercase();
                            match ch.to_ascii_lowercase() {
                                'd' => cc.add_digit(ecma, negate),
                                's' => cc.add_space(ecma, negate),
                                _ => cc.add_word(ecma, negate),
                            }
                        }
                        continue;
                    }
                    'p' | 'P' => {
                        if scan_only {
                            self.parse_property()?;
                        } else {
                            if in_range {
                                return Err(self.error(ParseErrorKind::BadClassInCharRange(ch)));
                            }
                            let name = self.parse_property()?;
                            cc.add_category_from_name(&name, ch == 'P', case_insensitive)
                                .map_err(|kind| self.error(kind))?;
                        }
                        continue;
                    }
                    '-' => {
                        if !scan_only {
                            cc.add_range(ch, ch);
                        }
                        continue;
                    }
                    _ => {
                        self.move_left();
                        ch = self.scan_char_escape()?;
                        translated = true;
                    }
                }
            } else if ch == '[' {
                // POSIX-style [:name:] is skipped over and otherwise ignored
                if self.chars_right() > 0 && self.right_char() == ':' && !in_range {
                    let save_pos = self.textpos();
                    self.move_right();
                    self.scan_capname();
                    if self.chars_right() < 2
                        || self.move_right_get_char() != ':'
                        || self.move_right_get_char() != ']'
                    {
                        self.textto(save_pos);
                    }
                }
            }

            if in_range {
                in_range = false;
                if !scan_only {
                    if ch == '[' && !translated && !first_char {
                        // [a-z-[aeiou]]
                        cc.add_char(ch_prev);
                        let sub = self.scan_char_class(case_insensitive, false)?;
                        cc.add_subtraction(sub);
                        if self.chars_right() > 0 && self.right_char() != ']' {
                            return Err(self.error(ParseErrorKind::SubtractionMustBeLast));
                        }
                    } else {
                        if ch_prev > ch {
                            return Err(self.error(ParseErrorKind::ReversedCharRange));
                        }
                        cc.add_range(ch_prev, ch);
                    }
                }
            } else if self.chars_right() >= 2
                && self.right_char() == '-'
                && self.right_char_at(1) != ']'
            {
                ch_prev = ch;
                in_range = true;
                self.move_right();
            } else if self.chars_right() >= 1
                && ch == '-'
                && !translated
                && self.right_char() == '['
                && !first_char
            {
                // [abc-[b]]
                self.move_right();
                let sub = self.scan_char_class(case_insensitive, scan_only)?;
                if !scan_only {
                    cc.add_subtraction(sub);
                    if self.chars_right() > 0 && self.right_char() != ']' {
                        return Err(self.error(ParseErrorKind::SubtractionMustBeLast));
                    }
                }
            } else if !scan_only {
                cc.add_range(ch, ch);
            }
        }

        if !closed {
            return Err(self.error(ParseErrorKind::UnterminatedBracket));
        }
        if !scan_only && case_insensitive {
            cc.add_lowercase();
        }
        Ok(cc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex_options::RegexOptions;

    fn class(body: &str) -> crate::char_class::ClassCode {
        let mut p = Parser::new(body, RegexOptions::empty());
        p.scan_char_class(false, false).unwrap().to_code()
    }

    #[test]
    fn test_ranges_and_escapes() {
        let c = class("a-c\\d]");
        assert!(c.contains('b'));
        assert!(c.contains('7'));
        assert!(!c.contains('d'));

        let c = class("]a]");
        assert!(c.contains(']'));
        assert!(c.contains('a'));

        let c = class("a\\-z]");
        assert!(c.contains('-'));
        assert!(!c.contains('m'));
    }

    #[test]
    fn test_subtraction() {
        let c = class("a-z-[aeiou]]");
        assert!(c.contains('b'));
        assert!(!c.contains('e'));
        assert!(c.is_subtraction());
    }

    #[test]
    fn test_class_errors() {
        let err = |body: &str| {
            let mut p = Parser::new(body, RegexOptions::empty());
            p.scan_char_class(false, false).unwrap_err().kind
        };
        assert_eq!(err("z-a]"), ParseErrorKind::ReversedCharRange);
        assert_eq!(err("abc"), ParseErrorKind::UnterminatedBracket);
        assert_eq!(err("a-\\d]"), ParseErrorKind::BadClassInCharRange('d'));
        assert_eq!(err("a-z-[e]x]"), ParseErrorKind::SubtractionMustBeLast);
    }
}
