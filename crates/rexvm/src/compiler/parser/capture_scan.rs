// Capture-numbering pre-pass.
//
// Explicitly numbered groups keep their numbers, unnamed groups count up
// from 1, and named groups take the lowest unused numbers after that in
// order of appearance.

use smol_str::SmolStr;

use super::{ParseResult, Parser};
use crate::char_class::is_word_char;
use crate::regex_options::RegexOptions;

impl Parser {
    pub(super) fn count_captures(&mut self) -> ParseResult<()> {
        self.note_capture_slot(0, 0);
        self.autocap = 1;

        while self.chars_right() > 0 {
            let pos = self.textpos() as i32;
            match self.move_right_get_char() {
                '\\' => {
                    if self.chars_right() > 0 {
                        self.move_right();
                    }
                }
                '#' => {
                    if self.use_option_x() {
                        self.move_left();
                        self.scan_blank()?;
                    }
                }
                '[' => {
                    self.scan_char_class(false, true)?;
                }
                ')' => {
                    if !self.options_stack.is_empty() {
                        self.pop_options();
                    }
                }
                '(' => {
                    if self.chars_right() >= 2
                        && self.right_char() == '?'
                        && self.right_char_at(1) == '#'
                    {
                        self.move_left();
                        self.scan_blank()?;
                    } else {
                        self.push_options();
                        if self.chars_right() > 0 && self.right_char() == '?' {
                            self.move_right();
                            if self.chars_right() > 1
                                && (self.right_char() == '<' || self.right_char() == '\'')
                            {
                                // (?<name> or (?'name'
                                self.move_right();
                                let ch = self.right_char();
                                if ch != '0' && is_word_char(ch) {
                                    if ('1'..='9').contains(&ch) {
                                        let capnum = self.scan_decimal()?;
                                        self.note_capture_slot(capnum, pos);
                                    } else {
                                        let name = self.scan_capname();
                                        self.note_capture_name(name, pos);
                                    }
                                }
                            } else {
                                self.scan_options();
                                if self.chars_right() > 0 {
                                    if self.right_char() == ')' {
                                        // (?imsx) applies to the enclosing group
                                        self.move_right();
                                        self.pop_keep_options();
                                    } else if self.right_char() == '(' {
                                        // the condition of (?(...)yes|no) does not capture
                                        self.ignore_next_paren = true;
                                        continue;
                                    }
                                }
                            }
                        } else if !self.use_option(RegexOptions::EXPLICIT_CAPTURE)
                            && !self.ignore_next_paren
                        {
                            let capnum = self.autocap;
                            self.autocap += 1;
                            self.note_capture_slot(capnum, pos);
                        }
                    }
                    self.ignore_next_paren = false;
                }
                _ => {}
            }
        }

        self.assign_name_slots();
        Ok(())
    }

    fn note_capture_slot(&mut self, capnum: i32, pos: i32) {
        if self.caps.contains_key(&capnum) {
            return;
        }
        self.caps.insert(capnum, pos);
        self.capcount += 1;
        if self.captop <= capnum {
            self.captop = capnum.saturating_add(1);
        }
    }

    fn note_capture_name(&mut self, name: SmolStr, pos: i32) {
        if self.capnames.contains_key(&name) {
            return;
        }
        self.capnames.insert(name.clone(), pos);
        self.capnamelist.push(name);
        self.has_names = true;
    }

    /// Numbers named groups, then builds the slot-ordered name list.
    fn assign_name_slots(&mut self) {
        for i in 0..self.capnamelist.len() {
            while self.is_capture_slot(self.autocap) {
                self.autocap += 1;
            }
            let name = self.capnamelist[i].clone();
            let pos = self.capnames[&name];
            self.capnames.insert(name, self.autocap);
            self.note_capture_slot(self.autocap, pos);
            self.autocap += 1;
        }

        if self.capcount < self.captop {
            // BTreeMap keys are already sorted
            self.capnumlist = Some(self.caps.keys().copied().collect());
        }

        if !self.has_names && self.capnumlist.is_none() {
            return;
        }

        let named = std::mem::take(&mut self.capnamelist);
        let mut named_iter = named.iter().peekable();
        let mut slot_names = Vec::with_capacity(self.capcount as usize);
        let numbers: Vec<i32> = match &self.capnumlist {
            Some(list) => list.clone(),
            None => (0..self.capcount).collect(),
        };
        for capnum in numbers {
            let next = named_iter.peek().map(|name| self.capnames[*name]);
            if next == Some(capnum) {
                if let Some(name) = named_iter.next() {
                    slot_names.push(name.clone());
                }
            } else {
                let name = SmolStr::new(capnum.to_string());
                self.capnames.insert(name.clone(), capnum);
                slot_names.push(name);
            }
        }
        self.capnamelist = slot_names;
        self.has_names = true;
    }

    pub(super) fn is_capture_slot(&self, capnum: i32) -> bool {
        self.caps.contains_key(&capnum)
    }

    pub(super) fn capture_slot_from_name(&self, name: &str) -> Option<i32> {
        self.capnames.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counted(pattern: &str) -> Parser {
        let mut p = Parser::new(pattern, RegexOptions::empty());
        p.count_captures().unwrap();
        p
    }

    #[test]
    fn test_unnamed_groups() {
        let p = counted("(a)(?:b)(c)");
        assert_eq!(p.captop, 3);
        assert_eq!(p.capcount, 3);
        assert!(p.capnumlist.is_none());
        assert!(!p.has_names);
    }

    #[test]
    fn test_named_after_numbered() {
        let p = counted("(?<x>a)(b)(?<y>c)");
        assert_eq!(p.capture_slot_from_name("x"), Some(2));
        assert_eq!(p.capture_slot_from_name("y"), Some(3));
        assert_eq!(p.capnamelist, vec!["0", "1", "x", "y"]);
    }

    #[test]
    fn test_sparse_numbers() {
        let p = counted("(?<5>a)(b)");
        assert_eq!(p.captop, 6);
        assert_eq!(p.capnumlist, Some(vec![0, 1, 5]));
        assert_eq!(p.capnamelist, vec!["0", "1", "5"]);
    }

    #[test]
    fn test_condition_paren_not_counted() {
        let p = counted("(?(a)b|c)(d)");
        assert_eq!(p.captop, 2);
        let p = counted("[(]\\((x)");
        assert_eq!(p.captop, 2);
    }
}
