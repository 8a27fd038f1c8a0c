// Pattern parser.
//
// A single left-to-right scanner builds the tree while keeping three open
// nodes: the group being filled, its alternation and the concatenation
// currently receiving units. Opening a group saves the three on a stack;
// closing it folds the concatenation into the alternation, the alternation
// into the group, and makes the group the pending unit of the enclosing
// concatenation.
//
// Capture numbers are assigned in a pre-pass (`count_captures`) so that
// back-references to groups later in the pattern resolve.

mod capture_scan;
mod escape;
mod set_scan;

use std::collections::BTreeMap;

use ahash::AHashMap;
use smol_str::SmolStr;

pub use escape::{escape, unescape};

use crate::char_class::{ClassCode, to_lower};
use crate::compiler::RegexTree;
use crate::compiler::node::{Ast, CharTest, NodeId, NodeKind};
use crate::regex_error::{ParseError, ParseErrorKind};
use crate::regex_limits::INFINITE_REPEAT;
use crate::regex_options::RegexOptions;

type ParseResult<T> = Result<T, ParseError>;

// Character categories of the pattern syntax, ordered so that each class
// includes the ones above it.
const Q: u8 = 5; // quantifier
const S: u8 = 4; // ordinary stopper
const Z: u8 = 3; // ScanBlank stopper
const X: u8 = 2; // whitespace
const E: u8 = 1; // should be escaped

fn category(ch: char) -> u8 {
    match ch {
        '*' | '+' | '?' | '{' => Q,
        '$' | '(' | ')' | '.' | '[' | '\\' | '^' | '|' => S,
        '#' => Z,
        '\t' | '\n' | '\x0C' | '\r' | ' ' => X,
        _ => 0,
    }
}

fn is_special(ch: char) -> bool {
    category(ch) >= S
}

fn is_stopper_x(ch: char) -> bool {
    category(ch) >= X
}

fn is_quantifier(ch: char) -> bool {
    category(ch) >= Q
}

fn is_space(ch: char) -> bool {
    category(ch) == X
}

pub(crate) fn is_metachar(ch: char) -> bool {
    category(ch) >= E
}

/// The three nodes under construction at one nesting level.
#[derive(Debug, Clone, Copy)]
struct Frame {
    group: NodeId,
    alternation: NodeId,
    concatenation: NodeId,
}

pub struct Parser {
    pattern: String,
    chars: Vec<char>,
    pos: usize,

    options: RegexOptions,
    options_stack: Vec<RegexOptions>,

    ast: Ast,
    frame: Frame,
    stack: Vec<Frame>,
    unit: Option<NodeId>,

    autocap: i32,
    capcount: i32,
    captop: i32,
    /// Capture number to the pattern offset of its group.
    caps: BTreeMap<i32, i32>,
    /// Name to pattern offset during the pre-pass, name to number after.
    capnames: AHashMap<SmolStr, i32>,
    capnamelist: Vec<SmolStr>,
    has_names: bool,
    capnumlist: Option<Vec<i32>>,

    ignore_next_paren: bool,
}

/// Parses `pattern` into a reduced tree.
pub fn parse(pattern: &str, options: RegexOptions) -> Result<RegexTree, ParseError> {
    let mut parser = Parser::new(pattern, options);
    parser.count_captures()?;
    parser.reset(options);
    let root = parser.scan_regex()?;
    Ok(parser.into_tree(root))
}

impl Parser {
    fn new(pattern: &str, options: RegexOptions) -> Self {
        let mut ast = Ast::new();
        let group = ast.add(NodeKind::Capture { cap: 0, uncap: -1 }, options);
        let alternation = ast.add(NodeKind::Alternate, options);
        let concatenation = ast.add(NodeKind::Concatenate, options);
        Self {
            pattern: pattern.to_string(),
            chars: pattern.chars().collect(),
            pos: 0,
            options,
            options_stack: Vec::new(),
            ast,
            frame: Frame {
                group,
                alternation,
                concatenation,
            },
            stack: Vec::new(),
            unit: None,
            autocap: 0,
            capcount: 0,
            captop: 0,
            caps: BTreeMap::new(),
            capnames: AHashMap::new(),
            capnamelist: Vec::new(),
            has_names: false,
            capnumlist: None,
            ignore_next_paren: false,
        }
    }

    fn reset(&mut self, options: RegexOptions) {
        self.pos = 0;
        self.autocap = 1;
        self.ignore_next_paren = false;
        self.options_stack.clear();
        self.options = options;
        self.stack.clear();
        self.unit = None;
    }

    fn into_tree(self, root: NodeId) -> RegexTree {
        RegexTree {
            ast: self.ast,
            root,
            caps: self.caps,
            capnumlist: self.capnumlist,
            captop: self.captop,
            capnames: self.capnames,
            capslist: self.has_names.then_some(self.capnamelist),
            options: self.options,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            pattern: self.pattern.clone(),
            kind,
            offset: self.pos,
        }
    }

    // ----- cursor -----

    #[inline]
    fn chars_right(&self) -> usize {
        self.chars.len() - self.pos
    }

    #[inline]
    fn right_char(&self) -> char {
        self.chars[self.pos]
    }

    #[inline]
    fn right_char_at(&self, i: usize) -> char {
        self.chars[self.pos + i]
    }

    #[inline]
    fn char_at(&self, i: usize) -> char {
        self.chars[i]
    }

    #[inline]
    fn move_right(&mut self) {
        self.pos += 1;
    }

    #[inline]
    fn move_left(&mut self) {
        self.pos -= 1;
    }

    #[inline]
    fn move_right_get_char(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    #[inline]
    fn textpos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn textto(&mut self, pos: usize) {
        self.pos = pos;
    }

    // ----- options -----

    fn use_option(&self, option: RegexOptions) -> bool {
        self.options.contains(option)
    }

    fn use_option_i(&self) -> bool {
        self.use_option(RegexOptions::IGNORE_CASE)
    }

    fn use_option_e(&self) -> bool {
        self.use_option(RegexOptions::ECMA_SCRIPT)
    }

    fn use_option_x(&self) -> bool {
        self.use_option(RegexOptions::IGNORE_PATTERN_WHITESPACE)
    }

    fn push_options(&mut self) {
        self.options_stack.push(self.options);
    }

    fn pop_options(&mut self) {
        if let Some(options) = self.options_stack.pop() {
            self.options = options;
        }
    }

    fn pop_keep_options(&mut self) {
        self.options_stack.pop();
    }

    /// Applies inline option letters: `(?imnsx-imnsx...`.
    fn scan_options(&mut self) {
        let mut off = false;
        while self.chars_right() > 0 {
            match self.right_char() {
                '-' => off = true,
                '+' => off = false,
                ch => {
                    let Some(option) = RegexOptions::from_inline_code(ch) else {
                        return;
                    };
                    if off {
                        self.options.remove(option);
                    } else {
                        self.options.insert(option);
                    }
                }
            }
            self.move_right();
        }
    }

    // ----- main scan -----

    fn scan_regex(&mut self) -> ParseResult<NodeId> {
        let mut ch;
        let mut quantifier_follows = false;

        let root = self.ast.add(NodeKind::Capture { cap: 0, uncap: -1 }, self.options);
        self.start_group(root);

        while self.chars_right() > 0 {
            let mut was_prev_quantifier = quantifier_follows;
            quantifier_follows = false;

            self.scan_blank()?;

            let startpos = self.textpos();

            // run of ordinary characters
            let x_mode = self.use_option_x();
            while self.chars_right() > 0 {
                let c = self.right_char();
                let stop = if x_mode { is_stopper_x(c) } else { is_special(c) };
                if stop && !(c == '{' && !self.is_true_quantifier()) {
                    break;
                }
                self.move_right();
            }

            let endpos = self.textpos();

            self.scan_blank()?;

            if self.chars_right() == 0 {
                ch = '!';
            } else {
                ch = self.right_char();
                if is_special(ch) {
                    quantifier_follows = is_quantifier(ch);
                    self.move_right();
                } else {
                    ch = ' ';
                }
            }

            if startpos < endpos {
                let unquantified = endpos - startpos - usize::from(quantifier_follows);
                was_prev_quantifier = false;
                if unquantified > 0 {
                    self.add_literal(startpos, unquantified);
                }
                if quantifier_follows {
                    self.add_unit_one(self.char_at(endpos - 1));
                }
            }

            let mut quantifier_allowed = true;
            match ch {
                '!' => break,
                ' ' => continue,
                '[' => {
                    let mut cc = self.scan_char_class(self.use_option_i(), false)?;
                    self.add_unit_set(cc.to_code());
                }
                '(' => {
                    self.push_options();
                    match self.scan_group_open()? {
                        None => self.pop_keep_options(),
                        Some(grouper) => {
                            self.push_group();
                            self.start_group(grouper);
                        }
                    }
                    continue;
                }
                '|' => {
                    self.add_alternate();
                    continue;
                }
                ')' => {
                    if self.stack.is_empty() {
                        return Err(self.error(ParseErrorKind::TooManyParens));
                    }
                    self.add_group()?;
                    self.pop_group()?;
                    self.pop_options();
                    if self.unit.is_none() {
                        quantifier_allowed = false;
                    }
                }
                '\\' => {
                    let node = self.scan_backslash()?;
                    self.unit = Some(node);
                }
                '^' => self.add_unit_type(if self.use_option(RegexOptions::MULTILINE) {
                    NodeKind::Bol
                } else {
                    NodeKind::Beginning
                }),
                '$' => self.add_unit_type(if self.use_option(RegexOptions::MULTILINE) {
                    NodeKind::Eol
                } else {
                    NodeKind::EndZ
                }),
                '.' => {
                    if self.use_option(RegexOptions::SINGLELINE) {
                        self.add_unit_set(ClassCode::any());
                    } else {
                        self.add_unit_notone('\n');
                    }
                }
                '{' | '*' | '+' | '?' => {
                    if self.unit.is_none() {
                        let kind = if was_prev_quantifier {
                            ParseErrorKind::NestedQuantifiers(ch)
                        } else {
                            ParseErrorKind::QuantifierAfterNothing
                        };
                        return Err(self.error(kind));
                    }
                    self.move_left();
                }
                _ => unreachable!("scanner stopped on {:?}", ch),
            }
            if !quantifier_allowed {
                continue;
            }

            self.scan_blank()?;

            if self.chars_right() == 0 {
                self.add_concatenate();
                continue;
            }
            quantifier_follows = self.is_true_quantifier();
            if !quantifier_follows {
                self.add_concatenate();
                continue;
            }

            let ch = self.move_right_get_char();
            let (min, max) = match ch {
                '*' => (0, INFINITE_REPEAT),
                '?' => (0, 1),
                '+' => (1, INFINITE_REPEAT),
                '{' => {
                    let startpos = self.textpos();
                    let min = self.scan_decimal()?;
                    let mut max = min;
                    if startpos < self.textpos()
                        && self.chars_right() > 0
                        && self.right_char() == ','
                    {
                        self.move_right();
                        max = if self.chars_right() == 0 || self.right_char() == '}' {
                            INFINITE_REPEAT
                        } else {
                            self.scan_decimal()?
                        };
                    }
                    if startpos == self.textpos()
                        || self.chars_right() == 0
                        || self.move_right_get_char() != '}'
                    {
                        self.add_concatenate();
                        self.textto(startpos - 1);
                        continue;
                    }
                    (min, max)
                }
                _ => unreachable!("not a quantifier: {:?}", ch),
            };

            self.scan_blank()?;
            let lazy = self.chars_right() > 0 && self.right_char() == '?';
            if lazy {
                self.move_right();
            }

            if min > max {
                return Err(self.error(ParseErrorKind::ReversedQuantifierRange));
            }
            self.add_concatenate_quantified(lazy, min, max);
        }

        if !self.stack.is_empty() {
            return Err(self.error(ParseErrorKind::NotEnoughParens));
        }
        self.add_group()?;
        self.unit
            .ok_or_else(|| self.error(ParseErrorKind::NotEnoughParens))
    }

    /// Skips whitespace and `#` comments in extended mode, and `(?#...)`
    /// comments always.
    fn scan_blank(&mut self) -> ParseResult<()> {
        if self.use_option_x() {
            loop {
                while self.chars_right() > 0 && is_space(self.right_char()) {
                    self.move_right();
                }
                if self.chars_right() == 0 {
                    break;
                }
                if self.right_char() == '#' {
                    while self.chars_right() > 0 && self.right_char() != '\n' {
                        self.move_right();
                    }
                } else if self.at_inline_comment() {
                    self.skip_inline_comment()?;
                } else {
                    break;
                }
            }
        } else {
            while self.at_inline_comment() {
                self.skip_inline_comment()?;
            }
        }
        Ok(())
    }

    fn at_inline_comment(&self) -> bool {
        self.chars_right() >= 3
            && self.right_char() == '('
            && self.right_char_at(1) == '?'
            && self.right_char_at(2) == '#'
    }

    fn skip_inline_comment(&mut self) -> ParseResult<()> {
        while self.chars_right() > 0 && self.right_char() != ')' {
            self.move_right();
        }
        if self.chars_right() == 0 {
            return Err(self.error(ParseErrorKind::UnterminatedComment));
        }
        self.move_right();
        Ok(())
    }

    /// A `{` starts a quantifier only when followed by `n}`, `n,}` or
    /// `n,m}`; otherwise it is a literal.
    fn is_true_quantifier(&self) -> bool {
        let mut remaining = self.chars_right();
        if remaining == 0 {
            return false;
        }
        let startpos = self.textpos();
        let mut ch = self.char_at(startpos);
        if ch != '{' {
            return is_quantifier(ch);
        }

        let mut pos = startpos;
        loop {
            remaining -= 1;
            if remaining == 0 {
                break;
            }
            pos += 1;
            ch = self.char_at(pos);
            if !ch.is_ascii_digit() {
                break;
            }
        }
        if remaining == 0 || pos - startpos == 1 {
            return false;
        }
        if ch == '}' {
            return true;
        }
        if ch != ',' {
            return false;
        }
        loop {
            remaining -= 1;
            if remaining == 0 {
                break;
            }
            pos += 1;
            ch = self.char_at(pos);
            if !ch.is_ascii_digit() {
                break;
            }
        }
        remaining > 0 && ch == '}'
    }

    /// Scans what follows `(`. Returns `None` for a bare option setting
    /// such as `(?i)`, which changes options for the rest of the group.
    fn scan_group_open(&mut self) -> ParseResult<Option<NodeId>> {
        let ignore_paren = std::mem::take(&mut self.ignore_next_paren);

        if self.chars_right() == 0
            || self.right_char() != '?'
            || (self.chars_right() > 1 && self.right_char_at(1) == ')')
        {
            let kind = if self.use_option(RegexOptions::EXPLICIT_CAPTURE) || ignore_paren {
                NodeKind::Group
            } else {
                let cap = self.autocap;
                self.autocap += 1;
                NodeKind::Capture { cap, uncap: -1 }
            };
            return Ok(Some(self.ast.add(kind, self.options)));
        }

        self.move_right();
        if self.chars_right() == 0 {
            return Err(self.error(ParseErrorKind::UnrecognizedGrouping));
        }

        let mut close = '>';
        let kind = match self.move_right_get_char() {
            ':' => NodeKind::Group,
            '=' => {
                self.options.remove(RegexOptions::RIGHT_TO_LEFT);
                NodeKind::Require
            }
            '!' => {
                self.options.remove(RegexOptions::RIGHT_TO_LEFT);
                NodeKind::Prevent
            }
            '>' => NodeKind::Greedy,
            open @ ('\'' | '<') => {
                if open == '\'' {
                    close = '\'';
                }
                if self.chars_right() == 0 {
                    return Err(self.error(ParseErrorKind::UnrecognizedGrouping));
                }
                match self.move_right_get_char() {
                    '=' if close != '\'' => {
                        self.options.insert(RegexOptions::RIGHT_TO_LEFT);
                        NodeKind::Require
                    }
                    '!' if close != '\'' => {
                        self.options.insert(RegexOptions::RIGHT_TO_LEFT);
                        NodeKind::Prevent
                    }
                    '=' | '!' => return Err(self.error(ParseErrorKind::UnrecognizedGrouping)),
                    ch => {
                        self.move_left();
                        let node = self.scan_named_group(ch, close)?;
                        return Ok(Some(node));
                    }
                }
            }
            '(' => return self.scan_condition().map(Some),
            _ => {
                self.move_left();
                self.scan_options();
                if self.chars_right() == 0 {
                    return Err(self.error(ParseErrorKind::UnrecognizedGrouping));
                }
                match self.move_right_get_char() {
                    ')' => return Ok(None),
                    ':' => NodeKind::Group,
                    _ => return Err(self.error(ParseErrorKind::UnrecognizedGrouping)),
                }
            }
        };
        Ok(Some(self.ast.add(kind, self.options)))
    }

    /// `(?<name>`, `(?<3>`, `(?<name-other>` and `(?<-other>`.
    fn scan_named_group(&mut self, first: char, close: char) -> ParseResult<NodeId> {
        let mut capnum = -1;
        let mut uncapnum = -1;
        let mut proceed = false;

        if first.is_ascii_digit() {
            capnum = self.scan_decimal()?;
            if !self.is_capture_slot(capnum) {
                capnum = -1;
            }
            if self.chars_right() > 0 && !(self.right_char() == close || self.right_char() == '-') {
                return Err(self.error(ParseErrorKind::InvalidGroupName));
            }
            if capnum == 0 {
                return Err(self.error(ParseErrorKind::CapnumNotZero));
            }
        } else if crate::char_class::is_word_char(first) {
            let capname = self.scan_capname();
            if let Some(num) = self.capture_slot_from_name(&capname) {
                capnum = num;
            }
            if self.chars_right() > 0 && !(self.right_char() == close || self.right_char() == '-') {
                return Err(self.error(ParseErrorKind::InvalidGroupName));
            }
        } else if first == '-' {
            proceed = true;
        } else {
            return Err(self.error(ParseErrorKind::InvalidGroupName));
        }

        if (capnum != -1 || proceed) && self.chars_right() > 0 && self.right_char() == '-' {
            self.move_right();
            if self.chars_right() == 0 {
                return Err(self.error(ParseErrorKind::InvalidGroupName));
            }
            let ch = self.right_char();
            if ch.is_ascii_digit() {
                uncapnum = self.scan_decimal()?;
                if !self.is_capture_slot(uncapnum) {
                    return Err(self.error(ParseErrorKind::UndefinedBackref(uncapnum)));
                }
            } else if crate::char_class::is_word_char(ch) {
                let uncapname = self.scan_capname();
                match self.capture_slot_from_name(&uncapname) {
                    Some(num) => uncapnum = num,
                    None => {
                        return Err(self.error(ParseErrorKind::UndefinedNameRef(uncapname.to_string())));
                    }
                }
            } else {
                return Err(self.error(ParseErrorKind::InvalidGroupName));
            }
            if self.chars_right() > 0 && self.right_char() != close {
                return Err(self.error(ParseErrorKind::InvalidGroupName));
            }
        }

        if (capnum != -1 || uncapnum != -1)
            && self.chars_right() > 0
            && self.move_right_get_char() == close
        {
            return Ok(self.ast.add(
                NodeKind::Capture {
                    cap: capnum,
                    uncap: uncapnum,
                },
                self.options,
            ));
        }
        Err(self.error(ParseErrorKind::UnrecognizedGrouping))
    }

    /// `(?(` has been read: a group-number or name test, or an expression.
    fn scan_condition(&mut self) -> ParseResult<NodeId> {
        let paren_pos = self.textpos();
        if self.chars_right() > 0 {
            let ch = self.right_char();
            if ch.is_ascii_digit() {
                let capnum = self.scan_decimal()?;
                if self.chars_right() > 0 && self.move_right_get_char() == ')' {
                    if self.is_capture_slot(capnum) {
                        return Ok(self.ast.add(NodeKind::Testref(capnum), self.options));
                    }
                    return Err(self.error(ParseErrorKind::UndefinedReference(capnum)));
                }
                return Err(self.error(ParseErrorKind::MalformedReference(capnum)));
            } else if crate::char_class::is_word_char(ch) {
                let capname = self.scan_capname();
                if let Some(capnum) = self.capture_slot_from_name(&capname)
                    && self.chars_right() > 0
                    && self.move_right_get_char() == ')'
                {
                    return Ok(self.ast.add(NodeKind::Testref(capnum), self.options));
                }
            }
        }

        // an expression condition: rescan it as the group's first child
        self.textto(paren_pos - 1);
        self.ignore_next_paren = true;

        let remaining = self.chars_right();
        if remaining >= 3 && self.right_char_at(1) == '?' {
            let rightchar2 = self.right_char_at(2);
            if rightchar2 == '#' {
                return Err(self.error(ParseErrorKind::AlternationCantHaveComment));
            }
            if rightchar2 == '\''
                || (remaining >= 4
                    && rightchar2 == '<'
                    && self.right_char_at(3) != '!'
                    && self.right_char_at(3) != '=')
            {
                return Err(self.error(ParseErrorKind::AlternationCantCapture));
            }
        }
        Ok(self.ast.add(NodeKind::Testgroup, self.options))
    }

    // ----- tree building -----

    fn start_group(&mut self, group: NodeId) {
        self.frame = Frame {
            group,
            alternation: self.ast.add(NodeKind::Alternate, self.options),
            concatenation: self.ast.add(NodeKind::Concatenate, self.options),
        };
    }

    fn push_group(&mut self) {
        self.stack.push(self.frame);
    }

    fn pop_group(&mut self) -> ParseResult<()> {
        if let Some(frame) = self.stack.pop() {
            self.frame = frame;
        }
        // the first unit inside a test group is its condition
        let group = self.frame.group;
        if *self.ast.kind(group) == NodeKind::Testgroup && self.ast.child_count(group) == 0 {
            let Some(unit) = self.unit.take() else {
                return Err(self.error(ParseErrorKind::IllegalCondition));
            };
            self.ast.add_child(group, unit);
        }
        Ok(())
    }

    fn is_conditional(&self, group: NodeId) -> bool {
        matches!(self.ast.kind(group), NodeKind::Testgroup | NodeKind::Testref(_))
    }

    fn add_alternate(&mut self) {
        let concatenation = self.ast.reverse_left(self.frame.concatenation);
        if self.is_conditional(self.frame.group) {
            self.ast.add_child(self.frame.group, concatenation);
        } else {
            self.ast.add_child(self.frame.alternation, concatenation);
        }
        self.frame.concatenation = self.ast.add(NodeKind::Concatenate, self.options);
    }

    fn add_group(&mut self) -> ParseResult<()> {
        let group = self.frame.group;
        let concatenation = self.ast.reverse_left(self.frame.concatenation);
        if self.is_conditional(group) {
            self.ast.add_child(group, concatenation);
            let limit = if matches!(self.ast.kind(group), NodeKind::Testref(_)) { 2 } else { 3 };
            if self.ast.child_count(group) > limit {
                return Err(self.error(ParseErrorKind::TooManyAlternates));
            }
        } else {
            self.ast.add_child(self.frame.alternation, concatenation);
            self.ast.add_child(group, self.frame.alternation);
        }
        self.unit = Some(group);
        Ok(())
    }

    /// Appends `len` literal pattern characters starting at `pos`.
    fn add_literal(&mut self, pos: usize, len: usize) {
        let ci = self.use_option_i();
        let fold = |ch: char| if ci { to_lower(ch) } else { ch };
        let kind = if len > 1 {
            NodeKind::Multi(self.chars[pos..pos + len].iter().map(|&c| fold(c)).collect())
        } else {
            NodeKind::Char(CharTest::One(fold(self.chars[pos])))
        };
        let node = self.ast.add(kind, self.options);
        self.ast.add_child(self.frame.concatenation, node);
    }

    fn add_concatenate(&mut self) {
        if let Some(unit) = self.unit.take() {
            self.ast.add_child(self.frame.concatenation, unit);
        }
    }

    fn add_concatenate_quantified(&mut self, lazy: bool, min: i32, max: i32) {
        if let Some(unit) = self.unit.take() {
            let quantified = self.ast.make_quantifier(unit, lazy, min, max);
            self.ast.add_child(self.frame.concatenation, quantified);
        }
    }

    fn add_unit_one(&mut self, ch: char) {
        let ch = if self.use_option_i() { to_lower(ch) } else { ch };
        self.unit = Some(self.ast.add(NodeKind::Char(CharTest::One(ch)), self.options));
    }

    fn add_unit_notone(&mut self, ch: char) {
        let ch = if self.use_option_i() { to_lower(ch) } else { ch };
        self.unit = Some(self.ast.add(NodeKind::Char(CharTest::Notone(ch)), self.options));
    }

    fn add_unit_set(&mut self, set: ClassCode) {
        self.unit = Some(self.ast.add(NodeKind::Char(CharTest::Set(set)), self.options));
    }

    fn add_unit_type(&mut self, kind: NodeKind) {
        self.unit = Some(self.ast.add(kind, self.options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(is_quantifier('{'));
        assert!(is_special('|'));
        assert!(!is_special('#'));
        assert!(is_stopper_x('#'));
        assert!(is_space('\x0C'));
        assert!(!is_metachar('a'));
        assert!(is_metachar(' '));
    }

    #[test]
    fn test_true_quantifier_lookahead() {
        for (pattern, expected) in [
            ("{2}", true),
            ("{2,}", true),
            ("{2,5}", true),
            ("{,5}", false),
            ("{x}", false),
            ("{2", false),
            ("{}", false),
            ("*", true),
        ] {
            let p = Parser::new(pattern, RegexOptions::empty());
            assert_eq!(p.is_true_quantifier(), expected, "{pattern}");
        }
    }
}
