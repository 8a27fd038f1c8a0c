// Public matching API.
//
// All positions and lengths are counted in chars, not bytes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use smol_str::SmolStr;

use crate::compiler;
use crate::regex_error::{RegexError, RegexResult};
use crate::regex_options::{RegexConfig, RegexOptions};
use crate::regex_vm::{Program, Runner, RunnerPool};

/// A (start, length) pair in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub index: usize,
    pub length: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.index + self.length
    }
}

/// One group of a match, detached from the match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupMatch {
    pub number: i32,
    pub name: SmolStr,
    pub success: bool,
    /// Last capture; zero when the group did not participate.
    pub index: usize,
    pub length: usize,
    pub value: String,
    /// Every capture of the group, in the order they were made.
    pub captures: Vec<Span>,
}

/// A successful match together with its capture table.
#[derive(Debug, Clone)]
pub struct Match {
    text: Arc<[char]>,
    program: Arc<Program>,
    /// Captures per slot.
    groups: Vec<Vec<Span>>,
    /// Where the next search of a match sequence resumes.
    text_pos: i32,
}

impl Match {
    /// Copies the runner's capture table. In `quick` mode only group 0 is
    /// copied, since the others may still hold balancing entries.
    fn from_runner(runner: &Runner, text: Arc<[char]>, quick: bool) -> Self {
        let table = runner.capture_table();
        let slots = if quick { 1 } else { table.slot_count() };
        let mut groups: Vec<Vec<Span>> = (0..slots)
            .map(|slot| {
                table
                    .captures(slot)
                    .map(|(index, length)| Span {
                        index: index as usize,
                        length: length as usize,
                    })
                    .collect()
            })
            .collect();
        groups.resize_with(table.slot_count(), Vec::new);
        Self {
            text,
            program: Arc::clone(runner.program()),
            groups,
            text_pos: runner.text_pos(),
        }
    }

    pub fn success(&self) -> bool {
        !self.groups[0].is_empty()
    }

    pub fn span(&self) -> Span {
        self.groups[0].last().copied().unwrap_or_default()
    }

    pub fn index(&self) -> usize {
        self.span().index
    }

    pub fn length(&self) -> usize {
        self.span().length
    }

    pub fn value(&self) -> String {
        self.slice(self.span())
    }

    fn slice(&self, span: Span) -> String {
        self.text[span.index..span.end()].iter().collect()
    }

    /// Captures of group `number`, empty when it did not participate or
    /// does not exist.
    pub fn captures(&self, number: i32) -> &[Span] {
        self.program
            .map_capnum(number)
            .map_or(&[][..], |slot| self.groups[slot].as_slice())
    }

    pub fn group(&self, number: i32) -> Option<GroupMatch> {
        let slot = self.program.map_capnum(number)?;
        Some(self.group_at_slot(slot))
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupMatch> {
        let number = *self.program.cap_names.get(name)?;
        self.group(number)
    }

    /// All groups in slot order, group 0 first.
    pub fn groups(&self) -> Vec<GroupMatch> {
        (0..self.groups.len()).map(|slot| self.group_at_slot(slot)).collect()
    }

    fn group_at_slot(&self, slot: usize) -> GroupMatch {
        let captures = self.groups[slot].clone();
        let last = captures.last().copied();
        GroupMatch {
            number: self.program.group_numbers[slot],
            name: self.program.group_names[slot].clone(),
            success: last.is_some(),
            index: last.map_or(0, |s| s.index),
            length: last.map_or(0, |s| s.length),
            value: last.map(|s| self.slice(s)).unwrap_or_default(),
            captures,
        }
    }
}

/// A compiled regular expression.
pub struct Regex {
    program: Arc<Program>,
    pool: RunnerPool,
    timeout: Option<Duration>,
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.program.pattern)
            .field("options", &self.program.options)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program.pattern)
    }
}

fn to_chars(text: &str) -> Arc<[char]> {
    text.chars().collect::<Vec<_>>().into()
}

impl Regex {
    pub fn new(pattern: &str) -> RegexResult<Self> {
        Self::with_config(pattern, &RegexConfig::default())
    }

    pub fn with_options(pattern: &str, options: RegexOptions) -> RegexResult<Self> {
        Self::with_config(pattern, &RegexConfig::with_options(options))
    }

    pub fn with_config(pattern: &str, config: &RegexConfig) -> RegexResult<Self> {
        let program = compiler::compile(pattern, config.options)?;
        Ok(Self::from_program(Arc::new(program), config))
    }

    /// Wraps an already compiled program; `config.options` is ignored.
    pub fn from_program(program: Arc<Program>, config: &RegexConfig) -> Self {
        Self {
            program,
            pool: RunnerPool::new(config.pool_capacity),
            timeout: config.match_timeout,
        }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn pattern(&self) -> &str {
        &self.program.pattern
    }

    pub fn options(&self) -> RegexOptions {
        self.program.options
    }

    pub fn match_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_right_to_left(&self) -> bool {
        self.program.rtl
    }

    fn default_start(&self, len: usize) -> usize {
        if self.program.rtl { len } else { 0 }
    }

    pub fn is_match(&self, text: &str) -> RegexResult<bool> {
        let text = to_chars(text);
        let len = text.len();
        let start = self.default_start(len);
        Ok(self.execute(text, 0, len, start, None, true)?.is_some())
    }

    /// First match, searching from the start (the end for right-to-left
    /// patterns).
    pub fn find(&self, text: &str) -> RegexResult<Option<Match>> {
        let text = to_chars(text);
        let start = self.default_start(text.len());
        self.find_chars(text, start)
    }

    /// First match at or after char position `start` (at or before, for
    /// right-to-left patterns).
    pub fn find_at(&self, text: &str, start: usize) -> RegexResult<Option<Match>> {
        self.find_chars(to_chars(text), start)
    }

    fn find_chars(&self, text: Arc<[char]>, start: usize) -> RegexResult<Option<Match>> {
        let len = text.len();
        self.execute(text, 0, len, start, None, false)
    }

    /// Successive non-overlapping matches.
    pub fn matches(&self, text: &str) -> Matches<'_> {
        let text = to_chars(text);
        let start = self.default_start(text.len()) as i32;
        Matches {
            regex: self,
            text,
            start,
            prev_len: None,
            done: false,
        }
    }

    /// Searches `text[beg..end]` starting at `start`.
    ///
    /// `prev_len` is the length of the previous match when continuing a
    /// sequence; after an empty match the search starts one position
    /// further on. In `quick` mode the returned match carries only the
    /// overall span; groups other than 0 read as unmatched.
    pub fn execute(
        &self,
        text: Arc<[char]>,
        beg: usize,
        end: usize,
        start: usize,
        prev_len: Option<usize>,
        quick: bool,
    ) -> RegexResult<Option<Match>> {
        if end > text.len() {
            return Err(RegexError::InvalidArgument {
                name: "end",
                value: end,
            });
        }
        if beg > end {
            return Err(RegexError::InvalidArgument {
                name: "beg",
                value: beg,
            });
        }
        if start < beg || start > end {
            return Err(RegexError::InvalidArgument {
                name: "start",
                value: start,
            });
        }

        let mut runner = self.pool.acquire(&self.program);
        let found = runner.scan(
            Arc::clone(&text),
            beg as i32,
            end as i32,
            start as i32,
            prev_len.map(|len| len as i32),
            quick,
            self.timeout,
        );
        let result = match found {
            Ok(true) => Ok(Some(Match::from_runner(&runner, text, quick))),
            Ok(false) => Ok(None),
            Err(timeout) => Err(RegexError::from(timeout)),
        };
        self.pool.release(runner);
        result
    }

    /// Splits `text` around matches. Captured groups of each match are
    /// included in the output after the piece preceding it. At most
    /// `limit` pieces are produced; 0 means no limit.
    pub fn split(&self, text: &str, limit: usize) -> RegexResult<Vec<String>> {
        if limit == 1 {
            return Ok(vec![text.to_string()]);
        }
        let chars = to_chars(text);
        let piece = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };
        let mut remaining = limit.saturating_sub(1);
        let mut out = Vec::new();
        let rtl = self.program.rtl;
        let mut prev = if rtl { chars.len() } else { 0 };

        for m in self.matches(text) {
            let m = m?;
            if rtl {
                out.push(piece(m.span().end(), prev));
                prev = m.index();
            } else {
                out.push(piece(prev, m.index()));
                prev = m.span().end();
            }
            for group in m.groups().into_iter().skip(1) {
                if group.success {
                    out.push(group.value);
                }
            }
            if remaining > 0 {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }

        if rtl {
            out.push(piece(0, prev));
            out.reverse();
        } else {
            out.push(piece(prev, chars.len()));
        }
        Ok(out)
    }

    /// Group numbers in slot order.
    pub fn group_numbers(&self) -> &[i32] {
        &self.program.group_numbers
    }

    /// Group names in slot order; unnamed groups are named by number.
    pub fn group_names(&self) -> &[SmolStr] {
        &self.program.group_names
    }

    pub fn group_number_from_name(&self, name: &str) -> Option<i32> {
        self.program.cap_names.get(name).copied()
    }

    pub fn group_name_from_number(&self, number: i32) -> Option<&str> {
        let slot = self.program.map_capnum(number)?;
        self.program.group_names.get(slot).map(SmolStr::as_str)
    }
}

/// Iterator over successive matches; see [`Regex::matches`].
pub struct Matches<'r> {
    regex: &'r Regex,
    text: Arc<[char]>,
    start: i32,
    prev_len: Option<usize>,
    done: bool,
}

impl Iterator for Matches<'_> {
    type Item = RegexResult<Match>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let len = self.text.len();
        let found = self.regex.execute(
            Arc::clone(&self.text),
            0,
            len,
            self.start as usize,
            self.prev_len,
            false,
        );
        match found {
            Ok(Some(m)) => {
                self.start = m.text_pos;
                self.prev_len = Some(m.length());
                Some(Ok(m))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
