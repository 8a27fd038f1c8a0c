// Execution state and the start-position scan loop.
//
// A runner belongs to one program. It keeps its stacks and capture table
// between searches so repeated matching on the same regex does not
// reallocate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::char_class::to_lower;
use crate::regex_error::MatchTimeout;
use crate::regex_limits::{
    INITIAL_CRAWL_SIZE, INITIAL_STACK_FACTOR, MIN_MARK_STACK_SIZE, MIN_TRACK_SIZE,
    TIMEOUT_CHECK_FREQUENCY,
};
use crate::regex_vm::match_table::MatchTable;
use crate::regex_vm::opcode::OpCode;
use crate::regex_vm::program::{Anchors, Program};

/// Which form of the current instruction is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Forward,
    Back,
    Back2,
}

pub struct Runner {
    pub(super) prog: Arc<Program>,
    pub(super) text: Arc<[char]>,

    pub(super) textbeg: i32,
    pub(super) textend: i32,
    pub(super) textstart: i32,
    pub(super) textpos: i32,

    // All three stacks grow downward from the end of their buffers.
    pub(super) track: Vec<i32>,
    pub(super) trackpos: i32,
    pub(super) stack: Vec<i32>,
    pub(super) stackpos: i32,
    pub(super) crawl: Vec<i32>,
    pub(super) crawlpos: i32,
    pub(super) trackcount: i32,

    pub(super) matches: MatchTable,
    initialized: bool,

    // interpreter registers
    pub(super) codepos: i32,
    pub(super) op: OpCode,
    pub(super) mode: Mode,
    pub(super) rtl: bool,
    pub(super) ci: bool,

    timeout: Option<Duration>,
    deadline: Option<Instant>,
    checks_to_skip: u32,
}

impl Runner {
    pub fn new(prog: Arc<Program>) -> Self {
        let trackcount = prog.track_count as i32;
        let slots = prog.cap_size;
        Self {
            prog,
            text: Arc::from(Vec::new()),
            textbeg: 0,
            textend: 0,
            textstart: 0,
            textpos: 0,
            track: Vec::new(),
            trackpos: 0,
            stack: Vec::new(),
            stackpos: 0,
            crawl: Vec::new(),
            crawlpos: 0,
            trackcount,
            matches: MatchTable::new(slots),
            initialized: false,
            codepos: 0,
            op: OpCode::Stop,
            mode: Mode::Forward,
            rtl: false,
            ci: false,
            timeout: None,
            deadline: None,
            checks_to_skip: TIMEOUT_CHECK_FREQUENCY,
        }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.prog
    }

    /// Captures of the last successful scan.
    pub fn capture_table(&self) -> &MatchTable {
        &self.matches
    }

    /// Where the last scan stopped; for a match, its end (its start in
    /// right-to-left mode).
    pub fn text_pos(&self) -> i32 {
        self.textpos
    }

    /// Searches `text[beg..end]` from `start`. `prev_len` is the length of
    /// the previous match when continuing a match sequence; an empty
    /// previous match bumps the start by one position.
    #[allow(clippy::too_many_arguments)]
    pub fn scan(
        &mut self,
        text: Arc<[char]>,
        beg: i32,
        end: i32,
        start: i32,
        prev_len: Option<i32>,
        quick: bool,
        timeout: Option<Duration>,
    ) -> Result<bool, MatchTimeout> {
        self.text = text;
        self.textbeg = beg;
        self.textend = end;
        self.textstart = start;
        self.textpos = start;
        self.initialized = false;

        let rtl = self.prog.rtl;
        let bump = if rtl { -1 } else { 1 };
        let stoppos = if rtl { beg } else { end };

        if prev_len == Some(0) {
            if self.textpos == stoppos {
                return Ok(false);
            }
            self.textpos += bump;
        }

        self.start_timeout_watch(timeout);

        loop {
            if self.find_first_char() {
                self.check_timeout()?;
                if !self.initialized {
                    self.init_match();
                    self.initialized = true;
                }
                self.go()?;
                if self.matches.count(0) > 0 {
                    if !quick {
                        self.matches.tidy();
                    }
                    return Ok(true);
                }
                self.reset_stacks();
            }

            if self.textpos == stoppos {
                return Ok(false);
            }
            self.textpos += bump;
        }
    }

    fn init_match(&mut self) {
        self.matches.reset(self.prog.cap_size);
        if self.track.is_empty() {
            let tracksize = (self.trackcount as usize * INITIAL_STACK_FACTOR).max(MIN_TRACK_SIZE);
            let stacksize =
                (self.trackcount as usize * INITIAL_STACK_FACTOR).max(MIN_MARK_STACK_SIZE);
            self.track = vec![0; tracksize];
            self.stack = vec![0; stacksize];
            self.crawl = vec![0; INITIAL_CRAWL_SIZE];
        }
        self.reset_stacks();
    }

    fn reset_stacks(&mut self) {
        self.trackpos = self.track.len() as i32;
        self.stackpos = self.stack.len() as i32;
        self.crawlpos = self.crawl.len() as i32;
    }

    fn start_timeout_watch(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
        self.deadline = timeout.map(|t| Instant::now() + t);
        self.checks_to_skip = TIMEOUT_CHECK_FREQUENCY;
    }

    /// Polls the deadline once every `TIMEOUT_CHECK_FREQUENCY` calls.
    #[inline]
    pub(super) fn check_timeout(&mut self) -> Result<(), MatchTimeout> {
        let Some(deadline) = self.deadline else {
            return Ok(());
        };
        self.checks_to_skip -= 1;
        if self.checks_to_skip != 0 {
            return Ok(());
        }
        self.checks_to_skip = TIMEOUT_CHECK_FREQUENCY;
        if Instant::now() < deadline {
            return Ok(());
        }
        Err(MatchTimeout {
            pattern: self.prog.pattern.clone(),
            input: self.text.iter().collect(),
            timeout: self.timeout.unwrap_or_default(),
        })
    }

    /// Moves `textpos` to the next position a match could start at.
    fn find_first_char(&mut self) -> bool {
        let prog = Arc::clone(&self.prog);
        let anchors = prog.anchors;

        if anchors.intersects(Anchors::BEGINNING | Anchors::START | Anchors::END_Z | Anchors::END) {
            if !prog.rtl {
                if (anchors.contains(Anchors::BEGINNING) && self.textpos > self.textbeg)
                    || (anchors.contains(Anchors::START) && self.textpos > self.textstart)
                {
                    self.textpos = self.textend;
                    return false;
                }
                if anchors.contains(Anchors::END_Z) && self.textpos < self.textend - 1 {
                    self.textpos = self.textend - 1;
                } else if anchors.contains(Anchors::END) && self.textpos < self.textend {
                    self.textpos = self.textend;
                }
            } else {
                if (anchors.contains(Anchors::END) && self.textpos < self.textend)
                    || (anchors.contains(Anchors::END_Z)
                        && (self.textpos < self.textend - 1
                            || (self.textpos == self.textend - 1
                                && self.text[self.textpos as usize] != '\n')))
                    || (anchors.contains(Anchors::START) && self.textpos < self.textstart)
                {
                    self.textpos = self.textbeg;
                    return false;
                }
                if anchors.contains(Anchors::BEGINNING) && self.textpos > self.textbeg {
                    self.textpos = self.textbeg;
                }
            }

            return match &prog.bm_prefix {
                Some(bm) => bm.is_match(&self.text, self.textpos, self.textbeg, self.textend),
                None => true,
            };
        }

        if let Some(bm) = &prog.bm_prefix {
            return match bm.scan(&self.text, self.textpos, self.textbeg, self.textend) {
                Some(pos) => {
                    self.textpos = pos;
                    true
                }
                None => {
                    self.textpos = if prog.rtl { self.textbeg } else { self.textend };
                    false
                }
            };
        }

        let Some(fc) = &prog.fc_prefix else {
            return true;
        };

        self.rtl = prog.rtl;
        self.ci = fc.ci;
        let singleton = fc.class.singleton();
        let mut remaining = self.forward_chars();
        while remaining > 0 {
            let ch = self.forward_char_next();
            let hit = match singleton {
                Some(s) => s == ch,
                None => fc.class.contains(ch),
            };
            if hit {
                self.backward_next();
                return true;
            }
            remaining -= 1;
        }
        false
    }

    #[inline]
    pub(super) fn forward_chars(&self) -> i32 {
        if self.rtl {
            self.textpos - self.textbeg
        } else {
            self.textend - self.textpos
        }
    }

    #[inline]
    pub(super) fn forward_char_next(&mut self) -> char {
        let ch = if self.rtl {
            self.textpos -= 1;
            self.text[self.textpos as usize]
        } else {
            self.textpos += 1;
            self.text[self.textpos as usize - 1]
        };
        if self.ci { to_lower(ch) } else { ch }
    }

    #[inline]
    pub(super) fn backward_next(&mut self) {
        self.textpos += if self.rtl { 1 } else { -1 };
    }
}
