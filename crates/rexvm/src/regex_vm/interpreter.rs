// Backtracking interpreter.
//
// Instruction words run in one of three forms. The forward form tries to
// match and may push a frame on the track stack; a frame is the code
// position to re-enter plus up to three saved integers. Popping a frame
// re-enters the instruction in its `Back` form, or `Back2` when the saved
// position was pushed negated. The mark stack carries loop bookkeeping and
// the crawl stack logs which capture slots were written so they can be
// undone.

use log::trace;

use crate::char_class::{is_ecma_word_char, is_word_char, to_lower};
use crate::regex_error::MatchTimeout;
use crate::regex_limits::STACK_HEADROOM_FACTOR;
use crate::regex_options::RegexOptions;
use crate::regex_vm::opcode::{CI, OpCode, RTL};
use crate::regex_vm::runner::{Mode, Runner};

/// What the dispatcher does after an instruction.
enum Step {
    /// Move past the instruction and its `n` operands.
    Advance(i32),
    /// The instruction already moved the code position.
    Jump,
    Backtrack,
    Stop,
}

impl Runner {
    /// Runs the program once from `textpos`. On return slot 0 is
    /// populated if and only if the attempt matched.
    pub(super) fn go(&mut self) -> Result<(), MatchTimeout> {
        self.codepos = 0;
        self.set_operator(self.prog.codes[0], Mode::Forward);
        let debug = self.prog.options.contains(RegexOptions::DEBUG);

        loop {
            self.check_timeout()?;
            if debug {
                trace!(
                    "pos {:>4} {}{}",
                    self.textpos,
                    self.prog.describe_instruction(self.codepos as usize),
                    match self.mode {
                        Mode::Forward => "",
                        Mode::Back => " (back)",
                        Mode::Back2 => " (back2)",
                    }
                );
            }

            let step = match self.mode {
                Mode::Forward => self.step_forward(),
                Mode::Back => self.step_back(false),
                Mode::Back2 => self.step_back(true),
            };
            match step {
                Step::Advance(n) => self.advance(n),
                Step::Jump => {}
                Step::Backtrack => self.backtrack(),
                Step::Stop => return Ok(()),
            }
        }
    }

    fn step_forward(&mut self) -> Step {
        use OpCode::*;
        match self.op {
            Stop => Step::Stop,
            Nothing => Step::Backtrack,

            Goto => {
                let target = self.operand(0);
                self.goto(target);
                Step::Jump
            }

            Testref => {
                if !self.is_matched(self.operand(0)) {
                    return Step::Backtrack;
                }
                Step::Advance(1)
            }

            Lazybranch => {
                self.track_push1(self.textpos);
                Step::Advance(1)
            }

            Setmark => {
                self.stack_push1(self.textpos);
                self.track_push0();
                Step::Advance(0)
            }

            Nullmark => {
                self.stack_push1(-1);
                self.track_push0();
                Step::Advance(0)
            }

            Getmark => {
                self.stack_pop(1);
                let mark = self.stack_peek(0);
                self.track_push1(mark);
                self.textpos = mark;
                Step::Advance(0)
            }

            Capturemark => {
                let cap = self.operand(0);
                let uncap = self.operand(1);
                if uncap != -1 && !self.is_matched(uncap) {
                    return Step::Backtrack;
                }
                self.stack_pop(1);
                let mark = self.stack_peek(0);
                if uncap != -1 {
                    self.transfer_capture(cap, uncap, mark, self.textpos);
                } else {
                    self.capture(cap, mark, self.textpos);
                }
                self.track_push1(mark);
                Step::Advance(2)
            }

            Branchmark => {
                self.stack_pop(1);
                let mark = self.stack_peek(0);
                if self.textpos != mark {
                    // nonempty iteration: loop again
                    self.track_push2(mark, self.textpos);
                    self.stack_push1(self.textpos);
                    let target = self.operand(0);
                    self.goto(target);
                    Step::Jump
                } else {
                    // empty iteration: go straight
                    self.track_push1_back2(mark);
                    Step::Advance(1)
                }
            }

            Lazybranchmark => {
                self.stack_pop(1);
                let old_mark = self.stack_peek(0);
                if self.textpos != old_mark {
                    if old_mark != -1 {
                        self.track_push2(old_mark, self.textpos);
                    } else {
                        self.track_push2(self.textpos, self.textpos);
                    }
                } else {
                    // empty iteration: keep the mark for the back2 pop
                    self.stack_push1(old_mark);
                    self.track_push1_back2(old_mark);
                }
                Step::Advance(1)
            }

            Setcount => {
                self.stack_push2(self.textpos, self.operand(0));
                self.track_push0();
                Step::Advance(1)
            }

            Nullcount => {
                self.stack_push2(-1, self.operand(0));
                self.track_push0();
                Step::Advance(1)
            }

            Branchcount => {
                self.stack_pop(2);
                let mark = self.stack_peek(0);
                let count = self.stack_peek(1);
                let matched = self.textpos - mark;
                if count >= self.operand(1) || (matched == 0 && count >= 0) {
                    // limit reached or empty iteration: go straight
                    self.track_push2_back2(mark, count);
                    Step::Advance(2)
                } else {
                    self.track_push1(mark);
                    self.stack_push2(self.textpos, count + 1);
                    let target = self.operand(0);
                    self.goto(target);
                    Step::Jump
                }
            }

            Lazybranchcount => {
                self.stack_pop(2);
                let mark = self.stack_peek(0);
                let count = self.stack_peek(1);
                if count < 0 {
                    // below the minimum: loop now
                    self.track_push1_back2(mark);
                    self.stack_push2(self.textpos, count + 1);
                    let target = self.operand(0);
                    self.goto(target);
                    Step::Jump
                } else {
                    self.track_push3(mark, count, self.textpos);
                    Step::Advance(2)
                }
            }

            Setjump => {
                self.stack_push2(self.track_depth(), self.crawl_depth());
                self.track_push0();
                Step::Advance(0)
            }

            Backjump => {
                self.stack_pop(2);
                self.track_to(self.stack_peek(0));
                let crawl_target = self.stack_peek(1);
                while self.crawl_depth() != crawl_target {
                    self.uncapture();
                }
                Step::Backtrack
            }

            Forejump => {
                self.stack_pop(2);
                self.track_to(self.stack_peek(0));
                self.track_push1(self.stack_peek(1));
                Step::Advance(0)
            }

            Bol => {
                if self.textpos > self.textbeg && self.char_at(self.textpos - 1) != '\n' {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            Eol => {
                if self.textpos < self.textend && self.char_at(self.textpos) != '\n' {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            Boundary | Nonboundary | EcmaBoundary | NonEcmaBoundary => {
                let at = match self.op {
                    Boundary | Nonboundary => self.is_boundary(is_word_char),
                    _ => self.is_boundary(is_ecma_word_char),
                };
                let want = matches!(self.op, Boundary | EcmaBoundary);
                if at != want {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            Beginning => {
                if self.textpos > self.textbeg {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            Start => {
                if self.textpos != self.textstart {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            EndZ => {
                let right = self.textend - self.textpos;
                if right > 1 || (right == 1 && self.char_at(self.textpos) != '\n') {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            End => {
                if self.textpos < self.textend {
                    return Step::Backtrack;
                }
                Step::Advance(0)
            }

            One | Notone | Set => {
                if self.forward_chars() < 1 {
                    return Step::Backtrack;
                }
                let operand = self.operand(0);
                let ch = self.forward_char_next();
                if !self.test_char(self.op, operand, ch) {
                    return Step::Backtrack;
                }
                Step::Advance(1)
            }

            Multi => {
                if !self.string_match(self.operand(0)) {
                    return Step::Backtrack;
                }
                Step::Advance(1)
            }

            Ref => {
                let slot = self.operand(0);
                if self.is_matched(slot) {
                    let slot = slot as usize;
                    let index = self.matches.match_index(slot);
                    let len = self.matches.match_length(slot);
                    if !self.ref_match(index, len) {
                        return Step::Backtrack;
                    }
                } else if !self.prog.options.contains(RegexOptions::ECMA_SCRIPT) {
                    return Step::Backtrack;
                }
                Step::Advance(1)
            }

            Onerep | Notonerep | Setrep => {
                let mut c = self.operand(1);
                if self.forward_chars() < c {
                    return Step::Backtrack;
                }
                let operand = self.operand(0);
                while c > 0 {
                    c -= 1;
                    let ch = self.forward_char_next();
                    if !self.test_char(self.op, operand, ch) {
                        return Step::Backtrack;
                    }
                }
                Step::Advance(2)
            }

            Oneloop | Notoneloop | Setloop => {
                let c = self.operand(1).min(self.forward_chars());
                let operand = self.operand(0);
                let mut i = c;
                while i > 0 {
                    let ch = self.forward_char_next();
                    if !self.test_char(self.op, operand, ch) {
                        self.backward_next();
                        break;
                    }
                    i -= 1;
                }
                if c > i {
                    self.track_push2(c - i - 1, self.textpos - self.bump());
                }
                Step::Advance(2)
            }

            Onelazy | Notonelazy | Setlazy => {
                let c = self.operand(1).min(self.forward_chars());
                if c > 0 {
                    self.track_push2(c - 1, self.textpos);
                }
                Step::Advance(2)
            }

            Prune => panic!("unexpected opcode {:?} at {}", self.op, self.codepos),
        }
    }

    fn step_back(&mut self, back2: bool) -> Step {
        use OpCode::*;
        match (self.op, back2) {
            (Lazybranch, false) => {
                self.track_pop(1);
                self.textpos = self.track_peek(0);
                let target = self.operand(0);
                self.goto(target);
                Step::Jump
            }

            (Setmark | Nullmark, false) => {
                self.stack_pop(1);
                Step::Backtrack
            }

            (Getmark, false) => {
                self.track_pop(1);
                self.stack_push1(self.track_peek(0));
                Step::Backtrack
            }

            (Capturemark, false) => {
                self.track_pop(1);
                self.stack_push1(self.track_peek(0));
                self.uncapture();
                if self.operand(0) != -1 && self.operand(1) != -1 {
                    self.uncapture();
                }
                Step::Backtrack
            }

            (Branchmark, false) => {
                self.track_pop(2);
                self.stack_pop(1);
                self.textpos = self.track_peek(1);
                self.track_push1_back2(self.track_peek(0));
                Step::Advance(1)
            }

            (Branchmark, true) => {
                self.track_pop(1);
                self.stack_push1(self.track_peek(0));
                Step::Backtrack
            }

            (Lazybranchmark, false) => {
                self.track_pop(2);
                let pos = self.track_peek(1);
                self.track_push1_back2(self.track_peek(0));
                self.stack_push1(pos);
                self.textpos = pos;
                let target = self.operand(0);
                self.goto(target);
                Step::Jump
            }

            (Lazybranchmark, true) => {
                self.stack_pop(1);
                self.track_pop(1);
                self.stack_push1(self.track_peek(0));
                Step::Backtrack
            }

            (Setcount | Nullcount, false) => {
                self.stack_pop(2);
                Step::Backtrack
            }

            (Branchcount, false) => {
                self.track_pop(1);
                self.stack_pop(2);
                if self.stack_peek(1) > 0 {
                    // the iteration can be given back: go straight
                    self.textpos = self.stack_peek(0);
                    self.track_push2_back2(self.track_peek(0), self.stack_peek(1) - 1);
                    return Step::Advance(2);
                }
                self.stack_push2(self.track_peek(0), self.stack_peek(1) - 1);
                Step::Backtrack
            }

            (Branchcount, true) => {
                self.track_pop(2);
                self.stack_push2(self.track_peek(0), self.track_peek(1));
                Step::Backtrack
            }

            (Lazybranchcount, false) => {
                self.track_pop(3);
                let mark = self.track_peek(0);
                let count = self.track_peek(1);
                let pos = self.track_peek(2);
                if count < self.operand(1) && pos != mark {
                    self.textpos = pos;
                    self.stack_push2(pos, count + 1);
                    self.track_push1_back2(mark);
                    let target = self.operand(0);
                    self.goto(target);
                    return Step::Jump;
                }
                self.stack_push2(mark, count);
                Step::Backtrack
            }

            (Lazybranchcount, true) => {
                self.track_pop(1);
                self.stack_pop(2);
                self.stack_push2(self.track_peek(0), self.stack_peek(1) - 1);
                Step::Backtrack
            }

            (Setjump, false) => {
                self.stack_pop(2);
                Step::Backtrack
            }

            (Forejump, false) => {
                self.track_pop(1);
                let crawl_target = self.track_peek(0);
                while self.crawl_depth() != crawl_target {
                    self.uncapture();
                }
                Step::Backtrack
            }

            (Oneloop | Notoneloop | Setloop, false) => {
                self.track_pop(2);
                let i = self.track_peek(0);
                let pos = self.track_peek(1);
                self.textpos = pos;
                if i > 0 {
                    self.track_push2(i - 1, pos - self.bump());
                }
                Step::Advance(2)
            }

            (Onelazy | Notonelazy | Setlazy, false) => {
                self.track_pop(2);
                let pos = self.track_peek(1);
                self.textpos = pos;
                let operand = self.operand(0);
                let ch = self.forward_char_next();
                if !self.test_char(self.op, operand, ch) {
                    return Step::Backtrack;
                }
                let i = self.track_peek(0);
                if i > 0 {
                    self.track_push2(i - 1, pos + self.bump());
                }
                Step::Advance(2)
            }

            (op, _) => unreachable!("opcode {:?} has no backtrack form (back2 = {})", op, back2),
        }
    }

    // ----- code position -----

    #[inline]
    fn set_operator(&mut self, word: i32, mode: Mode) {
        self.ci = word & CI != 0;
        self.rtl = word & RTL != 0;
        self.op = OpCode::from_word(word);
        self.mode = mode;
    }

    #[inline]
    fn operand(&self, i: i32) -> i32 {
        self.prog.codes[(self.codepos + i + 1) as usize]
    }

    #[inline]
    fn advance(&mut self, operands: i32) {
        self.codepos += operands + 1;
        self.set_operator(self.prog.codes[self.codepos as usize], Mode::Forward);
    }

    fn goto(&mut self, newpos: i32) {
        if newpos < self.codepos {
            self.ensure_storage();
        }
        self.set_operator(self.prog.codes[newpos as usize], Mode::Forward);
        self.codepos = newpos;
    }

    fn backtrack(&mut self) {
        let mut newpos = self.track[self.trackpos as usize];
        self.trackpos += 1;
        let mode = if newpos < 0 {
            newpos = -newpos;
            Mode::Back2
        } else {
            Mode::Back
        };
        self.set_operator(self.prog.codes[newpos as usize], mode);
        if newpos < self.codepos {
            self.ensure_storage();
        }
        self.codepos = newpos;
    }

    // ----- stacks -----

    fn ensure_storage(&mut self) {
        let headroom = self.trackcount * STACK_HEADROOM_FACTOR as i32;
        if self.stackpos < headroom {
            self.stackpos += double_stack(&mut self.stack);
        }
        if self.trackpos < headroom {
            self.trackpos += double_stack(&mut self.track);
        }
    }

    /// Backtrack frames held, independent of buffer size.
    #[inline]
    fn track_depth(&self) -> i32 {
        self.track.len() as i32 - self.trackpos
    }

    #[inline]
    fn track_to(&mut self, depth: i32) {
        self.trackpos = self.track.len() as i32 - depth;
    }

    #[inline]
    fn push_track(&mut self, value: i32) {
        self.trackpos -= 1;
        self.track[self.trackpos as usize] = value;
    }

    #[inline]
    fn track_push0(&mut self) {
        self.push_track(self.codepos);
    }

    #[inline]
    fn track_push1(&mut self, a: i32) {
        self.push_track(a);
        self.push_track(self.codepos);
    }

    #[inline]
    fn track_push2(&mut self, a: i32, b: i32) {
        self.push_track(a);
        self.push_track(b);
        self.push_track(self.codepos);
    }

    #[inline]
    fn track_push3(&mut self, a: i32, b: i32, c: i32) {
        self.push_track(a);
        self.push_track(b);
        self.push_track(c);
        self.push_track(self.codepos);
    }

    /// Frame re-entered in the `Back2` form.
    #[inline]
    fn track_push1_back2(&mut self, a: i32) {
        self.push_track(a);
        self.push_track(-self.codepos);
    }

    #[inline]
    fn track_push2_back2(&mut self, a: i32, b: i32) {
        self.push_track(a);
        self.push_track(b);
        self.push_track(-self.codepos);
    }

    #[inline]
    fn track_pop(&mut self, n: i32) {
        self.trackpos += n;
    }

    #[inline]
    fn track_peek(&self, i: i32) -> i32 {
        self.track[(self.trackpos - i - 1) as usize]
    }

    #[inline]
    fn stack_push1(&mut self, a: i32) {
        self.stackpos -= 1;
        self.stack[self.stackpos as usize] = a;
    }

    #[inline]
    fn stack_push2(&mut self, a: i32, b: i32) {
        self.stack_push1(a);
        self.stack_push1(b);
    }

    #[inline]
    fn stack_pop(&mut self, n: i32) {
        self.stackpos += n;
    }

    #[inline]
    fn stack_peek(&self, i: i32) -> i32 {
        self.stack[(self.stackpos - i - 1) as usize]
    }

    // ----- captures -----

    #[inline]
    fn crawl_depth(&self) -> i32 {
        self.crawl.len() as i32 - self.crawlpos
    }

    fn push_crawl(&mut self, slot: usize) {
        if self.crawlpos == 0 {
            self.crawlpos += double_stack(&mut self.crawl);
        }
        self.crawlpos -= 1;
        self.crawl[self.crawlpos as usize] = slot as i32;
    }

    fn pop_crawl(&mut self) -> usize {
        let slot = self.crawl[self.crawlpos as usize];
        self.crawlpos += 1;
        slot as usize
    }

    // Capture operands are slots; the writer maps group numbers.

    fn is_matched(&self, slot: i32) -> bool {
        usize::try_from(slot)
            .is_ok_and(|slot| slot < self.matches.slot_count() && self.matches.is_matched(slot))
    }

    fn capture(&mut self, slot: i32, mut start: i32, mut end: i32) {
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        let slot = slot as usize;
        self.push_crawl(slot);
        self.matches.add_match(slot, start, end - start);
    }

    /// Closes a balancing group: pops `unslot` and, when `slot` is not -1,
    /// captures the text between the popped capture and this one.
    fn transfer_capture(&mut self, slot: i32, unslot: i32, mut start: i32, mut end: i32) {
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        let unslot = unslot as usize;
        let start2 = self.matches.match_index(unslot);
        let end2 = start2 + self.matches.match_length(unslot);

        if start >= end2 {
            end = start;
            start = end2;
        } else if end <= start2 {
            start = start2;
        } else {
            if end > end2 {
                end = end2;
            }
            if start2 > start {
                start = start2;
            }
        }

        self.push_crawl(unslot);
        self.matches.balance_match(unslot);

        if slot != -1 {
            let slot = slot as usize;
            self.push_crawl(slot);
            self.matches.add_match(slot, start, end - start);
        }
    }

    fn uncapture(&mut self) {
        let slot = self.pop_crawl();
        self.matches.remove_match(slot);
    }

    // ----- text -----

    #[inline]
    fn bump(&self) -> i32 {
        if self.rtl { -1 } else { 1 }
    }

    #[inline]
    fn char_at(&self, pos: i32) -> char {
        self.text[pos as usize]
    }

    fn is_boundary(&self, word: fn(char) -> bool) -> bool {
        let pos = self.textpos;
        (pos > self.textbeg && word(self.char_at(pos - 1)))
            != (pos < self.textend && word(self.char_at(pos)))
    }

    /// Tests `ch` against the operand of a One/Notone/Set family opcode.
    #[inline]
    fn test_char(&self, op: OpCode, operand: i32, ch: char) -> bool {
        use OpCode::*;
        match op {
            One | Onerep | Oneloop | Onelazy => ch as i32 == operand,
            Notone | Notonerep | Notoneloop | Notonelazy => ch as i32 != operand,
            _ => self.prog.class(operand).contains(ch),
        }
    }

    fn string_match(&mut self, index: i32) -> bool {
        let s = self.prog.string(index);
        let len = s.len() as i32;
        let mut pos = if !self.rtl {
            if self.textend - self.textpos < len {
                return false;
            }
            self.textpos + len
        } else {
            if self.textpos - self.textbeg < len {
                return false;
            }
            self.textpos
        };

        for &expected in s.iter().rev() {
            pos -= 1;
            let mut ch = self.text[pos as usize];
            if self.ci {
                ch = to_lower(ch);
            }
            if ch != expected {
                return false;
            }
        }

        if !self.rtl {
            pos += len;
        }
        self.textpos = pos;
        true
    }

    fn ref_match(&mut self, index: i32, len: i32) -> bool {
        let mut pos = if !self.rtl {
            if self.textend - self.textpos < len {
                return false;
            }
            self.textpos + len
        } else {
            if self.textpos - self.textbeg < len {
                return false;
            }
            self.textpos
        };

        let mut cmpos = index + len;
        for _ in 0..len {
            cmpos -= 1;
            pos -= 1;
            let (mut a, mut b) = (self.text[cmpos as usize], self.text[pos as usize]);
            if self.ci {
                a = to_lower(a);
                b = to_lower(b);
            }
            if a != b {
                return false;
            }
        }

        if !self.rtl {
            pos += len;
        }
        self.textpos = pos;
        true
    }
}

/// Doubles a downward-growing stack, moving its contents to the top half.
/// Returns how far positions into the stack moved.
fn double_stack(buf: &mut Vec<i32>) -> i32 {
    let old_len = buf.len();
    let mut grown = vec![0; old_len * 2];
    grown[old_len..].copy_from_slice(buf);
    *buf = grown;
    old_len as i32
}
