// Compiled program: instruction words, constants and the metadata the
// runner uses to skip impossible start positions.

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use bitflags::bitflags;
use smol_str::SmolStr;

use crate::char_class::ClassCode;
use crate::regex_limits::INFINITE_REPEAT;
use crate::regex_options::RegexOptions;
use crate::regex_vm::boyer_moore::BoyerMoore;
use crate::regex_vm::opcode::{CI, OpCode, RTL};

bitflags! {
    /// Zero-width assertions every match must begin with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Anchors: u32 {
        const BEGINNING = 0x0001;
        const BOL = 0x0002;
        const START = 0x0004;
        const EOL = 0x0008;
        const END_Z = 0x0010;
        const END = 0x0020;
        const BOUNDARY = 0x0040;
        const ECMA_BOUNDARY = 0x0080;
    }
}

/// Entry of the constant table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Str(Box<[char]>),
    Class(ClassCode),
}

/// Characters that can start a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstChars {
    pub class: ClassCode,
    /// Input characters are lowercased before the test.
    pub ci: bool,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub codes: Vec<i32>,
    pub constants: Vec<Constant>,
    /// Backtracking instructions in `codes`; sizes the runner stacks.
    pub track_count: usize,
    /// Capture number to slot, when numbers are not dense.
    pub caps: Option<BTreeMap<i32, usize>>,
    /// Number of capture slots.
    pub cap_size: usize,
    pub bm_prefix: Option<BoyerMoore>,
    pub fc_prefix: Option<FirstChars>,
    pub anchors: Anchors,
    pub rtl: bool,
    pub pattern: String,
    pub options: RegexOptions,
    pub cap_names: AHashMap<SmolStr, i32>,
    /// Group numbers in slot order.
    pub group_numbers: Vec<i32>,
    /// Group names in slot order; unnamed groups use their number.
    pub group_names: Vec<SmolStr>,
}

impl Program {
    /// Slot of a capture number, if the group exists.
    pub fn map_capnum(&self, capnum: i32) -> Option<usize> {
        match &self.caps {
            Some(caps) => caps.get(&capnum).copied(),
            None if capnum >= 0 && (capnum as usize) < self.cap_size => Some(capnum as usize),
            None => None,
        }
    }

    pub fn string(&self, index: i32) -> &[char] {
        match &self.constants[index as usize] {
            Constant::Str(s) => s,
            Constant::Class(_) => panic!("constant {} is not a string", index),
        }
    }

    pub fn class(&self, index: i32) -> &ClassCode {
        match &self.constants[index as usize] {
            Constant::Class(c) => c,
            Constant::Str(_) => panic!("constant {} is not a class", index),
        }
    }

    pub fn is_debug(&self) -> bool {
        self.options.contains(RegexOptions::DEBUG)
    }

    /// Renders the instruction at `offset`.
    pub fn describe_instruction(&self, offset: usize) -> String {
        let word = self.codes[offset];
        let op = OpCode::from_word(word);
        let mut out = format!(
            "{:06} {}{}",
            offset,
            if op.backtracks() { '*' } else { ' ' },
            op.name()
        );
        if word & RTL != 0 {
            out.push_str("-Rtl");
        }
        if word & CI != 0 {
            out.push_str("-Ci");
        }
        while out.len() < 32 {
            out.push(' ');
        }

        if op.size() == 1 {
            return out;
        }
        let operand = self.codes[offset + 1];
        match op {
            _ if op.has_char_operand() => {
                let ch = char::from_u32(operand as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push_str(&format!("Ch = {:?}", ch));
            }
            _ if op.has_set_operand() => {
                out.push_str(&format!("Set = {}", self.class(operand)));
            }
            OpCode::Multi => {
                let s: String = self.string(operand).iter().collect();
                out.push_str(&format!("String = {:?}", s));
            }
            OpCode::Ref | OpCode::Testref => out.push_str(&format!("Index = {}", operand)),
            OpCode::Capturemark => {
                out.push_str(&format!("Index = {}", operand));
                let uncap = self.codes[offset + 2];
                if uncap != -1 {
                    out.push_str(&format!(", Unindex = {}", uncap));
                }
            }
            OpCode::Nullcount | OpCode::Setcount => {
                out.push_str(&format!("Value = {}", operand));
            }
            _ if op.has_jump_operand() => out.push_str(&format!("Addr = {}", operand)),
            _ => {}
        }

        if op.has_count_operand() {
            let count = self.codes[offset + 2];
            if count == INFINITE_REPEAT {
                out.push_str(", Rep = inf");
            } else {
                out.push_str(&format!(", Rep = {}", count));
            }
        }
        if matches!(op, OpCode::Branchcount | OpCode::Lazybranchcount) {
            let limit = self.codes[offset + 2];
            if limit == INFINITE_REPEAT {
                out.push_str(", Limit = inf");
            } else {
                out.push_str(&format!(", Limit = {}", limit));
            }
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pattern:    {:?}", self.pattern)?;
        writeln!(
            f,
            "Direction:  {}",
            if self.rtl { "right-to-left" } else { "left-to-right" }
        )?;
        match &self.fc_prefix {
            Some(fc) => writeln!(f, "Firstchars: {}{}", fc.class, if fc.ci { " (ci)" } else { "" })?,
            None => writeln!(f, "Firstchars: n/a")?,
        }
        match &self.bm_prefix {
            Some(bm) => writeln!(f, "Prefix:     {}", bm)?,
            None => writeln!(f, "Prefix:     n/a")?,
        }
        if self.anchors.is_empty() {
            writeln!(f, "Anchors:    None")?;
        } else {
            let names: Vec<&str> = self.anchors.iter_names().map(|(name, _)| name).collect();
            writeln!(f, "Anchors:    {}", names.join(", "))?;
        }
        writeln!(f, "Tracks:     {}", self.track_count)?;
        writeln!(f, "Slots:      {}", self.cap_size)?;

        if !self.constants.is_empty() {
            writeln!(f)?;
            for (i, constant) in self.constants.iter().enumerate() {
                match constant {
                    Constant::Str(s) => {
                        let s: String = s.iter().collect();
                        writeln!(f, "  K{} = {:?}", i, s)?;
                    }
                    Constant::Class(c) => writeln!(f, "  K{} = {}", i, c)?,
                }
            }
        }

        writeln!(f)?;
        let mut offset = 0;
        while offset < self.codes.len() {
            writeln!(f, "{}", self.describe_instruction(offset))?;
            offset += OpCode::from_word(self.codes[offset]).size();
        }
        Ok(())
    }
}
