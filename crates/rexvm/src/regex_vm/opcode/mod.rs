/// Regex VM instruction set.
///
/// An instruction is an opcode word followed by zero to two operand words.
/// The opcode word carries the base opcode in its low six bits plus the
/// `RTL` and `CI` modifier bits set by the writer. `BACK` and `BACK2` are
/// never stored; the interpreter adds them when it re-enters an instruction
/// while backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Single-character repetitions
    Onerep = 0,     // lef,back char,min,max    a {n}
    Notonerep,      // lef,back char,min,max    .{n}
    Setrep,         // lef,back set,min,max     [\d]{n}
    Oneloop,        // lef,back char,min,max    a {,n}
    Notoneloop,     // lef,back char,min,max    .{,n}
    Setloop,        // lef,back set,min,max     [\d]{,n}
    Onelazy,        // lef,back char,min,max    a {,n}?
    Notonelazy,     // lef,back char,min,max    .{,n}?
    Setlazy,        // lef,back set,min,max     [\d]{,n}?

    // Single characters and strings
    One,            // lef      char            a
    Notone,         // lef      char            [^a]
    Set,            // lef      set             [a-z\s]
    Multi,          // lef      string          abcd
    Ref,            // lef      group           \#

    // Zero-width assertions
    Bol,            //                          ^
    Eol,            //                          $
    Boundary,       //                          \b
    Nonboundary,    //                          \B
    Beginning,      //                          \A
    Start,          //                          \G
    EndZ,           //                          \Z
    End,            //                          \z

    Nothing,        //                          Reject!

    // Backtracking primitives
    Lazybranch,     // back     jump            straight first
    Branchmark,     // back     jump            branch first for loop
    Lazybranchmark, // back     jump            straight first for loop
    Nullcount,      // back     val             set counter, null mark
    Setcount,       // back     val             set counter, make mark
    Branchcount,    // back     jump,limit      branch++ if zero<=c<limit
    Lazybranchcount,// back     jump,limit      same, but straight first
    Nullmark,       // back                     save position
    Setmark,        // back                     save position
    Capturemark,    // back     group           define group
    Getmark,        // back                     recall position
    Setjump,        // back                     save backtrack state
    Backjump,       //                          zap back to saved state
    Forejump,       //                          zap backtracking state
    Testref,        //                          backtrack if ref undefined
    Goto,           //          jump            just go

    Prune,          //                          prune it baby
    Stop,           //                          done!

    EcmaBoundary,   //                          \b
    NonEcmaBoundary,//                          \B
}

use OpCode::*;

static ALL_OPCODES: [OpCode; 43] = [
    Onerep, Notonerep, Setrep, Oneloop, Notoneloop, Setloop, Onelazy, Notonelazy, Setlazy,
    One, Notone, Set, Multi, Ref, Bol, Eol, Boundary, Nonboundary, Beginning, Start, EndZ, End,
    Nothing, Lazybranch, Branchmark, Lazybranchmark, Nullcount, Setcount, Branchcount,
    Lazybranchcount, Nullmark, Setmark, Capturemark, Getmark, Setjump, Backjump, Forejump,
    Testref, Goto, Prune, Stop, EcmaBoundary, NonEcmaBoundary,
];

/// Mask selecting the base opcode from an instruction word.
pub const OP_MASK: i32 = 63;
/// The instruction runs right-to-left.
pub const RTL: i32 = 64;
/// Backtracking into the instruction.
pub const BACK: i32 = 128;
/// Second backtracking form.
pub const BACK2: i32 = 256;
/// The instruction compares case-insensitively.
pub const CI: i32 = 512;

impl OpCode {
    /// Decodes the base opcode of an instruction word.
    #[inline(always)]
    pub fn from_word(word: i32) -> Self {
        ALL_OPCODES[(word & OP_MASK) as usize]
    }

    /// Number of words the instruction occupies, opcode included.
    pub fn size(self) -> usize {
        match self {
            Nothing | Bol | Eol | Boundary | Nonboundary | EcmaBoundary | NonEcmaBoundary
            | Beginning | Start | EndZ | End | Nullmark | Setmark | Getmark | Setjump
            | Backjump | Forejump | Stop => 1,

            One | Notone | Multi | Ref | Testref | Goto | Nullcount | Setcount | Lazybranch
            | Branchmark | Lazybranchmark | Prune | Set => 2,

            Capturemark | Branchcount | Lazybranchcount | Onerep | Notonerep | Oneloop
            | Notoneloop | Onelazy | Notonelazy | Setlazy | Setrep | Setloop => 3,
        }
    }

    /// Whether executing the instruction may push a backtrack frame.
    /// The writer counts these to size the backtrack stack.
    pub fn backtracks(self) -> bool {
        matches!(
            self,
            Oneloop
                | Notoneloop
                | Setloop
                | Onelazy
                | Notonelazy
                | Setlazy
                | Lazybranch
                | Branchmark
                | Lazybranchmark
                | Nullcount
                | Setcount
                | Branchcount
                | Lazybranchcount
                | Setmark
                | Capturemark
                | Getmark
                | Setjump
                | Backjump
                | Forejump
                | Goto
        )
    }

    /// First operand is a character.
    pub fn has_char_operand(self) -> bool {
        matches!(
            self,
            One | Notone | Onerep | Notonerep | Oneloop | Notoneloop | Onelazy | Notonelazy
        )
    }

    /// First operand indexes a character class in the constant table.
    pub fn has_set_operand(self) -> bool {
        matches!(self, Set | Setrep | Setloop | Setlazy)
    }

    /// Second operand is a repetition count.
    pub fn has_count_operand(self) -> bool {
        matches!(
            self,
            Onerep | Notonerep | Setrep | Oneloop | Notoneloop | Setloop | Onelazy | Notonelazy | Setlazy
        )
    }

    /// First operand is a code address.
    pub fn has_jump_operand(self) -> bool {
        matches!(
            self,
            Goto | Lazybranch | Branchmark | Lazybranchmark | Branchcount | Lazybranchcount
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Onerep => "Onerep",
            Notonerep => "Notonerep",
            Setrep => "Setrep",
            Oneloop => "Oneloop",
            Notoneloop => "Notoneloop",
            Setloop => "Setloop",
            Onelazy => "Onelazy",
            Notonelazy => "Notonelazy",
            Setlazy => "Setlazy",
            One => "One",
            Notone => "Notone",
            Set => "Set",
            Multi => "Multi",
            Ref => "Ref",
            Bol => "Bol",
            Eol => "Eol",
            Boundary => "Boundary",
            Nonboundary => "Nonboundary",
            Beginning => "Beginning",
            Start => "Start",
            EndZ => "EndZ",
            End => "End",
            Nothing => "Nothing",
            Lazybranch => "Lazybranch",
            Branchmark => "Branchmark",
            Lazybranchmark => "Lazybranchmark",
            Nullcount => "Nullcount",
            Setcount => "Setcount",
            Branchcount => "Branchcount",
            Lazybranchcount => "Lazybranchcount",
            Nullmark => "Nullmark",
            Setmark => "Setmark",
            Capturemark => "Capturemark",
            Getmark => "Getmark",
            Setjump => "Setjump",
            Backjump => "Backjump",
            Forejump => "Forejump",
            Testref => "Testref",
            Goto => "Goto",
            Prune => "Prune",
            Stop => "Stop",
            EcmaBoundary => "ECMABoundary",
            NonEcmaBoundary => "NonECMABoundary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_matches_discriminant() {
        for (i, op) in ALL_OPCODES.iter().enumerate() {
            assert_eq!(*op as usize, i);
            assert_eq!(OpCode::from_word(i as i32 | RTL | CI), *op);
        }
    }

    #[test]
    fn test_sizes() {
        assert_eq!(OpCode::Stop.size(), 1);
        assert_eq!(OpCode::Goto.size(), 2);
        assert_eq!(OpCode::Capturemark.size(), 3);
        assert!(OpCode::Setjump.backtracks());
        assert!(!OpCode::One.backtracks());
    }
}
