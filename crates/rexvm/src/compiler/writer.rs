// Tree to instruction stream.
//
// The tree is walked twice without recursion: a counting pass sizes the
// code buffer and the backtrack stack, then the emitting pass fills it.
// Each node gets a chance to emit code before and after every child;
// forward jumps are emitted with a placeholder target and patched once the
// target is known. Pending patch sites and loop heads share one integer
// stack, in the order the nodes push and pop them.

use std::collections::BTreeMap;

use ahash::AHashMap;
use smol_str::SmolStr;

use crate::char_class::ClassCode;
use crate::compiler::RegexTree;
use crate::compiler::node::{CharTest, NodeId, NodeKind};
use crate::compiler::prefix;
use crate::regex_limits::INFINITE_REPEAT;
use crate::regex_options::RegexOptions;
use crate::regex_vm::opcode::{CI, OpCode, RTL};
use crate::regex_vm::{BoyerMoore, Constant, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Before,
    After,
}

struct RegexWriter<'a> {
    tree: &'a RegexTree,
    counting: bool,
    count: usize,
    codes: Vec<i32>,
    constants: Vec<Constant>,
    constant_index: AHashMap<Constant, i32>,
    track_count: usize,
    patches: Vec<usize>,
    caps: Option<BTreeMap<i32, usize>>,
}

/// Compiles a parsed tree into a program.
pub fn write(tree: &RegexTree, pattern: &str) -> Program {
    let (caps, cap_size) = match &tree.capnumlist {
        Some(list) if tree.captop as usize != list.len() => {
            let caps: BTreeMap<i32, usize> =
                list.iter().enumerate().map(|(slot, &num)| (num, slot)).collect();
            (Some(caps), list.len())
        }
        _ => (None, tree.captop as usize),
    };

    let mut writer = RegexWriter {
        tree,
        counting: true,
        count: 0,
        codes: Vec::new(),
        constants: Vec::new(),
        constant_index: AHashMap::new(),
        track_count: 0,
        patches: Vec::new(),
        caps,
    };
    writer.emit_tree();
    writer.counting = false;
    writer.codes = Vec::with_capacity(writer.count);
    writer.emit_tree();

    let rtl = tree.options.contains(RegexOptions::RIGHT_TO_LEFT);
    let bm_prefix = prefix::prefix(tree).map(|p| BoyerMoore::new(&p.chars, p.ci, rtl));
    let fc_prefix = prefix::first_chars(tree);
    let anchors = prefix::anchors(tree);

    let group_numbers: Vec<i32> = match &writer.caps {
        Some(caps) => caps.keys().copied().collect(),
        None => (0..cap_size as i32).collect(),
    };
    let group_names: Vec<SmolStr> = match &tree.capslist {
        Some(names) => names.clone(),
        None => group_numbers.iter().map(|n| SmolStr::new(n.to_string())).collect(),
    };
    let cap_names = group_names
        .iter()
        .cloned()
        .zip(group_numbers.iter().copied())
        .collect();

    Program {
        codes: writer.codes,
        constants: writer.constants,
        track_count: writer.track_count,
        caps: writer.caps,
        cap_size,
        bm_prefix,
        fc_prefix,
        anchors,
        rtl,
        pattern: pattern.to_string(),
        options: tree.options,
        cap_names,
        group_numbers,
        group_names,
    }
}

impl RegexWriter<'_> {
    fn emit_tree(&mut self) {
        let tree = self.tree;
        let ast = &tree.ast;

        // every match starts with a backtrack point whose failure ends the run
        self.emit1(OpCode::Lazybranch as i32, 0);

        let mut frames: Vec<(NodeId, usize)> = Vec::new();
        let mut cur = tree.root;
        let mut child = 0usize;
        loop {
            let count = ast.child_count(cur);
            if count == 0 {
                self.emit_leaf(cur);
            } else if child < count {
                self.emit_fragment(cur, child, Visit::Before);
                frames.push((cur, child));
                cur = ast.child(cur, child);
                child = 0;
                continue;
            }

            let Some((parent, index)) = frames.pop() else {
                break;
            };
            cur = parent;
            self.emit_fragment(cur, index, Visit::After);
            child = index + 1;
        }

        let end = self.cur_pos();
        self.patch_jump(0, end);
        self.emit0(OpCode::Stop as i32);
    }

    // ----- emission -----

    fn cur_pos(&self) -> i32 {
        if self.counting { self.count as i32 } else { self.codes.len() as i32 }
    }

    /// Counts the instruction on the first pass; returns whether to store it.
    fn counted(&mut self, word: i32, operands: usize) -> bool {
        if !self.counting {
            return true;
        }
        self.count += 1 + operands;
        if OpCode::from_word(word).backtracks() {
            self.track_count += 1;
        }
        false
    }

    fn emit0(&mut self, word: i32) {
        if self.counted(word, 0) {
            self.codes.push(word);
        }
    }

    fn emit1(&mut self, word: i32, a: i32) {
        if self.counted(word, 1) {
            self.codes.extend_from_slice(&[word, a]);
        }
    }

    fn emit2(&mut self, word: i32, a: i32, b: i32) {
        if self.counted(word, 2) {
            self.codes.extend_from_slice(&[word, a, b]);
        }
    }

    /// Emits a jump with an unresolved target and remembers where it is.
    fn emit_pending(&mut self, op: OpCode) {
        self.patches.push(self.cur_pos() as usize);
        self.emit1(op as i32, 0);
    }

    fn patch_jump(&mut self, offset: usize, target: i32) {
        if !self.counting {
            self.codes[offset + 1] = target;
        }
    }

    fn pop_patch(&mut self) -> usize {
        self.patches
            .pop()
            .unwrap_or_else(|| unreachable!("unbalanced jump patches"))
    }

    fn constant(&mut self, constant: Constant) -> i32 {
        if self.counting {
            return 0;
        }
        if let Some(&index) = self.constant_index.get(&constant) {
            return index;
        }
        let index = self.constants.len() as i32;
        self.constants.push(constant.clone());
        self.constant_index.insert(constant, index);
        index
    }

    fn class_constant(&mut self, class: &ClassCode) -> i32 {
        self.constant(Constant::Class(class.clone()))
    }

    fn map_capnum(&self, capnum: i32) -> i32 {
        if capnum == -1 {
            return -1;
        }
        match &self.caps {
            Some(caps) => caps.get(&capnum).map_or(-1, |&slot| slot as i32),
            None => capnum,
        }
    }

    // ----- nodes -----

    fn emit_fragment(&mut self, id: NodeId, index: usize, visit: Visit) {
        let tree = self.tree;
        let count = tree.ast.child_count(id);
        match (tree.ast.kind(id).clone(), visit) {
            (NodeKind::Alternate, Visit::Before) => {
                if index < count - 1 {
                    self.emit_pending(OpCode::Lazybranch);
                }
            }
            (NodeKind::Alternate, Visit::After) => {
                if index < count - 1 {
                    let branch = self.pop_patch();
                    self.emit_pending(OpCode::Goto);
                    let here = self.cur_pos();
                    self.patch_jump(branch, here);
                } else {
                    let here = self.cur_pos();
                    for _ in 0..index {
                        let jump = self.pop_patch();
                        self.patch_jump(jump, here);
                    }
                }
            }

            (NodeKind::Testref(capnum), Visit::Before) => {
                if index == 0 {
                    self.emit0(OpCode::Setjump as i32);
                    self.emit_pending(OpCode::Lazybranch);
                    let slot = self.map_capnum(capnum);
                    self.emit1(OpCode::Testref as i32, slot);
                    self.emit0(OpCode::Forejump as i32);
                }
            }
            (NodeKind::Testref(_), Visit::After) => {
                if index == 0 {
                    let branch = self.pop_patch();
                    self.emit_pending(OpCode::Goto);
                    let here = self.cur_pos();
                    self.patch_jump(branch, here);
                    self.emit0(OpCode::Forejump as i32);
                    if count > 1 {
                        return;
                    }
                }
                let jump = self.pop_patch();
                let here = self.cur_pos();
                self.patch_jump(jump, here);
            }

            (NodeKind::Testgroup, Visit::Before) => {
                if index == 0 {
                    self.emit0(OpCode::Setjump as i32);
                    self.emit0(OpCode::Setmark as i32);
                    self.emit_pending(OpCode::Lazybranch);
                }
            }
            (NodeKind::Testgroup, Visit::After) => match index {
                0 => {
                    self.emit0(OpCode::Getmark as i32);
                    self.emit0(OpCode::Forejump as i32);
                }
                1 => {
                    let branch = self.pop_patch();
                    self.emit_pending(OpCode::Goto);
                    let here = self.cur_pos();
                    self.patch_jump(branch, here);
                    self.emit0(OpCode::Getmark as i32);
                    self.emit0(OpCode::Forejump as i32);
                    if count <= 2 {
                        let jump = self.pop_patch();
                        let here = self.cur_pos();
                        self.patch_jump(jump, here);
                    }
                }
                _ => {
                    let jump = self.pop_patch();
                    let here = self.cur_pos();
                    self.patch_jump(jump, here);
                }
            },

            (NodeKind::Loop { min, max, .. }, Visit::Before) => {
                if max < INFINITE_REPEAT || min > 1 {
                    if min == 0 {
                        self.emit1(OpCode::Nullcount as i32, 0);
                    } else {
                        self.emit1(OpCode::Setcount as i32, 1 - min);
                    }
                } else if min == 0 {
                    self.emit0(OpCode::Nullmark as i32);
                } else {
                    self.emit0(OpCode::Setmark as i32);
                }
                if min == 0 {
                    self.emit_pending(OpCode::Goto);
                }
                self.patches.push(self.cur_pos() as usize);
            }
            (NodeKind::Loop { min, max, lazy }, Visit::After) => {
                let start_jump = self.cur_pos();
                let body = self.pop_patch() as i32;
                if max < INFINITE_REPEAT || min > 1 {
                    let op = if lazy { OpCode::Lazybranchcount } else { OpCode::Branchcount };
                    let limit = if max == INFINITE_REPEAT { INFINITE_REPEAT } else { max - min };
                    self.emit2(op as i32, body, limit);
                } else {
                    let op = if lazy { OpCode::Lazybranchmark } else { OpCode::Branchmark };
                    self.emit1(op as i32, body);
                }
                if min == 0 {
                    let jump = self.pop_patch();
                    self.patch_jump(jump, start_jump);
                }
            }

            (NodeKind::Capture { .. }, Visit::Before) => self.emit0(OpCode::Setmark as i32),
            (NodeKind::Capture { cap, uncap }, Visit::After) => {
                let (cap, uncap) = (self.map_capnum(cap), self.map_capnum(uncap));
                self.emit2(OpCode::Capturemark as i32, cap, uncap);
            }

            // lookarounds do not backtrack into their body
            (NodeKind::Require, Visit::Before) => {
                self.emit0(OpCode::Setjump as i32);
                self.emit0(OpCode::Setmark as i32);
            }
            (NodeKind::Require, Visit::After) => {
                self.emit0(OpCode::Getmark as i32);
                self.emit0(OpCode::Forejump as i32);
            }
            (NodeKind::Prevent, Visit::Before) => {
                self.emit0(OpCode::Setjump as i32);
                self.emit_pending(OpCode::Lazybranch);
            }
            (NodeKind::Prevent, Visit::After) => {
                self.emit0(OpCode::Backjump as i32);
                let branch = self.pop_patch();
                let here = self.cur_pos();
                self.patch_jump(branch, here);
                self.emit0(OpCode::Forejump as i32);
            }

            (NodeKind::Greedy, Visit::Before) => self.emit0(OpCode::Setjump as i32),
            (NodeKind::Greedy, Visit::After) => self.emit0(OpCode::Forejump as i32),

            (NodeKind::Concatenate | NodeKind::Group, _) => {}
            (kind, _) => unreachable!("{} node with children", kind.name()),
        }
    }

    fn emit_leaf(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.ast.node(id);
        let mut bits = 0;
        if node.is_rtl() {
            bits |= RTL;
        }
        if node.is_ci() {
            bits |= CI;
        }

        match &node.kind {
            NodeKind::Char(test) => {
                let (op, operand) = match test {
                    CharTest::One(ch) => (OpCode::One, *ch as i32),
                    CharTest::Notone(ch) => (OpCode::Notone, *ch as i32),
                    CharTest::Set(set) => (OpCode::Set, self.class_constant(set)),
                };
                self.emit1(op as i32 | bits, operand);
            }
            NodeKind::CharLoop {
                test,
                min,
                max,
                lazy,
            } => {
                let (min, max, lazy) = (*min, *max, *lazy);
                let (rep, looped, operand) = match test {
                    CharTest::One(ch) => (
                        OpCode::Onerep,
                        if lazy { OpCode::Onelazy } else { OpCode::Oneloop },
                        *ch as i32,
                    ),
                    CharTest::Notone(ch) => (
                        OpCode::Notonerep,
                        if lazy { OpCode::Notonelazy } else { OpCode::Notoneloop },
                        *ch as i32,
                    ),
                    CharTest::Set(set) => (
                        OpCode::Setrep,
                        if lazy { OpCode::Setlazy } else { OpCode::Setloop },
                        self.class_constant(set),
                    ),
                };
                if min > 0 {
                    self.emit2(rep as i32 | bits, operand, min);
                }
                if max > min {
                    let extra = if max == INFINITE_REPEAT { INFINITE_REPEAT } else { max - min };
                    self.emit2(looped as i32 | bits, operand, extra);
                }
            }
            NodeKind::Multi(chars) => {
                let index = self.constant(Constant::Str(chars.clone().into_boxed_slice()));
                self.emit1(OpCode::Multi as i32 | bits, index);
            }
            NodeKind::Ref(capnum) => {
                let slot = self.map_capnum(*capnum);
                self.emit1(OpCode::Ref as i32 | bits, slot);
            }
            NodeKind::Empty => {}
            kind => {
                let op = match kind {
                    NodeKind::Nothing => OpCode::Nothing,
                    NodeKind::Bol => OpCode::Bol,
                    NodeKind::Eol => OpCode::Eol,
                    NodeKind::Boundary => OpCode::Boundary,
                    NodeKind::Nonboundary => OpCode::Nonboundary,
                    NodeKind::EcmaBoundary => OpCode::EcmaBoundary,
                    NodeKind::NonEcmaBoundary => OpCode::NonEcmaBoundary,
                    NodeKind::Beginning => OpCode::Beginning,
                    NodeKind::Start => OpCode::Start,
                    NodeKind::EndZ => OpCode::EndZ,
                    NodeKind::End => OpCode::End,
                    other => unreachable!("{} node without children", other.name()),
                };
                self.emit0(op as i32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::parse;

    fn compile(pattern: &str) -> Program {
        let tree = parse(pattern, RegexOptions::empty()).unwrap();
        write(&tree, pattern)
    }

    fn ops(prog: &Program) -> Vec<OpCode> {
        let mut out = Vec::new();
        let mut pc = 0;
        while pc < prog.codes.len() {
            let op = OpCode::from_word(prog.codes[pc]);
            out.push(op);
            pc += op.size();
        }
        out
    }

    #[test]
    fn test_frame_around_program() {
        let prog = compile("a");
        assert_eq!(
            ops(&prog),
            vec![
                OpCode::Lazybranch,
                OpCode::Setmark,
                OpCode::One,
                OpCode::Capturemark,
                OpCode::Stop
            ]
        );
        // the initial branch jumps to Stop
        assert_eq!(prog.codes[1] as usize, prog.codes.len() - 1);
        assert_eq!(prog.track_count, 3);
    }

    #[test]
    fn test_alternation_jumps() {
        let prog = compile("ab|cd");
        let listing = ops(&prog);
        assert_eq!(
            listing,
            vec![
                OpCode::Lazybranch,
                OpCode::Setmark,
                OpCode::Lazybranch,
                OpCode::Multi,
                OpCode::Goto,
                OpCode::Multi,
                OpCode::Capturemark,
                OpCode::Stop
            ]
        );
        // Lazybranch at 3 skips to the second alternative
        assert_eq!(prog.codes[4], 9);
        // Goto at 7 skips past it
        assert_eq!(prog.codes[8], 11);
    }

    #[test]
    fn test_loops() {
        let prog = compile("(?:ab)*");
        assert!(ops(&prog).contains(&OpCode::Nullmark));
        assert!(ops(&prog).contains(&OpCode::Branchmark));

        let prog = compile("(?:ab){2,5}?");
        assert!(ops(&prog).contains(&OpCode::Setcount));
        assert!(ops(&prog).contains(&OpCode::Lazybranchcount));

        let prog = compile("a{2,4}");
        assert_eq!(
            ops(&prog)[2..4].to_vec(),
            vec![OpCode::Onerep, OpCode::Oneloop]
        );
    }

    #[test]
    fn test_constants_deduplicated() {
        let prog = compile("[0-9]x[0-9]");
        assert_eq!(prog.constants.len(), 1);
    }

    #[test]
    fn test_sparse_captures_map_to_slots() {
        let prog = compile("(?<7>a)(b)");
        assert_eq!(prog.cap_size, 3);
        assert_eq!(prog.group_numbers, vec![0, 1, 7]);
        assert_eq!(prog.map_capnum(7), Some(2));
        assert_eq!(prog.map_capnum(3), None);
    }
}
