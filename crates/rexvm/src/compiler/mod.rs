// Pattern compiler: parse, reduce, then write a program.

pub mod node;
pub mod parser;
pub mod prefix;
mod reduce;
pub mod writer;

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::debug;
use smol_str::SmolStr;

use crate::regex_error::{RegexError, RegexResult};
use crate::regex_options::RegexOptions;
use crate::regex_vm::Program;
pub use node::{Ast, CharTest, Node, NodeId, NodeKind};

/// Output of the parser.
#[derive(Debug, Clone)]
pub struct RegexTree {
    pub ast: Ast,
    pub root: NodeId,
    /// Capture number to the pattern offset of its group.
    pub caps: BTreeMap<i32, i32>,
    /// Sorted capture numbers, present only when numbering has gaps.
    pub capnumlist: Option<Vec<i32>>,
    /// One more than the highest capture number.
    pub captop: i32,
    /// Group name (numbers spelled out included) to capture number.
    pub capnames: AHashMap<SmolStr, i32>,
    /// Group names in slot order, when any group is named or numbering
    /// has gaps.
    pub capslist: Option<Vec<SmolStr>>,
    pub options: RegexOptions,
}

impl RegexTree {
    pub fn dump(&self) -> String {
        self.ast.dump(self.root)
    }
}

/// Parses and compiles `pattern`.
pub fn compile(pattern: &str, options: RegexOptions) -> RegexResult<Program> {
    if !options.is_valid() {
        return Err(RegexError::InvalidOptions(options));
    }
    let tree = parser::parse(pattern, options)?;
    let program = writer::write(&tree, pattern);
    debug!(
        "compiled {:?}: {} words, {} constants, {} slots",
        pattern,
        program.codes.len(),
        program.constants.len(),
        program.cap_size
    );
    if options.contains(RegexOptions::DEBUG) {
        debug!("tree for {:?}:\n{}", pattern, tree.dump());
        debug!("program for {:?}:\n{}", pattern, program);
    }
    Ok(program)
}
