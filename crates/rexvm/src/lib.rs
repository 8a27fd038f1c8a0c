// Backtracking regular expressions
// A pattern parser, tree reducer and bytecode writer feeding an explicit-stack interpreter

#[cfg(test)]
mod test;

pub mod char_class;
pub mod compiler;
pub mod regex;
pub mod regex_cache;
pub mod regex_error;
pub mod regex_limits;
pub mod regex_options;
pub mod regex_vm;

pub use compiler::compile;
pub use compiler::parser::{escape, unescape};
pub use regex::{GroupMatch, Match, Matches, Regex, Span};
pub use regex_cache::RegexCache;
pub use regex_error::{MatchTimeout, ParseError, ParseErrorKind, RegexError, RegexResult};
pub use regex_options::{RegexConfig, RegexOptions};
pub use regex_vm::{OpCode, Program, RunnerPool};
