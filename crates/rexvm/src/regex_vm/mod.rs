pub mod boyer_moore;
mod interpreter;
pub mod match_table;
pub mod opcode;
pub mod program;
pub mod runner;
pub mod runner_pool;

pub use boyer_moore::BoyerMoore;
pub use match_table::MatchTable;
pub use opcode::OpCode;
pub use program::{Anchors, Constant, FirstChars, Program};
pub use runner::Runner;
pub use runner_pool::RunnerPool;
