//! Centralized engine limits and tuning constants.
//!
//! All magic numbers that control parser, writer and interpreter behavior
//! are collected here for easy tuning.

// ===== Parser =====

/// Sentinel for an unbounded repetition maximum (`*`, `+`, `{n,}`).
pub const INFINITE_REPEAT: i32 = i32::MAX;

/// Largest value `ScanDecimal` accepts before reporting an out-of-range
/// group number or quantifier bound.
pub const MAX_DECIMAL: i32 = i32::MAX;

/// Maximum number of hex digits accepted by `\x` / `\u` escapes.
pub const HEX_ESCAPE_DIGITS: usize = 2;
pub const UNICODE_ESCAPE_DIGITS: usize = 4;

/// Octal escapes take at most three digits and truncate to a byte.
pub const MAX_OCTAL_DIGITS: usize = 3;

// ===== Interpreter =====

/// Number of instructions executed between two wall-clock deadline checks.
pub const TIMEOUT_CHECK_FREQUENCY: u32 = 1000;

/// The backtrack and mark stacks double whenever the free headroom drops
/// below `track_count * STACK_HEADROOM_FACTOR` words.
pub const STACK_HEADROOM_FACTOR: usize = 4;

/// Initial stack sizes are `track_count * INITIAL_STACK_FACTOR`, floored
/// at the minimums below.
pub const INITIAL_STACK_FACTOR: usize = 8;
pub const MIN_TRACK_SIZE: usize = 32;
pub const MIN_MARK_STACK_SIZE: usize = 16;
pub const INITIAL_CRAWL_SIZE: usize = 32;

// ===== Runner reuse =====

/// Default number of idle execution states kept per compiled regex.
pub const DEFAULT_POOL_CAPACITY: usize = 1;

// ===== Program cache =====

/// Default number of compiled programs retained by a `RegexCache`.
pub const DEFAULT_CACHE_CAPACITY: usize = 15;
