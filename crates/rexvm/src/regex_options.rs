use std::time::Duration;

use bitflags::bitflags;

use crate::regex_limits::DEFAULT_POOL_CAPACITY;

bitflags! {
    /// Pattern options. Inline toggles `(?imnsx-imnsx)` flip the subset
    /// that has a letter; the rest can only be set for the whole pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexOptions: u32 {
        const IGNORE_CASE = 0x0001;
        const MULTILINE = 0x0002;
        const EXPLICIT_CAPTURE = 0x0004;
        const SINGLELINE = 0x0010;
        const IGNORE_PATTERN_WHITESPACE = 0x0020;
        const RIGHT_TO_LEFT = 0x0040;
        const DEBUG = 0x0080;
        const ECMA_SCRIPT = 0x0100;
        const CULTURE_INVARIANT = 0x0200;
    }
}

impl RegexOptions {
    /// The only options allowed next to `ECMA_SCRIPT`.
    const ECMA_COMPATIBLE: RegexOptions = RegexOptions::ECMA_SCRIPT
        .union(RegexOptions::IGNORE_CASE)
        .union(RegexOptions::MULTILINE)
        .union(RegexOptions::CULTURE_INVARIANT);

    /// Returns `false` for option sets the engine refuses to compile with.
    pub fn is_valid(self) -> bool {
        !self.contains(RegexOptions::ECMA_SCRIPT) || Self::ECMA_COMPATIBLE.contains(self)
    }

    /// Maps an inline option letter to its flag. Letters that name
    /// whole-pattern-only options map to `None`, which ends an option scan.
    pub(crate) fn from_inline_code(ch: char) -> Option<RegexOptions> {
        match ch.to_ascii_lowercase() {
            'i' => Some(RegexOptions::IGNORE_CASE),
            'm' => Some(RegexOptions::MULTILINE),
            'n' => Some(RegexOptions::EXPLICIT_CAPTURE),
            's' => Some(RegexOptions::SINGLELINE),
            'x' => Some(RegexOptions::IGNORE_PATTERN_WHITESPACE),
            _ => None,
        }
    }
}

/// Construction-time settings for a [`Regex`](crate::Regex).
#[derive(Debug, Clone)]
pub struct RegexConfig {
    pub options: RegexOptions,
    /// `None` runs every match to completion.
    pub match_timeout: Option<Duration>,
    /// Idle execution states kept for reuse; zero disables pooling.
    pub pool_capacity: usize,
}

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            options: RegexOptions::empty(),
            match_timeout: None,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl RegexConfig {
    pub fn with_options(options: RegexOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.match_timeout = Some(timeout);
        self
    }
}
