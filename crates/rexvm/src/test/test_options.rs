// Tests for option validation, configuration, pooling and the disassembler
use std::sync::Arc;
use std::time::Duration;

use crate::*;

#[test]
fn test_ecma_option_combinations() {
    for ok in [
        RegexOptions::ECMA_SCRIPT,
        RegexOptions::ECMA_SCRIPT | RegexOptions::IGNORE_CASE | RegexOptions::MULTILINE,
        RegexOptions::ECMA_SCRIPT | RegexOptions::CULTURE_INVARIANT,
    ] {
        assert!(Regex::with_options("a", ok).is_ok(), "{:?}", ok);
    }
    for bad in [
        RegexOptions::ECMA_SCRIPT | RegexOptions::SINGLELINE,
        RegexOptions::ECMA_SCRIPT | RegexOptions::RIGHT_TO_LEFT,
        RegexOptions::ECMA_SCRIPT | RegexOptions::DEBUG,
    ] {
        assert_eq!(
            Regex::with_options("a", bad).unwrap_err(),
            RegexError::InvalidOptions(bad)
        );
    }
}

#[test]
fn test_config_is_carried() {
    let config = RegexConfig::with_options(RegexOptions::IGNORE_CASE).timeout(Duration::from_secs(2));
    let re = Regex::with_config("abc", &config).unwrap();
    assert_eq!(re.options(), RegexOptions::IGNORE_CASE);
    assert_eq!(re.match_timeout(), Some(Duration::from_secs(2)));
    assert_eq!(re.pattern(), "abc");
    assert_eq!(re.to_string(), "abc");
    assert!(Regex::new("x").unwrap().match_timeout().is_none());
}

#[test]
fn test_from_program_shares_code() {
    let program = Arc::new(compile("a+b", RegexOptions::empty()).unwrap());
    let first = Regex::from_program(Arc::clone(&program), &RegexConfig::default());
    let second = Regex::from_program(Arc::clone(&program), &RegexConfig::default());
    assert!(Arc::ptr_eq(first.program(), second.program()));
    assert_eq!(first.find("xaab").unwrap().unwrap().value(), "aab");
    assert_eq!(second.find("ab").unwrap().unwrap().value(), "ab");
}

#[test]
fn test_runner_pool_reuses_and_bounds() {
    let program = Arc::new(compile("a", RegexOptions::empty()).unwrap());
    let pool = RunnerPool::new(1);
    assert_eq!(pool.idle_count(), 0);

    let first = pool.acquire(&program);
    let second = pool.acquire(&program);
    pool.release(first);
    pool.release(second);
    assert_eq!(pool.idle_count(), 1);

    let _again = pool.acquire(&program);
    assert_eq!(pool.idle_count(), 0);

    let disabled = RunnerPool::new(0);
    disabled.release(disabled.acquire(&program));
    assert_eq!(disabled.idle_count(), 0);
}

#[test]
fn test_pooling_disabled_still_matches() {
    let config = RegexConfig {
        pool_capacity: 0,
        ..RegexConfig::default()
    };
    let re = Regex::with_config("b", &config).unwrap();
    assert_eq!(re.find("ab").unwrap().unwrap().index(), 1);
    assert_eq!(re.find("bb").unwrap().unwrap().index(), 0);
}

#[test]
fn test_cache_shares_compiled_regex() {
    let cache = RegexCache::with_config(
        2,
        RegexConfig::default().timeout(Duration::from_secs(1)),
    );
    let re = cache.get_or_compile("\\d+", RegexOptions::empty()).unwrap();
    assert_eq!(re.match_timeout(), Some(Duration::from_secs(1)));
    let again = cache.get_or_compile("\\d+", RegexOptions::empty()).unwrap();
    assert!(Arc::ptr_eq(&re, &again));
}

#[test]
fn test_escape_then_match_literally() {
    let text = "1+1=2 (really?) [yes] {ok} ^$ | \\ # .";
    let re = Regex::new(&escape(text)).unwrap();
    let m = re.find(&format!("say {}", text)).unwrap().unwrap();
    assert_eq!(m.index(), 4);
    assert_eq!(m.value(), text);

    let re = Regex::with_options(&escape("a b#c"), RegexOptions::IGNORE_PATTERN_WHITESPACE).unwrap();
    assert!(re.is_match("a b#c").unwrap());
    assert_eq!(unescape("\\(x\\)").unwrap(), "(x)");
}

#[test]
fn test_disassembly() {
    let re = Regex::new("(a)b").unwrap();
    let listing = re.program().to_string();
    assert!(listing.contains("Pattern:"));
    assert!(listing.contains("left-to-right"));
    assert!(listing.contains("Capturemark"));
    assert!(listing.contains("Stop"));

    let re = Regex::with_options("^x", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert!(re.program().to_string().contains("right-to-left"));
}
