// Tests for match positions across the main constructs
use crate::*;

fn find(pattern: &str, text: &str) -> Option<(usize, String)> {
    find_with(pattern, RegexOptions::empty(), text)
}

fn find_with(pattern: &str, options: RegexOptions, text: &str) -> Option<(usize, String)> {
    let re = Regex::with_options(pattern, options).unwrap();
    re.find(text).unwrap().map(|m| (m.index(), m.value()))
}

fn all_values(re: &Regex, text: &str) -> Vec<String> {
    re.matches(text).map(|m| m.unwrap().value()).collect()
}

#[test]
fn test_greedy_and_lazy() {
    assert_eq!(find("a.*b", "axbxb"), Some((0, "axbxb".to_string())));
    assert_eq!(find("a.*?b", "axbxb"), Some((0, "axb".to_string())));
    assert_eq!(find("a+?", "aaa"), Some((0, "a".to_string())));
    assert_eq!(find("a{2,}?", "aaaa"), Some((0, "aa".to_string())));
    assert_eq!(find("a{2,3}", "aaaa"), Some((0, "aaa".to_string())));
    assert_eq!(find("ba?", "bb"), Some((0, "b".to_string())));
}

#[test]
fn test_literals_and_prefix_search() {
    assert_eq!(find("needle", "haystack with a needle"), Some((16, "needle".to_string())));
    assert_eq!(find("needle", "haystack"), None);
    assert_eq!(find("xyz", ""), None);
    assert_eq!(find("h\u{e9}llo", "say h\u{e9}llo"), Some((4, "h\u{e9}llo".to_string())));
}

#[test]
fn test_alternation_takes_first_branch() {
    assert_eq!(find("a|ab", "ab"), Some((0, "a".to_string())));
    assert_eq!(find("ab|a", "ab"), Some((0, "ab".to_string())));
    assert_eq!(find("cat|dog", "hotdog"), Some((3, "dog".to_string())));
}

#[test]
fn test_empty_pattern_matches_everywhere() {
    let re = Regex::new("").unwrap();
    let positions: Vec<usize> = re.matches("abc").map(|m| m.unwrap().index()).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert!(re.matches("abc").all(|m| m.unwrap().length() == 0));
}

#[test]
fn test_empty_matches_interleave() {
    let re = Regex::new("a*").unwrap();
    let spans: Vec<(usize, usize)> = re
        .matches("baab")
        .map(|m| {
            let m = m.unwrap();
            (m.index(), m.length())
        })
        .collect();
    assert_eq!(spans, vec![(0, 0), (1, 2), (3, 0), (4, 0)]);
}

#[test]
fn test_sets_and_classes() {
    assert_eq!(find("[a-z-[aeiou]]+", "aeixyz"), Some((3, "xyz".to_string())));
    assert_eq!(find("[^0-9]+", "123abc456"), Some((3, "abc".to_string())));
    assert_eq!(find("\\d+", "abc 2024"), Some((4, "2024".to_string())));
    assert_eq!(find("\\p{Lu}+", "abcDEF"), Some((3, "DEF".to_string())));
    assert_eq!(find("\\P{L}", "ab1"), Some((2, "1".to_string())));
    assert_eq!(find("a.c", "a\nc abc"), Some((4, "abc".to_string())));
    assert_eq!(
        find_with("a.c", RegexOptions::SINGLELINE, "a\nc"),
        Some((0, "a\nc".to_string()))
    );
}

#[test]
fn test_anchors() {
    assert_eq!(find("^abc$", "abc\n"), Some((0, "abc".to_string())));
    assert_eq!(find("\\Aabc\\z", "abc\n"), None);
    assert_eq!(find("\\Aabc\\Z", "abc\n"), Some((0, "abc".to_string())));
    assert_eq!(find("^b", "a\nb"), None);
    assert_eq!(
        find_with("^b", RegexOptions::MULTILINE, "a\nb"),
        Some((2, "b".to_string()))
    );
    assert_eq!(
        find_with("a$", RegexOptions::MULTILINE, "a\nb"),
        Some((0, "a".to_string()))
    );
    assert_eq!(find("\\bcat\\b", "concat cat"), Some((7, "cat".to_string())));
    assert_eq!(find("\\Bcat", "concat cat"), Some((3, "cat".to_string())));
}

#[test]
fn test_start_anchor_follows_search_start() {
    let re = Regex::new("\\Ga").unwrap();
    assert_eq!(re.find_at("baa", 1).unwrap().map(|m| m.index()), Some(1));
    assert!(re.find_at("bba", 1).unwrap().is_none());
    let positions: Vec<usize> = re.matches("aab").map(|m| m.unwrap().index()).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[test]
fn test_lookarounds() {
    assert_eq!(find("foo(?=bar)", "foobaz foobar"), Some((7, "foo".to_string())));
    assert_eq!(find("foo(?!bar)", "foobar foobaz"), Some((7, "foo".to_string())));
    assert_eq!(find("(?<=\\$)\\d+", "cost: $42"), Some((7, "42".to_string())));
    assert_eq!(find("(?<!a)b", "abcb"), Some((3, "b".to_string())));
}

#[test]
fn test_atomic_groups() {
    assert!(Regex::new("(?>a+)b").unwrap().is_match("aaab").unwrap());
    assert!(!Regex::new("(?>a*)a").unwrap().is_match("aaa").unwrap());
    assert!(Regex::new("(?:a*)a").unwrap().is_match("aaa").unwrap());
}

#[test]
fn test_conditionals() {
    let re = Regex::new("^(a)?(?(1)b|c)$").unwrap();
    assert!(re.is_match("ab").unwrap());
    assert!(re.is_match("c").unwrap());
    assert!(!re.is_match("ac").unwrap());
    assert!(!re.is_match("b").unwrap());

    let re = Regex::new("^(?(a)ab|cd)$").unwrap();
    assert!(re.is_match("ab").unwrap());
    assert!(re.is_match("cd").unwrap());
    assert!(!re.is_match("ad").unwrap());

    // no "no" branch: the test failing matches nothing
    let re = Regex::new("x(?(y)yz)").unwrap();
    assert_eq!(re.find("xq").unwrap().unwrap().value(), "x");
    assert_eq!(re.find("xyz").unwrap().unwrap().value(), "xyz");
}

#[test]
fn test_ignore_case() {
    assert_eq!(
        find_with("HELLO", RegexOptions::IGNORE_CASE, "say hello"),
        Some((4, "hello".to_string()))
    );
    assert_eq!(
        find_with("[A-C]+", RegexOptions::IGNORE_CASE, "xxabcd"),
        Some((2, "abc".to_string()))
    );
    assert_eq!(find("(?i)abc", "xABC"), Some((1, "ABC".to_string())));
    assert_eq!(find("a(?i)b", "aB AB"), Some((0, "aB".to_string())));
    assert_eq!(find("(?i:x)y", "XY Xy"), Some((3, "Xy".to_string())));
}

#[test]
fn test_right_to_left() {
    let re = Regex::with_options("\\d+", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert!(re.is_right_to_left());
    let m = re.find("ab12cd345").unwrap().unwrap();
    assert_eq!((m.index(), m.value()), (6, "345".to_string()));
    assert_eq!(all_values(&re, "ab12cd345"), vec!["345", "12"]);

    let re = Regex::with_options("abc", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert_eq!(re.find("abc abc").unwrap().unwrap().index(), 4);
    assert_eq!(re.find_at("abc abc", 5).unwrap().unwrap().index(), 0);
}

#[test]
fn test_right_to_left_lookbehind_and_anchors() {
    let re = Regex::with_options("^a", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert_eq!(re.find("aba").unwrap().unwrap().index(), 0);
    let re = Regex::with_options("a$", RegexOptions::RIGHT_TO_LEFT).unwrap();
    assert_eq!(re.find("aba").unwrap().unwrap().index(), 2);
    assert!(re.find("ab").unwrap().is_none());
}

#[test]
fn test_ecma_script() {
    let re = Regex::with_options("(a)\\10", RegexOptions::ECMA_SCRIPT).unwrap();
    assert_eq!(re.find("aa0").unwrap().unwrap().value(), "aa0");
    assert!(Regex::with_options("\\d", RegexOptions::ECMA_SCRIPT)
        .unwrap()
        .find("\u{0664}")
        .unwrap()
        .is_none());
    assert!(Regex::new("\\d").unwrap().is_match("\u{0664}").unwrap());
}

#[test]
fn test_find_at_and_bounds() {
    let re = Regex::new("a").unwrap();
    assert_eq!(re.find_at("aba", 1).unwrap().unwrap().index(), 2);
    assert!(re.find_at("aba", 3).unwrap().is_none());
    assert!(matches!(
        re.find_at("ab", 5),
        Err(RegexError::InvalidArgument { name: "start", value: 5 })
    ));

    let text: std::sync::Arc<[char]> = "xaxa".chars().collect::<Vec<_>>().into();
    let m = re.execute(text.clone(), 2, 4, 2, None, false).unwrap().unwrap();
    assert_eq!(m.index(), 3);
    assert!(matches!(
        re.execute(text.clone(), 3, 2, 2, None, false),
        Err(RegexError::InvalidArgument { name: "beg", .. })
    ));
    assert!(matches!(
        re.execute(text, 0, 9, 0, None, false),
        Err(RegexError::InvalidArgument { name: "end", .. })
    ));
}

#[test]
fn test_lookbehind_respects_search_range() {
    // the lookbehind cannot see before `beg`
    let re = Regex::new("(?<=x)a").unwrap();
    let text: std::sync::Arc<[char]> = "xa".chars().collect::<Vec<_>>().into();
    assert!(re.execute(text.clone(), 0, 2, 0, None, false).unwrap().is_some());
    assert!(re.execute(text, 1, 2, 1, None, false).unwrap().is_none());
}

#[test]
fn test_deterministic_and_reusable() {
    let re = Regex::new("(\\w+)@(\\w+)\\.com").unwrap();
    let text = "mail bob@example.com or amy@test.com";
    let first = all_values(&re, text);
    for _ in 0..5 {
        assert_eq!(all_values(&re, text), first);
    }
    assert_eq!(first, vec!["bob@example.com", "amy@test.com"]);
}

#[test]
fn test_concurrent_use_of_one_regex() {
    let re = std::sync::Arc::new(Regex::new("b+").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = std::sync::Arc::clone(&re);
            std::thread::spawn(move || {
                let text = format!("{}{}", "a".repeat(i), "bbb");
                re.find(&text).unwrap().map(|m| m.index())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(i));
    }
}

#[test]
fn test_is_match_agrees_with_find() {
    for (pattern, text) in [("a(b)?c", "ac"), ("x+y", "xxz"), ("(?<n>.)\\k<n>", "abba")] {
        let re = Regex::new(pattern).unwrap();
        assert_eq!(re.is_match(text).unwrap(), re.find(text).unwrap().is_some());
    }
}

#[test]
fn test_lazy_loops_with_empty_iterations() {
    assert_eq!(find("(a?)*?c", "aab"), None);
    assert_eq!(find("(?:x(a?)*?y)+z", "xyxaayq"), None);
    assert_eq!(find("(?:(a?)+?b|a)", "aac"), Some((0, "a".to_string())));
    assert_eq!(find("((a?)*?)+x", "aaay"), None);
    assert_eq!(find("(?:()*?z)*w", "zzq"), None);

    assert_eq!(find("(a?)*?c", "aac"), Some((0, "aac".to_string())));
    assert_eq!(find("((a?)*?)+x", "aaax"), Some((0, "aaax".to_string())));
    assert_eq!(find("(?:a|)+?b", "aab"), Some((0, "aab".to_string())));
    assert_eq!(find("(?:()*?z)*w", "zzw"), Some((0, "zzw".to_string())));
}

#[test]
fn test_greedy_loops_with_empty_iterations() {
    assert_eq!(find("(a?)*c", "aab"), None);
    assert_eq!(find("(a?)*c", "aac"), Some((0, "aac".to_string())));
    assert_eq!(find("(?:()*z)*w", "zzq"), None);
    assert_eq!(find("(?:a|)+b", "aab"), Some((0, "aab".to_string())));
}

#[test]
fn test_right_to_left_loops_with_empty_iterations() {
    let rtl = RegexOptions::RIGHT_TO_LEFT;
    assert_eq!(find_with("(a?)*?c", rtl, "aab"), None);
    assert_eq!(find_with("(a?)*?c", rtl, "xaac"), Some((3, "c".to_string())));
    assert_eq!(find_with("(?:()*?z)*w", rtl, "zzq"), None);
    assert_eq!(find_with("(a?)*c", rtl, "xaac"), Some((1, "aac".to_string())));
    assert_eq!(find_with("c(a?)*", rtl, "xcaa"), Some((1, "caa".to_string())));
    assert_eq!(find_with("c(a?)*?", rtl, "xcaa"), Some((1, "caa".to_string())));
}
