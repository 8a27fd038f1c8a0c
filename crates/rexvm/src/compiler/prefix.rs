// Start-of-match analysis.
//
// Three facts are derived from the reduced tree so the runner can skip
// start positions that cannot match: the set of possible first characters,
// a literal every match starts with, and the zero-width anchors every
// match starts with. All three are computed in the direction the pattern
// runs, so for right-to-left patterns "first" means rightmost.

use crate::char_class::{CharClass, ClassCode};
use crate::compiler::RegexTree;
use crate::compiler::node::{CharTest, NodeId, NodeKind};
use crate::regex_vm::{Anchors, FirstChars};

/// A literal every match begins with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub chars: Vec<char>,
    pub ci: bool,
}

/// First-character set of a subexpression while it is being merged.
struct Fc {
    class: CharClass,
    nullable: bool,
    ci: bool,
}

impl Fc {
    fn nullable() -> Self {
        Self {
            class: CharClass::new(),
            nullable: true,
            ci: false,
        }
    }

    fn from_char(ch: char, not: bool, nullable: bool, ci: bool) -> Self {
        let mut class = CharClass::new();
        if not {
            if let Some(below) = char_before(ch) {
                class.add_range('\0', below);
            }
            if let Some(above) = char_after(ch) {
                class.add_range(above, char::MAX);
            }
        } else {
            class.add_char(ch);
        }
        Self { class, nullable, ci }
    }

    fn from_class(code: &ClassCode, nullable: bool, ci: bool) -> Self {
        Self {
            class: CharClass::from_code(code),
            nullable,
            ci,
        }
    }

    fn from_test(test: &CharTest, nullable: bool, ci: bool) -> Self {
        match test {
            CharTest::One(ch) => Self::from_char(*ch, false, nullable, ci),
            CharTest::Notone(ch) => Self::from_char(*ch, true, nullable, ci),
            CharTest::Set(code) => Self::from_class(code, nullable, ci),
        }
    }

    /// Folds `other` into `self`, as the next element of a sequence when
    /// `concatenate`, otherwise as an alternative. Fails when either class
    /// cannot be merged.
    fn merge(&mut self, other: Fc, concatenate: bool) -> bool {
        if !self.class.is_mergeable() || !other.class.is_mergeable() {
            return false;
        }
        if concatenate {
            if !self.nullable {
                return true;
            }
            if !other.nullable {
                self.nullable = false;
            }
        } else if other.nullable {
            self.nullable = true;
        }
        self.ci |= other.ci;
        self.class.add_class(&other.class);
        true
    }
}

fn char_before(ch: char) -> Option<char> {
    match ch as u32 {
        0 => None,
        0xE000 => Some('\u{D7FF}'),
        n => char::from_u32(n - 1),
    }
}

fn char_after(ch: char) -> Option<char> {
    match ch as u32 {
        0xD7FF => Some('\u{E000}'),
        n => char::from_u32(n + 1),
    }
}

/// Characters a match can start with, or `None` when the pattern can match
/// the empty string or the set is not representable.
pub fn first_chars(tree: &RegexTree) -> Option<FirstChars> {
    let ast = &tree.ast;
    let mut fcs: Vec<Fc> = Vec::new();
    // (node, index of the child being visited)
    let mut walk: Vec<(NodeId, usize)> = Vec::new();
    let mut cur = tree.root;
    let mut child = 0usize;
    let mut skip_rest = false;

    loop {
        let count = ast.child_count(cur);
        if count == 0 {
            let node = ast.node(cur);
            let ci = node.is_ci();
            let fc = match &node.kind {
                NodeKind::Empty => Fc::nullable(),
                NodeKind::Char(test) => Fc::from_test(test, false, ci),
                NodeKind::CharLoop { test, min, .. } => Fc::from_test(test, *min == 0, ci),
                NodeKind::Multi(chars) => {
                    let first = if node.is_rtl() { chars.last() } else { chars.first() };
                    match first {
                        Some(&ch) => Fc::from_char(ch, false, false, ci),
                        None => Fc::nullable(),
                    }
                }
                NodeKind::Ref(_) => Fc::from_class(&ClassCode::any(), true, false),
                _ => Fc::nullable(),
            };
            fcs.push(fc);
        } else if child < count && !skip_rest {
            match ast.kind(cur) {
                // the condition of a test group does not consume input
                NodeKind::Testgroup if child == 0 => {
                    child += 1;
                    continue;
                }
                // lookarounds are zero-width
                NodeKind::Require | NodeKind::Prevent => {
                    fcs.push(Fc::nullable());
                    child = count;
                    continue;
                }
                _ => {}
            }
            walk.push((cur, child));
            cur = ast.child(cur, child);
            child = 0;
            continue;
        }

        skip_rest = false;
        let Some((parent, index)) = walk.pop() else {
            break;
        };
        cur = parent;
        let parent_count = ast.child_count(cur);
        match ast.kind(cur) {
            NodeKind::Concatenate => {
                if index != 0 {
                    let next = fcs.pop()?;
                    if !fcs.last_mut()?.merge(next, true) {
                        return None;
                    }
                }
                if !fcs.last()?.nullable {
                    skip_rest = true;
                }
            }
            NodeKind::Alternate | NodeKind::Testref(_) => {
                if index != 0 {
                    let next = fcs.pop()?;
                    if !fcs.last_mut()?.merge(next, false) {
                        return None;
                    }
                }
                // a missing "no" branch matches empty
                if matches!(ast.kind(cur), NodeKind::Testref(_)) && parent_count == 1 {
                    fcs.last_mut()?.nullable = true;
                }
            }
            NodeKind::Testgroup => {
                if index > 1 {
                    let next = fcs.pop()?;
                    if !fcs.last_mut()?.merge(next, false) {
                        return None;
                    }
                }
                if parent_count == 2 && index == 1 {
                    fcs.last_mut()?.nullable = true;
                }
            }
            NodeKind::Loop { min: 0, .. } => fcs.last_mut()?.nullable = true,
            _ => {}
        }
        child = index + 1;
    }

    let mut fc = fcs.pop()?;
    if fc.nullable {
        return None;
    }
    if fc.ci {
        fc.class.add_lowercase();
    }
    Some(FirstChars {
        class: fc.class.to_code(),
        ci: fc.ci,
    })
}

/// Walks the leading elements of the pattern in execution order, calling
/// `visit` on each node that is neither a concatenation nor a transparent
/// wrapper. `visit` returns `true` to move on to the next sibling.
fn walk_leading(tree: &RegexTree, mut visit: impl FnMut(NodeId) -> bool) {
    let ast = &tree.ast;
    let mut cur = tree.root;
    let mut concat: Option<(NodeId, usize)> = None;
    loop {
        match ast.kind(cur) {
            NodeKind::Concatenate => {
                if ast.child_count(cur) > 0 {
                    concat = Some((cur, 0));
                }
            }
            NodeKind::Greedy | NodeKind::Capture { .. } => {
                cur = ast.child(cur, 0);
                concat = None;
                continue;
            }
            _ => {
                if !visit(cur) {
                    return;
                }
            }
        }
        match &mut concat {
            Some((node, next)) if *next < ast.child_count(*node) => {
                cur = ast.child(*node, *next);
                *next += 1;
            }
            _ => return,
        }
    }
}

/// The literal every match must start with. Adjacent literal siblings with
/// the same case sensitivity are joined.
pub fn prefix(tree: &RegexTree) -> Option<Prefix> {
    let ast = &tree.ast;
    let mut found: Option<Prefix> = None;
    let mut open = false;

    walk_leading(tree, |id| {
        let node = ast.node(id);
        let (ci, rtl) = (node.is_ci(), node.is_rtl());
        let literal: Option<Vec<char>> = match &node.kind {
            NodeKind::Char(CharTest::One(ch)) => Some(vec![*ch]),
            NodeKind::Multi(chars) => Some(chars.clone()),
            _ => None,
        };

        if let Some(prefix) = &mut found {
            // only whole literals extend a prefix
            let Some(mut more) = literal.filter(|_| open && prefix.ci == ci) else {
                return false;
            };
            if rtl {
                more.extend_from_slice(&prefix.chars);
                prefix.chars = more;
            } else {
                prefix.chars.extend_from_slice(&more);
            }
            return true;
        }

        match &node.kind {
            NodeKind::Char(CharTest::One(_)) | NodeKind::Multi(_) => {
                found = literal.map(|chars| Prefix { chars, ci });
                open = true;
                true
            }
            NodeKind::CharLoop {
                test: CharTest::One(ch),
                min,
                ..
            } => {
                if *min > 0 {
                    found = Some(Prefix {
                        chars: vec![*ch; *min as usize],
                        ci,
                    });
                }
                false
            }
            NodeKind::Bol
            | NodeKind::Eol
            | NodeKind::Boundary
            | NodeKind::EcmaBoundary
            | NodeKind::Beginning
            | NodeKind::Start
            | NodeKind::EndZ
            | NodeKind::End
            | NodeKind::Empty
            | NodeKind::Require
            | NodeKind::Prevent => true,
            _ => false,
        }
    });

    found.filter(|p| !p.chars.is_empty())
}

/// Anchors every match starts with.
pub fn anchors(tree: &RegexTree) -> Anchors {
    let mut result = Anchors::empty();
    walk_leading(tree, |id| {
        let anchor = match tree.ast.kind(id) {
            NodeKind::Bol => Anchors::BOL,
            NodeKind::Eol => Anchors::EOL,
            NodeKind::Boundary => Anchors::BOUNDARY,
            NodeKind::EcmaBoundary => Anchors::ECMA_BOUNDARY,
            NodeKind::Beginning => Anchors::BEGINNING,
            NodeKind::Start => Anchors::START,
            NodeKind::EndZ => Anchors::END_Z,
            NodeKind::End => Anchors::END,
            NodeKind::Empty | NodeKind::Require | NodeKind::Prevent => return true,
            _ => return false,
        };
        result |= anchor;
        true
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::parse;
    use crate::regex_options::RegexOptions;

    fn tree(pattern: &str, options: RegexOptions) -> RegexTree {
        parse(pattern, options).unwrap()
    }

    fn fc(pattern: &str) -> Option<FirstChars> {
        first_chars(&tree(pattern, RegexOptions::empty()))
    }

    fn pre(pattern: &str, options: RegexOptions) -> Option<String> {
        prefix(&tree(pattern, options)).map(|p| p.chars.into_iter().collect())
    }

    #[test]
    fn test_first_chars() {
        let set = fc("[ab]c|d").unwrap();
        assert!(set.class.contains('a'));
        assert!(set.class.contains('d'));
        assert!(!set.class.contains('c'));

        let set = fc("x?y").unwrap();
        assert!(set.class.contains('x'));
        assert!(set.class.contains('y'));

        assert!(fc("a*").is_none());
        assert!(fc("").is_none());
        assert!(fc("(?=a)").is_none());
    }

    #[test]
    fn test_conditional_without_no_branch_is_nullable() {
        assert!(fc("(a)?(?(1)b)").is_none());
        assert!(fc("(?(a)b)").is_none());
        assert!(fc("(a)(?(1)b|c)").is_some());
    }

    #[test]
    fn test_first_chars_case_insensitive() {
        let set = first_chars(&tree("Abc", RegexOptions::IGNORE_CASE)).unwrap();
        assert!(set.ci);
        assert!(set.class.contains('a'));
    }

    #[test]
    fn test_prefix() {
        assert_eq!(pre("abc", RegexOptions::empty()).as_deref(), Some("abc"));
        assert_eq!(pre("a{3}b", RegexOptions::empty()).as_deref(), Some("aaa"));
        assert_eq!(pre("^foo\\.bar", RegexOptions::empty()).as_deref(), Some("foo.bar"));
        assert_eq!(pre("(?=x)ab+", RegexOptions::empty()).as_deref(), Some("a"));
        assert_eq!(pre("a|b", RegexOptions::empty()), None);
        assert_eq!(pre("a*b", RegexOptions::empty()), None);
        assert_eq!(pre("ab(?i)cd", RegexOptions::empty()).as_deref(), Some("ab"));
        assert_eq!(pre("ab\\dc", RegexOptions::RIGHT_TO_LEFT).as_deref(), Some("c"));
    }

    #[test]
    fn test_anchors() {
        let a = |p: &str| anchors(&tree(p, RegexOptions::empty()));
        assert_eq!(a("^abc"), Anchors::BEGINNING);
        assert_eq!(a("\\A\\Gx"), Anchors::BEGINNING | Anchors::START);
        assert_eq!(a("(?m)^x"), Anchors::BOL);
        assert_eq!(a("x$"), Anchors::empty());
        assert_eq!(a("(^a)|b"), Anchors::empty());
        assert_eq!(
            anchors(&tree("abc$", RegexOptions::RIGHT_TO_LEFT)),
            Anchors::END_Z
        );
    }
}
