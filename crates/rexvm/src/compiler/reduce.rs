// Tree rewrites applied as each child is attached to its parent.

use crate::char_class::CharClass;
use crate::regex_options::RegexOptions;

use super::node::{Ast, CharTest, NodeId, NodeKind};

const MERGE_OPTIONS: RegexOptions = RegexOptions::RIGHT_TO_LEFT.union(RegexOptions::IGNORE_CASE);

impl Ast {
    /// Returns the simplified form of `id`, which may be `id` itself,
    /// one of its descendants or a fresh node.
    pub fn reduce(&mut self, id: NodeId) -> NodeId {
        match self.kind(id) {
            NodeKind::Alternate => self.reduce_alternation(id),
            NodeKind::Concatenate => self.reduce_concatenation(id),
            NodeKind::Loop { .. } => self.reduce_rep(id),
            NodeKind::Group => self.reduce_group(id),
            NodeKind::Char(CharTest::Set(_)) | NodeKind::CharLoop { test: CharTest::Set(_), .. } => {
                self.reduce_set(id)
            }
            _ => id,
        }
    }

    /// Non-capturing groups vanish.
    fn reduce_group(&mut self, id: NodeId) -> NodeId {
        let mut u = id;
        while *self.kind(u) == NodeKind::Group {
            match self.children(u).first() {
                Some(&child) => u = child,
                None => break,
            }
        }
        u
    }

    /// Nested quantifiers multiply when the product describes the same
    /// language: `(a{2})*` stays, `(a*)*` becomes `a*`.
    fn reduce_rep(&mut self, id: NodeId) -> NodeId {
        let Some((mut min, mut max)) = self.kind(id).bounds() else {
            return id;
        };
        let NodeKind::Loop { lazy, .. } = *self.kind(id) else {
            return id;
        };

        let mut u = id;
        loop {
            let Some(&child) = self.children(u).first() else {
                break;
            };
            let same_shape = match self.kind(child) {
                NodeKind::Loop { lazy: l, .. } | NodeKind::CharLoop { lazy: l, .. } => *l == lazy,
                _ => false,
            };
            if !same_shape {
                break;
            }
            let (u_min, _) = self.kind(u).bounds().unwrap_or((0, 0));
            let Some((c_min, c_max)) = self.kind(child).bounds() else {
                break;
            };
            if (u_min == 0 && c_min > 1) || (c_max as i64) < (c_min as i64) * 2 {
                break;
            }

            u = child;
            if c_min > 0 {
                min = saturating_mul(c_min, min);
            }
            if c_max > 0 {
                max = saturating_mul(c_max, max);
            }
            self.set_bounds(u, if c_min > 0 { min } else { 0 }, if c_max > 0 { max } else { 0 });
        }

        if min == i32::MAX {
            let options = self.node(id).options;
            return self.add(NodeKind::Nothing, options);
        }
        u
    }

    /// Sets that hold one character become `One`/`Notone`; empty sets
    /// never match.
    fn reduce_set(&mut self, id: NodeId) -> NodeId {
        let node = self.node_mut(id);
        let set = match &node.kind {
            NodeKind::Char(CharTest::Set(set)) | NodeKind::CharLoop { test: CharTest::Set(set), .. } => {
                set.clone()
            }
            _ => return id,
        };

        if set.is_empty() {
            node.kind = match node.kind.bounds() {
                Some((0, _)) => NodeKind::Empty,
                _ => NodeKind::Nothing,
            };
            return id;
        }

        let replacement = if let Some(ch) = set.singleton() {
            CharTest::One(ch)
        } else if let Some(ch) = set.singleton_inverse() {
            CharTest::Notone(ch)
        } else {
            return id;
        };
        match &mut node.kind {
            NodeKind::Char(test) | NodeKind::CharLoop { test, .. } => *test = replacement,
            _ => {}
        }
        id
    }

    /// Flattens nested alternations, merges adjacent single-character
    /// alternatives into one set and drops branches that never match.
    fn reduce_alternation(&mut self, id: NodeId) -> NodeId {
        let children = std::mem::take(&mut self.node_mut(id).children);
        let mut pending: Vec<NodeId> = children.into_iter().rev().collect();
        let mut out: Vec<NodeId> = Vec::with_capacity(pending.len());

        let mut was_last_set = false;
        let mut last_cannot_merge = false;
        let mut options_last = RegexOptions::empty();

        while let Some(at) = pending.pop() {
            let node = self.node(at);
            match &node.kind {
                NodeKind::Alternate => {
                    pending.extend(node.children.iter().rev());
                }
                NodeKind::Char(test @ (CharTest::One(_) | CharTest::Set(_))) => {
                    let options_at = node.options & MERGE_OPTIONS;
                    let mergeable = match test {
                        CharTest::Set(set) => set.is_mergeable(),
                        _ => true,
                    };
                    if !was_last_set || options_last != options_at || last_cannot_merge || !mergeable {
                        was_last_set = true;
                        last_cannot_merge = !mergeable;
                        options_last = options_at;
                        out.push(at);
                        continue;
                    }

                    let Some(&prev) = out.last() else {
                        out.push(at);
                        continue;
                    };
                    let mut merged = self.class_of(prev);
                    match test {
                        CharTest::One(ch) => merged.add_char(*ch),
                        CharTest::Set(set) => merged.add_class(&CharClass::from_code(set)),
                        CharTest::Notone(_) => {}
                    }
                    self.node_mut(prev).kind = NodeKind::Char(CharTest::Set(merged.to_code()));
                }
                NodeKind::Nothing => {}
                _ => {
                    was_last_set = false;
                    last_cannot_merge = false;
                    out.push(at);
                }
            }
        }

        self.node_mut(id).children = out;
        self.strip_enation(id, NodeKind::Nothing)
    }

    fn class_of(&self, id: NodeId) -> CharClass {
        let mut cc = CharClass::new();
        match self.kind(id) {
            NodeKind::Char(CharTest::One(ch)) => cc.add_char(*ch),
            NodeKind::Char(CharTest::Set(set)) => return CharClass::from_code(set),
            _ => {}
        }
        cc
    }

    /// Flattens nested concatenations of the same direction, merges
    /// adjacent literals into runs and drops empty nodes.
    fn reduce_concatenation(&mut self, id: NodeId) -> NodeId {
        let rtl = self.node(id).is_rtl();
        let children = std::mem::take(&mut self.node_mut(id).children);
        let mut pending: Vec<NodeId> = children.into_iter().rev().collect();
        let mut out: Vec<NodeId> = Vec::with_capacity(pending.len());

        let mut was_last_string = false;
        let mut options_last = RegexOptions::empty();

        while let Some(at) = pending.pop() {
            let node = self.node(at);
            match &node.kind {
                NodeKind::Concatenate if node.is_rtl() == rtl => {
                    pending.extend(node.children.iter().rev());
                }
                NodeKind::Multi(_) | NodeKind::Char(CharTest::One(_)) => {
                    let options_at = node.options & MERGE_OPTIONS;
                    if !was_last_string || options_last != options_at {
                        was_last_string = true;
                        options_last = options_at;
                        out.push(at);
                        continue;
                    }
                    let Some(&prev) = out.last() else {
                        out.push(at);
                        continue;
                    };
                    let tail: Vec<char> = match &node.kind {
                        NodeKind::Multi(s) => s.clone(),
                        NodeKind::Char(CharTest::One(ch)) => vec![*ch],
                        _ => Vec::new(),
                    };
                    let prev_node = self.node_mut(prev);
                    let mut run = match &prev_node.kind {
                        NodeKind::Multi(s) => s.clone(),
                        NodeKind::Char(CharTest::One(ch)) => vec![*ch],
                        _ => Vec::new(),
                    };
                    if options_at.contains(RegexOptions::RIGHT_TO_LEFT) {
                        let mut joined = tail;
                        joined.extend(run);
                        run = joined;
                    } else {
                        run.extend(tail);
                    }
                    prev_node.kind = NodeKind::Multi(run);
                }
                NodeKind::Empty => {}
                _ => {
                    was_last_string = false;
                    out.push(at);
                }
            }
        }

        self.node_mut(id).children = out;
        self.strip_enation(id, NodeKind::Empty)
    }

    /// A concatenation or alternation with no children becomes `empty`;
    /// with one child it becomes that child.
    fn strip_enation(&mut self, id: NodeId, empty: NodeKind) -> NodeId {
        match self.child_count(id) {
            0 => {
                let options = self.node(id).options;
                self.add(empty, options)
            }
            1 => self.child(id, 0),
            _ => id,
        }
    }
}

#[inline]
fn saturating_mul(a: i32, b: i32) -> i32 {
    if (i32::MAX - 1) / a < b {
        i32::MAX
    } else {
        a * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_class::ClassCode;
    use crate::regex_limits::INFINITE_REPEAT;

    fn none() -> RegexOptions {
        RegexOptions::empty()
    }

    fn one(ast: &mut Ast, ch: char) -> NodeId {
        ast.add(NodeKind::Char(CharTest::One(ch)), none())
    }

    #[test]
    fn test_concatenation_merges_literals() {
        let mut ast = Ast::new();
        let cat = ast.add(NodeKind::Concatenate, none());
        for ch in ['a', 'b', 'c'] {
            let n = one(&mut ast, ch);
            ast.add_child(cat, n);
        }
        let root = ast.reduce(cat);
        assert_eq!(*ast.kind(root), NodeKind::Multi(vec!['a', 'b', 'c']));
    }

    #[test]
    fn test_rtl_concatenation_prepends() {
        let mut ast = Ast::new();
        let rtl = RegexOptions::RIGHT_TO_LEFT;
        let cat = ast.add(NodeKind::Concatenate, rtl);
        for ch in ['a', 'b'] {
            let n = ast.add(NodeKind::Char(CharTest::One(ch)), rtl);
            ast.add_child(cat, n);
        }
        let root = ast.reduce(cat);
        assert_eq!(*ast.kind(root), NodeKind::Multi(vec!['b', 'a']));
    }

    #[test]
    fn test_alternation_merges_chars_into_set() {
        let mut ast = Ast::new();
        let alt = ast.add(NodeKind::Alternate, none());
        for ch in ['x', 'y', 'z'] {
            let n = one(&mut ast, ch);
            ast.add_child(alt, n);
        }
        let root = ast.reduce(alt);
        let NodeKind::Char(CharTest::Set(set)) = ast.kind(root) else {
            panic!("expected a set, got {:?}", ast.kind(root));
        };
        assert!(set.contains('y'));
        assert!(!set.contains('w'));
    }

    #[test]
    fn test_alternation_drops_nothing_and_strips() {
        let mut ast = Ast::new();
        let alt = ast.add(NodeKind::Alternate, none());
        let nothing = ast.add(NodeKind::Nothing, none());
        let bol = ast.add(NodeKind::Bol, none());
        ast.add_child(alt, nothing);
        ast.add_child(alt, bol);
        let root = ast.reduce(alt);
        assert_eq!(*ast.kind(root), NodeKind::Bol);
    }

    #[test]
    fn test_empty_concatenation_is_empty() {
        let mut ast = Ast::new();
        let cat = ast.add(NodeKind::Concatenate, none());
        let root = ast.reduce(cat);
        assert_eq!(*ast.kind(root), NodeKind::Empty);
    }

    #[test]
    fn test_nested_star_collapses() {
        // (?:a*)*
        let mut ast = Ast::new();
        let a = one(&mut ast, 'a');
        let inner = ast.make_quantifier(a, false, 0, INFINITE_REPEAT);
        let outer = ast.make_quantifier(inner, false, 0, INFINITE_REPEAT);
        let root = ast.reduce(outer);
        assert_eq!(
            *ast.kind(root),
            NodeKind::CharLoop {
                test: CharTest::One('a'),
                min: 0,
                max: INFINITE_REPEAT,
                lazy: false
            }
        );
    }

    #[test]
    fn test_lumpy_repetition_is_kept() {
        // (?:a{2}){3} cannot blur: a{2} has max < 2 * min
        let mut ast = Ast::new();
        let a = one(&mut ast, 'a');
        let inner = ast.make_quantifier(a, false, 2, 2);
        let outer = ast.make_quantifier(inner, false, 3, 3);
        let root = ast.reduce(outer);
        assert_eq!(root, outer);
        assert_eq!(ast.kind(root).bounds(), Some((3, 3)));
    }

    #[test]
    fn test_singleton_set_becomes_one() {
        let mut ast = Ast::new();
        let mut cc = CharClass::new();
        cc.add_char('q');
        let n = ast.add(NodeKind::Char(CharTest::Set(cc.to_code())), none());
        let root = ast.reduce(n);
        assert_eq!(*ast.kind(root), NodeKind::Char(CharTest::One('q')));

        let empty = ast.add(NodeKind::Char(CharTest::Set(CharClass::new().to_code())), none());
        let root = ast.reduce(empty);
        assert_eq!(*ast.kind(root), NodeKind::Nothing);

        let any = ast.add(NodeKind::Char(CharTest::Set(ClassCode::any())), none());
        assert_eq!(ast.reduce(any), any);
    }

    #[test]
    fn test_quantifier_shortcuts() {
        let mut ast = Ast::new();
        let a = one(&mut ast, 'a');
        assert_eq!(ast.make_quantifier(a, false, 1, 1), a);
        let e = ast.make_quantifier(a, false, 0, 0);
        assert_eq!(*ast.kind(e), NodeKind::Empty);
    }
}
