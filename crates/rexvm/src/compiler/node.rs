// Syntax tree for a parsed pattern.
//
// Nodes live in an arena and refer to their children by index; a node owns
// its children exclusively. Walks over the tree use explicit stacks, since
// nesting depth is controlled by whoever writes the pattern.

use std::fmt;

use crate::char_class::ClassCode;
use crate::regex_limits::INFINITE_REPEAT;
use crate::regex_options::RegexOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a single-character node tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharTest {
    One(char),
    Notone(char),
    Set(ClassCode),
}

impl CharTest {
    pub fn matches(&self, ch: char) -> bool {
        match self {
            CharTest::One(c) => *c == ch,
            CharTest::Notone(c) => *c != ch,
            CharTest::Set(set) => set.contains(ch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// One character: `a`, `[^\n]`, `[a-z]`.
    Char(CharTest),
    /// A repeated single character. `min..=max` iterations.
    CharLoop {
        test: CharTest,
        min: i32,
        max: i32,
        lazy: bool,
    },
    /// A literal run of two or more characters.
    Multi(Vec<char>),
    /// Backreference to a capture number.
    Ref(i32),

    // zero-width assertions
    Bol,
    Eol,
    Boundary,
    Nonboundary,
    EcmaBoundary,
    NonEcmaBoundary,
    Beginning,
    Start,
    EndZ,
    End,

    /// Never matches.
    Nothing,
    /// Always matches, consuming nothing.
    Empty,

    Alternate,
    Concatenate,
    /// A repeated subexpression.
    Loop {
        min: i32,
        max: i32,
        lazy: bool,
    },
    /// Capture into `cap`; when `uncap` is not -1 also pops that group
    /// (balancing group).
    Capture {
        cap: i32,
        uncap: i32,
    },
    /// Non-capturing group, removed by reduction.
    Group,
    /// Positive lookaround.
    Require,
    /// Negative lookaround.
    Prevent,
    /// Atomic group.
    Greedy,
    /// `(?(n)yes|no)`.
    Testref(i32),
    /// `(?(expr)yes|no)`; the first child is the condition.
    Testgroup,
}

impl NodeKind {
    /// Short name used when dumping the tree.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Char(CharTest::One(_)) => "One",
            NodeKind::Char(CharTest::Notone(_)) => "Notone",
            NodeKind::Char(CharTest::Set(_)) => "Set",
            NodeKind::CharLoop { test, lazy, .. } => match (test, lazy) {
                (CharTest::One(_), false) => "Oneloop",
                (CharTest::Notone(_), false) => "Notoneloop",
                (CharTest::Set(_), false) => "Setloop",
                (CharTest::One(_), true) => "Onelazy",
                (CharTest::Notone(_), true) => "Notonelazy",
                (CharTest::Set(_), true) => "Setlazy",
            },
            NodeKind::Multi(_) => "Multi",
            NodeKind::Ref(_) => "Ref",
            NodeKind::Bol => "Bol",
            NodeKind::Eol => "Eol",
            NodeKind::Boundary => "Boundary",
            NodeKind::Nonboundary => "Nonboundary",
            NodeKind::EcmaBoundary => "ECMABoundary",
            NodeKind::NonEcmaBoundary => "NonECMABoundary",
            NodeKind::Beginning => "Beginning",
            NodeKind::Start => "Start",
            NodeKind::EndZ => "EndZ",
            NodeKind::End => "End",
            NodeKind::Nothing => "Nothing",
            NodeKind::Empty => "Empty",
            NodeKind::Alternate => "Alternate",
            NodeKind::Concatenate => "Concatenate",
            NodeKind::Loop { lazy: false, .. } => "Loop",
            NodeKind::Loop { lazy: true, .. } => "Lazyloop",
            NodeKind::Capture { .. } => "Capture",
            NodeKind::Group => "Group",
            NodeKind::Require => "Require",
            NodeKind::Prevent => "Prevent",
            NodeKind::Greedy => "Greedy",
            NodeKind::Testref(_) => "Testref",
            NodeKind::Testgroup => "Testgroup",
        }
    }

    /// Repetition bounds of loop nodes.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        match self {
            NodeKind::CharLoop { min, max, .. } | NodeKind::Loop { min, max, .. } => {
                Some((*min, *max))
            }
            _ => None,
        }
    }

    fn set_bounds(&mut self, new_min: i32, new_max: i32) {
        if let NodeKind::CharLoop { min, max, .. } | NodeKind::Loop { min, max, .. } = self {
            *min = new_min;
            *max = new_max;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub options: RegexOptions,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn is_rtl(&self) -> bool {
        self.options.contains(RegexOptions::RIGHT_TO_LEFT)
    }

    pub fn is_ci(&self) -> bool {
        self.options.contains(RegexOptions::IGNORE_CASE)
    }
}

/// Node arena.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add(&mut self, kind: NodeKind, options: RegexOptions) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            options,
            children: Vec::new(),
        });
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn child(&self, id: NodeId, i: usize) -> NodeId {
        self.nodes[id.index()].children[i]
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.index()].children.len()
    }

    /// Reduces `child` and appends the result to `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let reduced = self.reduce(child);
        self.nodes[parent.index()].children.push(reduced);
    }

    /// Wraps `id` in a quantifier. Single-character nodes become loop
    /// nodes in place.
    pub fn make_quantifier(&mut self, id: NodeId, lazy: bool, min: i32, max: i32) -> NodeId {
        if min == 0 && max == 0 {
            let options = self.node(id).options;
            return self.add(NodeKind::Empty, options);
        }
        if min == 1 && max == 1 {
            return id;
        }
        let node = self.node_mut(id);
        if let NodeKind::Char(test) = &node.kind {
            node.kind = NodeKind::CharLoop {
                test: test.clone(),
                min,
                max,
                lazy,
            };
            return id;
        }
        let options = node.options;
        let wrapper = self.add(NodeKind::Loop { min, max, lazy }, options);
        self.add_child(wrapper, id);
        wrapper
    }

    /// Right-to-left concatenations are built forwards and flipped once.
    pub fn reverse_left(&mut self, id: NodeId) -> NodeId {
        let node = self.node_mut(id);
        if node.is_rtl() && node.kind == NodeKind::Concatenate {
            node.children.reverse();
        }
        id
    }

    pub(super) fn set_bounds(&mut self, id: NodeId, min: i32, max: i32) {
        self.node_mut(id).kind.set_bounds(min, max);
    }

    /// Renders the subtree at `root`, one node per line, indented by depth.
    pub fn dump(&self, root: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(&NodeDisplay(node).to_string());
            out.push('\n');
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

struct NodeDisplay<'a>(&'a Node);

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0;
        write!(f, "{}", node.kind.name())?;
        if node.is_rtl() {
            write!(f, "-R")?;
        }
        if node.is_ci() {
            write!(f, "-C")?;
        }
        match &node.kind {
            NodeKind::Char(test) | NodeKind::CharLoop { test, .. } => match test {
                CharTest::One(c) | CharTest::Notone(c) => write!(f, "(Ch = {:?})", c)?,
                CharTest::Set(set) => write!(f, "(Set = {})", set)?,
            },
            NodeKind::Multi(s) => write!(f, "(String = {:?})", s.iter().collect::<String>())?,
            NodeKind::Ref(n) | NodeKind::Testref(n) => write!(f, "(index = {})", n)?,
            NodeKind::Capture { cap, uncap } => {
                write!(f, "(index = {}", cap)?;
                if *uncap != -1 {
                    write!(f, ", unindex = {}", uncap)?;
                }
                write!(f, ")")?;
            }
            _ => {}
        }
        if let Some((min, max)) = node.kind.bounds() {
            let max = if max == INFINITE_REPEAT {
                "inf".to_string()
            } else {
                max.to_string()
            };
            write!(f, "(Min = {}, Max = {})", min, max)?;
        }
        Ok(())
    }
}
