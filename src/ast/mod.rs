//! The typed AST: a rooted tree of [`NodeKind`] variants held in a single
//! arena, addressed by [`NodeId`] instead of pointers.
//!
//! Grounded in the design note of spec.md §9 ("an arena-of-indices design
//! pairs well with the `find_all`/`map` traversals because they can iterate
//! by index without aliasing"): every node's parent is a `NodeId`, never a
//! borrowed reference, so there is no ownership cycle to reason about and
//! the walkers in this module can restart a level's iteration just by
//! resetting an index, exactly as spec.md §9 asks for.

mod comments;
mod dump;
mod emit;
pub mod types;

pub use emit::emit_grammar;
pub use types::*;

/// Index into [`Ast`]'s node arena. `Copy` because it is just an integer —
/// the non-owning equivalent of the weak parent back-reference spec.md §9
/// calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Entry {
    parent: Option<NodeId>,
    kind: NodeKind,
    /// Comment lines harvested immediately before this node was parsed.
    comments: Vec<String>,
    /// A comment trailing the last alternative of a top-level `Alternation`
    /// (spec §4.1 / §4.2 comment rule 3); only ever populated on
    /// `Alternation` nodes.
    post_comment: Option<String>,
}

/// The AST arena plus the id of its `Grammar` root.
pub struct Ast {
    nodes: Vec<Entry>,
    root: NodeId,
}

impl Ast {
    /// Construct an arena containing only an empty `Grammar` root.
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(Entry {
            parent: None,
            kind: NodeKind::Grammar(GrammarData::default()),
            comments: Vec::new(),
            post_comment: None,
        });
        Ast {
            nodes,
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn alloc(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Entry {
            parent: Some(parent),
            kind,
            comments: Vec::new(),
            post_comment: None,
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id.index()].parent = Some(parent);
    }

    pub fn comments(&self, id: NodeId) -> &[String] {
        &self.nodes[id.index()].comments
    }

    pub fn set_comments(&mut self, id: NodeId, comments: Vec<String>) {
        self.nodes[id.index()].comments = comments;
    }

    pub fn post_comment(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].post_comment.as_deref()
    }

    pub fn set_post_comment(&mut self, id: NodeId, comment: Option<String>) {
        self.nodes[id.index()].post_comment = comment;
    }

    /// Typed parent query: the nearest ancestor (searching upward from
    /// `id`'s direct parent) whose kind matches `pred`.
    pub fn find_ancestor(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut cur = self.parent(id)?;
        loop {
            if pred(self.kind(cur)) {
                return Some(cur);
            }
            cur = self.parent(cur)?;
        }
    }

    /// The direct children of `id`, in the order spec.md's node-kind table
    /// lists them.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Grammar(g) => {
                let mut v = g.directives.clone();
                v.extend(g.rules.iter().copied());
                v.extend(g.code);
                v
            }
            NodeKind::Rule(r) => vec![r.body],
            NodeKind::Alternation(a) => a.sequences.clone(),
            NodeKind::Sequence(s) => s.terms.clone(),
            NodeKind::Term(t) => vec![t.primary],
            NodeKind::Group(g) => vec![g.body],
            NodeKind::Capture(c) => vec![c.body],
            NodeKind::Directive(_)
            | NodeKind::Code(_)
            | NodeKind::StringLit(_)
            | NodeKind::Reference(_)
            | NodeKind::CharacterClass(_)
            | NodeKind::Dot
            | NodeKind::Backref(_)
            | NodeKind::Action(_)
            | NodeKind::Expand(_) => Vec::new(),
        }
    }

    /// Depth-first pre-order search starting at `id` (inclusive), collecting
    /// every node for which `pred` holds. Corresponds to the generic
    /// `find_all<K>(predicate)` of spec.md §4.2.
    pub fn find_all_from(&self, id: NodeId, pred: &impl Fn(&Ast, NodeId) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.find_all_into(id, pred, &mut out);
        out
    }

    fn find_all_into(&self, id: NodeId, pred: &impl Fn(&Ast, NodeId) -> bool, out: &mut Vec<NodeId>) {
        if pred(self, id) {
            out.push(id);
        }
        for child in self.children(id) {
            self.find_all_into(child, pred, out);
        }
    }

    /// `find_all` rooted at the whole grammar.
    pub fn find_all(&self, pred: impl Fn(&Ast, NodeId) -> bool) -> Vec<NodeId> {
        self.find_all_from(self.root, &pred)
    }

    /// Depth-first tree walk with restructuring support (spec.md §4.2,
    /// §9). `transform` is invoked once per node (pre-order); when it
    /// returns `true`, the subtree rooted at that node has its parent
    /// pointers re-established, and the *enclosing* level's iteration
    /// restarts from the beginning, since a splice may have shifted
    /// sibling indices out from under the in-progress loop.
    pub fn map(&mut self, mut transform: impl FnMut(&mut Ast, NodeId) -> bool) {
        self.map_children(self.root, &mut transform);
    }

    fn map_node(&mut self, id: NodeId, transform: &mut dyn FnMut(&mut Ast, NodeId) -> bool) -> bool {
        let changed = transform(self, id);
        if changed {
            self.relink_parents(id);
        }
        // Descend regardless: a restructured node's new children (or a
        // detached node's stale ones) still need visiting once, and the
        // cost of walking an orphaned subtree once more is negligible.
        self.map_children(id, transform);
        changed
    }

    fn map_children(&mut self, id: NodeId, transform: &mut dyn FnMut(&mut Ast, NodeId) -> bool) {
        let mut i = 0;
        loop {
            let kids = self.children(id);
            if i >= kids.len() {
                break;
            }
            let restructured = self.map_node(kids[i], transform);
            if restructured {
                i = 0;
            } else {
                i += 1;
            }
        }
    }

    fn relink_parents(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.set_parent(child, id);
            self.relink_parents(child);
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

// --- typed accessors -------------------------------------------------

macro_rules! typed_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $data:ty) => {
        impl Ast {
            pub fn $get(&self, id: NodeId) -> Option<&$data> {
                match self.kind(id) {
                    NodeKind::$variant(data) => Some(data),
                    _ => None,
                }
            }

            pub fn $get_mut(&mut self, id: NodeId) -> Option<&mut $data> {
                match self.kind_mut(id) {
                    NodeKind::$variant(data) => Some(data),
                    _ => None,
                }
            }
        }
    };
}

typed_accessors!(grammar, grammar_mut, Grammar, GrammarData);
typed_accessors!(directive, directive_mut, Directive, DirectiveData);
typed_accessors!(code_block, code_block_mut, Code, CodeData);
typed_accessors!(rule, rule_mut, Rule, RuleData);
typed_accessors!(alternation, alternation_mut, Alternation, AlternationData);
typed_accessors!(sequence, sequence_mut, Sequence, SequenceData);
typed_accessors!(term, term_mut, Term, TermData);
typed_accessors!(string_lit, string_lit_mut, StringLit, StringLitData);
typed_accessors!(reference, reference_mut, Reference, ReferenceData);
typed_accessors!(character_class, character_class_mut, CharacterClass, CharacterClassData);
typed_accessors!(backref, backref_mut, Backref, BackrefData);
typed_accessors!(action, action_mut, Action, ActionData);
typed_accessors!(expand, expand_mut, Expand, ExpandData);
typed_accessors!(group, group_mut, Group, GroupData);
typed_accessors!(capture, capture_mut, Capture, CaptureData);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    ParentLinkConsistent,
    NonEmptyAlternation,
    NonEmptySequence,
    CharacterClassCanonical,
    StartRulePresent,
    ReferenceTargetsExist,
}

/// Checks every invariant of spec.md §8, used both by debug-only assertions
/// inside the optimizer driver and directly by tests.
pub fn check_invariants(ast: &Ast) -> Result<(), (Invariant, String)> {
    let all_ids = ast.find_all(|_, _| true);

    for &id in &all_ids {
        for child in ast.children(id) {
            if ast.parent(child) != Some(id) {
                return Err((
                    Invariant::ParentLinkConsistent,
                    format!(
                        "{:?} has child {:?} whose parent is {:?}, not {:?}",
                        ast.kind(id).label(),
                        child,
                        ast.parent(child),
                        id
                    ),
                ));
            }
        }
        match ast.kind(id) {
            NodeKind::Alternation(a) if a.sequences.is_empty() => {
                return Err((Invariant::NonEmptyAlternation, "alternation with 0 sequences".into()));
            }
            NodeKind::Sequence(s) if s.terms.is_empty() => {
                return Err((Invariant::NonEmptySequence, "sequence with 0 terms".into()));
            }
            NodeKind::CharacterClass(cc) => {
                for pair in cc.tokens.windows(2) {
                    if pair[1].lo <= pair[0].hi + 1 || pair[0].lo > pair[1].lo {
                        return Err((
                            Invariant::CharacterClassCanonical,
                            format!("tokens not sorted/merged: {:?}", cc.tokens),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    let Some(grammar) = ast.grammar(ast.root()) else {
        return Err((Invariant::StartRulePresent, "root is not a Grammar node".into()));
    };
    if grammar.rules.is_empty() {
        return Err((Invariant::StartRulePresent, "grammar has no rules".into()));
    }

    let rule_names: std::collections::HashSet<&str> = grammar
        .rules
        .iter()
        .filter_map(|&id| ast.rule(id))
        .map(|r| r.name.as_str())
        .collect();
    for &id in &all_ids {
        if let NodeKind::Reference(r) = ast.kind(id) {
            if !rule_names.contains(r.name.as_str()) {
                return Err((
                    Invariant::ReferenceTargetsExist,
                    format!("reference to undefined rule '{}'", r.name),
                ));
            }
        }
    }

    Ok(())
}
