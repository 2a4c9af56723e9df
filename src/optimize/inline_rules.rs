//! Inline a non-recursive, non-alternating rule into its (few) call sites
//! and drop the now-unused rule.
//!
//! Grounded in `examples/original_source/optimizer.cc`'s `inline_rules`:
//! skip rules with more than one alternative, skip direct recursion, count
//! reference sites across the whole grammar, and inline only when that
//! count is between 1 and the configured limit (a lower limit for rules
//! whose body is a single term — "terminal" rules — than for everything
//! else). Each call site gets its own copy of the rule's body wrapped in a
//! `Group`, since the arena has no notion of a node shared by more than one
//! parent.

use crate::ast::{
    Ast, AlternationData, CaptureData, GroupData, NodeId, NodeKind, RuleData, SequenceData, TermData,
};
use crate::config::OptimizerConfig;

pub fn inline_rules(ast: &mut Ast, cfg: &OptimizerConfig) -> usize {
    if cfg.no_inline {
        return 0;
    }
    let mut count = 0;
    let Some(grammar) = ast.grammar(ast.root()) else { return 0 };
    let rule_ids: Vec<NodeId> = grammar.rules.clone();
    // spec.md §3.2: the start rule is never removed regardless of reference
    // count, even though nothing ordinarily references it.
    let Some(&start_rule_id) = rule_ids.first() else { return 0 };

    for &rule_id in rule_ids.iter().rev() {
        if rule_id == start_rule_id {
            continue;
        }
        let Some(rule) = ast.rule(rule_id) else { continue };
        let rule_name = rule.name.clone();
        let body = rule.body;

        let Some(alt) = ast.alternation(body) else { continue };
        if alt.sequences.len() != 1 {
            continue; // do not inline rules with alternation
        }
        let seq_id = alt.sequences[0];

        let is_recursive = !ast
            .find_all_from(body, &|ast, id| is_reference_to(ast, id, &rule_name))
            .is_empty();
        if is_recursive {
            continue;
        }

        let refs = ast.find_all(|ast, id| is_reference_to(ast, id, &rule_name));

        let Some(seq) = ast.sequence(seq_id) else { continue };
        let is_terminal = seq.terms.len() == 1;
        let limit = if is_terminal { cfg.terminal_inline_limit } else { cfg.inline_limit };
        if refs.is_empty() || refs.len() > limit {
            continue;
        }

        for &ref_id in &refs {
            let Some(term_id) = ast.parent(ref_id) else { continue };
            if !matches!(ast.kind(term_id), NodeKind::Term(_)) {
                continue;
            }
            let group_id = ast.alloc(term_id, NodeKind::Group(GroupData { body: term_id }));
            let cloned_body = clone_subtree(ast, body, group_id);
            if let Some(g) = ast.group_mut(group_id) {
                g.body = cloned_body;
            }
            if let Some(t) = ast.term_mut(term_id) {
                t.primary = group_id;
            }
        }

        if let Some(grammar) = ast.grammar_mut(ast.root()) {
            grammar.rules.retain(|&r| r != rule_id);
        }
        count += 1;
    }
    count
}

fn is_reference_to(ast: &Ast, id: NodeId, name: &str) -> bool {
    matches!(ast.kind(id), NodeKind::Reference(r) if r.name == name)
}

/// Deep-copy the subtree rooted at `id` into a freshly allocated node
/// parented under `new_parent`, fixing up every nested `NodeId` along the
/// way. Used so every inlining site gets its own independent copy of the
/// inlined rule's body.
fn clone_subtree(ast: &mut Ast, id: NodeId, new_parent: NodeId) -> NodeId {
    let kind = ast.kind(id).clone();
    let comments = ast.comments(id).to_vec();
    let post_comment = ast.post_comment(id).map(|s| s.to_string());

    let new_id = ast.alloc(new_parent, kind.clone());
    let new_kind = match kind {
        NodeKind::Rule(r) => NodeKind::Rule(RuleData {
            name: r.name,
            body: clone_subtree(ast, r.body, new_id),
        }),
        NodeKind::Alternation(a) => NodeKind::Alternation(AlternationData {
            sequences: a.sequences.into_iter().map(|s| clone_subtree(ast, s, new_id)).collect(),
        }),
        NodeKind::Sequence(s) => NodeKind::Sequence(SequenceData {
            terms: s.terms.into_iter().map(|t| clone_subtree(ast, t, new_id)).collect(),
        }),
        NodeKind::Term(t) => NodeKind::Term(TermData {
            prefix: t.prefix,
            quantifier: t.quantifier,
            primary: clone_subtree(ast, t.primary, new_id),
        }),
        NodeKind::Group(g) => NodeKind::Group(GroupData {
            body: clone_subtree(ast, g.body, new_id),
        }),
        NodeKind::Capture(c) => NodeKind::Capture(CaptureData {
            body: clone_subtree(ast, c.body, new_id),
        }),
        leaf => leaf,
    };
    *ast.kind_mut(new_id) = new_kind;
    ast.set_comments(new_id, comments);
    ast.set_post_comment(new_id, post_comment);
    new_id
}
