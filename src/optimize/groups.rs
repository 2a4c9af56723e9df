//! Remove a parenthesized group that adds no structure beyond what its
//! enclosing term already has.
//!
//! Grounded in `examples/original_source/optimizer.cc`'s
//! `remove_unnecessary_groups`: a bare, unquantified `(B C)` splices its
//! terms directly into the enclosing sequence; a quantified or prefixed
//! group around a single term instead just unwraps to that term's primary,
//! keeping the prefix/quantifier in place. Never applies to `Capture`
//! (`<...>`), which always carries its own meaning.
use crate::ast::{Ast, NodeKind};

pub fn remove_unnecessary_groups(ast: &mut Ast) -> usize {
    let mut count = 0;
    ast.map(|ast, id| {
        let Some(term) = ast.term(id) else { return false };
        let prefix = term.prefix;
        let quantifier = term.quantifier;
        let primary_id = term.primary;

        let Some(group) = ast.group(primary_id) else { return false };
        let body = group.body;

        let Some(alt) = ast.alternation(body) else { return false };
        if alt.sequences.len() != 1 {
            return false;
        }
        let seq_id = alt.sequences[0];

        let Some(seq) = ast.sequence(seq_id) else { return false };
        let seq_len = seq.terms.len();
        let seq_terms = seq.terms.clone();

        if prefix.is_none() && quantifier.is_none() {
            // A (B C) D -> A B C D
            let Some(parent_seq_id) = ast.parent(id) else { return false };
            if !matches!(ast.kind(parent_seq_id), NodeKind::Sequence(_)) {
                return false;
            }
            let Some(parent_seq) = ast.sequence_mut(parent_seq_id) else { return false };
            let Some(pos) = parent_seq.terms.iter().position(|&t| t == id) else { return false };
            parent_seq.terms.splice(pos..=pos, seq_terms.iter().copied());
            // The spliced terms now live under `parent_seq_id`, not their
            // old `Sequence` inside the detached `Group` — `relink_parents`
            // walks down from the old enclosing `Term`, which would just
            // reassert the stale parent, so fix these up directly.
            for &t in &seq_terms {
                ast.set_parent(t, parent_seq_id);
            }
            count += 1;
            true
        } else if seq_len == 1 {
            // A (B)* C -> A B* C
            let inner_term_id = seq_terms[0];
            let Some(inner_term) = ast.term(inner_term_id) else { return false };
            let inner_primary = inner_term.primary;
            let Some(t) = ast.term_mut(id) else { return false };
            t.primary = inner_primary;
            count += 1;
            true
        } else {
            false
        }
    });
    count
}
