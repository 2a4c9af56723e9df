//! Merge consecutive unquantified string-literal terms within a sequence
//! into one literal.
//!
//! Grounded in `examples/original_source/optimizer.cc`'s `concat_strings`.

use crate::ast::{Ast, NodeId, NodeKind};
use crate::config::OptimizerConfig;

pub fn concat_strings(ast: &mut Ast, cfg: &OptimizerConfig) -> usize {
    if cfg.no_concat {
        return 0;
    }
    let seq_ids = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::Sequence(_)));
    let mut count = 0;
    for seq_id in seq_ids {
        count += merge_adjacent_strings(ast, seq_id);
    }
    count
}

fn merge_adjacent_strings(ast: &mut Ast, seq_id: NodeId) -> usize {
    let mut count = 0;
    loop {
        let Some(seq) = ast.sequence(seq_id) else { return count };
        let terms = seq.terms.clone();

        let mut pair = None;
        for i in 0..terms.len().saturating_sub(1) {
            if is_plain_string_term(ast, terms[i]) && is_plain_string_term(ast, terms[i + 1]) {
                pair = Some((i, i + 1));
                break;
            }
        }
        let Some((a, b)) = pair else { return count };

        let tail = string_content(ast, terms[b]);
        if let Some(primary_a) = ast.term(terms[a]).map(|t| t.primary) {
            if let Some(s) = ast.string_lit_mut(primary_a) {
                s.content.push_str(&tail);
            }
        }
        if let Some(s) = ast.sequence_mut(seq_id) {
            s.terms.remove(b);
        }
        count += 1;
    }
}

fn is_plain_string_term(ast: &Ast, term_id: NodeId) -> bool {
    let Some(t) = ast.term(term_id) else { return false };
    if t.prefix.is_some() || t.quantifier.is_some() {
        return false;
    }
    matches!(ast.kind(t.primary), NodeKind::StringLit(_))
}

fn string_content(ast: &Ast, term_id: NodeId) -> String {
    ast.term(term_id)
        .and_then(|t| ast.string_lit(t.primary))
        .map(|s| s.content.clone())
        .unwrap_or_default()
}
