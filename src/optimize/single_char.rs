//! Collapse a character class that covers exactly one code point into a
//! plain string literal.
//!
//! Grounded in `examples/original_source/optimizer.cc`'s
//! `single_char_character_classes`. A negated single-char class (`[^x]`)
//! folds its negation into the enclosing term's prefix (`!"x"`); the
//! original also folds this when the term already carries an `&` prefix,
//! silently overwriting it with `!` and changing what the grammar means.
//! This crate treats that case as a no-op instead (see DESIGN.md) since
//! folding negation into an existing `&` has no equivalent single-prefix
//! rendition.
use crate::ast::{Ast, NodeKind, Prefix, StringLitData};
use crate::config::OptimizerConfig;

pub fn single_char_character_classes(ast: &mut Ast, cfg: &OptimizerConfig) -> usize {
    if cfg.no_single_char {
        return 0;
    }
    let ids = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::CharacterClass(_)));
    let mut count = 0;
    for id in ids {
        let Some(cc) = ast.character_class(id) else { continue };
        let size = cc.tokens.iter().map(|t| t.len()).sum::<usize>() + usize::from(cc.leading_dash);
        if size != 1 {
            continue;
        }
        let negation = cc.negation;
        let content = if cc.leading_dash {
            "-".to_string()
        } else {
            match char::from_u32(cc.tokens[0].lo) {
                Some(c) => c.to_string(),
                None => continue,
            }
        };

        let Some(term_id) = ast.parent(id) else { continue };
        if !matches!(ast.kind(term_id), NodeKind::Term(_)) {
            continue;
        }

        if negation {
            let prefix = ast.term(term_id).and_then(|t| t.prefix);
            let new_prefix = match prefix {
                None => Some(Prefix::Not),
                Some(Prefix::Not) => None,
                Some(Prefix::And) => continue,
            };
            if let Some(t) = ast.term_mut(term_id) {
                t.prefix = new_prefix;
            }
        }

        let string_id = ast.alloc(term_id, NodeKind::StringLit(StringLitData { content }));
        if let Some(t) = ast.term_mut(term_id) {
            t.primary = string_id;
        }
        count += 1;
    }
    count
}
