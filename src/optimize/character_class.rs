//! Sort and merge each character class's ranges into canonical form.
//!
//! Grounded in `examples/original_source/optimizer.cc`'s
//! `normalize_character_classes` and `ast/character_class.cc`'s
//! `CharacterClass::normalize`.

use crate::ast::{Ast, CharRange, NodeKind};
use crate::config::OptimizerConfig;

pub fn normalize_character_classes(ast: &mut Ast, cfg: &OptimizerConfig) -> usize {
    if cfg.no_char_class {
        return 0;
    }
    let ids = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::CharacterClass(_)));
    let mut count = 0;
    for id in ids {
        if let Some(cc) = ast.character_class_mut(id) {
            let before = cc.tokens.clone();
            normalize_tokens(&mut cc.tokens);
            if cc.tokens != before {
                count += 1;
            }
        }
    }
    count
}

fn normalize_tokens(tokens: &mut Vec<CharRange>) {
    if tokens.is_empty() {
        return;
    }
    tokens.sort();
    let mut merged = vec![tokens[0]];
    for &t in &tokens[1..] {
        let last = merged.last_mut().expect("just pushed the first token above");
        if t.lo <= last.hi.saturating_add(1) {
            if t.hi > last.hi {
                last.hi = t.hi;
            }
        } else {
            merged.push(t);
        }
    }
    *tokens = merged;
}
