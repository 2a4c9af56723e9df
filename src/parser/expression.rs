//! `Rule`, `Alternation`, `Sequence`, `Term` and the closed `Primary` set.
//!
//! Grounded in `examples/original_source/term.h`'s `Primary` variant and in
//! `examples/original_source/ast/alternation.cc` / `ast/rule.cc` /
//! `ast/character_class.cc` for parse structure, comment-harvesting points,
//! and character-class token decoding.

use super::Parser;
use crate::ast::{
    Ast, ActionData, AlternationData, BackrefData, CaptureData, CharRange, CharacterClassData,
    ExpandData, GroupData, NodeId, NodeKind, Prefix, Quantifier, ReferenceData, RuleData,
    SequenceData, StringLitData, TermData,
};
use crate::error::Result;

pub fn parse_rule(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    let Some(name) = p.match_rule_head() else {
        p.rollback(sp);
        return Ok(None);
    };
    // Placeholder body id, overwritten once the alternation is built; see
    // the identical technique in `parse_term` for why this is safe.
    let rule_id = ast.alloc(parent, NodeKind::Rule(RuleData { name, body: parent }));
    let Some(body) = parse_alternation(p, ast, rule_id)? else {
        return Err(p.error_here("rule body"));
    };
    if let Some(r) = ast.rule_mut(rule_id) {
        r.body = body;
    }
    Ok(Some(rule_id))
}

pub fn parse_alternation(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    let alt_id = ast.alloc(parent, NodeKind::Alternation(AlternationData { sequences: Vec::new() }));
    let Some(first) = parse_sequence(p, ast, alt_id)? else {
        p.rollback(sp);
        return Ok(None);
    };
    let mut sequences = vec![first];
    loop {
        if !p.token("/") {
            break;
        }
        let Some(seq) = parse_sequence(p, ast, alt_id)? else {
            return Err(p.error_here("sequence after '/'"));
        };
        sequences.push(seq);
    }
    // Comment rule 3: a trailing remark on the same line as the last
    // alternative attaches to the alternation itself, not the next rule.
    let post_comment = p.take_inline_comment();
    if let Some(a) = ast.alternation_mut(alt_id) {
        a.sequences = sequences;
    }
    ast.set_post_comment(alt_id, post_comment);
    Ok(Some(alt_id))
}

fn parse_sequence(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    // Comment rule 2: comments immediately preceding a sequence (including
    // the first one, when this alternation has no enclosing Rule to claim
    // them) attach to that sequence.
    let comments = p.take_comments();
    let seq_id = ast.alloc(parent, NodeKind::Sequence(SequenceData::default()));
    let mut terms = Vec::new();
    while let Some(term_id) = parse_term(p, ast, seq_id)? {
        terms.push(term_id);
    }
    if terms.is_empty() {
        p.rollback(sp);
        return Ok(None);
    }
    if let Some(s) = ast.sequence_mut(seq_id) {
        s.terms = terms;
    }
    ast.set_comments(seq_id, comments);
    Ok(Some(seq_id))
}

fn parse_term(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    p.skip_space();
    if p.is_eof() || p.peek_char('/') || p.peek_char(')') || p.peek_char('>') || p.peek_char('%') {
        return Ok(None);
    }

    let prefix = if p.token("&") {
        Some(Prefix::And)
    } else if p.token("!") {
        Some(Prefix::Not)
    } else {
        None
    };

    // `primary` is set to `parent` as a harmless placeholder until the
    // primary node (which needs this term as its own parent) is allocated.
    let term_id = ast.alloc(
        parent,
        NodeKind::Term(TermData {
            prefix,
            quantifier: None,
            primary: parent,
        }),
    );

    let Some(primary_id) = parse_primary(p, ast, term_id)? else {
        p.rollback(sp);
        return Ok(None);
    };

    let quantifier = if p.token("?") {
        Some(Quantifier::Question)
    } else if p.token("*") {
        Some(Quantifier::Star)
    } else if p.token("+") {
        Some(Quantifier::Plus)
    } else {
        None
    };

    if let Some(t) = ast.term_mut(term_id) {
        t.primary = primary_id;
        t.quantifier = quantifier;
    }
    Ok(Some(term_id))
}

fn parse_primary(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    if let Some(id) = parse_string_lit(p, ast, parent) {
        return Ok(Some(id));
    }
    if let Some(id) = parse_character_class(p, ast, parent)? {
        return Ok(Some(id));
    }
    if let Some(id) = parse_group_or_capture(p, ast, parent)? {
        return Ok(Some(id));
    }
    if let Some(src) = p.match_code() {
        return Ok(Some(ast.alloc(parent, NodeKind::Action(ActionData { source: src }))));
    }
    if p.token("$") {
        let Some(src) = p.match_code() else {
            return Err(p.error_here("'{' after '$'"));
        };
        return Ok(Some(ast.alloc(parent, NodeKind::Expand(ExpandData { source: src }))));
    }
    if let Some(id) = parse_backref(p, ast, parent) {
        return Ok(Some(id));
    }
    if let Some(id) = parse_reference(p, ast, parent) {
        return Ok(Some(id));
    }
    Ok(None)
}

fn parse_string_lit(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Option<NodeId> {
    let content = p.match_quoted('"', '"').or_else(|| p.match_quoted('\'', '\''))?;
    Some(ast.alloc(parent, NodeKind::StringLit(StringLitData { content })))
}

fn parse_backref(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Option<NodeId> {
    let sp = p.save_point();
    if !p.token("\\") {
        return None;
    }
    let Some(index) = p.match_number() else {
        p.rollback(sp);
        return None;
    };
    Some(ast.alloc(parent, NodeKind::Backref(BackrefData { index })))
}

fn parse_reference(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Option<NodeId> {
    let sp = p.save_point();
    let Some(first) = p.match_identifier() else {
        p.rollback(sp);
        return None;
    };
    if p.match_char(':') {
        let Some(name) = p.match_identifier() else {
            p.rollback(sp);
            return None;
        };
        return Some(ast.alloc(
            parent,
            NodeKind::Reference(ReferenceData {
                name,
                binding: Some(first),
            }),
        ));
    }
    Some(ast.alloc(
        parent,
        NodeKind::Reference(ReferenceData {
            name: first,
            binding: None,
        }),
    ))
}

fn parse_group_or_capture(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    if p.token("(") {
        let group_id = ast.alloc(parent, NodeKind::Group(GroupData { body: parent }));
        let Some(body) = parse_alternation(p, ast, group_id)? else {
            p.rollback(sp);
            return Ok(None);
        };
        if !p.token(")") {
            return Err(p.error_here("')'"));
        }
        if let Some(g) = ast.group_mut(group_id) {
            g.body = body;
        }
        return Ok(Some(group_id));
    }
    if p.token("<") {
        let capture_id = ast.alloc(parent, NodeKind::Capture(CaptureData { body: parent }));
        let Some(body) = parse_alternation(p, ast, capture_id)? else {
            p.rollback(sp);
            return Ok(None);
        };
        if !p.token(">") {
            return Err(p.error_here("'>'"));
        }
        if let Some(c) = ast.capture_mut(capture_id) {
            c.body = body;
        }
        return Ok(Some(capture_id));
    }
    Ok(None)
}

fn parse_character_class(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<Option<NodeId>> {
    let sp = p.save_point();
    p.skip_space();
    if p.match_char('.') {
        return Ok(Some(ast.alloc(parent, NodeKind::Dot)));
    }
    if !p.match_char('[') {
        p.rollback(sp);
        return Ok(None);
    }
    let negation = p.match_char('^');
    let leading_dash = p.match_char('-');

    let mut raw = String::new();
    loop {
        if p.is_eof() {
            return Err(p.error_here("']'"));
        }
        if p.peek_char(']') {
            p.advance_char();
            break;
        }
        let c = p.advance_char().expect("checked not EOF above");
        raw.push(c);
        if c == '\\' {
            if let Some(escaped) = p.advance_char() {
                raw.push(escaped);
            }
        }
    }

    let tokens = decode_class_tokens(&raw);
    Ok(Some(ast.alloc(
        parent,
        NodeKind::CharacterClass(CharacterClassData {
            negation,
            leading_dash,
            tokens,
        }),
    )))
}

enum ClassItem {
    Char(u32),
    Dash,
}

/// Decode a character class body into logical items — real code points for
/// escape sequences and plain characters, a distinguished marker for a bare
/// (unescaped) `-` used as a range separator.
fn decode_class_items(raw: &str) -> Vec<ClassItem> {
    let mut items = Vec::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let Some(next) = chars.next() else { break };
            let code = match next {
                'n' => b'\n' as u32,
                't' => b'\t' as u32,
                'r' => b'\r' as u32,
                'v' => 0x0b,
                'f' => 0x0c,
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    u32::from_str_radix(&hex, 16).unwrap_or(next as u32)
                }
                other => other as u32,
            };
            items.push(ClassItem::Char(code));
        } else if c == '-' {
            items.push(ClassItem::Dash);
        } else {
            items.push(ClassItem::Char(c as u32));
        }
    }
    items
}

/// Fold decoded items into `[lo, hi]` ranges: `a - b` (separated by an
/// unescaped dash) becomes one range, everything else a single-point range.
fn decode_class_tokens(raw: &str) -> Vec<CharRange> {
    let items = decode_class_items(raw);
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let ClassItem::Char(lo) = items[i] else {
            i += 1;
            continue;
        };
        if i + 2 < items.len() {
            if let (ClassItem::Dash, ClassItem::Char(hi)) = (&items[i + 1], &items[i + 2]) {
                let (lo, hi) = if lo <= *hi { (lo, *hi) } else { (*hi, lo) };
                tokens.push(CharRange { lo, hi });
                i += 3;
                continue;
            }
        }
        tokens.push(CharRange::single(lo));
        i += 1;
    }
    tokens
}
