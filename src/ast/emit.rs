//! Canonical PEG source emission (`to_string`, spec.md §4.2).
//!
//! Grounded line-for-line in `examples/original_source/ast.cc`'s
//! `format_*` family (and the C port in `format.c`), translated from
//! pointer-walking `printf` calls into `String`-returning functions over
//! the arena.

use super::comments::render_comments;
use super::{Ast, DirectiveValue, NodeId, NodeKind, Prefix, Quantifier};
use crate::config::OptimizerConfig;

const STEP: &str = "    ";

pub fn emit_grammar(ast: &Ast, cfg: &OptimizerConfig) -> String {
    let Some(grammar) = ast.grammar(ast.root()) else {
        return String::new();
    };
    let mut out = String::new();
    for &d in &grammar.directives {
        out.push_str(&emit_directive(ast, d));
    }
    for &r in &grammar.rules {
        out.push_str(&emit_rule(ast, r, cfg));
    }
    if let Some(code) = grammar.code {
        out.push_str(&emit_code_block(ast, code));
    }
    out
}

fn emit_directive(ast: &Ast, id: NodeId) -> String {
    let Some(d) = ast.directive(id) else { return String::new() };
    let mut out = format!("%{}", d.name);
    match &d.value {
        DirectiveValue::Str(s) => {
            // `s` is the verbatim rest-of-line text captured by the parser
            // (already quoted, if the source quoted it) — re-wrapping it
            // in `emit_string_body` would double-quote it on re-emit.
            out.push(' ');
            out.push_str(s);
        }
        DirectiveValue::Code(src) => {
            out.push_str(&emit_source_block(src, 4, 0));
        }
    }
    out.push_str("\n\n");
    out
}

fn emit_code_block(ast: &Ast, id: NodeId) -> String {
    let Some(c) = ast.code_block(id) else { return String::new() };
    format!("%%\n{}\n", c.source.trim())
}

fn emit_rule(ast: &Ast, id: NodeId, cfg: &OptimizerConfig) -> String {
    let Some(rule) = ast.rule(id) else { return String::new() };
    let comments = render_comments(ast.comments(id), "");
    format!(
        "{comments}{name} <- {body}\n\n",
        name = rule.name,
        body = emit_alternation(ast, rule.body, STEP, cfg)
    )
}

fn emit_alternation(ast: &Ast, id: NodeId, indent: &str, cfg: &OptimizerConfig) -> String {
    let Some(alt) = ast.alternation(id) else { return String::new() };
    // Grounded in `ast.cc`'s `format_alternation`: only a `Rule`'s own
    // alternation ever wraps multi-line: a `Group`/`Capture`'s inner
    // alternation always joins on one line with `" / "`, however many
    // alternatives it has.
    let is_rule_body = matches!(ast.parent(id).map(|p| ast.kind(p)), Some(NodeKind::Rule(_)));
    let multiline = is_rule_body && alt.sequences.len() > cfg.wrap_limit;
    let mut out = emit_sequence(ast, alt.sequences[0], indent, cfg);
    for &seq in &alt.sequences[1..] {
        if multiline {
            out.push('\n');
            out.push_str(indent);
            out.push_str("/ ");
        } else {
            out.push_str(" / ");
        }
        out.push_str(&emit_sequence(ast, seq, indent, cfg));
    }
    if let Some(pc) = ast.post_comment(id) {
        out.push('\n');
        out.push_str(indent);
        out.push_str("# ");
        out.push_str(pc);
    }
    out
}

fn emit_sequence(ast: &Ast, id: NodeId, indent: &str, cfg: &OptimizerConfig) -> String {
    let Some(seq) = ast.sequence(id) else { return String::new() };
    let mut out = render_comments(ast.comments(id), indent);
    let parts: Vec<String> = seq.terms.iter().map(|&t| emit_term(ast, t, indent, cfg)).collect();
    out.push_str(&parts.join(" "));
    out
}

fn emit_term(ast: &Ast, id: NodeId, indent: &str, cfg: &OptimizerConfig) -> String {
    let Some(term) = ast.term(id) else { return String::new() };
    let mut out = String::new();
    match term.prefix {
        Some(Prefix::And) => out.push('&'),
        Some(Prefix::Not) => out.push('!'),
        None => {}
    }
    out.push_str(&emit_primary(ast, term.primary, indent, cfg));
    match term.quantifier {
        Some(Quantifier::Question) => out.push('?'),
        Some(Quantifier::Star) => out.push('*'),
        Some(Quantifier::Plus) => out.push('+'),
        None => {}
    }
    out
}

fn emit_primary(ast: &Ast, id: NodeId, indent: &str, cfg: &OptimizerConfig) -> String {
    match ast.kind(id) {
        NodeKind::StringLit(s) => emit_string_body(&s.content),
        NodeKind::Reference(r) => match &r.binding {
            Some(b) => format!("{b}:{}", r.name),
            None => r.name.clone(),
        },
        NodeKind::CharacterClass(cc) => emit_character_class(cc),
        NodeKind::Dot => ".".to_string(),
        NodeKind::Backref(b) => format!("\\{}", b.index),
        NodeKind::Action(a) => emit_source_block(&a.source, 8, 4),
        NodeKind::Expand(e) => format!("${}", emit_source_block(&e.source, 8, 4)),
        NodeKind::Group(g) => format!("({})", emit_alternation(ast, g.body, &format!("{indent}{STEP}"), cfg)),
        NodeKind::Capture(c) => format!("<{}>", emit_alternation(ast, c.body, &format!("{indent}{STEP}"), cfg)),
        _ => String::new(),
    }
}

/// Double-quoted string body, `\` and `"` escaped, stray `\'` normalized to
/// `'`. Grounded in `ast.cc`'s `format_string`.
fn emit_string_body(content: &str) -> String {
    let mut out = String::from("\"");
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn escape_class_char(c: u32) -> String {
    if c > 127 {
        return format!("\\u{c:04x}");
    }
    match char::from_u32(c) {
        Some('\r') => "\\r".into(),
        Some('\n') => "\\n".into(),
        Some('\t') => "\\t".into(),
        Some('\x0b') => "\\v".into(),
        Some('\x0c') => "\\f".into(),
        Some('[') => "\\[".into(),
        Some(']') => "\\]".into(),
        Some('^') => "\\^".into(),
        Some('-') => "\\-".into(),
        Some('\\') => "\\\\".into(),
        Some(ch) => ch.to_string(),
        None => String::new(),
    }
}

fn emit_character_class(cc: &super::CharacterClassData) -> String {
    let mut out = String::from("[");
    if cc.negation {
        out.push('^');
    }
    if cc.leading_dash {
        out.push('-');
    }
    for t in &cc.tokens {
        match t.hi - t.lo {
            0 => out.push_str(&escape_class_char(t.lo)),
            1 => {
                out.push_str(&escape_class_char(t.lo));
                out.push_str(&escape_class_char(t.hi));
            }
            _ => {
                out.push_str(&escape_class_char(t.lo));
                out.push('-');
                out.push_str(&escape_class_char(t.hi));
            }
        }
    }
    out.push(']');
    out
}

/// Re-indent and wrap an inline code block. `base_indent` is 4 inside a
/// `Directive`, 8 inside an `Action`/`Expand`; `close_pad` is the spaces
/// before the closing brace (0 for directives, 4 otherwise) — grounded in
/// `ast.cc`'s `format_source`/`reindent`.
fn emit_source_block(source: &str, base_indent: usize, close_pad: usize) -> String {
    let trimmed = source.trim();
    if !trimmed.contains('\n') {
        return format!(" {{ {trimmed} }}");
    }
    let lines: Vec<&str> = trimmed.lines().collect();
    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::from(" {\n");
    for line in &lines {
        if line.trim().is_empty() {
            out.push('\n');
            continue;
        }
        let stripped = &line[min_indent.min(line.len())..];
        out.push_str(&" ".repeat(base_indent));
        out.push_str(stripped.trim_end());
        out.push('\n');
    }
    out.push_str(&" ".repeat(close_pad));
    out.push('}');
    out
}
