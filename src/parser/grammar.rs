//! Top-level productions: `Grammar`, `Directive`, trailing `Code` block.
//!
//! Grounded in `examples/original_source/directive.h` for the `Directive`
//! shape (`name`, `value`, `code` flag) and in the `%%`-introduced tail
//! block convention PackCC shares with its own `.peg` input format.

use super::Parser;
use crate::ast::{Ast, CodeData, DirectiveData, DirectiveValue, NodeId, NodeKind};
use crate::error::Result;

pub fn parse_grammar(p: &mut Parser, ast: &mut Ast) -> Result<()> {
    let root = ast.root();
    let mut directives = Vec::new();
    let mut rules = Vec::new();

    loop {
        let comments = p.take_comments();
        p.skip_space();

        if p.token("%%") {
            let source = p.rest().to_string();
            let code = ast.alloc(root, NodeKind::Code(CodeData { source }));
            ast.set_comments(code, comments);
            if let Some(grammar) = ast.grammar_mut(root) {
                grammar.code = Some(code);
            }
            break;
        }

        if p.is_eof() {
            break;
        }

        if p.peek_char('%') {
            let id = parse_directive(p, ast, root)?;
            ast.set_comments(id, comments);
            directives.push(id);
            continue;
        }

        if let Some(id) = super::expression::parse_rule(p, ast, root)? {
            ast.set_comments(id, comments);
            rules.push(id);
            continue;
        }

        break;
    }

    if let Some(grammar) = ast.grammar_mut(root) {
        grammar.directives = directives;
        grammar.rules = rules;
    }
    Ok(())
}

fn parse_directive(p: &mut Parser, ast: &mut Ast, parent: NodeId) -> Result<NodeId> {
    let sp = p.save_point();
    p.match_char('%');
    let name = match p.match_directive_name() {
        Some(n) => n,
        None => {
            p.rollback(sp);
            return Err(p.error_here("directive name"));
        }
    };

    let value = if let Some(code) = p.match_code() {
        DirectiveValue::Code(code)
    } else {
        DirectiveValue::Str(p.rest_of_line())
    };

    Ok(ast.alloc(parent, NodeKind::Directive(DirectiveData { name, value })))
}
