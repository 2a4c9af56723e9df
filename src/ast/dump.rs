//! Plain-text debug tree dump, grounded in
//! `examples/original_source/ast.cc`'s `print_ast` (`"%*s%s:\n"` plus
//! recursing into children at `indent + 2`).

use super::{Ast, NodeId, NodeKind};

impl Ast {
    /// Render the subtree rooted at `id` as an indented label tree, two
    /// spaces per level, one line per node.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        out.push_str(&pad);
        out.push_str(self.kind(id).label());
        out.push_str(&self.dump_detail(id));
        out.push('\n');
        for child in self.children(id) {
            self.dump_into(child, depth + 1, out);
        }
    }

    fn dump_detail(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Rule(r) => format!(" {}", r.name),
            NodeKind::Directive(d) => format!(" {}", d.name),
            NodeKind::StringLit(s) => format!(" {:?}", s.content),
            NodeKind::Reference(r) => match &r.binding {
                Some(b) => format!(" {b}:{}", r.name),
                None => format!(" {}", r.name),
            },
            NodeKind::CharacterClass(cc) => {
                format!(
                    " {}{:?}",
                    if cc.negation { "^" } else { "" },
                    cc.tokens
                )
            }
            NodeKind::Backref(b) => format!(" \\{}", b.index),
            _ => String::new(),
        }
    }
}
