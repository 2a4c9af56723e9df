//! Comment attachment (spec.md §4.1/§4.2).
//!
//! The parser harvests `#`-prefixed line comments as plain text while
//! consuming whitespace and hands them to [`Ast::set_comments`]/
//! [`Ast::set_post_comment`]; this module only renders them back out, shared
//! between [`super::emit`] and [`super::dump`].

/// Render a block of leading comment lines, each on its own `indent`-prefixed
/// line, or the empty string if there are none.
pub(super) fn render_comments(comments: &[String], indent: &str) -> String {
    let mut out = String::new();
    for line in comments {
        out.push_str(indent);
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
