//! Hand-written recursive-descent parser over the PEG grammar text.
//!
//! Grounded in `examples/original_source/parser.h`'s `Parser`/`State`: a
//! single cursor over the source plus a checkpoint/rollback pair, instead
//! of a combinator or tokenizer pipeline. Every production below follows
//! the same shape as the original's `Node::parse` methods: save a
//! checkpoint, try to recognize the construct, and roll back to the
//! checkpoint (leaving the cursor untouched) on failure so the caller can
//! try the next alternative.

mod expression;
mod grammar;
mod lex;
#[cfg(test)]
mod tests;

use crate::ast::Ast;
use crate::error::{PegfmtError, Result};
use crate::position::Source;

/// A cursor position saved by [`Parser::save_point`]. Restoring one rewinds
/// the parser exactly to where it was taken; committing is a no-op, since
/// the cursor has already advanced in place.
#[derive(Debug, Clone, Copy)]
pub struct SavePoint {
    pos: usize,
}

pub struct Parser<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Parser { source, pos: 0 }
    }

    pub fn save_point(&self) -> SavePoint {
        SavePoint { pos: self.pos }
    }

    pub fn rollback(&mut self, sp: SavePoint) {
        self.pos = sp.pos;
    }

    pub fn commit(&mut self, _sp: SavePoint) {}

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub(super) fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn error_at(&self, pos: usize, expected: impl Into<String>) -> PegfmtError {
        let found = self.source[pos..]
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "end of input".to_string());
        PegfmtError::parse(Source::new(self.source).position_at(pos), expected, found)
    }

    /// A parse error anchored at the current cursor position.
    pub(super) fn error_here(&self, expected: impl Into<String>) -> PegfmtError {
        self.error_at(self.pos, expected)
    }

    /// Skip whitespace, then consume and return the remainder of the
    /// current line (used by directives whose value is a bare string).
    pub(super) fn rest_of_line(&mut self) -> String {
        self.skip_space();
        let text = self.rest();
        let end = text.find('\n').unwrap_or(text.len());
        let line = text[..end].trim_end().to_string();
        self.pos += end;
        line
    }
}

/// Parse a full grammar document, returning the populated arena.
pub fn parse_grammar(source: &str) -> Result<Ast> {
    let mut ast = Ast::new();
    let mut p = Parser::new(source);
    grammar::parse_grammar(&mut p, &mut ast)?;
    p.skip_space();
    if !p.is_eof() {
        let pos = p.pos;
        return Err(p.error_at(pos, "end of input"));
    }
    Ok(ast)
}
