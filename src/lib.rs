//! `pegfmt` is a formatter and optimizer for PackCC-dialect PEG grammar
//! files (`.peg`).
//!
//! It parses a grammar into a typed, parent-linked AST ([`ast::Ast`]),
//! rewrites that tree to a semantic fixed point with five local,
//! semantics-preserving passes ([`optimize`]), and re-emits canonical
//! formatted source. [`validate::Validator`] can hand the result to an
//! external PackCC binary and compare size statistics before and after.
//!
//! # Example
//!
//! ```
//! use pegfmt::config::OptimizerConfig;
//!
//! let source = r#"
//! A <- "a" "b" "c"
//! "#;
//! let (formatted, report) = pegfmt::format_source(source, &OptimizerConfig::default()).unwrap();
//! assert!(formatted.contains("\"abc\""));
//! assert!(report.total() > 0);
//! ```

pub mod ast;
pub mod config;
pub mod error;
mod optimize;
mod parser;
pub mod position;
#[cfg(test)]
mod tests;
pub mod validate;

pub use error::{PegfmtError, Result};
pub use optimize::{optimize, OptimizationReport};
pub use parser::parse_grammar;

use ast::Ast;
use config::OptimizerConfig;

/// Parse `source`, optimize it to a fixed point under `cfg`, and emit
/// canonical formatted grammar text. This is the whole pipeline of spec.md
/// §2 short of the validator, which is opt-in (it shells out to an external
/// tool) and lives behind [`validate::Validator`].
pub fn format_source(source: &str, cfg: &OptimizerConfig) -> Result<(String, OptimizationReport)> {
    let mut ast = parse_and_check(source)?;
    let report = optimize::optimize(&mut ast, cfg);
    debug_check_invariants(&ast)?;
    let formatted = ast::emit_grammar(&ast, cfg);
    Ok((formatted, report))
}

/// Parse `source` into an AST without optimizing it, for callers (the CLI's
/// `--debug` dump, tests) that want to inspect the tree directly.
pub fn parse(source: &str) -> Result<Ast> {
    parse_and_check(source)
}

fn parse_and_check(source: &str) -> Result<Ast> {
    let ast = parser::parse_grammar(source)?;
    debug_check_invariants(&ast)?;
    Ok(ast)
}

/// In debug builds, halt the pipeline on an unmet structural invariant
/// (spec.md §7: "the parser and optimizer never silently swallow structural
/// inconsistencies — an unmet invariant halts"). Release builds skip the
/// walk: the invariant is supposed to hold by construction, and this is a
/// bug detector, not a safety net for malformed trees.
fn debug_check_invariants(ast: &Ast) -> Result<()> {
    #[cfg(debug_assertions)]
    if let Err((invariant, message)) = ast::check_invariants(ast) {
        return Err(PegfmtError::internal(format!("{invariant:?}: {message}")));
    }
    #[cfg(not(debug_assertions))]
    let _ = ast;
    Ok(())
}
