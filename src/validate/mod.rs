//! Validation back-end: hand the formatted grammar to an external PackCC
//! binary and compare size statistics before and after.
//!
//! Grounded in `examples/original_source/checker.cc`'s `Checker`: a scratch
//! directory scoped to construction/destruction, a call into PackCC, and a
//! byte/line stats comparison. Two deliberate departures from the original,
//! both called out as Open Questions in spec.md §9:
//!
//! - `Checker::call_packcc`'s stderr-pipe dance (`dup2` + a fixed 10 KB
//!   `read`) is replaced by `std::process::Command::output()`, which drains
//!   both pipes to completion instead of truncating at a fixed buffer size.
//! - PackCC is exec'd as an external binary rather than linked through its
//!   `create_context`/`parse`/`generate`/`destroy_context` C entry points,
//!   since binding to that ABI would require `unsafe` FFI this formatter has
//!   no other reason to carry.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

use crate::ast::{Ast, NodeKind};
use crate::error::{PegfmtError, Result};

/// Byte/line/rule/term counts for one side of a before/after comparison.
/// Rule and term counts are only meaningful for the formatted `.peg` side —
/// counting them in PackCC's generated C output would require parsing C, so
/// spec.md §4.4's "computed on both input and generated C source" narrows
/// for the generated side to the counts that are free to obtain (byte/line).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrammarStats {
    pub bytes: usize,
    pub lines: usize,
    pub rule_count: Option<usize>,
    pub term_count: Option<usize>,
}

impl GrammarStats {
    fn of_text(text: &str) -> Self {
        GrammarStats {
            bytes: text.len(),
            lines: text.lines().count(),
            rule_count: None,
            term_count: None,
        }
    }

    fn of_grammar(text: &str, ast: &Ast) -> Self {
        let rule_count = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::Rule(_))).len();
        let term_count = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::Term(_))).len();
        GrammarStats {
            rule_count: Some(rule_count),
            term_count: Some(term_count),
            ..Self::of_text(text)
        }
    }
}

/// Result of one successful `Validator::validate` call: PackCC accepted the
/// grammar, and here's how its input and output compare in size.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub input: GrammarStats,
    pub generated: GrammarStats,
    pub stderr: String,
}

/// Options forwarded to PackCC, mirroring `examples/original_source/checker.cc`'s
/// `options_t` (`ascii`, `lines`, `debug`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PackCcOptions {
    pub ascii: bool,
    pub lines: bool,
    pub debug: bool,
}

/// Owns a scratch directory for one validation run; the directory (and
/// everything written into it) is removed when this value is dropped,
/// including on an error unwind — spec.md §5's "acquired on construction,
/// released unconditionally on destruction."
pub struct Validator {
    scratch: TempDir,
    packcc_path: PathBuf,
}

impl Validator {
    /// Create a validator with its own scratch directory, invoking `packcc`
    /// (or whatever `packcc_path` points to) found on `PATH` by default.
    pub fn new() -> Result<Self> {
        Self::with_packcc(PathBuf::from("packcc"))
    }

    pub fn with_packcc(packcc_path: PathBuf) -> Result<Self> {
        let scratch = TempDir::new()?;
        Ok(Validator { scratch, packcc_path })
    }

    /// Write `formatted` to the scratch directory, run PackCC over it, and
    /// compare the result against `ast`'s own rule/term counts. Returns
    /// `Err(PegfmtError::Validation)` when PackCC rejects the grammar —
    /// per spec.md §7, this is reported to the caller but must never block
    /// the formatted output from being written.
    pub fn validate(&self, formatted: &str, ast: &Ast, opts: PackCcOptions) -> Result<ValidationReport> {
        let input_path = self.scratch.path().join("input.peg");
        let output_base = self.scratch.path().join("output");
        std::fs::write(&input_path, formatted)?;

        let mut cmd = Command::new(&self.packcc_path);
        cmd.arg(&input_path).arg("-o").arg(&output_base);
        if opts.ascii {
            cmd.arg("-a");
        }
        if opts.lines {
            cmd.arg("-l");
        }
        if opts.debug {
            cmd.arg("-d");
        }

        tracing::debug!(?cmd, "invoking packcc");
        let output = cmd.output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(PegfmtError::Validation { stderr });
        }

        let generated_text = std::fs::read_to_string(output_base.with_extension("c"))?;

        Ok(ValidationReport {
            input: GrammarStats::of_grammar(formatted, ast),
            generated: GrammarStats::of_text(&generated_text),
            stderr,
        })
    }
}
