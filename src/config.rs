//! Typed configuration consumed by the optimizer and the formatter.
//!
//! The original tool reads these from a stringly-typed, process-wide
//! `Config::get<T>("key")` store. That key set is closed and known at
//! compile time, so this crate resolves it (see DESIGN.md) as a plain
//! struct with typed fields instead of carrying a `HashMap` lookup layer
//! into Rust: the same "closed set, pervasive matching" reasoning the
//! original author gives for making `Primary` a sum type applies here too.

/// Snapshot of the knobs the optimizer and the rule/alternation formatter
/// consult. Constructed once (by the CLI binary, from argv) and then only
/// read — never mutated — for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Alternative-count threshold above which a rule's alternation
    /// formats on multiple lines.
    pub wrap_limit: usize,
    /// Maximum reference-site count for which a non-terminal rule
    /// (alternation body) is eligible for inlining.
    pub inline_limit: usize,
    /// Same, for rules whose body is a single term.
    pub terminal_inline_limit: usize,
    pub no_concat: bool,
    pub no_char_class: bool,
    pub no_single_char: bool,
    pub no_inline: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            wrap_limit: 4,
            inline_limit: 1,
            terminal_inline_limit: 4,
            no_concat: false,
            no_char_class: false,
            no_single_char: false,
            no_inline: false,
        }
    }
}

impl OptimizerConfig {
    /// A config with every optimizer pass disabled, used by the
    /// "disabling all passes is a no-op" test in spec §8.
    pub fn all_disabled() -> Self {
        Self {
            no_concat: true,
            no_char_class: true,
            no_single_char: true,
            no_inline: true,
            ..Self::default()
        }
    }
}
