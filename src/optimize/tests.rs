//! The concrete optimizer scenarios from spec.md §8's table, plus the
//! boundary cases and laws spec.md §8 calls out by name.

use crate::ast::{self, NodeKind};
use crate::config::OptimizerConfig;

fn format_with(source: &str, cfg: &OptimizerConfig) -> String {
    let (formatted, _report) = crate::format_source(source, cfg).expect("grammar should optimize cleanly");
    formatted
}

fn rule_line(formatted: &str, name: &str) -> String {
    formatted
        .lines()
        .find(|l| l.starts_with(&format!("{name} <-")))
        .unwrap_or_else(|| panic!("no '{name} <-' line in:\n{formatted}"))
        .trim()
        .to_string()
}

#[test]
fn scenario_1_concat_strings() {
    let formatted = format_with("A <- \"a\" \"b\" \"c\"\n", &OptimizerConfig::default());
    assert_eq!(rule_line(&formatted, "A"), r#"A <- "abc""#);
}

#[test]
fn scenario_2_three_char_class_is_unchanged() {
    let formatted = format_with("A <- [abc]\n", &OptimizerConfig::default());
    assert_eq!(rule_line(&formatted, "A"), "A <- [abc]");
}

#[test]
fn scenario_3_single_char_class_becomes_a_string() {
    let formatted = format_with("A <- [a]\n", &OptimizerConfig::default());
    assert_eq!(rule_line(&formatted, "A"), r#"A <- "a""#);
}

#[test]
fn scenario_4_negated_single_char_class_becomes_negated_string() {
    let formatted = format_with("A <- [^x]\n", &OptimizerConfig::default());
    assert_eq!(rule_line(&formatted, "A"), r#"A <- !"x""#);
}

#[test]
fn scenario_5_terminal_rule_inlined_at_two_call_sites() {
    // B's body is a single Term, so it is governed by terminal-inline-limit
    // rather than inline-limit (spec.md §4.3.2 rule d).
    let cfg = OptimizerConfig { terminal_inline_limit: 2, ..OptimizerConfig::default() };
    let formatted = format_with("B <- \"x\"\nA <- B B\n", &cfg);
    assert_eq!(rule_line(&formatted, "A"), r#"A <- "x" "x""#);
    assert!(!formatted.contains("B <-"), "B should have been removed:\n{formatted}");
}

#[test]
fn scenario_6_unquantified_group_splices_into_enclosing_sequence() {
    // no_inline: isolate the group-removal pass, since B/C/D would
    // otherwise be eligible for inlining themselves under the defaults.
    let cfg = OptimizerConfig { no_inline: true, ..OptimizerConfig::default() };
    let formatted = format_with("A <- (B C) D\nB <- \"b\"\nC <- \"c\"\nD <- \"d\"\n", &cfg);
    assert_eq!(rule_line(&formatted, "A"), "A <- B C D");
}

#[test]
fn scenario_7_quantified_multi_term_group_is_left_alone() {
    let cfg = OptimizerConfig { no_inline: true, ..OptimizerConfig::default() };
    let formatted = format_with("A <- (B C)* D\nB <- \"b\"\nC <- \"c\"\nD <- \"d\"\n", &cfg);
    assert_eq!(rule_line(&formatted, "A"), "A <- (B C)* D");
}

#[test]
fn scenario_8_inverted_range_normalizes_to_a_to_c() {
    let formatted = format_with("A <- [c-a]\n", &OptimizerConfig::default());
    assert_eq!(rule_line(&formatted, "A"), "A <- [a-c]");
}

#[test]
fn wrap_limit_of_one_forces_multiline_for_two_alternatives() {
    let cfg = OptimizerConfig { wrap_limit: 1, ..OptimizerConfig::default() };
    let formatted = format_with("A <- \"a\" / \"b\"\n", &cfg);
    assert!(formatted.contains("A <- \"a\"\n    / \"b\""), "got:\n{formatted}");
}

#[test]
fn group_with_more_alternatives_than_wrap_limit_still_joins_on_one_line() {
    // Grounded in `ast.cc`'s `format_alternation`: only a Rule's own
    // alternation ever wraps multi-line; a Group/Capture's inner
    // alternation always joins with " / " regardless of its wrap_limit.
    let cfg = OptimizerConfig { wrap_limit: 1, no_inline: true, ..OptimizerConfig::default() };
    let formatted = format_with("A <- (W / X / Y)\nW <- \"w\"\nX <- \"x\"\nY <- \"y\"\n", &cfg);
    assert_eq!(rule_line(&formatted, "A"), "A <- (W / X / Y)");
}

#[test]
fn inline_limit_zero_disables_inlining_regardless_of_reference_count() {
    // terminal_inline_limit: 0 keeps C and D (referenced once each) from
    // being inlined into B first and collapsing it down to one term.
    let cfg = OptimizerConfig { inline_limit: 0, terminal_inline_limit: 0, ..OptimizerConfig::default() };
    let formatted = format_with("B <- C D\nC <- \"x\"\nD <- \"y\"\nA <- B\n", &cfg);
    assert!(formatted.contains("B <-"), "B should survive with inline-limit 0:\n{formatted}");
    assert!(formatted.contains("C <-"), "C should survive with terminal-inline-limit 0:\n{formatted}");
}

#[test]
fn self_referential_rule_referenced_once_elsewhere_is_not_inlined() {
    let formatted = format_with("B <- \"x\" B?\nA <- B\n", &OptimizerConfig::default());
    assert!(formatted.contains("B <-"), "directly recursive B must never be inlined:\n{formatted}");
}

#[test]
fn start_rule_is_never_inlined_even_if_referenced() {
    // spec.md §3.2: the first declared rule is the start rule and is never
    // removed regardless of reference count, however small.
    let cfg = OptimizerConfig { inline_limit: 10, terminal_inline_limit: 10, ..OptimizerConfig::default() };
    let formatted = format_with("Start <- \"x\"\nA <- Start\n", &cfg);
    assert!(formatted.contains("Start <-"), "start rule must survive:\n{formatted}");
}

#[test]
fn disabling_every_pass_leaves_the_ast_unchanged_from_post_parse() {
    let source = "A <- \"a\" \"b\" [x] [c-a]\n";
    let parsed = crate::parse(source).unwrap();
    let before = parsed.dump(parsed.root());

    let mut ast = crate::parse(source).unwrap();
    let report = crate::optimize(&mut ast, &OptimizerConfig::all_disabled());
    assert_eq!(report.total(), 0, "no pass should report a rewrite when all are disabled");
    assert_eq!(ast.dump(ast.root()), before);
}

#[test]
fn optimizing_twice_is_idempotent() {
    let source = "A <- \"a\" \"b\"\nB <- [c][d]\nC <- (A B)\n";
    let mut ast = crate::parse(source).unwrap();
    crate::optimize(&mut ast, &OptimizerConfig::default());
    let once = ast.dump(ast.root());
    crate::optimize(&mut ast, &OptimizerConfig::default());
    assert_eq!(ast.dump(ast.root()), once, "a second fixed-point run must be a no-op");
}

#[test]
fn every_invariant_holds_after_optimizing() {
    let source = "Start <- A+ / B*\nA <- \"a\" \"b\" [x]\nB <- (C D)\nC <- [z-x]\nD <- \"d\"\n";
    let mut ast = crate::parse(source).unwrap();
    crate::optimize(&mut ast, &OptimizerConfig::default());
    ast::check_invariants(&ast).unwrap_or_else(|(invariant, msg)| panic!("{invariant:?}: {msg}"));
}

#[test]
fn multi_term_group_splice_reparents_moved_terms_to_the_enclosing_sequence() {
    // spec.md §3.2's parent-link invariant, exercised directly on the
    // A <- (B C) D splice: B's and C's terms must end up parented under
    // A's own Sequence, not left pointing at the detached Group's Sequence.
    let source = "A <- (B C) D\nB <- \"b\"\nC <- \"c\"\nD <- \"d\"\n";
    let cfg = OptimizerConfig { no_inline: true, ..OptimizerConfig::default() };
    let mut ast = crate::parse(source).unwrap();
    crate::optimize(&mut ast, &cfg);
    ast::check_invariants(&ast).unwrap_or_else(|(invariant, msg)| panic!("{invariant:?}: {msg}"));

    let grammar = ast.grammar(ast.root()).unwrap();
    let rule_a = ast.rule(grammar.rules[0]).unwrap();
    let alt = ast.alternation(rule_a.body).unwrap();
    let seq_id = alt.sequences[0];
    let seq = ast.sequence(seq_id).unwrap();
    assert_eq!(seq.terms.len(), 3, "B C D should all be direct terms of A's sequence");
    for &term_id in &seq.terms {
        assert_eq!(ast.parent(term_id), Some(seq_id), "every spliced term must be reparented to the enclosing sequence");
    }
}

#[test]
fn character_class_normalization_merges_touching_and_overlapping_ranges() {
    let ast = {
        let mut a = crate::parse("A <- [a-cb-d]\n").unwrap();
        crate::optimize(&mut a, &OptimizerConfig::default());
        a
    };
    let cc_id = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::CharacterClass(_)))[0];
    let cc = ast.character_class(cc_id).unwrap();
    assert_eq!(cc.tokens.len(), 1);
    assert_eq!(cc.tokens[0].lo, 'a' as u32);
    assert_eq!(cc.tokens[0].hi, 'd' as u32);
}
