//! Round-trip laws from spec.md §8: re-parsing emitted output reproduces
//! the same AST modulo comment placement, and the fixed point is stable
//! under both idempotence and the all-passes-disabled no-op law. These
//! exercise the whole pipeline (`parse` -> `optimize` -> `emit_grammar`),
//! so they live at the crate root rather than under any one module.

use crate::config::OptimizerConfig;

const GRAMMARS: &[&str] = &[
    "Start <- \"a\" \"b\" / [x-z]+ EndOfFile\nEndOfFile <- !.\n",
    "# leading remark\nA <- (B C)* D # trailing remark\nB <- \"b\"\nC <- \"c\"\nD <- \"d\"\n",
    "%prefix \"demo\"\nStart <- x:Number \\1\nNumber <- [0-9]+\n%%\nint main(void) { return 0; }\n",
    "A <- \"x\" { action(); } $ { expand(); }\n",
];

#[test]
fn emitted_grammar_reparses_to_the_same_ast_modulo_comments() {
    for source in GRAMMARS {
        let original = crate::parse(source).expect("fixture should parse");
        let emitted = crate::ast::emit_grammar(&original, &OptimizerConfig::default());
        let reparsed = crate::parse(&emitted)
            .unwrap_or_else(|e| panic!("emitted output failed to reparse: {e}\n--- emitted ---\n{emitted}"));

        assert_eq!(
            original.dump(original.root()),
            reparsed.dump(reparsed.root()),
            "AST changed across an emit/reparse round trip for:\n{source}\n--- emitted ---\n{emitted}"
        );
    }
}

#[test]
fn optimizing_twice_reaches_a_stable_fixed_point() {
    for source in GRAMMARS {
        let mut ast = crate::parse(source).unwrap();
        crate::optimize(&mut ast, &OptimizerConfig::default());
        let once = ast.dump(ast.root());
        let report_twice = crate::optimize(&mut ast, &OptimizerConfig::default());
        assert_eq!(report_twice.total(), 0, "a stable grammar should need zero rewrites on a second pass");
        assert_eq!(ast.dump(ast.root()), once);
    }
}

#[test]
fn disabling_every_pass_is_a_no_op_on_every_fixture() {
    for source in GRAMMARS {
        let parsed = crate::parse(source).unwrap();
        let before = parsed.dump(parsed.root());

        let mut ast = crate::parse(source).unwrap();
        let report = crate::optimize(&mut ast, &OptimizerConfig::all_disabled());
        assert_eq!(report.total(), 0);
        assert_eq!(ast.dump(ast.root()), before);
    }
}

#[test]
fn format_source_round_trips_through_the_public_api() {
    let source = "A <- \"a\" \"b\"\nB <- [x]\n";
    let (formatted, report) = crate::format_source(source, &OptimizerConfig::default()).unwrap();
    assert!(report.total() >= 2, "expected at least the concat and single-char rewrites: {report:?}");
    assert!(formatted.contains("A <- \"ab\""));
    assert!(formatted.contains("B <- \"x\""));
}
