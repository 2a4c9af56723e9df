//! Grammar-parser acceptance tests (spec.md §4.1, §8's round-trip laws).

use crate::ast::NodeKind;

const BASIC: &str = include_str!("fixtures/basic.peg");
const MALFORMED: &str = include_str!("fixtures/malformed.peg");

#[test]
fn parses_a_well_formed_grammar() {
    let ast = crate::parse(BASIC).expect("basic.peg should parse");
    let grammar = ast.grammar(ast.root()).unwrap();
    let names: Vec<&str> = grammar
        .rules
        .iter()
        .filter_map(|&id| ast.rule(id))
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["Start", "Expr", "Term", "Factor", "Number", "AddOp", "MulOp", "EndOfFile"]);
    assert!(grammar.code.is_some(), "trailing %% block should attach as Code");
    assert_eq!(grammar.directives.len(), 1, "the %prefix directive should be captured");
}

#[test]
fn reports_a_parse_error_with_position_instead_of_panicking() {
    let err = crate::parse(MALFORMED).expect_err("malformed input should not parse");
    let message = err.to_string();
    assert!(message.contains("parse error at"), "got: {message}");
}

#[test]
fn rule_comment_attaches_to_the_rule_node() {
    let src = "# the entry point\nStart <- \"a\"\n";
    let ast = crate::parse(src).unwrap();
    let grammar = ast.grammar(ast.root()).unwrap();
    let rule_id = grammar.rules[0];
    assert_eq!(ast.comments(rule_id), &["the entry point".to_string()]);
}

#[test]
fn trailing_alternative_comment_attaches_to_the_alternation_as_a_post_comment() {
    let src = "Start <- \"a\" / \"b\" # fallback\n";
    let ast = crate::parse(src).unwrap();
    let grammar = ast.grammar(ast.root()).unwrap();
    let rule = ast.rule(grammar.rules[0]).unwrap();
    assert_eq!(ast.post_comment(rule.body), Some("fallback"));
}

#[test]
fn inverted_character_class_range_is_normalized_on_decode() {
    // spec.md §8 scenario 8: `[c-a]` is swapped to the `[a, c]` token at
    // parse time so later passes never see an inverted range.
    let ast = crate::parse("A <- [c-a]\n").unwrap();
    let cc_id = ast.find_all(|ast, id| matches!(ast.kind(id), NodeKind::CharacterClass(_)))[0];
    let cc = ast.character_class(cc_id).unwrap();
    assert_eq!(cc.tokens.len(), 1);
    assert_eq!(cc.tokens[0].lo, 'a' as u32);
    assert_eq!(cc.tokens[0].hi, 'c' as u32);
}

#[test]
fn bound_reference_and_backreference_parse() {
    let ast = crate::parse("A <- x:Number \\1\n").unwrap();
    let grammar = ast.grammar(ast.root()).unwrap();
    let rule = ast.rule(grammar.rules[0]).unwrap();
    let alt = ast.alternation(rule.body).unwrap();
    let seq = ast.sequence(alt.sequences[0]).unwrap();
    assert_eq!(seq.terms.len(), 2);
    let first_primary = ast.term(seq.terms[0]).unwrap().primary;
    match ast.kind(first_primary) {
        NodeKind::Reference(r) => {
            assert_eq!(r.name, "Number");
            assert_eq!(r.binding.as_deref(), Some("x"));
        }
        other => panic!("expected Reference, got {other:?}"),
    }
    let second_primary = ast.term(seq.terms[1]).unwrap().primary;
    assert!(matches!(ast.kind(second_primary), NodeKind::Backref(b) if b.index == 1));
}

#[test]
fn action_and_expand_code_blocks_parse() {
    let ast = crate::parse("A <- \"a\" { foo(); } $ { bar(); }\n").unwrap();
    let grammar = ast.grammar(ast.root()).unwrap();
    let rule = ast.rule(grammar.rules[0]).unwrap();
    let alt = ast.alternation(rule.body).unwrap();
    let seq = ast.sequence(alt.sequences[0]).unwrap();
    assert_eq!(seq.terms.len(), 3);
    assert!(matches!(
        ast.kind(ast.term(seq.terms[1]).unwrap().primary),
        NodeKind::Action(_)
    ));
    assert!(matches!(
        ast.kind(ast.term(seq.terms[2]).unwrap().primary),
        NodeKind::Expand(_)
    ));
}
