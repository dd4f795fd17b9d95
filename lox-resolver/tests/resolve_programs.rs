// Parse-then-resolve over complete scripts

use lox_parser::{parse_program, Expr, Stmt};
use lox_resolver::*;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Vec<Stmt> {
    let (statements, errors) = parse_program(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    statements
}

#[test]
fn test_counter_program_resolves_cleanly() {
    let statements = parse(
        r#"
        fun makeCounter() {
          var i = 0;
          fun count() {
            i = i + 1;
            return i;
          }
          return count;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        "#,
    );

    let outcome = resolve(&statements);
    assert_eq!(outcome, ResolveOutcome::default());
}

#[test]
fn test_resolution_can_be_repeated() {
    let statements = parse("{ var a = 1; { print a; } }");

    for _ in 0..2 {
        assert!(!resolve(&statements).had_error());
    }

    let Stmt::Block(outer) = &statements[0] else {
        panic!("Expected block");
    };
    let Stmt::Block(inner) = &outer[1] else {
        panic!("Expected inner block");
    };
    match &inner[0] {
        Stmt::Print(Expr::Variable(variable)) => assert_eq!(variable.resolution.depth(), Some(1)),
        other => panic!("Expected print, got: {other:?}"),
    }
}

#[test]
fn test_deep_block_nesting() {
    let depth = 1_000;
    let source = format!("{}var x = 1; print x;{}", "{".repeat(depth), "}".repeat(depth));
    let statements = parse(&source);

    let outcome = resolve(&statements);
    assert!(!outcome.had_error());
}

#[test]
fn test_errors_are_diagnostics() {
    use miette::Diagnostic;

    let statements = parse("return;");
    let error = resolve(&statements).error.expect("top-level return must fail");

    assert_eq!(
        error.code().map(|code| code.to_string()),
        Some("lox::resolve::top_level_return".to_string())
    );
}
