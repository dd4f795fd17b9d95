use crate::{ast::*, parse_program, ParseError};
use pretty_assertions::assert_eq;

fn messages(errors: &[ParseError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_missing_expression() {
    let (_, errors) = parse_program("print ;");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at ';': Expect expression"]
    );
}

#[test]
fn test_missing_semicolon_at_end() {
    let (_, errors) = parse_program("print 1");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at end: Expect ';' after value"]
    );
}

#[test]
fn test_synchronization_reports_every_bad_statement() {
    let source = "var = 1;\nprint 2;\nvar y = ;\nprint 3;";
    let (statements, errors) = parse_program(source);

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line(), 1);
    assert_eq!(errors[1].line(), 3);
    assert_eq!(statements.len(), 2);
    assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
}

#[test]
fn test_synchronization_stops_before_statement_keyword() {
    let (statements, errors) = parse_program("1 + + print 5;");

    assert_eq!(errors.len(), 1);
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], Stmt::Print(_)));
}

#[test]
fn test_invalid_assignment_target_is_not_fatal() {
    let (statements, errors) = parse_program("1 + 2 = 3; print 4;");

    assert!(matches!(
        errors.as_slice(),
        [ParseError::InvalidAssignmentTarget { line: 1, .. }]
    ));
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at '=': Invalid assignment target"
    );
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_break_outside_loop() {
    let (_, errors) = parse_program("break;");
    assert!(matches!(errors.as_slice(), [ParseError::BreakOutsideLoop { .. }]));
}

#[test]
fn test_break_inside_function_inside_loop() {
    let (_, errors) = parse_program("while (true) { fun f() { break; } }");
    assert!(matches!(errors.as_slice(), [ParseError::BreakOutsideLoop { .. }]));
}

#[test]
fn test_named_anonymous_function() {
    let (_, errors) = parse_program("var f = fun named() {};");

    assert!(matches!(
        errors.first(),
        Some(ParseError::NamedAnonymousFunction { name, .. }) if name == "named"
    ));
}

#[test]
fn test_too_many_arguments_keeps_parsing() {
    let arguments = vec!["1"; 256].join(", ");
    let source = format!("f({arguments});");
    let (statements, errors) = parse_program(&source);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        ParseError::TooManyArguments {
            what: "arguments",
            limit: 255,
            ..
        }
    ));
    match &statements[0] {
        Stmt::Expression(Expr::Call(call)) => assert_eq!(call.arguments.len(), 256),
        other => panic!("Expected call, got: {other:?}"),
    }
}

#[test]
fn test_too_many_parameters() {
    let params: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
    let source = format!("fun f({}) {{}}", params.join(", "));
    let (statements, errors) = parse_program(&source);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        ParseError::TooManyArguments {
            what: "parameters",
            ..
        }
    ));
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_unterminated_string_is_lexical_error() {
    let (_, errors) = parse_program("print \"abc");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error: Unterminated string"]
    );
}

#[test]
fn test_malformed_number_is_lexical_error() {
    let (_, errors) = parse_program("print 1.;");

    assert!(matches!(
        errors.as_slice(),
        [ParseError::Lexical {
            reason: crate::LexErrorKind::MalformedNumber,
            ..
        }]
    ));
}

#[test]
fn test_missing_ternary_colon() {
    let (_, errors) = parse_program("print a ? 1;");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at ';': Expect ':' after then branch of conditional expression"]
    );
}

#[test]
fn test_error_lines_track_newlines() {
    let (_, errors) = parse_program("\n\n\nprint );");
    assert_eq!(errors[0].line(), 4);
}
