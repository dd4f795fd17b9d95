mod test_warnings;

use lox_parser::{parse_program, Stmt};

/// Parse `source`, failing the test on any syntax error
pub(crate) fn parse_ok(source: &str) -> Vec<Stmt> {
    let (statements, errors) = parse_program(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    statements
}
