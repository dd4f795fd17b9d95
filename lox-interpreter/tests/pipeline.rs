//! End-to-end checks through the public API

use lox_interpreter::{
    Interpreter, InterpreterConfig, Output, OutputBuffer, Session, Value, parse_program, resolve,
};
use pretty_assertions::assert_eq;

const PROGRAM: &str = r#"
class Account {}

fun open(owner) {
  var account = Account();
  account.owner = owner;
  account.balance = 0;
  return account;
}

fun depositor(account) {
  return fun (amount) {
    account.balance = account.balance + amount;
    return account.balance;
  };
}

var acct = open("ada");
var deposit = depositor(acct);
for (var i = 1; i <= 4; i = i + 1) deposit(i * 10);
print acct.owner + " has " + acct.balance;
print acct.balance > 50 ? "rich" : "poor";
"#;

#[test]
fn test_program_through_session() {
    let mut session = Session::buffered(InterpreterConfig::default());
    let report = session.run(PROGRAM, "account.lox");

    assert!(report.executed());
    assert!(!report.had_errors(), "{:?}", report.diagnostics.messages());
    assert_eq!(
        session.printed(),
        Some(vec!["ada has 100".to_string(), "rich".to_string()])
    );
}

#[test]
fn test_manual_pipeline() {
    let (statements, errors) = parse_program("var x = 2; { var y = x * 21; x = y; }");
    assert!(errors.is_empty());

    let outcome = resolve(&statements);
    assert!(!outcome.had_error());
    assert!(outcome.warnings.is_empty());

    let buffer = OutputBuffer::new();
    let mut interpreter = Interpreter::with_output(InterpreterConfig::default(), Output::from(buffer.clone()));
    let runtime_errors = interpreter.interpret(&statements);

    assert!(runtime_errors.is_empty());
    assert_eq!(interpreter.global("x"), Some(Value::Number(42.0)));
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_runtime_error_reports_render_with_source() {
    let mut session = Session::buffered(InterpreterConfig::default());
    let report = session.run("print 1 / 0;", "div.lox");

    let reports = report.diagnostics.into_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].code().map(|code| code.to_string()),
        Some("lox::runtime::division_by_zero".to_string())
    );
}
