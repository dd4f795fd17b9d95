//! Functions, closures, recursion and natives

use super::{assert_prints, error_messages, run};
use crate::InterpreterConfig;
use crate::Session;

#[test]
fn test_call_with_arguments_and_return() {
    assert_prints(
        "fun add(a, b) { return a + b; } print add(1, 2);",
        &["3"],
    );
}

#[test]
fn test_missing_return_yields_nil() {
    assert_prints("fun noop() {} print noop();", &["nil"]);
    assert_prints("fun bare() { return; } print bare();", &["nil"]);
}

#[test]
fn test_recursion() {
    assert_prints(
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
         print fib(10);",
        &["55"],
    );
}

#[test]
fn test_closure_counter() {
    assert_prints(
        "fun makeCounter() {
           var i = 0;
           fun count() { i = i + 1; print i; }
           return count;
         }
         var counter = makeCounter();
         counter();
         counter();",
        &["1", "2"],
    );
}

#[test]
fn test_counters_do_not_share_state() {
    assert_prints(
        "fun makeCounter() {
           var i = 0;
           fun count() { i = i + 1; return i; }
           return count;
         }
         var a = makeCounter();
         var b = makeCounter();
         a(); a();
         print a();
         print b();",
        &["3", "1"],
    );
}

#[test]
fn test_closure_outlives_its_block() {
    assert_prints(
        r#"var saved;
           {
             var message = "kept";
             fun show() { print message; }
             saved = show;
           }
           saved();"#,
        &["kept"],
    );
}

#[test]
fn test_anonymous_functions() {
    assert_prints(
        "var twice = fun (f, x) { return f(f(x)); };
         print twice(fun (n) { return n * 3; }, 2);",
        &["18"],
    );
}

#[test]
fn test_functions_are_first_class() {
    assert_prints(
        "fun pick(first) {
           fun yes() { return \"yes\"; }
           fun no() { return \"no\"; }
           return first ? yes : no;
         }
         print pick(true)();
         print pick(false)();",
        &["yes", "no"],
    );
}

#[test]
fn test_arguments_evaluate_left_to_right() {
    assert_prints(
        "fun show(x) { print x; return x; }
         fun pair(a, b) {}
         pair(show(1), show(2));",
        &["1", "2"],
    );
}

#[test]
fn test_wrong_arity() {
    let (printed, report) = run("fun add(a, b) { return a + b; }\nadd(1);\nprint \"after\";");

    assert_eq!(printed, vec!["after"]);
    assert_eq!(report.runtime_errors, 1);
    assert_eq!(
        error_messages(&report),
        vec!["[line 2] Runtime error: Expected 2 arguments but got 1"]
    );
}

#[test]
fn test_clock_native() {
    assert_prints("print clock() > 0;", &["true"]);
    assert_prints("var t = clock(); print clock() >= t;", &["true"]);

    let (_, report) = run("clock(1);");
    assert_eq!(
        error_messages(&report),
        vec!["[line 1] Runtime error: Expected 0 arguments but got 1"]
    );
}

#[test]
fn test_unbounded_recursion_is_a_runtime_error() {
    let mut session = Session::buffered(InterpreterConfig::default().with_max_call_depth(64));
    let report = session.run("fun forever(n) { return forever(n + 1); }\nforever(0);\nprint \"survived\";", "deep.lox");

    assert_eq!(report.runtime_errors, 1);
    assert_eq!(
        error_messages(&report),
        vec!["[line 1] Runtime error: Stack overflow (max call depth: 64)"]
    );
    assert_eq!(session.printed(), Some(vec!["survived".to_string()]));
}

#[test]
fn test_recursion_within_the_limit_succeeds() {
    let mut session = Session::buffered(InterpreterConfig::default().with_max_call_depth(100));
    let report = session.run(
        "fun depth(n) { if (n == 0) return 0; return 1 + depth(n - 1); } print depth(99);",
        "depth.lox",
    );

    assert!(!report.had_errors());
    assert_eq!(session.printed(), Some(vec!["99".to_string()]));
}

#[test]
fn test_call_depth_recovers_after_overflow() {
    let mut session = Session::buffered(InterpreterConfig::default().with_max_call_depth(10));

    let report = session.run("fun forever() { forever(); } forever();", "overflow.lox");
    assert_eq!(report.runtime_errors, 1);

    let report = session.run(
        "fun depth(n) { if (n == 0) return 0; return 1 + depth(n - 1); } print depth(9);",
        "after.lox",
    );
    assert!(!report.had_errors());
    assert_eq!(session.printed(), Some(vec!["9".to_string()]));
}
