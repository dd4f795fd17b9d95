//! Globals persist across runs of one session, as they do in the REPL

use super::{error_messages, session};

#[test]
fn test_globals_persist_between_runs() {
    let mut session = session();

    session.run("var a = 1;", "<repl>");
    session.run("fun bump() { a = a + 1; }", "<repl>");
    session.run("bump(); bump();", "<repl>");
    let report = session.run("print a;", "<repl>");

    assert!(!report.had_errors());
    assert_eq!(session.printed(), Some(vec!["3".to_string()]));
}

#[test]
fn test_redeclaring_a_global_from_earlier_input() {
    let mut session = session();

    session.run("var total = 10;", "<repl>");
    let report = session.run("var total = total + 5; print total;", "<repl>");

    assert!(report.executed());
    assert_eq!(session.printed(), Some(vec!["15".to_string()]));
}

#[test]
fn test_failed_input_does_not_poison_the_session() {
    let mut session = session();

    let report = session.run("print 1 +;", "<repl>");
    assert!(!report.executed());

    let report = session.run("1 / 0;", "<repl>");
    assert_eq!(report.runtime_errors, 1);

    session.assert_prints("print \"still here\";", &["still here"]).unwrap();
}

#[test]
fn test_static_error_leaves_earlier_globals_untouched() {
    let mut session = session();

    session.run("var kept = \"yes\";", "<repl>");
    let report = session.run("var kept = 2; { var dup; var dup; }", "<repl>");
    assert!(!report.executed());

    session.assert_prints("print kept;", &["yes"]).unwrap();
}

#[test]
fn test_reset_forgets_globals_but_keeps_natives() {
    let mut session = session();

    session.run("var gone = 1;", "<repl>");
    session.reset();

    let report = session.run("print gone;", "<repl>");
    assert_eq!(
        error_messages(&report),
        vec!["[line 1] Runtime error: Undefined variable 'gone'"]
    );
    assert!(session.interpreter().global("clock").is_some());
    assert!(session.interpreter().global("gone").is_none());
}

#[test]
fn test_global_names_include_natives_and_definitions() {
    let mut session = session();
    session.run("var answer = 42;", "<repl>");

    let mut names = session.interpreter().global_names();
    names.sort();
    assert_eq!(names, vec!["answer", "clock"]);
}
