use super::parse_ok;
use crate::{resolve, ResolveWarning};
use lox_parser::{DiagnosticCollector, Severity};
use pretty_assertions::assert_eq;

fn warning_names(source: &str) -> Vec<String> {
    let statements = parse_ok(source);
    let outcome = resolve(&statements);
    assert!(!outcome.had_error());
    outcome
        .warnings
        .iter()
        .map(|warning| warning.name().to_string())
        .collect()
}

#[test]
fn test_unused_local_is_warned() {
    assert_eq!(warning_names("{ var unused = 1; }"), vec!["unused"]);
}

#[test]
fn test_used_local_is_not_warned() {
    assert!(warning_names("{ var a = 1; print a; }").is_empty());
}

#[test]
fn test_assignment_counts_as_use() {
    assert!(warning_names("{ var a; a = 2; }").is_empty());
}

#[test]
fn test_globals_are_never_warned() {
    assert!(warning_names("var lonely = 1;").is_empty());
}

#[test]
fn test_warnings_follow_declaration_order() {
    assert_eq!(
        warning_names("{ var b = 1; var a = 2; var c = 3; print a; }"),
        vec!["b", "c"]
    );
}

#[test]
fn test_unused_parameter_is_warned() {
    assert_eq!(warning_names("fun f(x, y) { print x; }"), vec!["y"]);
}

#[test]
fn test_warning_text_and_severity() {
    let source = "{\n  var tmp = 1;\n}";
    let statements = parse_ok(source);
    let outcome = resolve(&statements);

    assert_eq!(
        outcome.warnings[0].to_string(),
        "[line 2] Warning: unused variable 'tmp'"
    );

    let mut collector = DiagnosticCollector::new("warn.lox", source);
    collector.extend(outcome.warnings);
    assert_eq!(collector.warning_count(), 1);
    assert!(!collector.has_errors());
    assert_eq!(collector.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn test_warning_variant() {
    let statements = parse_ok("{ var z; }");
    let outcome = resolve(&statements);

    assert!(matches!(
        outcome.warnings.as_slice(),
        [ResolveWarning::UnusedVariable { line: 1, .. }]
    ));
}

#[test]
fn test_read_from_closure_in_own_initializer_counts_as_use() {
    assert!(warning_names("{ var f = fun () { return f; }; }").is_empty());
}

#[test]
fn test_recursive_local_function_is_not_warned() {
    assert!(warning_names("{ fun count(n) { if (n > 0) count(n - 1); } }").is_empty());
}
