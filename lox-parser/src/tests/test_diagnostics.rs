use crate::{parse_program, DiagnosticCollector, Severity};
use pretty_assertions::assert_eq;

#[test]
fn test_collects_parse_errors_with_source() {
    let source = "print ;\nvar = 2;";
    let (_, errors) = parse_program(source);

    let mut collector = DiagnosticCollector::new("script.lox", source);
    collector.extend(errors);

    assert_eq!(collector.error_count(), 2);
    assert_eq!(collector.warning_count(), 0);
    assert!(collector.has_errors());
    assert_eq!(collector.source_name(), "script.lox");
    assert_eq!(
        collector.messages(),
        vec![
            "[line 1] Error at ';': Expect expression",
            "[line 2] Error at '=': Expect variable name",
        ]
    );
    assert!(collector
        .diagnostics()
        .iter()
        .all(|d| d.severity == Severity::Error));
}

#[test]
fn test_limit_drops_excess_diagnostics() {
    let (_, errors) = parse_program("print ; print ; print ;");
    assert_eq!(errors.len(), 3);

    let mut collector = DiagnosticCollector::with_limit("limited", "", 2);
    collector.extend(errors);

    assert_eq!(collector.total_count(), 2);
}

#[test]
fn test_summary_display() {
    let collector = DiagnosticCollector::new("empty", "");
    assert_eq!(collector.summary().to_string(), "No diagnostics");

    let (_, errors) = parse_program("print ;");
    let mut collector = DiagnosticCollector::new("one", "print ;");
    collector.extend(errors);
    assert_eq!(
        collector.summary().to_string(),
        "1 total (1 errors, 0 warnings, 0 info)"
    );
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Error > Severity::Warning);
    assert!(Severity::Warning > Severity::Info);
    assert_eq!(Severity::Warning.to_string(), "warning");
}
