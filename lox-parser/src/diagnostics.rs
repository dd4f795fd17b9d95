// Lox Diagnostics
// Severity levels and a collector turning errors and warnings from every
// pipeline stage into miette reports against one named source

use miette::{Diagnostic, NamedSource, Report};
use std::fmt;

/// Severity level for diagnostic messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational message (lowest priority)
    Info,
    /// Warning message - code will run but may have issues
    Warning,
    /// Error message - code cannot be executed (or the statement was abandoned)
    Error,
}

impl Severity {
    fn of(diagnostic: &dyn Diagnostic) -> Self {
        match diagnostic.severity() {
            Some(miette::Severity::Advice) => Severity::Info,
            Some(miette::Severity::Warning) => Severity::Warning,
            Some(miette::Severity::Error) | None => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One collected diagnostic, already bound to its source text
#[derive(Debug)]
pub struct CollectedDiagnostic {
    pub severity: Severity,
    pub report: Report,
}

impl CollectedDiagnostic {
    /// Plain one-line message, without source snippet
    pub fn message(&self) -> String {
        self.report.to_string()
    }
}

/// Diagnostic collector that accumulates errors and warnings for one source buffer
#[derive(Debug)]
pub struct DiagnosticCollector {
    source_name: String,
    source: String,
    diagnostics: Vec<CollectedDiagnostic>,
    /// Maximum number of diagnostics to keep
    max_diagnostics: usize,
}

impl DiagnosticCollector {
    pub fn new(source_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_limit(source_name, source, 100)
    }

    pub fn with_limit(
        source_name: impl Into<String>,
        source: impl Into<String>,
        max_diagnostics: usize,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            source: source.into(),
            diagnostics: Vec::new(),
            max_diagnostics,
        }
    }

    /// Add a diagnostic to the collection
    pub fn add<D>(&mut self, diagnostic: D)
    where
        D: Diagnostic + Send + Sync + 'static,
    {
        if self.diagnostics.len() >= self.max_diagnostics {
            return;
        }

        let severity = Severity::of(&diagnostic);
        let named_source = NamedSource::new(&self.source_name, self.source.clone());
        let report = Report::new(diagnostic).with_source_code(named_source);
        self.diagnostics.push(CollectedDiagnostic { severity, report });
    }

    /// Add multiple diagnostics at once
    pub fn extend<D, I>(&mut self, diagnostics: I)
    where
        D: Diagnostic + Send + Sync + 'static,
        I: IntoIterator<Item = D>,
    {
        for diagnostic in diagnostics {
            self.add(diagnostic);
        }
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn diagnostics(&self) -> &[CollectedDiagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn total_count(&self) -> usize {
        self.diagnostics.len()
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// One-line messages of every diagnostic, in insertion order
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message()).collect()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Print all diagnostics to stderr with the installed miette handler
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{:?}", diagnostic.report);
        }
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.diagnostics.into_iter().map(|d| d.report).collect()
    }

    pub fn summary(&self) -> DiagnosticSummary {
        DiagnosticSummary {
            total: self.total_count(),
            errors: self.error_count(),
            warnings: self.warning_count(),
            info: self.info_count(),
        }
    }
}

/// Summary of diagnostic counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl fmt::Display for DiagnosticSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "No diagnostics")
        } else {
            write!(
                f,
                "{} total ({} errors, {} warnings, {} info)",
                self.total, self.errors, self.warnings, self.info
            )
        }
    }
}
