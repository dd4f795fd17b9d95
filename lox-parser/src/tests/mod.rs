mod test_diagnostics;
mod test_syntax_errors;
