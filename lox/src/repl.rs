//! REPL (Read-Eval-Print Loop) for the Lox interpreter
//!
//! Every input runs through the same `Session`, so globals defined on one
//! line are visible on the next. Features:
//! - line editing and history with rustyline
//! - multi-line input while braces or parentheses are open
//! - slash commands for help, statistics and resetting the session

use lox_interpreter::{InterpreterConfig, RunReport, Session};
use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    #[diagnostic(help("Type /help for available commands"))]
    Command { message: String },
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            persist_history: true,
            history_file: Some(".lox_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    /// Number of inputs handed to the interpreter
    pub inputs_run: usize,

    /// Number of error diagnostics reported for those inputs
    pub errors_reported: usize,

    /// Total REPL commands executed
    pub commands_executed: usize,
}

/// Result of handling one input
#[derive(Debug)]
pub enum ReplResult {
    /// Source ran through the pipeline; output was already printed
    Ran(RunReport),

    /// Executed a REPL command
    Command { message: String },

    /// Empty line or comment
    Empty,

    /// Exit request
    Exit,
}

pub struct ReplSession {
    session: Session,
    config: ReplConfig,
    stats: ReplStats,
}

impl ReplSession {
    pub fn with_config(config: ReplConfig, interpreter_config: InterpreterConfig) -> Self {
        Self::with_session(config, Session::new(interpreter_config))
    }

    /// REPL over an existing session, e.g. one with captured output
    pub fn with_session(config: ReplConfig, session: Session) -> Self {
        Self {
            session,
            config,
            stats: ReplStats::default(),
        }
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        let mut editor = DefaultEditor::new()?;
        if let Some(history_file) = self.history_file() {
            // a missing file just means a first session
            if let Err(error) = editor.load_history(&history_file) {
                tracing::debug!(%error, %history_file, "no history loaded");
            }
        }

        self.print_welcome();

        while let Some(input) = self.read_input(&mut editor)? {
            match self.evaluate_line(&input) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => eprintln!("{:?}", miette::Report::new(error)),
            }
        }

        self.print_goodbye();

        if let Some(history_file) = self.history_file() {
            editor.save_history(&history_file)?;
        }
        Ok(())
    }

    fn history_file(&self) -> Option<String> {
        if self.config.persist_history {
            self.config.history_file.clone()
        } else {
            None
        }
    }

    /// Read one complete input, continuing over several lines while it is
    /// unbalanced. `None` means end of input.
    fn read_input(&self, editor: &mut DefaultEditor) -> Result<Option<String>, ReplError> {
        let mut input = String::new();

        loop {
            let prompt = if input.is_empty() {
                self.config.prompt.as_str()
            } else {
                "... "
            };

            match editor.readline(prompt) {
                Ok(line) => {
                    if input.is_empty() && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !input.is_empty() {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if is_input_complete(&input) {
                        editor.add_history_entry(input.as_str())?;
                        return Ok(Some(input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // cancel whatever was typed so far
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Handle one complete input
    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        if trimmed.is_empty() || (trimmed.starts_with("//") && !trimmed.contains('\n')) {
            return Ok(ReplResult::Empty);
        }

        if trimmed.starts_with('/') && !trimmed.starts_with("//") {
            return self.execute_command(trimmed);
        }

        let report = self.session.run(line, "<repl>");
        self.stats.inputs_run += 1;
        self.stats.errors_reported += report.diagnostics.error_count();

        Ok(ReplResult::Ran(report))
    }

    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let name = command.split_whitespace().next().unwrap_or(command);
        match name {
            "/help" | "/h" => Ok(ReplResult::Command {
                message: help_message().to_string(),
            }),

            "/clear" => {
                self.session.reset();
                Ok(ReplResult::Command {
                    message: "Globals cleared".to_string(),
                })
            }

            "/stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),

            "/quit" | "/q" | "/exit" => Ok(ReplResult::Exit),

            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}"),
            }),
        }
    }

    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Ran(report) => report.diagnostics.print_diagnostics(),
            ReplResult::Command { message } => println!("{message}"),
            ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn print_welcome(&self) {
        println!("Lox REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        println!();
    }

    fn print_goodbye(&self) {
        println!("Goodbye!");
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Inputs run: {}
  Errors reported: {}
  Commands executed: {}"#,
            self.stats.inputs_run, self.stats.errors_reported, self.stats.commands_executed
        )
    }

    #[cfg(test)]
    pub fn stats(&self) -> &ReplStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn help_message() -> &'static str {
    r#"Lox REPL Commands:
  /help, /h           Show this help message
  /clear              Forget all globals and start a fresh session
  /stats              Show session statistics
  /quit, /q, /exit    Exit the REPL

Examples:
  print 1 + 2;
  var greeting = "hi";
  fun add(a, b) { return a + b; }

Multi-line input:
  fun count(n) {        # an open brace or parenthesis
    print n;            # continues with a '...' prompt
  }                     # until it is closed again

Use Ctrl+C to cancel the current input, Ctrl+D to exit."#
}

/// Whether `input` has balanced braces and parentheses. Brackets inside
/// string literals and comments do not count. Strings never span lines, so
/// an unterminated one ends at the newline and is left for the parser to
/// report, as is a stray closer.
pub fn is_input_complete(input: &str) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_string {
            if ch == '"' || ch == '\n' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' | '(' => depth += 1,
            '}' | ')' => depth -= 1,
            '/' if chars.peek() == Some(&'/') => {
                // line comment
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    depth <= 0
}
