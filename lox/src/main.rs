use clap::Parser;
use lox_interpreter::{DEFAULT_MAX_CALL_DEPTH, InterpreterConfig, Session};
use miette::{IntoDiagnostic, MietteHandlerOpts, Result, WrapErr};
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process;

mod repl;

use repl::{ReplConfig, ReplSession};

#[derive(Parser)]
#[command(
    name = "lox",
    version,
    about = "Tree-walking interpreter for the Lox scripting language",
    long_about = "Runs a Lox script, or starts an interactive session when no script is given."
)]
struct Cli {
    /// Lox script to run; omit it to start the REPL
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Calls nested deeper than this fail with a stack overflow error
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Neither load nor save REPL history
    #[arg(long)]
    no_history: bool,
}

fn main() {
    setup_miette_handler();
    init_tracing();

    let cli = Cli::parse();
    let config = InterpreterConfig::default().with_max_call_depth(cli.max_call_depth);

    let result = match cli.script {
        Some(path) => run_file(&path, config),
        None => {
            let repl_config = ReplConfig {
                persist_history: !cli.no_history,
                ..Default::default()
            };
            ReplSession::with_config(repl_config, config)
                .run()
                .map_err(miette::Report::new)
        }
    };

    if let Err(error) = result {
        eprintln!("{error:?}");
        process::exit(1);
    }
}

/// Configure miette for error reporting with source snippets
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();
}

/// Log to stderr, filtered by `LOX_LOG` (default `warn`)
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_env("LOX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// Run a whole script as one program. Problems inside the script are
/// reported as diagnostics; only an unreadable file is an error here.
fn run_file(path: &Path, config: InterpreterConfig) -> Result<()> {
    let source = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not read script {}", path.display()))?;

    let mut session = Session::new(config);
    let report = session.run(&source, &path.display().to_string());

    report.diagnostics.print_diagnostics();
    tracing::debug!(
        summary = %report.diagnostics.summary(),
        executed = report.executed(),
        "script finished"
    );

    Ok(())
}
