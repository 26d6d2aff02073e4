#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use unamdify::cli::args::CliArgs;
use unamdify::cli::config::resolve_options;
use unamdify::cli::driver;
use unamdify::cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FILE_FAILED: i32 = 1;
const EXIT_FATAL: i32 = 2;

fn main() {
    // Initialize tracing if UNAMDIFY_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports UNAMDIFY_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    unamdify::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(true) => std::process::exit(EXIT_FILE_FAILED),
        Ok(false) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("unamdify: {err:#}");
            std::process::exit(EXIT_FATAL);
        }
    }
}

/// Returns whether any input failed to transform.
fn run(args: &CliArgs) -> Result<bool> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let options = resolve_options(args, &cwd)?;

    let pretty = args
        .pretty
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    let reporter = Reporter::new(pretty);

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    let mut stderr = std::io::stderr();

    let summary = if options.files.is_empty() {
        driver::run_stdin(std::io::stdin().lock(), &mut stdout, &reporter, &mut stderr)?
    } else {
        driver::run(&options, &reporter, &mut stdout, &mut stderr)?
    };
    Ok(summary.has_failures())
}
