//! debinfo - Command-line utility for inspecting Debian binary packages.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use output::Operation;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet, cli.human_readable);
    let config = cli.inspect_config();

    let (operation, result) = match &cli.command {
        cli::Commands::Show(args) => (
            Some(Operation::Show),
            commands::inspect::execute(args, Operation::Show, &config, &*formatter),
        ),
        cli::Commands::Control(args) => (
            Some(Operation::Control),
            commands::inspect::execute(args, Operation::Control, &config, &*formatter),
        ),
        cli::Commands::List(args) => (
            Some(Operation::List),
            commands::inspect::execute(args, Operation::List, &config, &*formatter),
        ),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            (None, Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(operation, &err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
