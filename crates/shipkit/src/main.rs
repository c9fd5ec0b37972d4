//! shipkit: release notes generation and publication comparison.

mod cli;
mod commands;
mod tracing;

use crate::cli::{Cli, parse};
use crate::commands::{Command, CommandOutput};
use crate::tracing::TracingConfig;
use std::io::Write;
use std::process::ExitCode;

/// Exit code when a comparison finds differences.
const EXIT_DIFFERENCES: u8 = 2;

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|panic_info| {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "Application panicked: {panic_info}");
        let _ = writeln!(
            stderr,
            "Internal error occurred. Run with RUST_LOG=debug for more information."
        );
    }));

    match run() {
        Ok(output) => {
            print_output(&output.text);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_DIFFERENCES)
            }
        }
        Err(error) => {
            let _ = writeln!(std::io::stderr().lock(), "{error:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<CommandOutput> {
    let cli = parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: cli.log_filter.clone(),
    })?;

    execute(cli)
}

fn execute(cli: Cli) -> miette::Result<CommandOutput> {
    let command: Command = cli.command.into();
    let span = crate::command_span!(command.name());
    let _guard = span.enter();

    match command {
        Command::Notes { preview, options } => {
            commands::notes::execute(&cli.config, preview, &options)
        }
        Command::Compare {
            previous,
            current,
            previous_version,
            version,
            context,
        } => commands::compare::execute(&previous, &current, &previous_version, &version, context),
        Command::Diff { old, new, context } => commands::diff::execute(&old, &new, context),
    }
}

fn print_output(text: &str) {
    if text.is_empty() {
        return;
    }
    let _ = writeln!(std::io::stdout().lock(), "{text}");
}
