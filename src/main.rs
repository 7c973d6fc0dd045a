mod cli;
mod clipboard;
mod error;
mod form;
mod git;
mod identity;
mod keygen;
mod paths;
mod report;
mod setup;
mod validation;
mod workspace;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Commands, SetupArgs},
    error::AppError,
    identity::IdentityRequest,
    paths::Environment,
    report::Tone,
    setup::{SetupOptions, SetupSummary},
};

// Main
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("{}", version_line());
            Ok(())
        }
        None => run_setup(&cli.setup),
    };

    if let Err(err) = result {
        eprintln!("{} {}", Tone::Error.paint("Error:"), err);
        std::process::exit(1);
    }
}

/// Output of the `version` subcommand
fn version_line() -> String {
    format!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Collects the form, runs every setup step and prints the outcome
fn run_setup(args: &SetupArgs) -> Result<(), AppError> {
    let request: IdentityRequest = form::collect_request(args)?;
    let env: Environment = Environment::detect()?;
    let options = SetupOptions {
        copy_to_clipboard: !args.no_clipboard,
    };

    let summary: SetupSummary = setup::run(&request, &env, options)?;

    if args.json {
        println!("{}", report::summary_json(&summary)?);
    } else {
        report::print_summary(&summary);
    }
    Ok(())
}

/// Logs to stderr at `warn`, raised by each `-v`; `RUST_LOG` takes precedence
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line_names_program_and_version() {
        assert_eq!(version_line(), format!("gitscope version {}", env!("CARGO_PKG_VERSION")));
    }
}
