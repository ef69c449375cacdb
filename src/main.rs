use tracing_subscriber::EnvFilter;

mod actions;
mod cli;
mod commands;
mod error;
mod param_utils;

use cli::execute_command;
use commands::{create_cli_commands, PARAMETER_VERBOSE};

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let commands = create_cli_commands().get_matches();

    // Intialize the logging subsystem, RUST_LOG takes precedence over --verbose
    let default_level = if commands.get_flag(PARAMETER_VERBOSE) {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = execute_command(commands).await {
        let exit_code = e.exit_code();
        eprintln!("ERROR: {}", e);
        tracing::debug!("Exiting with code {} ({})", exit_code.code(), exit_code.message());
        ::std::process::exit(exit_code.code());
    }
}
