//! Configuration command definitions.

use crate::commands::params::{
    api_address_parameter, format_parameter, format_pretty_parameter,
    format_with_headers_parameter, qbank_address_parameter, session_hash_parameter,
    timeout_parameter, COMMAND_CONFIG, COMMAND_GET, COMMAND_PATH, COMMAND_SET, COMMAND_SHOW,
};
use clap::Command;

/// Create the config command with all its subcommands.
pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Configuration management")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get configuration details")
                .subcommand_required(true)
                .subcommand(Command::new(COMMAND_PATH).about("Show configuration file path")),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the current configuration")
                .arg(format_with_headers_parameter())
                .arg(format_pretty_parameter())
                .arg(format_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SET)
                .about("Change configuration values")
                .arg(api_address_parameter())
                .arg(qbank_address_parameter())
                .arg(timeout_parameter())
                .arg(session_hash_parameter())
                .arg_required_else_help(true),
        )
}
