//! CLI command definitions and argument parsing.
//!
//! Commands are defined with the clap builder API, one module per command group.

use clap::{Arg, ArgAction, Command};

pub mod config;
pub mod folder;
pub mod params;

pub use params::{
    COMMAND_ADD_OBJECT, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE, COMMAND_FOLDER,
    COMMAND_GET, COMMAND_LIST, COMMAND_PATH, COMMAND_REMOVE_OBJECT, COMMAND_RENAME, COMMAND_SET,
    COMMAND_SHOW, COMMAND_TREE, PARAMETER_VERBOSE,
};

/// Create the command line interface of the `qbank` command.
pub fn create_cli_commands() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(PARAMETER_VERBOSE)
                .short('v')
                .long(PARAMETER_VERBOSE)
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose output for debugging"),
        )
        .subcommand(folder::folder_command())
        .subcommand(config::config_command())
}
