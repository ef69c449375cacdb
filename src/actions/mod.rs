//! Execution of the CLI commands.

pub mod config;
pub mod folders;
