//! Folder command definitions.

use crate::commands::params::{
    depth_parameter, folder_id_parameter, format_parameter, format_pretty_parameter,
    format_with_headers_parameter, name_parameter, object_id_parameter,
    parent_folder_id_parameter, properties_parameter, recursive_parameter,
    root_folder_id_parameter, COMMAND_ADD_OBJECT, COMMAND_CREATE, COMMAND_DELETE, COMMAND_FOLDER,
    COMMAND_GET, COMMAND_LIST, COMMAND_REMOVE_OBJECT, COMMAND_RENAME, COMMAND_TREE,
};
use clap::Command;

/// Create the folder command with all its subcommands.
pub fn folder_command() -> Command {
    Command::new(COMMAND_FOLDER)
        .about("Manage folders")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List folders with their paths")
                .visible_alias("ls")
                .arg(root_folder_id_parameter())
                .arg(depth_parameter())
                .arg(format_with_headers_parameter())
                .arg(format_pretty_parameter())
                .arg(format_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_TREE)
                .about("Show the folder hierarchy")
                .arg(root_folder_id_parameter())
                .arg(depth_parameter())
                .arg(format_with_headers_parameter())
                .arg(format_pretty_parameter())
                .arg(format_parameter().default_value("tree")),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get folder details")
                .arg(folder_id_parameter())
                .arg(recursive_parameter())
                .arg(properties_parameter())
                .arg(format_with_headers_parameter())
                .arg(format_pretty_parameter())
                .arg(format_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a new folder")
                .arg(name_parameter())
                .arg(parent_folder_id_parameter())
                .arg(format_pretty_parameter())
                .arg(format_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_RENAME)
                .about("Rename a folder")
                .arg(folder_id_parameter())
                .arg(name_parameter().help("New folder name"))
                .arg(format_pretty_parameter())
                .arg(format_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a folder")
                .visible_alias("rm")
                .arg(folder_id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_ADD_OBJECT)
                .about("Add an object to a folder")
                .arg(folder_id_parameter())
                .arg(object_id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_REMOVE_OBJECT)
                .about("Remove an object from a folder")
                .arg(folder_id_parameter())
                .arg(object_id_parameter()),
        )
}
