use crate::{
    actions::{config, folders},
    commands::{
        COMMAND_ADD_OBJECT, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE, COMMAND_FOLDER,
        COMMAND_GET, COMMAND_LIST, COMMAND_PATH, COMMAND_REMOVE_OBJECT, COMMAND_RENAME,
        COMMAND_SET, COMMAND_SHOW, COMMAND_TREE,
    },
    error::CliError,
};
use clap::ArgMatches;
use tracing::trace;

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

/// Run the command selected on the command line
pub async fn execute_command(commands: ArgMatches) -> Result<(), CliError> {
    match commands.subcommand() {
        // Folder
        Some((COMMAND_FOLDER, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => folders::list_folders(sub_matches).await,
            Some((COMMAND_TREE, sub_matches)) => folders::print_folder_tree(sub_matches).await,
            Some((COMMAND_GET, sub_matches)) => folders::print_folder_details(sub_matches).await,
            Some((COMMAND_CREATE, sub_matches)) => folders::create_folder(sub_matches).await,
            Some((COMMAND_RENAME, sub_matches)) => folders::rename_folder(sub_matches).await,
            Some((COMMAND_DELETE, sub_matches)) => folders::delete_folder(sub_matches).await,
            Some((COMMAND_ADD_OBJECT, sub_matches)) => {
                folders::add_object_to_folder(sub_matches).await
            }
            Some((COMMAND_REMOVE_OBJECT, sub_matches)) => {
                folders::remove_object_from_folder(sub_matches).await
            }
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Configuration
        Some((COMMAND_CONFIG, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_GET, sub_matches)) => match sub_matches.subcommand() {
                Some((COMMAND_PATH, _)) => config::print_configuration_path(),
                _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                    sub_matches,
                ))),
            },
            Some((COMMAND_SHOW, sub_matches)) => config::print_configuration(sub_matches),
            Some((COMMAND_SET, sub_matches)) => config::set_configuration(sub_matches),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        _ => {
            trace!("No command given");
            Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                &commands,
            )))
        }
    }
}
