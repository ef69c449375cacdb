use crate::{
    commands::params::{
        PARAMETER_DEPTH, PARAMETER_FOLDER_ID, PARAMETER_NAME, PARAMETER_OBJECT_ID,
        PARAMETER_PARENT_FOLDER_ID, PARAMETER_PROPERTIES, PARAMETER_RECURSIVE,
    },
    error::CliError,
    param_utils::{get_folder_api, get_format_parameter_value},
};
use clap::ArgMatches;
use qbank::{
    folder_api::FolderApi,
    folder_tree::{build_tree, FolderForest, FolderNode},
    format::OutputFormatter,
    http_utils::ApiError,
};
use tracing::{debug, trace};

fn required_id(sub_matches: &ArgMatches, name: &str) -> Result<u32, CliError> {
    sub_matches
        .get_one::<u32>(name)
        .copied()
        .ok_or_else(|| CliError::MissingRequiredArgument(name.to_string()))
}

fn required_name(sub_matches: &ArgMatches) -> Result<String, CliError> {
    sub_matches
        .get_one::<String>(PARAMETER_NAME)
        .cloned()
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_NAME.to_string()))
}

async fn fetch_forest(api: &FolderApi, sub_matches: &ArgMatches) -> Result<FolderForest, CliError> {
    let root_folder_id = sub_matches.get_one::<u32>(PARAMETER_FOLDER_ID).copied();
    let depth = sub_matches.get_one::<u32>(PARAMETER_DEPTH).copied();

    let records = api.get_folder_records(root_folder_id, depth, false).await?;
    let forest = build_tree(records)?;
    debug!(
        "Built {} root folders holding {} folders",
        forest.roots().len(),
        forest.len()
    );
    Ok(forest)
}

/// Print every folder with its name path
pub async fn list_folders(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Listing folders...");

    let format = get_format_parameter_value(sub_matches)?;
    let api = get_folder_api()?;
    let forest = fetch_forest(&api, sub_matches).await?;

    println!("{}", forest.to_folder_list().format(&format)?);
    Ok(())
}

pub async fn print_folder_tree(sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Printing folder tree...");

    let format = get_format_parameter_value(sub_matches)?;
    let api = get_folder_api()?;
    let forest = fetch_forest(&api, sub_matches).await?;

    // tree output already ends with a newline
    println!("{}", forest.format(&format)?.trim_end());
    Ok(())
}

pub async fn print_folder_details(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let format = get_format_parameter_value(sub_matches)?;
    let folder_id = required_id(sub_matches, PARAMETER_FOLDER_ID)?;
    let recursive = sub_matches.get_flag(PARAMETER_RECURSIVE);
    let with_properties = sub_matches.get_flag(PARAMETER_PROPERTIES);
    let api = get_folder_api()?;

    let folder = if recursive {
        api.get_folder_with_subtree(folder_id, with_properties).await
    } else {
        api.get_folder(folder_id).await.map(FolderNode::new)
    };
    let folder = folder.map_err(|e| match e {
        ApiError::Communication { .. } => {
            debug!("Folder {} could not be fetched: {}", folder_id, e);
            CliError::FolderNotFound(folder_id)
        }
        e => CliError::ApiError(e),
    })?;

    println!("{}", FolderForest::from(folder).format(&format)?);
    Ok(())
}

pub async fn create_folder(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let format = get_format_parameter_value(sub_matches)?;
    let name = required_name(sub_matches)?;
    let parent_folder_id = sub_matches
        .get_one::<u32>(PARAMETER_PARENT_FOLDER_ID)
        .copied();

    trace!("Creating folder {:?} under {:?}...", name, parent_folder_id);
    let folder = get_folder_api()?
        .create_folder(&name, parent_folder_id)
        .await?;

    println!(
        "{}",
        FolderForest::from(FolderNode::new(folder)).format(&format)?
    );
    Ok(())
}

pub async fn rename_folder(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let format = get_format_parameter_value(sub_matches)?;
    let folder_id = required_id(sub_matches, PARAMETER_FOLDER_ID)?;
    let name = required_name(sub_matches)?;

    trace!("Renaming folder {} to {:?}...", folder_id, name);
    let folder = get_folder_api()?.rename_folder(folder_id, &name).await?;

    println!(
        "{}",
        FolderForest::from(FolderNode::new(folder)).format(&format)?
    );
    Ok(())
}

pub async fn delete_folder(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let folder_id = required_id(sub_matches, PARAMETER_FOLDER_ID)?;

    trace!("Deleting folder {}...", folder_id);
    if get_folder_api()?.delete_folder(folder_id).await? {
        Ok(())
    } else {
        Err(CliError::FolderNotDeleted(folder_id))
    }
}

pub async fn add_object_to_folder(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let folder_id = required_id(sub_matches, PARAMETER_FOLDER_ID)?;
    let object_id = required_id(sub_matches, PARAMETER_OBJECT_ID)?;

    if get_folder_api()?
        .add_object_to_folder(folder_id, object_id)
        .await?
    {
        Ok(())
    } else {
        Err(CliError::ObjectNotMoved {
            object_id,
            folder_id,
            action: "added to",
        })
    }
}

pub async fn remove_object_from_folder(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let folder_id = required_id(sub_matches, PARAMETER_FOLDER_ID)?;
    let object_id = required_id(sub_matches, PARAMETER_OBJECT_ID)?;

    if get_folder_api()?
        .remove_object_from_folder(folder_id, object_id)
        .await?
    {
        Ok(())
    } else {
        Err(CliError::ObjectNotMoved {
            object_id,
            folder_id,
            action: "removed from",
        })
    }
}
