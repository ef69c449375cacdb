//! Shared command parameters for all CLI commands.
//!
//! Parameter names and the argument definitions reused by several commands.

use clap::{Arg, ArgAction};
use qbank::format::OutputFormat;

// CRUD operations
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_RENAME: &str = "rename";
pub const COMMAND_DELETE: &str = "delete";

// Folder commands
pub const COMMAND_FOLDER: &str = "folder";
pub const COMMAND_TREE: &str = "tree";
pub const COMMAND_ADD_OBJECT: &str = "add-object";
pub const COMMAND_REMOVE_OBJECT: &str = "remove-object";

// Config commands
pub const COMMAND_CONFIG: &str = "config";
pub const COMMAND_SET: &str = "set";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_PATH: &str = "path";

// Parameter names
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_NAME: &str = "name";
pub const PARAMETER_FOLDER_ID: &str = "folder-id";
pub const PARAMETER_PARENT_FOLDER_ID: &str = "parent-folder-id";
pub const PARAMETER_OBJECT_ID: &str = "object-id";
pub const PARAMETER_DEPTH: &str = "depth";
pub const PARAMETER_PROPERTIES: &str = "properties";
pub const PARAMETER_RECURSIVE: &str = "recursive";
pub const PARAMETER_API_ADDRESS: &str = "api-address";
pub const PARAMETER_QBANK_ADDRESS: &str = "qbank-address";
pub const PARAMETER_TIMEOUT: &str = "timeout";
pub const PARAMETER_SESSION_HASH: &str = "session-hash";

/// Output format parameter, JSON unless given
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env("QBANK_FORMAT")
        .default_value("json")
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format the output pretty")
}

pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .env("QBANK_HEADERS")
        .help("Format the output with headers")
}

pub fn folder_id_parameter() -> Arg {
    Arg::new(PARAMETER_FOLDER_ID)
        .long(PARAMETER_FOLDER_ID)
        .num_args(1)
        .required(true)
        .help("Folder ID")
        .value_parser(clap::value_parser!(u32))
}

/// Folder to start listing at, the top of the folder structure if not given
pub fn root_folder_id_parameter() -> Arg {
    folder_id_parameter()
        .required(false)
        .help("Folder to start at (defaults to the top of the folder structure)")
}

pub fn parent_folder_id_parameter() -> Arg {
    Arg::new(PARAMETER_PARENT_FOLDER_ID)
        .long(PARAMETER_PARENT_FOLDER_ID)
        .num_args(1)
        .required(false)
        .help("Parent folder ID (defaults to the top of the folder structure)")
        .value_parser(clap::value_parser!(u32))
}

pub fn object_id_parameter() -> Arg {
    Arg::new(PARAMETER_OBJECT_ID)
        .long(PARAMETER_OBJECT_ID)
        .num_args(1)
        .required(true)
        .help("Object ID")
        .value_parser(clap::value_parser!(u32))
}

pub fn name_parameter() -> Arg {
    Arg::new(PARAMETER_NAME)
        .short('n')
        .long(PARAMETER_NAME)
        .num_args(1)
        .required(true)
        .help("Folder name")
}

pub fn depth_parameter() -> Arg {
    Arg::new(PARAMETER_DEPTH)
        .short('d')
        .long(PARAMETER_DEPTH)
        .num_args(1)
        .required(false)
        .help("Number of folder levels to fetch (defaults to all of them)")
        .value_parser(clap::value_parser!(u32).range(1..=23))
}

pub fn properties_parameter() -> Arg {
    Arg::new(PARAMETER_PROPERTIES)
        .long(PARAMETER_PROPERTIES)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Fetch folder properties too")
}

pub fn recursive_parameter() -> Arg {
    Arg::new(PARAMETER_RECURSIVE)
        .short('r')
        .long(PARAMETER_RECURSIVE)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Include all folders below the folder")
}

pub fn api_address_parameter() -> Arg {
    Arg::new(PARAMETER_API_ADDRESS)
        .long(PARAMETER_API_ADDRESS)
        .num_args(1)
        .required(false)
        .help("Address of the QBank API server")
}

pub fn qbank_address_parameter() -> Arg {
    Arg::new(PARAMETER_QBANK_ADDRESS)
        .long(PARAMETER_QBANK_ADDRESS)
        .num_args(1)
        .required(false)
        .help("Name of the QBank instance on the API server")
}

pub fn timeout_parameter() -> Arg {
    Arg::new(PARAMETER_TIMEOUT)
        .long(PARAMETER_TIMEOUT)
        .num_args(1)
        .required(false)
        .help("Request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
}

pub fn session_hash_parameter() -> Arg {
    Arg::new(PARAMETER_SESSION_HASH)
        .long(PARAMETER_SESSION_HASH)
        .num_args(1)
        .required(false)
        .help("Session hash sent with every call (an empty value removes it)")
}
