use qbank::{
    configuration::ConfigurationError, exit_codes::QbankExitCode, folder_tree::FolderTreeError,
    format::FormattingError, http_utils::ApiError,
};
use thiserror::Error;

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Undefined or unsupported subcommand")]
    UnsupportedSubcommand(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    #[error("Folder {0} not found")]
    FolderNotFound(u32),
    /// The service refused to delete the folder
    #[error("Folder {0} was not deleted")]
    FolderNotDeleted(u32),
    #[error("Object {object_id} could not be {action} folder {folder_id}")]
    ObjectNotMoved {
        object_id: u32,
        folder_id: u32,
        action: &'static str,
    },
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> QbankExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) | CliError::MissingRequiredArgument(_) => {
                QbankExitCode::UsageError
            }
            CliError::ConfigurationError(_) => QbankExitCode::ConfigError,
            CliError::FormattingError(_) => QbankExitCode::DataError,
            CliError::FolderNotFound(_) => QbankExitCode::NotFound,
            CliError::FolderNotDeleted(_) | CliError::ObjectNotMoved { .. } => {
                QbankExitCode::ApiError
            }
            CliError::ApiError(e) => match e {
                ApiError::HttpError(_) => QbankExitCode::NetworkError,
                ApiError::Communication { .. } => QbankExitCode::ApiError,
                ApiError::JsonError(_)
                | ApiError::UnexpectedResponse(_)
                | ApiError::ModelError(_)
                | ApiError::FolderTreeError(_) => QbankExitCode::DataError,
            },
            CliError::IoError(_) => QbankExitCode::IoError,
        }
    }
}

impl From<FolderTreeError> for CliError {
    fn from(e: FolderTreeError) -> Self {
        CliError::ApiError(ApiError::FolderTreeError(e))
    }
}
