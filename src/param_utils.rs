use crate::{
    commands::params::{PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_PRETTY},
    error::CliError,
};
use clap::ArgMatches;
use qbank::{
    configuration::Configuration,
    folder_api::FolderApi,
    format::{OutputFormat, OutputFormatOptions},
    http_utils::{HttpClient, HttpRequestConfig},
};
use tracing::trace;

/// Resolve the output format and its options from the command's arguments
pub fn get_format_parameter_value(sub_matches: &ArgMatches) -> Result<OutputFormat, CliError> {
    trace!("Resolving output format options...");

    let format = sub_matches
        .get_one::<String>(PARAMETER_FORMAT)
        .ok_or_else(|| CliError::MissingRequiredArgument(PARAMETER_FORMAT.to_string()))?;
    let with_headers = flag(sub_matches, PARAMETER_HEADERS);
    let pretty = flag(sub_matches, PARAMETER_PRETTY);

    trace!("Format: {}", format);
    trace!("With headers: {}", with_headers);
    trace!("Pretty: {}", pretty);

    let options = OutputFormatOptions {
        with_headers,
        pretty,
    };
    Ok(OutputFormat::from_string_with_options(format, options)?)
}

// Not every command defines every formatting flag
fn flag(sub_matches: &ArgMatches, name: &str) -> bool {
    matches!(sub_matches.try_get_one::<bool>(name), Ok(Some(true)))
}

/// Create a folder API client from the saved configuration
pub fn get_folder_api() -> Result<FolderApi, CliError> {
    let configuration = Configuration::load_or_create_default()?.with_environment();
    let config = HttpRequestConfig::from_configuration(&configuration);
    trace!("Calling QBank at {}", config.function_url(""));
    Ok(FolderApi::new(HttpClient::new(config)?))
}
