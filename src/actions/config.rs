use crate::{
    commands::params::{
        PARAMETER_API_ADDRESS, PARAMETER_QBANK_ADDRESS, PARAMETER_SESSION_HASH, PARAMETER_TIMEOUT,
    },
    error::CliError,
    param_utils::get_format_parameter_value,
};
use clap::ArgMatches;
use qbank::{configuration::Configuration, format::OutputFormatter};
use tracing::debug;

pub fn print_configuration_path() -> Result<(), CliError> {
    let path = Configuration::get_default_configuration_file_path()?;
    println!("{}", path.display());
    Ok(())
}

pub fn print_configuration(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let format = get_format_parameter_value(sub_matches)?;
    let configuration = Configuration::load_or_create_default()?;
    println!("{}", configuration.format(&format)?);
    Ok(())
}

pub fn set_configuration(sub_matches: &ArgMatches) -> Result<(), CliError> {
    let mut configuration = Configuration::load_or_create_default()?;

    if let Some(address) = sub_matches.get_one::<String>(PARAMETER_API_ADDRESS) {
        configuration.set_api_address(address)?;
    }
    if let Some(address) = sub_matches.get_one::<String>(PARAMETER_QBANK_ADDRESS) {
        configuration.set_qbank_address(address);
    }
    if let Some(timeout) = sub_matches.get_one::<u64>(PARAMETER_TIMEOUT) {
        configuration.set_timeout(*timeout);
    }
    if let Some(hash) = sub_matches.get_one::<String>(PARAMETER_SESSION_HASH) {
        configuration.set_session_hash(Some(hash.clone()).filter(|hash| !hash.is_empty()));
    }

    configuration.save_to_default()?;
    debug!("Configuration saved");
    Ok(())
}
