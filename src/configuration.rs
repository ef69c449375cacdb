use crate::format::{FormattingError, OutputFormat, OutputFormatter};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "qbank";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const DEFAULT_API_ADDRESS: &str = "http://api2.qbank.se";
/// Request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Overrides the directory holding the configuration file
pub const CONFIG_DIR_ENV: &str = "QBANK_CONFIG_DIR";
/// Overrides the configured session hash
pub const SESSION_HASH_ENV: &str = "QBANK_SESSION_HASH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause:?}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause:?}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("invalid value {value:?} for property {name:?}")]
    InvalidPropertyValue { name: String, value: String },
    #[error("{cause:?}")]
    FormattingError {
        #[from]
        cause: FormattingError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_address: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qbank_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_hash: Option<String>,
}

impl Configuration {
    /// Address of the API server, the public QBank server unless configured
    pub fn api_address(&self) -> String {
        self.api_address
            .as_ref()
            .map(Url::to_string)
            .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
    }

    pub fn qbank_address(&self) -> Option<&str> {
        self.qbank_address.as_deref()
    }

    pub fn timeout(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn session_hash(&self) -> Option<&str> {
        self.session_hash.as_deref()
    }

    pub fn set_api_address(&mut self, address: &str) -> Result<(), ConfigurationError> {
        let url = Url::parse(address).map_err(|_| ConfigurationError::InvalidPropertyValue {
            name: "api-address".to_string(),
            value: address.to_string(),
        })?;
        self.api_address = Some(url);
        Ok(())
    }

    pub fn set_qbank_address(&mut self, address: &str) {
        self.qbank_address = Some(address.to_string());
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = Some(timeout);
    }

    pub fn set_session_hash(&mut self, hash: Option<String>) {
        self.session_hash = hash;
    }

    /// Apply overrides from the environment
    pub fn with_environment(mut self) -> Self {
        if let Ok(hash) = std::env::var(SESSION_HASH_ENV) {
            if !hash.is_empty() {
                debug!("Using session hash from {}", SESSION_HASH_ENV);
                self.session_hash = Some(hash);
            }
        }
        self
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut default_config_file_path) => {
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        debug!("Loading configuration from {}...", default_file_path.display());
        Configuration::load_from_file(&default_file_path)
    }

    /// Load the default configuration, creating it if none exists yet
    pub fn load_or_create_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        Configuration::load_or_create(&default_file_path)
    }

    pub fn load_or_create(path: &Path) -> Result<Configuration, ConfigurationError> {
        if path.exists() {
            return Configuration::load_from_file(path);
        }

        debug!(
            "Configuration file not found, creating default configuration at {}",
            path.display()
        );
        let default_config = Configuration::default();
        default_config.save(path)?;
        Ok(default_config)
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let configuration = fs::read_to_string(path)
            .map_err(|cause| ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            })?;
        serde_yaml::from_str(&configuration).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        // create the parent directory if it does not exist yet
        match path.parent() {
            Some(directory) => fs::create_dir_all(directory)
                .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?,
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(file)
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }
}

impl OutputFormatter for Configuration {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(self)?)
                } else {
                    Ok(serde_json::to_string(self)?)
                }
            }
            OutputFormat::Csv(options) => {
                let mut wtr = csv::Writer::from_writer(Vec::new());
                if options.with_headers {
                    wtr.write_record(["API_ADDRESS", "QBANK_ADDRESS", "TIMEOUT", "SESSION_HASH"])?;
                }
                wtr.write_record([
                    self.api_address(),
                    self.qbank_address().unwrap_or_default().to_string(),
                    self.timeout().to_string(),
                    self.session_hash().unwrap_or_default().to_string(),
                ])?;
                Ok(String::from_utf8(wtr.into_inner()?)?)
            }
            OutputFormat::Tree(_) => Err(FormattingError::UnsupportedOutputFormat(f.to_string())),
        }
    }
}
