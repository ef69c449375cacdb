//! Output formatting for the QBank client.
//!
//! Folder listings and trees can be rendered as JSON, CSV or an ASCII tree.
//! Types opt in by implementing [`OutputFormatter`] and, for tabular data,
//! [`CsvRecordProducer`].

use csv::Writer;
use std::str::FromStr;
use strum::EnumIter;

pub const JSON: &str = "json";
pub const CSV: &str = "csv";
pub const TREE: &str = "tree";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// General error when formatting fails
    #[error("failed to format output due to: {cause:?}")]
    FormatFailure {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),

    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd, EnumIter)]
pub enum OutputFormat {
    Csv(OutputFormatOptions),
    Json(OutputFormatOptions),
    /// Indented tree, only meaningful for hierarchical data
    Tree(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![JSON, CSV, TREE]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        let normalized_format = format_str.to_lowercase();
        match normalized_format.as_str() {
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            TREE => Ok(OutputFormat::Tree(options)),
            _ => Err(FormattingError::UnsupportedOutputFormat(normalized_format)),
        }
    }

    pub fn options(&self) -> &OutputFormatOptions {
        match self {
            OutputFormat::Csv(options) | OutputFormat::Json(options) | OutputFormat::Tree(options) => {
                options
            }
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Tree(_) => write!(f, "{}", TREE),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

/// Trait for formatting data in different output formats
pub trait OutputFormatter {
    /// Format the data according to the specified output format
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError>;
}

/// Trait for producing CSV records from data
pub trait CsvRecordProducer {
    /// Returns the header row for the CSV output
    fn csv_header() -> Vec<String>;

    /// Converts the data into CSV records
    fn as_csv_records(&self) -> Vec<Vec<String>>;

    /// Produces CSV output with or without a header row
    fn to_csv(&self, with_header: bool) -> Result<String, FormattingError> {
        let mut wtr = Writer::from_writer(Vec::new());
        if with_header {
            wtr.write_record(Self::csv_header())?;
        }
        for record in self.as_csv_records() {
            wtr.write_record(&record)?;
        }
        wtr.flush()
            .map_err(|e| FormattingError::FormatFailure { cause: Box::new(e) })?;
        let bytes = wtr.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }
}
