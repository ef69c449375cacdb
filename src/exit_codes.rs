//! Exit codes of the `qbank` command
//!
//! Distinct codes per failure class make the command easier to script.

/// Exit codes following the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QbankExitCode {
    Success = exitcode::OK as isize,

    /// Command line usage error (64)
    UsageError = exitcode::USAGE as isize,

    /// Data format error (65) - the service sent folder data that does not form a tree
    DataError = exitcode::DATAERR as isize,

    /// Addressee unknown (67) - folder not found
    NotFound = exitcode::NOUSER as isize,

    /// Internal software error (70)
    SoftwareError = exitcode::SOFTWARE as isize,

    /// Input/output error (74) - writing the output failed
    IoError = exitcode::IOERR as isize,

    /// Configuration error (78)
    ConfigError = exitcode::CONFIG as isize,

    /// Network error (101) - connection or HTTP failure
    NetworkError = 101,

    /// API error (102) - the service reported a failure
    ApiError = 102,
}

impl QbankExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            QbankExitCode::Success => "Success",
            QbankExitCode::UsageError => "Command line usage error",
            QbankExitCode::DataError => "Data format error",
            QbankExitCode::NotFound => "Resource not found",
            QbankExitCode::SoftwareError => "Internal software error",
            QbankExitCode::IoError => "Input/output error",
            QbankExitCode::ConfigError => "Configuration error",
            QbankExitCode::NetworkError => "Network communication error",
            QbankExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<QbankExitCode> for i32 {
    fn from(code: QbankExitCode) -> Self {
        code.code()
    }
}
