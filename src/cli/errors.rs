//! CLI-specific error types
//!
//! Every CLI error ends the process: main prints it and exits non-zero.

use std::io;

use thiserror::Error;

use crate::store::StoreError;

/// Stable error codes printed in front of every CLI error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Unreadable or invalid config file, bad flag value
    ConfigError,
    /// Writing to stdout failed
    IoError,
    /// Connecting to the service, creating the app or binding the listener failed
    BootFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ROWGATE_CLI_CONFIG_ERROR",
            Self::IoError => "ROWGATE_CLI_IO_ERROR",
            Self::BootFailed => "ROWGATE_CLI_BOOT_FAILED",
        }
    }
}

/// A fatal CLI error, displayed as `CODE: message`
#[derive(Debug, Error)]
#[error("{}: {}", .code.code(), .message)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// A backing-store call made during startup failed. `op` names the call
    /// the same way request-time store failures do (`app.Exists()`).
    pub fn store_failure(op: &str, err: StoreError) -> Self {
        Self::boot_failed(format!("error in {}: {}", op, err))
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Code string used in logs and on stderr
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

pub type CliResult<T> = Result<T, CliError>;
