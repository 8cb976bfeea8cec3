//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use velokiosk_core::CoreError;

/// Exit codes for the binary.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not load configuration from {path}")]
    #[diagnostic(
        code(velokiosk::config),
        help("Check the file syntax, or regenerate it with: velokiosk config init")
    )]
    Config {
        path: String,
        #[source]
        source: velokiosk_config::ConfigError,
    },

    #[error("Could not write configuration to {path}")]
    #[diagnostic(code(velokiosk::config_write))]
    ConfigWrite {
        path: String,
        #[source]
        source: velokiosk_config::ConfigError,
    },

    #[error(transparent)]
    #[diagnostic(code(velokiosk::core))]
    Core(#[from] CoreError),

    #[error("I/O error: {message}")]
    #[diagnostic(code(velokiosk::io))]
    Io { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } | CliError::ConfigWrite { .. } => exit_code::CONFIG,
            CliError::Core(_) | CliError::Io { .. } => exit_code::GENERAL,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}
