//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use placekey::client::ClientError;
use placekey::codec::CodecError;
use placekey::config::ConfigError;
use placekey::spatial::SpatialError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Bad command-line input
    Input(String),
    /// Encoding or decoding failed
    Codec(CodecError),
    /// Spatial query failed
    Spatial(SpatialError),
    /// Resolution API failed
    Api(ClientError),
    /// Failed to read an input file
    FileRead { path: String, error: std::io::Error },
    /// Failed to write output
    Output(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) | CliError::Api(ClientError::Argument(_)) => {
                eprintln!();
                eprintln!("An API key is read from, in order:");
                eprintln!("  1. the --api-key option");
                eprintln!("  2. the PLACEKEY_API_KEY environment variable");
                eprintln!("  3. [api] key in ~/.placekey/config.ini");
            }
            CliError::Api(ClientError::RateLimitExceeded) => {
                eprintln!();
                eprintln!("The API kept rejecting requests for exceeding its rate limit.");
                eprintln!("Lower [rate_limit] in ~/.placekey/config.ini and try again.");
            }
            _ => {}
        }

        process::exit(match self {
            CliError::Input(_) => 2,
            _ => 1,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Input(msg) => write!(f, "{}", msg),
            CliError::Codec(e) => write!(f, "{}", e),
            CliError::Spatial(e) => write!(f, "{}", e),
            CliError::Api(e) => write!(f, "API request failed: {}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path, error)
            }
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Codec(e) => Some(e),
            CliError::Spatial(e) => Some(e),
            CliError::Api(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        CliError::Codec(e)
    }
}

impl From<SpatialError> for CliError {
    fn from(e: SpatialError) -> Self {
        CliError::Spatial(e)
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        CliError::Api(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e)
    }
}
