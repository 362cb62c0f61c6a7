//! Error types for portsift.
//!
//! Uses `thiserror` for ergonomic error definitions. Probes never fail, so
//! everything here belongs to the layers around the engine: settings and
//! command-line input.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{PortError, TargetError};

/// Errors raised while locating or reading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced to the user by the command-line layer.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for command-line operations.
pub type CliResult<T> = Result<T, CliError>;
