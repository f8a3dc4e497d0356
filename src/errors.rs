// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Everything in [`RunnerError`] is fatal for the invocation. Per-channel
//! delivery failures live in [`crate::deliver::DeliveryError`] and are never
//! converted into a `RunnerError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to run {command}")]
    LaunchError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write logs to {}: {message}", path.display())]
    PersistError { path: PathBuf, message: String },

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn launch_error_names_os_error_once_in_chain() {
        let err = RunnerError::LaunchError {
            command: "/opt/backup --all".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            rendered,
            "Failed to run /opt/backup --all: No such file or directory"
        );
    }

    #[test]
    fn io_error_detail_comes_from_source() {
        let err = RunnerError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(format!("{:#}", anyhow::Error::from(err)), "IO error: denied");
    }
}
