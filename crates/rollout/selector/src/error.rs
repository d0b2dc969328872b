//! Error types for the collaborators the selectors read from
//!
//! Selection itself never fails; these errors are logged and degrade the
//! cycle to doing less work.

use thiserror::Error;

/// Progress oracle errors
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Progress store unavailable: {0}")]
    Unavailable(String),

    #[error("Instance not tracked: {0}")]
    UnknownInstance(String),
}

/// Node metadata source errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Node metadata unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
