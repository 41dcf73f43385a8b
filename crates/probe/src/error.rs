//! CLI error types.

use probe_config::ConfigError;
use probe_describe::DescribeError;

use crate::manifest::ManifestError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Describe(#[from] DescribeError),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),
}
