//! CLI error types.

use elem::ElemError;
use elem_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Elem(#[from] ElemError),

    #[error("{0}")]
    Validation(String),
}
