//! CLI error types.

use c2b_bookstack::BookStackError;
use c2b_config::ConfigError;
use c2b_migrate::MigrateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    BookStack(#[from] BookStackError),

    #[error("Migration interrupted: {0}")]
    Migrate(#[from] MigrateError),

    #[error("{0}")]
    Validation(String),
}
