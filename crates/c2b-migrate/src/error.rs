//! Error type for migration runs.

use std::path::PathBuf;

/// Error aborting a migration run.
///
/// Everything else that can go wrong during a run is recorded in the
/// report and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}
