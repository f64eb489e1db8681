//! `c2b check` command implementation.

use clap::Args;

use super::{ConnectionArgs, connect};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or BookStack rejects the
    /// request.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.connection.load_config(&self.connection.cli_settings())?;
        let client = connect(&config, &output)?;
        output.success(&format!("Connected to {}", client.base_url()));
        Ok(())
    }
}
