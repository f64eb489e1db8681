//! `c2b clear` command implementation.

use c2b_migrate::{ClearReport, clear};
use clap::Args;

use super::{ConnectionArgs, connect};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clear command.
#[derive(Args)]
pub(crate) struct ClearArgs {
    /// Confirm deletion of all shelves and books.
    #[arg(long)]
    pub(crate) yes: bool,

    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
}

impl ClearArgs {
    /// Execute the clear command.
    ///
    /// # Errors
    ///
    /// Returns an error if `--yes` is missing, configuration is invalid or
    /// the connection check fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if !self.yes {
            output.warning("This deletes every shelf and book in BookStack.");
            output.info("Re-run with --yes to confirm.");
            return Err(CliError::Validation(
                "refusing to clear without --yes".to_owned(),
            ));
        }

        let config = self.connection.load_config(&self.connection.cli_settings())?;
        let client = connect(&config, &output)?;
        let report = clear(&client);
        print_report(&output, &report);
        Ok(())
    }
}

fn print_report(output: &Output, report: &ClearReport) {
    output.separator();
    output.highlight("Clear report");
    output.info(&format!("Shelves deleted: {}", report.shelves));
    output.info(&format!("Books deleted: {}", report.books));

    if report.errors.is_empty() {
        output.success("\nDestination cleared.");
    } else {
        output.warning(&format!("\nErrors encountered: {}", report.errors.len()));
        for record in &report.errors {
            output.detail(&format!("  - {record}"));
        }
    }
}
