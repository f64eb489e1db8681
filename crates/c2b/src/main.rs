//! c2b CLI - Confluence export to BookStack migration.
//!
//! Provides commands for:
//! - `migrate`: Create BookStack content from a Confluence HTML export
//! - `clear`: Delete all shelves and books from BookStack
//! - `check`: Verify the BookStack connection

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ClearArgs, MigrateArgs};
use error::CliError;
use output::Output;

/// c2b - Confluence export to BookStack migration.
#[derive(Parser)]
#[command(name = "c2b", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a Confluence HTML export into BookStack.
    Migrate(MigrateArgs),
    /// Delete every shelf and book in BookStack.
    Clear(ClearArgs),
    /// Check the BookStack connection and credentials.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Migrate(args) => args.connection.verbose,
            Self::Clear(args) => args.connection.verbose,
            Self::Check(args) => args.connection.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Migrate(args) => args.execute(),
        Commands::Clear(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        if matches!(err, CliError::Migrate(_)) {
            output.error(&err.to_string());
        } else {
            output.error(&format!("Error: {err}"));
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from([
            "c2b",
            "migrate",
            "export",
            "--attachments",
            "--url",
            "https://wiki.example.com",
            "--verbose",
        ])
        .unwrap();
        let Commands::Migrate(args) = &cli.command else {
            panic!("expected migrate");
        };
        assert!(args.attachments);
        assert!(!args.dry_run);
        assert!(cli.command.verbose());
        assert_eq!(
            args.connection.url.as_deref(),
            Some("https://wiki.example.com")
        );
    }

    #[test]
    fn test_parse_clear_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["c2b", "clear"]).unwrap();
        assert!(matches!(&cli.command, Commands::Clear(args) if !args.yes));
    }
}
