//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod clear;
pub(crate) mod migrate;

pub(crate) use check::CheckArgs;
pub(crate) use clear::ClearArgs;
pub(crate) use migrate::MigrateArgs;

use std::path::PathBuf;

use c2b_bookstack::{BookStackClient, ContentStoreExt};
use c2b_config::{CliSettings, Config};
use clap::Args;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Configuration and connection arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// Path to configuration file (default: auto-discover c2b.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// BookStack URL (overrides config).
    #[arg(long, env = "BOOKSTACK_URL")]
    pub(crate) url: Option<String>,

    /// BookStack API token id (overrides config).
    #[arg(long, env = "BOOKSTACK_TOKEN_ID")]
    pub(crate) token_id: Option<String>,

    /// BookStack API token secret (overrides config).
    #[arg(long, env = "BOOKSTACK_TOKEN_SECRET", hide_env_values = true)]
    pub(crate) token_secret: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConnectionArgs {
    /// Connection overrides as config CLI settings.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            base_url: self.url.clone(),
            token_id: self.token_id.clone(),
            token_secret: self.token_secret.clone(),
            ..Default::default()
        }
    }

    /// Load configuration with these overrides plus command-specific ones.
    pub(crate) fn load_config(&self, settings: &CliSettings) -> Result<Config, CliError> {
        let config = Config::load(self.config.as_deref(), Some(settings))?;
        if let Some(path) = &config.config_path {
            debug!("Loaded configuration from {}", path.display());
        }
        Ok(config)
    }
}

/// Create a BookStack client and verify the connection.
pub(crate) fn connect(config: &Config, output: &Output) -> Result<BookStackClient, CliError> {
    let bookstack = config.require_bookstack().inspect_err(|_| {
        output.error("Error: BookStack connection settings required");
        output.info("\nPass --url, --token-id and --token-secret, or add to c2b.toml:");
        output.info("\n[bookstack]");
        output.info(r#"base_url = "https://wiki.example.com""#);
        output.info(r#"token_id = "${BOOKSTACK_TOKEN_ID}""#);
        output.info(r#"token_secret = "${BOOKSTACK_TOKEN_SECRET}""#);
    })?;
    let client = BookStackClient::from_config(
        &bookstack.base_url,
        &bookstack.token_id,
        &bookstack.token_secret,
        bookstack.timeout_secs,
    );
    output.info(&format!("Connecting to {}...", client.base_url()));
    client.verify()?;
    Ok(client)
}
