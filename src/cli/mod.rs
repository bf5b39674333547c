//! Command-line interface

pub mod share;
pub mod stats;
pub mod watch;

use clap::{Args, Parser, Subcommand};

use crate::settings::{Settings, SettingsError};

/// Exit codes for scripting against the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const FETCH_FAILURE: i32 = 3;
}

#[derive(Debug, Parser)]
#[command(
    name = "nutbar",
    version,
    about = "Nut-reaction usage stats, polled from the hub"
)]
pub struct Cli {
    /// Enable debug logging for this crate
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch and print stats for a user once
    Stats(stats::StatsArgs),
    /// Poll continuously and print every committed update
    Watch(watch::WatchArgs),
    /// Print the share-intent URL for this widget
    Share(share::ShareArgs),
}

/// Hub connection flags shared by subcommands, env-backed
#[derive(Debug, Clone, Args)]
pub struct HubArgs {
    /// Hub API base URL
    #[arg(long, env = "NUTBAR_BASE_URL")]
    pub base_url: Option<String>,

    /// Hub API key
    #[arg(long, env = "NUTBAR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Hub client identifier
    #[arg(long, env = "NUTBAR_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,
}

impl HubArgs {
    /// Load settings from disk and apply these overrides on top.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let mut settings = Settings::load()?;
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            settings.api_key = api_key.clone();
        }
        if let Some(client_id) = &self.client_id {
            settings.client_id = client_id.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}
