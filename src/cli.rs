//! Command-line interface for glasstask
//!
//! The binary takes connection parameters from a config file and runs
//! the terminal UI; there are no subcommands.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::ui;

/// GlassTask - a task list with federated sign-in and realtime sync.
#[derive(Parser, Debug)]
#[command(name = "glasstask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file (defaults to the platform config dir)
    #[arg(long, env = "GLASSTASK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Display name for the local development identity
    #[arg(long, env = "GLASSTASK_USER")]
    pub user: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut config = Config::load_or_default(self.config.as_deref());
        if let Some(user) = self.user.as_deref() {
            let user = user.trim();
            if !user.is_empty() {
                config.identity.display_name = user.to_string();
            }
        }
        ui::run(config)
    }
}
