//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use authwire_client::DEFAULT_REFRESH_PATH;

use crate::commands::Command;

/// Authenticated HTTP requests with transparent credential refresh.
#[derive(Parser, Debug)]
#[command(name = "authwire")]
#[command(author, version = env!("AUTHWIRE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, env = "AUTHWIRE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Path of the refresh endpoint, relative to the base URL
    #[arg(long, env = "AUTHWIRE_REFRESH_PATH", default_value = DEFAULT_REFRESH_PATH, global = true)]
    pub refresh_path: String,

    /// Credentials file (defaults to the platform data directory)
    #[arg(long, env = "AUTHWIRE_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Request and refresh timeout in seconds
    #[arg(long, env = "AUTHWIRE_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,
}
