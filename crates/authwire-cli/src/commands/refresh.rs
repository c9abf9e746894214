//! Refresh command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, context: &Context) -> Result<()> {
    let client = context.client()?;

    eprintln!("{}", "Refreshing session...".dimmed());

    client
        .refresh_now()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed");
    Ok(())
}
