//! Logout command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, context: &Context) -> Result<()> {
    let had_session = context
        .vault()?
        .clear()
        .await
        .context("Failed to clear session")?;

    if had_session {
        output::success("Logged out");
    } else {
        output::success("No active session");
    }

    Ok(())
}
