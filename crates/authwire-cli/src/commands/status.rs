//! Status command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatusArgs, context: &Context) -> Result<()> {
    let path = context.credentials_path()?;
    let stored = context
        .vault()?
        .snapshot()
        .await
        .context("Failed to read credentials")?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "credentials": path.display().to_string(),
                "access_token": stored.has_access_token,
                "refresh_token": stored.has_refresh_token,
                "stay_signed_in": stored.stay_signed_in,
            })
        );
        return Ok(());
    }

    output::field("Credentials", &path.display().to_string());
    output::flag("Access token", stored.has_access_token);
    output::flag("Refresh token", stored.has_refresh_token);
    output::flag("Stay signed in", stored.stay_signed_in);

    Ok(())
}
