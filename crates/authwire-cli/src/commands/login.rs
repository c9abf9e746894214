//! Login command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use authwire_core::CredentialPair;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Access token issued by the API
    #[arg(long)]
    pub access: String,

    /// Refresh token issued alongside it
    #[arg(long)]
    pub refresh: String,

    /// Allow the session to be refreshed when the access token expires
    #[arg(long)]
    pub stay_signed_in: bool,
}

pub async fn run(args: LoginArgs, context: &Context) -> Result<()> {
    anyhow::ensure!(
        !args.access.is_empty() && !args.refresh.is_empty(),
        "Access and refresh tokens must not be empty"
    );

    let vault = context.vault()?;
    vault
        .start_session(
            &CredentialPair::new(args.access, args.refresh),
            args.stay_signed_in,
        )
        .await
        .context("Failed to save session")?;

    output::success("Session stored");
    output::field("Credentials", &context.credentials_path()?.display().to_string());
    output::flag("Stay signed in", args.stay_signed_in);

    Ok(())
}
