//! Subcommand implementations.

mod login;
mod logout;
mod refresh;
mod request;
mod status;
mod version;

use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the credentials issued by a login
    Login(login::LoginArgs),

    /// Clear the stored session
    Logout(logout::LogoutArgs),

    /// Show what the credentials file holds
    Status(status::StatusArgs),

    /// Exchange the refresh token for a new credential pair
    Refresh(refresh::RefreshArgs),

    /// Perform an authenticated request
    Request(request::RequestArgs),

    /// Print version information
    Version,
}

pub async fn handle(command: Command, context: &Context) -> Result<()> {
    match command {
        Command::Login(args) => login::run(args, context).await,
        Command::Logout(args) => logout::run(args, context).await,
        Command::Status(args) => status::run(args, context).await,
        Command::Refresh(args) => refresh::run(args, context).await,
        Command::Request(args) => request::run(args, context).await,
        Command::Version => version::run(),
    }
}
