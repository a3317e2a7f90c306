//! Profile subcommand implementations.

mod avatar;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Show or upload an avatar
    Avatar(avatar::AvatarArgs),
}

pub async fn handle(cmd: ProfileCommand, session: &CliSession) -> Result<()> {
    session.require_login()?;

    match cmd.command {
        ProfileSubcommand::Avatar(args) => avatar::run(args, session).await,
    }
}
