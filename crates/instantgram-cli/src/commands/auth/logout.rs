//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, session: &CliSession) -> Result<()> {
    session
        .client()
        .auth()
        .logout()
        .context("Failed to remove stored tokens")?;

    output::success("Logged out");
    Ok(())
}
