//! Validate command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ValidateArgs {}

pub async fn run(_args: ValidateArgs, session: &CliSession) -> Result<()> {
    session.require_login()?;

    let validation = session
        .client()
        .auth()
        .validate()
        .await
        .context("Failed to validate token")?;

    if !validation.valid {
        bail!("Stored access token is not valid");
    }

    output::success("Access token is valid");
    if let Some(username) = &validation.username {
        output::field("User", username);
    }
    if let Some(id) = &validation.id {
        output::field("ID", id.as_str());
    }

    Ok(())
}
