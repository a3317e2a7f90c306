//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, session: &CliSession) -> Result<()> {
    session.require_login()?;

    let user = session
        .client()
        .auth()
        .info()
        .await
        .context("Failed to fetch profile")?;

    if args.json {
        return output::json_pretty(&user);
    }

    output::field("User", &user.username);
    output::field("ID", user.id.as_str());
    if !user.email.is_empty() {
        output::field("Email", &user.email);
    }
    let name = format!("{} {}", user.firstname, user.lastname);
    if !name.trim().is_empty() {
        output::field("Name", name.trim());
    }
    if !user.birth_date.is_empty() {
        output::field("Born", &user.birth_date);
    }

    Ok(())
}
