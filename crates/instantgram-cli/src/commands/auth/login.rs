//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use instantgram::LoginCredentials;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "INSTANTGRAM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, session: &CliSession) -> Result<()> {
    let credentials = LoginCredentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let response = session
        .client()
        .auth()
        .sign_in(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &response.user.username);
    output::field("ID", response.user.id.as_str());
    output::field("Token file", &session.store().path().display().to_string());

    Ok(())
}
