//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use instantgram::Registration;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "INSTANTGRAM_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Repeat the password; checked before anything is sent
    #[arg(long)]
    pub confirm_password: Option<String>,

    #[arg(long)]
    pub firstname: String,

    #[arg(long)]
    pub lastname: String,

    /// Birth date, e.g. 1990-04-21
    #[arg(long)]
    pub birth_date: String,
}

pub async fn run(args: RegisterArgs, session: &CliSession) -> Result<()> {
    let registration = Registration {
        username: args.username,
        email: args.email,
        password: args.password,
        firstname: args.firstname,
        lastname: args.lastname,
        birth_date: args.birth_date,
        confirm_password: args.confirm_password,
    };

    eprintln!("{}", "Creating account...".dimmed());

    let response = session
        .client()
        .auth()
        .sign_up(&registration)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    println!();
    output::field("User", &response.user.username);
    output::field("ID", response.user.id.as_str());

    Ok(())
}
