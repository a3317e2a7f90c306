//! Auth subcommand implementations.

mod login;
mod logout;
mod register;
mod validate;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in and store the issued tokens
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored tokens
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Check the stored access token with the backend
    Validate(validate::ValidateArgs),
}

pub async fn handle(cmd: AuthCommand, session: &CliSession) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, session).await,
        AuthSubcommand::Register(args) => register::run(args, session).await,
        AuthSubcommand::Logout(args) => logout::run(args, session),
        AuthSubcommand::Whoami(args) => whoami::run(args, session).await,
        AuthSubcommand::Validate(args) => validate::run(args, session).await,
    }
}
