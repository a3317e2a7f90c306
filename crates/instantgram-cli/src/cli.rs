//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use instantgram::types::DEFAULT_BASE_URL;

use crate::commands::auth::AuthCommand;
use crate::commands::messages::MessagesCommand;
use crate::commands::posts::PostsCommand;
use crate::commands::profile::ProfileCommand;

/// Command-line client for the Instantgram backend.
#[derive(Parser, Debug)]
#[command(name = "instantgram")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "INSTANTGRAM_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Token file (defaults to the user data directory)
    #[arg(long, env = "INSTANTGRAM_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, register and inspect the session
    Auth(AuthCommand),

    /// Home feed, likes and comments
    Posts(PostsCommand),

    /// Chats and direct messages
    Messages(MessagesCommand),

    /// Profile pictures
    Profile(ProfileCommand),
}
