//! instantgram - command-line client for the Instantgram backend.
//!
//! A thin wrapper over the `instantgram` library. Credentials are kept in a
//! token file between invocations and refreshed transparently.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use instantgram::{AuthEvent, LogoutReason};
use tokio::sync::broadcast;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, messages, posts, profile};
use session::CliSession;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let session = CliSession::open(&cli.api_url, cli.token_file)?;
    let mut events = session.client().subscribe();

    let result = match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &session).await,
        Commands::Posts(cmd) => posts::handle(cmd, &session).await,
        Commands::Messages(cmd) => messages::handle(cmd, &session).await,
        Commands::Profile(cmd) => profile::handle(cmd, &session).await,
    };

    if session_expired(&mut events) {
        output::error("Session expired. Run 'instantgram auth login' to sign in again.");
    }

    result
}

/// Whether the client dropped the stored credentials during this run.
fn session_expired(events: &mut broadcast::Receiver<AuthEvent>) -> bool {
    let mut expired = false;
    while let Ok(event) = events.try_recv() {
        if let AuthEvent::LoggedOut(LogoutReason::SessionExpired(_)) = event {
            expired = true;
        }
    }
    expired
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
