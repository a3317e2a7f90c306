//! Mark-read command implementation.

use anyhow::{Context, Result};
use clap::Args;
use instantgram::types::ChatId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Chat ID
    pub chat_id: String,
}

pub async fn run(args: ReadArgs, session: &CliSession) -> Result<()> {
    let chat_id = ChatId::new(&args.chat_id).context("Invalid chat ID")?;

    session
        .client()
        .messages()
        .mark_read(&chat_id)
        .await
        .context("Failed to mark chat as read")?;

    output::success(&format!("Marked {} as read", chat_id));
    Ok(())
}
