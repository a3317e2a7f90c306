//! New chat command implementation.

use anyhow::{Context, Result};
use clap::Args;
use instantgram::types::UserId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct NewChatArgs {
    /// ID of the user to chat with
    pub participant_id: String,
}

pub async fn run(args: NewChatArgs, session: &CliSession) -> Result<()> {
    let participant_id = UserId::new(&args.participant_id).context("Invalid user ID")?;

    let chat = session
        .client()
        .messages()
        .create_chat(&participant_id)
        .await
        .context("Failed to create chat")?;

    output::success("Chat created");
    output::field("Chat", chat.id.as_str());

    Ok(())
}
