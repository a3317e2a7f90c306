//! Send message command implementation.

use anyhow::{Context, Result, ensure};
use clap::Args;
use instantgram::models::SendMessage;
use instantgram::types::ChatId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Chat ID
    pub chat_id: String,

    /// Message text
    pub content: String,
}

pub async fn run(args: SendArgs, session: &CliSession) -> Result<()> {
    let chat_id = ChatId::new(&args.chat_id).context("Invalid chat ID")?;
    let content = args.content.trim().to_string();
    ensure!(!content.is_empty(), "Message is empty");

    let message = session
        .client()
        .messages()
        .send(&SendMessage { chat_id, content })
        .await
        .context("Failed to send message")?;

    output::success("Message sent");
    output::field("ID", message.id.as_str());

    Ok(())
}
