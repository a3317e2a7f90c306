//! List messages command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use instantgram::types::ChatId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Chat ID
    pub chat_id: String,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,

    /// Mark the chat as read afterwards
    #[arg(long)]
    pub mark_read: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, session: &CliSession) -> Result<()> {
    let chat_id = ChatId::new(&args.chat_id).context("Invalid chat ID")?;
    let messages = session.client().messages();

    let page = messages
        .messages(&chat_id, args.page, args.size)
        .await
        .context("Failed to load messages")?;

    if args.json {
        output::json_pretty(&page)?;
    } else if page.content.is_empty() {
        output::hint("No messages.");
    } else {
        for message in &page.content {
            let marker = if message.is_read { " " } else { "•" };
            println!(
                "{} {} {}: {}",
                marker.cyan(),
                output::timestamp(&message.created_at).dimmed(),
                message.sender_name.bold(),
                message.content
            );
        }
        output::next_page(page.current_page, page.has_next());
    }

    if args.mark_read {
        messages
            .mark_read(&chat_id)
            .await
            .context("Failed to mark chat as read")?;
    }

    Ok(())
}
