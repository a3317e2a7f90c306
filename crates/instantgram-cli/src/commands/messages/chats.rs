//! Chats command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ChatsArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ChatsArgs, session: &CliSession) -> Result<()> {
    let chats = session
        .client()
        .messages()
        .chats(args.page, args.size)
        .await
        .context("Failed to load chats")?;

    if args.json {
        return output::json_pretty(&chats);
    }

    if chats.content.is_empty() {
        output::hint("No chats yet. Start one with 'instantgram messages new-chat'.");
        return Ok(());
    }

    for chat in &chats.content {
        let names = chat
            .participants
            .iter()
            .map(|p| p.username.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let unread = if chat.unread_count > 0 {
            format!(" ({} unread)", chat.unread_count).yellow().to_string()
        } else {
            String::new()
        };

        println!("{} {}{}", chat.id.to_string().dimmed(), names.bold(), unread);
        if let Some(last) = &chat.last_message {
            println!("  {}: {}", last.sender_name, last.content);
        }
    }

    output::next_page(chats.current_page, chats.has_next());
    Ok(())
}
