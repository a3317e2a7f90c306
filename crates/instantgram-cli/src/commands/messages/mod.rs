//! Messages subcommand implementations.

mod chats;
mod list;
mod new_chat;
mod read;
mod send;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct MessagesCommand {
    #[command(subcommand)]
    pub command: MessagesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MessagesSubcommand {
    /// List chats
    Chats(chats::ChatsArgs),

    /// Show the messages of a chat
    List(list::ListArgs),

    /// Send a message to a chat
    Send(send::SendArgs),

    /// Open a chat with another user
    NewChat(new_chat::NewChatArgs),

    /// Mark a chat as read
    Read(read::ReadArgs),
}

pub async fn handle(cmd: MessagesCommand, session: &CliSession) -> Result<()> {
    session.require_login()?;

    match cmd.command {
        MessagesSubcommand::Chats(args) => chats::run(args, session).await,
        MessagesSubcommand::List(args) => list::run(args, session).await,
        MessagesSubcommand::Send(args) => send::run(args, session).await,
        MessagesSubcommand::NewChat(args) => new_chat::run(args, session).await,
        MessagesSubcommand::Read(args) => read::run(args, session).await,
    }
}
