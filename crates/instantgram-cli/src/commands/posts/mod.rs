//! Posts subcommand implementations.

mod comment;
mod comments;
mod feed;
mod like;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct PostsCommand {
    #[command(subcommand)]
    pub command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PostsSubcommand {
    /// Show the home feed
    Feed(feed::FeedArgs),

    /// Like a post
    Like(like::LikeArgs),

    /// Remove a like from a post
    Unlike(like::LikeArgs),

    /// Comment on a post
    Comment(comment::CommentArgs),

    /// List the comments on a post
    Comments(comments::CommentsArgs),
}

pub async fn handle(cmd: PostsCommand, session: &CliSession) -> Result<()> {
    session.require_login()?;

    match cmd.command {
        PostsSubcommand::Feed(args) => feed::run(args, session).await,
        PostsSubcommand::Like(args) => like::run(args, session, true).await,
        PostsSubcommand::Unlike(args) => like::run(args, session, false).await,
        PostsSubcommand::Comment(args) => comment::run(args, session).await,
        PostsSubcommand::Comments(args) => comments::run(args, session).await,
    }
}
