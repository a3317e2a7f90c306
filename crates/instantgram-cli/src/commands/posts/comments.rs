//! Comments command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use instantgram::types::PostId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CommentsArgs {
    /// Post ID
    pub post_id: String,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: CommentsArgs, session: &CliSession) -> Result<()> {
    let post_id = PostId::new(&args.post_id).context("Invalid post ID")?;

    let comments = session
        .client()
        .comments()
        .list(&post_id, args.page, args.size)
        .await
        .context("Failed to load comments")?;

    if args.json {
        return output::json_pretty(&comments);
    }

    if comments.content.is_empty() {
        output::hint("No comments.");
        return Ok(());
    }

    for comment in &comments.content {
        println!(
            "{} {}: {}",
            output::timestamp(&comment.created_at).dimmed(),
            comment.poster_name.bold(),
            comment.payload
        );
    }

    output::next_page(comments.current_page, comments.has_next());
    Ok(())
}
