//! Feed command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Page number, starting at 0
    #[arg(long)]
    pub page: Option<u32>,

    /// Posts per page
    #[arg(long)]
    pub size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: FeedArgs, session: &CliSession) -> Result<()> {
    let feed = session
        .client()
        .posts()
        .feed(args.page, args.size)
        .await
        .context("Failed to load feed")?;

    if args.json {
        return output::json_pretty(&feed);
    }

    if feed.content.is_empty() {
        output::hint("No posts yet.");
        return Ok(());
    }

    for post in &feed.content {
        let liked = if post.is_liked == Some(true) { "♥" } else { "♡" };
        println!(
            "{} {} {}",
            post.author.bold(),
            output::timestamp(&post.created_at).dimmed(),
            format!("[{}]", post.id).dimmed()
        );
        println!("{}", post.text);
        println!(
            "{} {}  {} {}",
            liked.red(),
            post.number_of_likes,
            "comments".dimmed(),
            post.number_of_comments
        );
        if !post.files.is_empty() {
            output::hint(&format!("{} attached image(s)", post.files.len()));
        }
        println!();
    }

    output::next_page(feed.current_page, feed.has_next());
    Ok(())
}
