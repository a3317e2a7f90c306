//! Comment command implementation.

use anyhow::{Context, Result, ensure};
use clap::Args;
use instantgram::types::PostId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Post ID
    pub post_id: String,

    /// Comment text
    pub text: String,
}

pub async fn run(args: CommentArgs, session: &CliSession) -> Result<()> {
    let post_id = PostId::new(&args.post_id).context("Invalid post ID")?;
    let text = args.text.trim();
    ensure!(!text.is_empty(), "Comment text is empty");

    session
        .client()
        .posts()
        .add_comment(&post_id, text)
        .await
        .context("Failed to add comment")?;

    output::success(&format!("Commented on {}", post_id));
    Ok(())
}
