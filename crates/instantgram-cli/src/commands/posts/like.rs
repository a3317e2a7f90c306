//! Like and unlike command implementation.

use anyhow::{Context, Result};
use clap::Args;
use instantgram::types::PostId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LikeArgs {
    /// Post ID
    pub post_id: String,
}

pub async fn run(args: LikeArgs, session: &CliSession, like: bool) -> Result<()> {
    let post_id = PostId::new(&args.post_id).context("Invalid post ID")?;
    let posts = session.client().posts();

    if like {
        posts.like(&post_id).await.context("Failed to like post")?;
        output::success(&format!("Liked {}", post_id));
    } else {
        posts.unlike(&post_id).await.context("Failed to unlike post")?;
        output::success(&format!("Removed like from {}", post_id));
    }

    Ok(())
}
