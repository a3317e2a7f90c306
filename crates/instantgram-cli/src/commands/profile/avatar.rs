//! Avatar command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use instantgram::types::UserId;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct AvatarArgs {
    /// User whose avatar to show (defaults to the signed-in user)
    #[arg(long)]
    pub user: Option<String>,

    /// Upload this image as the signed-in user's avatar
    #[arg(long, conflicts_with = "user")]
    pub upload: Option<PathBuf>,
}

pub async fn run(args: AvatarArgs, session: &CliSession) -> Result<()> {
    let images = session.client().images();

    let user_id = match &args.user {
        Some(id) => UserId::new(id).context("Invalid user ID")?,
        None => {
            let me = session
                .client()
                .auth()
                .info()
                .await
                .context("Failed to fetch profile")?;
            me.id
        }
    };

    if let Some(path) = &args.upload {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .context("Image path has no file name")?;

        images
            .upload_avatar(&user_id, file_name, data)
            .await
            .context("Failed to upload avatar")?;

        output::success("Avatar uploaded");
        return Ok(());
    }

    match images
        .avatar_for(&user_id)
        .await
        .context("Failed to load avatar")?
    {
        // Base64 payload, ready for `base64 -d`
        Some(avatar) => println!("{}", avatar),
        None => output::hint(&format!("{} has no avatar.", user_id)),
    }

    Ok(())
}
