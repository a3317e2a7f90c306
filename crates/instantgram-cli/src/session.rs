//! Client construction and token file location.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use instantgram::auth::TokenStore;
use instantgram::{ApiClient, BaseUrl, FileTokenStore};
use tracing::debug;

/// The client for this invocation and the token file behind it.
pub struct CliSession {
    client: ApiClient,
    store: Arc<FileTokenStore>,
}

impl CliSession {
    pub fn open(api_url: &str, token_file: Option<PathBuf>) -> Result<Self> {
        let base = BaseUrl::new(api_url).context("Invalid API URL")?;
        let path = match token_file {
            Some(path) => path,
            None => default_token_path()?,
        };

        debug!(api_url = %base, token_file = %path.display(), "Opening session");

        let store = Arc::new(FileTokenStore::new(path));
        let client =
            ApiClient::connect(base, store.clone()).context("Failed to create HTTP client")?;

        Ok(Self { client, store })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &FileTokenStore {
        &self.store
    }

    /// Fail early when no credentials are stored at all.
    pub fn require_login(&self) -> Result<()> {
        let tokens = self.store.load().context("Failed to read token file")?;
        if tokens.access_token.is_none() && tokens.refresh_token.is_none() {
            bail!("No active session. Run 'instantgram auth login' first.");
        }
        Ok(())
    }
}

/// `<data dir>/instantgram/tokens.json`, creating the directory.
fn default_token_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "instantgram")
        .context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("tokens.json"))
}
