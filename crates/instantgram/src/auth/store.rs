//! Durable credential storage.
//!
//! The client reads the stored pair before every outbound request and is the
//! only writer apart from explicit login and logout.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;

use super::tokens::{AccessToken, RefreshToken, TokenPair};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Credentials currently held in storage. Either entry may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
}

impl From<TokenPair> for StoredTokens {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: Some(pair.access_token),
            refresh_token: Some(pair.refresh_token),
        }
    }
}

/// Storage for the `accessToken` / `refreshToken` entries.
pub trait TokenStore: Send + Sync {
    /// Read both entries.
    fn load(&self) -> Result<StoredTokens, StorageError>;

    /// Overwrite both entries with a new pair.
    fn save(&self, pair: &TokenPair) -> Result<(), StorageError>;

    /// Delete both entries.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with arbitrary entries, e.g. only an access token.
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.clone())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = StoredTokens::from(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = StoredTokens::default();
        Ok(())
    }
}

/// On-disk layout of the token file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    #[serde(default)]
    access_token: Option<AccessToken>,
    #[serde(default)]
    refresh_token: Option<RefreshToken>,
    updated_at: DateTime<Utc>,
}

/// JSON file token storage.
///
/// A missing file means no stored credentials. The file is written with
/// owner-only permissions on Unix.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last time the stored pair was written, if any.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self.read_file()?.map(|file| file.updated_at))
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_file(&self) -> Result<Option<TokenFile>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let file = serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(file))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        Ok(self
            .read_file()?
            .map(|file| StoredTokens {
                access_token: file.access_token,
                refresh_token: file.refresh_token,
            })
            .unwrap_or_default())
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = TokenFile {
            access_token: Some(pair.access_token.clone()),
            refresh_token: Some(pair.refresh_token.clone()),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| self.io_error(e))?;
        }

        debug!(path = %self.path.display(), "Stored token pair");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed token file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
