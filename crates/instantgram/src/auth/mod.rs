//! Authentication types and credential storage.

mod credentials;
mod store;
mod tokens;

pub use credentials::{LoginCredentials, Registration};
pub use store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
