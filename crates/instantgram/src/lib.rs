//! instantgram - client for the Instantgram social backend
//!
//! All calls flow through an [`ApiClient`], which attaches the stored access
//! token and transparently refreshes an expired credential pair. Concurrent
//! requests that hit an expired token share a single refresh, and every
//! request is retried at most once.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use instantgram::{ApiClient, BaseUrl, FileTokenStore, LoginCredentials};
//!
//! # async fn example() -> Result<(), instantgram::Error> {
//! let store = Arc::new(FileTokenStore::new("tokens.json"));
//! let client = ApiClient::connect(BaseUrl::new("http://localhost:8000")?, store)?;
//!
//! client.auth().sign_in(&LoginCredentials::new("alice", "secret")).await?;
//!
//! for post in client.posts().feed(None, None).await?.content {
//!     println!("{}: {}", post.author, post.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod types;

pub use auth::{
    FileTokenStore, LoginCredentials, MemoryTokenStore, Registration, TokenPair, TokenStore,
};
pub use error::Error;
pub use http::{
    ApiClient, ApiRequest, ApiResponse, AuthEvent, LogoutReason, ReqwestTransport, Transport,
};
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
