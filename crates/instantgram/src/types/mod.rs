//! Validated value types used across the client.

mod base_url;
mod ids;

pub use base_url::{BaseUrl, DEFAULT_BASE_URL};
pub use ids::{ChatId, CommentId, MessageId, PostId, UserId};
