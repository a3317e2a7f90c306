//! Feed posts and their comments.

use serde::{Deserialize, Serialize};

use crate::types::{CommentId, PostId, UserId};

/// A feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub text: String,
    /// Author's username.
    pub author: String,
    #[serde(default)]
    pub author_id: Option<UserId>,
    pub number_of_likes: u64,
    pub number_of_comments: u64,
    pub created_at: String,
    /// Attached images, base64 encoded.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    /// Author's avatar, base64 encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub payload: String,
    pub poster_id: Option<UserId>,
    pub poster_name: String,
    pub post_id: PostId,
    pub created_at: String,
    #[serde(default)]
    pub leaved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
