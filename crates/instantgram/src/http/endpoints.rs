//! Backend endpoint paths and the request bodies that are not models.

use serde::Serialize;

use crate::auth::RefreshToken;

// ============================================================================
// Auth
// ============================================================================

pub const SIGN_IN: &str = "/api/v1/auth/sign-in";
pub const SIGN_UP: &str = "/api/v1/auth/sign-up";
pub const REFRESH: &str = "/api/v1/auth/refresh";
pub const VALIDATE: &str = "/api/v1/auth/validate";
pub const INFO: &str = "/api/v1/auth/info";
pub const PROTECTED: &str = "/api/v1/protected";

/// Query parameter of `validate` that carries the access token.
pub const VALIDATE_TOKEN_PARAM: &str = "token";

// ============================================================================
// Feed
// ============================================================================

pub const FEED: &str = "/api/v1/posts/feed";
pub const COMMENTS: &str = "/api/v1/activities/comments";

pub fn post_like(post_id: &str) -> String {
    format!("/api/v1/posts/{}/like", post_id)
}

pub fn post_comments(post_id: &str) -> String {
    format!("/api/v1/posts/{}/comments", post_id)
}

// ============================================================================
// Messaging
// ============================================================================

pub const MESSAGES: &str = "/api/v1/messages";
pub const CHATS: &str = "/api/v1/messages/chats";

pub fn chat_read(chat_id: &str) -> String {
    format!("/api/v1/messages/chats/{}/read", chat_id)
}

// ============================================================================
// Images
// ============================================================================

pub const IMAGES: &str = "/api/v1/images";
pub const ICONS: &str = "/api/v1/images/icons";
pub const IMAGES_BY_PARENTS: &str = "/api/v1/images/parent/many";

// ============================================================================
// Request bodies
// ============================================================================

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

impl<'a> From<&'a RefreshToken> for RefreshRequest<'a> {
    fn from(token: &'a RefreshToken) -> Self {
        Self {
            refresh_token: token.as_str(),
        }
    }
}

/// Request body for adding a comment to a post.
#[derive(Debug, Serialize)]
pub struct NewCommentRequest<'a> {
    pub text: &'a str,
}

/// Request body for opening a chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatRequest<'a> {
    pub participant_id: &'a str,
}
