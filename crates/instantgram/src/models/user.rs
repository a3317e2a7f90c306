//! Account and session payloads.

use serde::{Deserialize, Serialize};

use crate::auth::TokenPair;
use crate::types::UserId;

/// A user profile.
///
/// Only `id` and `username` are guaranteed; the remaining fields are empty
/// when the backend omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub birth_date: String,
}

/// Response from sign-in and sign-up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Response from the token validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub id: Option<UserId>,
}

/// Response from the protected test endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedData {
    pub message: String,
    pub user_id: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}
