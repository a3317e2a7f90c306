//! Subcommand implementations.

pub mod auth;
pub mod messages;
pub mod posts;
pub mod profile;
