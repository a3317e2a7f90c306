//! Wire models exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. `avatar` fields are never
//! sent by the backend; they are filled in client-side from the images API.

mod chat;
mod image;
mod page;
mod post;
mod user;

pub use chat::{Chat, ChatParticipant, Message, SendMessage};
pub use image::{FileTransferEntity, Icon, ImageResponse, ImageType};
pub use page::Page;
pub use post::{Comment, Post};
pub use user::{AuthResponse, ProtectedData, TokenValidation, User};
