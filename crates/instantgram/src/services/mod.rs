//! Typed feature services over [`ApiClient`].
//!
//! Every service borrows the client, so all of them share its token store
//! and its pending refresh. None of them touch the network or the
//! `Authorization` header directly.

mod auth;
mod avatars;
mod comments;
mod images;
mod messages;
mod posts;

pub use auth::AuthApi;
pub use avatars::{HasAvatar, avatar_index, distinct_owners};
pub use comments::{CommentsApi, DEFAULT_COMMENTS_PAGE_SIZE};
pub use images::{DEFAULT_IMAGES_PAGE_SIZE, ImagesApi};
pub use messages::{DEFAULT_CHATS_PAGE_SIZE, DEFAULT_MESSAGES_PAGE_SIZE, MessagesApi};
pub use posts::{DEFAULT_FEED_PAGE_SIZE, PostsApi};

use crate::http::{ApiClient, Transport};

impl<T: Transport> ApiClient<T> {
    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi::new(self)
    }

    pub fn posts(&self) -> PostsApi<'_, T> {
        PostsApi::new(self)
    }

    pub fn comments(&self) -> CommentsApi<'_, T> {
        CommentsApi::new(self)
    }

    pub fn messages(&self) -> MessagesApi<'_, T> {
        MessagesApi::new(self)
    }

    pub fn images(&self) -> ImagesApi<'_, T> {
        ImagesApi::new(self)
    }
}
