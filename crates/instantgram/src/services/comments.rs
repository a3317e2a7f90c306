//! Comment listings.

use tracing::instrument;

use crate::Result;
use crate::http::{ApiClient, ApiRequest, Transport, endpoints};
use crate::models::{Comment, Page};
use crate::types::PostId;

use super::avatars::attach_avatars;

pub const DEFAULT_COMMENTS_PAGE_SIZE: u32 = 20;

pub struct CommentsApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> CommentsApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Comments on `post_id`, with poster avatars attached.
    #[instrument(skip(self, post_id), fields(post_id = %post_id))]
    pub async fn list(
        &self,
        post_id: &PostId,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Page<Comment>> {
        let request = ApiRequest::get(endpoints::COMMENTS)
            .query("id", post_id)
            .query("page_number", page.unwrap_or(0))
            .query("size", size.unwrap_or(DEFAULT_COMMENTS_PAGE_SIZE));
        let mut comments: Page<Comment> = self.client.send_json(request).await?;

        attach_avatars(&self.client.images(), comments.content.iter_mut().collect()).await;
        Ok(comments)
    }
}
