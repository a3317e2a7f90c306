//! Home feed, likes and comment creation.

use tracing::{debug, instrument};

use crate::Result;
use crate::http::endpoints::{self, NewCommentRequest};
use crate::http::{ApiClient, ApiRequest, Transport};
use crate::models::{Page, Post};
use crate::types::PostId;

use super::avatars::attach_avatars;

pub const DEFAULT_FEED_PAGE_SIZE: u32 = 10;

/// Feed endpoints.
pub struct PostsApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> PostsApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// One page of the home feed, with author avatars attached.
    #[instrument(skip(self))]
    pub async fn feed(&self, page: Option<u32>, size: Option<u32>) -> Result<Page<Post>> {
        let request = ApiRequest::get(endpoints::FEED)
            .query("pageNumber", page.unwrap_or(0))
            .query("size", size.unwrap_or(DEFAULT_FEED_PAGE_SIZE));
        let mut feed: Page<Post> = self.client.send_json(request).await?;
        debug!(posts = feed.content.len(), "Fetched feed");

        attach_avatars(&self.client.images(), feed.content.iter_mut().collect()).await;
        Ok(feed)
    }

    #[instrument(skip(self, post_id), fields(post_id = %post_id))]
    pub async fn like(&self, post_id: &PostId) -> Result<()> {
        let path = endpoints::post_like(post_id.as_str());
        self.client.send(ApiRequest::post(path)).await?;
        Ok(())
    }

    #[instrument(skip(self, post_id), fields(post_id = %post_id))]
    pub async fn unlike(&self, post_id: &PostId) -> Result<()> {
        let path = endpoints::post_like(post_id.as_str());
        self.client.send(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Comment on a post. Returns the backend's answer as-is.
    #[instrument(skip(self, post_id, text), fields(post_id = %post_id))]
    pub async fn add_comment(&self, post_id: &PostId, text: &str) -> Result<serde_json::Value> {
        let request = ApiRequest::post(endpoints::post_comments(post_id.as_str()))
            .json(&NewCommentRequest { text })?;
        self.client.send(request).await?.json_value()
    }
}
