//! Chats and direct messages.

use tracing::{debug, instrument};

use crate::Result;
use crate::http::endpoints::{self, NewChatRequest};
use crate::http::{ApiClient, ApiRequest, Transport};
use crate::models::{Chat, ChatParticipant, Message, Page, SendMessage};
use crate::types::{ChatId, UserId};

use super::avatars::attach_avatars;

pub const DEFAULT_CHATS_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MESSAGES_PAGE_SIZE: u32 = 50;

/// Messaging endpoints.
pub struct MessagesApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> MessagesApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Chats of the signed-in user. Every participant gets its avatar.
    #[instrument(skip(self))]
    pub async fn chats(&self, page: Option<u32>, size: Option<u32>) -> Result<Page<Chat>> {
        let request = ApiRequest::get(endpoints::CHATS)
            .query("page_number", page.unwrap_or(0))
            .query("size", size.unwrap_or(DEFAULT_CHATS_PAGE_SIZE));
        let mut chats: Page<Chat> = self.client.send_json(request).await?;
        debug!(chats = chats.content.len(), "Fetched chats");

        let participants: Vec<&mut ChatParticipant> = chats
            .content
            .iter_mut()
            .flat_map(|chat| chat.participants.iter_mut())
            .collect();
        attach_avatars(&self.client.images(), participants).await;
        Ok(chats)
    }

    /// Messages of one chat, with sender avatars attached.
    #[instrument(skip(self, chat_id), fields(chat_id = %chat_id))]
    pub async fn messages(
        &self,
        chat_id: &ChatId,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Page<Message>> {
        let request = ApiRequest::get(endpoints::MESSAGES)
            .query("chatId", chat_id)
            .query("page_number", page.unwrap_or(0))
            .query("size", size.unwrap_or(DEFAULT_MESSAGES_PAGE_SIZE));
        let mut messages: Page<Message> = self.client.send_json(request).await?;

        attach_avatars(&self.client.images(), messages.content.iter_mut().collect()).await;
        Ok(messages)
    }

    #[instrument(skip(self, message), fields(chat_id = %message.chat_id))]
    pub async fn send(&self, message: &SendMessage) -> Result<Message> {
        let request = ApiRequest::post(endpoints::MESSAGES).json(message)?;
        self.client.send_json(request).await
    }

    /// Open a chat with another user.
    #[instrument(skip(self, participant_id), fields(participant_id = %participant_id))]
    pub async fn create_chat(&self, participant_id: &UserId) -> Result<Chat> {
        let request = ApiRequest::post(endpoints::CHATS).json(&NewChatRequest {
            participant_id: participant_id.as_str(),
        })?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self, chat_id), fields(chat_id = %chat_id))]
    pub async fn mark_read(&self, chat_id: &ChatId) -> Result<()> {
        let path = endpoints::chat_read(chat_id.as_str());
        self.client.send(ApiRequest::put(path)).await?;
        Ok(())
    }
}
