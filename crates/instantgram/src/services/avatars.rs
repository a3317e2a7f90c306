//! Client-side aggregation of avatar images onto listed items.
//!
//! Listings from the backend carry user ids but no pictures. Avatars are
//! fetched with one images lookup per listing and attached afterwards.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::http::Transport;
use crate::models::{ChatParticipant, Comment, ImageResponse, Message, Post};

use super::images::ImagesApi;

/// An item that displays its owner's avatar.
pub trait HasAvatar {
    /// Id of the user whose avatar belongs on this item.
    fn avatar_owner(&self) -> Option<&str>;

    fn set_avatar(&mut self, avatar: Option<String>);
}

impl HasAvatar for Post {
    fn avatar_owner(&self) -> Option<&str> {
        self.author_id.as_ref().map(|id| id.as_str())
    }

    fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
    }
}

impl HasAvatar for Comment {
    fn avatar_owner(&self) -> Option<&str> {
        self.poster_id.as_ref().map(|id| id.as_str())
    }

    fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
    }
}

impl HasAvatar for Message {
    fn avatar_owner(&self) -> Option<&str> {
        Some(self.sender_id.as_str())
    }

    fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
    }
}

impl HasAvatar for ChatParticipant {
    fn avatar_owner(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
    }
}

/// Owner ids of `items`, without duplicates, in first-seen order.
pub fn distinct_owners<'a, I>(items: impl IntoIterator<Item = &'a I>) -> Vec<String>
where
    I: HasAvatar + 'a,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| item.avatar_owner())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Map parent id to the first file of its image entry.
///
/// Entries without files are skipped; a later entry for the same parent
/// replaces an earlier one.
pub fn avatar_index(images: &[ImageResponse]) -> HashMap<String, String> {
    images
        .iter()
        .filter_map(|image| {
            image
                .first_file()
                .map(|file| (image.parent_id.clone(), file.to_string()))
        })
        .collect()
}

/// Fill in avatars for `items` with a single images lookup.
///
/// A failed lookup leaves the items untouched; avatars are decoration and
/// never fail the listing they belong to.
pub(crate) async fn attach_avatars<T, I>(images: &ImagesApi<'_, T>, items: Vec<&mut I>)
where
    T: Transport,
    I: HasAvatar + Send,
{
    let owners = distinct_owners(items.iter().map(|item| &**item));
    if owners.is_empty() {
        return;
    }

    let index = match images.by_parent_ids(&owners, None, None).await {
        Ok(page) => avatar_index(&page.content),
        Err(e) => {
            warn!(error = %e, owners = owners.len(), "Failed to load avatars");
            return;
        }
    };
    debug!(owners = owners.len(), found = index.len(), "Attaching avatars");

    for item in items {
        let avatar = item.avatar_owner().and_then(|id| index.get(id).cloned());
        item.set_avatar(avatar);
    }
}
