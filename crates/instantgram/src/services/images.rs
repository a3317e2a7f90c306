//! Icons, avatar lookup and avatar upload.

use tracing::{debug, info, instrument};

use crate::Result;
use crate::http::{ApiClient, ApiRequest, MultipartForm, Transport, endpoints};
use crate::models::{Icon, ImageResponse, ImageType, Page};
use crate::types::UserId;

pub const DEFAULT_IMAGES_PAGE_SIZE: u32 = 100;

/// Image endpoints.
pub struct ImagesApi<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> ImagesApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// UI icons, base64 encoded SVG.
    #[instrument(skip(self))]
    pub async fn icons(&self) -> Result<Vec<Icon>> {
        self.client.send_json(ApiRequest::get(endpoints::ICONS)).await
    }

    /// Images owned by any of `ids`.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn by_parent_ids<S>(
        &self,
        ids: &[S],
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Page<ImageResponse>>
    where
        S: AsRef<str> + Sync,
    {
        let ids = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let request = ApiRequest::get(endpoints::IMAGES_BY_PARENTS)
            .query("ids", ids)
            .query("page_number", page.unwrap_or(0))
            .query("size", size.unwrap_or(DEFAULT_IMAGES_PAGE_SIZE));
        self.client.send_json(request).await
    }

    /// The avatar of a single user, if one was uploaded.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn avatar_for(&self, user_id: &UserId) -> Result<Option<String>> {
        let page = self.by_parent_ids(&[user_id.as_str()], None, None).await?;
        Ok(page
            .content
            .first()
            .and_then(ImageResponse::first_file)
            .map(str::to_string))
    }

    /// Upload an avatar for `parent_id`.
    ///
    /// Returns whatever the backend answers with, `null` for an empty body.
    #[instrument(skip(self, parent_id, data), fields(parent_id = %parent_id, len = data.len()))]
    pub async fn upload_avatar(
        &self,
        parent_id: &UserId,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<serde_json::Value> {
        info!("Uploading avatar");

        let mime = mime_for(file_name);
        let form = MultipartForm::new()
            .text("imageType", ImageType::Avatar.as_str())
            .text("parentEntityId", parent_id.as_str())
            .file("file", file_name, mime, data);

        let response = self
            .client
            .send(ApiRequest::post(endpoints::IMAGES).multipart(form))
            .await?;
        debug!(status = %response.status(), "Avatar uploaded");
        response.json_value()
    }
}

/// MIME type for an uploaded image, by extension.
fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for("me.JPG"), "image/jpeg");
        assert_eq!(mime_for("me.png"), "image/png");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
