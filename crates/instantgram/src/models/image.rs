//! Image and icon payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// A built-in icon; `file` is a base64 encoded SVG document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub file: String,
    pub name: String,
}

impl Icon {
    /// Decode the SVG markup.
    pub fn decode_svg(&self) -> Result<String, Error> {
        let invalid = |reason: String| InvalidInputError::Other {
            message: format!("icon '{}': {}", self.name, reason),
        };
        let bytes = STANDARD
            .decode(self.file.trim())
            .map_err(|e| invalid(e.to_string()))?;
        Ok(String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))?)
    }
}

/// Kind of image stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Avatar,
    #[serde(other)]
    Other,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Avatar => "AVATAR",
            ImageType::Other => "OTHER",
        }
    }
}

/// A stored file, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTransferEntity {
    pub file: String,
    pub name: String,
}

/// Images attached to one parent entity (for avatars, the user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_type: ImageType,
    #[serde(default)]
    pub files: Vec<FileTransferEntity>,
    /// Kept as a plain string: aggregation only compares it.
    pub parent_id: String,
}

impl ImageResponse {
    /// The first file's payload, if any.
    pub fn first_file(&self) -> Option<&str> {
        self.files.first().map(|f| f.file.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_svg_icon() {
        let icon = Icon {
            file: STANDARD.encode("<svg></svg>"),
            name: "heart".to_string(),
        };
        assert_eq!(icon.decode_svg().unwrap(), "<svg></svg>");
    }

    #[test]
    fn bad_icon_names_the_icon() {
        let icon = Icon {
            file: "%%%".to_string(),
            name: "heart".to_string(),
        };
        let err = icon.decode_svg().unwrap_err().to_string();
        assert!(err.contains("heart"));
    }

    #[test]
    fn unknown_image_types_are_tolerated() {
        let image: ImageResponse = serde_json::from_value(json!({
            "imageType": "POST_PHOTO",
            "files": [],
            "parentId": "p1"
        }))
        .unwrap();
        assert_eq!(image.image_type, ImageType::Other);
        assert!(image.first_file().is_none());
    }
}
