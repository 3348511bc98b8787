//! `data:<mime>;base64,<payload>` encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use super::MediaError;
use crate::constants::ACCEPTED_IMAGE_FORMATS;

/// Decoded inline image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self { mime: mime.into(), data }
    }

    /// Parse a base64 `data:` URI.
    pub fn parse(input: &str) -> Result<Self, MediaError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::InvalidDataUri("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidDataUri("missing payload separator".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| MediaError::InvalidDataUri("only base64 payloads are supported".to_string()))?;
        if mime.is_empty() {
            return Err(MediaError::InvalidDataUri("missing media type".to_string()));
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| MediaError::InvalidDataUri(e.to_string()))?;

        Ok(Self::new(mime, data))
    }

    /// Read an image file and encode it, validating the extension.
    pub fn from_file(path: &Path) -> Result<Self, MediaError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let mime = mime_for_extension(&extension).ok_or_else(|| {
            MediaError::UnsupportedFormat(format!(
                "only {} files are accepted",
                ACCEPTED_IMAGE_FORMATS.join(", ")
            ))
        })?;

        let data = std::fs::read(path)?;
        Ok(Self::new(mime, data))
    }

    /// Encode back to a `data:` URI string.
    pub fn encode(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// Whether the string is an inline image rather than a hosted URL.
pub fn is_data_uri(input: &str) -> bool {
    input.starts_with("data:")
}

/// Approximate decoded size of a base64 `data:` URI without decoding it.
pub fn estimated_size(input: &str) -> usize {
    let payload = input.split_once(',').map(|(_, payload)| payload).unwrap_or(input);
    payload.len() * 3 / 4
}

/// Media type for an accepted file extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
