//! Hosted image store interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::MediaError;

/// Host-side processing applied to an upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Hosted image is limited to this width, preserving aspect ratio
    pub width_limit: u32,
    /// Host quality preset, e.g. `auto:good`
    pub quality: String,
}

/// A successfully hosted image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// Image host trait that all hosted image stores must implement.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Returns the provider identifier (e.g., "cloudinary").
    fn provider(&self) -> &str;

    /// Upload an image given as a `data:` URI.
    async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedImage, MediaError>;

    /// Destroy a hosted image; `Ok(false)` when the host reports nothing was removed.
    async fn destroy(&self, public_id: &str) -> Result<bool, MediaError>;

    /// Resolve the host's identifier for an image URL it served, if it is one of its own.
    fn public_id_from_url(&self, url: &str) -> Option<String>;
}
