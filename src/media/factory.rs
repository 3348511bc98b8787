//! Image host factory for creating host instances from configuration.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use super::{cloudinary::CloudinaryHost, ImageHost, MediaError, UploadOptions, UploadedImage};
use crate::config::MediaConfig;

/// Create an image host from the `[media]` configuration section.
///
/// # Errors
/// Returns error if:
/// - The provider is unknown
/// - Required credentials are missing from the environment
pub fn create_image_host(config: &MediaConfig) -> Result<Arc<dyn ImageHost>> {
    match config.provider.as_str() {
        "cloudinary" => {
            let credentials = config
                .cloudinary_credentials()
                .context("Cloudinary credentials are required for the cloudinary media provider")?;
            let host = CloudinaryHost::new(credentials, config.api_base_url.clone())?;
            Ok(Arc::new(host))
        }
        "disabled" => Ok(Arc::new(DisabledHost)),
        other => Err(anyhow!("Unknown media provider: {}", other)),
    }
}

/// Host used when uploads are turned off; hosted URLs still pass through untouched.
pub struct DisabledHost;

#[async_trait]
impl ImageHost for DisabledHost {
    fn provider(&self) -> &str {
        "disabled"
    }

    async fn upload(&self, _data_uri: &str, _options: &UploadOptions) -> Result<UploadedImage, MediaError> {
        Err(MediaError::Disabled)
    }

    async fn destroy(&self, _public_id: &str) -> Result<bool, MediaError> {
        Err(MediaError::Disabled)
    }

    fn public_id_from_url(&self, _url: &str) -> Option<String> {
        None
    }
}
