//! Image pipeline: data URIs, downscaling, and the hosted image store.
//!
//! This module defines the common interface every image host implements,
//! along with the shared upload types and error handling. The upload flow is:
//!
//! 1. the client sends images inline as `data:` URIs ([`data_uri`]),
//! 2. oversize images are re-encoded until they fit a byte budget ([`downscale`]),
//! 3. the result is uploaded to the configured [`ImageHost`] ([`cloudinary`]),
//! 4. hosted images that are no longer referenced are destroyed in the
//!    background ([`pipeline`]).

pub mod cloudinary;
pub mod data_uri;
pub mod downscale;
pub mod factory;
pub mod host;
pub mod pipeline;

pub use factory::create_image_host;
pub use host::{ImageHost, UploadOptions, UploadedImage};
pub use pipeline::{plan_update, ImagePipeline, ImagePlan, UploadProfile};

/// Common error types for image operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Could not reduce image below {budget} bytes (last attempt: {size} bytes)")]
    BudgetExceeded { budget: usize, size: usize },

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Image host is disabled")]
    Disabled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
