//! Iterative downscaling of inline images to a byte budget.
//!
//! The first attempt re-encodes at the original size. Every later attempt
//! shrinks both dimensions by `scale_step` and lowers the encoder quality by
//! `quality_step`, never going below `min_quality`.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::io::Cursor;

use super::data_uri::{estimated_size, DataUri};
use super::MediaError;

/// Parameters of the downscale loop.
#[derive(Clone, Debug, PartialEq)]
pub struct DownscalePolicy {
    pub max_bytes: usize,
    pub max_iterations: u32,
    pub scale_step: f32,
    pub initial_quality: f32,
    pub quality_step: f32,
    pub min_quality: f32,
}

impl DownscalePolicy {
    pub fn with_budget(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            max_iterations: 10,
            scale_step: 0.9,
            initial_quality: 0.9,
            quality_step: 0.1,
            min_quality: 0.5,
        }
    }
}

/// Result of a successful fit.
#[derive(Clone, Debug)]
pub struct FitOutcome {
    pub uri: String,
    /// Final `(width, height)`; `None` when the input already fit and was never decoded
    pub dimensions: Option<(u32, u32)>,
    pub quality: f32,
    /// Number of re-encodes performed; 0 when the input already fit
    pub iterations: u32,
}

/// Decode and re-encode images at a given size and quality.
pub trait Reencoder {
    type Source;

    fn decode(&self, image: &DataUri) -> Result<Self::Source, MediaError>;

    fn dimensions(&self, source: &Self::Source) -> (u32, u32);

    /// `quality` is in `0.0..=1.0` and only applies to lossy formats.
    fn encode(
        &self,
        source: &Self::Source,
        mime: &str,
        width: u32,
        height: u32,
        quality: f32,
    ) -> Result<DataUri, MediaError>;
}

/// Shrink `uri` until its decoded size fits `policy.max_bytes`.
pub fn fit_to_budget<R: Reencoder>(
    uri: &str,
    policy: &DownscalePolicy,
    reencoder: &R,
) -> Result<FitOutcome, MediaError> {
    if estimated_size(uri) <= policy.max_bytes {
        return Ok(FitOutcome {
            uri: uri.to_string(),
            dimensions: None,
            quality: 1.0,
            iterations: 0,
        });
    }

    let parsed = DataUri::parse(uri)?;
    let source = reencoder.decode(&parsed)?;
    let (mut width, mut height) = reencoder.dimensions(&source);
    let mut quality = policy.initial_quality;
    let mut last_size = parsed.data.len();

    for iteration in 1..=policy.max_iterations {
        if iteration > 1 {
            width = scale(width, policy.scale_step);
            height = scale(height, policy.scale_step);
            quality = (quality - policy.quality_step).max(policy.min_quality);
        }

        let encoded = reencoder.encode(&source, &parsed.mime, width, height, quality)?;
        last_size = encoded.data.len();
        debug!(
            "Downscale attempt {}: {}x{} q={:.1} -> {} bytes (budget {})",
            iteration, width, height, quality, last_size, policy.max_bytes
        );

        if last_size <= policy.max_bytes {
            return Ok(FitOutcome {
                uri: encoded.encode(),
                dimensions: Some((width, height)),
                quality,
                iterations: iteration,
            });
        }
    }

    Err(MediaError::BudgetExceeded {
        budget: policy.max_bytes,
        size: last_size,
    })
}

/// Fit a data URI using the production [`ImageReencoder`].
pub fn fit_data_uri(uri: &str, policy: &DownscalePolicy) -> Result<FitOutcome, MediaError> {
    fit_to_budget(uri, policy, &ImageReencoder)
}

fn scale(dimension: u32, step: f32) -> u32 {
    ((dimension as f32 * step).floor() as u32).max(1)
}

/// [`Reencoder`] backed by the `image` crate.
///
/// JPEG keeps its format with the quality applied. PNG and WebP are
/// re-encoded losslessly at the new size, GIF becomes PNG.
pub struct ImageReencoder;

impl Reencoder for ImageReencoder {
    type Source = DynamicImage;

    fn decode(&self, image: &DataUri) -> Result<DynamicImage, MediaError> {
        image::load_from_memory(&image.data).map_err(|e| MediaError::Decode(e.to_string()))
    }

    fn dimensions(&self, source: &DynamicImage) -> (u32, u32) {
        (source.width(), source.height())
    }

    fn encode(
        &self,
        source: &DynamicImage,
        mime: &str,
        width: u32,
        height: u32,
        quality: f32,
    ) -> Result<DataUri, MediaError> {
        let resized = if (width, height) == (source.width(), source.height()) {
            source.clone()
        } else {
            source.resize_exact(width, height, FilterType::Triangle)
        };

        let mut buffer = Vec::new();
        let output_mime = match mime {
            "image/jpeg" | "image/jpg" => {
                let jpeg_quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality);
                encoder
                    .encode_image(&resized.to_rgb8())
                    .map_err(|e| MediaError::Encode(e.to_string()))?;
                "image/jpeg"
            }
            "image/webp" => {
                DynamicImage::ImageRgba8(resized.to_rgba8())
                    .write_to(&mut Cursor::new(&mut buffer), ImageFormat::WebP)
                    .map_err(|e| MediaError::Encode(e.to_string()))?;
                "image/webp"
            }
            "image/png" | "image/gif" => {
                resized
                    .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|e| MediaError::Encode(e.to_string()))?;
                "image/png"
            }
            other => return Err(MediaError::UnsupportedFormat(other.to_string())),
        };

        Ok(DataUri::new(output_mime, buffer))
    }
}
