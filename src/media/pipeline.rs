//! Upload and cleanup flow shared by the highlight and press release handlers.

use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::timeout;

use super::data_uri::{estimated_size, is_data_uri};
use super::downscale::{fit_data_uri, DownscalePolicy};
use super::{ImageHost, UploadOptions};
use crate::config::UploadProfileConfig;

/// Per-resource upload limits.
#[derive(Clone, Debug)]
pub struct UploadProfile {
    pub max_images: usize,
    pub max_bytes: usize,
    pub options: UploadOptions,
    pub timeout: Duration,
}

impl From<&UploadProfileConfig> for UploadProfile {
    fn from(config: &UploadProfileConfig) -> Self {
        Self {
            max_images: config.max_images,
            max_bytes: config.max_bytes,
            options: UploadOptions {
                width_limit: config.width_limit,
                quality: config.quality.clone(),
            },
            timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }
}

/// How an incoming image list relates to the stored one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImagePlan {
    /// Incoming hosted URLs that are already stored
    pub retained: Vec<String>,
    /// Incoming inline images
    pub to_upload: Vec<String>,
    /// Stored hosted URLs missing from the incoming list
    pub to_delete: Vec<String>,
}

/// Diff the stored image list against the incoming one.
pub fn plan_update(existing: &[String], incoming: &[String]) -> ImagePlan {
    let retained = incoming
        .iter()
        .filter(|image| image.starts_with("http") && existing.contains(image))
        .cloned()
        .collect();

    let to_upload = incoming.iter().filter(|image| is_data_uri(image)).cloned().collect();

    let to_delete = existing
        .iter()
        .filter(|image| image.starts_with("http") && !incoming.contains(image))
        .cloned()
        .collect();

    ImagePlan {
        retained,
        to_upload,
        to_delete,
    }
}

impl ImagePlan {
    /// Entries of the final image list that were uploaded for this update
    pub fn fresh_uploads(&self, images: &[String]) -> Vec<String> {
        images
            .iter()
            .filter(|image| image.starts_with("http") && !self.retained.contains(image))
            .cloned()
            .collect()
    }
}

pub struct ImagePipeline {
    host: Arc<dyn ImageHost>,
    delete_timeout: Duration,
    destroyed: Mutex<HashSet<String>>,
}

impl ImagePipeline {
    pub fn new(host: Arc<dyn ImageHost>, delete_timeout: Duration) -> Self {
        Self {
            host,
            delete_timeout,
            destroyed: Mutex::new(HashSet::new()),
        }
    }

    /// Upload the first `profile.max_images` entries concurrently.
    ///
    /// Hosted URLs are kept as they are. Inline images over the byte budget are
    /// downscaled first. Entries that are empty, still too large, or fail to
    /// upload are dropped, so the result may be shorter than the input.
    /// Order is preserved.
    pub async fn process_images(&self, images: &[String], profile: &UploadProfile) -> Vec<String> {
        if images.len() > profile.max_images {
            warn!(
                "⚠️  Received {} images, only the first {} will be processed",
                images.len(),
                profile.max_images
            );
        }

        let mut tasks = JoinSet::new();
        for (index, image) in images.iter().take(profile.max_images).enumerate() {
            let host = Arc::clone(&self.host);
            let image = image.clone();
            let profile = profile.clone();
            tasks.spawn(async move { (index, process_one(host, image, index, profile).await) });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!("❌ Image task failed: {}", e),
            }
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().filter_map(|(_, url)| url).collect()
    }

    /// Destroy a hosted image. Returns whether the host confirmed deletion.
    ///
    /// Never fails: non-host URLs are ignored, errors and timeouts are logged.
    pub async fn delete_image(&self, url: &str) -> bool {
        if !url.starts_with("http") {
            return false;
        }

        let Some(public_id) = self.host.public_id_from_url(url) else {
            warn!("⚠️  Not a hosted image, skipping delete: {}", url);
            return false;
        };

        if let Ok(destroyed) = self.destroyed.lock() {
            if destroyed.contains(&public_id) {
                return true;
            }
        }

        match timeout(self.delete_timeout, self.host.destroy(&public_id)).await {
            Ok(Ok(deleted)) => {
                if let Ok(mut destroyed) = self.destroyed.lock() {
                    destroyed.insert(public_id);
                }
                deleted
            }
            Ok(Err(e)) => {
                error!("❌ Failed to delete image {}: {}", public_id, e);
                false
            }
            Err(_) => {
                error!(
                    "❌ Deleting image {} timed out after {}s",
                    public_id,
                    self.delete_timeout.as_secs()
                );
                false
            }
        }
    }

    /// Delete images in the background. The handle resolves to the number of
    /// confirmed deletions; callers are free to drop it.
    pub fn spawn_cleanup(self: &Arc<Self>, urls: Vec<String>) -> JoinHandle<usize> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let mut tasks = JoinSet::new();
            for url in urls.into_iter().filter(|url| url.starts_with("http")) {
                let pipeline = Arc::clone(&pipeline);
                tasks.spawn(async move { pipeline.delete_image(&url).await });
            }

            let mut deleted = 0;
            while let Some(joined) = tasks.join_next().await {
                if let Ok(true) = joined {
                    deleted += 1;
                }
            }
            if deleted > 0 {
                info!("🧹 Cleaned up {} hosted images", deleted);
            }
            deleted
        })
    }
}

async fn process_one(host: Arc<dyn ImageHost>, image: String, index: usize, profile: UploadProfile) -> Option<String> {
    if image.trim().is_empty() {
        warn!("⚠️  Image {} is empty, skipping", index);
        return None;
    }
    if !is_data_uri(&image) {
        return Some(image);
    }

    let size = estimated_size(&image);
    let prepared = if size > profile.max_bytes {
        info!(
            "📐 Image {} is {} bytes, downscaling to fit {} bytes",
            index, size, profile.max_bytes
        );
        let policy = DownscalePolicy::with_budget(profile.max_bytes);
        match tokio::task::spawn_blocking(move || fit_data_uri(&image, &policy)).await {
            Ok(Ok(outcome)) => outcome.uri,
            Ok(Err(e)) => {
                warn!("⚠️  Image {} skipped: {}", index, e);
                return None;
            }
            Err(e) => {
                error!("❌ Downscale task for image {} failed: {}", index, e);
                return None;
            }
        }
    } else {
        image
    };

    match timeout(profile.timeout, host.upload(&prepared, &profile.options)).await {
        Ok(Ok(uploaded)) => Some(uploaded.url),
        Ok(Err(e)) => {
            error!("❌ Failed to upload image {}: {}", index, e);
            None
        }
        Err(_) => {
            error!(
                "❌ Upload of image {} timed out after {}s",
                index,
                profile.timeout.as_secs()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_update_partitions_images() {
        let existing = strings(&["https://cdn/a.jpg", "https://cdn/b.jpg"]);
        let incoming = strings(&["https://cdn/a.jpg", "data:image/png;base64,AAAA"]);

        let plan = plan_update(&existing, &incoming);
        assert_eq!(plan.retained, strings(&["https://cdn/a.jpg"]));
        assert_eq!(plan.to_upload, strings(&["data:image/png;base64,AAAA"]));
        assert_eq!(plan.to_delete, strings(&["https://cdn/b.jpg"]));
    }

    #[test]
    fn test_plan_update_ignores_unknown_urls() {
        let existing = strings(&["https://cdn/a.jpg"]);
        let incoming = strings(&["https://elsewhere/x.jpg", "https://cdn/a.jpg"]);

        let plan = plan_update(&existing, &incoming);
        assert_eq!(plan.retained, strings(&["https://cdn/a.jpg"]));
        assert!(plan.to_upload.is_empty());
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn test_fresh_uploads_excludes_retained() {
        let existing = strings(&["https://cdn/a.jpg", "https://cdn/b.jpg"]);
        let incoming = strings(&["https://cdn/a.jpg", "data:image/png;base64,AAAA"]);
        let plan = plan_update(&existing, &incoming);

        let images = strings(&["https://cdn/a.jpg", "https://cdn/new.jpg"]);
        assert_eq!(plan.fresh_uploads(&images), strings(&["https://cdn/new.jpg"]));
        assert!(plan.fresh_uploads(&plan.retained).is_empty());
    }
}
