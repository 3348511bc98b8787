//! Cloudinary image host.
//!
//! Uploads and destroys go through the signed REST API. Requests are signed by
//! sorting the signed parameters by name, joining them as `k=v&k=v`, appending
//! the API secret and hashing the result with SHA-256.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::{ImageHost, MediaError, UploadOptions, UploadedImage};
use crate::config::CloudinaryCredentials;

static VERSION_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v\d+/").expect("valid version regex"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cloudinary implementation of [`ImageHost`].
pub struct CloudinaryHost {
    client: reqwest::Client,
    api_base_url: String,
    credentials: CloudinaryCredentials,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryHost {
    pub fn new(credentials: CloudinaryCredentials, api_base_url: impl Into<String>) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MediaError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into(),
            credentials,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.api_base_url.trim_end_matches('/'),
            self.credentials.cloud_name,
            action
        )
    }

    /// Build the form for a signed request: the signed params plus key and signature.
    fn signed_form(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        let signature = sign(&params, &self.credentials.api_secret);
        params.push(("api_key", self.credentials.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params
    }

    async fn post_form(&self, action: &str, form: &[(&'static str, String)]) -> Result<reqwest::Response, MediaError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .form(form)
            .send()
            .await
            .map_err(|e| MediaError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("{}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    fn provider(&self) -> &str {
        "cloudinary"
    }

    async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedImage, MediaError> {
        let mut form = self.signed_form(vec![
            ("overwrite", "false".to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
            ("transformation", transformation(options)),
            ("unique_filename", "true".to_string()),
        ]);
        form.push(("file", data_uri.to_string()));

        let response: UploadResponse = self
            .post_form("upload", &form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Upload(format!("Malformed upload response: {}", e)))?;

        let url = response
            .secure_url
            .or(response.url)
            .ok_or_else(|| MediaError::Upload("Upload response carried no URL".to_string()))?;

        info!("☁️  Uploaded image {}", response.public_id);
        Ok(UploadedImage {
            url,
            public_id: response.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<bool, MediaError> {
        let form = self.signed_form(vec![
            ("public_id", public_id.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ]);

        let response: DestroyResponse = self
            .post_form("destroy", &form)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Upload(format!("Malformed destroy response: {}", e)))?;

        match response.result.as_str() {
            "ok" => {
                debug!("Destroyed image {}", public_id);
                Ok(true)
            }
            other => {
                warn!("⚠️  Destroy of {} returned '{}'", public_id, other);
                Ok(false)
            }
        }
    }

    fn public_id_from_url(&self, url: &str) -> Option<String> {
        public_id_from_url(url)
    }
}

/// Incoming transformation applied to every upload.
pub fn transformation(options: &UploadOptions) -> String {
    format!("c_limit,w_{}/q_{}", options.width_limit, options.quality)
}

/// Sign request parameters with the API secret.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, value)| !value.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{}{}", to_sign, api_secret).as_bytes()))
}

/// Extract the public id from a Cloudinary delivery URL.
///
/// `https://res.cloudinary.com/demo/image/upload/v1712345678/folder/cat.jpg`
/// yields `folder/cat`.
pub fn public_id_from_url(url: &str) -> Option<String> {
    if !url.starts_with("http") {
        return None;
    }

    let (_, path) = url.split_once("/upload/")?;
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = VERSION_SEGMENT.replace(path, "");

    let public_id = match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => &path[..],
    };

    if public_id.is_empty() {
        None
    } else {
        Some(public_id.to_string())
    }
}
