//! Configuration management for kistpark-admin
//!
//! This module handles loading, parsing, and validation of configuration files.
//! Secrets (OAuth client id, image host credentials) are never written to the
//! file itself: the file names the environment variables that hold them.

use crate::constants::{
    APP_NAME, CONFIG_GENERATED, DEFAULT_ALLOWED_ORIGIN, DEFAULT_BIND_ADDR, DEFAULT_DELETE_TIMEOUT_SECS,
    DEFAULT_UPLOAD_TIMEOUT_SECS, HIGHLIGHT_IMAGE_WIDTH, HIGHLIGHT_MAX_IMAGES, HIGHLIGHT_MAX_IMAGE_BYTES,
    PRESS_RELEASE_IMAGE_WIDTH, PRESS_RELEASE_MAX_IMAGES, PRESS_RELEASE_MAX_IMAGE_BYTES,
};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Environment variable holding a comma-separated origin list that
    /// replaces `allowed_origins` when set
    pub allowed_origins_env: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: String,
    /// Environment variable overriding `url` when set
    pub url_env: String,
    /// Insert the 17 SDG labels on startup
    pub seed_sdgs: bool,
}

/// Authentication and authorization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding the Google OAuth client id
    pub google_client_id_env: String,
    /// Google tokeninfo endpoint used to verify ID tokens
    pub tokeninfo_url: String,
    /// Reject authenticated requests from users without `is_allowed`
    pub enforce_allow_list: bool,
    /// Value of `is_allowed` for users created on first login
    pub auto_allow_new_users: bool,
    /// Emails created as allowed administrators on first login
    pub admin_emails: Vec<String>,
}

/// Image host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Image host provider: "cloudinary" or "disabled"
    pub provider: String,
    pub cloud_name_env: String,
    pub api_key_env: String,
    pub api_secret_env: String,
    /// Base URL of the Cloudinary API
    pub api_base_url: String,
    pub delete_timeout_secs: u64,
    pub highlights: UploadProfileConfig,
    #[serde(deserialize_with = "press_release_profile")]
    pub press_releases: UploadProfileConfig,
}

/// Per-resource upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadProfileConfig {
    /// Images beyond this count are ignored
    pub max_images: usize,
    /// Byte budget for a single decoded image
    pub max_bytes: usize,
    /// Hosted images are limited to this width
    pub width_limit: u32,
    /// Host-side quality preset
    pub quality: String,
    pub upload_timeout_secs: u64,
}

/// Fields set in a partial upload profile table
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadProfileOverrides {
    max_images: Option<usize>,
    max_bytes: Option<usize>,
    width_limit: Option<u32>,
    quality: Option<String>,
    upload_timeout_secs: Option<u64>,
}

impl UploadProfileOverrides {
    fn apply(self, base: UploadProfileConfig) -> UploadProfileConfig {
        UploadProfileConfig {
            max_images: self.max_images.unwrap_or(base.max_images),
            max_bytes: self.max_bytes.unwrap_or(base.max_bytes),
            width_limit: self.width_limit.unwrap_or(base.width_limit),
            quality: self.quality.unwrap_or(base.quality),
            upload_timeout_secs: self.upload_timeout_secs.unwrap_or(base.upload_timeout_secs),
        }
    }
}

/// Missing press release fields fall back to the press release defaults,
/// not the highlight ones
fn press_release_profile<'de, D>(deserializer: D) -> std::result::Result<UploadProfileConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = UploadProfileOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(UploadProfileConfig::press_releases()))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Minimum level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
    /// Optional log file, in addition to stdout
    pub file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            allowed_origins_env: "ALLOWED_ORIGINS".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: format!("sqlite://{}.db?mode=rwc", APP_NAME),
            url_env: "DATABASE_URL".to_string(),
            seed_sdgs: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google_client_id_env: "GOOGLE_CLIENT_ID".to_string(),
            tokeninfo_url: "https://oauth2.googleapis.com/tokeninfo".to_string(),
            enforce_allow_list: true,
            auto_allow_new_users: true,
            admin_emails: Vec::new(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: "cloudinary".to_string(),
            cloud_name_env: "CLOUDINARY_CLOUD_NAME".to_string(),
            api_key_env: "CLOUDINARY_API_KEY".to_string(),
            api_secret_env: "CLOUDINARY_API_SECRET".to_string(),
            api_base_url: "https://api.cloudinary.com".to_string(),
            delete_timeout_secs: DEFAULT_DELETE_TIMEOUT_SECS,
            highlights: UploadProfileConfig::default(),
            press_releases: UploadProfileConfig::press_releases(),
        }
    }
}

impl Default for UploadProfileConfig {
    fn default() -> Self {
        Self {
            max_images: HIGHLIGHT_MAX_IMAGES,
            max_bytes: HIGHLIGHT_MAX_IMAGE_BYTES,
            width_limit: HIGHLIGHT_IMAGE_WIDTH,
            quality: "auto:good".to_string(),
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl UploadProfileConfig {
    /// Limits for the single press release cover image
    pub fn press_releases() -> Self {
        Self {
            max_images: PRESS_RELEASE_MAX_IMAGES,
            max_bytes: PRESS_RELEASE_MAX_IMAGE_BYTES,
            width_limit: PRESS_RELEASE_IMAGE_WIDTH,
            quality: "auto:low".to_string(),
            upload_timeout_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ServerConfig {
    /// Parse the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid server bind address: {}", self.bind))
    }

    /// Effective CORS origins, taking the environment override into account
    pub fn effective_origins(&self) -> Vec<String> {
        match std::env::var(&self.allowed_origins_env) {
            Ok(value) if !value.trim().is_empty() => value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            _ => self.allowed_origins.clone(),
        }
    }
}

impl DatabaseConfig {
    /// Effective connection URL, taking the environment override into account
    pub fn effective_url(&self) -> String {
        match std::env::var(&self.url_env) {
            Ok(url) if !url.is_empty() => url,
            _ => self.url.clone(),
        }
    }
}

impl AuthConfig {
    /// Read the Google OAuth client id from its environment variable
    pub fn google_client_id(&self) -> Result<String> {
        read_env(&self.google_client_id_env)
    }

    /// Whether the email belongs to a bootstrap administrator
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

/// Cloudinary credentials resolved from the environment
#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl MediaConfig {
    /// Resolve Cloudinary credentials from the configured environment variables
    pub fn cloudinary_credentials(&self) -> Result<CloudinaryCredentials> {
        Ok(CloudinaryCredentials {
            cloud_name: read_env(&self.cloud_name_env)?,
            api_key: read_env(&self.api_key_env)?,
            api_secret: read_env(&self.api_secret_env)?,
        })
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => anyhow::bail!("{} environment variable not set", name),
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from(format!("{}.toml", APP_NAME));
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join(APP_NAME).join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;

        if self.database.effective_url().is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }

        if self.auth.google_client_id_env.is_empty() {
            anyhow::bail!("auth.google_client_id_env cannot be empty");
        }
        if self.auth.tokeninfo_url.is_empty() {
            anyhow::bail!("auth.tokeninfo_url cannot be empty");
        }

        match self.media.provider.as_str() {
            "cloudinary" => {
                for (key, value) in [
                    ("cloud_name_env", &self.media.cloud_name_env),
                    ("api_key_env", &self.media.api_key_env),
                    ("api_secret_env", &self.media.api_secret_env),
                ] {
                    if value.is_empty() {
                        anyhow::bail!("media.{} cannot be empty", key);
                    }
                }
            }
            "disabled" => {}
            provider => anyhow::bail!("Unsupported media provider '{}'", provider),
        }

        Self::validate_profile("highlights", &self.media.highlights)?;
        Self::validate_profile("press_releases", &self.media.press_releases)?;

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        Ok(())
    }

    fn validate_profile(name: &str, profile: &UploadProfileConfig) -> Result<()> {
        if profile.max_images == 0 {
            anyhow::bail!("media.{}.max_images must be at least 1", name);
        }
        if profile.max_bytes < 1024 {
            anyhow::bail!("media.{}.max_bytes must be at least 1024, got {}", name, profile.max_bytes);
        }
        if profile.width_limit == 0 {
            anyhow::bail!("media.{}.width_limit must be positive", name);
        }
        if profile.upload_timeout_secs == 0 || profile.upload_timeout_secs > 600 {
            anyhow::bail!("media.{}.upload_timeout_secs must be between 1 and 600", name);
        }
        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# KIST Park Admin Configuration File\n# Generated on {}\n\n",
            datetime::format_today()
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(APP_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
