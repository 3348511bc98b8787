#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use kistpark_admin::api::{router, AppState};
use kistpark_admin::auth::{AuthError, Claims, TokenVerifier};
use kistpark_admin::config::Config;
use kistpark_admin::media::cloudinary::public_id_from_url;
use kistpark_admin::media::data_uri::DataUri;
use kistpark_admin::media::{ImageHost, MediaError, UploadOptions, UploadedImage};
use kistpark_admin::repositories::{NewUser, UserRepository};
use kistpark_admin::storage::LocalStorage;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const STAFF_TOKEN: &str = "staff-token";
pub const BLOCKED_TOKEN: &str = "blocked-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";
pub const EXPIRED_TOKEN: &str = "expired-token";

pub const ADMIN_EMAIL: &str = "admin@kistpark.test";
pub const STAFF_EMAIL: &str = "staff@kistpark.test";
pub const BLOCKED_EMAIL: &str = "blocked@kistpark.test";
pub const OUTSIDER_EMAIL: &str = "outsider@kistpark.test";

/// Maps fixed tokens to fixed identities.
pub struct FakeVerifier;

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let email = match token {
            ADMIN_TOKEN => ADMIN_EMAIL,
            STAFF_TOKEN => STAFF_EMAIL,
            BLOCKED_TOKEN => BLOCKED_EMAIL,
            OUTSIDER_TOKEN => OUTSIDER_EMAIL,
            EXPIRED_TOKEN => return Err(AuthError::Expired),
            _ => return Err(AuthError::Invalid("unknown test token".to_string())),
        };
        Ok(Claims {
            sub: format!("sub-{}", email),
            email: email.to_string(),
            name: Some(email.to_string()),
            picture: None,
            exp: i64::MAX,
        })
    }
}

/// Image host keeping everything in memory.
#[derive(Default)]
pub struct MemoryHost {
    pub uploads: Mutex<Vec<(usize, UploadOptions)>>,
    pub destroyed: Mutex<Vec<String>>,
    pub fail_uploads: AtomicBool,
    pub upload_delay: Mutex<Option<Duration>>,
}

impl MemoryHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_uploads.store(failing, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for MemoryHost {
    fn provider(&self) -> &str {
        "memory"
    }

    async fn upload(&self, data_uri: &str, options: &UploadOptions) -> Result<UploadedImage, MediaError> {
        let delay = *self.upload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Upload("host unavailable".to_string()));
        }

        let size = DataUri::parse(data_uri)?.data.len();
        let mut uploads = self.uploads.lock().unwrap();
        let public_id = format!("kistpark/img{}", uploads.len() + 1);
        uploads.push((size, options.clone()));

        Ok(UploadedImage {
            url: format!("https://res.cloudinary.com/test/image/upload/v1700000000/{}.png", public_id),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<bool, MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(true)
    }

    fn public_id_from_url(&self, url: &str) -> Option<String> {
        public_id_from_url(url)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub host: Arc<MemoryHost>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Config::default()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let storage = LocalStorage::in_memory().await.unwrap();
    for (email, is_allowed, is_admin) in [
        (ADMIN_EMAIL, true, true),
        (STAFF_EMAIL, true, false),
        (BLOCKED_EMAIL, false, false),
    ] {
        UserRepository::create(
            &storage.conn,
            NewUser {
                name: email.to_string(),
                email: email.to_string(),
                avatar: None,
                is_allowed,
                is_admin,
            },
        )
        .await
        .unwrap();
    }

    let host = MemoryHost::new();
    let state = AppState::new(config, storage, Arc::new(FakeVerifier), host.clone());
    TestApp {
        router: router(state.clone()),
        state,
        host,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Wait for background cleanup to destroy at least `count` images.
    pub async fn wait_for_destroyed(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let destroyed = self.host.destroyed();
            if destroyed.len() >= count {
                return destroyed;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.host.destroyed()
    }
}

/// Small inline image; the memory host never decodes it.
pub fn data_uri(tag: u8) -> String {
    DataUri::new("image/png", vec![tag; 64]).encode()
}

pub fn total_count(response: &TestResponse) -> u64 {
    response
        .headers
        .get("x-total-count")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap()
}
