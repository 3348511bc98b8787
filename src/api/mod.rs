//! HTTP surface: the axum router and its shared state.
//!
//! Everything lives under `/api/v1`. Routes fall into three groups:
//!
//! * public routes (user bootstrap, the public website feeds, subscribing),
//! * authenticated routes, guarded by [`middleware::require_auth`],
//! * user management, which additionally requires an administrator.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::{middleware as axum_middleware, Json, Router};
use log::{info, warn};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::constants::{API_PREFIX, JSON_BODY_LIMIT_MB, TOTAL_COUNT_HEADER, WELCOME_MESSAGE};
use crate::media::{ImageHost, ImagePipeline, UploadProfile};
use crate::storage::LocalStorage;

pub mod categories;
pub mod error;
pub mod highlights;
pub mod middleware;
pub mod payload;
pub mod press_releases;
pub mod public;
pub mod query;
pub mod sdgs;
pub mod subscribers;
pub mod user_management;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use middleware::AuthUser;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<LocalStorage>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub images: Arc<ImagePipeline>,
    pub config: Arc<Config>,
    pub highlight_uploads: UploadProfile,
    pub press_release_uploads: UploadProfile,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: LocalStorage,
        verifier: Arc<dyn TokenVerifier>,
        image_host: Arc<dyn ImageHost>,
    ) -> Self {
        let images = ImagePipeline::new(image_host, std::time::Duration::from_secs(config.media.delete_timeout_secs));
        Self {
            highlight_uploads: UploadProfile::from(&config.media.highlights),
            press_release_uploads: UploadProfile::from(&config.media.press_releases),
            storage: Arc::new(storage),
            verifier,
            images: Arc::new(images),
            config: Arc::new(config),
        }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.storage.conn
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/highlights-web", get(public::list_highlights))
        .route("/highlights-web/{id}", get(public::get_highlight))
        .route("/press-release-web", get(public::list_press_releases))
        .route("/press-release-web/{id}", get(public::get_press_release))
        .route("/subscribers", post(subscribers::subscribe));

    let protected = Router::new()
        .route("/test-auth", get(users::test_auth))
        .route("/highlights", get(highlights::list).post(highlights::create))
        .route("/highlights/dashboard-highlights", get(highlights::dashboard))
        .route(
            "/highlights/{id}",
            get(highlights::get_one).patch(highlights::update).delete(highlights::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            patch(categories::rename).delete(categories::delete),
        )
        .route(
            "/press-release",
            get(press_releases::list).post(press_releases::create),
        )
        .route(
            "/press-release/{id}",
            get(press_releases::get_one)
                .patch(press_releases::update)
                .delete(press_releases::delete),
        )
        .route("/subscribers", get(subscribers::list))
        .route("/subscribers/export", get(subscribers::export_csv))
        .route("/subscribers/{ids}", axum::routing::delete(subscribers::delete))
        .route("/sdgs", get(sdgs::list))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), middleware::require_auth));

    let admin = Router::new()
        .route("/user-management", get(user_management::list))
        .route(
            "/user-management/{id}",
            patch(user_management::set_allowed).delete(user_management::delete),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), middleware::require_auth));

    let api = public.merge(protected).merge(admin);

    Router::new()
        .route("/", get(welcome))
        .nest(API_PREFIX, api)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT_MB * 1024 * 1024))
        .layer(cors_layer(&state.config.server.effective_origins()))
        .with_state(state)
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️  Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER)])
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .context("HTTP server error")?;
    Ok(())
}
