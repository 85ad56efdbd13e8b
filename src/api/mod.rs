use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod error;
mod history;
pub mod identity;
mod observability;
mod system;
mod types;
mod validation;
mod weather;
mod web;

pub use error::ApiError;
pub use identity::{VISITOR_COOKIE, Visitor, VisitorCookie};
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,

    /// Copied from `server.secure_cookies` at startup
    pub secure_cookies: bool,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let secure_cookies = shared.config.read().await.server.secure_cookies;

    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
        secure_cookies,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle).await)
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .merge(create_visitor_api_router(state.clone()));

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(create_web_router(state.clone()))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state,
            identity::visitor_cookie_middleware,
        ))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// JSON routes that act on behalf of the anonymous visitor.
fn create_visitor_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/suggest", get(weather::suggest_cities))
        .route("/weather", get(weather::get_weather))
        .route("/history", get(history::get_history))
        .route("/stats", get(history::get_stats))
        .route("/user/stats", get(history::get_user_stats))
        .route_layer(middleware::from_fn_with_state(
            state,
            identity::identity_middleware,
        ))
}

fn create_web_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(web::index))
        .route("/weather", post(web::weather_page))
        .route_layer(middleware::from_fn_with_state(
            state,
            identity::identity_middleware,
        ))
}
