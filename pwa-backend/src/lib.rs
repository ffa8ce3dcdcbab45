pub mod config;
pub mod models;
pub mod push;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::services::notification_service::NotificationService;
use crate::store::UserStore;

pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserStore>,
    pub notifications: NotificationService,
    pub metrics_handle: PrometheusHandle,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root::index))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/api/register", post(routes::users::register))
        .route("/api/users", get(routes::users::list_users))
        .route("/api/user/:id", get(routes::users::get_user))
        .route("/api/notifications/subscribe", post(routes::notifications::subscribe))
        .route("/api/notifications/send", post(routes::notifications::send))
        .route("/api/notifications/send-to-user", post(routes::notifications::send_to_user))
        .route("/api/notifications/public-key", get(routes::notifications::public_key))
        .fallback(routes::root::not_found)
        .method_not_allowed_fallback(routes::root::method_not_allowed)
        .layer(axum::middleware::from_fn(pwa_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
