use std::sync::Arc;

use pwa_backend::config::AppConfig;
use pwa_backend::push::{PushTransport, WebPushTransport};
use pwa_backend::services::notification_service::{NotificationService, PayloadDefaults};
use pwa_backend::store::{PgUserStore, UserStore};
use pwa_backend::AppState;
use pwa_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pwa_shared::middleware::init_tracing("pwa-backend");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = pwa_shared::middleware::init_metrics()?;

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db));

    let transport: Arc<dyn PushTransport> = Arc::new(WebPushTransport::new(
        &config.vapid_private_key,
        &config.vapid_subject,
        config.push_ttl_secs,
    )?);

    let notifications = NotificationService::new(
        users.clone(),
        transport,
        PayloadDefaults::from_config(&config),
        config.push_timeout(),
    );

    let state = Arc::new(AppState { config, users, notifications, metrics_handle });
    let app = pwa_backend::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "pwa-backend starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
