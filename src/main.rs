use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use booking_agent::config::AppConfig;
use booking_agent::handlers;
use booking_agent::services::notification::smtp::{SmtpDispatcher, SmtpSettings};
use booking_agent::services::notification::NotificationDispatcher;
use booking_agent::services::sessions::SessionRegistry;
use booking_agent::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.agent_token.is_empty() {
        tracing::warn!("AGENT_TOKEN not set, tool API is unauthenticated");
    }

    let dispatcher = SmtpDispatcher::new(SmtpSettings::from(&config))
        .context("failed to configure SMTP dispatcher")?;
    let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(dispatcher);

    let state = Arc::new(AppState {
        sessions: SessionRegistry::new(dispatcher, config.session_ttl),
        config: config.clone(),
    });

    let sweeper = Arc::clone(&state);
    tokio::spawn(async move {
        sweeper
            .sessions
            .sweep_periodically(sweeper.config.sweep_interval)
            .await;
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
