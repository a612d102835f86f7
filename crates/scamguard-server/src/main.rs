mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scamguard_ai::{AnthropicClient, ClassifierConfig};
use scamguard_api::AppStateInner;
use scamguard_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "scamguard_server=debug,scamguard_api=debug,scamguard_db=info,scamguard_ai=info,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let config = Config::load()?;

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);

    let classifier = Arc::new(AnthropicClient::new(ClassifierConfig {
        api_key: config.ai_api_key.clone(),
        api_base: config.ai_api_base.clone(),
        analysis_model: config.analysis_model.clone(),
        moderation_model: config.moderation_model.clone(),
    }));

    // Shared state
    let state = Arc::new(AppStateInner {
        db,
        classifier,
        jwt_secret: config.jwt_secret.clone(),
        sweep_secret: config.sweep_secret.clone(),
        limits: config.limits,
        sweep: config.sweep,
    });

    let app = scamguard_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Scamguard server listening on {}", addr);
    info!(
        "Free-tier limits: {} checks, {} scenarios, {} posts per day",
        config.limits.checks, config.limits.scenarios, config.limits.posts
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
