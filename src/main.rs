// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::credential_store::FileCredentialStore;
use crate::infrastructure::gemini_client::GeminiAnalyzer;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer); no API key means no service
    let analyzer = Arc::new(GeminiAnalyzer::new(&config.gemini)?);
    let credential_store = Arc::new(FileCredentialStore::new(&config.auth.store_path));

    // Create services (application layer)
    let auth_service = AuthService::new(credential_store, config.auth.simulated_delay());
    let dashboard_service = DashboardService::new(analyzer, config.dashboard.notice_ttl());

    // Create application state
    let state = Arc::new(AppState {
        auth_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = build_router(state, config.server.max_upload_bytes);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_addr))?;
    tracing::info!(model = %config.gemini.model, "Starting supermarket-insights service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
