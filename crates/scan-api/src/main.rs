//! HTTP API for the object-scanner app.
//!
//! Hosts three JSON route groups: phone accounts, image scans, and
//! Yandex OAuth sign-in/linking.

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use vision::VisionClient;
use yandex_oauth::YandexClient;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting scan API server");

    // Connect to database
    let db = Database::connect(&config.database_url, &config.schema).await?;
    db.migrate().await?;

    // Outbound clients are optional at startup; routes that need a
    // missing one answer with a configuration error instead.
    let vision = match VisionClient::from_env() {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(%err, "Vision classifier disabled");
            None
        }
    };

    let yandex = match YandexClient::from_env() {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(%err, "Yandex OAuth disabled");
            None
        }
    };

    // Build application state
    let state = AppState::new(db, vision, yandex);

    // Every response carries permissive cross-origin headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Scan API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
