//! # Agenda API
//!
//! The API crate provides the agenda service: the scheduling engine and the
//! HTTP endpoints that expose it.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Engine**: Slot creation, availability and the booking flow
//! - **Notifier**: Client for the notification service
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests to engine calls and results to responses
//! - **Middleware**: Error to response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Scheduling engine
pub mod engine;
/// Request handlers
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Notification service clients
pub mod notifier;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use agenda_core::notifier::Notifier;
use agenda_db::{store::PgAgendaStore, DbPool};
use axum::Router;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::engine::SchedulingEngine;
use crate::notifier::{DisabledNotifier, HttpNotifier};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Scheduling engine wired to the store and the notifier
    pub engine: SchedulingEngine,
}

/// Installs the global tracing subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the router with all agenda and health routes.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot and appointment endpoints
        .merge(routes::agenda::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Picks the notifier for the configuration: HTTP when a URL is set,
/// otherwise a disabled stand-in.
pub fn build_notifier(config: &config::ApiConfig) -> Result<Arc<dyn Notifier>> {
    match &config.notifier_url {
        Some(url) => {
            let notifier = HttpNotifier::new(url, config.notifier_timeout())?;
            info!("Sending notifications to {}", notifier.endpoint());
            Ok(Arc::new(notifier))
        }
        None => {
            warn!("NOTIFIER_URL is not set, appointment notifications are disabled");
            Ok(Arc::new(DisabledNotifier))
        }
    }
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = agenda_api::config::ApiConfig::from_env()?;
/// let db_pool = agenda_db::create_pool(&config.database_url, config.max_connections).await?;
/// agenda_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let store = Arc::new(PgAgendaStore::new(db_pool));
    let notifier = build_notifier(&config)?;
    let engine = SchedulingEngine::new(store, notifier)
        .with_timezone(config.timezone)
        .with_dispatch(config.notification_dispatch());

    let state = Arc::new(ApiState { engine });

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout())),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Agenda service listening on http://{} (calendar days in {})",
        addr,
        config.timezone.name()
    );
    axum::serve(listener, app).await?;

    Ok(())
}
