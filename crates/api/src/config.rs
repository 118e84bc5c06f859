//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the agenda
//! service. It retrieves configuration values from environment variables and
//! provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 50054)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Size of the connection pool (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `AGENDA_TIMEZONE`: IANA timezone that defines calendar days (default: "UTC")
//! - `NOTIFIER_URL`: Base URL of the notification service (optional)
//! - `NOTIFIER_TIMEOUT_SECONDS`: Timeout for notification calls (default: 5)
//! - `NOTIFY_IN_BACKGROUND`: Send notifications off the request path (default: false)

use agenda_core::time::parse_timezone;
use chrono_tz::Tz;
use eyre::{Result, WrapErr};
use std::env;
use std::time::Duration;
use tracing::Level;

use crate::engine::NotificationDispatch;

/// Configuration for the agenda API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use agenda_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Timezone whose midnights bound a calendar day
    pub timezone: Tz,

    /// Notification service base URL; notifications are disabled when unset
    pub notifier_url: Option<String>,

    /// Notification call timeout in seconds
    pub notifier_timeout: u64,

    /// Whether bookings wait for the notification call
    pub notify_in_background: bool,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric variable cannot be parsed
    /// - AGENDA_TIMEZONE is not a known IANA timezone
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "50054")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;
        let max_connections = var("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?;

        // Scheduling settings
        let timezone = parse_timezone(&var("AGENDA_TIMEZONE", "UTC"))
            .wrap_err("Invalid AGENDA_TIMEZONE value")?;

        // Notification settings
        let notifier_url = lookup("NOTIFIER_URL").filter(|url| !url.trim().is_empty());
        let notifier_timeout = var("NOTIFIER_TIMEOUT_SECONDS", "5")
            .parse()
            .wrap_err("Invalid NOTIFIER_TIMEOUT_SECONDS value")?;
        let notify_in_background = matches!(
            var("NOTIFY_IN_BACKGROUND", "false").to_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            log_level,
            request_timeout,
            timezone,
            notifier_url,
            notifier_timeout,
            notify_in_background,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:50054"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn notifier_timeout(&self) -> Duration {
        Duration::from_secs(self.notifier_timeout)
    }

    pub fn notification_dispatch(&self) -> NotificationDispatch {
        if self.notify_in_background {
            NotificationDispatch::Background
        } else {
            NotificationDispatch::Inline
        }
    }
}
