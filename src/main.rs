use agenda_api::config::ApiConfig;
use agenda_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration and start logging before anything can fail
    let config = ApiConfig::from_env()?;
    agenda_api::init_tracing(config.log_level)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    agenda_api::start_server(config, db_pool).await?;

    Ok(())
}
