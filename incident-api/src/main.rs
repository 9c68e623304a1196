use incident_api::{app, logging, AppState, Config, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    logging::init(config.log.format);
    tracing::info!("Configuration loaded successfully");

    // Initialize database connections
    let db = Database::connect(&config.database).await?;
    tracing::info!("Database connections established");

    // Run database migrations
    db.run_migrations().await?;

    // Build application state
    let state = AppState { db, config: config.clone() };

    // Build router
    let app = app::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(static_dir = %config.web.static_dir, "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
