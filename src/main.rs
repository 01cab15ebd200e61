use gradebook::bootstrap;
use gradebook::config::Config;
use gradebook::infrastructure::http::router::build_router;
use gradebook::infrastructure::observability;
use gradebook::infrastructure::persistence::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _guard = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    // A storage outage at boot is not fatal: requests fail until it recovers
    let db = match Database::connect(&config.database_url).await {
        Ok(db) => {
            tracing::info!("Database connection established");
            db
        }
        Err(e) => {
            tracing::error!("Database connection failed, continuing lazily: {}", e);
            Database::connect_lazy(&config.database_url)?
        }
    };

    match db.run_migrations().await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(e) => tracing::error!("Failed to apply migrations: {}", e),
    }

    if let Err(e) = db.ping().await {
        tracing::error!("Database ping failed: {}", e);
    }

    let state = bootstrap::build_app_state(db, &config);

    if let Some(path) = &config.features_seed_path {
        if let Err(e) = bootstrap::seed_features(&state, path).await {
            tracing::error!("Failed to seed features from {}: {}", path, e);
        }
    }

    let app = build_router(state, &config.allowed_origins);

    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
