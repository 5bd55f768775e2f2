//! Products API - REST server for the product catalog

use axum_helpers::{
    cors_layer_from_config,
    server::{create_production_app, create_router, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment, &config.app);

    let db = match config.postgres.clone() {
        Some(postgres) => {
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(postgres, None).await?;

            if config.run_migrations {
                run_migrations::<migration::Migrator>(&db, config.app.name).await?;
            }
            Some(db)
        }
        None => None,
    };

    let state = AppState {
        config: config.clone(),
        db,
    };

    let cors = cors_layer_from_config(&config.server, &config.environment)?;
    let api_routes = api::routes(&state).merge(health_router(config.app));
    let app = create_router::<openapi::ApiDoc>(api_routes, cors);

    info!(
        name = config.app.name,
        version = config.app.version,
        port = config.server.port,
        "Starting Products API"
    );

    create_production_app(app, &config.server, async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = db.close().await {
                tracing::warn!(error = %e, "Failed to close PostgreSQL pool");
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
