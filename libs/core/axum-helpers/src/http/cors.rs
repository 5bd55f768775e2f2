use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, Environment, server::ServerConfig};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// CORS layer for an explicit list of origins.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - Max age: 1 hour
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Picks the CORS policy for `environment`.
///
/// Configured origins always win. Without them, development falls back to the
/// permissive layer and production refuses to start.
pub fn cors_layer_from_config(
    config: &ServerConfig,
    environment: &Environment,
) -> Result<CorsLayer, ConfigError> {
    if config.cors_allowed_origins.is_empty() {
        if environment.is_production() {
            return Err(ConfigError::Invalid(
                "CORS_ALLOWED_ORIGIN must be set in production".to_string(),
            ));
        }
        warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
        return Ok(create_permissive_cors_layer());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: format!("{}: {}", origin, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(origins = ?config.cors_allowed_origins, "CORS configured");
    Ok(create_cors_layer(origins))
}
