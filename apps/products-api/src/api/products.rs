//! Products API routes

use axum::Router;
use domain_products::{handlers, InMemoryProductRepository, PgProductRepository, ProductService};
use tracing::warn;

use crate::state::AppState;

/// Create products router over PostgreSQL, or the in-memory store without a database
pub fn router(state: &AppState) -> Router {
    match &state.db {
        Some(db) => {
            let repository = PgProductRepository::new(db.clone());
            handlers::router(ProductService::new(repository))
        }
        None => {
            warn!("DATABASE_URL not set, products are kept in memory");
            handlers::router(ProductService::new(InMemoryProductRepository::new()))
        }
    }
}
