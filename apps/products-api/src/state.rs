//! Application state management

use sea_orm::DatabaseConnection;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Absent when running on the in-memory store
    pub db: Option<DatabaseConnection>,
}
