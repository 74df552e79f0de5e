use std::sync::Arc;

use ims_core::upload::FileValidator;

use crate::config::ServerConfig;
use crate::storage::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ims_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upload gate built from `config.upload`.
    pub validator: Arc<FileValidator>,
    /// Storage for invoice files below the media root.
    pub store: Arc<FileStore>,
}

impl AppState {
    pub fn new(pool: ims_db::DbPool, config: ServerConfig) -> Self {
        let validator = FileValidator::new(config.upload.clone());
        let store = FileStore::new(config.media.root.clone());
        Self {
            pool,
            config: Arc::new(config),
            validator: Arc::new(validator),
            store: Arc::new(store),
        }
    }
}
