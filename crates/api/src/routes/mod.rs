pub mod health;
pub mod invoice;
pub mod vendor;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /vendors                                list, create
/// /vendors/{id}                           get, replace, update, delete
/// /vendors/{id}/invoices                  invoices of one vendor
///
/// /invoices                               list (filters, search, ordering), create
/// /invoices/{id}                          get, replace, update, delete
/// ```
///
/// Every path also answers with a trailing slash.
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/vendors", vendor::router())
        .nest("/invoices", invoice::router(config))
}
