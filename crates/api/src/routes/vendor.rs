//! Route definitions for the `/vendors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::vendor;
use crate::state::AppState;

/// Routes mounted at `/vendors`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> replace
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/invoices     -> list_invoices
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vendor::list).post(vendor::create))
        .route(
            "/{id}",
            get(vendor::get_by_id)
                .put(vendor::replace)
                .patch(vendor::update)
                .delete(vendor::delete),
        )
        .route("/{id}/invoices", get(vendor::list_invoices))
}
