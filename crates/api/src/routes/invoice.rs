//! Route definitions for the `/invoices` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::invoice;
use crate::state::AppState;

/// Room for the non-file form parts and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create (multipart)
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> replace (multipart)
/// PATCH  /{id}      -> partial_update (multipart)
/// DELETE /{id}      -> delete
/// ```
///
/// Bodies may exceed the file size cap by [`FORM_OVERHEAD_BYTES`]; oversized
/// files are then reported by the upload validator.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    let body_limit = usize::try_from(config.upload.max_size_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(invoice::list).post(invoice::create))
        .route(
            "/{id}",
            get(invoice::get_by_id)
                .put(invoice::replace)
                .patch(invoice::partial_update)
                .delete(invoice::delete),
        )
        .layer(DefaultBodyLimit::max(body_limit))
}
