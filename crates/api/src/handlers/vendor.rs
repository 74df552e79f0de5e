//! Handlers for the `/vendors` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ims_core::error::CoreError;
use ims_core::types::DbId;
use ims_core::vendor_filter::{VendorFilter, VendorFilterParams};
use ims_db::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use ims_db::repositories::{InvoiceRepo, VendorRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::InvoiceResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Vendor",
        id,
    })
}

/// POST /api/vendors
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateVendor>,
) -> AppResult<(StatusCode, Json<Vendor>)> {
    input.validate()?;
    let vendor = VendorRepo::create(&state.pool, &input).await?;
    tracing::info!(vendor_id = vendor.id, name = %vendor.name, "Vendor created");
    Ok((StatusCode::CREATED, Json(vendor)))
}

/// GET /api/vendors
///
/// Optional filters: `name` and `email` (exact), `search` (name, email, address).
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VendorFilterParams>,
) -> AppResult<Json<Vec<Vendor>>> {
    let filter = VendorFilter::from(params);
    let vendors = VendorRepo::list(&state.pool, &filter).await?;
    Ok(Json(vendors))
}

/// GET /api/vendors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Vendor>> {
    let vendor = VendorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(vendor))
}

/// PUT /api/vendors/{id}
pub async fn replace(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<CreateVendor>,
) -> AppResult<Json<Vendor>> {
    input.validate()?;
    let vendor = VendorRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(vendor))
}

/// PATCH /api/vendors/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateVendor>,
) -> AppResult<Json<Vendor>> {
    input.validate()?;
    let vendor = VendorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(vendor))
}

/// DELETE /api/vendors/{id}
///
/// Removes the vendor's invoices with it.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if VendorRepo::delete(&state.pool, id).await? {
        tracing::info!(vendor_id = id, "Vendor deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/vendors/{id}/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Vec<InvoiceResponse>>> {
    if !VendorRepo::exists(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let invoices = InvoiceRepo::list_by_vendor(&state.pool, id).await?;
    Ok(Json(InvoiceResponse::from_invoices(
        invoices,
        &state.config.media,
    )))
}
