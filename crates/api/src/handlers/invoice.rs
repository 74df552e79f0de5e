//! Handlers for the `/invoices` resource.
//!
//! Writes are multipart. The uploaded file is validated, then stored, then the
//! row is written; a stored file whose row could not be written is removed.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ims_core::error::CoreError;
use ims_core::invoice_filter::InvoiceFilterParams;
use ims_core::types::DbId;
use ims_core::upload::FileValidationError;
use ims_db::models::invoice::UpdateInvoice;
use ims_db::repositories::{InvoiceRepo, VendorRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiMultipart, ApiPath, ApiQuery};
use crate::form::{InvoiceForm, UploadedFile};
use crate::response::InvoiceResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Invoice",
        id,
    })
}

/// POST /api/invoices
pub async fn create(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<InvoiceResponse>)> {
    let form = InvoiceForm::from_multipart(multipart, state.validator.config()).await?;
    let (fields, file) = form.into_create()?;
    ensure_vendor(&state, fields.vendor_id).await?;
    let file = require_file(&state, file)?;

    let file_path = store_file(&state, &file).await?;
    let result = InvoiceRepo::create(&state.pool, &fields.with_file(file_path.clone()))
        .await
        .map(Some);
    let invoice = discard_on_failure(&state, &file_path, result)
        .await?
        .ok_or_else(|| AppError::InternalError("Insert returned no row".into()))?;

    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        vendor_id = invoice.vendor_id,
        "Invoice created",
    );
    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse::from_invoice(invoice, &state.config.media)),
    ))
}

/// GET /api/invoices
///
/// Accepts the filter, `search` and `ordering` parameters of
/// [`InvoiceFilterParams`].
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<InvoiceFilterParams>,
) -> AppResult<Json<Vec<InvoiceResponse>>> {
    let query = params.into_query()?;
    let invoices = InvoiceRepo::list(&state.pool, &query).await?;
    Ok(Json(InvoiceResponse::from_invoices(
        invoices,
        &state.config.media,
    )))
}

/// GET /api/invoices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<InvoiceResponse>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(InvoiceResponse::from_invoice(
        invoice,
        &state.config.media,
    )))
}

/// PUT /api/invoices/{id}
///
/// Same required fields as create, including the file. An omitted `status`
/// keeps the stored one.
pub async fn replace(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<InvoiceResponse>> {
    if InvoiceRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let form = InvoiceForm::from_multipart(multipart, state.validator.config()).await?;
    let (fields, file) = form.into_create()?;
    ensure_vendor(&state, fields.vendor_id).await?;
    let file = require_file(&state, file)?;

    let file_path = store_file(&state, &file).await?;
    let input = UpdateInvoice::from(fields.with_file(file_path.clone()));
    let result = InvoiceRepo::update(&state.pool, id, &input).await;
    let invoice = discard_on_failure(&state, &file_path, result)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(invoice_id = id, "Invoice replaced");
    Ok(Json(InvoiceResponse::from_invoice(
        invoice,
        &state.config.media,
    )))
}

/// PATCH /api/invoices/{id}
///
/// Only supplied fields change. A supplied file is validated like on create.
pub async fn partial_update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<InvoiceResponse>> {
    if InvoiceRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let form = InvoiceForm::from_multipart(multipart, state.validator.config()).await?;
    let (patch, file) = form.into_patch()?;
    if let Some(vendor_id) = patch.vendor_id {
        ensure_vendor(&state, vendor_id).await?;
    }

    let file_path = match file {
        Some(file) => {
            check_file(&state, Some(&file))?;
            Some(store_file(&state, &file).await?)
        }
        None => None,
    };

    let result = InvoiceRepo::update(&state.pool, id, &patch.with_file(file_path.clone())).await;
    let invoice = match &file_path {
        Some(path) => discard_on_failure(&state, path, result).await?,
        None => result?,
    }
    .ok_or_else(|| not_found(id))?;

    tracing::info!(invoice_id = id, file_replaced = file_path.is_some(), "Invoice updated");
    Ok(Json(InvoiceResponse::from_invoice(
        invoice,
        &state.config.media,
    )))
}

/// DELETE /api/invoices/{id}
///
/// The stored file is left in place.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if InvoiceRepo::delete(&state.pool, id).await? {
        tracing::info!(invoice_id = id, "Invoice deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject references to vendors that do not exist.
async fn ensure_vendor(state: &AppState, vendor_id: DbId) -> AppResult<()> {
    if VendorRepo::exists(&state.pool, vendor_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "vendor: Invalid pk \"{vendor_id}\" - object does not exist."
        ))))
    }
}

/// Run the upload gate. `None` fails with [`FileValidationError::MissingFile`].
fn check_file(state: &AppState, file: Option<&UploadedFile>) -> AppResult<()> {
    let candidate = file.map(UploadedFile::candidate);
    if let Err(err) = state.validator.validate(candidate.as_ref()) {
        tracing::info!(
            file_name = candidate.map(|c| c.name),
            size_bytes = candidate.map(|c| c.size_bytes),
            error = %err,
            "Rejected invoice upload",
        );
        return Err(err.into());
    }
    Ok(())
}

fn require_file(state: &AppState, file: Option<UploadedFile>) -> AppResult<UploadedFile> {
    check_file(state, file.as_ref())?;
    file.ok_or_else(|| FileValidationError::MissingFile.into())
}

async fn store_file(state: &AppState, file: &UploadedFile) -> AppResult<String> {
    state
        .store
        .save(&file.file_name, &file.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store file: {e}")))
}

/// Pass `result` through, removing the freshly stored file unless a row was
/// written.
async fn discard_on_failure<T>(
    state: &AppState,
    file_path: &str,
    result: Result<Option<T>, sqlx::Error>,
) -> Result<Option<T>, sqlx::Error> {
    if !matches!(result, Ok(Some(_))) {
        if let Err(e) = state.store.remove(file_path).await {
            tracing::warn!(path = %file_path, error = %e, "Failed to remove orphaned file");
        }
    }
    result
}
