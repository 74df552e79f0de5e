//! Multipart form reading for invoice writes.
//!
//! Text parts are collected as raw strings first, then parsed and checked as a
//! whole so a single response can report every bad field.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use ims_core::error::CoreError;
use ims_core::invoice::{parse_amount, validate_invoice_number, InvoiceStatus};
use ims_core::types::{Date, DbId};
use ims_core::upload::{FileValidationError, UploadCandidate, UploadConfig};
use ims_db::models::invoice::{CreateInvoice, UpdateInvoice};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Multipart field carrying the invoice document.
const FILE_FIELD: &str = "file";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fully-read file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, unsanitized.
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn candidate(&self) -> UploadCandidate<'_> {
        UploadCandidate {
            name: &self.file_name,
            size_bytes: self.bytes.len() as u64,
        }
    }
}

/// Raw invoice form as submitted. `None` means the part was not sent.
#[derive(Debug, Default)]
pub struct InvoiceForm {
    pub vendor: Option<String>,
    pub invoice_number: Option<String>,
    pub amount: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Parsed fields for a create or full replace.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub vendor_id: DbId,
    pub invoice_number: String,
    pub amount: Decimal,
    pub issue_date: Date,
    pub due_date: Date,
    pub status: Option<InvoiceStatus>,
}

impl NewInvoice {
    pub fn with_file(self, file_path: String) -> CreateInvoice {
        CreateInvoice {
            vendor_id: self.vendor_id,
            invoice_number: self.invoice_number,
            amount: self.amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status: self.status,
            file_path,
        }
    }
}

/// Parsed fields for a partial update.
#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub vendor_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub amount: Option<Decimal>,
    pub issue_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<InvoiceStatus>,
}

impl InvoicePatch {
    pub fn with_file(self, file_path: Option<String>) -> UpdateInvoice {
        UpdateInvoice {
            vendor_id: self.vendor_id,
            invoice_number: self.invoice_number,
            amount: self.amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status: self.status,
            file_path,
        }
    }
}

impl InvoiceForm {
    /// Drain a multipart body into a form. Unknown parts are ignored.
    ///
    /// A body cut off by the request size limit is reported as
    /// [`FileValidationError::FileTooLarge`].
    pub async fn from_multipart(mut multipart: Multipart, upload: &UploadConfig) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, upload))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == FILE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, upload))?;
                form.file = read_file_part(file_name, bytes)?;
                continue;
            }

            let slot = match name.as_str() {
                "vendor" => &mut form.vendor,
                "invoice_number" => &mut form.invoice_number,
                "amount" => &mut form.amount,
                "issue_date" => &mut form.issue_date,
                "due_date" => &mut form.due_date,
                "status" => &mut form.status,
                _ => continue,
            };
            let text = field.text().await.map_err(|e| multipart_error(e, upload))?;
            *slot = Some(text.trim().to_string());
        }

        Ok(form)
    }

    /// Parse for `POST` / `PUT`: every field except `status` must be present.
    pub fn into_create(self) -> AppResult<(NewInvoice, Option<UploadedFile>)> {
        let mut errors: Vec<String> = [
            ("vendor", self.vendor.is_none()),
            ("invoice_number", self.invoice_number.is_none()),
            ("amount", self.amount.is_none()),
            ("issue_date", self.issue_date.is_none()),
            ("due_date", self.due_date.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| format!("{name}: This field is required."))
        .collect();

        let (patch, file) = self.parse(&mut errors);
        if !errors.is_empty() {
            return Err(validation_errors(errors));
        }

        match (
            patch.vendor_id,
            patch.invoice_number,
            patch.amount,
            patch.issue_date,
            patch.due_date,
        ) {
            (
                Some(vendor_id),
                Some(invoice_number),
                Some(amount),
                Some(issue_date),
                Some(due_date),
            ) => Ok((
                NewInvoice {
                    vendor_id,
                    invoice_number,
                    amount,
                    issue_date,
                    due_date,
                    status: patch.status,
                },
                file,
            )),
            _ => Err(AppError::Core(CoreError::Validation(
                "Required invoice fields are missing.".into(),
            ))),
        }
    }

    /// Parse for `PATCH`: every field is optional.
    pub fn into_patch(self) -> AppResult<(InvoicePatch, Option<UploadedFile>)> {
        let mut errors = Vec::new();
        let parsed = self.parse(&mut errors);
        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(validation_errors(errors))
        }
    }

    fn parse(self, errors: &mut Vec<String>) -> (InvoicePatch, Option<UploadedFile>) {
        let patch = InvoicePatch {
            vendor_id: self
                .vendor
                .and_then(|raw| keep(parse_vendor(&raw), errors)),
            invoice_number: self
                .invoice_number
                .and_then(|raw| keep(parse_invoice_number(raw), errors)),
            amount: self
                .amount
                .and_then(|raw| keep(parse_amount(&raw).map_err(core_message), errors)),
            issue_date: self
                .issue_date
                .and_then(|raw| keep(parse_date("issue_date", &raw), errors)),
            due_date: self
                .due_date
                .and_then(|raw| keep(parse_date("due_date", &raw), errors)),
            status: self.status.and_then(|raw| {
                let parsed = raw
                    .parse::<InvoiceStatus>()
                    .map_err(|e| format!("status: {}", core_message(e)));
                keep(parsed, errors)
            }),
        };
        (patch, self.file)
    }
}

/// Record a field error and drop the value.
fn keep<T>(result: Result<T, String>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(message);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn parse_vendor(raw: &str) -> Result<DbId, String> {
    if raw.is_empty() {
        return Err("vendor: This field may not be null.".into());
    }
    raw.parse::<DbId>()
        .map_err(|_| format!("vendor: Incorrect type. Expected pk value, received \"{raw}\"."))
}

fn parse_invoice_number(raw: String) -> Result<String, String> {
    validate_invoice_number(&raw).map_err(core_message)?;
    Ok(raw)
}

fn parse_date(field: &str, raw: &str) -> Result<Date, String> {
    Date::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        format!("{field}: Date has wrong format. Use one of these formats instead: YYYY-MM-DD.")
    })
}

/// A file part needs a file name and content. A part with neither is how
/// browsers send an empty file input and counts as no file.
fn read_file_part(file_name: Option<String>, bytes: Bytes) -> AppResult<Option<UploadedFile>> {
    match file_name {
        Some(name) if name.is_empty() && bytes.is_empty() => Ok(None),
        Some(_) if bytes.is_empty() => Err(AppError::Core(CoreError::Validation(
            "file: The submitted file is empty.".into(),
        ))),
        Some(file_name) => Ok(Some(UploadedFile { file_name, bytes })),
        None => Err(AppError::Core(CoreError::Validation(
            "file: The submitted data was not a file. Check the encoding type on the form.".into(),
        ))),
    }
}

fn core_message(err: CoreError) -> String {
    match err {
        CoreError::Validation(message) => message,
        other => other.to_string(),
    }
}

fn validation_errors(errors: Vec<String>) -> AppError {
    AppError::Core(CoreError::Validation(errors.join(" ")))
}

fn multipart_error(err: MultipartError, upload: &UploadConfig) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return FileValidationError::FileTooLarge {
            max_size_mb: upload.max_size_mb(),
        }
        .into();
    }
    AppError::BadRequest(err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn full_form() -> InvoiceForm {
        InvoiceForm {
            vendor: Some("7".into()),
            invoice_number: Some("INV-001".into()),
            amount: Some("150.50".into()),
            issue_date: Some("2024-01-15".into()),
            due_date: Some("2024-02-15".into()),
            status: None,
            file: Some(UploadedFile {
                file_name: "bill.pdf".into(),
                bytes: Bytes::from_static(b"%PDF"),
            }),
        }
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Core(CoreError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_parses_all_fields() {
        let (invoice, file) = full_form().into_create().unwrap();
        assert_eq!(invoice.vendor_id, 7);
        assert_eq!(invoice.amount, Decimal::new(15050, 2));
        assert_eq!(invoice.status, None);
        assert_eq!(file.unwrap().candidate().size_bytes, 4);

        let create = invoice.with_file("invoices/bill.pdf".into());
        assert_eq!(create.file_path, "invoices/bill.pdf");
    }

    #[test]
    fn create_reports_every_missing_field() {
        let form = InvoiceForm {
            vendor: Some("7".into()),
            ..Default::default()
        };
        let message = validation_message(form.into_create().unwrap_err());
        for field in ["invoice_number", "amount", "issue_date", "due_date"] {
            assert!(
                message.contains(&format!("{field}: This field is required.")),
                "{message}"
            );
        }
        assert!(!message.contains("vendor:"));
    }

    #[test]
    fn bad_values_are_reported_together() {
        let form = InvoiceForm {
            amount: Some("12.345".into()),
            due_date: Some("15/02/2024".into()),
            status: Some("LATE".into()),
            ..full_form()
        };
        let message = validation_message(form.into_create().unwrap_err());
        assert!(message.contains("amount:"), "{message}");
        assert!(message.contains("due_date: Date has wrong format"), "{message}");
        assert!(message.contains("status:"), "{message}");
    }

    #[test]
    fn patch_accepts_partial_forms() {
        let form = InvoiceForm {
            status: Some("PAID".into()),
            ..Default::default()
        };
        let (patch, file) = form.into_patch().unwrap();
        assert_eq!(patch.status, Some(InvoiceStatus::Paid));
        assert!(patch.amount.is_none());
        assert!(file.is_none());

        let update = patch.with_file(None);
        assert_eq!(update.status, Some(InvoiceStatus::Paid));
        assert!(update.file_path.is_none());
    }

    #[test]
    fn patch_rejects_non_numeric_vendor() {
        let form = InvoiceForm {
            vendor: Some("acme".into()),
            ..Default::default()
        };
        assert_matches!(
            form.into_patch(),
            Err(AppError::Core(CoreError::Validation(m))) if m.starts_with("vendor:")
        );
    }

    #[test]
    fn empty_file_part_is_rejected() {
        let err = read_file_part(Some("bill.pdf".into()), Bytes::new()).unwrap_err();
        assert_eq!(validation_message(err), "file: The submitted file is empty.");
    }

    #[test]
    fn blank_file_input_counts_as_no_file() {
        assert!(read_file_part(Some(String::new()), Bytes::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn text_in_file_field_is_rejected() {
        assert_matches!(
            read_file_part(None, Bytes::from_static(b"hello")),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
