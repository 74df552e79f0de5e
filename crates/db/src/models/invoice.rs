//! Invoice entity model and DTOs.

use ims_core::invoice::InvoiceStatus;
use ims_core::invoice_filter::InvoiceRecord;
use ims_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// An invoice row joined with its vendor's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub vendor_id: DbId,
    pub vendor_name: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub issue_date: Date,
    pub due_date: Date,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    /// Path relative to the media root, e.g. `invoices/scan.pdf`.
    pub file_path: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    /// Borrowed view used by the shared filter and ordering logic.
    pub fn record(&self) -> InvoiceRecord<'_> {
        InvoiceRecord {
            id: self.id,
            vendor_id: self.vendor_id,
            vendor_name: &self.vendor_name,
            invoice_number: &self.invoice_number,
            amount: self.amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status: self.status,
        }
    }
}

/// DTO for inserting an invoice. The file must already be stored.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub vendor_id: DbId,
    pub invoice_number: String,
    pub amount: Decimal,
    pub issue_date: Date,
    pub due_date: Date,
    /// Defaults to `PENDING` if omitted.
    pub status: Option<InvoiceStatus>,
    pub file_path: String,
}

/// DTO for updating an invoice. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoice {
    pub vendor_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub amount: Option<Decimal>,
    pub issue_date: Option<Date>,
    pub due_date: Option<Date>,
    pub status: Option<InvoiceStatus>,
    pub file_path: Option<String>,
}

impl From<CreateInvoice> for UpdateInvoice {
    /// A full replacement expressed as an update. An omitted status keeps the
    /// stored one.
    fn from(input: CreateInvoice) -> Self {
        Self {
            vendor_id: Some(input.vendor_id),
            invoice_number: Some(input.invoice_number),
            amount: Some(input.amount),
            issue_date: Some(input.issue_date),
            due_date: Some(input.due_date),
            status: input.status,
            file_path: Some(input.file_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacement(status: Option<InvoiceStatus>) -> CreateInvoice {
        CreateInvoice {
            vendor_id: 1,
            invoice_number: "INV-1".into(),
            amount: Decimal::new(1000, 2),
            issue_date: Date::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: Date::from_ymd_opt(2024, 2, 1).unwrap(),
            status,
            file_path: "invoices/INV-1.pdf".into(),
        }
    }

    #[test]
    fn replacement_without_status_leaves_status_unset() {
        let update = UpdateInvoice::from(replacement(None));
        assert_eq!(update.status, None);
        assert_eq!(update.invoice_number.as_deref(), Some("INV-1"));
        assert_eq!(update.file_path.as_deref(), Some("invoices/INV-1.pdf"));
    }

    #[test]
    fn replacement_with_status_sets_it() {
        let update = UpdateInvoice::from(replacement(Some(InvoiceStatus::Paid)));
        assert_eq!(update.status, Some(InvoiceStatus::Paid));
    }
}
