//! Outgoing JSON shapes that differ from the database models.

use ims_core::invoice::{InvoiceStatus, AMOUNT_DECIMAL_PLACES};
use ims_core::types::{Date, DbId, Timestamp};
use ims_db::models::invoice::Invoice;
use serde::Serialize;

use crate::config::MediaConfig;

/// Invoice as returned by the API.
///
/// `amount` is a string with exactly two decimal places and `file` is the
/// public URL of the stored document.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: DbId,
    pub vendor: DbId,
    pub vendor_name: String,
    pub invoice_number: String,
    pub amount: String,
    pub issue_date: Date,
    pub due_date: Date,
    pub status: InvoiceStatus,
    pub file: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InvoiceResponse {
    pub fn from_invoice(invoice: Invoice, media: &MediaConfig) -> Self {
        let mut amount = invoice.amount;
        amount.rescale(AMOUNT_DECIMAL_PLACES);
        Self {
            id: invoice.id,
            vendor: invoice.vendor_id,
            vendor_name: invoice.vendor_name,
            invoice_number: invoice.invoice_number,
            amount: amount.to_string(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: invoice.status,
            file: media.url_for(&invoice.file_path),
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }

    pub fn from_invoices(invoices: Vec<Invoice>, media: &MediaConfig) -> Vec<Self> {
        invoices
            .into_iter()
            .map(|invoice| Self::from_invoice(invoice, media))
            .collect()
    }
}
