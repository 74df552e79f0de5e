//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod invoice_repo;
pub mod vendor_repo;

pub use invoice_repo::InvoiceRepo;
pub use vendor_repo::VendorRepo;
