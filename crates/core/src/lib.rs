//! Domain logic for the invoice management service.
//!
//! Everything here is pure: no database, no HTTP, no filesystem. The `db`
//! and `api` crates call into these modules to validate uploads, check field
//! values and build invoice queries.

pub mod error;
pub mod invoice;
pub mod invoice_filter;
pub mod ordering;
pub mod search;
pub mod types;
pub mod upload;
pub mod vendor_filter;
