//! Request handlers for vendors and invoices.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the corresponding repository in `ims_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod invoice;
pub mod vendor;
