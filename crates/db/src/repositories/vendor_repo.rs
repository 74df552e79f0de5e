//! Repository for the `vendors` table.

use ims_core::types::DbId;
use ims_core::vendor_filter::VendorFilter;
use sqlx::PgPool;

use crate::models::vendor::{CreateVendor, UpdateVendor, Vendor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, address, created_at";

/// Provides CRUD operations for vendors.
pub struct VendorRepo;

impl VendorRepo {
    /// Insert a new vendor, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVendor) -> Result<Vendor, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendors (name, email, phone, address)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors WHERE id = $1");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Verify that a vendor exists by ID.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM vendors WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List vendors matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &VendorFilter) -> Result<Vec<Vendor>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref name) = filter.name {
            binds.push(name.clone());
            conditions.push(format!("name = ${}", binds.len()));
        }
        if let Some(ref email) = filter.email {
            binds.push(email.clone());
            conditions.push(format!("email = ${}", binds.len()));
        }
        for pattern in filter.search.like_patterns() {
            binds.push(pattern);
            let idx = binds.len();
            conditions.push(format!(
                "(name ILIKE ${idx} OR email ILIKE ${idx} OR address ILIKE ${idx})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM vendors {where_clause} ORDER BY created_at DESC, id DESC"
        );
        let mut q = sqlx::query_as::<_, Vendor>(&query);
        for value in &binds {
            q = q.bind(value.as_str());
        }
        q.fetch_all(pool).await
    }

    /// Overwrite every editable field. Returns `None` if the vendor does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &CreateVendor,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "UPDATE vendors SET name = $2, email = $3, phone = $4, address = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Update a vendor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVendor,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "UPDATE vendors SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a vendor and, through `ON DELETE CASCADE`, all of its invoices.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
