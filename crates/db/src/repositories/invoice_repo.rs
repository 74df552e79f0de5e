//! Repository for the `invoices` table.
//!
//! Every read joins `vendors` so rows carry the vendor name.

use ims_core::invoice_filter::{InvoiceFilter, InvoiceQuery};
use ims_core::ordering::{InvoiceOrdering, SortDirection, SortField};
use ims_core::types::{Date, DbId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::invoice::{CreateInvoice, Invoice, UpdateInvoice};

/// Column list for invoice reads; `i` is the invoice row, `v` its vendor.
const COLUMNS: &str = "i.id, i.vendor_id, v.name AS vendor_name, i.invoice_number, i.amount, \
     i.issue_date, i.due_date, i.status, i.file_path, i.created_at, i.updated_at";

/// Provides CRUD and filtered listing for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a new invoice, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `PENDING`.
    pub async fn create(pool: &PgPool, input: &CreateInvoice) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                INSERT INTO invoices
                    (vendor_id, invoice_number, amount, issue_date, due_date, status, file_path)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'PENDING'), $7)
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN vendors v ON v.id = i.vendor_id"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(input.vendor_id)
            .bind(&input.invoice_number)
            .bind(input.amount)
            .bind(input.issue_date)
            .bind(input.due_date)
            .bind(input.status.map(|s| s.as_str()))
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices i JOIN vendors v ON v.id = i.vendor_id WHERE i.id = $1"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List invoices matching the query's filter, in the query's order.
    pub async fn list(pool: &PgPool, params: &InvoiceQuery) -> Result<Vec<Invoice>, sqlx::Error> {
        let (where_clause, bind_values) = build_invoice_filter(&params.filter);
        let order_clause = build_order_clause(&params.ordering);

        let query = format!(
            "SELECT {COLUMNS} FROM invoices i JOIN vendors v ON v.id = i.vendor_id \
             {where_clause} ORDER BY {order_clause}"
        );
        let q = bind_invoice_values(sqlx::query_as::<_, Invoice>(&query), &bind_values);
        q.fetch_all(pool).await
    }

    /// All invoices of one vendor, newest issue date first.
    pub async fn list_by_vendor(
        pool: &PgPool,
        vendor_id: DbId,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let params = InvoiceQuery {
            filter: InvoiceFilter::for_vendor(vendor_id),
            ordering: InvoiceOrdering::default(),
        };
        Self::list(pool, &params).await
    }

    /// Update an invoice. Only non-`None` fields in `input` are applied;
    /// `updated_at` is refreshed by trigger.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE invoices SET
                    vendor_id = COALESCE($2, vendor_id),
                    invoice_number = COALESCE($3, invoice_number),
                    amount = COALESCE($4, amount),
                    issue_date = COALESCE($5, issue_date),
                    due_date = COALESCE($6, due_date),
                    status = COALESCE($7, status),
                    file_path = COALESCE($8, file_path)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN vendors v ON v.id = i.vendor_id"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(input.vendor_id)
            .bind(&input.invoice_number)
            .bind(input.amount)
            .bind(input.issue_date)
            .bind(input.due_date)
            .bind(input.status.map(|s| s.as_str()))
            .bind(&input.file_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete an invoice by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built invoice queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Numeric(Decimal),
    Date(Date),
}

/// Build a WHERE clause and bind values from an [`InvoiceFilter`].
///
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_invoice_filter(filter: &InvoiceFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();

    let mut push = |sql: &str, value: BindValue| {
        bind_values.push(value);
        let idx = bind_values.len();
        conditions.push(sql.replace("$?", &format!("${idx}")));
    };

    if let Some(vendor) = filter.vendor {
        push("i.vendor_id = $?", BindValue::BigInt(vendor));
    }
    if let Some(status) = filter.status {
        push("i.status = $?", BindValue::Text(status.as_str().to_string()));
    }
    if let Some(min) = filter.min_amount {
        push("i.amount >= $?", BindValue::Numeric(min));
    }
    if let Some(max) = filter.max_amount {
        push("i.amount <= $?", BindValue::Numeric(max));
    }
    if let Some(from) = filter.issue_date.from {
        push("i.issue_date >= $?", BindValue::Date(from));
    }
    if let Some(to) = filter.issue_date.to {
        push("i.issue_date <= $?", BindValue::Date(to));
    }
    if let Some(from) = filter.due_date.from {
        push("i.due_date >= $?", BindValue::Date(from));
    }
    if let Some(to) = filter.due_date.to {
        push("i.due_date <= $?", BindValue::Date(to));
    }
    for pattern in filter.search.like_patterns() {
        push(
            "(i.invoice_number ILIKE $? OR v.name ILIKE $?)",
            BindValue::Text(pattern),
        );
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

/// Render an [`InvoiceOrdering`] as an ORDER BY list with an `id` tiebreak.
fn build_order_clause(ordering: &InvoiceOrdering) -> String {
    let mut parts: Vec<String> = ordering
        .keys()
        .iter()
        .map(|key| {
            let column = match key.field {
                SortField::IssueDate => "i.issue_date",
                SortField::DueDate => "i.due_date",
                SortField::Amount => "i.amount",
                SortField::Status => "i.status",
            };
            let direction = match key.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{column} {direction}")
        })
        .collect();
    parts.push("i.id DESC".to_string());
    parts.join(", ")
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_invoice_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
