//! Invoice list filtering.
//!
//! Query-string parameters are parsed into an [`InvoiceFilter`] (what to
//! keep) and an [`InvoiceOrdering`] (how to sort). The db crate renders the
//! same filter as SQL; [`InvoiceFilter::matches`] evaluates it against a
//! single record so the semantics can be checked without a database.
//!
//! All supplied constraints are ANDed together. Blank or absent parameters
//! impose no constraint and unrecognised parameters are ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoreError;
use crate::invoice::InvoiceStatus;
use crate::ordering::InvoiceOrdering;
use crate::search::SearchTerms;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Record view
// ---------------------------------------------------------------------------

/// The invoice fields that filtering, search and ordering look at.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceRecord<'a> {
    pub id: DbId,
    pub vendor_id: DbId,
    pub vendor_name: &'a str,
    pub invoice_number: &'a str,
    pub amount: Decimal,
    pub issue_date: Date,
    pub due_date: Date,
    pub status: InvoiceStatus,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Inclusive date range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: Date) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub vendor: Option<DbId>,
    pub status: Option<InvoiceStatus>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub issue_date: DateRange,
    pub due_date: DateRange,
    /// Matched against invoice number and vendor name.
    pub search: SearchTerms,
}

impl InvoiceFilter {
    /// Only invoices belonging to `vendor_id`, nothing else constrained.
    pub fn for_vendor(vendor_id: DbId) -> Self {
        Self {
            vendor: Some(vendor_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &InvoiceRecord<'_>) -> bool {
        self.vendor.map_or(true, |v| record.vendor_id == v)
            && self.status.map_or(true, |s| record.status == s)
            && self.min_amount.map_or(true, |min| record.amount >= min)
            && self.max_amount.map_or(true, |max| record.amount <= max)
            && self.issue_date.contains(record.issue_date)
            && self.due_date.contains(record.due_date)
            && self
                .search
                .matches(&[record.invoice_number, record.vendor_name])
    }
}

/// A parsed invoice list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceQuery {
    pub filter: InvoiceFilter,
    pub ordering: InvoiceOrdering,
}

impl InvoiceQuery {
    /// Filter and sort in-memory records, the way the database query does.
    pub fn apply<'a>(&self, records: &[InvoiceRecord<'a>]) -> Vec<InvoiceRecord<'a>> {
        let mut kept: Vec<InvoiceRecord<'a>> = records
            .iter()
            .filter(|r| self.filter.matches(r))
            .copied()
            .collect();
        kept.sort_by(|a, b| self.ordering.compare(a, b));
        kept
    }
}

// ---------------------------------------------------------------------------
// Query-string parameters
// ---------------------------------------------------------------------------

/// Raw `GET /api/invoices/` parameters.
///
/// Values are kept as strings so blank values can be treated as absent and
/// malformed ones reported with the parameter name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilterParams {
    pub vendor: Option<String>,
    pub status: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    #[serde(alias = "issue_date_range_0")]
    pub issue_date_range_after: Option<String>,
    #[serde(alias = "issue_date_range_1")]
    pub issue_date_range_before: Option<String>,
    #[serde(alias = "due_date_range_0")]
    pub due_date_range_after: Option<String>,
    #[serde(alias = "due_date_range_1")]
    pub due_date_range_before: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl InvoiceFilterParams {
    pub fn into_query(self) -> Result<InvoiceQuery, CoreError> {
        let filter = InvoiceFilter {
            vendor: parse_param("vendor", self.vendor.as_deref(), |v| v.parse::<DbId>().ok())?,
            status: parse_param("status", self.status.as_deref(), |v| v.parse().ok())?,
            min_amount: parse_param("min_amount", self.min_amount.as_deref(), parse_decimal)?,
            max_amount: parse_param("max_amount", self.max_amount.as_deref(), parse_decimal)?,
            issue_date: DateRange {
                from: parse_param(
                    "issue_date_range_after",
                    self.issue_date_range_after.as_deref(),
                    parse_date,
                )?,
                to: parse_param(
                    "issue_date_range_before",
                    self.issue_date_range_before.as_deref(),
                    parse_date,
                )?,
            },
            due_date: DateRange {
                from: parse_param(
                    "due_date_range_after",
                    self.due_date_range_after.as_deref(),
                    parse_date,
                )?,
                to: parse_param(
                    "due_date_range_before",
                    self.due_date_range_before.as_deref(),
                    parse_date,
                )?,
            },
            search: self
                .search
                .as_deref()
                .map(SearchTerms::parse)
                .unwrap_or_default(),
        };

        let ordering = self
            .ordering
            .as_deref()
            .map(InvoiceOrdering::parse)
            .unwrap_or_default();

        Ok(InvoiceQuery { filter, ordering })
    }
}

/// Parse an optional parameter; blank counts as absent.
fn parse_param<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, CoreError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    parse(value)
        .map(Some)
        .ok_or_else(|| CoreError::Validation(format!("{name}: invalid value \"{value}\"")))
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.parse().ok()
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse_from_str(raw, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
