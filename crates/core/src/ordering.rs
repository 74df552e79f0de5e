//! Sort order for invoice listings (`?ordering=`).

use std::cmp::Ordering;

use crate::invoice_filter::InvoiceRecord;

/// Invoice fields a caller may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    IssueDate,
    DueDate,
    Amount,
    Status,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "issue_date" => Some(Self::IssueDate),
            "due_date" => Some(Self::DueDate),
            "amount" => Some(Self::Amount),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IssueDate => "issue_date",
            Self::DueDate => "due_date",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    fn compare(self, a: &InvoiceRecord<'_>, b: &InvoiceRecord<'_>) -> Ordering {
        match self {
            Self::IssueDate => a.issue_date.cmp(&b.issue_date),
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }
}

/// A list of sort keys applied in order. Ties on all keys fall back to
/// descending `id`, so results are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceOrdering {
    keys: Vec<SortKey>,
}

impl Default for InvoiceOrdering {
    /// Newest issue date first.
    fn default() -> Self {
        Self {
            keys: vec![SortKey::desc(SortField::IssueDate)],
        }
    }
}

impl InvoiceOrdering {
    /// Parse a comma-separated list such as `-amount,due_date`.
    ///
    /// Unknown fields are skipped. When nothing usable remains the default
    /// ordering is returned.
    pub fn parse(raw: &str) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();
        for term in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (direction, name) = match term.strip_prefix('-') {
                Some(rest) => (SortDirection::Desc, rest),
                None => (SortDirection::Asc, term),
            };
            let Some(field) = SortField::from_name(name) else {
                continue;
            };
            if keys.iter().any(|k| k.field == field) {
                continue;
            }
            keys.push(SortKey { field, direction });
        }

        if keys.is_empty() {
            Self::default()
        } else {
            Self { keys }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Compare two records under this ordering.
    pub fn compare(&self, a: &InvoiceRecord<'_>, b: &InvoiceRecord<'_>) -> Ordering {
        for key in &self.keys {
            let ord = key.field.compare(a, b);
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        b.id.cmp(&a.id)
    }
}
