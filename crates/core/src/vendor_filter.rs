//! Vendor list filtering: exact `name` / `email` plus free-text search over
//! name, email and address.

use serde::Deserialize;

use crate::search::SearchTerms;

/// Raw `GET /api/vendors/` parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorFilterParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub search: SearchTerms,
}

impl VendorFilter {
    pub fn matches(&self, name: &str, email: &str, address: &str) -> bool {
        self.name.as_deref().map_or(true, |n| n == name)
            && self.email.as_deref().map_or(true, |e| e == email)
            && self.search.matches(&[name, email, address])
    }
}

impl From<VendorFilterParams> for VendorFilter {
    fn from(params: VendorFilterParams) -> Self {
        Self {
            name: non_blank(params.name),
            email: non_blank(params.email),
            search: params
                .search
                .as_deref()
                .map(SearchTerms::parse)
                .unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
