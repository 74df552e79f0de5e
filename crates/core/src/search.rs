//! Free-text search terms shared by the vendor and invoice listings.
//!
//! A search string is split on whitespace and commas. Every term must match
//! (AND); a term matches when any searchable field contains it,
//! case-insensitively (OR across fields).

/// Parsed `?search=` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    /// Split a raw search string into terms. Blank input yields no terms.
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `true` when every term is contained in at least one of `fields`.
    pub fn matches(&self, fields: &[&str]) -> bool {
        self.terms.iter().all(|term| {
            let needle = term.to_lowercase();
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }

    /// `ILIKE` patterns for each term, with LIKE wildcards escaped.
    pub fn like_patterns(&self) -> Vec<String> {
        self.terms
            .iter()
            .map(|term| format!("%{}%", escape_like(term)))
            .collect()
    }
}

/// Escape `\`, `%` and `_` so they match literally in a LIKE pattern using
/// the default backslash escape character.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
