//! Search and pagination builders shared by every list endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Query parameters accepted by list endpoints.
///
/// Kept as raw strings so that malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Items per page (default: 10, unbounded)
    pub limit: Option<String>,
    /// Case-insensitive substring matched against the searchable fields
    pub search: Option<String>,
}

/// Offset/limit window for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Turn raw `page`/`limit` parameters into a window.
///
/// Missing, non-numeric or non-positive values use the defaults. There is no
/// upper bound on `limit`.
pub fn build_page(page: Option<&str>, limit: Option<&str>) -> PageWindow {
    let page = positive_or(page, DEFAULT_PAGE);
    let limit = positive_or(limit, DEFAULT_LIMIT);
    PageWindow {
        page,
        offset: (page - 1).saturating_mul(limit),
        limit,
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// Number of pages needed to show `total` records, `limit` at a time
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

/// Free-text predicate: OR across `fields`, each a case-insensitive
/// "contains" match. An empty term matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub term: Option<String>,
    pub fields: &'static [&'static str],
}

impl SearchFilter {
    pub fn all() -> Self {
        Self { term: None, fields: &[] }
    }

    pub fn is_match_all(&self) -> bool {
        self.term.is_none() || self.fields.is_empty()
    }

    /// SQL `ILIKE` pattern with LIKE wildcards in the term escaped
    pub fn like_pattern(&self) -> Option<String> {
        if self.is_match_all() {
            return None;
        }
        let term = self.term.as_deref()?;
        let mut escaped = String::with_capacity(term.len() + 2);
        escaped.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        Some(escaped)
    }

    /// Evaluate the filter in process, given a lookup of a field's text
    pub fn matches<F>(&self, mut field_text: F) -> bool
    where
        F: FnMut(&str) -> Option<String>,
    {
        let Some(term) = self.term.as_deref().filter(|_| !self.fields.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();
        self.fields.iter().any(|field| {
            field_text(field)
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }
}

/// Build the filter for a search term over `fields`
pub fn build_filter(term: Option<&str>, fields: &'static [&'static str]) -> SearchFilter {
    let term = term.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    SearchFilter { term, fields }
}

/// Pagination metadata returned alongside a page of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, window: PageWindow) -> Self {
        Self {
            total,
            page: window.page,
            limit: window.limit,
            total_pages: total_pages(total, window.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["name", "email"];

    #[test]
    fn test_second_page_offset() {
        let window = build_page(Some("2"), Some("10"));
        assert_eq!(window, PageWindow { page: 2, offset: 10, limit: 10 });
    }

    #[test]
    fn test_defaults_for_missing_or_garbage() {
        assert_eq!(build_page(None, None), PageWindow { page: 1, offset: 0, limit: 10 });
        assert_eq!(build_page(Some("abc"), Some("")), PageWindow { page: 1, offset: 0, limit: 10 });
        assert_eq!(build_page(Some("0"), Some("-5")), PageWindow { page: 1, offset: 0, limit: 10 });
    }

    #[test]
    fn test_large_limit_is_not_capped() {
        let window = build_page(Some("3"), Some("5000"));
        assert_eq!(window.limit, 5000);
        assert_eq!(window.offset, 10000);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn test_total_pages_with_huge_limit() {
        assert_eq!(total_pages(2, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let value = serde_json::to_value(Pagination::new(25, build_page(Some("1"), Some("10")))).unwrap();
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["total"], 25);
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let filter = build_filter(Some("   "), FIELDS);
        assert!(filter.is_match_all());
        assert!(filter.like_pattern().is_none());
        assert!(filter.matches(|_| None));
    }

    #[test]
    fn test_term_matches_any_field_case_insensitively() {
        let filter = build_filter(Some("GMAIL"), FIELDS);
        assert!(filter.matches(|field| match field {
            "email" => Some("asha@gmail.com".to_string()),
            _ => None,
        }));
        assert!(!filter.matches(|field| match field {
            "name" => Some("Ravi".to_string()),
            _ => None,
        }));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let filter = build_filter(Some("50%_off"), FIELDS);
        assert_eq!(filter.like_pattern().as_deref(), Some("%50\\%\\_off%"));
    }
}
