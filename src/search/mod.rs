//! Search filters and inline query parsing.

use crate::entity::{ParentScenario, Tag};

/// Filters applied by a scenario search. All constraints are combined with AND.
///
/// Filters can also be written inline in the query string:
/// - `tag:safety` / `tag:data_quality` - parent or any child carries the tag
/// - `domain:AE` - at least one child lists the domain
/// - `active:true` - only active scenarios
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Free text matched case-insensitively against parents and children
    pub query: String,
    pub tag: Option<Tag>,
    pub domain: Option<String>,
    pub active_only: bool,
}

impl SearchFilter {
    /// Create an empty filter, which matches every scenario.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Check if filter has any constraints.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.tag.is_none()
            && self.domain.is_none()
            && !self.active_only
    }

    pub fn matches(&self, scenario: &ParentScenario) -> bool {
        if self.active_only && !scenario.is_active {
            return false;
        }

        let query = self.query.trim();
        if !query.is_empty() && !scenario.matches_search(query) {
            return false;
        }

        if let Some(tag) = self.tag {
            if !scenario.has_tag(tag) {
                return false;
            }
        }

        if let Some(ref domain) = self.domain {
            if !scenario.has_domain(domain) {
                return false;
            }
        }

        true
    }
}

/// Parse a raw query string into a filter.
///
/// # Examples
///
/// ```ignore
/// let filter = parse_query("tag:safety domain:AE fatal outcome");
/// assert_eq!(filter.query, "fatal outcome");
/// assert_eq!(filter.tag, Some(Tag::Safety));
/// assert_eq!(filter.domain, Some("AE".to_string()));
/// ```
pub fn parse_query(raw: &str) -> SearchFilter {
    let mut filter = SearchFilter::default();
    let mut remaining = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(value) = token.strip_prefix("tag:") {
            match value.parse::<Tag>() {
                Ok(tag) => filter.tag = Some(tag),
                Err(_) => remaining.push(token),
            }
        } else if let Some(value) = token.strip_prefix("domain:") {
            filter.domain = Some(value.to_uppercase());
        } else if let Some(value) = token.strip_prefix("active:") {
            filter.active_only = matches!(value.to_lowercase().as_str(), "true" | "yes" | "1");
        } else {
            remaining.push(token);
        }
    }

    filter.query = remaining.join(" ");
    filter
}
