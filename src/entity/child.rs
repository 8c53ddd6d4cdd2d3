// src/entity/child.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Tag, DEFAULT_VERSION};

/// A single field-level edit-check rule. Always owned by one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildScenario {
    pub id: Uuid,
    pub scenario_text: String,
    /// CDASH field codes the rule reads, in the order they were given
    pub required_cdash_items: Vec<String>,
    pub domains: Vec<String>,
    pub tag: Option<Tag>,
    pub reasoning_template: String,
    /// Code implementing the check, when one was drafted
    pub pseudo_code: Option<String>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChildScenario {
    pub fn new(scenario_text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            scenario_text,
            required_cdash_items: Vec::new(),
            domains: Vec::new(),
            tag: None,
            reasoning_template: String::new(),
            pseudo_code: None,
            version: DEFAULT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn tag_name(&self) -> Option<&'static str> {
        self.tag.map(|t| t.name())
    }

    /// Case-insensitive substring match over text, reasoning, fields, domains and tag.
    /// `query` must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, query: &str) -> bool {
        self.scenario_text.to_lowercase().contains(query)
            || self.reasoning_template.to_lowercase().contains(query)
            || self
                .required_cdash_items
                .iter()
                .any(|item| item.to_lowercase().contains(query))
            || self
                .domains
                .iter()
                .any(|domain| domain.to_lowercase().contains(query))
            || self
                .tag
                .is_some_and(|t| t.name().to_lowercase().contains(query))
    }
}

/// Split a comma-separated form value ("AETERM, AESTDTC") into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
