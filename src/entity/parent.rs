// src/entity/parent.rs
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChildScenario, Tag, DEFAULT_VERSION};

/// A named validation theme owning zero or more child rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentScenario {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    /// Seeded "out of the box" scenarios are read-only
    pub is_ootb: bool,
    pub child_scenarios: Vec<ChildScenario>,
    pub tag: Option<Tag>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParentScenario {
    /// A user-authored scenario: active and editable.
    pub fn new(name: String, description: String, tag: Option<Tag>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            is_active: true,
            is_ootb: false,
            child_scenarios: Vec::new(),
            tag,
            version: DEFAULT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A protected scenario loaded from the seed dataset.
    pub fn ootb(
        name: String,
        description: String,
        tag: Option<Tag>,
        child_scenarios: Vec<ChildScenario>,
    ) -> Self {
        Self {
            is_ootb: true,
            child_scenarios,
            ..Self::new(name, description, tag)
        }
    }

    pub fn primary_tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn tag_name(&self) -> Option<&'static str> {
        self.tag.map(|t| t.name())
    }

    /// Domains referenced by any child, sorted and de-duplicated.
    pub fn domains(&self) -> BTreeSet<&str> {
        self.child_scenarios
            .iter()
            .flat_map(|c| c.domains.iter().map(String::as_str))
            .collect()
    }

    /// CDASH items referenced by any child, sorted and de-duplicated.
    pub fn cdash_items(&self) -> BTreeSet<&str> {
        self.child_scenarios
            .iter()
            .flat_map(|c| c.required_cdash_items.iter().map(String::as_str))
            .collect()
    }

    /// Tags on the parent itself plus every child.
    pub fn tags(&self) -> BTreeSet<Tag> {
        self.tag
            .into_iter()
            .chain(self.child_scenarios.iter().filter_map(|c| c.tag))
            .collect()
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tag == Some(tag) || self.child_scenarios.iter().any(|c| c.tag == Some(tag))
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.child_scenarios
            .iter()
            .any(|c| c.domains.iter().any(|d| d == domain))
    }

    /// Case-insensitive substring search over the parent and all of its children.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();

        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .tag
                .is_some_and(|t| t.name().to_lowercase().contains(&query))
            || self
                .child_scenarios
                .iter()
                .any(|c| c.matches_lowercase(&query))
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
