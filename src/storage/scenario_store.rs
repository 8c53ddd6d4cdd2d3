use std::collections::BTreeSet;
use std::path::Path;

use uuid::Uuid;

use crate::entity::{ChildScenario, ParentScenario, Tag};
use crate::search::SearchFilter;
use crate::storage::seed;
use crate::warnings::Warning;

/// Update payload for a parent scenario's own fields
#[derive(Debug, Default, Clone)]
pub struct ScenarioUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tag: Option<Option<Tag>>, // Some(None) to clear, Some(Some(tag)) to set
}

/// In-memory collection of parent scenarios.
///
/// Lookups are linear scans. Seeded (out-of-the-box) scenarios are protected:
/// every content mutation on them reports `false` and leaves the store unchanged.
#[derive(Debug, Default, Clone)]
pub struct ScenarioStore {
    scenarios: Vec<ParentScenario>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenarios(scenarios: Vec<ParentScenario>) -> Self {
        Self { scenarios }
    }

    /// Build a store from the seed file. A missing or unreadable file yields an
    /// empty store; the returned warnings say why.
    pub fn from_seed(path: &Path) -> (Self, Vec<Warning>) {
        let (scenarios, warnings) = seed::load(path);
        (Self::with_scenarios(scenarios), warnings)
    }

    pub fn all(&self) -> &[ParentScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&ParentScenario> {
        self.scenarios.iter().find(|s| s.id == *id)
    }

    /// Resolve a full id or an unambiguous id prefix like "a1b2c".
    pub fn find(&self, id: &str) -> Option<&ParentScenario> {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return None;
        }
        let mut matches = self
            .scenarios
            .iter()
            .filter(|s| s.id.to_string().starts_with(&id));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Mutable access to an editable (non-OOTB) scenario.
    fn editable_mut(&mut self, id: &Uuid) -> Option<&mut ParentScenario> {
        self.scenarios
            .iter_mut()
            .find(|s| s.id == *id)
            .filter(|s| !s.is_ootb)
    }

    /// Append a scenario. Ids are not re-checked for uniqueness.
    pub fn add(&mut self, scenario: ParentScenario) {
        tracing::debug!(id = %scenario.id, name = %scenario.name, "scenario added");
        self.scenarios.push(scenario);
    }

    /// Replace a scenario wholesale.
    ///
    /// The stored id, OOTB flag and creation time are kept; `updated_at` is bumped.
    /// Returns `false` if the scenario is absent or out-of-the-box.
    pub fn update(&mut self, id: &Uuid, mut replacement: ParentScenario) -> bool {
        let Some(existing) = self.editable_mut(id) else {
            return false;
        };
        replacement.id = existing.id;
        replacement.is_ootb = existing.is_ootb;
        replacement.created_at = existing.created_at;
        replacement.touch();
        *existing = replacement;
        true
    }

    /// Edit name, description or tag of an editable scenario.
    pub fn update_fields(&mut self, id: &Uuid, update: ScenarioUpdate) -> bool {
        let Some(scenario) = self.editable_mut(id) else {
            return false;
        };
        if let Some(name) = update.name {
            scenario.name = name;
        }
        if let Some(description) = update.description {
            scenario.description = description;
        }
        if let Some(tag) = update.tag {
            scenario.tag = tag;
        }
        scenario.touch();
        true
    }

    /// Delete a scenario. Returns `false` if it is absent or out-of-the-box.
    pub fn delete(&mut self, id: &Uuid) -> bool {
        match self
            .scenarios
            .iter()
            .position(|s| s.id == *id && !s.is_ootb)
        {
            Some(index) => {
                self.scenarios.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flip the active flag. Applies to seeded scenarios too.
    pub fn toggle_active(&mut self, id: &Uuid) -> bool {
        match self.scenarios.iter_mut().find(|s| s.id == *id) {
            Some(scenario) => {
                scenario.is_active = !scenario.is_active;
                scenario.touch();
                true
            }
            None => false,
        }
    }

    pub fn add_child(&mut self, parent_id: &Uuid, child: ChildScenario) -> bool {
        self.extend_children(parent_id, vec![child])
    }

    /// Append children to an editable parent.
    pub fn extend_children(&mut self, parent_id: &Uuid, children: Vec<ChildScenario>) -> bool {
        let Some(parent) = self.editable_mut(parent_id) else {
            return false;
        };
        parent.child_scenarios.extend(children);
        parent.touch();
        true
    }

    pub fn remove_child(&mut self, parent_id: &Uuid, child_id: &Uuid) -> bool {
        let Some(parent) = self.editable_mut(parent_id) else {
            return false;
        };
        match parent.child_scenarios.iter().position(|c| c.id == *child_id) {
            Some(index) => {
                parent.child_scenarios.remove(index);
                parent.touch();
                true
            }
            None => false,
        }
    }

    /// Every scenario matching the filter, in store order.
    pub fn search(&self, filter: &SearchFilter) -> Vec<&ParentScenario> {
        self.scenarios.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Every domain referenced by any child, for filter choices.
    pub fn all_domains(&self) -> BTreeSet<&str> {
        self.scenarios.iter().flat_map(|s| s.domains()).collect()
    }

    /// Every tag used by any parent or child, for filter choices.
    pub fn all_tags(&self) -> BTreeSet<Tag> {
        self.scenarios.iter().flat_map(|s| s.tags()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(text: &str, domains: &[&str], tag: Tag) -> ChildScenario {
        let mut c = ChildScenario::new(text.to_string());
        c.domains = domains.iter().map(|d| d.to_string()).collect();
        c.tag = Some(tag);
        c
    }

    fn sample_store() -> ScenarioStore {
        let seeded = ParentScenario::ootb(
            "AE Outcome Checks".to_string(),
            "Adverse event consistency".to_string(),
            Some(Tag::Safety),
            vec![child("Fatal outcome but drug continued", &["AE"], Tag::Safety)],
        );
        let mut labs = ParentScenario::new(
            "Lab Ranges".to_string(),
            "Reference range review".to_string(),
            Some(Tag::DataQuality),
        );
        labs.child_scenarios
            .push(child("LBORRES outside normal range", &["LB"], Tag::DataQuality));
        let mut inactive = ParentScenario::new(
            "Visit Windows".to_string(),
            "Visits out of window".to_string(),
            Some(Tag::Compliance),
        );
        inactive.is_active = false;

        ScenarioStore::with_scenarios(vec![seeded, labs, inactive])
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = sample_store();
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_find_by_prefix() {
        let store = sample_store();
        let id = store.all()[1].id.to_string();
        assert_eq!(store.find(&id[..8]).unwrap().name, "Lab Ranges");
        assert_eq!(store.find(&id.to_uppercase()).unwrap().name, "Lab Ranges");
        assert!(store.find("").is_none());
        assert!(store.find("zzzz").is_none());
    }

    #[test]
    fn test_add_appends() {
        let mut store = ScenarioStore::new();
        assert!(store.is_empty());
        store.add(ParentScenario::new("New".to_string(), String::new(), None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_ootb_fails_and_leaves_store_unchanged() {
        let mut store = sample_store();
        let before = store.all().to_vec();
        let id = store.all()[0].id;

        assert!(!store.delete(&id));
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_delete_user_scenario() {
        let mut store = sample_store();
        let id = store.all()[1].id;
        assert!(store.delete(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.delete(&id));
    }

    #[test]
    fn test_update_ootb_fails_and_leaves_store_unchanged() {
        let mut store = sample_store();
        let before = store.all().to_vec();
        let id = store.all()[0].id;
        let replacement = ParentScenario::new("Hijacked".to_string(), String::new(), None);

        assert!(!store.update(&id, replacement));
        assert!(!store.update_fields(
            &id,
            ScenarioUpdate {
                name: Some("Renamed".to_string()),
                ..ScenarioUpdate::default()
            }
        ));
        assert!(!store.add_child(&id, ChildScenario::new("extra".to_string())));
        let child_id = store.all()[0].child_scenarios[0].id;
        assert!(!store.remove_child(&id, &child_id));
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_update_replaces_and_keeps_identity() {
        let mut store = sample_store();
        let original = store.all()[1].clone();
        let replacement = ParentScenario::new("Lab Ranges v2".to_string(), "new".to_string(), None);

        assert!(store.update(&original.id, replacement));
        let updated = store.get(&original.id).unwrap();
        assert_eq!(updated.name, "Lab Ranges v2");
        assert!(updated.child_scenarios.is_empty());
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert!(!store.update(&Uuid::new_v4(), original));
    }

    #[test]
    fn test_update_fields_partial() {
        let mut store = sample_store();
        let id = store.all()[1].id;
        assert!(store.update_fields(
            &id,
            ScenarioUpdate {
                tag: Some(None),
                description: Some("Updated".to_string()),
                ..ScenarioUpdate::default()
            }
        ));
        let s = store.get(&id).unwrap();
        assert_eq!(s.name, "Lab Ranges");
        assert_eq!(s.description, "Updated");
        assert!(s.tag.is_none());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut store = sample_store();
        let id = store.all()[0].id;
        let before = store.get(&id).unwrap().updated_at;

        assert!(store.toggle_active(&id));
        let toggled = store.get(&id).unwrap();
        assert!(!toggled.is_active);
        assert!(toggled.updated_at >= before);

        assert!(store.toggle_active(&id));
        assert!(store.get(&id).unwrap().is_active);
        assert!(!store.toggle_active(&Uuid::new_v4()));
    }

    #[test]
    fn test_child_add_and_remove() {
        let mut store = sample_store();
        let id = store.all()[1].id;
        let c = ChildScenario::new("LBNRIND missing".to_string());
        let child_id = c.id;

        assert!(store.add_child(&id, c));
        assert_eq!(store.get(&id).unwrap().child_scenarios.len(), 2);
        assert!(store.remove_child(&id, &child_id));
        assert!(!store.remove_child(&id, &child_id));
        assert_eq!(store.get(&id).unwrap().child_scenarios.len(), 1);
    }

    #[test]
    fn test_empty_search_returns_everything() {
        let store = sample_store();
        assert_eq!(store.search(&SearchFilter::new()).len(), 3);
    }

    #[test]
    fn test_search_filters_are_conjunctive() {
        let store = sample_store();

        let active = store.search(&SearchFilter::new().active_only());
        assert_eq!(active.len(), 2);

        let by_query = store.search(&SearchFilter::new().with_query("NORMAL RANGE"));
        assert_eq!(by_query.len(), 1);
        assert_eq!(by_query[0].name, "Lab Ranges");

        let by_tag = store.search(&SearchFilter::new().with_tag(Tag::Safety));
        assert_eq!(by_tag.len(), 1);

        let by_domain = store.search(&SearchFilter::new().with_domain("LB"));
        assert_eq!(by_domain.len(), 1);

        let none = store.search(&SearchFilter::new().with_domain("LB").with_tag(Tag::Safety));
        assert!(none.is_empty());

        let inactive_by_tag =
            store.search(&SearchFilter::new().with_tag(Tag::Compliance).active_only());
        assert!(inactive_by_tag.is_empty());
    }

    #[test]
    fn test_search_matches_child_reasoning() {
        let mut store = sample_store();
        let id = store.all()[1].id;
        let mut c = ChildScenario::new("Indicator missing".to_string());
        c.reasoning_template = "LBNRIND is blank although LBORRES is reported".to_string();
        assert!(store.add_child(&id, c));

        let results = store.search(&SearchFilter::new().with_query("although"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Lab Ranges");
    }

    #[test]
    fn test_domain_filter_needs_child_domain() {
        let store = sample_store();
        // "Visit Windows" has the Compliance tag but no children, so no domains
        assert!(store.search(&SearchFilter::new().with_domain("SV")).is_empty());
    }

    #[test]
    fn test_facets() {
        let store = sample_store();
        assert_eq!(store.all_domains().into_iter().collect::<Vec<_>>(), vec!["AE", "LB"]);
        assert_eq!(
            store.all_tags().into_iter().collect::<Vec<_>>(),
            vec![Tag::Safety, Tag::DataQuality, Tag::Compliance]
        );
    }
}
