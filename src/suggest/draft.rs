use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entity::{ChildScenario, Tag};
use crate::error::{EditCheckError, Result};

/// A child scenario as proposed by the generator, before it gets an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChildDraft {
    /// Short rule name
    pub name: String,
    /// Precise rule condition, e.g. "Rule: When AESER = 'Y' but AEOUT is missing"
    #[serde(default)]
    pub description: String,
    /// Older key for the rule condition, read only when `description` is empty
    #[serde(default, skip_serializing)]
    #[schemars(skip)]
    pub rule_description: Option<String>,
    /// CDASH variables the rule reads
    pub required_cdash_items: Vec<String>,
    /// CDISC domain codes, e.g. "AE"
    pub domains: Vec<String>,
    /// One of: Safety, Efficacy, Data Quality, Compliance, Protocol Deviation, Other
    pub tag: String,
    /// Concise clinical validation rule, at most 300 characters
    pub reasoning_template: String,
    /// Python function taking a DataFrame and returning flagged records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudo_code: Option<String>,
}

/// The JSON object the generator must return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftEnvelope {
    pub child_scenarios: Vec<ChildDraft>,
}

impl ChildDraft {
    /// Settle the rule condition: `description` first, then `rule_description`.
    /// A draft with neither is malformed.
    pub fn resolve_description(mut self) -> Result<Self> {
        if self.description.trim().is_empty() {
            match self.rule_description.take() {
                Some(text) if !text.trim().is_empty() => self.description = text,
                _ => {
                    return Err(EditCheckError::Generation(format!(
                        "draft '{}' has no description",
                        self.name
                    )))
                }
            }
        }
        self.rule_description = None;
        Ok(self)
    }

    pub fn into_child(self) -> ChildScenario {
        let mut child = ChildScenario::new(self.description);
        child.required_cdash_items = self.required_cdash_items;
        child.domains = self.domains;
        child.tag = Some(Tag::resolve(&self.tag));
        child.reasoning_template = self.reasoning_template;
        child.pseudo_code = self.pseudo_code.filter(|code| !code.trim().is_empty());
        child
    }
}

/// Turn drafts into children with fresh ids. Unknown tag names become `Other`.
pub fn drafts_to_children(drafts: Vec<ChildDraft>) -> Vec<ChildScenario> {
    drafts.into_iter().map(ChildDraft::into_child).collect()
}

/// Display fields of a proposed child, as shown in the create form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSuggestion {
    pub scenario_text: String,
    pub reasoning_template: String,
    pub domains: Vec<String>,
    pub required_cdash_items: Vec<String>,
    pub tag: String,
    #[serde(default)]
    pub pseudo_code: String,
}

impl From<&ChildScenario> for ChildSuggestion {
    fn from(child: &ChildScenario) -> Self {
        Self {
            scenario_text: child.scenario_text.clone(),
            reasoning_template: child.reasoning_template.clone(),
            domains: child.domains.clone(),
            required_cdash_items: child.required_cdash_items.clone(),
            tag: child.tag_name().unwrap_or_default().to_string(),
            pseudo_code: child.pseudo_code.clone().unwrap_or_default(),
        }
    }
}

impl From<&ChildDraft> for ChildSuggestion {
    fn from(draft: &ChildDraft) -> Self {
        let scenario_text = if draft.description.trim().is_empty() {
            draft.name.clone()
        } else {
            draft.description.clone()
        };
        Self {
            scenario_text,
            reasoning_template: draft.reasoning_template.clone(),
            domains: draft.domains.clone(),
            required_cdash_items: draft.required_cdash_items.clone(),
            tag: draft.tag.clone(),
            pseudo_code: draft.pseudo_code.clone().unwrap_or_default(),
        }
    }
}

impl ChildSuggestion {
    /// Accept a suggestion picked in the form as a new child.
    pub fn into_child(self) -> ChildScenario {
        let mut child = ChildScenario::new(self.scenario_text);
        child.reasoning_template = self.reasoning_template;
        child.domains = self.domains;
        child.required_cdash_items = self.required_cdash_items;
        child.tag = Some(Tag::resolve(&self.tag));
        child.pseudo_code = Some(self.pseudo_code).filter(|code| !code.trim().is_empty());
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(tag: &str) -> ChildDraft {
        ChildDraft {
            name: "Fatal outcome with drug continued".to_string(),
            description: "Rule: When AEOUT = 'FATAL' but AEACN = 'DRUG CONTINUED'".to_string(),
            required_cdash_items: vec!["AEOUT".to_string(), "AEACN".to_string()],
            domains: vec!["AE".to_string()],
            tag: tag.to_string(),
            rule_description: None,
            reasoning_template: "AEOUT is 'FATAL', flag where AEACN is 'DRUG CONTINUED'.".to_string(),
            pseudo_code: Some("def check(df):\n    return df".to_string()),
        }
    }

    fn raw_draft(keys: &str) -> ChildDraft {
        let raw = format!(
            r#"{{"name": "SAE", {} "required_cdash_items": ["AESER"], "domains": ["AE"], "tag": "Safety", "reasoning_template": "AESER is 'Y'."}}"#,
            keys
        );
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_description_wins_over_rule_description() {
        let parsed = raw_draft(r#""description": "Rule: When AESER = 'Y'", "rule_description": "older text","#)
            .resolve_description()
            .unwrap();
        assert_eq!(parsed.description, "Rule: When AESER = 'Y'");
        assert!(parsed.rule_description.is_none());
    }

    #[test]
    fn test_blank_description_falls_back_to_rule_description() {
        let parsed = raw_draft(r#""description": " ", "rule_description": "older text","#)
            .resolve_description()
            .unwrap();
        assert_eq!(parsed.description, "older text");
    }

    #[test]
    fn test_missing_description_is_error() {
        assert!(raw_draft("").resolve_description().is_err());
        assert!(raw_draft(r#""rule_description": "","#).resolve_description().is_err());
    }

    #[test]
    fn test_rule_description_only() {
        let raw = r#"{
            "name": "Basic Check",
            "rule_description": "Performs basic validation checks",
            "required_cdash_items": ["SUBJID"],
            "domains": ["DM"],
            "tag": "Data Quality",
            "reasoning_template": "Basic validation failed"
        }"#;
        let parsed: ChildDraft = serde_json::from_str(raw).unwrap();
        let parsed = parsed.resolve_description().unwrap();
        assert_eq!(parsed.description, "Performs basic validation checks");
        assert!(parsed.pseudo_code.is_none());
    }

    #[test]
    fn test_draft_round_trip_through_child() {
        let original = draft("Safety");
        let children = drafts_to_children(vec![original.clone()]);
        assert_eq!(children.len(), 1);

        let suggestion = ChildSuggestion::from(&children[0]);
        assert_eq!(suggestion.scenario_text, original.description);
        assert_eq!(suggestion.required_cdash_items, original.required_cdash_items);
        assert_eq!(suggestion.domains, original.domains);
        assert_eq!(suggestion.tag, "Safety");
        assert_eq!(suggestion.reasoning_template, original.reasoning_template);
        assert_eq!(Some(suggestion.pseudo_code), original.pseudo_code);
    }

    #[test]
    fn test_unknown_tag_becomes_other() {
        let children = drafts_to_children(vec![draft("Pharmacovigilance")]);
        assert_eq!(children[0].tag, Some(Tag::Other));
    }

    #[test]
    fn test_each_child_gets_fresh_id() {
        let children = drafts_to_children(vec![draft("Safety"), draft("Safety")]);
        assert_ne!(children[0].id, children[1].id);
    }

    #[test]
    fn test_blank_code_is_dropped() {
        let mut d = draft("Safety");
        d.pseudo_code = Some("  ".to_string());
        assert!(d.into_child().pseudo_code.is_none());
    }

    #[test]
    fn test_suggestion_into_child() {
        let suggestion = ChildSuggestion::from(&draft("Compliance"));
        let child = suggestion.into_child();
        assert_eq!(child.tag, Some(Tag::Compliance));
        assert_eq!(child.domains, vec!["AE".to_string()]);
        assert!(child.pseudo_code.is_some());
    }
}
