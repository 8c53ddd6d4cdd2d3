//! Scenario recommendations for a set of selected domains and tags.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::{ParentScenario, Tag};
use crate::validation::ValidationError;

/// Weight of a matching domain relative to a matching tag.
const DOMAIN_WEIGHT: u32 = 2;
const TAG_WEIGHT: u32 = 1;

/// What the user selected.
#[derive(Debug, Default, Clone)]
pub struct RecommendCriteria {
    pub domains: BTreeSet<String>,
    pub tags: BTreeSet<Tag>,
}

impl RecommendCriteria {
    pub fn new<D, T>(domains: D, tags: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator<Item = Tag>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().collect(),
        }
    }

    /// At least one domain or tag must be selected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.domains.is_empty() && self.tags.is_empty() {
            return Err(ValidationError::NoRecommendationCriteria);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub scenario: &'a ParentScenario,
    pub score: u32,
    /// Human-readable match explanations; not used for scoring
    pub reasons: Vec<String>,
}

/// Score one scenario. `None` when nothing overlaps.
fn score_scenario<'a>(
    scenario: &'a ParentScenario,
    criteria: &RecommendCriteria,
) -> Option<Recommendation<'a>> {
    let domains = scenario.domains();
    let domain_matches: Vec<&str> = criteria
        .domains
        .iter()
        .map(String::as_str)
        .filter(|d| domains.contains(d))
        .collect();

    let tags = scenario.tags();
    let tag_matches: Vec<Tag> = criteria
        .tags
        .iter()
        .copied()
        .filter(|t| tags.contains(t))
        .collect();

    let score = DOMAIN_WEIGHT * domain_matches.len() as u32 + TAG_WEIGHT * tag_matches.len() as u32;
    if score == 0 {
        return None;
    }

    let mut reasons = Vec::new();
    if !domain_matches.is_empty() {
        reasons.push(format!("Matches domains: {}", domain_matches.join(", ")));
    }
    if !tag_matches.is_empty() {
        let names: Vec<&str> = tag_matches.iter().map(|t| t.name()).collect();
        reasons.push(format!("Matches tags: {}", names.join(", ")));
    }

    Some(Recommendation {
        scenario,
        score,
        reasons,
    })
}

/// Recommend active scenarios, best match first.
///
/// Score is 2 per matching domain plus 1 per matching tag. Scenarios with no
/// overlap are left out. Ties keep the input order.
pub fn recommend<'a, I>(scenarios: I, criteria: &RecommendCriteria) -> Vec<Recommendation<'a>>
where
    I: IntoIterator<Item = &'a ParentScenario>,
{
    let mut recommendations: Vec<Recommendation<'a>> = scenarios
        .into_iter()
        .filter(|s| s.is_active)
        .filter_map(|s| score_scenario(s, criteria))
        .collect();

    // sort_by is stable
    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations
}
