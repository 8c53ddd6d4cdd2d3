//! Keyword classification of scenario text.
//!
//! Everything in this module is pure: no I/O and no model calls, so the same
//! functions back the CLI, the prompt builder and the metadata helper.

use serde::Serialize;

use crate::entity::Tag;
use crate::validation::{validate_description, ValidationError, MIN_METADATA_DESCRIPTION_LEN};

const SAFETY_KEYWORDS: &[&str] = &[
    "adverse",
    "ae",
    "sae",
    "safety",
    "serious",
    "fatal",
    "death",
    "drug interaction",
    "vital sign",
    "blood pressure",
    "heart rate",
    "temperature",
    "allergic",
    "reaction",
];

const EFFICACY_KEYWORDS: &[&str] = &[
    "efficacy",
    "endpoint",
    "primary outcome",
    "secondary outcome",
    "response",
    "treatment effect",
    "improvement",
    "progression",
    "tumor",
    "survival",
];

const DATA_QUALITY_KEYWORDS: &[&str] = &[
    "missing",
    "incomplete",
    "data entry",
    "format",
    "validation",
    "duplicate",
    "consistency",
    "completeness",
    "accuracy",
    "range check",
];

const COMPLIANCE_KEYWORDS: &[&str] = &[
    "compliance",
    "adherence",
    "protocol",
    "inclusion",
    "exclusion",
    "eligibility",
    "visit window",
    "dosing",
    "medication compliance",
];

const PROTOCOL_DEVIATION_KEYWORDS: &[&str] = &[
    "deviation",
    "violation",
    "visit schedule",
    "procedure",
    "consent",
    "randomization",
    "enrollment",
    "withdrawal",
];

/// Categories in tie-break order.
const CATEGORIES: [(Tag, &[&str]); 5] = [
    (Tag::Safety, SAFETY_KEYWORDS),
    (Tag::Efficacy, EFFICACY_KEYWORDS),
    (Tag::DataQuality, DATA_QUALITY_KEYWORDS),
    (Tag::Compliance, COMPLIANCE_KEYWORDS),
    (Tag::ProtocolDeviation, PROTOCOL_DEVIATION_KEYWORDS),
];

/// Number of keywords from `keywords` occurring anywhere in `text`.
fn score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Classify free text into exactly one tag.
///
/// The category with the most keyword hits wins; ties go to the category
/// declared first (Safety, Efficacy, Data Quality, Compliance, Protocol
/// Deviation). No hits at all yields `Other`.
pub fn classify_tag(text: &str) -> Tag {
    let text = text.to_lowercase();

    let mut best = Tag::Other;
    let mut best_score = 0;
    for (tag, keywords) in CATEGORIES {
        let s = score(&text, keywords);
        if s > best_score {
            best = tag;
            best_score = s;
        }
    }
    best
}

/// Classify a scenario from its name and description.
pub fn determine_scenario_tag(name: &str, description: &str) -> Tag {
    classify_tag(&format!("{} {}", name, description))
}

/// (any of these keywords, and any of these context words) => name
const NAME_PATTERNS: &[(&[&str], &[&str], &str)] = &[
    (
        &["adverse event", "ae"],
        &["inconsisten", "mismatch", "outcome", "action"],
        "AE Outcome and Action Inconsistencies",
    ),
    (
        &["serious adverse", "sae"],
        &["follow", "timeframe", "deadline"],
        "Serious AE Follow-Up Compliance",
    ),
    (
        &["adverse event", "ae"],
        &["missing", "incomplete", "required"],
        "Missing Required AE Data",
    ),
    (
        &["adverse event", "ae"],
        &["concomitant", "medication", "interaction"],
        "AE and Concomitant Medication Review",
    ),
    (
        &["lab", "laboratory"],
        &["missing", "baseline", "required"],
        "Missing Baseline Laboratory Values",
    ),
    (
        &["lab", "laboratory"],
        &["range", "normal", "abnormal", "reference"],
        "Laboratory Reference Range Validation",
    ),
    (
        &["creatinine", "renal"],
        &["missing", "baseline"],
        "Missing Baseline Creatinine Assessment",
    ),
    (
        &["vital sign", "blood pressure", "heart rate"],
        &["missing", "baseline"],
        "Missing Baseline Vital Signs",
    ),
    (
        &["vital sign"],
        &["abnormal", "clinically significant"],
        "Clinically Significant Vital Sign Changes",
    ),
    (
        &["protocol", "compliance"],
        &["deviation", "violation"],
        "Protocol Deviation Monitoring",
    ),
    (
        &["visit", "schedule"],
        &["window", "timing", "compliance"],
        "Visit Window Compliance Check",
    ),
    (
        &["eligibility", "inclusion", "exclusion"],
        &["criteria", "violation"],
        "Eligibility Criteria Validation",
    ),
    (
        &["missing", "data"],
        &["required", "mandatory"],
        "Missing Required Data Elements",
    ),
    (
        &["duplicate", "data"],
        &["entry", "record"],
        "Duplicate Data Entry Detection",
    ),
    (
        &["date", "inconsisten"],
        &["logic", "sequence"],
        "Date Logic Inconsistencies",
    ),
    (
        &["concomitant", "medication"],
        &["missing", "end date"],
        "Concomitant Medication End Date Missing",
    ),
    (
        &["dose", "dosing"],
        &["compliance", "adherence"],
        "Dosing Compliance Monitoring",
    ),
    (
        &["efficacy"],
        &["endpoint", "assessment"],
        "Efficacy Endpoint Assessment",
    ),
    (&["safety"], &["monitoring", "signal"], "Safety Signal Detection"),
];

const PRIORITY_TERMS: &[(&str, &str)] = &[
    ("adverse", "AE"),
    ("ae", "AE"),
    ("serious", "Serious"),
    ("sae", "SAE"),
    ("laboratory", "Lab"),
    ("lab", "Lab"),
    ("baseline", "Baseline"),
    ("vital", "Vital"),
    ("signs", "Signs"),
    ("protocol", "Protocol"),
    ("compliance", "Compliance"),
    ("missing", "Missing"),
    ("data", "Data"),
    ("medication", "Medication"),
    ("concomitant", "Concomitant"),
    ("efficacy", "Efficacy"),
    ("safety", "Safety"),
    ("endpoint", "Endpoint"),
    ("visit", "Visit"),
    ("window", "Window"),
    ("deviation", "Deviation"),
];

const NAME_SUFFIXES: &[&str] = &[
    "Validation",
    "Check",
    "Monitoring",
    "Assessment",
    "Review",
    "Compliance",
];

const DEFAULT_SCENARIO_NAME: &str = "Clinical Data Quality Check";

/// Derive a short professional scenario name from a free-text description.
pub fn generate_scenario_name(description: &str) -> String {
    let lower = description.to_lowercase();

    for (keywords, context, name) in NAME_PATTERNS {
        let keyword_match = keywords.iter().any(|k| lower.contains(k));
        let context_match = context.iter().any(|c| lower.contains(c));
        if keyword_match && context_match {
            return (*name).to_string();
        }
    }

    let mut terms: Vec<&str> = Vec::new();
    for word in description.split_whitespace().take(15) {
        let clean = word
            .to_lowercase()
            .trim_matches(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
            .to_string();
        if let Some((_, mapped)) = PRIORITY_TERMS.iter().find(|(term, _)| *term == clean) {
            if !terms.contains(mapped) {
                terms.push(mapped);
            }
        }
        if terms.len() >= 4 {
            break;
        }
    }

    if terms.is_empty() {
        return DEFAULT_SCENARIO_NAME.to_string();
    }

    let mut name = terms.join(" ");
    if !NAME_SUFFIXES.iter().any(|s| name.contains(s)) {
        if name.contains("Missing") || name.contains("Data") {
            name.push_str(" Validation");
        } else if name.contains("AE") || name.contains("Safety") {
            name.push_str(" Monitoring");
        } else {
            name.push_str(" Assessment");
        }
    }
    name
}

/// Name and tag suggested for a scenario description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioMetadata {
    pub name: String,
    pub tag: Tag,
}

/// Suggest a name and tag for a sufficiently detailed description.
pub fn scenario_metadata(description: &str) -> Result<ScenarioMetadata, ValidationError> {
    validate_description(description, MIN_METADATA_DESCRIPTION_LEN)?;
    Ok(ScenarioMetadata {
        name: generate_scenario_name(description),
        tag: determine_scenario_tag("", description),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serious_fatal_is_safety() {
        assert_eq!(
            classify_tag("Serious adverse event with fatal outcome"),
            Tag::Safety
        );
    }

    #[test]
    fn test_no_keywords_is_other() {
        assert_eq!(classify_tag("quarterly billing reconciliation"), Tag::Other);
        assert_eq!(classify_tag(""), Tag::Other);
    }

    #[test]
    fn test_tie_prefers_earlier_category() {
        // "protocol" (Compliance) vs "deviation" (Protocol Deviation): one hit each
        assert_eq!(classify_tag("protocol deviation"), Tag::Compliance);
        // "missing" (Data Quality) vs "visit window" (Compliance)
        assert_eq!(classify_tag("missing visit window"), Tag::DataQuality);
    }

    #[test]
    fn test_higher_count_beats_declared_order() {
        // Data Quality: missing; Compliance: visit window;
        // Protocol Deviation: deviation, consent
        assert_eq!(
            classify_tag("missing visit window deviation consent"),
            Tag::ProtocolDeviation
        );
    }

    #[test]
    fn test_keyword_counted_once() {
        // two "missing" hits still score 1, so Safety (serious) keeps the tie
        assert_eq!(classify_tag("missing missing serious"), Tag::Safety);
    }

    #[test]
    fn test_case_insensitive_and_idempotent() {
        let text = "TUMOR PROGRESSION and overall SURVIVAL";
        let first = classify_tag(text);
        assert_eq!(first, Tag::Efficacy);
        assert_eq!(classify_tag(text), first);
    }

    #[test]
    fn test_result_always_in_closed_set() {
        for text in ["", "xyz", "consent withdrawal", "dosing adherence", "duplicate format"] {
            assert!(Tag::ALL.contains(&classify_tag(text)));
        }
    }

    #[test]
    fn test_determine_scenario_tag_combines_fields() {
        assert_eq!(
            determine_scenario_tag("Eligibility", "inclusion and exclusion review"),
            Tag::Compliance
        );
    }

    #[test]
    fn test_generate_name_pattern_match() {
        assert_eq!(
            generate_scenario_name("Adverse event outcome does not match the action taken"),
            "AE Outcome and Action Inconsistencies"
        );
        assert_eq!(
            generate_scenario_name("Find duplicate data entry for the same visit"),
            "Duplicate Data Entry Detection"
        );
    }

    #[test]
    fn test_generate_name_from_priority_terms() {
        assert_eq!(
            generate_scenario_name("Baseline, Endpoint."),
            "Baseline Endpoint Assessment"
        );
    }

    #[test]
    fn test_generate_name_default() {
        assert_eq!(generate_scenario_name("Something unrelated"), DEFAULT_SCENARIO_NAME);
    }

    #[test]
    fn test_scenario_metadata_requires_long_description() {
        assert!(matches!(
            scenario_metadata("too short"),
            Err(ValidationError::DescriptionTooShort { min: 70, .. })
        ));

        let description = "Identify serious adverse events where the follow-up report \
                           was not received within the required timeframe";
        let meta = scenario_metadata(description).unwrap();
        assert_eq!(meta.name, "Serious AE Follow-Up Compliance");
        assert_eq!(meta.tag, Tag::Safety);
    }
}
