//! Seed dataset of out-of-the-box scenarios.
//!
//! The seed is a JSON (or YAML) list of parent records, each carrying its
//! children. It is read once at startup; a missing or broken file leaves the
//! store empty and produces a [`Warning`] instead of an error.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{ChildScenario, ParentScenario, Tag};
use crate::error::Result;
use crate::warnings::{check_seed, Warning};

/// Default seed file name, resolved against the working directory.
pub const DEFAULT_SEED_FILE: &str = "processed_ootb_scenarios.json";

const MAX_REASONING_CHARS: usize = 500;
const DEFAULT_REASONING: &str = "Clinical data validation rule";

/// Column prefixes that identify a CDISC domain.
const DOMAIN_PREFIXES: [&str; 7] = ["AE", "CM", "DM", "VS", "LB", "EX", "DS"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedScenario {
    /// Fixed id; derived from position and name when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    /// Tag label; may be a plain name or a decorated string
    pub tag: String,
    pub children: Vec<SeedChild>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedChild {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub scenario_text: String,
    pub required_cdash_items: Vec<String>,
    pub domains: Vec<String>,
    pub tag: String,
    pub reasoning_template: String,
    pub pseudo_code: String,
}

impl SeedChild {
    fn into_child(self, id: Uuid) -> ChildScenario {
        let mut child = ChildScenario::new(self.scenario_text);
        child.id = self.id.unwrap_or(id);
        child.required_cdash_items = self.required_cdash_items;
        child.domains = self.domains;
        child.tag = Some(Tag::from_label(&self.tag));
        child.reasoning_template = self.reasoning_template;
        child.pseudo_code = Some(self.pseudo_code).filter(|code| !code.trim().is_empty());
        child
    }
}

impl SeedScenario {
    /// Convert a seed record into a protected, active parent scenario.
    pub fn into_parent(self) -> ParentScenario {
        let id = self.id.unwrap_or_else(Uuid::new_v4);
        let tag = Tag::from_label(&self.tag);
        let children = self
            .children
            .into_iter()
            .enumerate()
            .map(|(i, child)| child.into_child(Uuid::new_v5(&id, i.to_string().as_bytes())))
            .collect();
        let mut parent = ParentScenario::ootb(self.name, self.description, Some(tag), children);
        parent.id = id;
        parent
    }
}

/// Id for a seed record that has none. Stable across restarts as long as the
/// file keeps its order.
fn seed_id(position: usize, name: &str) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("edit-checks/seed/{}/{}", position, name).as_bytes(),
    )
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read seed records from a JSON or YAML file.
pub fn read_seed(path: &Path) -> Result<Vec<SeedScenario>> {
    let raw = fs::read_to_string(path)?;
    if is_yaml(path) {
        Ok(serde_yaml::from_str(&raw)?)
    } else {
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Load the seed file into OOTB parents, tolerating a missing or broken file.
pub fn load(path: &Path) -> (Vec<ParentScenario>, Vec<Warning>) {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "seed data not found");
        return (
            Vec::new(),
            vec![Warning::SeedMissing {
                path: path.to_path_buf(),
            }],
        );
    }

    let records = match read_seed(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "seed data unreadable");
            return (
                Vec::new(),
                vec![Warning::SeedUnreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }],
            );
        }
    };

    let warnings = check_seed(&records);
    let parents: Vec<ParentScenario> = records
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            record.id.get_or_insert_with(|| seed_id(i, &record.name));
            record.into_parent()
        })
        .collect();
    tracing::debug!(
        parents = parents.len(),
        children = parents.iter().map(|p| p.child_scenarios.len()).sum::<usize>(),
        "loaded seed scenarios"
    );
    (parents, warnings)
}

/// Write seed records as pretty-printed JSON.
pub fn write_seed<W: Write>(records: &[SeedScenario], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// One row of the source spreadsheet, as exported to JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedRow {
    #[serde(rename = "Parent_ID")]
    pub parent_id: Option<String>,
    #[serde(rename = "Parent scenario")]
    pub parent_scenario: Option<String>,
    #[serde(rename = "Domain_combination")]
    pub domain_combination: Option<String>,
    #[serde(rename = "Child_ID")]
    pub child_id: Option<String>,
    #[serde(rename = "Simplified Child Scenario")]
    pub simplified_child: Option<String>,
    #[serde(rename = "Simplified Child Scenario (Plain English)")]
    pub simplified_child_plain: Option<String>,
    #[serde(rename = "Needed cols")]
    pub needed_cols: Option<String>,
    #[serde(rename = "Rules in Standard format")]
    pub rules: Option<String>,
    #[serde(rename = "Scenario")]
    pub scenario: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parent tag implied by the domains a spreadsheet group covers.
fn tag_for_domain_combination(combo: &str) -> Tag {
    if combo.contains("AE") {
        Tag::Safety
    } else if combo.contains("CM") || combo.contains("EX") {
        Tag::Compliance
    } else if combo.contains("DM") || combo.contains("VS") {
        Tag::DataQuality
    } else {
        Tag::Other
    }
}

/// Parse a list literal such as `['AETERM', "AESTDTC"]`. Anything else is empty.
pub fn parse_needed_cols(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let inner = match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => inner,
        None => return Vec::new(),
    };

    inner
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Domains inferred from column-name prefixes, sorted.
pub fn domains_for_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter_map(|col| DOMAIN_PREFIXES.iter().find(|p| col.starts_with(*p)))
        .map(|p| p.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}

fn code_template(plain: &str, child_id: &str, reasoning: &str, columns: &[String]) -> String {
    let summary: String = reasoning.chars().take(200).collect();
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!(
        "# Data validation logic for {plain}\n\
         # Based on: {child_id}\n\
         \n\
         def validate_scenario(data):\n\
         \x20   \"\"\"\n\
         \x20   {summary}...\n\
         \x20   \"\"\"\n\
         \x20   violations = []\n\
         \n\
         \x20   required_cols = [{cols}]\n\
         \x20   for col in required_cols:\n\
         \x20       if col not in data.columns:\n\
         \x20           violations.append(f\"Missing required column: {{col}}\")\n\
         \x20           return violations\n\
         \n\
         \x20   # {plain}\n\
         \x20   return violations\n",
        cols = quoted.join(", "),
    )
}

/// Group spreadsheet rows by parent id into seed records.
///
/// Groups keep first-seen order. Rows without a child scenario are skipped,
/// as are parents left with no children or without a name.
pub fn build_from_rows(rows: &[SeedRow]) -> Vec<SeedScenario> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&SeedRow>> = HashMap::new();

    for row in rows {
        let Some(parent_id) = non_empty(&row.parent_id) else {
            continue;
        };
        groups
            .entry(parent_id)
            .or_insert_with(|| {
                order.push(parent_id);
                Vec::new()
            })
            .push(row);
    }

    let mut records = Vec::new();
    for parent_id in order {
        let group = &groups[parent_id];
        let first = group[0];
        let Some(name) = non_empty(&first.parent_scenario) else {
            continue;
        };
        let combo = first.domain_combination.as_deref().unwrap_or_default();
        let tag = tag_for_domain_combination(combo);

        let children: Vec<SeedChild> = group
            .iter()
            .filter_map(|row| {
                let text = non_empty(&row.simplified_child)?;
                let columns = row
                    .needed_cols
                    .as_deref()
                    .map(parse_needed_cols)
                    .unwrap_or_default();
                let reasoning = non_empty(&row.rules)
                    .or(non_empty(&row.scenario))
                    .unwrap_or(DEFAULT_REASONING);
                let plain = non_empty(&row.simplified_child_plain).unwrap_or("scenario");
                let child_id = non_empty(&row.child_id).unwrap_or("N/A");

                Some(SeedChild {
                    id: None,
                    scenario_text: text.to_string(),
                    domains: domains_for_columns(&columns),
                    tag: tag.name().to_string(),
                    reasoning_template: truncate_chars(reasoning, MAX_REASONING_CHARS),
                    pseudo_code: code_template(plain, child_id, reasoning, &columns),
                    required_cdash_items: columns,
                })
            })
            .collect();

        if children.is_empty() {
            continue;
        }

        records.push(SeedScenario {
            id: None,
            name: name.to_string(),
            description: format!(
                "Clinical data quality scenarios for {} domain validation",
                combo
            ),
            tag: tag.name().to_string(),
            children,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SEED_JSON: &str = r#"[
        {
            "name": "AE Outcome Checks",
            "description": "Adverse event outcome consistency",
            "tag": "Tag(name='Safety', color='light text-dark')",
            "children": [
                {
                    "scenario_text": "Fatal outcome but drug continued",
                    "required_cdash_items": ["AEOUT", "AEACN"],
                    "domains": ["AE"],
                    "tag": "Safety",
                    "reasoning_template": "AEOUT = 'FATAL' but AEACN = 'DRUG CONTINUED'",
                    "pseudo_code": ""
                }
            ]
        },
        { "name": "Empty Parent", "tag": "Compliance" }
    ]"#;

    #[test]
    fn test_load_missing_file_warns() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.json");
        let (parents, warnings) = load(&path);
        assert!(parents.is_empty());
        assert_eq!(warnings, vec![Warning::SeedMissing { path }]);
    }

    #[test]
    fn test_load_malformed_file_warns() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.json");
        fs::write(&path, "{ not json").unwrap();
        let (parents, warnings) = load(&path);
        assert!(parents.is_empty());
        assert!(matches!(warnings[0], Warning::SeedUnreadable { .. }));
    }

    #[test]
    fn test_load_json_seed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.json");
        fs::write(&path, SEED_JSON).unwrap();

        let (parents, warnings) = load(&path);
        assert_eq!(parents.len(), 2);
        assert!(parents.iter().all(|p| p.is_ootb && p.is_active));

        let ae = &parents[0];
        assert_eq!(ae.tag, Some(Tag::Safety));
        assert_eq!(ae.child_scenarios.len(), 1);
        let child = &ae.child_scenarios[0];
        assert_eq!(child.required_cdash_items, vec!["AEOUT", "AEACN"]);
        assert_eq!(child.tag, Some(Tag::Safety));
        assert!(child.pseudo_code.is_none());

        assert_eq!(parents[1].tag, Some(Tag::Compliance));
        assert_eq!(
            warnings,
            vec![Warning::ChildlessParent {
                name: "Empty Parent".to_string()
            }]
        );
    }

    #[test]
    fn test_seed_ids_are_stable_across_loads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.json");
        fs::write(&path, SEED_JSON).unwrap();

        let (first, _) = load(&path);
        let (second, _) = load(&path);
        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
        assert_eq!(
            first[0].child_scenarios[0].id,
            second[0].child_scenarios[0].id
        );
    }

    #[test]
    fn test_explicit_seed_id_is_kept() {
        let id = Uuid::new_v4();
        let record = SeedScenario {
            id: Some(id),
            name: "Fixed".to_string(),
            ..SeedScenario::default()
        };
        assert_eq!(record.into_parent().id, id);
    }

    #[test]
    fn test_load_yaml_seed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.yaml");
        fs::write(
            &path,
            "- name: Lab Ranges\n  tag: Data Quality\n  children:\n    - scenario_text: LBORRES outside range\n      domains: [LB]\n",
        )
        .unwrap();

        let (parents, warnings) = load(&path);
        assert!(warnings.is_empty());
        assert_eq!(parents[0].name, "Lab Ranges");
        assert_eq!(parents[0].tag, Some(Tag::DataQuality));
        assert_eq!(parents[0].child_scenarios[0].domains, vec!["LB"]);
    }

    #[test]
    fn test_parse_needed_cols() {
        assert_eq!(
            parse_needed_cols("['AETERM', \"AESTDTC\"]"),
            vec!["AETERM".to_string(), "AESTDTC".to_string()]
        );
        assert!(parse_needed_cols("[]").is_empty());
        assert!(parse_needed_cols("null").is_empty());
        assert!(parse_needed_cols("AETERM").is_empty());
    }

    #[test]
    fn test_domains_for_columns() {
        let cols: Vec<String> = ["LBORRES", "AETERM", "AESTDTC", "SUBJID"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(domains_for_columns(&cols), vec!["AE", "LB"]);
    }

    fn row(parent: &str, name: &str, combo: &str, child: Option<&str>) -> SeedRow {
        SeedRow {
            parent_id: Some(parent.to_string()),
            parent_scenario: Some(name.to_string()),
            domain_combination: Some(combo.to_string()),
            simplified_child: child.map(str::to_string),
            needed_cols: Some("['AETERM', 'CMTRT']".to_string()),
            rules: Some("x".repeat(600)),
            ..SeedRow::default()
        }
    }

    #[test]
    fn test_build_from_rows_groups_in_order() {
        let rows = vec![
            row("P2", "Medication Checks", "CM", Some("CM end date missing")),
            row("P1", "AE Checks", "AE+CM", Some("AE without term")),
            row("P2", "Medication Checks", "CM", Some("CM dose missing")),
            row("P3", "No Children", "DM", None),
            SeedRow::default(),
        ];

        let records = build_from_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Medication Checks");
        assert_eq!(records[0].tag, "Compliance");
        assert_eq!(records[0].children.len(), 2);
        assert_eq!(records[1].tag, "Safety");
        assert_eq!(
            records[1].description,
            "Clinical data quality scenarios for AE+CM domain validation"
        );

        let child = &records[0].children[0];
        assert_eq!(child.domains, vec!["AE", "CM"]);
        assert_eq!(child.reasoning_template.chars().count(), 503);
        assert!(child.reasoning_template.ends_with("..."));
        assert!(child.pseudo_code.contains("required_cols = ['AETERM', 'CMTRT']"));
    }

    #[test]
    fn test_write_then_read_seed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("built.json");
        let records = build_from_rows(&[row("P1", "AE Checks", "AE", Some("AE without term"))]);

        let file = fs::File::create(&path).unwrap();
        write_seed(&records, file).unwrap();

        let parents: Vec<ParentScenario> = read_seed(&path)
            .unwrap()
            .into_iter()
            .map(SeedScenario::into_parent)
            .collect();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].tag, Some(Tag::Safety));
        assert!(parents[0].child_scenarios[0].pseudo_code.is_some());
    }
}
