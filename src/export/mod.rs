//! Tabular export of the scenario library.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::entity::{ChildScenario, ParentScenario};
use crate::error::Result;

pub const CSV_HEADER: [&str; 12] = [
    "Parent ID",
    "Parent Name",
    "Parent Description",
    "Parent Tags",
    "Is Active",
    "Is OOTB",
    "Child ID",
    "Child Scenario Text",
    "Required CDASH Items",
    "Domains",
    "Child Tags",
    "Reasoning Template",
];

const LIST_SEPARATOR: &str = ", ";

/// `qad_scenarios_YYYYMMDD_HHMMSS.csv`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("qad_scenarios_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn row(parent: &ParentScenario, child: Option<&ChildScenario>) -> Vec<String> {
    let mut fields = vec![
        parent.id.to_string(),
        parent.name.clone(),
        parent.description.clone(),
        parent.tag_name().unwrap_or_default().to_string(),
        parent.is_active.to_string(),
        parent.is_ootb.to_string(),
    ];

    match child {
        Some(child) => fields.extend([
            child.id.to_string(),
            child.scenario_text.clone(),
            child.required_cdash_items.join(LIST_SEPARATOR),
            child.domains.join(LIST_SEPARATOR),
            child.tag_name().unwrap_or_default().to_string(),
            child.reasoning_template.clone(),
        ]),
        None => fields.extend(std::iter::repeat(String::new()).take(6)),
    }

    fields
}

/// Write one row per child, or a single row with empty child columns for a
/// parent without children. Returns the number of data rows written.
pub fn write_csv<'a, I, W>(scenarios: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a ParentScenario>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for parent in scenarios {
        if parent.child_scenarios.is_empty() {
            wtr.write_record(row(parent, None))?;
            rows += 1;
        } else {
            for child in &parent.child_scenarios {
                wtr.write_record(row(parent, Some(child)))?;
                rows += 1;
            }
        }
    }

    wtr.flush()?;
    tracing::debug!(rows, "exported scenarios to CSV");
    Ok(rows)
}
