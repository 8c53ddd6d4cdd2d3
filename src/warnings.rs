//! Non-fatal conditions found while loading the seed dataset.
//!
//! None of these stop startup; they are collected and shown to the user so a
//! missing or partial seed does not go unnoticed.

use std::path::PathBuf;

use crate::entity::Tag;
use crate::storage::SeedScenario;

/// A warning about the seed dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The seed file does not exist; the store starts empty.
    SeedMissing { path: PathBuf },
    /// The seed file exists but could not be read or parsed; the store starts empty.
    SeedUnreadable { path: PathBuf, reason: String },
    /// A seeded parent has no child scenarios.
    ChildlessParent { name: String },
    /// A tag label did not name any known tag and was mapped to "Other".
    UnrecognizedTagLabel { scenario: String, label: String },
}

/// Check seed records and return any warnings.
///
/// # Arguments
/// * `records` - Raw seed records as read from the file
///
/// # Returns
/// A vector of warnings (empty if every record is complete)
pub fn check_seed(records: &[SeedScenario]) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for record in records {
        if record.children.is_empty() {
            warnings.push(Warning::ChildlessParent {
                name: record.name.clone(),
            });
        }

        if is_unrecognized_label(&record.tag) {
            warnings.push(Warning::UnrecognizedTagLabel {
                scenario: record.name.clone(),
                label: record.tag.clone(),
            });
        }

        for child in &record.children {
            if is_unrecognized_label(&child.tag) {
                warnings.push(Warning::UnrecognizedTagLabel {
                    scenario: child.scenario_text.clone(),
                    label: child.tag.clone(),
                });
            }
        }
    }

    warnings
}

/// A label that is present but neither names a tag nor says "Other".
fn is_unrecognized_label(label: &str) -> bool {
    let label = label.trim();
    !label.is_empty()
        && !label.contains("Other")
        && Tag::from_label(label) == Tag::Other
}

/// Format a warning for display.
pub fn format_warning(warning: &Warning) -> String {
    match warning {
        Warning::SeedMissing { path } => {
            format!(
                "Warning: seed data not found at {} - starting with no scenarios",
                path.display()
            )
        }
        Warning::SeedUnreadable { path, reason } => {
            format!(
                "Warning: could not load seed data from {} ({}) - starting with no scenarios",
                path.display(),
                reason
            )
        }
        Warning::ChildlessParent { name } => {
            format!("Warning: seeded scenario '{}' has no child scenarios", name)
        }
        Warning::UnrecognizedTagLabel { scenario, label } => {
            format!(
                "Warning: unrecognized tag '{}' on '{}' - using Other",
                label, scenario
            )
        }
    }
}
