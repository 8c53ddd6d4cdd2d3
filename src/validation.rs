//! Structured validation failures for user-supplied input.
//!
//! These are returned as values so callers can show a message; nothing here
//! panics or aborts.

use thiserror::Error;

/// Minimum description length before metadata (name + tag) is derived from it.
pub const MIN_METADATA_DESCRIPTION_LEN: usize = 70;

/// Minimum description length before query text and code are regenerated.
pub const MIN_CODE_UPDATE_DESCRIPTION_LEN: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Scenario name is required")]
    NameRequired,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Description must be at least {min} characters (got {actual})")]
    DescriptionTooShort { min: usize, actual: usize },

    #[error("Child scenario text is required")]
    ChildTextRequired,

    #[error("Select at least one domain or tag for recommendations")]
    NoRecommendationCriteria,
}

/// Check the fields of a new or edited parent scenario.
pub fn validate_new_scenario(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

pub fn validate_child_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::ChildTextRequired);
    }
    Ok(())
}

/// Require a non-empty description of at least `min` characters.
pub fn validate_description(description: &str, min: usize) -> Result<(), ValidationError> {
    let actual = description.trim().chars().count();
    if actual == 0 {
        return Err(ValidationError::DescriptionRequired);
    }
    if actual < min {
        return Err(ValidationError::DescriptionTooShort { min, actual });
    }
    Ok(())
}
