use serde::de::DeserializeOwned;

use super::draft::{ChildDraft, DraftEnvelope};
use crate::error::{EditCheckError, Result};

pub const MAX_REASONING_CHARS: usize = 300;

/// Parse a generator response into child drafts.
///
/// Missing `child_scenarios`, a wrong type, a missing required field and an
/// empty list are all errors.
pub fn parse_child_drafts(raw: &str) -> Result<Vec<ChildDraft>> {
    let envelope: DraftEnvelope = parse_json_object(raw)?;
    if envelope.child_scenarios.is_empty() {
        return Err(EditCheckError::Generation(
            "response contained no child scenarios".to_string(),
        ));
    }

    envelope
        .child_scenarios
        .into_iter()
        .map(|draft| {
            let mut draft = draft.resolve_description()?;
            draft.reasoning_template = truncate_chars(&draft.reasoning_template, MAX_REASONING_CHARS);
            Ok(draft)
        })
        .collect()
}

/// Deserialize the first JSON object found in `raw`.
///
/// Parsing starts at the first `{` and stops at the end of that object, so
/// prose and code fences around it are ignored.
pub fn parse_json_object<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let start = raw
        .find('{')
        .ok_or_else(|| EditCheckError::Generation("no JSON object in response".to_string()))?;
    serde_json::Deserializer::from_str(&raw[start..])
        .into_iter::<T>()
        .next()
        .ok_or_else(|| EditCheckError::Generation("no JSON object in response".to_string()))?
        .map_err(EditCheckError::from)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
