//! Consent record encoding.
//!
//! The persisted consent record is an ordered list of accepted category
//! identifiers, serialized as a JSON string array. JSON is self-delimiting,
//! so identifiers containing delimiter characters (`,`, `;`, quotes,
//! brackets, whitespace) round-trip exactly and cannot corrupt the stored
//! value.

use crate::errors::ConsentError;

/// Serializes `ids` into the persisted textual form.
///
/// # Panics
/// Panics if string-list serialization fails, which serde_json guarantees
/// not to happen for `&[String]`.
pub(crate) fn encode(ids: &[String]) -> String {
    serde_json::to_string(ids).expect("Failed to serialize consent record")
}

/// Decodes a raw persisted value into the list of identifiers it holds.
///
/// Fails when the payload is not valid JSON, not a string array, or an
/// empty array. An empty array is not a consent decision: the accept path
/// always stores at least the essential category.
pub(crate) fn decode(raw: &str) -> Result<Vec<String>, ConsentError> {
    let ids: Vec<String> = serde_json::from_str(raw)?;
    if ids.is_empty() {
        return Err(ConsentError::EmptyRecord);
    }
    Ok(ids)
}

/// Drops identifiers not present in `known`, preserving stored order and
/// removing duplicates.
///
/// This is the configuration-migration safety net: consent for a category
/// that has since been removed or renamed is discarded rather than honored.
pub(crate) fn filter_known(ids: Vec<String>, known: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(ids.len());
    for id in ids {
        if known.iter().any(|k| *k == id) && !kept.contains(&id) {
            kept.push(id);
        }
    }
    kept
}
