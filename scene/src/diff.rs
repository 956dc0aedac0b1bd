//! Change-set computation for inspector saves.
//!
//! DESIGN
//! ======
//! The inspector edits a textual field draft plus a script map, both seeded
//! from the last-synced entity. On save, the draft is diffed against that
//! baseline and only the difference travels: changed keys carry their new
//! value, keys the draft dropped carry an explicit `null` (delete), equal
//! keys are omitted. Scripts diff as one unit: if any script key or body
//! differs, the whole map is included. A changed `id` is a rename, which is
//! a distinct operation ordered before the property update.

#[cfg(test)]
#[path = "diff_test.rs"]
mod diff_test;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::entity::Entity;

/// Why an inspector draft could not be turned into a change-set.
///
/// Any of these abort the save with no state mutated anywhere.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("draft is not valid JSON: {0}")]
    InvalidDraft(#[from] serde_json::Error),
    #[error("draft must be a JSON object")]
    NotAnObject,
    #[error("draft must carry a string id")]
    MissingId,
}

/// A pending rename, issued before the property update it accompanies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub original_id: String,
    pub new_id: String,
}

/// The minimal difference between a draft and its baseline entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Set when the draft's id differs from the baseline's.
    pub rename: Option<Rename>,
    /// Changed fields; `Value::Null` marks a key the draft removed.
    pub fields: Map<String, Value>,
    /// The whole replacement script map, present only when scripts differ.
    pub scripts: Option<BTreeMap<String, String>>,
}

impl ChangeSet {
    /// True when nothing differs; saving this must be a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rename.is_none() && self.fields.is_empty() && self.scripts.is_none()
    }
}

/// Compute the change-set between the last-synced entity and an edited draft.
///
/// Calling this twice with the same unchanged pair yields an empty
/// change-set both times; it never mutates its inputs.
///
/// # Errors
///
/// Fails when the draft text does not parse into a JSON object carrying a
/// non-empty string `id`.
pub fn compute_change_set(
    baseline: &Entity,
    draft_text: &str,
    draft_scripts: &BTreeMap<String, String>,
) -> Result<ChangeSet, DiffError> {
    let draft: Value = serde_json::from_str(draft_text)?;
    let Value::Object(mut draft) = draft else {
        return Err(DiffError::NotAnObject);
    };

    let draft_id = match draft.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => return Err(DiffError::MissingId),
    };
    // Scripts never ride in the field diff; they have their own channel.
    draft.remove("scripts");

    let mut base_fields = entity_fields(baseline)?;
    base_fields.remove("id");
    base_fields.remove("scripts");

    let mut set = ChangeSet::default();
    if draft_id != baseline.id {
        set.rename = Some(Rename { original_id: baseline.id.clone(), new_id: draft_id });
    }

    for (key, draft_value) in &draft {
        match base_fields.get(key) {
            Some(base_value) if deep_eq(base_value, draft_value) => {}
            _ => {
                set.fields.insert(key.clone(), draft_value.clone());
            }
        }
    }
    for key in base_fields.keys() {
        if !draft.contains_key(key) {
            set.fields.insert(key.clone(), Value::Null);
        }
    }

    if draft_scripts != &baseline.scripts {
        set.scripts = Some(draft_scripts.clone());
    }

    Ok(set)
}

/// The baseline entity as a JSON field bag.
fn entity_fields(entity: &Entity) -> Result<Map<String, Value>, DiffError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(DiffError::NotAnObject),
    }
}

/// Deep equality with numeric tolerance: JSON numbers compare by f64 value,
/// so a hand-typed `10` equals a serialized `10.0`.
#[allow(clippy::float_cmp)]
fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| deep_eq(v, w)))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(v, w)| deep_eq(v, w))
        }
        _ => a == b,
    }
}
