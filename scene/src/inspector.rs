//! Inspector draft buffers.
//!
//! The field buffer is seeded from the backend-rendered textual form of the
//! entity (the backend owns formatting and key order), never from a local
//! serialization. Field text and the script map are edited independently
//! but share one `saved` flag; any edit clears it.

#[cfg(test)]
#[path = "inspector_test.rs"]
mod inspector_test;

use std::collections::BTreeMap;

use crate::entity::Entity;

/// Edit buffers for one inspected entity.
#[derive(Debug, Clone)]
pub struct InspectorDraft {
    entity_id: String,
    fields_text: String,
    scripts: BTreeMap<String, String>,
    saved: bool,
}

impl InspectorDraft {
    /// Seed a draft from the last-synced entity and its rendered field text.
    #[must_use]
    pub fn seed(entity: &Entity, fields_text: impl Into<String>) -> Self {
        Self {
            entity_id: entity.id.clone(),
            fields_text: fields_text.into(),
            scripts: entity.scripts.clone(),
            saved: true,
        }
    }

    /// The baseline id this draft diffs against. Advances only on a
    /// confirmed save; a rename is not trusted until acknowledged.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// The current field buffer text.
    #[must_use]
    pub fn fields_text(&self) -> &str {
        &self.fields_text
    }

    /// The current draft script map.
    #[must_use]
    pub fn scripts(&self) -> &BTreeMap<String, String> {
        &self.scripts
    }

    /// Whether the draft has edits that were not yet confirmed saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.saved
    }

    /// Window-title form: the entity id, starred while unsaved.
    #[must_use]
    pub fn title(&self) -> String {
        if self.saved {
            self.entity_id.clone()
        } else {
            format!("{} *", self.entity_id)
        }
    }

    /// Replace the field buffer.
    pub fn edit_fields(&mut self, text: impl Into<String>) {
        self.fields_text = text.into();
        self.saved = false;
    }

    /// Add or replace one script body.
    pub fn edit_script(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.scripts.insert(name.into(), source.into());
        self.saved = false;
    }

    /// Remove one script. Returns whether it existed; removing a missing
    /// script does not dirty the draft.
    pub fn remove_script(&mut self, name: &str) -> bool {
        let removed = self.scripts.remove(name).is_some();
        if removed {
            self.saved = false;
        }
        removed
    }

    /// Record a confirmed save under the (possibly renamed) id.
    pub fn confirm_saved(&mut self, id: impl Into<String>) {
        self.entity_id = id.into();
        self.saved = true;
    }
}
