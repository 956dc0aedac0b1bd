//! Scene store: the locally cached mirror of the remote entity table.
//!
//! DESIGN
//! ======
//! The store is replaced wholesale on every inbound snapshot and has no other
//! mutation path. The client never assumes a command succeeded; optimistic
//! echoes live in other components and the next snapshot is the truth. The
//! map key is the authoritative id for each entry; a payload that carries
//! its own `id` is overruled, so the two can never desync.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::entity::Entity;

/// In-memory mirror of the remote scene's entities, keyed by id.
pub struct SceneStore {
    entities: HashMap<String, Entity>,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { entities: HashMap::new() }
    }

    /// Replace the entire table from a snapshot map of id → entity fields.
    ///
    /// Ids absent from `raw` are removed; present ids are fully
    /// reconstructed by merging `{"id": <key>}` over the payload fields.
    /// Entries that do not reconstruct into a valid entity are dropped and
    /// their ids returned so the caller can log them; the replacement is
    /// total either way.
    pub fn apply_snapshot(&mut self, raw: &Map<String, Value>) -> Vec<String> {
        let mut next = HashMap::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (id, fields) in raw {
            let Some(fields) = fields.as_object() else {
                rejected.push(id.clone());
                continue;
            };
            let mut merged = fields.clone();
            merged.insert("id".to_owned(), Value::String(id.clone()));
            match serde_json::from_value::<Entity>(Value::Object(merged)) {
                Ok(entity) => {
                    next.insert(id.clone(), entity);
                }
                Err(_) => rejected.push(id.clone()),
            }
        }

        self.entities = next;
        rejected
    }

    /// Return an entity by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Entities in draw order: by layer, then id for a stable tiebreak.
    #[must_use]
    pub fn ordered_entities(&self) -> Vec<&Entity> {
        let mut entities: Vec<&Entity> = self.entities.values().collect();
        entities.sort_by(|a, b| {
            a.layer_or_default()
                .cmp(&b.layer_or_default())
                .then_with(|| a.id.cmp(&b.id))
        });
        entities
    }

    /// Derive an id not present in the store by suffixing a counter.
    ///
    /// Used when creating entities so a duplicate-named create cannot be
    /// rejected by the remote process.
    #[must_use]
    pub fn unique_id(&self, base: &str) -> String {
        if !self.entities.contains_key(base) {
            return base.to_owned();
        }
        let mut n: u64 = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.entities.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Number of entities currently mirrored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the mirror holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}
