//! Override store - process-wide key-value persistence for user edits
//!
//! Keys are namespaced by formation so several formations can share one store:
//! `{formation}_{situation}_{rotation}` for a rotation record and `{formation}`
//! for formation-level settings. Values are JSON text.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::rotation::{Formation, Situation};

/// Local key-value persistence. Reads of unknown keys return `None`.
pub trait OverrideStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn remove(&mut self, key: &str);

    /// Every stored key starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// Key for one rotation record
pub fn record_key(formation: Formation, situation: Situation, rotation_number: u8) -> String {
    format!("{}_{}_{}", formation, situation, rotation_number)
}

/// Key for the formation-level record
pub fn formation_key(formation: Formation) -> String {
    formation.to_string()
}

/// Every stored key that belongs to `formation`
pub fn formation_keys(store: &dyn OverrideStore, formation: Formation) -> Vec<String> {
    let own = formation_key(formation);
    let record_prefix = format!("{}_", own);
    store
        .keys_with_prefix(&own)
        .into_iter()
        .filter(|k| *k == own || k.starts_with(&record_prefix))
        .collect()
}
