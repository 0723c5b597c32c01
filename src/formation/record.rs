//! Rotation record - the live, editable copy of one template
//!
//! A record starts as a deep copy of its template. If the override store holds a
//! saved copy, the saved lists are merged with the template field by field so
//! that overrides written before a field existed (or after one was retired)
//! stay usable.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::rotation::{Formation, Situation};
use crate::store::{OverrideStore, record_key};
use crate::templates::{PositionTemplate, SeatFields};

/// Mutable working copy for one (formation, situation, rotation)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationRecord {
    pub formation: Formation,
    pub situation: Situation,
    pub rotation_number: u8,
    #[serde(flatten)]
    pub fields: SeatFields,
    /// Last committed state, compared against `fields` for dirty checks
    #[serde(skip)]
    committed: SeatFields,
}

impl RotationRecord {
    /// Deep copy of a template, clean against its own snapshot
    pub fn from_template(template: &PositionTemplate) -> Self {
        Self {
            formation: template.formation,
            situation: template.situation,
            rotation_number: template.rotation_number,
            fields: template.fields.clone(),
            committed: template.fields.clone(),
        }
    }

    /// Build the record for `template`, overlaying and repairing any saved override.
    ///
    /// A repaired override is written back immediately so the fix is durable.
    pub fn load_merged(template: &PositionTemplate, store: &mut dyn OverrideStore) -> Self {
        let mut record = Self::from_template(template);

        let Some(saved) = record.load(store) else {
            return record;
        };

        record.fields = saved.fields;
        if merge_fields(&mut record.fields, &template.fields) {
            info!("Override {} drifted from its template, writing back", record.key());
            record.save(store);
        }
        record.snapshot();
        record
    }

    /// Store key: `{formation}_{situation}_{rotationNumber}`
    pub fn key(&self) -> String {
        record_key(self.formation, self.situation, self.rotation_number)
    }

    /// Read the saved override for this record's key, if any
    pub fn load(&self, store: &dyn OverrideStore) -> Option<RotationRecord> {
        let key = self.key();
        let json = store.get(&key)?;
        match serde_json::from_str::<RotationRecord>(&json) {
            Ok(mut saved) => {
                debug!("RotationRecord.load {}", key);
                saved.committed = saved.fields.clone();
                Some(saved)
            }
            Err(e) => {
                warn!("Ignoring unreadable override {}: {}", key, e);
                None
            }
        }
    }

    /// Persist the live state and make it the new baseline
    pub fn save(&mut self, store: &mut dyn OverrideStore) {
        let key = self.key();
        match serde_json::to_string(self) {
            Ok(json) => {
                debug!("RotationRecord.save {}", key);
                store.set(&key, &json);
                self.snapshot();
            }
            Err(e) => warn!("Failed to serialize {}: {}", key, e),
        }
    }

    /// Capture the live state as the committed baseline
    pub fn snapshot(&mut self) {
        self.committed = self.fields.clone();
    }

    /// True if the live state differs from the last snapshot
    pub fn is_dirty(&self) -> bool {
        self.fields != self.committed
    }

    /// Overwrite the live state with the last snapshot
    pub fn revert(&mut self) {
        debug!("RotationRecord.revert {}", self.key());
        self.fields = self.committed.clone();
    }
}

/// Reconcile saved per-seat lists with the template's current shape.
///
/// Each list is brought to the template's length: missing trailing entries
/// (including a wholly empty list from an older save) come from the template,
/// and entries beyond the template's length (including every entry of a retired,
/// now-empty template list) are dropped. Returns true if anything changed.
pub fn merge_fields(saved: &mut SeatFields, template: &SeatFields) -> bool {
    let mut patched = false;
    patched |= merge_list(&mut saved.positions, &template.positions);
    patched |= merge_list(&mut saved.player_names, &template.player_names);
    patched |= merge_list(&mut saved.arrow_types, &template.arrow_types);
    patched |= merge_list(&mut saved.segment_types, &template.segment_types);
    patched |= merge_list(&mut saved.arrow_head_colors, &template.arrow_head_colors);
    patched |= merge_list(&mut saved.arrow_segment_colors, &template.arrow_segment_colors);
    patched |= merge_list(&mut saved.arrow_heights, &template.arrow_heights);
    patched |= merge_list(&mut saved.arrow_segment_lengths, &template.arrow_segment_lengths);
    patched
}

fn merge_list<T: Clone>(saved: &mut Vec<T>, template: &[T]) -> bool {
    if saved.len() == template.len() {
        return false;
    }
    if saved.len() > template.len() {
        saved.truncate(template.len());
    } else {
        saved.extend_from_slice(&template[saved.len()..]);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{ArrowType, SegmentType};
    use crate::store::MemoryStore;
    use crate::templates::default_template;

    fn template() -> PositionTemplate {
        default_template(Formation::SixTwo, Situation::ServeStack, 3)
    }

    /// Saved override as an older build would have written it: no colors or arrow sizes
    fn legacy_override_json() -> String {
        r#"{
            "formation": "F6_2",
            "situation": "ServeStack",
            "rotationNumber": 3,
            "playerNames": ["Ana", "Bea", "Cat", "Dee", "Eve", "Fay"],
            "positions": [[1.0,0.0,-8.0],[3.0,0.0,-1.0],[0.0,0.0,-1.0],[-3.0,0.0,-1.0],[-3.0,0.0,-6.0],[0.0,0.0,-6.5]],
            "arrowTypes": ["BlueZip","BlueZip","BlueZip","BlueZip","BlueZip","BlueZip"],
            "segmentTypes": []
        }"#
        .to_string()
    }

    #[test]
    fn test_from_template_is_clean_deep_copy() {
        let t = template();
        let mut record = RotationRecord::from_template(&t);
        assert!(!record.is_dirty());
        assert_eq!(record.fields, t.fields);

        record.fields.player_names[0] = "Changed".to_string();
        assert!(record.is_dirty());
        assert_eq!(t.fields.player_names[0], "S1");
    }

    #[test]
    fn test_load_without_override_equals_template() {
        let t = template();
        let mut store = MemoryStore::default();
        let record = RotationRecord::load_merged(&t, &mut store);
        assert_eq!(record.fields, t.fields);
        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_override_merged_and_written_back() {
        let t = template();
        let mut store = MemoryStore::default();
        store.set("F6_2_ServeStack_3", &legacy_override_json());

        let record = RotationRecord::load_merged(&t, &mut store);

        // Saved values survive
        assert_eq!(record.fields.player_names[0], "Ana");
        assert_eq!(record.fields.positions[0], Vec3::new(1.0, 0.0, -8.0));
        assert_eq!(record.fields.arrow_types[2], ArrowType::BlueZip);
        // Missing and empty fields come from the template
        assert_eq!(record.fields.segment_types, t.fields.segment_types);
        assert_eq!(record.fields.arrow_heights, t.fields.arrow_heights);
        assert_eq!(record.fields.arrow_head_colors, t.fields.arrow_head_colors);
        assert!(!record.is_dirty());

        // Repaired copy is durable
        let reread: RotationRecord =
            serde_json::from_str(&store.get("F6_2_ServeStack_3").unwrap()).unwrap();
        assert_eq!(reread.fields, record.fields);
    }

    #[test]
    fn test_override_with_none_arrow_names_loads() {
        let t = template();
        let mut store = MemoryStore::default();
        let json = legacy_override_json()
            .replace(r#""arrowTypes": ["BlueZip","BlueZip""#, r#""arrowTypes": ["None","BlueZip""#)
            .replace(r#""segmentTypes": []"#, r#""segmentTypes": ["None","None","None","None","None","None"]"#);
        store.set("F6_2_ServeStack_3", &json);

        let record = RotationRecord::load_merged(&t, &mut store);
        assert_eq!(record.fields.player_names[0], "Ana");
        assert_eq!(record.fields.arrow_types[0], ArrowType::Hidden);
        assert_eq!(record.fields.arrow_types[1], ArrowType::BlueZip);
        assert_eq!(record.fields.segment_types, vec![SegmentType::Hidden; 6]);
    }

    #[test]
    fn test_retired_field_cleared() {
        let mut t = template();
        t.fields.arrow_segment_lengths.clear();

        let mut saved = RotationRecord::from_template(&template());
        let mut store = MemoryStore::default();
        saved.save(&mut store);

        let record = RotationRecord::load_merged(&t, &mut store);
        assert!(record.fields.arrow_segment_lengths.is_empty());

        let reread: RotationRecord =
            serde_json::from_str(&store.get("F6_2_ServeStack_3").unwrap()).unwrap();
        assert!(reread.fields.arrow_segment_lengths.is_empty());
    }

    #[test]
    fn test_merge_matches_template_lengths() {
        let t = template();
        let mut saved = SeatFields {
            player_names: vec!["A".into(), "B".into()],
            arrow_heights: vec![1.0; 9],
            ..Default::default()
        };
        assert!(merge_fields(&mut saved, &t.fields));
        assert_eq!(saved.lengths(), t.fields.lengths());
        assert_eq!(saved.player_names[0], "A");
        assert_eq!(saved.player_names[2], "MB1");
        assert_eq!(saved.arrow_heights, vec![1.0; 6]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let t = template();
        let mut saved = SeatFields {
            positions: vec![Vec3::ONE; 3],
            ..Default::default()
        };
        merge_fields(&mut saved, &t.fields);
        let once = saved.clone();
        assert!(!merge_fields(&mut saved, &t.fields));
        assert_eq!(saved, once);
    }

    #[test]
    fn test_matching_override_not_rewritten() {
        let t = template();
        let mut store = MemoryStore::default();
        let mut saved = RotationRecord::from_template(&t);
        saved.fields.player_names[1] = "Libby".into();
        saved.save(&mut store);
        let before = store.get("F6_2_ServeStack_3").unwrap();

        let record = RotationRecord::load_merged(&t, &mut store);
        assert_eq!(record.fields.player_names[1], "Libby");
        assert_eq!(store.get("F6_2_ServeStack_3").unwrap(), before);
    }

    #[test]
    fn test_revert_restores_snapshot() {
        let mut record = RotationRecord::from_template(&template());
        record.fields.arrow_heights[4] = 3.0;
        record.fields.positions[4] = Vec3::new(9.0, 0.0, 9.0);
        assert!(record.is_dirty());

        record.revert();
        assert!(!record.is_dirty());
        assert_eq!(record.fields, template().fields);
    }
}
