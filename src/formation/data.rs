//! Formation data - every rotation record for one formation
//!
//! Owns the records for all situations and rotations of a formation plus the
//! court colors, and exposes seat-level getters and setters. Missing records and
//! short lists never panic: getters log and return the sentinel from
//! `constants`, setters log and do nothing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::*;
use crate::formation::record::RotationRecord;
use crate::rotation::{ArrowType, Formation, SegmentType, Situation};
use crate::store::{OverrideStore, formation_key};
use crate::templates::{SeatFields, TemplateCatalog};

/// Formation-level settings persisted under the `{formation}` key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourtColors {
    pub front_court_color: Color,
    pub back_court_color: Color,
}

impl Default for CourtColors {
    fn default() -> Self {
        Self {
            front_court_color: DEFAULT_FRONT_COURT_COLOR,
            back_court_color: DEFAULT_BACK_COURT_COLOR,
        }
    }
}

/// In-memory authoritative state for one formation
#[derive(Resource, Debug, Clone)]
pub struct FormationData {
    pub formation: Formation,
    rotations: Vec<RotationRecord>,
    court: CourtColors,
    committed_court: CourtColors,
}

impl FormationData {
    /// Build records for every template of `formation`.
    ///
    /// With `load_persisted`, saved overrides are overlaid and repaired (see
    /// [`merge_fields`](crate::formation::merge_fields)). A formation with no
    /// templates yields an empty aggregate.
    pub fn new(
        formation: Formation,
        catalog: &TemplateCatalog,
        store: &mut dyn OverrideStore,
        load_persisted: bool,
    ) -> Self {
        let mut data = Self {
            formation,
            rotations: Vec::new(),
            court: CourtColors::default(),
            committed_court: CourtColors::default(),
        };

        for template in catalog.for_formation(formation) {
            let record = if load_persisted {
                RotationRecord::load_merged(template, store)
            } else {
                RotationRecord::from_template(template)
            };
            data.push_record(record);
        }

        if data.rotations.is_empty() {
            error!("No rotation templates found for formation {}", formation);
            return data;
        }

        if load_persisted {
            data.court = load_court(store, formation);
            data.committed_court = data.court;
        }

        info!(
            "Loaded formation {} with {} rotation records",
            formation,
            data.rotations.len()
        );
        data
    }

    /// Records straight from the templates, ignoring anything saved
    pub fn from_templates(formation: Formation, catalog: &TemplateCatalog) -> Self {
        let mut scratch = crate::store::MemoryStore::default();
        Self::new(formation, catalog, &mut scratch, false)
    }

    /// Keep one record per (situation, rotation)
    fn push_record(&mut self, record: RotationRecord) {
        if let Some(existing) = self
            .rotations
            .iter_mut()
            .find(|r| r.situation == record.situation && r.rotation_number == record.rotation_number)
        {
            warn!("Duplicate rotation record {}, keeping the later one", record.key());
            *existing = record;
        } else {
            self.rotations.push(record);
        }
    }

    pub fn rotation_data(&self, situation: Situation, rotation_number: u8) -> Option<&RotationRecord> {
        self.rotations
            .iter()
            .find(|r| r.situation == situation && r.rotation_number == rotation_number)
    }

    fn rotation_data_mut(
        &mut self,
        situation: Situation,
        rotation_number: u8,
    ) -> Option<&mut RotationRecord> {
        self.rotations
            .iter_mut()
            .find(|r| r.situation == situation && r.rotation_number == rotation_number)
    }

    pub fn records(&self) -> impl Iterator<Item = &RotationRecord> {
        self.rotations.iter()
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    // =========================================================================
    // SEAT FIELD ACCESS
    // =========================================================================

    fn read<T: Clone>(
        &self,
        situation: Situation,
        rotation_number: u8,
        seat: usize,
        field: &str,
        list: fn(&SeatFields) -> &Vec<T>,
        missing: T,
    ) -> T {
        let Some(record) = self.rotation_data(situation, rotation_number) else {
            warn!(
                "No rotation data for situation {} and rotation {}",
                situation, rotation_number
            );
            return missing;
        };
        let values = list(&record.fields);
        match seat.checked_sub(1).and_then(|i| values.get(i)) {
            Some(value) => value.clone(),
            None => {
                warn!(
                    "No {} for situation {}, rotation {}, seat {} (out of {})",
                    field,
                    situation,
                    rotation_number,
                    seat,
                    values.len()
                );
                missing
            }
        }
    }

    fn write<T>(
        &mut self,
        situation: Situation,
        rotation_number: u8,
        seat: usize,
        field: &str,
        list: fn(&mut SeatFields) -> &mut Vec<T>,
        value: T,
    ) {
        let Some(record) = self.rotation_data_mut(situation, rotation_number) else {
            warn!(
                "Cannot set {}: no rotation data for situation {} and rotation {}",
                field, situation, rotation_number
            );
            return;
        };
        let values = list(&mut record.fields);
        let len = values.len();
        match seat.checked_sub(1).and_then(|i| values.get_mut(i)) {
            Some(slot) => *slot = value,
            None => warn!(
                "Cannot set {} for situation {}, rotation {}, seat {} (out of {})",
                field, situation, rotation_number, seat, len
            ),
        }
    }

    pub fn get_position(&self, situation: Situation, rotation_number: u8, seat: usize) -> Vec3 {
        self.read(situation, rotation_number, seat, "position", |f| &f.positions, MISSING_POSITION)
    }

    pub fn set_position(&mut self, situation: Situation, rotation_number: u8, seat: usize, value: Vec3) {
        self.write(situation, rotation_number, seat, "position", |f| &mut f.positions, value)
    }

    pub fn get_player_name(&self, situation: Situation, rotation_number: u8, seat: usize) -> String {
        self.read(
            situation,
            rotation_number,
            seat,
            "player name",
            |f| &f.player_names,
            MISSING_NAME.to_string(),
        )
    }

    pub fn set_player_name(&mut self, situation: Situation, rotation_number: u8, seat: usize, value: &str) {
        self.write(
            situation,
            rotation_number,
            seat,
            "player name",
            |f| &mut f.player_names,
            value.to_string(),
        )
    }

    /// Arrow head type; `RedPoint` when missing
    pub fn get_arrow_type(&self, situation: Situation, rotation_number: u8, seat: usize) -> ArrowType {
        self.read(situation, rotation_number, seat, "arrow type", |f| &f.arrow_types, ArrowType::RedPoint)
    }

    pub fn set_arrow_type(&mut self, situation: Situation, rotation_number: u8, seat: usize, value: ArrowType) {
        self.write(situation, rotation_number, seat, "arrow type", |f| &mut f.arrow_types, value)
    }

    /// Arrow segment type; `BlueZip` when missing
    pub fn get_segment_type(&self, situation: Situation, rotation_number: u8, seat: usize) -> SegmentType {
        self.read(
            situation,
            rotation_number,
            seat,
            "segment type",
            |f| &f.segment_types,
            SegmentType::BlueZip,
        )
    }

    pub fn set_segment_type(
        &mut self,
        situation: Situation,
        rotation_number: u8,
        seat: usize,
        value: SegmentType,
    ) {
        self.write(situation, rotation_number, seat, "segment type", |f| &mut f.segment_types, value)
    }

    pub fn get_arrow_head_color(&self, situation: Situation, rotation_number: u8, seat: usize) -> Color {
        self.read(
            situation,
            rotation_number,
            seat,
            "arrow head color",
            |f| &f.arrow_head_colors,
            MISSING_COLOR,
        )
    }

    pub fn set_arrow_head_color(&mut self, situation: Situation, rotation_number: u8, seat: usize, value: Color) {
        self.write(
            situation,
            rotation_number,
            seat,
            "arrow head color",
            |f| &mut f.arrow_head_colors,
            value,
        )
    }

    pub fn get_arrow_segment_color(&self, situation: Situation, rotation_number: u8, seat: usize) -> Color {
        self.read(
            situation,
            rotation_number,
            seat,
            "arrow segment color",
            |f| &f.arrow_segment_colors,
            MISSING_COLOR,
        )
    }

    pub fn set_arrow_segment_color(
        &mut self,
        situation: Situation,
        rotation_number: u8,
        seat: usize,
        value: Color,
    ) {
        self.write(
            situation,
            rotation_number,
            seat,
            "arrow segment color",
            |f| &mut f.arrow_segment_colors,
            value,
        )
    }

    pub fn get_arrow_height(&self, situation: Situation, rotation_number: u8, seat: usize) -> f32 {
        self.read(
            situation,
            rotation_number,
            seat,
            "arrow height",
            |f| &f.arrow_heights,
            MISSING_ARROW_HEIGHT,
        )
    }

    pub fn set_arrow_height(&mut self, situation: Situation, rotation_number: u8, seat: usize, value: f32) {
        self.write(situation, rotation_number, seat, "arrow height", |f| &mut f.arrow_heights, value)
    }

    pub fn get_arrow_segment_length(&self, situation: Situation, rotation_number: u8, seat: usize) -> f32 {
        self.read(
            situation,
            rotation_number,
            seat,
            "arrow segment length",
            |f| &f.arrow_segment_lengths,
            MISSING_ARROW_SEGMENT_LENGTH,
        )
    }

    pub fn set_arrow_segment_length(
        &mut self,
        situation: Situation,
        rotation_number: u8,
        seat: usize,
        value: f32,
    ) {
        self.write(
            situation,
            rotation_number,
            seat,
            "arrow segment length",
            |f| &mut f.arrow_segment_lengths,
            value,
        )
    }

    pub fn front_court_color(&self) -> Color {
        self.court.front_court_color
    }

    pub fn set_front_court_color(&mut self, color: Color) {
        self.court.front_court_color = color;
    }

    pub fn back_court_color(&self) -> Color {
        self.court.back_court_color
    }

    pub fn set_back_court_color(&mut self, color: Color) {
        self.court.back_court_color = color;
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Make the current state of every record and the court colors the baseline
    pub fn snapshot(&mut self) {
        info!("Snapshot of formation {}", self.formation);
        self.committed_court = self.court;
        for record in &mut self.rotations {
            record.snapshot();
        }
    }

    /// True if the record for (situation, rotation) differs from its snapshot
    pub fn is_dirty(&self, situation: Situation, rotation_number: u8) -> bool {
        self.rotation_data(situation, rotation_number)
            .is_some_and(|r| r.is_dirty())
    }

    /// True if any record or the court colors differ from their snapshot
    pub fn has_unsaved_changes(&self) -> bool {
        self.court != self.committed_court || self.rotations.iter().any(|r| r.is_dirty())
    }

    /// Persist dirty records (or all, with `force_save`), then the court colors,
    /// then take a fresh snapshot
    pub fn save(&mut self, store: &mut dyn OverrideStore, force_save: bool) {
        let mut saved = 0;
        for record in &mut self.rotations {
            if force_save || record.is_dirty() {
                record.save(store);
                saved += 1;
            }
        }

        let key = formation_key(self.formation);
        match serde_json::to_string(&self.court) {
            Ok(json) => store.set(&key, &json),
            Err(e) => warn!("Failed to serialize court colors for {}: {}", key, e),
        }

        info!("Saved formation {} ({} rotation records)", self.formation, saved);
        self.snapshot();
    }

    /// Restore every dirty record and the court colors from their snapshots
    pub fn revert(&mut self) {
        info!("Reverting formation {}", self.formation);
        for record in &mut self.rotations {
            if record.is_dirty() {
                record.revert();
            }
        }
        self.court = self.committed_court;
    }
}

/// Saved court colors, or defaults
fn load_court(store: &dyn OverrideStore, formation: Formation) -> CourtColors {
    let key = formation_key(formation);
    let Some(json) = store.get(&key) else {
        return CourtColors::default();
    };
    serde_json::from_str(&json).unwrap_or_else(|e| {
        warn!("Ignoring unreadable formation settings {}: {}", key, e);
        CourtColors::default()
    })
}

impl fmt::Display for FormationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Formation: {} ({})", self.formation, self.formation.title())?;
        for record in &self.rotations {
            writeln!(
                f,
                "\tRotation {} Situation: {}",
                record.rotation_number, record.situation
            )?;
            for (i, position) in record.fields.positions.iter().enumerate() {
                let name = record.fields.player_names.get(i).map(String::as_str).unwrap_or("");
                writeln!(
                    f,
                    "\t\tSeat {}: {} pos: ({:.2}, {:.2}, {:.2})",
                    i + 1,
                    name,
                    position.x,
                    position.y,
                    position.z
                )?;
            }
        }
        Ok(())
    }
}
