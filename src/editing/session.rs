//! Settings panel session
//!
//! Opening the panel snapshots the formation; closing it saves if anything was
//! edited. Edits target one seat across the selected rotations and every
//! situation, so a player can be renamed or restyled in one go.

use bevy::prelude::*;

use crate::constants::SEAT_COUNT;
use crate::formation::FormationData;
use crate::rotation::{ArrowType, ROTATIONS, SegmentType, Situation};
use crate::store::{OverrideStore, formation_keys};
use crate::templates::TemplateCatalog;

/// Values shared by the selected seat across the selection.
/// A field is `None` where the records disagree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonValues {
    pub name: Option<String>,
    pub arrow_type: Option<ArrowType>,
    pub segment_type: Option<SegmentType>,
    pub arrow_head_color: Option<Color>,
    pub arrow_segment_color: Option<Color>,
    pub arrow_height: Option<f32>,
    pub arrow_segment_length: Option<f32>,
}

impl CommonValues {
    fn read(data: &FormationData, situation: Situation, rotation: u8, seat: usize) -> Self {
        Self {
            name: Some(data.get_player_name(situation, rotation, seat)),
            arrow_type: Some(data.get_arrow_type(situation, rotation, seat)),
            segment_type: Some(data.get_segment_type(situation, rotation, seat)),
            arrow_head_color: Some(data.get_arrow_head_color(situation, rotation, seat)),
            arrow_segment_color: Some(data.get_arrow_segment_color(situation, rotation, seat)),
            arrow_height: Some(data.get_arrow_height(situation, rotation, seat)),
            arrow_segment_length: Some(data.get_arrow_segment_length(situation, rotation, seat)),
        }
    }

    /// Keep only the fields `other` agrees on
    fn intersect(&mut self, other: &Self) {
        fn keep<T: PartialEq>(mine: &mut Option<T>, theirs: &Option<T>) {
            if mine != theirs {
                *mine = None;
            }
        }
        keep(&mut self.name, &other.name);
        keep(&mut self.arrow_type, &other.arrow_type);
        keep(&mut self.segment_type, &other.segment_type);
        keep(&mut self.arrow_head_color, &other.arrow_head_color);
        keep(&mut self.arrow_segment_color, &other.arrow_segment_color);
        keep(&mut self.arrow_height, &other.arrow_height);
        keep(&mut self.arrow_segment_length, &other.arrow_segment_length);
    }
}

/// State of the settings panel
#[derive(Resource, Debug, Clone, Default)]
pub struct SettingsSession {
    open: bool,
    dirty: bool,
    /// 1 through 6
    player: Option<usize>,
    rotations: [bool; SEAT_COUNT],
}

impl SettingsSession {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Edits made since the panel opened (or last save/revert)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Open or close the panel. Returns whether it is now open.
    pub fn toggle(&mut self, data: &mut FormationData, store: &mut dyn OverrideStore) -> bool {
        self.open = !self.open;
        if self.open {
            info!("Entering settings, taking snapshot");
            data.snapshot();
        } else if self.dirty {
            info!("Leaving settings, saving changes");
            data.save(store, false);
            self.dirty = false;
        }
        self.open
    }

    pub fn select_player(&mut self, seat: Option<usize>) {
        self.player = match seat {
            Some(s) if !(1..=SEAT_COUNT).contains(&s) => {
                warn!("Ignoring selection of seat {}", s);
                None
            }
            other => other,
        };
    }

    pub fn selected_player(&self) -> Option<usize> {
        self.player
    }

    pub fn set_rotation_selected(&mut self, rotation: u8, selected: bool) {
        match self.rotations.get_mut((rotation as usize).wrapping_sub(1)) {
            Some(slot) => *slot = selected,
            None => warn!("Ignoring selection of rotation {}", rotation),
        }
    }

    pub fn selected_rotations(&self) -> Vec<u8> {
        ROTATIONS.filter(|r| self.rotations[*r as usize - 1]).collect()
    }

    /// Write one edit into every selected rotation and situation for the selected seat
    fn apply(&mut self, data: &mut FormationData, edit: impl Fn(&mut FormationData, Situation, u8, usize)) {
        let Some(seat) = self.player else {
            warn!("No player selected, edit ignored");
            return;
        };
        for rotation in self.selected_rotations() {
            for situation in Situation::ALL {
                edit(data, situation, rotation, seat);
            }
        }
        self.dirty = true;
    }

    pub fn apply_player_name(&mut self, data: &mut FormationData, name: &str) {
        self.apply(data, |d, s, r, seat| d.set_player_name(s, r, seat, name));
    }

    pub fn apply_arrow_type(&mut self, data: &mut FormationData, value: ArrowType) {
        self.apply(data, |d, s, r, seat| d.set_arrow_type(s, r, seat, value));
    }

    pub fn apply_segment_type(&mut self, data: &mut FormationData, value: SegmentType) {
        self.apply(data, |d, s, r, seat| d.set_segment_type(s, r, seat, value));
    }

    pub fn apply_arrow_head_color(&mut self, data: &mut FormationData, value: Color) {
        self.apply(data, |d, s, r, seat| d.set_arrow_head_color(s, r, seat, value));
    }

    pub fn apply_arrow_segment_color(&mut self, data: &mut FormationData, value: Color) {
        self.apply(data, |d, s, r, seat| d.set_arrow_segment_color(s, r, seat, value));
    }

    pub fn apply_arrow_height(&mut self, data: &mut FormationData, value: f32) {
        self.apply(data, |d, s, r, seat| d.set_arrow_height(s, r, seat, value));
    }

    pub fn apply_arrow_segment_length(&mut self, data: &mut FormationData, value: f32) {
        self.apply(data, |d, s, r, seat| d.set_arrow_segment_length(s, r, seat, value));
    }

    pub fn apply_front_court_color(&mut self, data: &mut FormationData, color: Color) {
        data.set_front_court_color(color);
        self.dirty = true;
    }

    pub fn apply_back_court_color(&mut self, data: &mut FormationData, color: Color) {
        data.set_back_court_color(color);
        self.dirty = true;
    }

    /// Values to show in the panel, or `None` if no player or rotation is selected
    pub fn common_values(&self, data: &FormationData) -> Option<CommonValues> {
        let seat = self.player?;
        let mut common: Option<CommonValues> = None;
        for situation in Situation::ALL {
            for rotation in self.selected_rotations() {
                if data.rotation_data(situation, rotation).is_none() {
                    continue;
                }
                let values = CommonValues::read(data, situation, rotation, seat);
                match common.as_mut() {
                    Some(c) => c.intersect(&values),
                    None => common = Some(values),
                }
            }
        }
        common
    }

    /// Drop edits made since the last snapshot
    pub fn revert(&mut self, data: &mut FormationData) {
        info!("Reverting settings");
        data.revert();
        self.dirty = false;
    }

    /// Forget every saved edit for the formation and rebuild it from templates
    pub fn factory_reset(
        &mut self,
        data: &mut FormationData,
        catalog: &TemplateCatalog,
        store: &mut dyn OverrideStore,
    ) {
        let formation = data.formation;
        let keys = formation_keys(store, formation);
        for key in &keys {
            store.remove(key);
        }
        *data = FormationData::new(formation, catalog, store, false);
        self.dirty = false;
        info!(
            "Factory reset formation {} ({} saved entries removed)",
            formation,
            keys.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Formation;
    use crate::store::MemoryStore;

    fn setup() -> (FormationData, MemoryStore, TemplateCatalog) {
        let catalog = TemplateCatalog::default_catalog();
        let mut store = MemoryStore::default();
        let data = FormationData::new(Formation::SixTwo, &catalog, &mut store, true);
        (data, store, catalog)
    }

    #[test]
    fn test_common_values_requires_selection() {
        let (data, _, _) = setup();
        let mut session = SettingsSession::default();
        assert!(session.common_values(&data).is_none());

        session.select_player(Some(2));
        assert!(session.common_values(&data).is_none());

        session.set_rotation_selected(1, true);
        let common = session.common_values(&data).unwrap();
        assert_eq!(common.name.as_deref(), Some("OH1"));
        assert_eq!(common.arrow_type, Some(ArrowType::RedPoint));
    }

    #[test]
    fn test_apply_edits_every_situation_of_selected_rotations() {
        let (mut data, _, _) = setup();
        let mut session = SettingsSession::default();
        session.select_player(Some(3));
        session.set_rotation_selected(2, true);
        session.set_rotation_selected(5, true);

        session.apply_player_name(&mut data, "Zoe");
        assert!(session.is_dirty());

        for situation in Situation::ALL {
            assert_eq!(data.get_player_name(situation, 2, 3), "Zoe");
            assert_eq!(data.get_player_name(situation, 5, 3), "Zoe");
            assert_eq!(data.get_player_name(situation, 1, 3), "MB1");
        }
        assert_eq!(data.get_player_name(Situation::Rotation, 2, 4), "S2");
    }

    #[test]
    fn test_common_values_blank_disagreeing_fields() {
        let (mut data, _, _) = setup();
        data.set_arrow_height(Situation::BaseDefense, 4, 1, 3.0);

        let mut session = SettingsSession::default();
        session.select_player(Some(1));
        session.set_rotation_selected(3, true);
        session.set_rotation_selected(4, true);

        let common = session.common_values(&data).unwrap();
        assert_eq!(common.arrow_height, None);
        assert_eq!(common.name.as_deref(), Some("S1"));
    }

    #[test]
    fn test_edit_without_player_is_ignored() {
        let (mut data, _, _) = setup();
        let mut session = SettingsSession::default();
        session.set_rotation_selected(1, true);
        session.apply_arrow_type(&mut data, ArrowType::BlueZip);
        assert!(!session.is_dirty());
        assert!(!data.has_unsaved_changes());
    }

    #[test]
    fn test_closing_saves_when_dirty() {
        let (mut data, mut store, _) = setup();
        let mut session = SettingsSession::default();
        assert!(session.toggle(&mut data, &mut store));

        session.select_player(Some(6));
        session.set_rotation_selected(6, true);
        session.apply_arrow_segment_length(&mut data, 0.4);

        assert!(!session.toggle(&mut data, &mut store));
        assert!(!session.is_dirty());
        assert!(store.has("F6_2_Rotation_6"));
        assert!(!data.has_unsaved_changes());
    }

    #[test]
    fn test_closing_clean_session_writes_nothing() {
        let (mut data, mut store, _) = setup();
        let mut session = SettingsSession::default();
        session.toggle(&mut data, &mut store);
        session.toggle(&mut data, &mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_revert_restores_snapshot() {
        let (mut data, mut store, _) = setup();
        let mut session = SettingsSession::default();
        session.toggle(&mut data, &mut store);

        session.select_player(Some(1));
        session.set_rotation_selected(1, true);
        session.apply_arrow_head_color(&mut data, Color::WHITE);
        session.apply_front_court_color(&mut data, Color::WHITE);
        session.revert(&mut data);

        assert!(!session.is_dirty());
        assert!(!data.has_unsaved_changes());
        assert_eq!(data.front_court_color(), crate::constants::DEFAULT_FRONT_COURT_COLOR);
    }

    #[test]
    fn test_factory_reset_clears_saved_data() {
        let (mut data, mut store, catalog) = setup();
        store.set("F5_1", "{}");
        data.set_player_name(Situation::Rotation, 1, 1, "Custom");
        data.save(&mut store, false);

        let mut session = SettingsSession::default();
        session.factory_reset(&mut data, &catalog, &mut store);

        assert_eq!(data.get_player_name(Situation::Rotation, 1, 1), "S1");
        assert!(!store.has("F6_2"));
        assert!(!store.has("F6_2_Rotation_1"));
        assert!(store.has("F5_1"));
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut session = SettingsSession::default();
        session.select_player(Some(7));
        session.set_rotation_selected(0, true);
        session.set_rotation_selected(9, true);
        assert_eq!(session.selected_player(), None);
        assert!(session.selected_rotations().is_empty());
    }
}
