//! Display read model
//!
//! What a rendering layer needs to draw the board for a selection: one marker
//! per seat and, while a transition is pending, one arrow per moving seat.

use bevy::prelude::*;

use crate::constants::{DEFAULT_SEAT_NAMES, SEAT_COUNT};
use crate::formation::FormationData;
use crate::rotation::{ArrowType, SegmentType, rotation_marker_zone};
use crate::selection::{Selection, Slot};

/// A player marker on court
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    /// 1 through 6
    pub seat: usize,
    /// Court zone 1 through 6 the seat's rotation number is drawn in
    pub zone: usize,
    pub position: Vec3,
    pub name: String,
}

/// A transition arrow from the current slot to the next
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowView {
    pub seat: usize,
    pub from: Vec3,
    pub to: Vec3,
    pub arrow_type: ArrowType,
    pub segment_type: SegmentType,
    pub head_color: Color,
    pub segment_color: Color,
    pub height: f32,
    pub segment_length: f32,
}

/// Marker for every seat of `slot`
///
/// Empty names fall back to the default seat name so a marker is never blank.
pub fn marker_views(data: &FormationData, slot: Slot) -> [MarkerView; SEAT_COUNT] {
    std::array::from_fn(|i| {
        let seat = i + 1;
        let name = data.get_player_name(slot.situation, slot.rotation, seat);
        MarkerView {
            seat,
            zone: rotation_marker_zone(slot.rotation, i) + 1,
            position: data.get_position(slot.situation, slot.rotation, seat),
            name: if name.is_empty() {
                DEFAULT_SEAT_NAMES[i].to_string()
            } else {
                name
            },
        }
    })
}

/// Arrows for a pending transition, styled from the next slot's record.
///
/// All `None` when nothing is pending, and `None` for seats that do not move.
pub fn transition_arrows(
    data: &FormationData,
    selection: &Selection,
) -> [Option<ArrowView>; SEAT_COUNT] {
    let Selection { current, next } = *selection;
    std::array::from_fn(|i| {
        if current == next {
            return None;
        }
        let seat = i + 1;
        let from = data.get_position(current.situation, current.rotation, seat);
        let to = data.get_position(next.situation, next.rotation, seat);
        if from == to {
            return None;
        }
        Some(ArrowView {
            seat,
            from,
            to,
            arrow_type: data.get_arrow_type(next.situation, next.rotation, seat),
            segment_type: data.get_segment_type(next.situation, next.rotation, seat),
            head_color: data.get_arrow_head_color(next.situation, next.rotation, seat),
            segment_color: data.get_arrow_segment_color(next.situation, next.rotation, seat),
            height: data.get_arrow_height(next.situation, next.rotation, seat),
            segment_length: data.get_arrow_segment_length(next.situation, next.rotation, seat),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Formation, Situation};
    use crate::selection::SelectionState;
    use crate::templates::TemplateCatalog;

    fn data() -> FormationData {
        FormationData::from_templates(Formation::SixTwo, &TemplateCatalog::default_catalog())
    }

    #[test]
    fn test_marker_names_fall_back_to_defaults() {
        let mut data = data();
        data.set_player_name(Situation::Rotation, 1, 2, "");
        data.set_player_name(Situation::Rotation, 1, 3, "Mia");

        let markers = marker_views(&data, Slot::default());
        assert_eq!(markers[1].name, "OH1");
        assert_eq!(markers[2].name, "Mia");
        assert_eq!(markers[0].seat, 1);
        assert_eq!(markers[0].zone, 1);
        assert_eq!(markers[0].position, data.get_position(Situation::Rotation, 1, 1));
    }

    #[test]
    fn test_marker_zones_follow_rotation() {
        let markers = marker_views(&data(), Slot::new(2, Situation::Rotation));
        // Seat 2 serves from zone 1 in rotation 2, seat 1 has moved to zone 6
        assert_eq!(markers[1].zone, 1);
        assert_eq!(markers[0].zone, 6);
    }

    #[test]
    fn test_no_arrows_without_pending_transition() {
        let state = SelectionState::default();
        assert!(transition_arrows(&data(), &state.selection()).iter().all(Option::is_none));
    }

    #[test]
    fn test_arrows_use_next_record() {
        let mut data = data();
        data.set_arrow_type(Situation::ServeStack, 1, 1, ArrowType::GreenPoint);
        data.set_arrow_height(Situation::ServeStack, 1, 1, 2.0);

        let mut state = SelectionState::default();
        state.on_situation_clicked(Situation::ServeStack);
        let arrows = transition_arrows(&data, &state.selection());

        let first = arrows[0].as_ref().unwrap();
        assert_eq!(first.from, data.get_position(Situation::Rotation, 1, 1));
        assert_eq!(first.to, data.get_position(Situation::ServeStack, 1, 1));
        assert_eq!(first.arrow_type, ArrowType::GreenPoint);
        assert_eq!(first.height, 2.0);
    }

    #[test]
    fn test_stationary_seat_has_no_arrow() {
        let mut data = data();
        let spot = data.get_position(Situation::Rotation, 1, 4);
        data.set_position(Situation::ServeStack, 1, 4, spot);

        let mut state = SelectionState::default();
        state.on_situation_clicked(Situation::ServeStack);
        let arrows = transition_arrows(&data, &state.selection());
        assert!(arrows[3].is_none());
        assert!(arrows[0].is_some());
    }
}
