//! Dragging a player marker
//!
//! A drag only moves a marker across the floor. On release the new layout is
//! validated for the current rotation and either written into the current
//! record or rejected, in which case the caller puts the marker back.

use bevy::prelude::*;

use crate::constants::SEAT_COUNT;
use crate::formation::FormationData;
use crate::selection::Slot;
use crate::validation::validate_positions;

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Committed,
    /// Layout rejected, restore the marker to this position
    Reverted(Vec3),
}

/// An in-progress drag of one seat's marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatDrag {
    /// 1 through 6
    pub seat: usize,
    start: Vec3,
    position: Vec3,
}

impl SeatDrag {
    pub fn begin(seat: usize, start: Vec3) -> Self {
        debug!("Drag start seat {}", seat);
        Self {
            seat,
            start,
            position: start,
        }
    }

    /// Follow the floor hit point, keeping the marker's height
    pub fn update(&mut self, hit: Vec3) -> Vec3 {
        self.position = Vec3::new(hit.x, self.position.y, hit.z);
        self.position
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Validate the dropped layout and write it into `slot`'s record if legal.
    ///
    /// `markers` are the on-court marker positions per seat; the dragged seat's
    /// entry is replaced by the drop point.
    pub fn release(
        self,
        data: &mut FormationData,
        slot: Slot,
        markers: &[Vec3; SEAT_COUNT],
    ) -> DragOutcome {
        let mut positions = *markers;
        if (1..=SEAT_COUNT).contains(&self.seat) {
            positions[self.seat - 1] = self.position;
        }

        if validate_positions(slot.rotation, &positions) {
            data.set_position(slot.situation, slot.rotation, self.seat, self.position);
            DragOutcome::Committed
        } else {
            info!(
                "Seat {} cannot stand at ({:.2}, {:.2}) in rotation {}",
                self.seat, self.position.x, self.position.z, slot.rotation
            );
            DragOutcome::Reverted(self.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Formation, Situation};
    use crate::templates::TemplateCatalog;

    fn data() -> FormationData {
        FormationData::from_templates(Formation::SixTwo, &TemplateCatalog::default_catalog())
    }

    fn markers(data: &FormationData, slot: Slot) -> [Vec3; SEAT_COUNT] {
        std::array::from_fn(|i| data.get_position(slot.situation, slot.rotation, i + 1))
    }

    #[test]
    fn test_update_keeps_height() {
        let mut drag = SeatDrag::begin(1, Vec3::new(3.0, 0.25, -7.0));
        let moved = drag.update(Vec3::new(2.0, 5.0, -6.0));
        assert_eq!(moved, Vec3::new(2.0, 0.25, -6.0));
    }

    #[test]
    fn test_legal_drop_committed() {
        let mut data = data();
        let slot = Slot::default();
        let start = data.get_position(Situation::Rotation, 1, 1);

        let markers = markers(&data, slot);
        let mut drag = SeatDrag::begin(1, start);
        drag.update(Vec3::new(2.5, 0.0, -8.0));
        assert_eq!(drag.release(&mut data, slot, &markers), DragOutcome::Committed);
        assert_eq!(data.get_position(Situation::Rotation, 1, 1), Vec3::new(2.5, 0.0, -8.0));
        assert!(data.is_dirty(Situation::Rotation, 1));
    }

    #[test]
    fn test_illegal_drop_reverted() {
        let mut data = data();
        let slot = Slot::default();
        let start = data.get_position(Situation::Rotation, 1, 1);

        let markers = markers(&data, slot);
        // Server in front of the right front player
        let mut drag = SeatDrag::begin(1, start);
        drag.update(Vec3::new(3.0, 0.0, -1.0));
        assert_eq!(drag.release(&mut data, slot, &markers), DragOutcome::Reverted(start));
        assert_eq!(data.get_position(Situation::Rotation, 1, 1), start);
        assert!(!data.is_dirty(Situation::Rotation, 1));
    }

    #[test]
    fn test_drop_validated_against_slot_rotation() {
        let mut data = data();
        let slot = Slot::new(2, Situation::Rotation);
        // Seat 2 serves in rotation 2
        let start = data.get_position(Situation::Rotation, 2, 2);

        let markers = markers(&data, slot);
        let mut drag = SeatDrag::begin(2, start);
        drag.update(Vec3::new(3.0, 0.0, -1.5));
        assert_eq!(drag.release(&mut data, slot, &markers), DragOutcome::Reverted(start));
    }

    #[test]
    fn test_drop_checked_against_marker_positions() {
        let mut data = data();
        let slot = Slot::default();
        let start = data.get_position(Situation::Rotation, 1, 1);

        // Right front marker already pulled back to the end line
        let mut markers = markers(&data, slot);
        markers[1] = Vec3::new(3.0, 0.0, -8.5);

        let mut drag = SeatDrag::begin(1, start);
        drag.update(Vec3::new(2.5, 0.0, -8.0));
        assert_eq!(drag.release(&mut data, slot, &markers), DragOutcome::Reverted(start));
        assert_eq!(data.get_position(Situation::Rotation, 1, 1), start);
    }
}
