//! Seat rotation mapping
//!
//! Seat `i` (0-indexed, serve order) stands in court zone `seat_at(r, i)` during
//! rotation `r`. Zone 0 is back right, then counter-clockwise: front right,
//! front middle, front left, back left, back middle.

use crate::constants::SEAT_COUNT;

const SEATS: u8 = SEAT_COUNT as u8;

/// Court zone (0-indexed) occupied by `seat_index` during `rotation`.
///
/// Rotation 1 is the identity. Each later rotation moves every player one zone
/// back numerically: zone 0 goes to zone 5, zone 1 to zone 0, and so on.
/// Rotations outside 1..=6 are folded into range.
pub fn seat_at(rotation: u8, seat_index: usize) -> usize {
    let shift = rotation_shift(rotation) as usize;
    (seat_index + (SEAT_COUNT - shift)) % SEAT_COUNT
}

/// Seat (0-indexed) standing in `zone` during `rotation`. Inverse of [`seat_at`].
pub fn seat_in_zone(rotation: u8, zone: usize) -> usize {
    let shift = rotation_shift(rotation) as usize;
    (zone + shift) % SEAT_COUNT
}

/// Zones advanced since rotation 1
fn rotation_shift(rotation: u8) -> u8 {
    (rotation.max(1) - 1) % SEATS
}

/// Zone a numeric rotation marker moves to (display ordering)
pub fn rotation_marker_zone(rotation: u8, seat_index: usize) -> usize {
    seat_at(rotation, seat_index)
}

/// Reorder per-seat values into court zone order for `rotation`
pub fn by_zone<T: Copy>(rotation: u8, per_seat: &[T; SEAT_COUNT]) -> [T; SEAT_COUNT] {
    std::array::from_fn(|zone| per_seat[seat_in_zone(rotation, zone)])
}
