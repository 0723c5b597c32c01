//! Court order validation
//!
//! Checks that six players stand in a legal overlap arrangement for the current
//! rotation. Positions are per seat; they are reordered into zone order before
//! the checks, so "zone 1" below is back right, "zone 2" front right and so on
//! counter-clockwise.

use bevy::prelude::*;

use crate::constants::SEAT_COUNT;
use crate::rotation::by_zone;

/// Accept or reject a seat layout for `rotation`.
///
/// Uses x as the lateral axis (larger = further right facing the net) and z as
/// the forward axis (larger = closer to the net). Height is ignored.
pub fn validate_positions(rotation: u8, positions: &[Vec3; SEAT_COUNT]) -> bool {
    match broken_rule(rotation, positions) {
        Some(rule) => {
            debug!("Rotation {} layout rejected: {}", rotation, rule);
            false
        }
        None => true,
    }
}

/// First overlap rule the layout breaks, if any. Ties are legal.
pub fn broken_rule(rotation: u8, positions: &[Vec3; SEAT_COUNT]) -> Option<&'static str> {
    let zone = by_zone(rotation, positions);

    // Indices are zone - 1
    let rules: [(&'static str, fn(&[Vec3; SEAT_COUNT]) -> bool); 7] = [
        ("zone 1 behind zone 2", |z| z[0].z <= z[1].z),
        ("zone 1 right of zone 6", |z| z[0].x >= z[5].x),
        ("zone 2 right of zone 3", |z| z[1].x >= z[2].x),
        ("zone 3 between zones 2 and 4, ahead of zone 6", |z| {
            z[2].x <= z[1].x && z[2].x >= z[3].x && z[2].z >= z[5].z
        }),
        ("zone 4 ahead of zone 5", |z| z[3].z >= z[4].z),
        ("zone 5 behind zone 4, left of zone 6", |z| z[4].z <= z[3].z && z[4].x <= z[5].x),
        ("zone 6 behind zone 3, right of zone 5", |z| z[5].z <= z[2].z && z[5].x >= z[4].x),
    ];

    rules
        .iter()
        .find(|(_, holds)| !holds(&zone))
        .map(|(rule, _)| *rule)
}
