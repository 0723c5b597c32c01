//! Rotation module - identifiers and the seat-to-zone mapping

mod seats;
mod types;

pub use seats::{by_zone, rotation_marker_zone, seat_at, seat_in_zone};
pub use types::{ArrowType, Formation, ROTATIONS, SegmentType, Situation, is_valid_rotation};
