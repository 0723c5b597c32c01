//! Position template data structures

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::rotation::{ArrowType, Formation, SegmentType, Situation};

/// The eight per-seat lists shared by templates and rotation records.
///
/// Each list is indexed by seat (0 = seat 1). Lists may be shorter than six, or
/// empty, when the authored data or a saved override predates a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatFields {
    pub positions: Vec<Vec3>,
    pub player_names: Vec<String>,
    pub arrow_types: Vec<ArrowType>,
    pub segment_types: Vec<SegmentType>,
    pub arrow_head_colors: Vec<Color>,
    pub arrow_segment_colors: Vec<Color>,
    pub arrow_heights: Vec<f32>,
    pub arrow_segment_lengths: Vec<f32>,
}

impl SeatFields {
    /// Length of each list, in field order
    pub fn lengths(&self) -> [usize; 8] {
        [
            self.positions.len(),
            self.player_names.len(),
            self.arrow_types.len(),
            self.segment_types.len(),
            self.arrow_head_colors.len(),
            self.arrow_segment_colors.len(),
            self.arrow_heights.len(),
            self.arrow_segment_lengths.len(),
        ]
    }
}

/// Authored, read-only defaults for one (formation, situation, rotation)
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTemplate {
    pub formation: Formation,
    pub situation: Situation,
    /// 1 through 6
    pub rotation_number: u8,
    pub fields: SeatFields,
}

impl PositionTemplate {
    pub fn key(&self) -> (Formation, Situation, u8) {
        (self.formation, self.situation, self.rotation_number)
    }
}

impl std::fmt::Display for PositionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rotNum[{}] {}",
            self.formation, self.rotation_number, self.situation
        )
    }
}
