//! Tunable constants for the rotation board
//!
//! File locations, court geometry, authored defaults and the sentinel values
//! returned by accessors when data is missing.

use bevy::prelude::*;

// =============================================================================
// FILES
// =============================================================================

pub const TEMPLATES_FILE: &str = "assets/rotation_templates.txt";
pub const SETTINGS_FILE: &str = "config/board_settings.json";
pub const DEFAULT_STORE_FILE: &str = "config/overrides.db";

// =============================================================================
// COURT
// =============================================================================

/// Players on court, also the number of rotations.
pub const SEAT_COUNT: usize = 6;

/// Lateral position of the right column (x grows to the right facing the net).
pub const COURT_RIGHT_X: f32 = 3.0;
pub const COURT_MIDDLE_X: f32 = 0.0;
pub const COURT_LEFT_X: f32 = -3.0;

/// Forward position of the rows (z grows toward the net at z = 0).
pub const FRONT_ROW_Z: f32 = -2.0;
pub const BACK_ROW_Z: f32 = -7.0;
pub const END_LINE_Z: f32 = -9.0;

pub const DEFAULT_FRONT_COURT_COLOR: Color = Color::srgb(0.85, 0.55, 0.3);
pub const DEFAULT_BACK_COURT_COLOR: Color = Color::srgb(0.2, 0.45, 0.75);

// =============================================================================
// AUTHORED SEAT DEFAULTS (built-in catalog)
// =============================================================================

/// 6-2 serve order: setter, outside, middle, opposite setter, outside, middle.
pub const DEFAULT_SEAT_NAMES: [&str; SEAT_COUNT] = ["S1", "OH1", "MB1", "S2", "OH2", "MB2"];
pub const DEFAULT_ARROW_HEAD_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const DEFAULT_ARROW_SEGMENT_COLOR: Color = Color::srgb(0.0, 0.0, 1.0);
pub const DEFAULT_ARROW_HEIGHT: f32 = 0.5;
pub const DEFAULT_ARROW_SEGMENT_LENGTH: f32 = 0.1;

// =============================================================================
// ACCESSOR SENTINELS (returned when a record or seat entry is missing)
// =============================================================================

pub const MISSING_POSITION: Vec3 = Vec3::ZERO;
pub const MISSING_NAME: &str = "";
pub const MISSING_COLOR: Color = Color::BLACK;
pub const MISSING_ARROW_HEIGHT: f32 = 1.5;
pub const MISSING_ARROW_SEGMENT_LENGTH: f32 = 1.5;
