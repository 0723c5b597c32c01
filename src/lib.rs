//! Rotation Board - volleyball rotation data and state engine
//!
//! Authored per-rotation templates, user overrides layered on top of them, the
//! formation state a coach edits, the two-click rotation/situation selection and
//! court order validation. Rendering is out of scope; everything a renderer
//! needs is exposed as Bevy resources and plain read models.

pub mod constants;
pub mod editing;
pub mod formation;
pub mod plugin;
pub mod rotation;
pub mod selection;
pub mod settings;
pub mod store;
pub mod templates;
pub mod testing;
pub mod validation;

// Re-export commonly used types for convenience
pub use constants::*;
pub use editing::{
    ArrowView, CommonValues, DragOutcome, MarkerView, SeatDrag, SettingsSession, marker_views,
    transition_arrows,
};
pub use formation::{CourtColors, FormationData, RotationRecord, merge_fields};
pub use plugin::{BoardStore, RotationBoardPlugin};
pub use rotation::{
    ArrowType, Formation, ROTATIONS, SegmentType, Situation, by_zone, is_valid_rotation,
    rotation_marker_zone, seat_at, seat_in_zone,
};
pub use selection::{ButtonHighlight, Selection, SelectionState, Slot};
pub use settings::BoardSettings;
pub use store::{MemoryStore, OverrideStore, SqliteStore, formation_key, formation_keys, record_key};
pub use templates::{PositionTemplate, SeatFields, TemplateCatalog, default_template};
pub use validation::{broken_rule, validate_positions};
