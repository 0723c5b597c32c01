//! Formation state - live rotation records and the aggregate that owns them

mod data;
mod record;

pub use data::{CourtColors, FormationData};
pub use record::{RotationRecord, merge_fields};
