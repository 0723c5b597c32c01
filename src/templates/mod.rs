//! Templates module - authored per-rotation defaults
//!
//! Templates are loaded once from assets/rotation_templates.txt (or the built-in
//! catalog) and never mutated afterwards.

mod database;
mod types;

pub use database::{TemplateCatalog, default_template};
pub(crate) use database::{parse_color, parse_vec3};
pub use types::{PositionTemplate, SeatFields};
