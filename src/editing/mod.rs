//! Board editing - marker drags, the settings panel and the display read model

mod display;
mod drag;
mod session;

pub use display::{ArrowView, MarkerView, marker_views, transition_arrows};
pub use drag::{DragOutcome, SeatDrag};
pub use session::{CommonValues, SettingsSession};
