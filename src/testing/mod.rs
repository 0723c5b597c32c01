//! Scenario testing for the rotation board
//!
//! Runs scripted clicks, drags and edits from TOML files against a headless
//! board and checks the resulting state.

pub mod assertions;
pub mod parser;
pub mod runner;
pub mod suite;

pub use assertions::{AssertionError, check_state};
pub use parser::{StateAssertion, Step, StoredOverride, TestDefinition, TestExpectations, TestSetup};
pub use runner::{ScenarioBoard, TestResult, run_test};
pub use suite::{Category, discover};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
