//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete scenario from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Board configuration before the first step
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TestSetup {
    pub formation: String,
    pub rotation: u8,
    pub situation: String,
    /// Entries placed in the store before the formation is loaded
    pub overrides: Vec<StoredOverride>,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            formation: "F6_2".to_string(),
            rotation: 1,
            situation: "Rotation".to_string(),
            overrides: Vec::new(),
        }
    }
}

impl TestSetup {
    /// One-line description of the starting board, for failure reports
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} rotation {} {}",
            self.formation, self.rotation, self.situation
        );
        if !self.overrides.is_empty() {
            let keys: Vec<&str> = self.overrides.iter().map(|o| o.key.as_str()).collect();
            line.push_str(&format!(", seeded {}", keys.join(", ")));
        }
        line
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredOverride {
    pub key: String,
    pub value: String,
}

/// One scripted action
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    ClickRotation {
        rotation: u8,
    },
    ClickSituation {
        situation: String,
    },
    Rotate,
    BackRotate,
    NextRotate,
    NextBackRotate,
    /// Drag a seat's marker on the current slot and release it
    Drag {
        seat: usize,
        x: f32,
        z: f32,
    },
    /// Write one field directly through the formation setters
    Set {
        situation: String,
        rotation: u8,
        seat: usize,
        field: String,
        value: String,
    },
    ToggleSettings,
    SelectPlayer {
        seat: usize,
    },
    SelectRotations {
        rotations: Vec<u8>,
    },
    /// Settings panel edit for the selected player and rotations
    Apply {
        field: String,
        value: String,
    },
    Snapshot,
    Save {
        #[serde(default)]
        force: bool,
    },
    Revert,
    RevertSettings,
    FactoryReset,
    /// Rebuild the formation from templates and saved data
    Reload,
}

/// Expected outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    /// Checks at different points (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Checks made once `after_step` steps have run (0 = before any step)
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_step: usize,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
