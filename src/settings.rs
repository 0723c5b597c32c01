//! Persistent board settings
//!
//! Which formation to open, where the override store and template file live,
//! and the slot to start on. Stored as board_settings.json in the config
//! directory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_STORE_FILE, SETTINGS_FILE, TEMPLATES_FILE};
use crate::rotation::{Formation, Situation, is_valid_rotation};
use crate::selection::Slot;

/// Settings that survive between sessions
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub formation: Formation,
    /// SQLite file holding saved edits
    pub store_path: String,
    pub templates_path: String,
    pub initial_rotation: u8,
    pub initial_situation: Situation,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            formation: Formation::SixTwo,
            store_path: DEFAULT_STORE_FILE.to_string(),
            templates_path: TEMPLATES_FILE.to_string(),
            initial_rotation: 1,
            initial_situation: Situation::Rotation,
        }
    }
}

impl BoardSettings {
    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load settings from file, or return defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(Path::new(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Slot to open on; an out-of-range rotation falls back to 1
    pub fn start_slot(&self) -> Slot {
        let rotation = if is_valid_rotation(self.initial_rotation) {
            self.initial_rotation
        } else {
            warn!("Initial rotation {} out of range, using 1", self.initial_rotation);
            1
        };
        Slot::new(rotation, self.initial_situation)
    }

    /// Apply `--formation <id>` and `--store <path>` command-line overrides
    pub fn apply_args(&mut self, args: &[String]) {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--formation" => match iter.next().map(|v| v.parse::<Formation>()) {
                    Some(Ok(formation)) => self.formation = formation,
                    Some(Err(e)) => warn!("{}", e),
                    None => warn!("--formation needs a value"),
                },
                "--store" => match iter.next() {
                    Some(path) => self.store_path = path.clone(),
                    None => warn!("--store needs a value"),
                },
                _ => {}
            }
        }
    }
}
