//! Bevy plugin wiring the board state into an App
//!
//! Inserts the template catalog, the override store, the loaded formation, the
//! selection and the settings panel session as resources. Rendering is left to
//! whoever adds the plugin.

use bevy::prelude::*;
use std::path::Path;

use crate::editing::SettingsSession;
use crate::formation::FormationData;
use crate::selection::SelectionState;
use crate::settings::BoardSettings;
use crate::store::{MemoryStore, OverrideStore, SqliteStore};
use crate::templates::TemplateCatalog;

/// The override store as a resource, whichever backend is in use
#[derive(Resource)]
pub struct BoardStore(pub Box<dyn OverrideStore>);

impl BoardStore {
    /// Open the SQLite store at `path`, or fall back to a scratch store
    pub fn open(path: &str) -> Self {
        match SqliteStore::open(Path::new(path)) {
            Ok(store) => Self(Box::new(store)),
            Err(e) => {
                warn!("Could not open override store {}: {}, edits will not persist", path, e);
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self(Box::new(MemoryStore::default()))
    }
}

pub struct RotationBoardPlugin {
    pub settings: BoardSettings,
    /// Keep edits in memory instead of opening `settings.store_path`
    pub in_memory: bool,
}

impl RotationBoardPlugin {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            settings,
            in_memory: false,
        }
    }
}

impl Plugin for RotationBoardPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        let catalog = TemplateCatalog::load_from_file(&settings.templates_path);
        let mut store = if self.in_memory {
            BoardStore::in_memory()
        } else {
            BoardStore::open(&settings.store_path)
        };

        let formation = FormationData::new(settings.formation, &catalog, store.0.as_mut(), true);
        let selection = SelectionState::new(settings.start_slot());

        app.insert_resource(catalog)
            .insert_resource(store)
            .insert_resource(formation)
            .insert_resource(selection)
            .insert_resource(settings)
            .init_resource::<SettingsSession>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Formation, Situation};

    #[test]
    fn test_plugin_inserts_resources() {
        let settings = BoardSettings {
            templates_path: "does/not/exist.txt".to_string(),
            initial_rotation: 3,
            ..Default::default()
        };
        let mut app = App::new();
        app.add_plugins(RotationBoardPlugin {
            settings,
            in_memory: true,
        });

        let world = app.world();
        assert_eq!(world.resource::<FormationData>().formation, Formation::SixTwo);
        assert_eq!(world.resource::<FormationData>().len(), 30);
        assert_eq!(world.resource::<SelectionState>().current().rotation, 3);
        assert_eq!(
            world.resource::<SelectionState>().current().situation,
            Situation::Rotation
        );
        assert!(!world.resource::<SettingsSession>().is_open());
        assert!(!world.resource::<TemplateCatalog>().is_empty());
    }
}
