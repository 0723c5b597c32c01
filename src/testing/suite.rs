//! Scenario discovery
//!
//! Scenarios live one directory deep: `tests/scenarios/<category>/<name>.toml`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One category directory and the scenario files it holds
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub scenarios: Vec<PathBuf>,
}

impl Category {
    /// `category/name` for a scenario path in this category
    pub fn scenario_id(&self, path: &Path) -> String {
        scenario_id(&self.name, path)
    }
}

fn scenario_id(category: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}/{}", category, stem)
}

/// Collect categories under `base`, sorted by name, scenarios sorted within.
///
/// With a filter, only scenarios whose `category/name` id contains it are kept and
/// categories left without scenarios are dropped. Without one, empty categories
/// are returned as-is so the caller can flag them.
pub fn discover(base: &Path, filter: Option<&str>) -> io::Result<Vec<Category>> {
    let mut categories = Vec::new();

    for entry in fs::read_dir(base)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let mut category = Category {
            name: entry.file_name().to_string_lossy().to_string(),
            scenarios: Vec::new(),
        };
        for file in fs::read_dir(&path)?.flatten() {
            let file = file.path();
            if file.extension().is_some_and(|e| e == "toml") {
                category.scenarios.push(file);
            }
        }
        category.scenarios.sort();

        if let Some(filter) = filter {
            category
                .scenarios
                .retain(|p| scenario_id(&category.name, p).contains(filter));
            if category.scenarios.is_empty() {
                continue;
            }
        }

        categories.push(category);
    }

    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
}
