//! SQLite override store
//!
//! One `overrides` table keyed by store key. Uses WAL mode so an inspector can
//! read while the board writes.

use bevy::prelude::*;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;

use super::OverrideStore;

/// Resource wrapping the SQLite connection
///
/// The connection is wrapped in a Mutex so the store can live in a Bevy resource.
#[derive(Resource)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create store directory {}: {}", parent.display(), e);
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent reads during writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        init_schema(&conn)?;
        info!("Opened override store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        let Ok(conn) = self.conn.lock() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM overrides", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When a key was last written (RFC 3339)
    pub fn updated_at(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().ok()?;
        conn.query_row(
            "SELECT updated_at FROM overrides WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .ok()
        .flatten()
    }
}

/// Initialize the database schema
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS overrides (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

impl OverrideStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().ok()?;
        let result = conn
            .query_row(
                "SELECT value FROM overrides WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional();

        match result {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read override {}: {}", key, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        let Ok(conn) = self.conn.get_mut() else {
            warn!("Override store lock poisoned, dropping write to {}", key);
            return;
        };
        let updated_at = chrono::Utc::now().to_rfc3339();
        let result = conn.execute(
            r#"INSERT INTO overrides (key, value, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
            params![key, value, updated_at],
        );
        if let Err(e) = result {
            warn!("Failed to write override {}: {}", key, e);
        }
    }

    fn remove(&mut self, key: &str) {
        let Ok(conn) = self.conn.get_mut() else {
            return;
        };
        if let Err(e) = conn.execute("DELETE FROM overrides WHERE key = ?1", params![key]) {
            warn!("Failed to remove override {}: {}", key, e);
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let Ok(conn) = self.conn.lock() else {
            return Vec::new();
        };
        let mut stmt = match conn.prepare("SELECT key FROM overrides ORDER BY key") {
            Ok(stmt) => stmt,
            Err(e) => {
                warn!("Failed to list overrides: {}", e);
                return Vec::new();
            }
        };
        let rows = stmt.query_map([], |row| row.get::<_, String>(0));
        match rows {
            Ok(rows) => rows
                .filter_map(|r| r.ok())
                .filter(|k| k.starts_with(prefix))
                .collect(),
            Err(e) => {
                warn!("Failed to list overrides: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.is_empty());
        assert!(!store.has("F6_2"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("F6_2_Rotation_1", "first");
        store.set("F6_2_Rotation_1", "second");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("F6_2_Rotation_1").unwrap(), "second");
        assert!(store.updated_at("F6_2_Rotation_1").is_some());
    }

    #[test]
    fn test_prefix_and_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("F6_2", "{}");
        store.set("F6_2_BaseDefense_6", "{}");
        store.set("F5_1_BaseDefense_6", "{}");

        assert_eq!(
            store.keys_with_prefix("F6_2"),
            vec!["F6_2".to_string(), "F6_2_BaseDefense_6".to_string()]
        );

        store.remove("F6_2");
        assert!(!store.has("F6_2"));
        assert_eq!(store.len(), 2);
    }
}
