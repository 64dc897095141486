use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::KeyValueStore;

/// `SQLite`-backed key-value table, the on-disk stand-in for browser local storage.
pub struct SqliteKv {
    pub conn: Connection,
}

impl SqliteKv {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!(path = %path.display(), "opened key-value database");
        Ok(SqliteKv { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let kv = SqliteKv { conn };
        kv.migrate()?;
        Ok(kv)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let kv = SqliteKv::open_in_memory().unwrap();
        assert!(kv.get("todos-v1").unwrap().is_none());
    }

    #[test]
    fn test_set_then_overwrite() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("theme", "light").unwrap();
        kv.set("theme", "dark").unwrap();
        assert_eq!(kv.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_remove() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        kv.set("theme", "light").unwrap();
        kv.remove("theme").unwrap();
        assert!(kv.get("theme").unwrap().is_none());
        // Removing again is not an error
        kv.remove("theme").unwrap();
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ticklist.db");
        {
            let mut kv = SqliteKv::open(&path).unwrap();
            kv.migrate().unwrap();
            kv.set("todos-v1", "[]").unwrap();
        }
        let kv = SqliteKv::open(&path).unwrap();
        kv.migrate().unwrap();
        assert_eq!(kv.get("todos-v1").unwrap().as_deref(), Some("[]"));
    }
}
