mod memory;
mod sqlite;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use anyhow::Result;

/// Key under which the serialized task list lives.
pub const TASKS_KEY: &str = "todos-v1";

/// Key under which an explicit light/dark preference lives. Absent means auto.
pub const THEME_KEY: &str = "theme";

/// Synchronous, string-keyed, string-valued persistence substrate.
///
/// Callers in the task engine treat every error as "no effect"; backends
/// only need to report failures, never recover from them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
