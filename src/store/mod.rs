mod clock;
mod codec;
mod models;
mod queries;
mod theme;

pub use clock::*;
pub use codec::{Decoded, decode_tasks, encode_tasks};
pub use models::*;
pub use queries::*;
pub use theme::ThemePreference;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::kv::{KeyValueStore, TASKS_KEY};

/// Owns the ordered task list and keeps it mirrored into a key-value store.
///
/// The in-memory list is the source of truth for the session. Every
/// mutation rewrites the whole list under [`TASKS_KEY`]; a failed write is
/// logged and otherwise ignored.
pub struct TaskStore {
    kv: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load whatever the store holds and take ownership of it.
    pub fn open(
        kv: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let mut store = TaskStore {
            kv,
            clock,
            ids,
            tasks: Vec::new(),
        };
        store.load();
        store
    }

    /// Wall clock and random ids.
    pub fn with_system_defaults(kv: Box<dyn KeyValueStore>) -> Self {
        Self::open(kv, Box::new(SystemClock), Box::new(UuidIds))
    }

    /// Replace the in-memory list with what the store holds. Missing or
    /// unreadable data yields an empty list.
    pub fn load(&mut self) -> &[Task] {
        let now = self.clock.now_ms();
        self.tasks = match self.kv.get(TASKS_KEY) {
            Ok(Some(raw)) => {
                let decoded = decode_tasks(&raw, now);
                if decoded.dropped > 0 {
                    warn!(dropped = decoded.dropped, "skipped malformed stored tasks");
                }
                decoded.tasks
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read task list: {e:#}");
                Vec::new()
            }
        };
        info!(count = self.tasks.len(), "loaded tasks");
        &self.tasks
    }

    /// Write the full list. Returns whether the store accepted it.
    pub fn save(&mut self) -> bool {
        let raw = match encode_tasks(&self.tasks) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to encode task list: {e}");
                return false;
            }
        };
        match self.kv.set(TASKS_KEY, &raw) {
            Ok(()) => {
                debug!(count = self.tasks.len(), bytes = raw.len(), "saved tasks");
                true
            }
            Err(e) => {
                warn!("failed to save task list: {e:#}");
                false
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub fn kv_mut(&mut self) -> &mut dyn KeyValueStore {
        self.kv.as_mut()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.tasks)?)
    }

    fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    fn fresh_id(&mut self) -> String {
        let mut id = self.ids.next_id();
        while self.tasks.iter().any(|t| t.id == id) {
            id = self.ids.next_id();
        }
        id
    }
}
