use tracing::debug;

use super::TaskStore;
use super::models::{FilterMode, Task};

/// What `rename` did with the requested title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Same title after trimming. Counts as a successful commit; nothing is written.
    Unchanged,
    /// Blank after trimming. The caller shows the previous title again.
    Rejected,
    Missing,
}

impl RenameOutcome {
    pub fn is_commit(self) -> bool {
        matches!(self, RenameOutcome::Renamed | RenameOutcome::Unchanged)
    }
}

impl TaskStore {
    // ── Mutations ──

    /// Prepend a new task. Blank titles are ignored.
    pub fn add(&mut self, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.fresh_id();
        let task = Task::new(id.clone(), title.to_string(), self.now());
        self.tasks.insert(0, task);
        self.save();
        debug!(id = %id, "added task");
        Some(id)
    }

    /// Returns whether a task was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tasks.remove(idx);
        self.save();
        debug!(id = %id, "removed task");
        true
    }

    /// Returns whether the task exists. `updated_at` never moves backwards.
    pub fn toggle_completed(&mut self, id: &str, completed: bool) -> bool {
        let now = self.now();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = completed;
        task.updated_at = now.max(task.updated_at);
        self.save();
        debug!(id = %id, completed, "toggled task");
        true
    }

    pub fn rename(&mut self, id: &str, new_title: &str) -> RenameOutcome {
        let next = new_title.trim();
        if next.is_empty() {
            return RenameOutcome::Rejected;
        }
        let now = self.now();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return RenameOutcome::Missing;
        };
        if task.title == next {
            return RenameOutcome::Unchanged;
        }
        task.title = next.to_string();
        task.updated_at = now.max(task.updated_at);
        self.save();
        debug!(id = %id, "renamed task");
        RenameOutcome::Renamed
    }

    /// Drop every completed task. Returns how many were removed; nothing is
    /// written when that is zero.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.save();
            debug!(removed, "cleared completed tasks");
        }
        removed
    }

    // ── Lookups ──

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find the single task whose id starts with `prefix`. Exact matches win.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&Task> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(exact) = self.get(prefix) {
            return Some(exact);
        }
        let mut matches = self.tasks.iter().filter(|t| t.id.starts_with(prefix));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    pub fn remaining(&self) -> usize {
        remaining_count(&self.tasks)
    }
}

// ── Derived view state ──

/// Tasks admitted by `mode`, in list order.
pub fn filtered(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|t| mode.admits(t.completed)).collect()
}

pub fn remaining_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

pub fn items_left_label(remaining: usize) -> String {
    if remaining == 1 {
        "1 item left".to_string()
    } else {
        format!("{remaining} items left")
    }
}
