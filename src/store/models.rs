use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One to-do item. Serialized exactly as the `todos-v1` array entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Refreshed whenever `title` or `completed` is written.
    pub updated_at: i64,
}

impl Task {
    pub fn new(id: String, title: String, now: i64) -> Self {
        Task {
            id,
            title,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.completed { "✓" } else { "☐" }
    }

    /// First eight characters of the id, enough to address a task from the CLI.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// View selector. Never persisted; every session starts at `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Active, FilterMode::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Active => "Active",
            FilterMode::Completed => "Completed",
        }
    }

    /// Whether a task in the given completion state is shown under this mode.
    pub fn admits(self, completed: bool) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !completed,
            FilterMode::Completed => completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Active,
            FilterMode::Active => FilterMode::Completed,
            FilterMode::Completed => FilterMode::All,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            other => Err(format!(
                "unknown filter '{other}' (expected all, active or completed)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_camel_case() {
        let task = Task::new("a1".into(), "Buy milk".into(), 1_700_000_000_000);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":"a1","title":"Buy milk","completed":false,"createdAt":1700000000000,"updatedAt":1700000000000}"#
        );
    }

    #[test]
    fn task_symbols() {
        let mut task = Task::new("a1".into(), "x".into(), 0);
        assert_eq!(task.symbol(), "\u{2610}");
        task.completed = true;
        assert_eq!(task.symbol(), "\u{2713}");
    }

    #[test]
    fn short_id_truncates_long_ids() {
        let task = Task::new("0123456789abcdef".into(), "x".into(), 0);
        assert_eq!(task.short_id(), "01234567");
        let task = Task::new("t1".into(), "x".into(), 0);
        assert_eq!(task.short_id(), "t1");
    }

    #[test]
    fn filter_mode_round_trip() {
        for mode in FilterMode::ALL {
            assert_eq!(mode.as_str().parse::<FilterMode>(), Ok(mode));
        }
    }

    #[test]
    fn filter_mode_unknown_is_error() {
        assert!("done".parse::<FilterMode>().is_err());
        assert!("".parse::<FilterMode>().is_err());
    }

    #[test]
    fn filter_mode_defaults_to_all() {
        assert_eq!(FilterMode::default(), FilterMode::All);
    }

    #[test]
    fn filter_mode_admits() {
        assert!(FilterMode::All.admits(true));
        assert!(FilterMode::All.admits(false));
        assert!(FilterMode::Active.admits(false));
        assert!(!FilterMode::Active.admits(true));
        assert!(FilterMode::Completed.admits(true));
        assert!(!FilterMode::Completed.admits(false));
    }

    #[test]
    fn filter_mode_cycle() {
        assert_eq!(FilterMode::All.next(), FilterMode::Active);
        assert_eq!(FilterMode::Active.next(), FilterMode::Completed);
        assert_eq!(FilterMode::Completed.next(), FilterMode::All);
    }
}
