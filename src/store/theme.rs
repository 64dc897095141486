use tracing::{debug, warn};

use crate::kv::{KeyValueStore, THEME_KEY};

/// Light/dark override, or `Auto` to follow the terminal.
///
/// `Auto` is never written: it is the absence of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Auto => "auto",
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Interpret a stored value. Anything but an exact `light`/`dark` is `Auto`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => ThemePreference::Light,
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Auto,
        }
    }

    /// auto → light → dark → auto
    pub fn next(self) -> Self {
        match self {
            ThemePreference::Auto => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Auto,
        }
    }

    pub fn load(kv: &dyn KeyValueStore) -> Self {
        match kv.get(THEME_KEY) {
            Ok(stored) => Self::from_stored(stored.as_deref()),
            Err(e) => {
                warn!("failed to read theme preference: {e:#}");
                ThemePreference::Auto
            }
        }
    }

    /// Best-effort write. Returns whether the store accepted it.
    pub fn persist(self, kv: &mut dyn KeyValueStore) -> bool {
        let result = match self {
            ThemePreference::Auto => kv.remove(THEME_KEY),
            explicit => kv.set(THEME_KEY, explicit.as_str()),
        };
        match result {
            Ok(()) => {
                debug!(theme = self.as_str(), "theme preference saved");
                true
            }
            Err(e) => {
                warn!(theme = self.as_str(), "failed to save theme preference: {e:#}");
                false
            }
        }
    }
}
