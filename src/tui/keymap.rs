use crossterm::event::{KeyCode, KeyModifiers};

use crate::store::FilterMode;

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the list view performs in response to a key press.
///
/// Actions are context-free identifiers; `TuiApp` decides what they mean
/// for the selected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    ShowHelp,
    CycleTheme,

    // Navigation
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,

    // Tasks
    NewTask,
    ToggleDone,
    EditTask,
    DeleteTask,
    ClearCompleted,

    // Filters
    ShowFilter(FilterMode),
    NextFilter,
}

// ── Help categories ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Navigation,
    Tasks,
    Editing,
    Filters,
    General,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Tasks => "Tasks",
            Self::Editing => "While editing",
            Self::Filters => "Filters",
            Self::General => "General",
        }
    }

    const ORDERED: &[Self] = &[
        Self::Navigation,
        Self::Tasks,
        Self::Editing,
        Self::Filters,
        Self::General,
    ];
}

// ── Keybinding ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Shown in the help overlay. Empty labels are aliases and stay hidden.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of the list view's key bindings.
pub struct KeyMap {
    pub normal: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            normal: default_normal_bindings(),
        }
    }

    pub fn lookup_normal(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        lookup(&self.normal, code, modifiers)
    }

    /// Grouped help entries in display order.
    ///
    /// Text-input keys are listed by hand since they are handled by the
    /// shared text editor rather than this table.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        let mut out = Vec::new();

        for &cat in HelpCategory::ORDERED {
            let mut entries: Vec<HelpEntry> = Vec::new();

            for kb in &self.normal {
                if kb.category == cat
                    && !kb.description.is_empty()
                    && !entries.iter().any(|e| e.label == kb.label)
                {
                    entries.push(HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    });
                }
            }

            if cat == HelpCategory::Editing {
                entries.extend([
                    HelpEntry {
                        label: "  Enter",
                        description: "Save title",
                    },
                    HelpEntry {
                        label: "  Esc",
                        description: "Discard changes",
                    },
                    HelpEntry {
                        label: "  Tab",
                        description: "Leave field (saves)",
                    },
                    HelpEntry {
                        label: "  Ctrl+W/U",
                        description: "Delete word / line",
                    },
                ]);
            }

            if !entries.is_empty() {
                out.push((cat.label(), entries));
            }
        }

        out
    }
}

// ── Lookup helper ────────────────────────────────────────────────────

fn lookup(bindings: &[KeyBinding], code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    // Terminals disagree on whether an uppercase char carries SHIFT
    let modifiers = if matches!(code, KeyCode::Char(_)) {
        modifiers.difference(KeyModifiers::SHIFT)
    } else {
        modifiers
    };
    bindings
        .iter()
        .find(|kb| kb.code == code && kb.modifiers == modifiers)
        .map(|kb| kb.action)
}

// ── Default bindings ─────────────────────────────────────────────────

#[allow(clippy::enum_glob_use)]
fn default_normal_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        // ── Navigation ───────────────────────────────────────────
        KeyBinding {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            action: MoveDown,
            label: "  j/k",
            description: "Move down / up",
            category: Navigation,
        },
        KeyBinding {
            code: KeyCode::Char('k'),
            modifiers: KeyModifiers::NONE,
            action: MoveUp,
            label: "",
            description: "",
            category: Navigation,
        },
        KeyBinding {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            action: MoveDown,
            label: "",
            description: "",
            category: Navigation,
        },
        KeyBinding {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            action: MoveUp,
            label: "",
            description: "",
            category: Navigation,
        },
        KeyBinding {
            code: KeyCode::Char('g'),
            modifiers: KeyModifiers::NONE,
            action: MoveTop,
            label: "  g/G",
            description: "First / last task",
            category: Navigation,
        },
        KeyBinding {
            code: KeyCode::Char('G'),
            modifiers: KeyModifiers::NONE,
            action: MoveBottom,
            label: "",
            description: "",
            category: Navigation,
        },
        // ── Tasks ────────────────────────────────────────────────
        KeyBinding {
            code: KeyCode::Char('n'),
            modifiers: KeyModifiers::NONE,
            action: NewTask,
            label: "  n",
            description: "New task",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            action: ToggleDone,
            label: "  Space/x",
            description: "Toggle done",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            action: ToggleDone,
            label: "",
            description: "",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            action: EditTask,
            label: "  Enter/e",
            description: "Edit title",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Char('e'),
            modifiers: KeyModifiers::NONE,
            action: EditTask,
            label: "",
            description: "",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Char('d'),
            modifiers: KeyModifiers::NONE,
            action: DeleteTask,
            label: "  d/Del",
            description: "Delete task",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Delete,
            modifiers: KeyModifiers::NONE,
            action: DeleteTask,
            label: "",
            description: "",
            category: Tasks,
        },
        KeyBinding {
            code: KeyCode::Char('C'),
            modifiers: KeyModifiers::NONE,
            action: ClearCompleted,
            label: "  C",
            description: "Clear completed",
            category: Tasks,
        },
        // ── Filters ──────────────────────────────────────────────
        KeyBinding {
            code: KeyCode::Char('1'),
            modifiers: KeyModifiers::NONE,
            action: ShowFilter(FilterMode::All),
            label: "  1/2/3",
            description: "All / Active / Completed",
            category: Filters,
        },
        KeyBinding {
            code: KeyCode::Char('2'),
            modifiers: KeyModifiers::NONE,
            action: ShowFilter(FilterMode::Active),
            label: "",
            description: "",
            category: Filters,
        },
        KeyBinding {
            code: KeyCode::Char('3'),
            modifiers: KeyModifiers::NONE,
            action: ShowFilter(FilterMode::Completed),
            label: "",
            description: "",
            category: Filters,
        },
        KeyBinding {
            code: KeyCode::Char('f'),
            modifiers: KeyModifiers::NONE,
            action: NextFilter,
            label: "  f",
            description: "Next filter",
            category: Filters,
        },
        // ── General ──────────────────────────────────────────────
        KeyBinding {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::NONE,
            action: CycleTheme,
            label: "  t",
            description: "Cycle theme (auto/light/dark)",
            category: General,
        },
        KeyBinding {
            code: KeyCode::Char('?'),
            modifiers: KeyModifiers::NONE,
            action: ShowHelp,
            label: "  ?",
            description: "Help",
            category: General,
        },
        KeyBinding {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            action: Quit,
            label: "  q",
            description: "Quit",
            category: General,
        },
        KeyBinding {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            action: Quit,
            label: "",
            description: "",
            category: General,
        },
    ]
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_normal_quit() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup_normal(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
        assert_eq!(
            km.lookup_normal(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn lookup_uppercase_with_or_without_shift() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup_normal(KeyCode::Char('C'), KeyModifiers::SHIFT),
            Some(Action::ClearCompleted)
        );
        assert_eq!(
            km.lookup_normal(KeyCode::Char('G'), KeyModifiers::NONE),
            Some(Action::MoveBottom)
        );
    }

    #[test]
    fn lookup_filters() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup_normal(KeyCode::Char('2'), KeyModifiers::NONE),
            Some(Action::ShowFilter(FilterMode::Active))
        );
    }

    #[test]
    fn lookup_unknown_key() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup_normal(KeyCode::Char('z'), KeyModifiers::NONE),
            None
        );
        assert_eq!(km.lookup_normal(KeyCode::Enter, KeyModifiers::ALT), None);
    }

    #[test]
    fn help_entries_cover_all_categories() {
        let km = KeyMap::default_keymap();
        let labels: Vec<&str> = km.help_entries().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Navigation", "Tasks", "While editing", "Filters", "General"]
        );
    }

    #[test]
    fn help_entries_no_duplicates() {
        let km = KeyMap::default_keymap();
        for (_, entries) in km.help_entries() {
            let mut seen = std::collections::HashSet::new();
            for e in &entries {
                assert!(seen.insert(e.label), "duplicate help label: {:?}", e.label);
            }
        }
    }

    #[test]
    fn no_conflicting_bindings() {
        let km = KeyMap::default_keymap();
        for (i, a) in km.normal.iter().enumerate() {
            for b in &km.normal[i + 1..] {
                assert!(
                    !(a.code == b.code && a.modifiers == b.modifiers),
                    "{:?} bound twice",
                    a.code
                );
            }
        }
    }
}
