use crate::store::FilterMode;

use super::confirm::ConfirmOutcome;

/// Everything a front end can ask of [`AppState`](super::AppState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String },
    Toggle { id: String, completed: bool },
    BeginEdit { id: String },
    EditText { id: String, value: String },
    CommitEdit { id: String },
    CancelEdit { id: String },
    /// The row's input lost focus. Commits later unless something intervenes.
    Blur { id: String },
    Focus { id: String },
    RequestDelete { id: String },
    ResolveDelete(ConfirmOutcome),
    SetFilter(FilterMode),
    ClearCompleted,
    CycleTheme,
}

/// Per-row triggers exposed by the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Toggle(bool),
    Edit,
    Delete,
    Confirm,
    Cancel,
    Blur,
    Focus,
    Input(String),
}

/// Map an (action, task id) pair onto a command.
pub fn route(action: RowAction, id: &str) -> Command {
    let id = id.to_string();
    match action {
        RowAction::Toggle(completed) => Command::Toggle { id, completed },
        RowAction::Edit => Command::BeginEdit { id },
        RowAction::Delete => Command::RequestDelete { id },
        RowAction::Confirm => Command::CommitEdit { id },
        RowAction::Cancel => Command::CancelEdit { id },
        RowAction::Blur => Command::Blur { id },
        RowAction::Focus => Command::Focus { id },
        RowAction::Input(value) => Command::EditText { id, value },
    }
}

/// What the view has to redraw after a command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    /// Row membership or order changed.
    pub list: bool,
    /// The items-left label is stale.
    pub counter: bool,
    pub filters: bool,
    pub theme: bool,
    /// The delete confirmation surface opened or closed.
    pub confirm: bool,
}

impl Refresh {
    pub const NONE: Refresh = Refresh {
        list: false,
        counter: false,
        filters: false,
        theme: false,
        confirm: false,
    };

    pub fn rows() -> Self {
        Refresh {
            list: true,
            counter: true,
            ..Refresh::NONE
        }
    }

    pub fn merge(self, other: Refresh) -> Self {
        Refresh {
            list: self.list || other.list,
            counter: self.counter || other.counter,
            filters: self.filters || other.filters,
            theme: self.theme || other.theme,
            confirm: self.confirm || other.confirm,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Refresh::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_maps_row_actions() {
        assert_eq!(
            route(RowAction::Toggle(true), "a"),
            Command::Toggle {
                id: "a".into(),
                completed: true
            }
        );
        assert_eq!(
            route(RowAction::Edit, "a"),
            Command::BeginEdit { id: "a".into() }
        );
        assert_eq!(
            route(RowAction::Delete, "a"),
            Command::RequestDelete { id: "a".into() }
        );
        assert_eq!(
            route(RowAction::Confirm, "a"),
            Command::CommitEdit { id: "a".into() }
        );
        assert_eq!(
            route(RowAction::Cancel, "a"),
            Command::CancelEdit { id: "a".into() }
        );
        assert_eq!(route(RowAction::Blur, "a"), Command::Blur { id: "a".into() });
        assert_eq!(
            route(RowAction::Input("x".into()), "a"),
            Command::EditText {
                id: "a".into(),
                value: "x".into()
            }
        );
    }

    #[test]
    fn refresh_merge() {
        let merged = Refresh::rows().merge(Refresh {
            theme: true,
            ..Refresh::NONE
        });
        assert!(merged.list && merged.counter && merged.theme);
        assert!(!merged.filters && !merged.confirm);
        assert!(Refresh::NONE.is_empty());
        assert!(!merged.is_empty());
    }
}
