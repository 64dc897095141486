//! Application state and command handling, independent of any front end.
//!
//! A front end translates its input into [`Command`]s, feeds them to
//! [`AppState::dispatch`], and after each burst of input calls
//! [`AppState::run_deferred`] before redrawing. The returned [`Refresh`]
//! says which parts of the view went stale.

mod command;
mod confirm;
mod edit;

pub use command::{Command, Refresh, RowAction, route};
pub use confirm::{AutoConfirm, ConfirmOutcome, Confirmer, ModalConfirm, PromptConfirm};
pub use edit::{EditBuffer, RowMode};

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use crate::store::{
    FilterMode, RenameOutcome, Task, TaskStore, ThemePreference, filtered, items_left_label,
};

pub const DELETE_PROMPT: &str = "Delete this task?";

/// Work postponed until the current input burst has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    CommitIfBlurred(String),
}

pub struct AppState {
    pub store: TaskStore,
    filter: FilterMode,
    theme: ThemePreference,
    pending_delete: Option<String>,
    edits: HashMap<String, EditBuffer>,
    focused: Option<String>,
    deferred: VecDeque<Deferred>,
    confirmer: Box<dyn Confirmer>,
}

impl AppState {
    pub fn new(store: TaskStore, confirmer: Box<dyn Confirmer>) -> Self {
        let theme = ThemePreference::load(store.kv());
        AppState {
            store,
            filter: FilterMode::default(),
            theme,
            pending_delete: None,
            edits: HashMap::new(),
            focused: None,
            deferred: VecDeque::new(),
            confirmer,
        }
    }

    // ── Read side ──

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        filtered(self.store.tasks(), self.filter)
    }

    pub fn items_left(&self) -> String {
        items_left_label(self.store.remaining())
    }

    pub fn row_mode(&self, id: &str) -> RowMode<'_> {
        match self.edits.get(id) {
            Some(buf) => RowMode::Editing(buf),
            None => RowMode::Viewing,
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.edits.contains_key(id)
    }

    pub fn edit_buffer_mut(&mut self, id: &str) -> Option<&mut EditBuffer> {
        self.edits.get_mut(id)
    }

    /// The row id that currently owns text input, if it is being edited.
    pub fn focused_edit(&self) -> Option<&str> {
        self.focused
            .as_deref()
            .filter(|id| self.edits.contains_key(*id))
    }

    // ── Write side ──

    pub fn dispatch(&mut self, command: Command) -> Refresh {
        match command {
            Command::Add { title } => {
                if self.store.add(&title).is_some() {
                    Refresh::rows()
                } else {
                    Refresh::NONE
                }
            }
            Command::Toggle { id, completed } => self.toggle(&id, completed),
            Command::BeginEdit { id } => self.begin_edit(&id),
            Command::EditText { id, value } => {
                if let Some(buf) = self.edits.get_mut(&id) {
                    buf.set_value(value);
                }
                Refresh::NONE
            }
            Command::CommitEdit { id } => self.commit_edit(&id),
            Command::CancelEdit { id } => self.cancel_edit(&id),
            Command::Blur { id } => self.blur(&id),
            Command::Focus { id } => {
                if self.store.get(&id).is_some() {
                    self.focused = Some(id);
                }
                Refresh::NONE
            }
            Command::RequestDelete { id } => self.request_delete(id),
            Command::ResolveDelete(outcome) => self.resolve_delete(outcome),
            Command::SetFilter(mode) => {
                self.filter = mode;
                Refresh {
                    list: true,
                    filters: true,
                    ..Refresh::NONE
                }
            }
            Command::ClearCompleted => {
                if self.store.clear_completed() > 0 {
                    self.edits.retain(|id, _| self.store.get(id).is_some());
                    if let Some(id) = &self.focused
                        && self.store.get(id).is_none()
                    {
                        self.focused = None;
                    }
                    Refresh::rows()
                } else {
                    Refresh::NONE
                }
            }
            Command::CycleTheme => {
                self.theme = self.theme.next();
                self.theme.persist(self.store.kv_mut());
                info!(theme = self.theme.as_str(), "theme changed");
                Refresh {
                    theme: true,
                    ..Refresh::NONE
                }
            }
        }
    }

    /// Dispatch several commands as one burst, then run deferred checks.
    pub fn dispatch_burst(&mut self, commands: impl IntoIterator<Item = Command>) -> Refresh {
        let refresh = commands
            .into_iter()
            .fold(Refresh::NONE, |acc, cmd| acc.merge(self.dispatch(cmd)));
        refresh.merge(self.run_deferred())
    }

    /// Drain work queued during the burst that just finished.
    pub fn run_deferred(&mut self) -> Refresh {
        let mut refresh = Refresh::NONE;
        while let Some(job) = self.deferred.pop_front() {
            match job {
                Deferred::CommitIfBlurred(id) => {
                    refresh = refresh.merge(self.commit_if_blurred(&id));
                }
            }
        }
        refresh
    }

    fn toggle(&mut self, id: &str, completed: bool) -> Refresh {
        if !self.store.toggle_completed(id, completed) {
            return Refresh::NONE;
        }
        Refresh {
            list: self.filter != FilterMode::All,
            counter: true,
            ..Refresh::NONE
        }
    }

    fn begin_edit(&mut self, id: &str) -> Refresh {
        let Some(task) = self.store.get(id) else {
            return Refresh::NONE;
        };
        if !self.edits.contains_key(id) {
            let buf = EditBuffer::begin(&task.title);
            self.edits.insert(id.to_string(), buf);
        }
        self.focused = Some(id.to_string());
        Refresh::NONE
    }

    fn commit_edit(&mut self, id: &str) -> Refresh {
        let Some(buf) = self.end_edit(id) else {
            return Refresh::NONE;
        };
        match self.store.rename(id, &buf.value) {
            RenameOutcome::Rejected => debug!(id = %id, "blank title discarded"),
            RenameOutcome::Missing => debug!(id = %id, "edited task no longer exists"),
            RenameOutcome::Renamed | RenameOutcome::Unchanged => {}
        }
        Refresh::NONE
    }

    fn cancel_edit(&mut self, id: &str) -> Refresh {
        self.end_edit(id);
        Refresh::NONE
    }

    fn end_edit(&mut self, id: &str) -> Option<EditBuffer> {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.edits.remove(id)
    }

    fn blur(&mut self, id: &str) -> Refresh {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        if self.edits.contains_key(id) {
            self.deferred
                .push_back(Deferred::CommitIfBlurred(id.to_string()));
        }
        Refresh::NONE
    }

    /// A blur commits only if nothing else in the same burst settled the row.
    fn commit_if_blurred(&mut self, id: &str) -> Refresh {
        if !self.edits.contains_key(id) || self.focused.as_deref() == Some(id) {
            return Refresh::NONE;
        }
        if self.store.get(id).is_none() {
            self.edits.remove(id);
            return Refresh::NONE;
        }
        self.commit_edit(id)
    }

    fn request_delete(&mut self, id: String) -> Refresh {
        self.pending_delete = Some(id);
        match self.confirmer.request(DELETE_PROMPT) {
            Some(outcome) => self.resolve_delete(outcome),
            None => Refresh {
                confirm: true,
                ..Refresh::NONE
            },
        }
    }

    fn resolve_delete(&mut self, outcome: ConfirmOutcome) -> Refresh {
        let Some(id) = self.pending_delete.take() else {
            return Refresh::NONE;
        };
        info!(id = %id, ?outcome, "delete confirmation resolved");
        let closed = Refresh {
            confirm: true,
            ..Refresh::NONE
        };
        if outcome == ConfirmOutcome::Confirmed && self.store.remove(&id) {
            self.end_edit(&id);
            return closed.merge(Refresh::rows());
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryKv, THEME_KEY};
    use crate::store::{ManualClock, SequentialIds};

    struct Scripted(VecDeque<Option<ConfirmOutcome>>);

    impl Confirmer for Scripted {
        fn request(&mut self, _message: &str) -> Option<ConfirmOutcome> {
            self.0.pop_front().flatten()
        }
    }

    fn setup_with(confirmer: Box<dyn Confirmer>) -> (AppState, MemoryKv, ManualClock) {
        let kv = MemoryKv::new();
        let clock = ManualClock::new(1_000);
        let store = TaskStore::open(
            Box::new(kv.clone()),
            Box::new(clock.clone()),
            Box::new(SequentialIds::default()),
        );
        (AppState::new(store, confirmer), kv, clock)
    }

    fn setup() -> (AppState, MemoryKv, ManualClock) {
        setup_with(Box::new(ModalConfirm))
    }

    fn add(app: &mut AppState, title: &str) -> String {
        app.dispatch(Command::Add {
            title: title.into(),
        });
        app.store.tasks()[0].id.clone()
    }

    fn title(app: &AppState, id: &str) -> String {
        app.store.get(id).unwrap().title.clone()
    }

    fn edit(id: &str, value: &str) -> Command {
        Command::EditText {
            id: id.into(),
            value: value.into(),
        }
    }

    #[test]
    fn add_refreshes_rows_and_counter() {
        let (mut app, _, _) = setup();
        let refresh = app.dispatch(Command::Add {
            title: "Buy milk".into(),
        });
        assert_eq!(refresh, Refresh::rows());
        assert_eq!(app.items_left(), "1 item left");

        let refresh = app.dispatch(Command::Add {
            title: "   ".into(),
        });
        assert!(refresh.is_empty());
    }

    #[test]
    fn toggle_under_all_only_refreshes_counter() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "a");
        let refresh = app.dispatch(route(RowAction::Toggle(true), &id));
        assert!(refresh.counter);
        assert!(!refresh.list);
    }

    #[test]
    fn toggle_under_filter_refreshes_list() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "a");
        app.dispatch(Command::SetFilter(FilterMode::Active));
        let refresh = app.dispatch(route(RowAction::Toggle(true), &id));
        assert!(refresh.counter && refresh.list);
        assert!(app.visible_tasks().is_empty());
    }

    #[test]
    fn toggle_missing_is_noop() {
        let (mut app, _, _) = setup();
        assert!(app.dispatch(route(RowAction::Toggle(true), "nope")).is_empty());
    }

    #[test]
    fn set_filter_does_not_touch_counter() {
        let (mut app, _, _) = setup();
        add(&mut app, "a");
        let refresh = app.dispatch(Command::SetFilter(FilterMode::Completed));
        assert!(refresh.list && refresh.filters);
        assert!(!refresh.counter);
        assert_eq!(app.filter(), FilterMode::Completed);
    }

    #[test]
    fn edit_cancel_keeps_stored_title() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");

        app.dispatch(route(RowAction::Edit, &id));
        assert!(app.is_editing(&id));
        assert_eq!(app.focused(), Some(id.as_str()));
        app.dispatch(edit(&id, "Buy bread"));
        app.dispatch(route(RowAction::Cancel, &id));

        assert_eq!(title(&app, &id), "Buy milk");
        assert_eq!(app.row_mode(&id), RowMode::Viewing);
        assert!(app.focused().is_none());
    }

    #[test]
    fn edit_commit_renames_and_advances_updated_at() {
        let (mut app, _, clock) = setup();
        let id = add(&mut app, "Buy milk");

        clock.advance(50);
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));
        app.dispatch(route(RowAction::Confirm, &id));

        let task = app.store.get(&id).unwrap();
        assert_eq!(task.title, "Buy bread");
        assert_eq!(task.updated_at, 1_050);
        assert!(!app.is_editing(&id));
    }

    #[test]
    fn blank_commit_restores_previous_title() {
        let (mut app, kv, _) = setup();
        let id = add(&mut app, "Buy milk");
        let writes = kv.writes();

        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "   "));
        app.dispatch(route(RowAction::Confirm, &id));

        assert_eq!(title(&app, &id), "Buy milk");
        assert_eq!(app.row_mode(&id), RowMode::Viewing);
        assert_eq!(kv.writes(), writes);
    }

    #[test]
    fn begin_edit_twice_keeps_rollback() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));
        app.dispatch(route(RowAction::Edit, &id));
        match app.row_mode(&id) {
            RowMode::Editing(buf) => {
                assert_eq!(buf.rollback, "Buy milk");
                assert_eq!(buf.value, "Buy bread");
            }
            RowMode::Viewing => panic!("row should still be editing"),
        }
    }

    #[test]
    fn begin_edit_missing_task_is_noop() {
        let (mut app, _, _) = setup();
        app.dispatch(route(RowAction::Edit, "nope"));
        assert!(!app.is_editing("nope"));
        assert!(app.focused().is_none());
    }

    #[test]
    fn blur_commits_after_burst() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        app.dispatch(route(RowAction::Blur, &id));
        // Nothing happens until the burst is over
        assert!(app.is_editing(&id));
        assert_eq!(title(&app, &id), "Buy milk");

        app.run_deferred();
        assert!(!app.is_editing(&id));
        assert_eq!(title(&app, &id), "Buy bread");
    }

    #[test]
    fn cancel_in_same_burst_beats_blur_commit() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        app.dispatch_burst([
            route(RowAction::Blur, &id),
            route(RowAction::Cancel, &id),
        ]);

        assert_eq!(title(&app, &id), "Buy milk");
        assert!(!app.is_editing(&id));
    }

    #[test]
    fn refocus_in_same_burst_keeps_editing() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        app.dispatch_burst([route(RowAction::Blur, &id), route(RowAction::Focus, &id)]);

        assert!(app.is_editing(&id));
        assert_eq!(title(&app, &id), "Buy milk");
    }

    #[test]
    fn delete_click_in_same_burst_commits_edit() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        let refresh = app.dispatch_burst([
            route(RowAction::Blur, &id),
            route(RowAction::Delete, &id),
        ]);

        assert!(refresh.confirm);
        assert_eq!(app.pending_delete(), Some(id.as_str()));
        assert!(!app.is_editing(&id));
        assert_eq!(title(&app, &id), "Buy bread");
    }

    #[test]
    fn declined_delete_keeps_committed_edit() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        app.dispatch_burst([
            route(RowAction::Blur, &id),
            route(RowAction::Delete, &id),
        ]);
        app.dispatch(Command::ResolveDelete(ConfirmOutcome::Declined));

        assert!(app.pending_delete().is_none());
        assert_eq!(app.row_mode(&id), RowMode::Viewing);
        assert_eq!(title(&app, &id), "Buy bread");
    }

    #[test]
    fn confirmed_modal_delete_after_blur_removes_task() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));
        app.dispatch(edit(&id, "Buy bread"));

        app.dispatch_burst([
            route(RowAction::Blur, &id),
            route(RowAction::Delete, &id),
        ]);
        let refresh = app.dispatch(Command::ResolveDelete(ConfirmOutcome::Confirmed));

        assert!(refresh.list);
        assert!(app.store.get(&id).is_none());
        assert!(!app.is_editing(&id));
    }

    #[test]
    fn synchronous_delete_in_same_burst_drops_edit() {
        let (mut app, _, _) = setup_with(Box::new(AutoConfirm));
        let id = add(&mut app, "Buy milk");
        app.dispatch(route(RowAction::Edit, &id));

        app.dispatch_burst([
            route(RowAction::Blur, &id),
            route(RowAction::Delete, &id),
        ]);

        assert!(app.store.get(&id).is_none());
        assert!(!app.is_editing(&id));
    }

    #[test]
    fn multiple_rows_can_edit_at_once() {
        let (mut app, _, _) = setup();
        let a = add(&mut app, "a");
        let b = add(&mut app, "b");
        app.dispatch(route(RowAction::Edit, &a));
        app.dispatch(edit(&a, "a2"));
        app.dispatch(route(RowAction::Edit, &b));
        app.dispatch(edit(&b, "b2"));
        assert_eq!(app.focused_edit(), Some(b.as_str()));

        app.dispatch(route(RowAction::Confirm, &a));
        app.dispatch(route(RowAction::Confirm, &b));
        assert_eq!(title(&app, &a), "a2");
        assert_eq!(title(&app, &b), "b2");
    }

    #[test]
    fn modal_delete_waits_for_outcome() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "a");

        let refresh = app.dispatch(route(RowAction::Delete, &id));
        assert!(refresh.confirm);
        assert_eq!(app.pending_delete(), Some(id.as_str()));
        assert!(app.store.get(&id).is_some());

        let refresh = app.dispatch(Command::ResolveDelete(ConfirmOutcome::Confirmed));
        assert!(refresh.list && refresh.counter && refresh.confirm);
        assert!(app.store.get(&id).is_none());
        assert!(app.pending_delete().is_none());
    }

    #[test]
    fn declined_delete_clears_pending() {
        let (mut app, kv, _) = setup();
        let id = add(&mut app, "a");
        let writes = kv.writes();

        app.dispatch(route(RowAction::Delete, &id));
        let refresh = app.dispatch(Command::ResolveDelete(ConfirmOutcome::Declined));

        assert!(!refresh.list);
        assert!(app.pending_delete().is_none());
        assert!(app.store.get(&id).is_some());
        assert_eq!(kv.writes(), writes);
    }

    #[test]
    fn new_delete_request_overwrites_pending() {
        let (mut app, _, _) = setup();
        let a = add(&mut app, "a");
        let b = add(&mut app, "b");

        app.dispatch(route(RowAction::Delete, &a));
        app.dispatch(route(RowAction::Delete, &b));
        assert_eq!(app.pending_delete(), Some(b.as_str()));

        app.dispatch(Command::ResolveDelete(ConfirmOutcome::Confirmed));
        assert!(app.store.get(&a).is_some());
        assert!(app.store.get(&b).is_none());
    }

    #[test]
    fn synchronous_confirmer_resolves_immediately() {
        let script = Scripted(VecDeque::from([
            Some(ConfirmOutcome::Declined),
            Some(ConfirmOutcome::Confirmed),
        ]));
        let (mut app, _, _) = setup_with(Box::new(script));
        let id = add(&mut app, "a");

        app.dispatch(route(RowAction::Delete, &id));
        assert!(app.store.get(&id).is_some());
        assert!(app.pending_delete().is_none());

        app.dispatch(route(RowAction::Delete, &id));
        assert!(app.store.get(&id).is_none());
        assert!(app.pending_delete().is_none());
    }

    #[test]
    fn resolve_without_pending_is_noop() {
        let (mut app, _, _) = setup();
        add(&mut app, "a");
        let refresh = app.dispatch(Command::ResolveDelete(ConfirmOutcome::Confirmed));
        assert!(refresh.is_empty());
        assert_eq!(app.store.tasks().len(), 1);
    }

    #[test]
    fn clear_completed_with_none_done_is_noop() {
        let (mut app, kv, _) = setup();
        add(&mut app, "a");
        let writes = kv.writes();
        assert!(app.dispatch(Command::ClearCompleted).is_empty());
        assert_eq!(kv.writes(), writes);
    }

    #[test]
    fn clear_completed_drops_edit_state_of_removed_rows() {
        let (mut app, _, _) = setup();
        let id = add(&mut app, "a");
        app.dispatch(route(RowAction::Toggle(true), &id));
        app.dispatch(route(RowAction::Edit, &id));
        assert_eq!(app.dispatch(Command::ClearCompleted), Refresh::rows());
        assert!(!app.is_editing(&id));
    }

    #[test]
    fn cycle_theme_persists() {
        let (mut app, kv, _) = setup();
        assert_eq!(app.theme(), ThemePreference::Auto);

        assert!(app.dispatch(Command::CycleTheme).theme);
        assert_eq!(app.theme(), ThemePreference::Light);
        assert_eq!(kv.raw(THEME_KEY).as_deref(), Some("light"));

        app.dispatch(Command::CycleTheme);
        assert_eq!(kv.raw(THEME_KEY).as_deref(), Some("dark"));

        app.dispatch(Command::CycleTheme);
        assert_eq!(app.theme(), ThemePreference::Auto);
        assert!(kv.raw(THEME_KEY).is_none());
    }

    #[test]
    fn theme_loaded_at_startup() {
        let kv = MemoryKv::new();
        kv.seed(THEME_KEY, "dark");
        let store = TaskStore::open(
            Box::new(kv),
            Box::new(ManualClock::new(0)),
            Box::new(SequentialIds::default()),
        );
        let app = AppState::new(store, Box::new(ModalConfirm));
        assert_eq!(app.theme(), ThemePreference::Dark);
        assert_eq!(app.filter(), FilterMode::All);
    }
}
