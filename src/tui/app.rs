use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::app::{AppState, Command, ConfirmOutcome, Refresh, RowAction, route};
use crate::config::Config;

use super::event::{self, AppEvent};
use super::form::{InputLine, apply_text_edit};
use super::keymap::{Action, KeyMap};
use super::theme::{Theme, ThemeSection};
use super::ui::{self, Areas, RowZone};

/// Which surface currently owns the keyboard. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    NewTask,
    Editing,
    ConfirmDelete,
    Help,
}

pub struct TuiApp {
    pub state: AppState,
    pub keymap: KeyMap,
    pub theme: Theme,
    theme_overrides: ThemeSection,
    tick_rate: Duration,
    pub should_quit: bool,

    /// Ids of the rows on screen, in order. Rebuilt only on `Refresh::list`.
    pub rows: Vec<String>,
    pub items_left: String,
    pub selected: usize,
    pub scroll: usize,
    pub areas: Areas,

    pub new_task: InputLine,
    pub composing: bool,
    pub show_help: bool,
}

impl TuiApp {
    pub fn new(state: AppState, config: &Config) -> Self {
        let theme = Theme::for_preference(state.theme(), &config.theme);
        let mut app = TuiApp {
            state,
            keymap: KeyMap::default_keymap(),
            theme,
            theme_overrides: config.theme.clone(),
            tick_rate: Duration::from_millis(config.tick_rate_ms.max(10)),
            should_quit: false,
            rows: Vec::new(),
            items_left: String::new(),
            selected: 0,
            scroll: 0,
            areas: Areas::default(),
            new_task: InputLine::default(),
            composing: false,
            show_help: false,
        };
        app.apply(Refresh::rows());
        app
    }

    pub fn input_mode(&self) -> InputMode {
        if self.state.pending_delete().is_some() {
            InputMode::ConfirmDelete
        } else if self.show_help {
            InputMode::Help
        } else if self.state.focused_edit().is_some() {
            InputMode::Editing
        } else if self.composing {
            InputMode::NewTask
        } else {
            InputMode::Normal
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.rows.get(self.selected).map(String::as_str)
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let size = terminal.size()?;
            self.resize(Rect::new(0, 0, size.width, size.height));
            terminal.draw(|frame| ui::draw(frame, self))?;

            for ev in event::poll_burst(self.tick_rate)? {
                self.handle_event(ev);
            }
            let refresh = self.state.run_deferred();
            self.apply(refresh);

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn resize(&mut self, area: Rect) {
        self.areas = ui::layout(area);
        self.keep_selection_visible();
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Key(key) => match self.input_mode() {
                InputMode::Normal => self.handle_normal_key(key),
                InputMode::NewTask => self.handle_new_task_key(key),
                InputMode::Editing => self.handle_edit_key(key),
                InputMode::ConfirmDelete => self.handle_confirm_key(key),
                InputMode::Help => self.show_help = false,
            },
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Resize => {}
        }
    }

    fn dispatch(&mut self, command: Command) {
        let refresh = self.state.dispatch(command);
        self.apply(refresh);
    }

    /// Bring cached view state up to date.
    fn apply(&mut self, refresh: Refresh) {
        if refresh.list {
            let keep = self.selected_id().map(str::to_string);
            self.rows = self
                .state
                .visible_tasks()
                .iter()
                .map(|t| t.id.clone())
                .collect();
            if let Some(idx) = keep.and_then(|id| self.rows.iter().position(|r| *r == id)) {
                self.selected = idx;
            }
            self.selected = self.selected.min(self.rows.len().saturating_sub(1));
            self.keep_selection_visible();
        }
        if refresh.counter {
            self.items_left = self.state.items_left();
        }
        if refresh.theme {
            self.theme = Theme::for_preference(self.state.theme(), &self.theme_overrides);
        }
    }

    fn keep_selection_visible(&mut self) {
        let height = usize::from(self.areas.list.height).max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
    }

    fn select(&mut self, idx: usize) {
        if !self.rows.is_empty() {
            self.selected = idx.min(self.rows.len() - 1);
            self.keep_selection_visible();
        }
    }

    fn on_selected(&mut self, action: RowAction) {
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.dispatch(route(action, &id));
        }
    }

    // ── Keyboard ──

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let Some(action) = self.keymap.lookup_normal(key.code, key.modifiers) else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.show_help = true,
            Action::CycleTheme => self.dispatch(Command::CycleTheme),
            Action::MoveUp => self.select(self.selected.saturating_sub(1)),
            Action::MoveDown => self.select(self.selected + 1),
            Action::MoveTop => self.select(0),
            Action::MoveBottom => self.select(usize::MAX),
            Action::NewTask => self.composing = true,
            Action::ToggleDone => {
                let completed = self
                    .selected_id()
                    .and_then(|id| self.state.store.get(id))
                    .is_some_and(|t| t.completed);
                self.on_selected(RowAction::Toggle(!completed));
            }
            Action::EditTask => self.on_selected(RowAction::Edit),
            Action::DeleteTask => self.on_selected(RowAction::Delete),
            Action::ClearCompleted => self.dispatch(Command::ClearCompleted),
            Action::ShowFilter(mode) => self.dispatch(Command::SetFilter(mode)),
            Action::NextFilter => self.dispatch(Command::SetFilter(self.state.filter().next())),
        }
    }

    fn handle_new_task_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let title = self.new_task.take();
                self.dispatch(Command::Add { title });
                self.select(0);
            }
            KeyCode::Esc => {
                self.new_task.take();
                self.composing = false;
            }
            KeyCode::Tab => self.composing = false,
            _ => {
                apply_text_edit(&mut self.new_task, key);
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(id) = self.state.focused_edit().map(str::to_string) else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.dispatch(route(RowAction::Confirm, &id)),
            KeyCode::Esc => self.dispatch(route(RowAction::Cancel, &id)),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.dispatch(route(RowAction::Blur, &id));
            }
            _ => {
                if let Some(buf) = self.state.edit_buffer_mut(&id) {
                    apply_text_edit(buf, key);
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let outcome = match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => ConfirmOutcome::Confirmed,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => ConfirmOutcome::Declined,
            _ => return,
        };
        self.dispatch(Command::ResolveDelete(outcome));
    }

    // ── Mouse ──

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            MouseEventKind::ScrollDown => self.select(self.selected + 1),
            MouseEventKind::ScrollUp => self.select(self.selected.saturating_sub(1)),
            _ => {}
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        if self.state.pending_delete().is_some() {
            return;
        }
        self.show_help = false;
        let pos = Position::new(column, row);
        let hit = self.row_at(pos);

        // Only a click on the edited title itself keeps focus there
        if let Some(editing) = self.state.focused_edit().map(str::to_string)
            && !matches!(&hit, Some((id, RowZone::Title)) if *id == editing)
        {
            self.dispatch(route(RowAction::Blur, &editing));
        }

        if let Some((id, zone)) = hit {
            self.composing = false;
            if let Some(idx) = self.rows.iter().position(|r| *r == id) {
                self.select(idx);
            }
            match zone {
                RowZone::Checkbox => {
                    let completed = self.state.store.get(&id).is_some_and(|t| t.completed);
                    self.dispatch(route(RowAction::Toggle(!completed), &id));
                }
                RowZone::Delete => self.dispatch(route(RowAction::Delete, &id)),
                RowZone::Title => {
                    if self.state.is_editing(&id) {
                        self.dispatch(route(RowAction::Focus, &id));
                    }
                }
            }
            return;
        }

        if self.areas.input.contains(pos) {
            self.composing = true;
        } else if self.areas.header.contains(pos) {
            self.composing = false;
            let x = column - self.areas.header.x;
            if let Some((mode, _)) = ui::filter_tabs().into_iter().find(|(_, r)| r.contains(&x)) {
                self.dispatch(Command::SetFilter(mode));
            }
        } else {
            self.composing = false;
        }
    }

    fn row_at(&self, pos: Position) -> Option<(String, RowZone)> {
        let list = self.areas.list;
        if !list.contains(pos) {
            return None;
        }
        let idx = self.scroll + usize::from(pos.y - list.y);
        let id = self.rows.get(idx)?;
        let zone = ui::row_zone(pos.x - list.x, list.width);
        debug!(id = %id, ?zone, "row clicked");
        Some((id.clone(), zone))
    }
}
