use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{DELETE_PROMPT, RowMode};
use crate::store::FilterMode;

use super::app::TuiApp;
use super::form::{render_hints, render_modal, spans_with_cursor};

const BRAND: &str = " ticklist ";
const PLACEHOLDER: &str = "What needs to be done?";
const DELETE_GLYPH: &str = "✕";

/// Screen regions, shared by the renderer and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Areas {
    pub header: Rect,
    pub input: Rect,
    pub list_frame: Rect,
    /// Inside the list border; one task per line.
    pub list: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let list = Block::default().borders(Borders::ALL).inner(chunks[2]);
    Areas {
        header: chunks[0],
        input: chunks[1],
        list_frame: chunks[2],
        list,
        footer: chunks[3],
    }
}

/// Clickable parts of a task line: `▸ [x] title ... ✕ `
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowZone {
    Checkbox,
    Title,
    Delete,
}

/// Classify a column relative to the start of the list area.
pub fn row_zone(col: u16, width: u16) -> RowZone {
    if col >= width.saturating_sub(3) {
        RowZone::Delete
    } else if (2..5).contains(&col) {
        RowZone::Checkbox
    } else {
        RowZone::Title
    }
}

/// Header columns occupied by each filter tab.
pub fn filter_tabs() -> Vec<(FilterMode, Range<u16>)> {
    let mut x = width_of(BRAND) + 1;
    FilterMode::ALL
        .iter()
        .map(|&mode| {
            let w = width_of(mode.label()) + 2;
            let range = x..x + w;
            x += w + 1;
            (mode, range)
        })
        .collect()
}

fn width_of(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}

pub fn draw(frame: &mut Frame, app: &TuiApp) {
    let areas = layout(frame.area());
    frame.render_widget(Block::default().style(app.theme.base()), frame.area());

    draw_header(frame, app, areas.header);
    draw_input(frame, app, areas.input);
    draw_list(frame, app, areas.list_frame, areas.list);
    draw_footer(frame, app, areas.footer);

    if app.state.pending_delete().is_some() {
        draw_confirm(frame, app);
    } else if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(
            BRAND,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    for (mode, _) in filter_tabs() {
        let style = if mode == app.state.filter() {
            theme.tab_active_style()
        } else {
            theme.tab_inactive_style()
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = &app.theme;
    let border = if app.composing {
        Style::default().fg(theme.accent)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .title(" New task ")
        .borders(Borders::ALL)
        .border_style(border);

    let line = if app.composing {
        let mut spans = vec![Span::styled("❯ ", Style::default().fg(theme.accent))];
        spans.extend(spans_with_cursor(
            &app.new_task.value,
            app.new_task.cursor,
            Style::default().fg(theme.text_primary),
        ));
        Line::from(spans)
    } else if app.new_task.value.is_empty() {
        Line::from(vec![
            Span::styled("❯ ", theme.secondary()),
            Span::styled(PLACEHOLDER, theme.secondary()),
        ])
    } else {
        Line::from(vec![
            Span::styled("❯ ", theme.secondary()),
            Span::raw(app.new_task.value.as_str()),
        ])
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_list(frame: &mut Frame, app: &TuiApp, outer: Rect, inner: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(format!(" {} ", app.state.filter().label()))
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    frame.render_widget(block, outer);

    if app.rows.is_empty() {
        let empty = match app.state.filter() {
            FilterMode::All => "Nothing to do. Press n to add a task.",
            FilterMode::Active => "No active tasks.",
            FilterMode::Completed => "No completed tasks.",
        };
        frame.render_widget(Paragraph::new(Span::styled(empty, theme.secondary())), inner);
        return;
    }

    let focused = app.state.focused_edit();
    let visible = app.rows.iter().enumerate().skip(app.scroll);
    for (line, (idx, id)) in (0..inner.height).zip(visible) {
        let Some(task) = app.state.store.get(id) else {
            continue;
        };
        let y = inner.y + line;
        let selected = idx == app.selected;

        let marker = if selected {
            Span::styled("▸ ", theme.selection_style())
        } else {
            Span::raw("  ")
        };
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let mut spans = vec![
            marker,
            Span::styled(checkbox, theme.checkbox_style(task.completed)),
            Span::raw(" "),
        ];
        match app.state.row_mode(id) {
            RowMode::Editing(buf) if focused == Some(id.as_str()) => {
                spans.extend(spans_with_cursor(&buf.value, buf.cursor, theme.edit_style()));
            }
            RowMode::Editing(buf) => spans.push(Span::styled(buf.value.as_str(), theme.edit_style())),
            RowMode::Viewing => {
                let mut style = theme.title_style(task.completed);
                if selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(task.title.as_str(), style));
            }
        }

        let row = Rect::new(inner.x, y, inner.width.saturating_sub(3), 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), row);

        if inner.width >= 3 {
            let glyph = Rect::new(inner.x + inner.width - 2, y, 1, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(DELETE_GLYPH, theme.delete_style())),
                glyph,
            );
        }
    }
}

fn draw_footer(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let theme = &app.theme;
    let status = format!(
        " {}  ·  theme: {} ",
        app.items_left,
        app.state.theme().as_str()
    );
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(width_of(&status)), Constraint::Min(0)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(theme.text_primary))),
        chunks[0],
    );

    let hints: &[(&str, &str)] = if app.state.focused_edit().is_some() {
        &[(" Enter", " save  "), ("Esc", " cancel  "), ("Tab", " leave")]
    } else if app.composing {
        &[(" Enter", " add  "), ("Esc", " done")]
    } else {
        &[
            (" n", " new  "),
            ("Space", " toggle  "),
            ("e", " edit  "),
            ("d", " delete  "),
            ("?", " help  "),
            ("q", " quit"),
        ]
    };
    render_hints(
        frame,
        chunks[1],
        hints,
        Style::default().fg(theme.accent),
        theme.secondary(),
    );
}

fn draw_confirm(frame: &mut Frame, app: &TuiApp) {
    let theme = &app.theme;
    let inner = render_modal(
        frame,
        " Confirm ",
        Style::default().fg(theme.modal_border),
        44,
        6,
    );
    let title = app
        .state
        .pending_delete()
        .and_then(|id| app.state.store.get(id))
        .map(|t| t.title.as_str())
        .unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            DELETE_PROMPT,
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(title, theme.secondary())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme.delete_style()),
            Span::styled(" delete   ", theme.secondary()),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::styled(" keep", theme.secondary()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_help(frame: &mut Frame, app: &TuiApp) {
    let theme = &app.theme;
    let sections = app.keymap.help_entries();
    let mut lines: Vec<Line> = Vec::new();
    for (label, entries) in &sections {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *label,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for e in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<14}", e.label), Style::default().fg(theme.text_primary)),
                Span::styled(e.description, theme.secondary()),
            ]));
        }
    }
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let inner = render_modal(frame, " Keys ", theme.border_style(), 52, height);
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reserves_header_input_and_footer() {
        let areas = layout(Rect::new(0, 0, 60, 20));
        assert_eq!(areas.header, Rect::new(0, 0, 60, 1));
        assert_eq!(areas.input, Rect::new(0, 1, 60, 3));
        assert_eq!(areas.list_frame, Rect::new(0, 4, 60, 15));
        assert_eq!(areas.list, Rect::new(1, 5, 58, 13));
        assert_eq!(areas.footer, Rect::new(0, 19, 60, 1));
    }

    #[test]
    fn row_zones() {
        assert_eq!(row_zone(0, 40), RowZone::Title);
        assert_eq!(row_zone(2, 40), RowZone::Checkbox);
        assert_eq!(row_zone(4, 40), RowZone::Checkbox);
        assert_eq!(row_zone(6, 40), RowZone::Title);
        assert_eq!(row_zone(37, 40), RowZone::Delete);
        assert_eq!(row_zone(38, 40), RowZone::Delete);
    }

    #[test]
    fn filter_tabs_follow_brand() {
        let tabs = filter_tabs();
        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs[0], (FilterMode::All, 11..16));
        assert_eq!(tabs[1], (FilterMode::Active, 17..25));
        assert_eq!(tabs[2], (FilterMode::Completed, 26..37));
    }
}
