use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

// ── Text editing helpers ──────────────────────────────────────────────

/// A single-line text field with a byte-offset cursor.
pub trait TextField {
    fn text_mut(&mut self) -> (&mut String, &mut usize);
}

impl TextField for crate::app::EditBuffer {
    fn text_mut(&mut self) -> (&mut String, &mut usize) {
        (&mut self.value, &mut self.cursor)
    }
}

/// Scratch input used for the new-task line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub value: String,
    pub cursor: usize,
}

impl InputLine {
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

impl TextField for InputLine {
    fn text_mut(&mut self) -> (&mut String, &mut usize) {
        (&mut self.value, &mut self.cursor)
    }
}

fn prev_char_start(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_end(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

/// Byte offset of the start of the word before `pos`.
pub fn word_boundary_left(s: &str, pos: usize) -> usize {
    let trimmed = s[..pos].trim_end();
    match trimmed.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((idx, c)) => idx + c.len_utf8(),
        None => 0,
    }
}

/// Byte offset of the start of the word after `pos`.
pub fn word_boundary_right(s: &str, pos: usize) -> usize {
    let after = &s[pos..];
    let Some(ws) = after.find(char::is_whitespace) else {
        return s.len();
    };
    match after[ws..].find(|c: char| !c.is_whitespace()) {
        Some(word) => pos + ws + word,
        None => s.len(),
    }
}

/// Apply standard line-editing keys to a field.
///
/// Handles insertion, deletion, arrow/word/line movement, and Ctrl+W /
/// Ctrl+U. Returns `true` if the key was consumed.
pub fn apply_text_edit(field: &mut impl TextField, key: KeyEvent) -> bool {
    let (buf, cursor) = field.text_mut();
    *cursor = (*cursor).min(buf.len());
    let mods = key.modifiers;
    let word = mods.contains(KeyModifiers::ALT);
    let line = mods.contains(KeyModifiers::SUPER);

    match key.code {
        KeyCode::Left if line => *cursor = 0,
        KeyCode::Left if word => *cursor = word_boundary_left(buf, *cursor),
        KeyCode::Left => *cursor = prev_char_start(buf, *cursor),
        KeyCode::Right if line => *cursor = buf.len(),
        KeyCode::Right if word => *cursor = word_boundary_right(buf, *cursor),
        KeyCode::Right => *cursor = next_char_end(buf, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buf.len(),

        KeyCode::Backspace if line => {
            buf.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Char('u') if mods.contains(KeyModifiers::CONTROL) => {
            buf.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Backspace if word => delete_back_to(buf, cursor, word_boundary_left),
        KeyCode::Char('w') if mods.contains(KeyModifiers::CONTROL) => {
            delete_back_to(buf, cursor, word_boundary_left);
        }
        KeyCode::Backspace => delete_back_to(buf, cursor, prev_char_start),
        KeyCode::Delete => {
            let end = next_char_end(buf, *cursor);
            buf.drain(*cursor..end);
        }

        KeyCode::Char(c) if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}

fn delete_back_to(buf: &mut String, cursor: &mut usize, boundary: fn(&str, usize) -> usize) {
    let start = boundary(buf, *cursor);
    buf.drain(start..*cursor);
    *cursor = start;
}

/// Split a buffer around the cursor, rendering the cursor as a block.
pub fn spans_with_cursor<'a>(buf: &'a str, cursor: usize, style: Style) -> Vec<Span<'a>> {
    let pos = cursor.min(buf.len());
    let (before, after) = buf.split_at(pos);
    vec![
        Span::styled(before, style),
        Span::styled("\u{2588}", style),
        Span::styled(after, style),
    ]
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Clear a centred panel, draw its border, and return the inner area.
pub fn render_modal(
    frame: &mut Frame,
    title: &str,
    border_style: Style,
    width: u16,
    height: u16,
) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let panel = Rect::new(x, y, w, h);

    frame.render_widget(Clear, panel);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    inner
}

/// Render alternating key/description spans on one line.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, key_style),
                Span::styled(*desc, desc_style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
