use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::store::ThemePreference;

/// Colours used by the renderer.
///
/// There is one built-in palette per explicit preference. `Auto` leaves
/// foreground and background to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // ── Surface ───────────────────────────────────────────────
    pub background: Color,
    pub border: Color,

    // ── Text ──────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_done: Color,

    // ── Accents ───────────────────────────────────────────────
    pub accent: Color,
    pub checkbox_done: Color,
    pub delete: Color,
    pub selection: Color,

    // ── Tabs ──────────────────────────────────────────────────
    pub tab_active: Color,
    pub tab_inactive: Color,

    // ── Modal ─────────────────────────────────────────────────
    pub modal_border: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::White,
            border: Color::Gray,
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            text_done: Color::Gray,
            accent: Color::Blue,
            checkbox_done: Color::Green,
            delete: Color::Red,
            selection: Color::LightBlue,
            tab_active: Color::Blue,
            tab_inactive: Color::DarkGray,
            modal_border: Color::Red,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_done: Color::DarkGray,
            accent: Color::Cyan,
            checkbox_done: Color::LightGreen,
            delete: Color::LightRed,
            selection: Color::Cyan,
            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,
            modal_border: Color::LightRed,
        }
    }

    /// Follows the terminal's own colour scheme.
    pub fn terminal() -> Self {
        Self {
            background: Color::Reset,
            border: Color::DarkGray,
            text_primary: Color::Reset,
            text_secondary: Color::DarkGray,
            text_done: Color::DarkGray,
            accent: Color::Cyan,
            checkbox_done: Color::Green,
            delete: Color::Red,
            selection: Color::Cyan,
            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,
            modal_border: Color::Red,
        }
    }

    pub fn for_preference(pref: ThemePreference, overrides: &ThemeSection) -> Self {
        match pref {
            ThemePreference::Auto => Self::terminal(),
            ThemePreference::Light => overrides.light.build_over(Self::light()),
            ThemePreference::Dark => overrides.dark.build_over(Self::dark()),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Completed titles are dimmed and struck through.
    pub fn title_style(&self, completed: bool) -> Style {
        if completed {
            Style::default()
                .fg(self.text_done)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(self.text_primary)
        }
    }

    pub fn checkbox_style(&self, completed: bool) -> Style {
        if completed {
            Style::default().fg(self.checkbox_done)
        } else {
            Style::default().fg(self.text_secondary)
        }
    }

    pub fn delete_style(&self) -> Style {
        Style::default().fg(self.delete)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn edit_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.tab_active)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.tab_inactive)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// `[theme.light]` and `[theme.dark]` in `config.toml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeSection {
    #[serde(default)]
    pub light: ThemeConfig,
    #[serde(default)]
    pub dark: ThemeConfig,
}

/// All-optional mirror of [`Theme`]. Only `Some` fields that parse override
/// the base palette.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub background: Option<String>,
    pub border: Option<String>,
    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub text_done: Option<String>,
    pub accent: Option<String>,
    pub checkbox_done: Option<String>,
    pub delete: Option<String>,
    pub selection: Option<String>,
    pub tab_active: Option<String>,
    pub tab_inactive: Option<String>,
    pub modal_border: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"red"`, `"dark_gray"`, etc.) and
/// `"rgb(R,G,B)"` syntax.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }

    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "default" | "reset" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source
        && let Some(color) = parse_color(s)
    {
        *target = color;
    }
}

impl ThemeConfig {
    pub fn build_over(&self, base: Theme) -> Theme {
        let mut t = base;

        apply(&mut t.background, self.background.as_ref());
        apply(&mut t.border, self.border.as_ref());
        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_secondary, self.text_secondary.as_ref());
        apply(&mut t.text_done, self.text_done.as_ref());
        apply(&mut t.accent, self.accent.as_ref());
        apply(&mut t.checkbox_done, self.checkbox_done.as_ref());
        apply(&mut t.delete, self.delete.as_ref());
        apply(&mut t.selection, self.selection.as_ref());
        apply(&mut t.tab_active, self.tab_active.as_ref());
        apply(&mut t.tab_inactive, self.tab_inactive.as_ref());
        apply(&mut t.modal_border, self.modal_border.as_ref());

        t
    }
}
