use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

/// Wait up to `tick_rate` for input, then drain everything already queued.
///
/// The events returned together form one burst; an empty burst is a tick.
pub fn poll_burst(tick_rate: Duration) -> Result<Vec<AppEvent>> {
    let mut burst = Vec::new();
    if !event::poll(tick_rate)? {
        return Ok(burst);
    }
    loop {
        if let Some(ev) = translate(event::read()?) {
            burst.push(ev);
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(burst)
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Windows reports releases too
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(..) => Some(AppEvent::Resize),
        _ => None,
    }
}
