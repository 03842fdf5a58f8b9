//! Event handling for the dice TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::App;
use crate::ui::layout::{AppLayout, ButtonHit};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event. `area` is the full terminal frame, used to
/// locate the buttons for mouse clicks.
pub fn handle_event(app: &mut App, event: Event, area: Rect) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse, area),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent, area: Rect) -> EventResult {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return EventResult::Continue;
    }
    if app.showing_help() {
        app.close_help();
        return EventResult::NeedsRedraw;
    }

    match AppLayout::calculate(area).hit_test(mouse.column, mouse.row) {
        Some(ButtonHit::Remove) => app.remove_die(),
        Some(ButtonHit::Add) => app.add_die(),
        Some(ButtonHit::Roll) => app.roll(),
        None => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        app.quit();
        return EventResult::Quit;
    }

    // Any key closes the help overlay
    if app.showing_help() {
        app.close_help();
        return EventResult::NeedsRedraw;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
            EventResult::Quit
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => {
            app.roll();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up | KeyCode::Right => {
            app.add_die();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down | KeyCode::Left => {
            app.remove_die();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
