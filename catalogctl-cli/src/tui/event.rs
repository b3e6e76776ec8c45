//! Event handling for the navigation shell

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;

use super::app::App;
use super::routes::LANDING_LINK;
use super::ui;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling an input event
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Quit,
    /// Location changed to this route
    Navigated(String),
}

/// Ctrl+K or Super/Cmd+K
pub fn is_palette_chord(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('k') | KeyCode::Char('K'))
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return HandleResult::Quit;
    }

    if is_palette_chord(&key) {
        app.palette.toggle();
        return HandleResult::Continue;
    }

    if app.palette.is_open() {
        handle_palette(app, key)
    } else {
        handle_page(app, key)
    }
}

fn handle_palette(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.palette.close(),
        KeyCode::Down => app.palette.select_next(),
        KeyCode::Up => app.palette.select_prev(),
        KeyCode::Enter => {
            if let Some(route) = app.select_palette_entry() {
                return HandleResult::Navigated(route.to_string());
            }
        }
        KeyCode::Backspace => app.palette.backspace(),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
        {
            app.palette.push_char(c)
        }
        _ => {}
    }
    HandleResult::Continue
}

fn handle_page(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => HandleResult::Quit,
        KeyCode::Enter if app.is_landing() => {
            app.navigate(LANDING_LINK);
            HandleResult::Navigated(LANDING_LINK.to_string())
        }
        _ => HandleResult::Continue,
    }
}

/// Handle a mouse event; `area` is the full terminal area
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, area: Rect) -> HandleResult {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return HandleResult::Continue;
    }

    let field = ui::shell_layout(area).search_field;
    let inside = mouse.column >= field.x
        && mouse.column < field.x.saturating_add(field.width)
        && mouse.row >= field.y
        && mouse.row < field.y.saturating_add(field.height);

    if inside {
        app.palette.open();
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_chord_toggles_palette() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        assert!(app.palette.is_open());
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER));
        assert!(!app.palette.is_open());
    }

    #[test]
    fn test_escape_closes() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.palette.is_open());
    }

    #[test]
    fn test_keyboard_navigation_to_settings() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        for c in "settings".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        let result = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(result, HandleResult::Navigated("/settings".into()));
        assert_eq!(app.location(), "/settings");
        assert!(!app.palette.is_open());
    }

    #[test]
    fn test_arrow_selection() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        handle_key(&mut app, key(KeyCode::Down));
        let result = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(result, HandleResult::Navigated("/dashboard".into()));
    }

    #[test]
    fn test_q_types_into_open_palette() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), HandleResult::Continue);
        assert_eq!(app.palette.query(), "q");
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), HandleResult::Quit);
    }

    #[test]
    fn test_ctrl_c_quits_with_palette_open() {
        let mut app = App::new("/");
        handle_key(&mut app, ctrl('k'));
        assert_eq!(handle_key(&mut app, ctrl('c')), HandleResult::Quit);
    }

    #[test]
    fn test_enter_on_landing_follows_link() {
        let mut app = App::new("/");
        let result = handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(result, HandleResult::Navigated(LANDING_LINK.into()));

        // Only the landing page has the link
        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), HandleResult::Continue);
        assert_eq!(app.location(), LANDING_LINK);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = App::new("/");
        let mut event = ctrl('k');
        event.kind = KeyEventKind::Release;
        handle_key(&mut app, event);
        assert!(!app.palette.is_open());
    }

    #[test]
    fn test_click_on_search_field_opens_palette() {
        let area = Rect::new(0, 0, 100, 30);
        let field = ui::shell_layout(area).search_field;
        let mut app = App::new("/");

        handle_mouse(&mut app, click(0, area.height - 1), area);
        assert!(!app.palette.is_open());

        handle_mouse(&mut app, click(field.x + 1, field.y + 1), area);
        assert!(app.palette.is_open());
    }
}
