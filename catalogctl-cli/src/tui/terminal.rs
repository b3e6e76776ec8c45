//! Terminal session guard and main run loop

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, info};

use super::app::App;
use super::event::{handle_key, handle_mouse, poll_event, HandleResult};
use super::ui;

type ShellTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Whether keyboard enhancement flags were pushed and must be popped
static ENHANCED_KEYS: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Undo everything `TerminalSession::acquire` set up. Safe to call more than once.
fn restore_terminal() {
    if ENHANCED_KEYS.swap(false, Ordering::SeqCst) {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
}

/// Release builds abort on panic without running `Drop`, so restore from the hook
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore_terminal();
            previous(panic_info);
        }));
    });
}

/// Raw mode, alternate screen and mouse capture for as long as this lives.
/// Restored in `Drop` on normal and error exits, and by a panic hook on panic.
///
/// Super/Cmd+K only reaches the shell on terminals that support the kitty
/// keyboard protocol (flags are pushed when available); Ctrl+K works everywhere.
pub struct TerminalSession {
    terminal: ShellTerminal,
}

impl TerminalSession {
    pub fn acquire() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            restore_terminal();
            return Err(err).context("Failed to enter alternate screen");
        }

        if matches!(supports_keyboard_enhancement(), Ok(true)) {
            let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES;
            if execute!(stdout, PushKeyboardEnhancementFlags(flags)).is_ok() {
                ENHANCED_KEYS.store(true, Ordering::SeqCst);
            }
        }

        // From here on Drop does the cleanup
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(err).context("Failed to create terminal");
            }
        };

        debug!(
            enhanced_keys = ENHANCED_KEYS.load(Ordering::SeqCst),
            "terminal session acquired"
        );
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut ShellTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
        debug!("terminal session released");
    }
}

/// Run the navigation shell starting at `start_route`. Returns the final location.
pub fn run(start_route: &str) -> Result<String> {
    let mut session = TerminalSession::acquire()?;
    let mut app = App::new(start_route);

    run_loop(session.terminal(), &mut app)?;

    Ok(app.location().to_string())
}

/// Main event loop
fn run_loop(terminal: &mut ShellTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // 100ms timeout keeps resize redraws responsive
        if let Some(event) = poll_event(Duration::from_millis(100))? {
            let result = match event {
                Event::Key(key) => handle_key(app, key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(app, mouse, Rect::new(0, 0, size.width, size.height))
                }
                _ => HandleResult::Continue,
            };

            match result {
                HandleResult::Quit => app.should_quit = true,
                HandleResult::Navigated(route) => info!(route = %route, "navigated"),
                HandleResult::Continue => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_hook_restores_terminal_state() {
        install_panic_hook();
        install_panic_hook();

        ENHANCED_KEYS.store(true, Ordering::SeqCst);
        let result = std::panic::catch_unwind(|| panic!("render failed"));

        assert!(result.is_err());
        // the hook popped the keyboard flags before the previous hook ran
        assert!(!ENHANCED_KEYS.load(Ordering::SeqCst));
    }
}
