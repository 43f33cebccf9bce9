//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Input Routing
//!
//! Keys mean different things depending on whether a form is open:
//!
//! | key            | browsing              | form open          |
//! |----------------|-----------------------|--------------------|
//! | Tab / Shift+Tab| next / previous section | next / previous field |
//! | arrows         | move the highlight    | ↑↓ change field    |
//! | Enter          | ask about highlighted | submit             |
//! | Esc            | nothing               | close the form     |
//! | letters        | shortcuts (c, r, m, 1-3) | typed into the field |
//!
//! Ctrl+C quits from anywhere.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (a section is loading or a rotation timer is live):
//!   draws every ~80ms so the spinner and carousel move.
//! - **Idle**: sleeps up to 500ms and only redraws on input or on actions
//!   coming back from the runtime.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::catalog::HttpBackend;
use crate::core::action::{Action, update};
use crate::core::catalog_view::CatalogPhase;
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::runtime::Runtime;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement lets Shift+Tab and Esc arrive unambiguously.
        // Terminals that don't support it ignore the request.
        execute!(
            stdout(),
            EnableBracketedPaste,
            Hide,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Show
        );
    }
}

/// Translate a terminal event into an action for the current screen.
pub fn route_event(app: &App, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    if app.active_form().is_some() {
        return match event {
            TuiEvent::Submit => Some(Action::SubmitForm),
            TuiEvent::Escape => Some(Action::CloseForm),
            TuiEvent::Tab | TuiEvent::CursorDown => Some(Action::FocusNext),
            TuiEvent::BackTab | TuiEvent::CursorUp => Some(Action::FocusPrev),
            TuiEvent::InputChar(c) => Some(Action::FormInput(c.to_string())),
            TuiEvent::Paste(text) => Some(Action::FormInput(text.clone())),
            TuiEvent::Backspace => Some(Action::FormBackspace),
            _ => None,
        };
    }

    match event {
        TuiEvent::Tab => Some(Action::NextSection),
        TuiEvent::BackTab => Some(Action::PrevSection),
        TuiEvent::CursorLeft | TuiEvent::CursorUp => Some(Action::MoveSelection(-1)),
        TuiEvent::CursorRight | TuiEvent::CursorDown => Some(Action::MoveSelection(1)),
        TuiEvent::Submit => Some(Action::OpenInquiry),
        TuiEvent::InputChar(c) => match c {
            'q' => Some(Action::OpenInquiry),
            'c' => Some(Action::OpenContact),
            'r' => Some(Action::Refresh),
            'm' => Some(Action::ToggleMode),
            '1'..='9' => c
                .to_digit(10)
                .map(|d| Action::SelectSection(d as usize - 1)),
            _ => None,
        },
        _ => None,
    }
}

/// Apply an action and run what it asks for. Returns `true` on quit.
fn dispatch(app: &mut App, runtime: &mut Runtime, action: Action) -> bool {
    let mut quit = false;
    for effect in update(app, action) {
        quit |= runtime.execute(effect);
    }
    quit
}

fn is_animating(app: &App) -> bool {
    app.active_section().is_some_and(|view| {
        view.phase() == CatalogPhase::Loading || view.rotator().is_running()
    })
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = HttpBackend::new(config.base_url.clone(), config.request_timeout)
        .map_err(std::io::Error::other)?;
    info!("Using catalog backend at {}", backend.base_url());

    let mut app = App::from_config(&config);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime::new(Arc::new(backend), tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut should_quit = dispatch(&mut app, &mut runtime, Action::Mount);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &event) {
                debug!("Key routed to {:?}", action);
                should_quit |= dispatch(&mut app, &mut runtime, action);
            }
            if should_quit {
                break;
            }
        }

        // Handle background task actions (fetch results, ticks, timers)
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit |= dispatch(&mut app, &mut runtime, action);
        }
    }

    info!("Shutting down ({} timers live)", runtime.timer_count());
    drop(runtime);
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::FormScope;
    use crate::test_support::test_app;

    #[test]
    fn test_force_quit_always_quits() {
        let mut app = test_app();
        assert_eq!(route_event(&app, &TuiEvent::ForceQuit), Some(Action::Quit));
        update(&mut app, Action::OpenContact);
        assert_eq!(route_event(&app, &TuiEvent::ForceQuit), Some(Action::Quit));
    }

    #[test]
    fn test_browse_keys() {
        let app = test_app();
        let cases = [
            (TuiEvent::Tab, Some(Action::NextSection)),
            (TuiEvent::BackTab, Some(Action::PrevSection)),
            (TuiEvent::CursorLeft, Some(Action::MoveSelection(-1))),
            (TuiEvent::CursorDown, Some(Action::MoveSelection(1))),
            (TuiEvent::Submit, Some(Action::OpenInquiry)),
            (TuiEvent::InputChar('c'), Some(Action::OpenContact)),
            (TuiEvent::InputChar('r'), Some(Action::Refresh)),
            (TuiEvent::InputChar('m'), Some(Action::ToggleMode)),
            (TuiEvent::InputChar('3'), Some(Action::SelectSection(2))),
            (TuiEvent::InputChar('x'), None),
            (TuiEvent::Escape, None),
            (TuiEvent::Resize, None),
        ];
        for (event, expected) in cases {
            assert_eq!(route_event(&app, &event), expected, "event {:?}", event);
        }
    }

    #[test]
    fn test_form_keys_go_to_the_form() {
        let mut app = test_app();
        update(&mut app, Action::OpenContact);
        assert_eq!(app.active_form_scope(), Some(FormScope::Contact));

        let cases = [
            (TuiEvent::Tab, Some(Action::FocusNext)),
            (TuiEvent::CursorUp, Some(Action::FocusPrev)),
            (TuiEvent::Submit, Some(Action::SubmitForm)),
            (TuiEvent::Escape, Some(Action::CloseForm)),
            (TuiEvent::Backspace, Some(Action::FormBackspace)),
            (TuiEvent::InputChar('r'), Some(Action::FormInput("r".into()))),
            (
                TuiEvent::Paste("hello there".into()),
                Some(Action::FormInput("hello there".into())),
            ),
            (TuiEvent::CursorLeft, None),
        ];
        for (event, expected) in cases {
            assert_eq!(route_event(&app, &event), expected, "event {:?}", event);
        }
    }

    #[test]
    fn test_typing_c_in_form_does_not_reopen() {
        let mut app = test_app();
        update(&mut app, Action::OpenContact);
        for c in "cmr".chars() {
            if let Some(action) = route_event(&app, &TuiEvent::InputChar(c)) {
                update(&mut app, action);
            }
        }
        let form = app.active_form().unwrap();
        assert_eq!(form.pipeline.form().name, "cmr");
    }

    #[test]
    fn test_escape_closes_and_returns_to_browse() {
        let mut app = test_app();
        update(&mut app, Action::OpenContact);
        let action = route_event(&app, &TuiEvent::Escape).unwrap();
        update(&mut app, action);
        assert!(app.active_form().is_none());
        assert_eq!(
            route_event(&app, &TuiEvent::Tab),
            Some(Action::NextSection)
        );
    }

    #[test]
    fn test_not_animating_before_mount() {
        let mut app = test_app();
        assert!(!is_animating(&app));
        update(&mut app, Action::Mount);
        assert!(is_animating(&app));
    }
}
