//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the page. Raw key, mouse and resize
//! events are mapped to [`PageCommand`]s according to the current [`Mode`].
//!
//! # API
//!
//! - `command_for_key` - Map a crossterm KeyEvent to a command
//! - `command_for_event` - Map any crossterm Event to a command
//! - `poll_command` - Non-blocking check with timeout
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::input::{poll_command, Mode};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(command)) = poll_command(Duration::from_millis(16), Mode::Browse) {
//!         app.handle(command, clock.now());
//!     }
//! }
//! ```

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::scroll::{LINE_SCROLL, WHEEL_SCROLL};
use crate::content::SectionId;

// =============================================================================
// MODE & COMMANDS
// =============================================================================

/// What keys currently drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Scrolling and navigating the page.
    #[default]
    Browse,
    /// Typing into the contact form.
    Form,
}

/// Everything the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommand {
    ScrollBy(i32),
    PageDown,
    PageUp,
    Top,
    Bottom,
    NextSection,
    PreviousSection,
    JumpTo(SectionId),
    ToggleTheme,
    /// Drop the manual theme override.
    FollowSystemTheme,
    OpenForm,
    CloseForm,
    Insert(char),
    DeleteBack,
    NextField,
    PreviousField,
    Submit,
    Resize(u16, u16),
    Quit,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Map a key press to a command. Releases and unbound keys yield None.
pub fn command_for_key(event: CrosstermKeyEvent, mode: Mode) -> Option<PageCommand> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && event.code == KeyCode::Char('c') {
        return Some(PageCommand::Quit);
    }

    match mode {
        Mode::Browse => browse_key(event.code, ctrl),
        Mode::Form => form_key(event.code, event.modifiers),
    }
}

fn browse_key(code: KeyCode, ctrl: bool) -> Option<PageCommand> {
    use PageCommand::*;

    let command = match code {
        KeyCode::Up | KeyCode::Char('k') => ScrollBy(-LINE_SCROLL),
        KeyCode::Down | KeyCode::Char('j') => ScrollBy(LINE_SCROLL),
        KeyCode::PageUp => PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => PageDown,
        KeyCode::Char('u') if ctrl => PageUp,
        KeyCode::Char('d') if ctrl => PageDown,
        KeyCode::Home | KeyCode::Char('g') => Top,
        KeyCode::End | KeyCode::Char('G') => Bottom,
        KeyCode::Tab | KeyCode::Char('n') => NextSection,
        KeyCode::BackTab | KeyCode::Char('p') => PreviousSection,
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10)? as usize - 1;
            JumpTo(*SectionId::NAVIGATION.get(index)?)
        }
        KeyCode::Char('t') => ToggleTheme,
        KeyCode::Char('T') => FollowSystemTheme,
        KeyCode::Char('c') | KeyCode::Enter => OpenForm,
        KeyCode::Char('q') | KeyCode::Esc => Quit,
        _ => return None,
    };
    Some(command)
}

fn form_key(code: KeyCode, modifiers: KeyModifiers) -> Option<PageCommand> {
    use PageCommand::*;

    let command = match code {
        KeyCode::Esc => CloseForm,
        KeyCode::Tab | KeyCode::Down => NextField,
        KeyCode::BackTab | KeyCode::Up => PreviousField,
        KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => Insert('\n'),
        KeyCode::Enter => Submit,
        KeyCode::Backspace => DeleteBack,
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => Insert(c),
        _ => return None,
    };
    Some(command)
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Wheel scrolling moves the page; other mouse events are ignored.
pub fn command_for_mouse(event: CrosstermMouseEvent) -> Option<PageCommand> {
    match event.kind {
        MouseEventKind::ScrollUp => Some(PageCommand::ScrollBy(-WHEEL_SCROLL)),
        MouseEventKind::ScrollDown => Some(PageCommand::ScrollBy(WHEEL_SCROLL)),
        _ => None,
    }
}

/// Map any terminal event.
pub fn command_for_event(event: CrosstermEvent, mode: Mode) -> Option<PageCommand> {
    match event {
        CrosstermEvent::Key(key) => command_for_key(key, mode),
        CrosstermEvent::Mouse(mouse) if mode == Mode::Browse => command_for_mouse(mouse),
        CrosstermEvent::Resize(w, h) => Some(PageCommand::Resize(w, h)),
        _ => None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a command with timeout.
/// Returns None if no bound event arrived within timeout.
pub fn poll_command(timeout: Duration, mode: Mode) -> std::io::Result<Option<PageCommand>> {
    if poll(timeout)? {
        Ok(command_for_event(read()?, mode))
    } else {
        Ok(None)
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================
