// Keyboard events during playback
// crossterm delivers raw key events; only presses map to control actions

use super::RawModeGuard;
use crate::error::StreamResult;
use crate::playback::{ControlAction, KeySource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub fn key_to_action(key: KeyEvent) -> Option<ControlAction> {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        // Raw mode swallows SIGINT, so Ctrl-C has to be handled here
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ControlAction::Quit)
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            ' ' | 'p' => Some(ControlAction::TogglePause),
            'n' => Some(ControlAction::Next),
            'q' => Some(ControlAction::Quit),
            '+' | '=' => Some(ControlAction::VolumeUp),
            '-' | '_' => Some(ControlAction::VolumeDown),
            _ => None,
        },
        KeyCode::Right => Some(ControlAction::Next),
        KeyCode::Esc => Some(ControlAction::Quit),
        KeyCode::Up => Some(ControlAction::VolumeUp),
        KeyCode::Down => Some(ControlAction::VolumeDown),
        _ => None,
    }
}

/// Key source backed by the real terminal. Raw mode is on only while a track plays.
#[derive(Default)]
pub struct TerminalKeys {
    raw_mode: Option<RawModeGuard>,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeys {
    fn poll_action(&mut self, timeout: Duration) -> StreamResult<Option<ControlAction>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(key_to_action(key)),
            _ => Ok(None),
        }
    }

    fn begin(&mut self) -> StreamResult<()> {
        if self.raw_mode.is_none() {
            self.raw_mode = Some(RawModeGuard::enable()?);
        }
        Ok(())
    }

    fn end(&mut self) {
        self.raw_mode = None;
    }
}
