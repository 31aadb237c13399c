use std::path::PathBuf;
use std::time::Duration;

use color_eyre::Result;
use crossbeam_channel::Sender;
use crossterm::event::{self, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

#[derive(PartialEq, Debug)]
pub enum EventState {
    Consumed,
    NotConsumed,
}

impl EventState {
    pub fn is_consumed(&self) -> bool {
        *self == EventState::Consumed
    }
}

impl From<bool> for EventState {
    fn from(consumed: bool) -> Self {
        if consumed {
            EventState::Consumed
        } else {
            EventState::NotConsumed
        }
    }
}

#[derive(Clone, Debug)]
pub enum Event {
    Tick,
    Input(Key),
    Pointer(Pointer),
    Audio(AudioMessage),
}

/// Left button mouse activity, in terminal cells.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Pointer {
    Down { column: u16, row: u16 },
    Drag { column: u16, row: u16 },
    Up { column: u16, row: u16 },
}

impl Pointer {
    fn from_mouse(mouse: event::MouseEvent) -> Option<Self> {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Pointer::Down { column, row }),
            MouseEventKind::Drag(MouseButton::Left) => Some(Pointer::Drag { column, row }),
            MouseEventKind::Up(MouseButton::Left) => Some(Pointer::Up { column, row }),
            _ => None,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
    Esc,

    Left,
    Right,
    Up,
    Down,

    Home,
    End,
    PageUp,
    PageDown,

    Char(char),
    Ctrl(char),
    Alt(char),
    Unknown,
}

impl From<event::KeyEvent> for Key {
    fn from(value: event::KeyEvent) -> Self {
        let mods = value.modifiers;
        match value.code {
            KeyCode::Enter => Self::Enter,
            KeyCode::Tab => Self::Tab,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Esc => Self::Esc,

            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,

            KeyCode::Home => Self::Home,
            KeyCode::End => Self::End,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown => Self::PageDown,

            KeyCode::Char(c) if mods == KeyModifiers::CONTROL => Self::Ctrl(c),
            KeyCode::Char(c) if mods == KeyModifiers::ALT => Self::Alt(c),
            KeyCode::Char(c) => Self::Char(c),
            _ => Self::Unknown,
        }
    }
}

/// Replies from the audio thread.
#[cfg_attr(not(feature = "rodio"), allow(dead_code))]
#[derive(Clone, Debug)]
pub enum AudioMessage {
    Loaded { duration: Option<Duration> },
    Position(Duration),
    Played,
    Paused,
    EndOfTrack,
    Failed(String),
}

/// Requests to the audio thread.
#[cfg_attr(not(feature = "rodio"), allow(dead_code))]
#[derive(Debug)]
pub enum Command {
    Load(PathBuf),
    Clear,
    Play,
    Pause,
    Seek(Duration),
    SendState,
}

pub fn spawn_event_emitter(event_tx: Sender<Event>, tickrate: Duration) -> Result<()> {
    _ = std::thread::spawn(move || -> Result<()> {
        loop {
            if event::poll(tickrate)? {
                match event::read()? {
                    event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                        event_tx.send(Event::Input(Key::from(key)))?;
                    }
                    event::Event::Mouse(mouse) => {
                        if let Some(pointer) = Pointer::from_mouse(mouse) {
                            event_tx.send(Event::Pointer(pointer))?;
                        }
                    }
                    _ => {}
                }
            }

            event_tx.send(Event::Tick)?;
        }
    });

    Ok(())
}
