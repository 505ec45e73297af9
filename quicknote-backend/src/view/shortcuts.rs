//! Global keyboard shortcuts with an explicit registration lifetime.
//!
//! A view registers its bindings when it mounts and removes them when it
//! unmounts; registering a chord that is already bound is rejected so
//! handlers never pile up across remounts.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Invalid key chord: {0:?}")]
    InvalidChord(String),
    #[error("Key chord already bound: {0}")]
    AlreadyBound(KeyChord),
}

/// A key plus the command modifier (Ctrl, or Cmd/Meta on macOS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub command: bool,
    /// Always lowercase
    pub key: char,
}

impl KeyChord {
    pub fn command(key: char) -> Self {
        Self {
            command: true,
            key: key.to_ascii_lowercase(),
        }
    }
}

impl FromStr for KeyChord {
    type Err = ShortcutError;

    /// Parses "Ctrl+N", "cmd+k", "Meta+N" or a bare "n"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ShortcutError::InvalidChord(s.to_string());
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();

        let (command, key) = match parts.as_slice() {
            [key] => (false, *key),
            [modifier, key] => match modifier.to_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" => (true, *key),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        };

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(Self {
                command,
                key: c.to_ascii_lowercase(),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.command {
            write!(f, "Ctrl+{}", self.key.to_ascii_uppercase())
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// A raw key press as delivered by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub ctrl: bool,
    pub meta: bool,
    pub key: char,
}

impl KeyEvent {
    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            meta: false,
            key,
        }
    }

    pub fn plain(key: char) -> Self {
        Self {
            ctrl: false,
            meta: false,
            key,
        }
    }

    pub fn chord(&self) -> KeyChord {
        KeyChord {
            command: self.ctrl || self.meta,
            key: self.key.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NewNote,
    FocusSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Debug)]
struct Binding {
    id: HandlerId,
    chord: KeyChord,
    action: Shortcut,
}

#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    bindings: Vec<Binding>,
    next_id: u64,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        chord: KeyChord,
        action: Shortcut,
    ) -> Result<HandlerId, ShortcutError> {
        if self.bindings.iter().any(|b| b.chord == chord) {
            return Err(ShortcutError::AlreadyBound(chord));
        }
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.bindings.push(Binding { id, chord, action });
        Ok(id)
    }

    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    /// Action bound to this key press, if any
    pub fn dispatch(&self, event: &KeyEvent) -> Option<Shortcut> {
        let chord = event.chord();
        self.bindings
            .iter()
            .find(|b| b.chord == chord)
            .map(|b| b.action)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
