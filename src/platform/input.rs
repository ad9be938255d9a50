//! Keyboard to control-intent mapping
//!
//! Raw key polling belongs to the host. It hands over the keys held this
//! frame and each seat's key set turns them into intents.

use serde::{Deserialize, Serialize};

use crate::sim::car::{Controls, Intent};

/// Keys the race cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
}

/// One seat's bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub left: Key,
    pub right: Key,
    pub forward: Key,
    pub backward: Key,
}

impl KeySet {
    /// Seat one
    pub fn wasd() -> Self {
        Self {
            left: Key::A,
            right: Key::D,
            forward: Key::W,
            backward: Key::S,
        }
    }

    /// Seat two
    pub fn arrows() -> Self {
        Self {
            left: Key::Left,
            right: Key::Right,
            forward: Key::Up,
            backward: Key::Down,
        }
    }

    pub fn intent(&self, key: Key) -> Intent {
        match key {
            k if k == self.left => Intent::RotateLeft,
            k if k == self.right => Intent::RotateRight,
            k if k == self.forward => Intent::ThrottleForward,
            k if k == self.backward => Intent::ThrottleBackward,
            _ => Intent::None,
        }
    }

    /// Controls held this tick; keys bound to other seats are ignored
    pub fn controls(&self, held: &[Key]) -> Controls {
        held.iter().map(|&key| self.intent(key)).collect()
    }

    pub fn keys(&self) -> [Key; 4] {
        [self.left, self.right, self.forward, self.backward]
    }
}
