//! Held-key state shared between the presentation thread and the simulation
//!
//! Key handlers only flip bits here; the simulation samples the set once per
//! tick. Velocity is never touched from an input callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::sim::TickInput;

/// Gameplay keys the core cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    const fn bit(self) -> u8 {
        match self {
            Key::Left => 1 << 0,
            Key::Right => 1 << 1,
            Key::Jump => 1 << 2,
        }
    }

    /// Map a keyboard key name (as reported by most windowing layers)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" | " " | "Space" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Cloneable handle to the set of currently held keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Arc<AtomicU8>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.held.fetch_or(key.bit(), Ordering::AcqRel);
    }

    pub fn release(&self, key: Key) {
        self.held.fetch_and(!key.bit(), Ordering::AcqRel);
    }

    /// Forget every held key (e.g. when the window loses focus)
    pub fn release_all(&self) {
        self.held.store(0, Ordering::Release);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.load(Ordering::Acquire) & key.bit() != 0
    }

    /// Sample the held keys for one tick
    pub fn snapshot(&self) -> TickInput {
        let bits = self.held.load(Ordering::Acquire);
        TickInput {
            left: bits & Key::Left.bit() != 0,
            right: bits & Key::Right.bit() != 0,
            jump: bits & Key::Jump.bit() != 0,
        }
    }
}
