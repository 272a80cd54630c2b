//! Keyboard state.
//!
//! DOM key listeners push [`KeyPress`] events into an unbounded channel; the
//! game loop drains that channel once per animation frame with
//! [`process_input`] and the game reads the resulting [`KeyState`].

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use hashbrown::HashSet;

/// A key transition, keyed by `KeyboardEvent.code` (e.g. `"ArrowRight"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    KeyDown(String),
    KeyUp(String),
}

pub type KeyEventChannel = (UnboundedSender<KeyPress>, UnboundedReceiver<KeyPress>);

pub fn key_event_channel() -> KeyEventChannel {
    mpsc::unbounded()
}

#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed_keys: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed_keys.contains(code)
    }

    pub fn set_pressed(&mut self, code: &str) {
        self.pressed_keys.insert(code.to_string());
    }

    pub fn set_released(&mut self, code: &str) {
        self.pressed_keys.remove(code);
    }

    pub fn apply(&mut self, press: &KeyPress) {
        match press {
            KeyPress::KeyDown(code) => self.set_pressed(code),
            KeyPress::KeyUp(code) => self.set_released(code),
        }
    }
}

/// Drain every queued key event into `state` without blocking.
///
/// Stops on an empty queue or a closed channel. Returns the number of events
/// applied.
#[allow(deprecated)]
pub fn process_input(state: &mut KeyState, keyevent_rx: &mut UnboundedReceiver<KeyPress>) -> usize {
    let mut applied = 0;
    loop {
        match keyevent_rx.try_next() {
            Ok(Some(press)) => {
                state.apply(&press);
                applied += 1;
            }
            // Closed.
            Ok(None) => break,
            // Empty.
            Err(_) => break,
        }
    }
    applied
}
