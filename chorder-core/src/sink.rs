//! Key event sink
//!
//! The interpreter reports every key transition through a [`KeySink`]. Sinks
//! are called synchronously from inside `press` and must not call back into
//! the interpreter.

use crate::error::SinkError;
use crate::keys::{self, KeyCode};
use std::fmt;

/// Receiver of key press/release events
pub trait KeySink {
    fn emit(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError>;
}

impl<F> KeySink for F
where
    F: FnMut(KeyCode, bool) -> Result<(), SinkError>,
{
    fn emit(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        self(code, pressed)
    }
}

/// A single emitted key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            pressed: true,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Self {
            code,
            pressed: false,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.pressed { '↓' } else { '↑' };
        match keys::key_name(self.code) {
            Some(name) => write!(f, "{arrow}{name}"),
            None => write!(f, "{arrow}0x{:02x}", self.code),
        }
    }
}

/// Sink that records every event in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<KeyEvent>,
    /// Fail every emission after this many successful ones
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts `count` events and rejects the rest.
    pub fn failing_after(count: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(count),
        }
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the sink empty.
    pub fn take(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.events)
    }
}

impl KeySink for RecordingSink {
    fn emit(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        if self.fail_after.is_some_and(|n| self.events.len() >= n) {
            return Err(format!("sink closed after {} events", self.events.len()).into());
        }
        self.events.push(KeyEvent { code, pressed });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |code: KeyCode, pressed: bool| -> Result<(), SinkError> {
            seen.push((code, pressed));
            Ok(())
        };
        sink.emit(30, true).unwrap();
        sink.emit(30, false).unwrap();
        assert_eq!(seen, vec![(30, true), (30, false)]);
    }

    #[test]
    fn recording_sink_failure() {
        let mut sink = RecordingSink::failing_after(1);
        assert!(sink.emit(30, true).is_ok());
        assert!(sink.emit(30, false).is_err());
        assert_eq!(sink.events(), &[KeyEvent::press(30)]);
    }

    #[test]
    fn event_display() {
        assert_eq!(KeyEvent::press(32).to_string(), "↓D");
        assert_eq!(KeyEvent::release(42).to_string(), "↑LeftShift");
        assert_eq!(KeyEvent::release(0x300).to_string(), "↑0x300");
    }
}
