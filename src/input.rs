//! Line-oriented chord input for the `run` command
//!
//! In index mode each whitespace-separated token is an entry index
//! (`18`, `0x12`, `0b010010`). In contact mode each token is a touch or lift
//! (`+3`, `-3`, `+x1`) fed through a [`ChordTracker`]. Bad tokens are logged
//! and skipped.

use crate::chord::{ChordTracker, ContactEvent, TouchOutcome};
use tracing::warn;

/// What to do with a parsed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Dispatch this entry index
    Chord(usize),
    /// Stop reading and tear down
    Shutdown,
}

/// Parse an entry index in decimal, `0x` hex or `0b` binary.
pub fn parse_index(token: &str) -> Option<usize> {
    let lower = token.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        usize::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

/// Turns input lines into actions
#[derive(Debug, Clone, Default)]
pub enum ChordInput {
    /// Tokens are entry indices
    #[default]
    Indices,
    /// Tokens are contact events
    Contacts(ChordTracker),
}

impl ChordInput {
    pub fn contacts() -> Self {
        ChordInput::Contacts(ChordTracker::default())
    }

    /// Parse one line. Stops at the first `Shutdown`.
    pub fn feed_line(&mut self, line: &str) -> Vec<InputAction> {
        let mut actions = Vec::new();
        for token in line.split_whitespace() {
            let action = match self {
                ChordInput::Indices => match parse_index(token) {
                    Some(index) => Some(InputAction::Chord(index)),
                    None => {
                        warn!("Ignoring invalid chord '{}'", token);
                        None
                    }
                },
                ChordInput::Contacts(tracker) => contact_action(tracker, token),
            };
            if let Some(action) = action {
                actions.push(action);
                if action == InputAction::Shutdown {
                    break;
                }
            }
        }
        actions
    }
}

fn contact_action(tracker: &mut ChordTracker, token: &str) -> Option<InputAction> {
    let event = match token.parse::<ContactEvent>() {
        Ok(event) => event,
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };
    match tracker.handle(event) {
        Ok(TouchOutcome::Idle) => None,
        Ok(TouchOutcome::Chord(chord)) => Some(InputAction::Chord(chord)),
        Ok(TouchOutcome::Shutdown) => Some(InputAction::Shutdown),
        Err(e) => {
            warn!("Ignoring contact '{}': {}", token, e);
            None
        }
    }
}
