//! Contact tracking for a two-handed GKOS button set
//!
//! Each hand has seven buttons. A button carries the chord bits it sets:
//! the left hand uses bits 0-2, the right hand the same pattern shifted up
//! by three. A chord is produced on the first lift after a button was
//! touched, and is the OR of every button still held at that moment
//! (including the one being lifted). Two touches outside any button at the
//! same time request shutdown.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// Chord bits of the seven buttons of the left hand.
pub const LEFT_HAND_BITS: [u8; 7] = [4, 6, 2, 3, 1, 7, 5];

/// Bit offset of the right hand.
pub const RIGHT_HAND_SHIFT: u32 = 3;

/// Default 14-button set: left hand (buttons 0-6), then the mirrored right
/// hand (buttons 7-13).
pub fn default_buttons() -> Vec<u8> {
    LEFT_HAND_BITS
        .iter()
        .copied()
        .chain(LEFT_HAND_BITS.iter().map(|bits| bits << RIGHT_HAND_SHIFT))
        .collect()
}

/// Where a finger is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    /// A button, by index into the button set
    Button(usize),
    /// Outside every button, identified by touch id
    Outside(u32),
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Button(id) => write!(f, "{id}"),
            Contact::Outside(id) => write!(f, "x{id}"),
        }
    }
}

/// A touch or lift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Down(Contact),
    Up(Contact),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid contact '{0}' (expected +ID, -ID, +xID or -xID)")]
pub struct ParseContactError(pub String);

/// Parses `+3` (touch button 3), `-3` (lift it), `+x1`/`-x1` (touch id 1
/// outside any button).
impl FromStr for ContactEvent {
    type Err = ParseContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseContactError(s.to_string());
        let (down, rest) = match s.as_bytes().first() {
            Some(b'+') => (true, &s[1..]),
            Some(b'-') => (false, &s[1..]),
            _ => return Err(err()),
        };
        let contact = match rest.strip_prefix('x') {
            Some(id) => Contact::Outside(id.parse().map_err(|_| err())?),
            None => Contact::Button(rest.parse().map_err(|_| err())?),
        };
        Ok(if down {
            ContactEvent::Down(contact)
        } else {
            ContactEvent::Up(contact)
        })
    }
}

/// Contact sequencing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Button {button} does not exist ({count} buttons)")]
    NoSuchButton { button: usize, count: usize },
    #[error("Contact {0} is already down")]
    AlreadyDown(Contact),
    #[error("Contact {0} was not down")]
    NotDown(Contact),
}

/// Result of a lift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Nothing to dispatch
    Idle,
    /// Dispatch this chord index
    Chord(usize),
    /// Two or more touches outside the buttons
    Shutdown,
}

/// Tracks held contacts and turns lifts into chords
#[derive(Debug, Clone)]
pub struct ChordTracker {
    buttons: Vec<u8>,
    held: Vec<Contact>,
    /// A button was touched since the last chord
    active: bool,
}

impl Default for ChordTracker {
    fn default() -> Self {
        Self::new(default_buttons())
    }
}

impl ChordTracker {
    /// Tracker over a button set given as chord bits per button.
    pub fn new(buttons: Vec<u8>) -> Self {
        Self {
            buttons,
            held: Vec::new(),
            active: false,
        }
    }

    pub fn buttons(&self) -> &[u8] {
        &self.buttons
    }

    /// OR of the bits of every held button.
    pub fn held_bits(&self) -> u8 {
        self.held
            .iter()
            .filter_map(|c| match c {
                Contact::Button(b) => self.buttons.get(*b).copied(),
                Contact::Outside(_) => None,
            })
            .fold(0, |acc, bits| acc | bits)
    }

    pub fn handle(&mut self, event: ContactEvent) -> Result<TouchOutcome, TrackError> {
        match event {
            ContactEvent::Down(contact) => self.touch(contact).map(|()| TouchOutcome::Idle),
            ContactEvent::Up(contact) => self.lift(contact),
        }
    }

    /// Record a new touch.
    pub fn touch(&mut self, contact: Contact) -> Result<(), TrackError> {
        if let Contact::Button(button) = contact {
            if button >= self.buttons.len() {
                return Err(TrackError::NoSuchButton {
                    button,
                    count: self.buttons.len(),
                });
            }
        }
        if self.held.contains(&contact) {
            return Err(TrackError::AlreadyDown(contact));
        }
        if matches!(contact, Contact::Button(_)) {
            self.active = true;
        }
        trace!(%contact, "Touch");
        self.held.push(contact);
        Ok(())
    }

    /// Record the end of a touch.
    pub fn lift(&mut self, contact: Contact) -> Result<TouchOutcome, TrackError> {
        let position = self
            .held
            .iter()
            .position(|c| *c == contact)
            .ok_or(TrackError::NotDown(contact))?;

        let outside = self
            .held
            .iter()
            .filter(|c| matches!(c, Contact::Outside(_)))
            .count();
        if outside >= 2 {
            debug!(outside, "Shutdown gesture");
            return Ok(TouchOutcome::Shutdown);
        }

        let outcome = if self.active {
            self.active = false;
            let chord = self.held_bits();
            debug!(chord, "Chord");
            TouchOutcome::Chord(usize::from(chord))
        } else {
            TouchOutcome::Idle
        };
        self.held.remove(position);
        trace!(%contact, "Lift");
        Ok(outcome)
    }
}
