//! Chord-to-keystroke interpreter
//!
//! This crate turns chord indices into key press/release events: a layered
//! [`Keymap`] of [`ChordEntry`] actions, modifier stacks with transient and
//! locked modifiers, and one level of macro expansion. Where the chord index
//! comes from and where the key events go are up to the caller.

pub mod entry;
pub mod error;
pub mod interpreter;
pub mod keymap;
pub mod keys;
pub mod modstack;
pub mod sink;

pub use entry::{ChordEntry, ParseEntryError};
pub use error::{ChorderError, Result, SinkError};
pub use interpreter::Chorder;
pub use keymap::{IssueKind, Keymap, KeymapIssue};
pub use keys::{char_to_key, key_code_from_name, key_name, KeyCode};
pub use modstack::ModifierStack;
pub use sink::{KeyEvent, KeySink, RecordingSink};
