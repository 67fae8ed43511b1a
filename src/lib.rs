// Chorder - GKOS chorded keyboard
// Keymap files, layout generation, contact tracking and key output

pub mod chord;
pub mod config;
pub mod input;
pub mod keyboard;
pub mod layout;

pub use chord::{ChordTracker, Contact, ContactEvent, TouchOutcome};
pub use config::{ChorderConfig, KeymapFileError, MapConfig};
pub use input::{ChordInput, InputAction};
pub use keyboard::{KeyboardError, PrintSink, VirtualKeyboard};
pub use layout::{GkosLayout, LayoutError};
