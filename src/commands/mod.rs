//! Command handlers for the CLI application.
//!
//! - `run`: the chord loop (stdin → interpreter → virtual keyboard)
//! - `keymap`: keymap inspection (check, show)
//! - `layout`: keymap generation from GKOS layout files
//! - `symname`: offline key-name lookup

pub mod keymap;
pub mod layout;
pub mod run;
pub mod symname;

use anyhow::{Context, Result};
use chorder::ChorderConfig;
use chorder_core::Keymap;
use std::path::Path;

/// Load the keymap file (or the built-in keymap when it is absent) and build it.
pub fn load_keymap(path: &Path) -> Result<(ChorderConfig, Keymap)> {
    let config = ChorderConfig::load(path)
        .with_context(|| format!("Failed to load keymap {}", path.display()))?;
    let keymap = config
        .to_keymap()
        .with_context(|| format!("Invalid keymap {}", path.display()))?;
    Ok((config, keymap))
}
