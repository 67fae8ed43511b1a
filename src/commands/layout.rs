//! Keymap generation command handler.

use anyhow::{Context, Result};
use chorder::GkosLayout;
use std::path::Path;

/// Convert a GKOS layout file to a keymap file, written to `output` or stdout.
pub fn generate(file: &Path, output: Option<&Path>) -> Result<()> {
    let layout = GkosLayout::load(file)?;
    let config = layout
        .to_config()
        .with_context(|| format!("Failed to convert {}", file.display()))?;

    match output {
        Some(path) => {
            config.save(path)?;
            println!("Wrote keymap ({} maps) to {}", config.maps.len(), path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
