//! Keymap inspection command handlers.

use super::load_keymap;
use anyhow::{bail, Result};
use chorder::ChorderConfig;
use chorder_core::{ChordEntry, Keymap};
use std::path::Path;

fn source_label(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        "built-in English layout".to_string()
    }
}

fn map_label(config: &ChorderConfig, map: usize) -> &str {
    config.maps.get(map).map_or("?", |m| m.name.as_str())
}

/// Load, validate and summarise the keymap
pub fn check(path: &Path) -> Result<()> {
    let (config, keymap) = load_keymap(path)?;

    println!("Keymap: {}", source_label(path));
    println!("Device name: {}", config.device_name);
    println!(
        "{} maps x {} entries",
        keymap.maps(),
        keymap.entries_per_map()
    );
    for map in 0..keymap.maps() {
        let assigned = keymap
            .map(map)
            .map_or(0, |entries| entries.iter().filter(|e| **e != ChordEntry::None).count());
        println!("  {map}: {:<12} {assigned} assigned", map_label(&config, map));
    }
    println!("Emits {} distinct key codes", keymap.key_codes().len());

    let issues = keymap.validate();
    if issues.is_empty() {
        println!("No issues found");
        return Ok(());
    }
    println!("\n{} issue(s):", issues.len());
    for issue in &issues {
        println!("  [{}] {issue}", map_label(&config, issue.map));
    }
    bail!("Keymap has {} issue(s)", issues.len())
}

/// Resolve a `--map` argument given as a name or an index.
fn select_map(config: &ChorderConfig, keymap: &Keymap, selector: &str) -> Option<usize> {
    config
        .map_index(selector)
        .or_else(|| selector.parse().ok().filter(|&i| i < keymap.maps()))
}

/// Lines for one map: index, chord bits and entry, skipping unassigned slots.
fn map_lines(keymap: &Keymap, map: usize) -> Vec<String> {
    let width = usize::BITS - keymap.entries_per_map().saturating_sub(1).leading_zeros();
    let width = width.max(1) as usize;
    keymap
        .map(map)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, entry)| **entry != ChordEntry::None)
        .map(|(index, entry)| format!("{index:>4}  {index:0width$b}  {entry}"))
        .collect()
}

/// Print keymap entries, optionally for a single map
pub fn show(path: &Path, map: Option<&str>) -> Result<()> {
    let (config, keymap) = load_keymap(path)?;

    let maps: Vec<usize> = match map {
        Some(selector) => match select_map(&config, &keymap, selector) {
            Some(index) => vec![index],
            None => bail!("No map '{selector}' in {}", source_label(path)),
        },
        None => (0..keymap.maps()).collect(),
    };

    for (n, &index) in maps.iter().enumerate() {
        if n > 0 {
            println!();
        }
        println!("Map {index}: {}", map_label(&config, index));
        for line in map_lines(&keymap, index) {
            println!("{line}");
        }
    }
    Ok(())
}
