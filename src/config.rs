//! Keymap file
//!
//! The keymap is stored as TOML. Each `[[maps]]` table has a name, a
//! positional `entries` list (padded with `None` up to `entries_per_map`) and
//! an optional sparse `bind` table keyed by entry index:
//!
//! ```toml
//! device_name = "Chorder Virtual Keyboard"
//! entries_per_map = 64
//!
//! [[maps]]
//! name = "lowercase"
//! entries = ["None", "E", "T", "Macro(T, H, E)"]
//!
//! [maps.bind]
//! 18 = "Mod(LeftShift)"
//! 63 = "Map(numbers)"
//! ```
//!
//! Map targets may be written as an index or as a map name; names are
//! resolved case-insensitively when the keymap is built.

use crate::layout::{GkosLayout, LayoutError};
use chorder_core::{ChordEntry, ChorderError, Keymap, ParseEntryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading, saving or building a keymap file
#[derive(Debug, Error)]
pub enum KeymapFileError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid keymap file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize keymap: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Built-in layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Keymap has no maps")]
    NoMaps,

    #[error("Map name '{0}' is used more than once")]
    DuplicateMap(String),

    #[error("Map '{map}' has {count} entries, more than entries_per_map = {limit}")]
    TooManyEntries {
        map: String,
        count: usize,
        limit: usize,
    },

    #[error("Map '{map}': bind key '{key}' is not an entry index below {limit}")]
    BadBinding {
        map: String,
        key: String,
        limit: usize,
    },

    #[error("Map '{map}' entry {index}: {source}")]
    Entry {
        map: String,
        index: usize,
        #[source]
        source: ParseEntryError,
    },

    #[error(transparent)]
    Keymap(#[from] ChorderError),
}

/// One map of the keymap file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    /// Entries by position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
    /// Entries by index, applied after `entries`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bind: BTreeMap<String, String>,
}

/// Complete keymap file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChorderConfig {
    /// Name for the virtual keyboard device
    #[serde(default = "default_device_name")]
    pub device_name: String,
    #[serde(default = "default_entries_per_map")]
    pub entries_per_map: usize,
    #[serde(default)]
    pub maps: Vec<MapConfig>,
}

fn default_device_name() -> String {
    "Chorder Virtual Keyboard".to_string()
}

fn default_entries_per_map() -> usize {
    64
}

impl Default for ChorderConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            entries_per_map: default_entries_per_map(),
            maps: Vec::new(),
        }
    }
}

impl ChorderConfig {
    /// Get the default keymap file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chorder")
            .join("keymap.toml")
    }

    /// The keymap generated from the built-in English GKOS layout.
    pub fn builtin() -> Result<Self, KeymapFileError> {
        Ok(GkosLayout::english()?.to_config()?)
    }

    /// Load a keymap file, or the built-in keymap if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, KeymapFileError> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| KeymapFileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&content)
        } else {
            Self::builtin()
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, KeymapFileError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, KeymapFileError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the keymap file
    pub fn save(&self, path: &Path) -> Result<(), KeymapFileError> {
        let io_err = |source| KeymapFileError::Io {
            path: path.to_path_buf(),
            source,
        };
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(io_err)
    }

    /// Index of the map called `name`, ignoring case.
    pub fn map_index(&self, name: &str) -> Option<usize> {
        self.maps
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Parse every entry and build the keymap.
    pub fn to_keymap(&self) -> Result<Keymap, KeymapFileError> {
        if self.maps.is_empty() {
            return Err(KeymapFileError::NoMaps);
        }
        for (i, map) in self.maps.iter().enumerate() {
            if self.maps[..i]
                .iter()
                .any(|m| m.name.eq_ignore_ascii_case(&map.name))
            {
                return Err(KeymapFileError::DuplicateMap(map.name.clone()));
            }
        }

        let resolve = |name: &str| self.map_index(name);
        let limit = self.entries_per_map;
        let mut maps = Vec::with_capacity(self.maps.len());
        for map in &self.maps {
            if map.entries.len() > limit {
                return Err(KeymapFileError::TooManyEntries {
                    map: map.name.clone(),
                    count: map.entries.len(),
                    limit,
                });
            }
            let parse = |index: usize, text: &str| {
                ChordEntry::parse_with(text, &resolve).map_err(|source| KeymapFileError::Entry {
                    map: map.name.clone(),
                    index,
                    source,
                })
            };

            let mut entries = vec![ChordEntry::None; limit];
            for (index, text) in map.entries.iter().enumerate() {
                entries[index] = parse(index, text)?;
            }
            for (key, text) in &map.bind {
                let index = key
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|&i| i < limit)
                    .ok_or_else(|| KeymapFileError::BadBinding {
                        map: map.name.clone(),
                        key: key.clone(),
                        limit,
                    })?;
                entries[index] = parse(index, text)?;
            }
            maps.push(entries);
        }
        Ok(Keymap::from_maps(maps)?)
    }
}
