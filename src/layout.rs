//! GKOS layout generator
//!
//! A GKOS layout names the characters of three maps (`lowercase`, `numbers`,
//! `symbols`). Each map lists 34 `primary` strings and 8 `punctuation`
//! strings, which land on fixed chord positions. The remaining chords carry
//! the same editing and navigation keys on every map.
//!
//! # String syntax
//!
//! | Text      | Entry                                   |
//! |-----------|-----------------------------------------|
//! | `""`      | None                                    |
//! | `a`, `?`  | Key, shifted characters become `Macro(Mod(LeftShift), key)` |
//! | `_Name`   | Key by name (`_BackSpace`, `_space`)    |
//! | `+Name`   | Mod of the left-hand variant (`+Shift`) |
//! | `/NAME`   | Map switch to the named map             |
//! | `*Name`   | `Macro(Mod(LeftCtrl), Name)`            |
//! | `the`     | Macro typing each character             |

use crate::config::{ChorderConfig, MapConfig};
use chorder_core::keys::code;
use chorder_core::{char_to_key, key_code_from_name, ChordEntry, KeyCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of chords per map (6 buttons).
pub const CHORDS_PER_MAP: usize = 64;

/// Chord positions of the `primary` strings, most common first.
#[rustfmt::skip]
pub const PRIMARY_CHORDS: [usize; 34] = [
    1, 2, 4, 8, 16, 32,
    3, 6, 24, 48,
    5, 40,
    11, 19, 35,
    14, 22, 38,
    25, 26, 28,
    49, 50, 52,
    13, 29, 21, 53, 37,
    41, 43, 42, 46, 44,
];

/// Chord positions of the `punctuation` strings.
pub const PUNCTUATION_CHORDS: [usize; 8] = [17, 34, 12, 10, 20, 33, 30, 51];

/// Chords shared by every map.
pub const SPECIAL_CHORDS: [(usize, &str); 21] = [
    (7, "_BackSpace"),
    (9, "_Up"),
    (15, "*Left"),
    (18, "+Shift"),
    (23, "_Left"),
    (27, "_Prior"),
    (31, "_Escape"),
    (36, "_Down"),
    (39, "_Home"),
    (45, "/SYMBOLS"),
    (47, "+Control"),
    (54, "_Next"),
    (55, "+Alt"),
    (56, "_space"),
    (57, "*Right"),
    (58, "_Right"),
    (59, "_Return"),
    (60, "_End"),
    (61, "_Tab"),
    (62, "_Delete"),
    (63, "/NUMBERS"),
];

/// Map names in keymap order.
pub const MAP_NAMES: [&str; 3] = ["lowercase", "numbers", "symbols"];

const ENGLISH: &str = include_str!("../layouts/english.json");

/// Errors from reading or converting a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Map '{map}': {field} has {found} strings, expected {expected}")]
    Length {
        map: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Map '{map}': cannot type {text:?}")]
    UnknownKey { map: &'static str, text: String },

    #[error("Map '{map}': no map named '{target}'")]
    UnknownMap { map: &'static str, target: String },
}

/// Strings for one map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayout {
    pub primary: Vec<String>,
    pub punctuation: Vec<String>,
}

/// A complete three-map GKOS layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GkosLayout {
    pub lowercase: MapLayout,
    pub numbers: MapLayout,
    pub symbols: MapLayout,
}

impl GkosLayout {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The built-in English layout.
    pub fn english() -> Result<Self, LayoutError> {
        Self::from_json(ENGLISH)
    }

    fn maps(&self) -> [(&'static str, &MapLayout); 3] {
        [
            (MAP_NAMES[0], &self.lowercase),
            (MAP_NAMES[1], &self.numbers),
            (MAP_NAMES[2], &self.symbols),
        ]
    }

    /// Convert every map to [`CHORDS_PER_MAP`] entries, in [`MAP_NAMES`] order.
    pub fn to_maps(&self) -> Result<Vec<Vec<ChordEntry>>, LayoutError> {
        self.maps()
            .into_iter()
            .map(|(name, layout)| convert_map(name, layout))
            .collect()
    }

    /// Render as a keymap file.
    pub fn to_config(&self) -> Result<ChorderConfig, LayoutError> {
        let maps = self
            .to_maps()?
            .into_iter()
            .zip(MAP_NAMES)
            .map(|(entries, name)| MapConfig {
                name: name.to_string(),
                entries: entries.iter().map(ToString::to_string).collect(),
                ..Default::default()
            })
            .collect();
        Ok(ChorderConfig {
            entries_per_map: CHORDS_PER_MAP,
            maps,
            ..Default::default()
        })
    }
}

fn check_len(
    map: &'static str,
    field: &'static str,
    strings: &[String],
    expected: usize,
) -> Result<(), LayoutError> {
    if strings.len() != expected {
        return Err(LayoutError::Length {
            map,
            field,
            expected,
            found: strings.len(),
        });
    }
    Ok(())
}

fn convert_map(name: &'static str, layout: &MapLayout) -> Result<Vec<ChordEntry>, LayoutError> {
    check_len(name, "primary", &layout.primary, PRIMARY_CHORDS.len())?;
    check_len(name, "punctuation", &layout.punctuation, PUNCTUATION_CHORDS.len())?;

    let mut entries = vec![ChordEntry::None; CHORDS_PER_MAP];
    let positioned = PRIMARY_CHORDS
        .iter()
        .zip(layout.primary.iter().map(String::as_str))
        .chain(
            PUNCTUATION_CHORDS
                .iter()
                .zip(layout.punctuation.iter().map(String::as_str)),
        )
        .chain(SPECIAL_CHORDS.iter().map(|(chord, text)| (chord, *text)));
    for (&chord, text) in positioned {
        entries[chord] = convert(text).map_err(|e| e.in_map(name))?;
    }
    Ok(entries)
}

/// Conversion failure before the map name is known
#[derive(Debug, PartialEq, Eq)]
enum ConvertError {
    Key(String),
    Map(String),
}

impl ConvertError {
    fn in_map(self, map: &'static str) -> LayoutError {
        match self {
            ConvertError::Key(text) => LayoutError::UnknownKey { map, text },
            ConvertError::Map(target) => LayoutError::UnknownMap { map, target },
        }
    }
}

fn named_key(name: &str) -> Result<KeyCode, ConvertError> {
    key_code_from_name(name).ok_or_else(|| ConvertError::Key(name.to_string()))
}

/// Steps that type `ch`, with Shift held for shifted characters.
fn typed_char(ch: char) -> Result<Vec<ChordEntry>, ConvertError> {
    let (key, shift) = char_to_key(ch).ok_or_else(|| ConvertError::Key(ch.to_string()))?;
    Ok(if shift {
        vec![ChordEntry::Mod(code::LEFTSHIFT), ChordEntry::Key(key)]
    } else {
        vec![ChordEntry::Key(key)]
    })
}

fn convert(text: &str) -> Result<ChordEntry, ConvertError> {
    let mut chars = text.chars();
    let (Some(first), rest) = (chars.next(), chars.as_str()) else {
        return Ok(ChordEntry::None);
    };

    if rest.is_empty() {
        let mut steps = typed_char(first)?;
        return Ok(if steps.len() == 1 {
            steps.remove(0)
        } else {
            ChordEntry::Macro(steps)
        });
    }

    match first {
        '_' => named_key(rest).map(ChordEntry::Key),
        '+' => key_code_from_name(&format!("{rest}_L"))
            .or_else(|| key_code_from_name(rest))
            .map(ChordEntry::Mod)
            .ok_or_else(|| ConvertError::Key(text.to_string())),
        '/' => MAP_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(rest))
            .map(ChordEntry::Map)
            .ok_or_else(|| ConvertError::Map(rest.to_string())),
        '*' => Ok(ChordEntry::Macro(vec![
            ChordEntry::Mod(code::LEFTCTRL),
            ChordEntry::Key(named_key(rest)?),
        ])),
        _ => {
            let mut steps = Vec::new();
            for ch in text.chars() {
                steps.extend(typed_char(ch)?);
            }
            Ok(ChordEntry::Macro(steps))
        }
    }
}
