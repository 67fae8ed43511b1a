//! Chord entries and their text syntax.
//!
//! [`ChordEntry`] is the action assigned to one (map, index) slot.
//!
//! # Parsing syntax
//!
//! ```text
//! None, ""            → None
//! A, Enter, 0x1e      → Key
//! Key(A)              → Key
//! Mod(LeftShift)      → Mod
//! ModLock(CapsLock)   → ModLock
//! Map(1)              → Map        (names via ChordEntry::parse_with)
//! MapLock(2)          → MapLock
//! Macro(T, H, E)      → Macro      (steps may themselves use call syntax)
//! ```

use crate::keys::{self, KeyCode};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Action assigned to a chord
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChordEntry {
    /// Unassigned
    #[default]
    None,
    /// Press and release a key
    Key(KeyCode),
    /// Hold a modifier until the next key; pressing again while held locks it
    Mod(KeyCode),
    /// Lock a modifier until the same entry is pressed again
    ModLock(KeyCode),
    /// Select the map used for the next chord
    Map(usize),
    /// Select the map used until the lock is released
    MapLock(usize),
    /// Execute a sequence of entries
    Macro(Vec<ChordEntry>),
}

impl ChordEntry {
    /// Short type name, as used in the text syntax.
    pub fn kind(&self) -> &'static str {
        match self {
            ChordEntry::None => "None",
            ChordEntry::Key(_) => "Key",
            ChordEntry::Mod(_) => "Mod",
            ChordEntry::ModLock(_) => "ModLock",
            ChordEntry::Map(_) => "Map",
            ChordEntry::MapLock(_) => "MapLock",
            ChordEntry::Macro(_) => "Macro",
        }
    }

    /// True for `Map` and `MapLock`.
    pub fn is_map_switch(&self) -> bool {
        matches!(self, ChordEntry::Map(_) | ChordEntry::MapLock(_))
    }

    /// Every key code this entry can emit, including macro steps.
    pub fn codes(&self) -> Vec<KeyCode> {
        match self {
            ChordEntry::Key(code) | ChordEntry::Mod(code) | ChordEntry::ModLock(code) => {
                vec![*code]
            }
            ChordEntry::Macro(steps) => steps.iter().flat_map(ChordEntry::codes).collect(),
            _ => Vec::new(),
        }
    }

    /// Parse an entry, resolving non-numeric `Map`/`MapLock` targets with
    /// `resolve_map`.
    pub fn parse_with<F>(s: &str, resolve_map: &F) -> Result<Self, ParseEntryError>
    where
        F: Fn(&str) -> Option<usize>,
    {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(ChordEntry::None);
        }

        let Some((head, inner)) = split_call(s)? else {
            return parse_code(s).map(ChordEntry::Key);
        };

        match head.to_ascii_lowercase().as_str() {
            "key" => parse_code(inner).map(ChordEntry::Key),
            "mod" => parse_code(inner).map(ChordEntry::Mod),
            "modlock" => parse_code(inner).map(ChordEntry::ModLock),
            "map" => parse_map(inner, resolve_map).map(ChordEntry::Map),
            "maplock" => parse_map(inner, resolve_map).map(ChordEntry::MapLock),
            "macro" => {
                let mut steps = Vec::new();
                for arg in split_args(inner)? {
                    if arg.is_empty() {
                        return Err(ParseEntryError::EmptyMacroStep(s.to_string()));
                    }
                    steps.push(Self::parse_with(arg, resolve_map)?);
                }
                Ok(ChordEntry::Macro(steps))
            }
            _ => Err(ParseEntryError::UnknownAction(head.to_string())),
        }
    }
}

/// Split `Head(inner)` into its parts. Returns `None` for plain key names.
fn split_call(s: &str) -> Result<Option<(&str, &str)>, ParseEntryError> {
    let Some(open) = s.find('(') else {
        return Ok(None);
    };
    let head = s[..open].trim();
    if head.is_empty() || !head.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(None);
    }
    let inner = s[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| ParseEntryError::Unbalanced(s.to_string()))?;
    Ok(Some((head, inner.trim())))
}

/// Split macro arguments on top-level commas.
fn split_args(inner: &str) -> Result<Vec<&str>, ParseEntryError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseEntryError::Unbalanced(inner.to_string()))?;
            }
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseEntryError::Unbalanced(inner.to_string()));
    }
    args.push(inner[start..].trim());
    Ok(args)
}

fn parse_code(s: &str) -> Result<KeyCode, ParseEntryError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return KeyCode::from_str_radix(hex, 16)
            .map_err(|_| ParseEntryError::InvalidCode(s.to_string()));
    }
    keys::key_code_from_name(s).ok_or_else(|| ParseEntryError::UnknownKey(s.to_string()))
}

fn parse_map<F>(s: &str, resolve_map: &F) -> Result<usize, ParseEntryError>
where
    F: Fn(&str) -> Option<usize>,
{
    let s = s.trim();
    if let Ok(index) = s.parse::<usize>() {
        return Ok(index);
    }
    resolve_map(s).ok_or_else(|| ParseEntryError::UnknownMap(s.to_string()))
}

impl FromStr for ChordEntry {
    type Err = ParseEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &|_: &str| None)
    }
}

struct CodeName(KeyCode);

impl fmt::Display for CodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match keys::key_name(self.0) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:02x}", self.0),
        }
    }
}

impl fmt::Display for ChordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordEntry::None => write!(f, "None"),
            ChordEntry::Key(code) => write!(f, "{}", CodeName(*code)),
            ChordEntry::Mod(code) => write!(f, "Mod({})", CodeName(*code)),
            ChordEntry::ModLock(code) => write!(f, "ModLock({})", CodeName(*code)),
            ChordEntry::Map(index) => write!(f, "Map({index})"),
            ChordEntry::MapLock(index) => write!(f, "MapLock({index})"),
            ChordEntry::Macro(steps) => {
                write!(f, "Macro(")?;
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{step}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Error type for parsing a [`ChordEntry`] from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseEntryError {
    #[error("unknown key: \"{0}\"")]
    UnknownKey(String),
    #[error("invalid key code: \"{0}\"")]
    InvalidCode(String),
    #[error("unknown action: \"{0}\"")]
    UnknownAction(String),
    #[error("unknown map: \"{0}\"")]
    UnknownMap(String),
    #[error("unbalanced parentheses in \"{0}\"")]
    Unbalanced(String),
    #[error("empty step in \"{0}\"")]
    EmptyMacroStep(String),
}
