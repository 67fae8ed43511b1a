//! Keymap store: an immutable `maps × entries_per_map` table of chord entries.

use crate::entry::ChordEntry;
use crate::error::{ChorderError, Result};
use std::fmt;

/// Owned table of chord entries, row-major by map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    entries: Vec<ChordEntry>,
    maps: usize,
    entries_per_map: usize,
}

impl Keymap {
    /// Copy `table` into a new keymap.
    ///
    /// `table` is row-major: entry `e` of map `m` is at `m * entries_per_map + e`.
    pub fn build(table: &[ChordEntry], maps: usize, entries_per_map: usize) -> Result<Self> {
        let size = maps
            .checked_mul(entries_per_map)
            .ok_or_else(|| ChorderError::Config("keymap dimensions overflow".to_string()))?;
        if size == 0 {
            return Err(ChorderError::Config(format!(
                "keymap must have at least one entry ({maps} maps x {entries_per_map} entries)"
            )));
        }
        if table.len() != size {
            return Err(ChorderError::Config(format!(
                "table has {} entries, expected {maps} x {entries_per_map} = {size}",
                table.len()
            )));
        }

        let mut entries = Vec::new();
        entries.try_reserve_exact(size)?;
        entries.extend_from_slice(table);

        Ok(Self {
            entries,
            maps,
            entries_per_map,
        })
    }

    /// Build from one `Vec` per map. Every map must have the same length.
    pub fn from_maps(maps: Vec<Vec<ChordEntry>>) -> Result<Self> {
        let entries_per_map = maps.first().map_or(0, Vec::len);
        if let Some((i, bad)) = maps
            .iter()
            .enumerate()
            .find(|(_, m)| m.len() != entries_per_map)
        {
            return Err(ChorderError::Config(format!(
                "map {i} has {} entries, expected {entries_per_map}",
                bad.len()
            )));
        }
        let count = maps.len();
        let table: Vec<ChordEntry> = maps.into_iter().flatten().collect();
        Self::build(&table, count, entries_per_map)
    }

    /// Look up the entry at (`map`, `entry`).
    pub fn lookup(&self, map: usize, entry: usize) -> Result<&ChordEntry> {
        if map >= self.maps || entry >= self.entries_per_map {
            return Err(ChorderError::Index {
                map,
                entry,
                maps: self.maps,
                entries_per_map: self.entries_per_map,
            });
        }
        Ok(&self.entries[map * self.entries_per_map + entry])
    }

    pub fn maps(&self) -> usize {
        self.maps
    }

    pub fn entries_per_map(&self) -> usize {
        self.entries_per_map
    }

    /// Entries of one map, or `None` if out of range.
    pub fn map(&self, map: usize) -> Option<&[ChordEntry]> {
        (map < self.maps)
            .then(|| &self.entries[map * self.entries_per_map..(map + 1) * self.entries_per_map])
    }

    /// Every key code any entry can emit, sorted and deduplicated.
    pub fn key_codes(&self) -> Vec<crate::KeyCode> {
        let mut codes: Vec<_> = self.entries.iter().flat_map(ChordEntry::codes).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Report entries the interpreter will refuse at dispatch time.
    ///
    /// The interpreter never calls this; loaders run it before use.
    pub fn validate(&self) -> Vec<KeymapIssue> {
        let mut issues = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let map = i / self.entries_per_map;
            let index = i % self.entries_per_map;
            let mut report = |kind| issues.push(KeymapIssue { map, index, kind });

            match entry {
                ChordEntry::Map(target) | ChordEntry::MapLock(target) if *target >= self.maps => {
                    report(IssueKind::MapOutOfRange(*target));
                }
                ChordEntry::Macro(steps) => {
                    if steps.is_empty() {
                        report(IssueKind::EmptyMacro);
                    }
                    for (step_index, step) in steps.iter().enumerate() {
                        match step {
                            ChordEntry::Macro(_) => report(IssueKind::NestedMacro(step_index)),
                            ChordEntry::Map(_) | ChordEntry::MapLock(_) => {
                                report(IssueKind::MapInMacro(step_index))
                            }
                            ChordEntry::None => report(IssueKind::UnmappedInMacro(step_index)),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        issues
    }
}

/// A problem found by [`Keymap::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapIssue {
    pub map: usize,
    pub index: usize,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// `Map`/`MapLock` target does not exist
    MapOutOfRange(usize),
    /// Macro with no steps
    EmptyMacro,
    /// Macro step is itself a macro
    NestedMacro(usize),
    /// Macro step switches maps
    MapInMacro(usize),
    /// Macro step is `None`
    UnmappedInMacro(usize),
}

impl fmt::Display for KeymapIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map {} entry {}: ", self.map, self.index)?;
        match self.kind {
            IssueKind::MapOutOfRange(target) => write!(f, "map target {target} does not exist"),
            IssueKind::EmptyMacro => write!(f, "macro has no steps"),
            IssueKind::NestedMacro(step) => write!(f, "macro step {step} is a nested macro"),
            IssueKind::MapInMacro(step) => write!(f, "macro step {step} switches maps"),
            IssueKind::UnmappedInMacro(step) => write!(f, "macro step {step} is unmapped"),
        }
    }
}
