//! Interpreter error types

use std::collections::TryReserveError;
use thiserror::Error;

/// Error reported by an emission sink.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from building a keymap or dispatching a chord
#[derive(Error, Debug)]
pub enum ChorderError {
    /// Storage for the keymap or a modifier stack could not be reserved
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Invalid construction parameters
    #[error("Invalid keymap configuration: {0}")]
    Config(String),

    /// Lookup outside the declared keymap bounds
    #[error("Entry ({map}, {entry}) out of range for {maps} maps x {entries_per_map} entries")]
    Index {
        map: usize,
        entry: usize,
        maps: usize,
        entries_per_map: usize,
    },

    /// `Map`/`MapLock` target outside the keymap
    #[error("Map {map} out of range for {maps} maps")]
    MapIndex { map: usize, maps: usize },

    /// The chord resolved to an unassigned entry
    #[error("No action mapped")]
    Unmapped,

    /// A macro tried to expand another macro
    #[error("Macros cannot be nested")]
    NestedMacro,

    /// A map switch appeared inside a macro
    #[error("{0} is not allowed inside a macro")]
    UnsupportedInMacro(&'static str),

    /// The sink rejected a key event
    #[error("Failed to emit key event: {0}")]
    Emission(#[source] SinkError),
}

impl ChorderError {
    /// Fatal errors abort the current press without running the default-map
    /// reset. Everything else is reported after the reset.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChorderError::Allocation(_) | ChorderError::Emission(_))
    }
}

/// Result alias for interpreter operations
pub type Result<T> = std::result::Result<T, ChorderError>;
