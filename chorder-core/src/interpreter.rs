//! Chord interpreter
//!
//! [`Chorder`] turns one entry index into zero or more key events. It keeps
//! two modifier scopes: the outer scope, shared across chords, and a macro
//! scope that only exists while a macro is being expanded. At the end of a
//! macro the macro scope is folded back into the outer scope.
//!
//! While a macro runs, a press or release of a macro-scoped modifier is not
//! emitted when the same code is already held in the outer scope: the key is
//! physically down already, only the bookkeeping changes.

use tracing::{debug, trace, warn};

use crate::entry::ChordEntry;
use crate::error::{ChorderError, Result};
use crate::keymap::Keymap;
use crate::keys::KeyCode;
use crate::modstack::ModifierStack;
use crate::sink::KeySink;

/// Chord interpreter over an owned keymap and sink
///
/// Dropping a `Chorder` releases every modifier it still holds.
pub struct Chorder<S: KeySink> {
    keymap: Keymap,
    state: State<S>,
}

/// Everything `dispatch` mutates, split from the keymap so entries can be
/// borrowed while dispatching.
struct State<S> {
    sink: S,
    maps: usize,
    pressed: ModifierStack,
    locked: ModifierStack,
    macro_pressed: ModifierStack,
    macro_locked: ModifierStack,
    current_map: usize,
    map_locked: bool,
}

impl<S: KeySink> Chorder<S> {
    /// Create an interpreter on map 0 with no modifiers held.
    pub fn new(keymap: Keymap, sink: S) -> Self {
        let maps = keymap.maps();
        Self {
            keymap,
            state: State {
                sink,
                maps,
                pressed: ModifierStack::new(),
                locked: ModifierStack::new(),
                macro_pressed: ModifierStack::new(),
                macro_locked: ModifierStack::new(),
                current_map: 0,
                map_locked: false,
            },
        }
    }

    /// Copy a row-major entry table and create an interpreter over it.
    pub fn from_table(
        table: &[ChordEntry],
        maps: usize,
        entries_per_map: usize,
        sink: S,
    ) -> Result<Self> {
        Ok(Self::new(Keymap::build(table, maps, entries_per_map)?, sink))
    }

    /// Dispatch the entry at `index` of the current map.
    ///
    /// Unless the entry switched maps or the map is locked, the current map
    /// returns to 0 afterwards, also when a non-fatal error is returned.
    /// Fatal errors ([`ChorderError::is_fatal`]) return immediately and leave
    /// any state changed so far in place.
    pub fn press(&mut self, index: usize) -> Result<()> {
        let map = self.state.current_map;
        let (result, switched) = match self.keymap.lookup(map, index) {
            Ok(entry) => {
                trace!(map, index, %entry, "Dispatching chord");
                (self.state.dispatch(entry, false), entry.is_map_switch())
            }
            Err(e) => (Err(e), false),
        };

        if let Err(e) = &result {
            if e.is_fatal() {
                return result;
            }
        }

        if !switched && !self.state.map_locked && self.state.current_map != 0 {
            debug!(from = self.state.current_map, "Returning to map 0");
            self.state.current_map = 0;
        }
        result
    }

    /// Release every held modifier and reset to map 0.
    ///
    /// Order is macro-pressed, macro-locked, pressed, locked. Every held
    /// code gets exactly one release even if the sink fails part way; the
    /// first sink error is returned.
    pub fn release_all(&mut self) -> Result<()> {
        let state = &mut self.state;
        let mut first_error = None;
        for stack in [
            &mut state.macro_pressed,
            &mut state.macro_locked,
            &mut state.pressed,
            &mut state.locked,
        ] {
            while let Some(code) = stack.pop() {
                if let Err(e) = emit(&mut state.sink, code, false) {
                    warn!(code, "Failed to release modifier: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
        state.current_map = 0;
        state.map_locked = false;
        first_error.map_or(Ok(()), Err)
    }

    /// Release all held modifiers and drop the interpreter.
    pub fn destroy(mut self) -> Result<()> {
        self.release_all()
    }

    pub fn current_map(&self) -> usize {
        self.state.current_map
    }

    pub fn is_map_locked(&self) -> bool {
        self.state.map_locked
    }

    /// Modifiers held until the next key, most recent first.
    pub fn pressed_modifiers(&self) -> Vec<KeyCode> {
        self.state.pressed.iter().collect()
    }

    /// Locked modifiers, most recent first.
    pub fn locked_modifiers(&self) -> Vec<KeyCode> {
        self.state.locked.iter().collect()
    }

    /// Number of codes held across all modifier stacks.
    pub fn held_count(&self) -> usize {
        let s = &self.state;
        s.pressed.len() + s.locked.len() + s.macro_pressed.len() + s.macro_locked.len()
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn sink(&self) -> &S {
        &self.state.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.state.sink
    }
}

impl<S: KeySink> Drop for Chorder<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release_all() {
            warn!("Modifiers not fully released on shutdown: {}", e);
        }
    }
}

fn emit<S: KeySink>(sink: &mut S, code: KeyCode, pressed: bool) -> Result<()> {
    trace!(code, pressed, "Emit");
    sink.emit(code, pressed).map_err(ChorderError::Emission)
}

impl<S: KeySink> State<S> {
    fn dispatch(&mut self, entry: &ChordEntry, in_macro: bool) -> Result<()> {
        match entry {
            ChordEntry::None => Err(ChorderError::Unmapped),
            ChordEntry::Key(code) => self.key(*code, in_macro),
            ChordEntry::Mod(code) => self.modifier(*code, in_macro, false),
            ChordEntry::ModLock(code) => self.modifier(*code, in_macro, true),
            ChordEntry::Map(_) if in_macro => Err(ChorderError::UnsupportedInMacro("Map")),
            ChordEntry::MapLock(_) if in_macro => Err(ChorderError::UnsupportedInMacro("MapLock")),
            ChordEntry::Map(index) => self.select_map(*index, false),
            ChordEntry::MapLock(index) => self.select_map(*index, true),
            ChordEntry::Macro(_) if in_macro => Err(ChorderError::NestedMacro),
            ChordEntry::Macro(steps) => self.run_macro(steps),
        }
    }

    /// True when `code` is held in the outer scope.
    fn held_outside(&self, code: KeyCode) -> bool {
        self.pressed.contains(code) || self.locked.contains(code)
    }

    /// Tap `code`, then release the modifiers that were waiting for a key.
    fn key(&mut self, code: KeyCode, in_macro: bool) -> Result<()> {
        emit(&mut self.sink, code, true)?;
        emit(&mut self.sink, code, false)?;

        // A code leaves its stack only once its release went out, so a
        // failed release is still held for teardown.
        if in_macro {
            while let Some(held) = self.macro_pressed.front() {
                if !self.held_outside(held) {
                    emit(&mut self.sink, held, false)?;
                }
                self.macro_pressed.pop();
            }
        }

        // Codes the current macro locked stay down.
        let releases: Vec<KeyCode> = self
            .pressed
            .iter()
            .filter(|&held| !self.macro_locked.contains(held))
            .collect();
        for held in releases {
            emit(&mut self.sink, held, false)?;
            self.pressed.remove(held);
        }
        Ok(())
    }

    /// `Mod` and `ModLock`: unlock and release if locked, promote to locked
    /// if pressed, otherwise press (onto the locked stack for `ModLock`).
    fn modifier(&mut self, code: KeyCode, in_macro: bool, lock: bool) -> Result<()> {
        let suppress = in_macro && self.held_outside(code);
        let (pressed, locked) = if in_macro {
            (&mut self.macro_pressed, &mut self.macro_locked)
        } else {
            (&mut self.pressed, &mut self.locked)
        };

        if locked.contains(code) {
            if !suppress {
                emit(&mut self.sink, code, false)?;
            }
            locked.remove(code);
            debug!(code, in_macro, "Modifier unlocked");
        } else if pressed.remove(code) {
            debug!(code, in_macro, "Modifier locked");
            locked.push(code)?;
        } else {
            if lock {
                locked.push(code)?;
            } else {
                pressed.push(code)?;
            }
            if !suppress {
                emit(&mut self.sink, code, true)?;
            }
        }
        Ok(())
    }

    fn select_map(&mut self, index: usize, lock: bool) -> Result<()> {
        if index >= self.maps {
            return Err(ChorderError::MapIndex {
                map: index,
                maps: self.maps,
            });
        }

        if lock {
            self.current_map = index;
            self.map_locked = true;
        } else if self.current_map == index {
            if self.map_locked {
                self.current_map = 0;
                self.map_locked = false;
            } else {
                self.map_locked = true;
            }
        } else {
            self.current_map = index;
            self.map_locked = false;
        }
        debug!(
            map = self.current_map,
            locked = self.map_locked,
            "Map selected"
        );
        Ok(())
    }

    /// Run each step in the macro scope, stopping at the first error, then
    /// fold the macro scope into the outer scope.
    fn run_macro(&mut self, steps: &[ChordEntry]) -> Result<()> {
        let mut result = Ok(());
        for step in steps {
            if let Err(e) = self.dispatch(step, true) {
                debug!(%step, "Macro aborted: {}", e);
                result = Err(e);
                break;
            }
        }
        let merged = self.merge_macro_scope();
        result.and(merged)
    }

    /// Move what the macro left held into the outer stacks.
    ///
    /// Codes already held outside were never pressed by the macro and are
    /// dropped; a macro lock of an outer-pressed code promotes it to locked.
    /// Relative press order between the scopes is not kept.
    fn merge_macro_scope(&mut self) -> Result<()> {
        while let Some(code) = self.macro_pressed.pop() {
            if !self.held_outside(code) {
                self.pressed.push(code)?;
            }
        }
        while let Some(code) = self.macro_locked.pop() {
            self.pressed.remove(code);
            if !self.locked.contains(code) {
                self.locked.push(code)?;
            }
        }
        Ok(())
    }
}
