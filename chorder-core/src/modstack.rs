//! Ordered stack of held modifier codes
//!
//! The most recently pushed code is the front of the stack. Storage is a
//! `Vec` whose tail is the front, so push/pop are O(1) and `remove` scans
//! from the most recent entry backwards.

use crate::error::Result;
use crate::keys::KeyCode;

/// Held modifier codes, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierStack {
    codes: Vec<KeyCode>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a code to the front of the stack.
    ///
    /// Fails with [`ChorderError::Allocation`](crate::ChorderError::Allocation)
    /// when the stack cannot grow.
    pub fn push(&mut self, code: KeyCode) -> Result<()> {
        self.codes.try_reserve(1)?;
        self.codes.push(code);
        Ok(())
    }

    /// Remove and return the front code.
    pub fn pop(&mut self) -> Option<KeyCode> {
        self.codes.pop()
    }

    /// The front code, without removing it.
    pub fn front(&self) -> Option<KeyCode> {
        self.codes.last().copied()
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        self.codes.contains(&code)
    }

    /// Remove the most recent occurrence of `code`, keeping the order of the
    /// remaining codes. Returns whether a match was found.
    pub fn remove(&mut self, code: KeyCode) -> bool {
        match self.codes.iter().rposition(|&c| c == code) {
            Some(pos) => {
                self.codes.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate front to back (most recent first).
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.codes.iter().rev().copied()
    }

    /// Drop all codes and release the backing storage.
    pub fn clear(&mut self) {
        self.codes = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(codes: &[KeyCode]) -> ModifierStack {
        let mut s = ModifierStack::new();
        for &c in codes {
            s.push(c).unwrap();
        }
        s
    }

    #[test]
    fn pop_returns_most_recent_first() {
        let mut s = stack(&[1, 2, 3]);
        assert_eq!(s.pop(), Some(3));
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn front_peeks_without_removing() {
        let mut s = stack(&[1, 2]);
        assert_eq!(s.front(), Some(2));
        assert_eq!(s.len(), 2);
        s.pop();
        s.pop();
        assert_eq!(s.front(), None);
    }

    #[test]
    fn pop_on_empty_is_not_an_error() {
        let mut s = ModifierStack::new();
        assert_eq!(s.pop(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn remove_from_middle_keeps_order() {
        let mut s = stack(&[1, 2, 3, 4]);
        assert!(s.remove(2));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![4, 3, 1]);
        assert!(!s.remove(2));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn remove_takes_most_recent_duplicate() {
        let mut s = stack(&[7, 1, 7]);
        assert!(s.remove(7));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn contains_and_clear() {
        let mut s = stack(&[5, 6]);
        assert!(s.contains(5));
        assert!(!s.contains(9));
        s.clear();
        assert!(s.is_empty());
        assert!(!s.contains(5));
    }
}
