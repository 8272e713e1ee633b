//! # Bounded index set
//!
//! A subset of a fixed universe `[0, universe)` of indices with constant-time membership
//! operations. Used for the nonbasic free columns and the hyper-sparse pricing candidates.
use std::fmt;

/// Marker for "not a member" in the position array.
const NO_POSITION: usize = usize::MAX;

/// A set of indices from a bounded universe.
///
/// Backed by a compact member array and a parallel position array, so that `add`, `remove` and
/// `contains` are all constant time and iteration touches members only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexSet {
    /// For each universe element, its position in `entries`, or `NO_POSITION`.
    position: Vec<usize>,
    /// The members, in insertion order up to removals.
    entries: Vec<usize>,
}

impl IndexSet {
    /// Create an empty set over `[0, universe)`.
    ///
    /// # Arguments
    ///
    /// * `capacity`: Expected maximum number of members; determines the initial allocation only.
    /// * `universe`: One past the largest admissible index.
    pub fn setup(capacity: usize, universe: usize) -> Self {
        debug_assert!(capacity <= universe);

        Self {
            position: vec![NO_POSITION; universe],
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an index. No-op if it is already a member.
    pub fn add(&mut self, index: usize) {
        debug_assert!(index < self.position.len());

        if self.position[index] == NO_POSITION {
            self.position[index] = self.entries.len();
            self.entries.push(index);
        }
    }

    /// Remove an index.
    ///
    /// # Return value
    ///
    /// Whether the index was a member.
    pub fn remove(&mut self, index: usize) -> bool {
        debug_assert!(index < self.position.len());

        let position = self.position[index];
        if position == NO_POSITION {
            return false;
        }

        let last = self.entries[self.entries.len() - 1];
        self.entries.swap_remove(position);
        if last != index {
            self.position[last] = position;
        }
        self.position[index] = NO_POSITION;
        true
    }

    /// Whether an index is a member.
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < self.position.len());

        self.position[index] != NO_POSITION
    }

    /// The number of members.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// The members, in no particular order.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Remove all members.
    pub fn clear(&mut self) {
        for &index in &self.entries {
            self.position[index] = NO_POSITION;
        }
        self.entries.clear();
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (nr, index) in self.entries.iter().enumerate() {
            if nr > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}
