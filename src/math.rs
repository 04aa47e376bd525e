use std::collections::BTreeMap;

use bit_set::BitSet;
use itertools::Itertools;

use crate::automaton::StateId;

/// Type alias for maps that iterate in the order of their keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A set of state indices. Equality, ordering and hashing only depend on the elements that are
/// contained, never on the order in which they were inserted, so a `StateSet` can be used as a
/// key in maps.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(BitSet);

impl StateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set that contains only `q`.
    pub fn singleton(q: StateId) -> Self {
        Self::from_iter([q])
    }

    /// Inserts `q`, returns `true` if it was not present before.
    pub fn insert(&mut self, q: StateId) -> bool {
        self.0.insert(q)
    }

    /// Returns true if `q` is an element of `self`.
    pub fn contains(&self, q: StateId) -> bool {
        self.0.contains(q)
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if and only if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter()
    }

    /// Returns the only element if `self` is a singleton, otherwise `None`.
    pub fn single(&self) -> Option<StateId> {
        let mut it = self.iter();
        match (it.next(), it.next()) {
            (Some(q), None) => Some(q),
            _ => None,
        }
    }

    /// Adds all elements of `other` to `self`.
    pub fn union_with(&mut self, other: &StateSet) {
        self.0.union_with(&other.0)
    }

    /// Returns true if `self` and `other` have at least one element in common.
    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        Self(BitSet::from_iter(iter))
    }
}

impl Extend<StateId> for StateSet {
    fn extend<T: IntoIterator<Item = StateId>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = bit_set::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "{{{}}}", self.iter().join(", "))
        }
    }
}

/// A partition of the states `0..n` into nonempty blocks. Blocks live in an arena and are
/// addressed by their position in it, next to the arena an array maps each state to the
/// block it currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    blocks: Vec<Vec<StateId>>,
    block_of: Vec<usize>,
}

impl Partition {
    /// Builds a partition of `0..size` from the given blocks. Empty blocks are skipped, so block
    /// indices are assigned in the order of the nonempty blocks.
    ///
    /// Panics if a state is not covered by any block or lies outside `0..size`.
    pub fn new<X, Y>(size: usize, blocks: Y) -> Self
    where
        X: IntoIterator<Item = StateId>,
        Y: IntoIterator<Item = X>,
    {
        let mut block_of = vec![usize::MAX; size];
        let mut arena = Vec::new();
        for block in blocks {
            let block: Vec<StateId> = block.into_iter().collect();
            if block.is_empty() {
                continue;
            }
            for &q in &block {
                block_of[q] = arena.len();
            }
            arena.push(block);
        }
        assert!(
            block_of.iter().all(|&b| b != usize::MAX),
            "every state must belong to some block"
        );
        Self {
            blocks: arena,
            block_of,
        }
    }

    /// Returns the number of blocks.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// The members of block `block`, in the order in which they were placed there.
    pub fn block(&self, block: usize) -> &[StateId] {
        &self.blocks[block]
    }

    /// The index of the block that contains `q`.
    pub fn block_of(&self, q: StateId) -> usize {
        self.block_of[q]
    }

    /// Iterates over all blocks in the order of their indices.
    pub fn iter(&self) -> impl Iterator<Item = &[StateId]> + '_ {
        self.blocks.iter().map(|b| b.as_slice())
    }

    /// Returns true if `p` and `q` lie in the same block.
    pub fn same_block(&self, p: StateId, q: StateId) -> bool {
        self.block_of(p) == self.block_of(q)
    }

    /// Replaces the members of `block` by `keep` and appends `split_off` as a new block whose
    /// index is returned. `keep` and `split_off` must both be nonempty and together contain
    /// precisely the previous members of `block`.
    pub fn split(&mut self, block: usize, keep: Vec<StateId>, split_off: Vec<StateId>) -> usize {
        debug_assert!(!keep.is_empty() && !split_off.is_empty());
        debug_assert_eq!(keep.len() + split_off.len(), self.blocks[block].len());
        let new = self.blocks.len();
        for &q in &split_off {
            self.block_of[q] = new;
        }
        self.blocks[block] = keep;
        self.blocks.push(split_off);
        new
    }
}
