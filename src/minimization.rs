use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, AutomatonError, StateId},
    math::{OrderedMap, Partition, StateSet},
};

/// Repeatedly splits the blocks of `partition` until a full pass leaves every block intact.
///
/// In each pass, every block that exists when the pass starts is examined once: its first
/// member serves as representative and all members whose signature differs from that of the
/// representative are moved into a single new block. Blocks created during a pass are first
/// examined in the next pass.
fn refine<S, F>(mut partition: Partition, signature: F) -> Partition
where
    S: Eq + std::fmt::Debug,
    F: Fn(&Partition, StateId) -> S,
{
    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;
        for block in 0..partition.size() {
            let members = partition.block(block);
            let reference = signature(&partition, members[0]);
            let (same, different): (Vec<StateId>, Vec<StateId>) = members
                .iter()
                .partition(|&&q| signature(&partition, q) == reference);
            if !different.is_empty() {
                trace!(
                    "splitting [{}] off block {block} with signature {reference:?}",
                    different.iter().join(", ")
                );
                partition.split(block, same, different);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    debug!(
        "partition refinement stabilized after {passes} passes with {} blocks",
        partition.size()
    );
    partition
}

impl Automaton {
    /// Reduces `self` by merging states through partition refinement, see [`Self::partition`].
    /// The result accepts the same language as `self` and is deterministic. Fails if `self` is
    /// not deterministic.
    ///
    /// States are only merged if they agree on acceptance and have transitions to *the very
    /// same* states, so the result is not necessarily the minimal deterministic automaton and
    /// applying `minimize` to it again may reduce it further. Use
    /// [`Self::minimize_canonical`] to obtain the minimal number of states.
    pub fn minimize(&self) -> Result<Automaton, AutomatonError> {
        let partition = self.partition()?;
        Ok(self.quotient(&partition))
    }

    /// Computes the partition that [`Self::minimize`] uses for merging states. It starts with
    /// the block of accepting states followed by the block of rejecting states (omitting
    /// either if empty) and splits blocks until all members of a block have identical vectors
    /// of successor states, where a missing transition counts as a successor of its own.
    pub fn partition(&self) -> Result<Partition, AutomatonError> {
        self.check_deterministic()?;
        let table = self.successor_table();
        Ok(refine(self.acceptance_partition(), |_, q| &table[q]))
    }

    /// Like [`Self::minimize`], but compares the *blocks* that the successors of states belong
    /// to instead of the successors themselves. This is Moore's algorithm, it produces an
    /// automaton in which no two states accept the same language.
    pub fn minimize_canonical(&self) -> Result<Automaton, AutomatonError> {
        let partition = self.canonical_partition()?;
        Ok(self.quotient(&partition))
    }

    /// Computes the partition that [`Self::minimize_canonical`] uses for merging states.
    pub fn canonical_partition(&self) -> Result<Partition, AutomatonError> {
        self.check_deterministic()?;
        let table = self.successor_table();
        Ok(refine(self.acceptance_partition(), |partition, q| {
            table[q]
                .iter()
                .map(|successor| successor.map(|p| partition.block_of(p)))
                .collect::<Vec<_>>()
        }))
    }

    fn acceptance_partition(&self) -> Partition {
        let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
            self.state_indices().partition(|&q| self.is_accepting(q));
        Partition::new(self.size(), [accepting, rejecting])
    }

    /// For each state, the successor on every symbol or `None` if there is no transition.
    fn successor_table(&self) -> Vec<Vec<Option<StateId>>> {
        self.state_indices()
            .map(|q| self.symbols().map(|a| self.successor(q, a)).collect())
            .collect()
    }

    /// Builds the automaton whose states are the blocks of `partition`. Requires `self` to be
    /// deterministic and all members of a block to have transitions into the same blocks.
    fn quotient(&self, partition: &Partition) -> Automaton {
        let initial: StateSet = self
            .initial_states()
            .iter()
            .map(|q| partition.block_of(q))
            .collect();
        let accepting: StateSet = self
            .accepting_states()
            .iter()
            .map(|q| partition.block_of(q))
            .collect();

        let mut transitions = OrderedMap::new();
        for (q, symbol, targets) in self.transitions() {
            let target = targets
                .single()
                .expect("quotient is only formed for deterministic automata");
            let previous = transitions.insert(
                (partition.block_of(q), symbol),
                StateSet::singleton(partition.block_of(target)),
            );
            debug_assert!(previous
                .map(|p| p == StateSet::singleton(partition.block_of(target)))
                .unwrap_or(true));
        }

        debug!(
            "merged {} states into {} classes",
            self.size(),
            partition.size()
        );
        Automaton::new(
            partition.size(),
            self.alphabet_size(),
            initial,
            accepting,
            transitions,
        )
        .expect("quotient of a well-formed automaton must be well-formed")
    }
}
