use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, StateId},
    math::{Bijection, OrderedMap, StateSet},
};

/// The result of applying the subset construction to an automaton. Besides the produced
/// deterministic automaton it remembers which set of original states each of its states
/// stands for.
#[derive(Clone, PartialEq, Eq)]
pub struct SubsetConstruction {
    dfa: Automaton,
    subsets: Bijection<StateId, StateSet>,
}

impl SubsetConstruction {
    /// The deterministic automaton.
    pub fn dfa(&self) -> &Automaton {
        &self.dfa
    }

    /// Consumes `self` and returns the deterministic automaton.
    pub fn into_dfa(self) -> Automaton {
        self.dfa
    }

    /// The set of original states that the state `id` of the deterministic automaton stands for.
    pub fn subset(&self, id: StateId) -> Option<&StateSet> {
        self.subsets.get_by_left(&id)
    }

    /// The state of the deterministic automaton that stands for `subset`, if that subset is
    /// reachable.
    pub fn id_of(&self, subset: &StateSet) -> Option<StateId> {
        self.subsets.get_by_right(subset).copied()
    }

    /// Iterates over pairs of deterministic state and the subset it stands for, ordered by the
    /// former.
    pub fn subsets(&self) -> impl Iterator<Item = (StateId, &StateSet)> + '_ {
        self.subsets.iter().map(|(&id, subset)| (id, subset))
    }
}

impl std::fmt::Debug for SubsetConstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subset construction")?;
        for (id, subset) in self.subsets() {
            writeln!(f, "{id} = {subset:?}")?;
        }
        write!(f, "{}", self.dfa.transition_table())
    }
}

impl Automaton {
    /// Returns a deterministic automaton that accepts the same language as `self`.
    ///
    /// Each state of the result stands for a set of states of `self`, state `0` for the set of
    /// initial states, which is also the only initial state of the result. Only subsets that
    /// are reachable are created, a subset is accepting if it contains an accepting state. If
    /// no state of a subset has a transition on some symbol, the result has no transition on
    /// it either.
    ///
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = Automaton::builder(2, 2)
    ///     .with_initial([0])
    ///     .with_accepting([1])
    ///     .with_transitions([(0, 0, 0), (0, 1, 0), (0, 1, 1)])
    ///     .build()
    ///     .unwrap();
    /// let dfa = nfa.determinize();
    /// assert!(dfa.is_deterministic());
    /// assert_eq!(dfa.size(), 2);
    /// assert!(dfa.accepts(&[0, 0, 1]));
    /// ```
    pub fn determinize(&self) -> Automaton {
        self.subset_construction().into_dfa()
    }

    /// Performs the subset construction and keeps track of the subset behind every produced
    /// state, see [`Self::determinize`].
    ///
    /// Subsets are numbered in the order of their discovery. The worklist is processed first in
    /// first out and symbols are tried in ascending order, so numbering only depends on `self`.
    pub fn subset_construction(&self) -> SubsetConstruction {
        let mut subsets: Bijection<StateId, StateSet> = Bijection::new();
        let mut accepting = StateSet::new();
        let mut transitions = OrderedMap::new();

        let start = self.initial_states().clone();
        if start.intersects(self.accepting_states()) {
            accepting.insert(0);
        }
        trace!("initial subset {start:?} gets id 0");
        subsets.insert(0, start);
        let mut queue = VecDeque::from([0]);

        while let Some(source) = queue.pop_front() {
            let current = subsets
                .get_by_left(&source)
                .expect("every queued state must have a subset")
                .clone();
            for symbol in self.symbols() {
                let image = self.image(&current, symbol);
                if image.is_empty() {
                    continue;
                }
                let target = match subsets.get_by_right(&image) {
                    Some(&id) => id,
                    None => {
                        let id = subsets.len();
                        if image.intersects(self.accepting_states()) {
                            accepting.insert(id);
                        }
                        trace!("discovered subset {image:?} with id {id}");
                        subsets.insert(id, image);
                        queue.push_back(id);
                        id
                    }
                };
                transitions.insert((source, symbol), StateSet::singleton(target));
            }
        }

        debug!(
            "subset construction turned {} states into {} states",
            self.size(),
            subsets.len()
        );

        let dfa = Automaton::new(
            subsets.len(),
            self.alphabet_size(),
            StateSet::singleton(0),
            accepting,
            transitions,
        )
        .expect("subset construction must yield a well-formed automaton");
        SubsetConstruction { dfa, subsets }
    }
}
