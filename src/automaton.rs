use thiserror::Error;
use tracing::trace;

use crate::math::{OrderedMap, StateSet};

/// The type used for indexing states. Valid indices of an automaton with `n` states are `0..n`.
pub type StateId = usize;
/// The type of alphabet symbols. Valid symbols of an alphabet with `k` symbols are `0..k`.
pub type Symbol = usize;

/// Abstracts the ways in which an automaton can be malformed, or fail to satisfy the
/// precondition of an operation.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// An automaton must have at least one state.
    #[error("automaton must have at least one state")]
    NoStates,
    /// An automaton must have at least one symbol.
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// At least one state must be initial.
    #[error("automaton has no initial state")]
    NoInitialStates,
    /// A state index is referenced that does not exist.
    #[error("state {state} is out of range, automaton has {size} states")]
    StateOutOfRange {
        /// The offending index.
        state: StateId,
        /// The number of states of the automaton.
        size: usize,
    },
    /// A symbol is referenced that is not part of the alphabet.
    #[error("symbol {symbol} is out of range, alphabet has {size} symbols")]
    SymbolOutOfRange {
        /// The offending symbol.
        symbol: Symbol,
        /// The size of the alphabet.
        size: usize,
    },
    /// An operation that requires a deterministic automaton encountered a transition with more
    /// than one target.
    #[error("automaton is not deterministic, state {state} has targets {targets:?} on symbol {symbol}")]
    NotDeterministic {
        /// The source of the transition.
        state: StateId,
        /// The symbol of the transition.
        symbol: Symbol,
        /// All targets of the transition.
        targets: Vec<StateId>,
    },
}

/// A finite automaton. The transition relation maps pairs of state and symbol to nonempty sets
/// of states, a pair without an entry has no outgoing transition. An `Automaton` is validated
/// upon construction and cannot be modified afterwards, all operations on it produce a new
/// automaton.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    size: usize,
    alphabet_size: usize,
    initial: StateSet,
    accepting: StateSet,
    transitions: OrderedMap<(StateId, Symbol), StateSet>,
}

impl Automaton {
    /// Creates a new automaton from its parts and checks that all of them are in range. Entries
    /// of `transitions` with an empty target set are dropped.
    pub fn new(
        size: usize,
        alphabet_size: usize,
        initial: StateSet,
        accepting: StateSet,
        transitions: OrderedMap<(StateId, Symbol), StateSet>,
    ) -> Result<Self, AutomatonError> {
        let aut = Self {
            size,
            alphabet_size,
            initial,
            accepting,
            transitions: transitions
                .into_iter()
                .filter(|(_, targets)| !targets.is_empty())
                .collect(),
        };
        aut.validate()?;
        trace!(
            "constructed automaton with {} states, {} symbols and {} transitions",
            aut.size,
            aut.alphabet_size,
            aut.transitions.len()
        );
        Ok(aut)
    }

    /// Returns a builder for an automaton with `size` states over an alphabet of
    /// `alphabet_size` symbols.
    ///
    /// # Example
    ///
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let aut = Automaton::builder(2, 2)
    ///     .with_initial([0])
    ///     .with_accepting([1])
    ///     .with_transitions([(0, 1, 1), (1, 0, 0)])
    ///     .build()
    ///     .unwrap();
    /// assert!(aut.accepts(&[1, 0, 1]));
    /// assert!(!aut.accepts(&[1, 1]));
    /// ```
    pub fn builder(size: usize, alphabet_size: usize) -> AutomatonBuilder {
        AutomatonBuilder::new(size, alphabet_size)
    }

    fn validate(&self) -> Result<(), AutomatonError> {
        if self.size == 0 {
            return Err(AutomatonError::NoStates);
        }
        if self.alphabet_size == 0 {
            return Err(AutomatonError::EmptyAlphabet);
        }
        if self.initial.is_empty() {
            return Err(AutomatonError::NoInitialStates);
        }
        let check_state = |state: StateId| {
            if state < self.size {
                Ok(())
            } else {
                Err(AutomatonError::StateOutOfRange {
                    state,
                    size: self.size,
                })
            }
        };
        for q in self.initial.iter().chain(self.accepting.iter()) {
            check_state(q)?;
        }
        for (&(q, a), targets) in &self.transitions {
            check_state(q)?;
            if a >= self.alphabet_size {
                return Err(AutomatonError::SymbolOutOfRange {
                    symbol: a,
                    size: self.alphabet_size,
                });
            }
            for p in targets {
                check_state(p)?;
            }
        }
        Ok(())
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of symbols in the alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Iterates over all symbols of the alphabet in ascending order.
    pub fn symbols(&self) -> std::ops::Range<Symbol> {
        0..self.alphabet_size
    }

    /// Iterates over all state indices in ascending order.
    pub fn state_indices(&self) -> std::ops::Range<StateId> {
        0..self.size
    }

    /// The set of initial states.
    pub fn initial_states(&self) -> &StateSet {
        &self.initial
    }

    /// The set of accepting states.
    pub fn accepting_states(&self) -> &StateSet {
        &self.accepting
    }

    /// Returns true if `q` is accepting.
    pub fn is_accepting(&self, q: StateId) -> bool {
        self.accepting.contains(q)
    }

    /// The targets of all transitions from `q` on `symbol`. Returns `None` if there are none.
    pub fn successors(&self, q: StateId, symbol: Symbol) -> Option<&StateSet> {
        self.transitions.get(&(q, symbol))
    }

    /// The target of the transition from `q` on `symbol`, provided there is precisely one.
    pub fn successor(&self, q: StateId, symbol: Symbol) -> Option<StateId> {
        self.successors(q, symbol).and_then(StateSet::single)
    }

    /// Iterates over all transitions, ordered by source state and then by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, &StateSet)> + '_ {
        self.transitions
            .iter()
            .map(|(&(q, a), targets)| (q, a, targets))
    }

    /// The number of (state, symbol) pairs that have at least one target.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if every (state, symbol) pair has at most one target.
    pub fn is_deterministic(&self) -> bool {
        self.check_deterministic().is_ok()
    }

    /// Like [`Self::is_deterministic`], but reports the first transition that has more than
    /// one target.
    pub fn check_deterministic(&self) -> Result<(), AutomatonError> {
        match self.transitions().find(|(_, _, targets)| targets.len() != 1) {
            None => Ok(()),
            Some((state, symbol, targets)) => Err(AutomatonError::NotDeterministic {
                state,
                symbol,
                targets: targets.iter().collect(),
            }),
        }
    }

    /// Returns a string representation of the transition table. Initial states are marked with
    /// `→`, accepting states with `*`.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.symbols().map(|a| a.to_string())),
        );
        for q in self.state_indices() {
            let mut row = vec![format!(
                "{}{}{}",
                if self.initial.contains(q) { "→" } else { "" },
                q,
                if self.is_accepting(q) { "*" } else { "" }
            )];
            for a in self.symbols() {
                row.push(match self.successors(q, a) {
                    None => "-".to_string(),
                    Some(targets) => match targets.single() {
                        Some(p) => p.to_string(),
                        None => format!("{targets:?}"),
                    },
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Automaton with initial states {:?}\n{}",
            self.initial,
            self.transition_table()
        )
    }
}

/// Helper struct for the construction of automata. Transitions that are added for the same
/// pair of state and symbol are collected into a single set of targets.
///
/// # Example
///
/// We want to create an automaton with two states over the alphabet `{0, 1}` which reads
/// `0` or `1` and nondeterministically guesses whether it has read the last symbol.
/// ```
/// use finite_automata::prelude::*;
///
/// let nfa = Automaton::builder(2, 2)
///     .with_initial([0])
///     .with_accepting([1])
///     .with_transitions([(0, 0, 0), (0, 1, 0), (0, 0, 1), (0, 1, 1)])
///     .build()
///     .unwrap();
/// assert_eq!(nfa.successors(0, 1), Some(&StateSet::from_iter([0, 1])));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    size: usize,
    alphabet_size: usize,
    initial: StateSet,
    accepting: StateSet,
    transitions: OrderedMap<(StateId, Symbol), StateSet>,
}

impl AutomatonBuilder {
    /// Creates a builder without initial states, accepting states or transitions.
    pub fn new(size: usize, alphabet_size: usize) -> Self {
        Self {
            size,
            alphabet_size,
            initial: StateSet::new(),
            accepting: StateSet::new(),
            transitions: OrderedMap::new(),
        }
    }

    /// Marks the given states as initial.
    pub fn with_initial<I: IntoIterator<Item = StateId>>(mut self, iter: I) -> Self {
        self.initial.extend(iter);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateId>>(mut self, iter: I) -> Self {
        self.accepting.extend(iter);
        self
    }

    /// Adds transitions given as triples `(source, symbol, target)`.
    pub fn with_transitions<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (StateId, Symbol, StateId)>,
    {
        for (q, a, p) in iter {
            self.add_transition(q, a, p);
        }
        self
    }

    /// Adds transitions given as pairs of source and symbol together with a collection of targets.
    pub fn with_transition_sets<I, T>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (StateId, Symbol, T)>,
        T: IntoIterator<Item = StateId>,
    {
        for (q, a, targets) in iter {
            for p in targets {
                self.add_transition(q, a, p);
            }
        }
        self
    }

    /// Adds a single transition from `q` on `symbol` to `target`.
    pub fn add_transition(&mut self, q: StateId, symbol: Symbol, target: StateId) -> &mut Self {
        self.transitions
            .entry((q, symbol))
            .or_default()
            .insert(target);
        self
    }

    /// Validates the collected data and produces the automaton.
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        Automaton::new(
            self.size,
            self.alphabet_size,
            self.initial,
            self.accepting,
            self.transitions,
        )
    }
}
