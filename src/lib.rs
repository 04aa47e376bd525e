//! Library for working with finite automata over small integer alphabets.
//!
//! An [`Automaton`] consists of a finite number of states (indexed `0..size`), an alphabet of
//! symbols (indexed `0..alphabet_size`), a nonempty set of initial states, a set of accepting
//! states and a transition relation which maps a pair of state and symbol to a nonempty set of
//! target states. There is no separate type for deterministic automata, instead an automaton is
//! deterministic if every stored target set is a singleton (see [`Automaton::is_deterministic`]).
//!
//! On top of this model the crate provides three algorithms, all of which leave their input
//! untouched and return a fresh value:
//! - [`Automaton::accepts`] decides membership of a word by searching for an accepting run,
//! - [`Automaton::determinize`] performs the subset construction and returns a deterministic
//!   automaton accepting the same language,
//! - [`Automaton::minimize`] merges states through partition refinement.
//!
//! Automata can be read from and written to a flat, line based text encoding, see the
//! [`encoding`] module.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder, AutomatonError, StateId, Symbol},
        determinization::SubsetConstruction,
        encoding::ParseError,
        math::{self, Partition, StateSet},
        simulation::Simulation,
        word::{Word, WordParseError},
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Defines the automaton model and its validation.
pub mod automaton;
pub use automaton::Automaton;

/// Decoding of input strings into sequences of symbols.
pub mod word;

/// Membership checking for words.
pub mod simulation;

/// Conversion of nondeterministic automata into deterministic ones.
pub mod determinization;

/// Contains the partition refinement algorithms used for reducing deterministic automata.
pub mod minimization;

/// Reading and writing the text encoding of automata.
pub mod encoding;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;
