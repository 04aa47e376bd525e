//! The text encoding of an automaton is line based:
//!
//! ```text
//! <number of states>
//! <number of symbols>
//! <initial states, separated by spaces>
//! <accepting states, separated by spaces, may be empty>
//! <source> <symbol> <target> [<target> ...]
//! ...
//! ```
//!
//! Every line after the fourth describes the transitions from one state on one symbol. Several
//! lines may share the same source and symbol, their targets are collected. Reading fails as
//! soon as a line is malformed or references a state or symbol that does not exist, in which
//! case no automaton is produced.
//!
//! ```
//! use finite_automata::prelude::*;
//!
//! let aut: Automaton = "3\n2\n0\n2\n0 1 1 2\n1 0 2\n".parse().unwrap();
//! assert_eq!(aut.successors(0, 1), Some(&StateSet::from_iter([1, 2])));
//! assert_eq!(aut.to_string().parse::<Automaton>().unwrap(), aut);
//! ```
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, AutomatonBuilder, AutomatonError, StateId, Symbol},
    math::StateSet,
};

/// Abstracts the types of errors that can occur when reading an automaton. Line numbers start
/// at `1`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying reader failed.
    #[error("could not read automaton: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended before one of the four header lines.
    #[error("line {line}: expected {what}, but input ended")]
    MissingLine {
        /// The number of the missing line.
        line: usize,
        /// What the line should have contained.
        what: &'static str,
    },
    /// A token could not be read as a non-negative integer.
    #[error("line {line}: `{token}` is not a non-negative integer")]
    InvalidNumber {
        /// The line the token appears in.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A header line that should contain precisely one number contains a different amount.
    #[error("line {line}: expected a single number, found `{content}`")]
    ExpectedSingleNumber {
        /// The offending line.
        line: usize,
        /// Its content.
        content: String,
    },
    /// A transition line lacks a symbol or targets.
    #[error("line {line}: a transition needs a source, a symbol and at least one target")]
    MissingTargets {
        /// The offending line.
        line: usize,
    },
    /// A line references a state or symbol that does not exist.
    #[error("line {line}: {source}")]
    OutOfRange {
        /// The offending line.
        line: usize,
        /// What exactly is out of range.
        source: AutomatonError,
    },
    /// The automaton as a whole is malformed.
    #[error("invalid automaton: {0}")]
    Invalid(#[from] AutomatonError),
}

fn numbers(line: usize, content: &str) -> Result<Vec<usize>, ParseError> {
    content
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|_| ParseError::InvalidNumber {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

fn single_number(line: usize, content: &str) -> Result<usize, ParseError> {
    match numbers(line, content)?.as_slice() {
        [n] => Ok(*n),
        _ => Err(ParseError::ExpectedSingleNumber {
            line,
            content: content.to_string(),
        }),
    }
}

fn check_states(line: usize, states: &[StateId], size: usize) -> Result<(), ParseError> {
    match states.iter().find(|&&q| q >= size) {
        None => Ok(()),
        Some(&state) => Err(ParseError::OutOfRange {
            line,
            source: AutomatonError::StateOutOfRange { state, size },
        }),
    }
}

fn check_symbol(line: usize, symbol: Symbol, size: usize) -> Result<(), ParseError> {
    if symbol < size {
        Ok(())
    } else {
        Err(ParseError::OutOfRange {
            line,
            source: AutomatonError::SymbolOutOfRange { symbol, size },
        })
    }
}

impl Automaton {
    /// Reads an automaton from the given lines, see the [`encoding`](crate::encoding) module.
    pub fn try_from_lines<I, S>(lines: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parse_lines(lines.into_iter().enumerate().map(|(i, l)| (i + 1, l)))
    }

    fn parse_lines<S: AsRef<str>>(
        mut lines: impl Iterator<Item = (usize, S)>,
    ) -> Result<Self, ParseError> {
        let mut next_header = |line: usize, what: &'static str| match lines.next() {
            Some((_, content)) => Ok(content.as_ref().trim().to_string()),
            None => Err(ParseError::MissingLine { line, what }),
        };

        let size = single_number(1, &next_header(1, "the number of states")?)?;
        let alphabet_size = single_number(2, &next_header(2, "the number of symbols")?)?;
        let initial = numbers(3, &next_header(3, "the initial states")?)?;
        check_states(3, &initial, size)?;
        let accepting = numbers(4, &next_header(4, "the accepting states")?)?;
        check_states(4, &accepting, size)?;
        trace!("read header: {size} states, {alphabet_size} symbols, initial {initial:?}, accepting {accepting:?}");

        let mut builder = AutomatonBuilder::new(size, alphabet_size)
            .with_initial(initial)
            .with_accepting(accepting);
        for (line, content) in lines {
            let content = content.as_ref().trim();
            if content.is_empty() {
                continue;
            }
            let tokens = numbers(line, content)?;
            let [source, symbol, targets @ ..] = tokens.as_slice() else {
                return Err(ParseError::MissingTargets { line });
            };
            if targets.is_empty() {
                return Err(ParseError::MissingTargets { line });
            }
            let (source, symbol) = (*source, *symbol);
            check_states(line, &[source], size)?;
            check_symbol(line, symbol, alphabet_size)?;
            check_states(line, targets, size)?;
            for &target in targets {
                builder.add_transition(source, symbol, target);
            }
        }

        let aut = builder.build()?;
        debug!(
            "read automaton with {} states and {} transitions",
            aut.size(),
            aut.transition_count()
        );
        Ok(aut)
    }

    /// Reads an automaton from `read`.
    pub fn read_from<R: BufRead>(read: R) -> Result<Self, ParseError> {
        let lines: Vec<String> = read.lines().collect::<Result<_, _>>()?;
        Self::try_from_lines(lines)
    }

    /// Reads an automaton from the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        debug!("reading automaton from {}", path.as_ref().display());
        Self::read_from(BufReader::new(File::open(path)?))
    }

    /// Writes the encoding of `self` to `write`.
    pub fn write_to<W: Write>(&self, mut write: W) -> std::io::Result<()> {
        write!(write, "{self}")?;
        write.flush()
    }

    /// Writes the encoding of `self` into the file at `path`, replacing its contents.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        debug!("writing automaton to {}", path.as_ref().display());
        self.write_to(BufWriter::new(File::create(path)?))
    }
}

impl FromStr for Automaton {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_lines(s.lines())
    }
}

fn join(set: &StateSet) -> String {
    set.iter().join(" ")
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.size())?;
        writeln!(f, "{}", self.alphabet_size())?;
        writeln!(f, "{}", join(self.initial_states()))?;
        writeln!(f, "{}", join(self.accepting_states()))?;
        for (q, symbol, targets) in self.transitions() {
            writeln!(f, "{q} {symbol} {}", join(targets))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    const TEN_THOUSAND: &str = "6\n2\n0\n5\n0 1 1\n1 0 2\n2 0 3\n3 0 4\n4 0 5\n";

    #[test_log::test]
    fn reads_ten_thousand() {
        let aut: Automaton = TEN_THOUSAND.parse().unwrap();
        assert_eq!(aut, crate::tests::ten_thousand());
        assert_eq!(aut.to_string(), TEN_THOUSAND);
    }

    #[test_log::test]
    fn round_trip_is_independent_of_line_order() {
        let shuffled = "3\n2\n0 1\n2\n1 1 2\n0 0 1 0\n0 1 0\n";
        let aut: Automaton = shuffled.parse().unwrap();
        let written = aut.to_string();
        assert_eq!(written, "3\n2\n0 1\n2\n0 0 0 1\n0 1 0\n1 1 2\n");
        assert_eq!(written.parse::<Automaton>().unwrap(), aut);
    }

    #[test_log::test]
    fn duplicate_transition_lines_are_unioned() {
        let aut: Automaton = "3\n1\n0\n\n0 0 1\n0 0 2 1\n".parse().unwrap();
        assert_eq!(aut.successors(0, 0), Some(&StateSet::from_iter([1, 2])));
        assert_eq!(aut.transition_count(), 1);
        assert!(aut.accepting_states().is_empty());
    }

    #[test_log::test]
    fn tolerates_whitespace() {
        let aut: Automaton = "  2 \n1\n0  1\n 1\n\n0   0 1\n\n\n".parse().unwrap();
        assert_eq!(aut.initial_states(), &StateSet::from_iter([0, 1]));
        assert_eq!(aut.successor(0, 0), Some(1));
    }

    #[test_log::test]
    fn empty_accepting_line_survives_round_trip() {
        let aut = Automaton::builder(1, 1).with_initial([0]).build().unwrap();
        assert_eq!(aut.to_string(), "1\n1\n0\n\n");
        assert_eq!(aut.to_string().parse::<Automaton>().unwrap(), aut);
    }

    #[test_log::test]
    fn malformed_input() {
        let parse = |s: &str| s.parse::<Automaton>().unwrap_err();
        assert!(matches!(
            parse("2\n1\n0\n"),
            ParseError::MissingLine { line: 4, .. }
        ));
        assert!(matches!(parse(""), ParseError::MissingLine { line: 1, .. }));
        assert!(matches!(
            parse("2\nx\n0\n1\n"),
            ParseError::InvalidNumber { line: 2, .. }
        ));
        assert!(matches!(
            parse("2 3\n1\n0\n1\n"),
            ParseError::ExpectedSingleNumber { line: 1, .. }
        ));
        assert!(matches!(
            parse("2\n1\n0\n1\n0 0\n"),
            ParseError::MissingTargets { line: 5 }
        ));
        assert!(matches!(
            parse("2\n1\n0\n1\n0 0 -1\n"),
            ParseError::InvalidNumber { line: 5, .. }
        ));
        assert!(matches!(
            parse("2\n1\n0\n1\n0 1 1\n"),
            ParseError::OutOfRange {
                line: 5,
                source: AutomatonError::SymbolOutOfRange { symbol: 1, size: 1 }
            }
        ));
        assert!(matches!(
            parse("2\n1\n0\n1\n1 0 0 7\n"),
            ParseError::OutOfRange {
                line: 5,
                source: AutomatonError::StateOutOfRange { state: 7, size: 2 }
            }
        ));
        assert!(matches!(
            parse("2\n1\n3\n1\n"),
            ParseError::OutOfRange { line: 3, .. }
        ));
        assert!(matches!(
            parse("2\n1\n\n1\n"),
            ParseError::Invalid(AutomatonError::NoInitialStates)
        ));
        assert!(matches!(
            parse("0\n1\n\n\n"),
            ParseError::Invalid(AutomatonError::NoStates)
        ));
    }
}
