use itertools::Itertools;
use thiserror::Error;

use crate::automaton::{Automaton, Symbol};

/// The radix in which characters of an input string are read as symbols. Decimal digits map to
/// their value, letters `a` to `z` (in either case) map to `10` to `35`.
pub const SYMBOL_RADIX: u32 = 36;

/// Abstracts the types of errors that can occur when decoding a string into a [`Word`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum WordParseError {
    /// The character does not denote a symbol.
    #[error("character `{character}` at position {position} does not denote a symbol")]
    InvalidSymbol {
        /// Position of the character, counted in characters.
        position: usize,
        /// The offending character.
        character: char,
    },
    /// The character denotes a symbol that the alphabet of the automaton does not contain.
    #[error("symbol {symbol} at position {position} is not in the alphabet of size {size}")]
    SymbolOutOfRange {
        /// Position of the character, counted in characters.
        position: usize,
        /// The decoded symbol.
        symbol: Symbol,
        /// The size of the alphabet.
        size: usize,
    },
}

/// A finite sequence of symbols, obtained by decoding each character of a string on its own.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Word(Vec<Symbol>);

impl Word {
    /// Decodes `input` one character at a time.
    ///
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// assert_eq!(Word::try_from_str("10b").unwrap().symbols(), &[1, 0, 11]);
    /// assert!(Word::try_from_str("1-0").is_err());
    /// ```
    pub fn try_from_str(input: &str) -> Result<Self, WordParseError> {
        input
            .chars()
            .enumerate()
            .map(|(position, character)| {
                character
                    .to_digit(SYMBOL_RADIX)
                    .map(|digit| digit as Symbol)
                    .ok_or(WordParseError::InvalidSymbol {
                        position,
                        character,
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Word)
    }

    /// Decodes `input` and verifies that every symbol belongs to the alphabet of `aut`.
    pub fn for_automaton(input: &str, aut: &Automaton) -> Result<Self, WordParseError> {
        let word = Self::try_from_str(input)?;
        if let Some((position, &symbol)) = word
            .0
            .iter()
            .find_position(|&&symbol| symbol >= aut.alphabet_size())
        {
            return Err(WordParseError::SymbolOutOfRange {
                position,
                symbol,
                size: aut.alphabet_size(),
            });
        }
        Ok(word)
    }

    /// The symbols of the word.
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// The length of the word.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty word.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Symbol>> for Word {
    fn from(value: Vec<Symbol>) -> Self {
        Self(value)
    }
}

impl std::ops::Deref for Word {
    type Target = [Symbol];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\"",
            self.0
                .iter()
                .map(|&symbol| {
                    char::from_digit(symbol as u32, SYMBOL_RADIX)
                        .map(String::from)
                        .unwrap_or_else(|| format!("<{symbol}>"))
                })
                .join("")
        )
    }
}
