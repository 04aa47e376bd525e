use fastrand::Rng;
use tracing::trace;

use crate::{
    automaton::{Automaton, Symbol},
    word::Word,
};

/// Draws a random automaton with `size` states over `symbols` symbols. Every possible
/// transition `(q, a, p)` is present independently with probability `density`, every state
/// is accepting with probability one half. State `0` is always initial and every further
/// state is initial with probability `density`, so the result may be nondeterministic in its
/// initial states as well.
pub fn random_automaton(rng: &mut Rng, size: usize, symbols: usize, density: f64) -> Automaton {
    let mut builder = Automaton::builder(size, symbols).with_initial([0]);
    for q in 0..size {
        if q > 0 && rng.f64() < density {
            builder = builder.with_initial([q]);
        }
        if rng.bool() {
            builder = builder.with_accepting([q]);
        }
        for a in 0..symbols {
            for p in 0..size {
                if rng.f64() < density {
                    builder.add_transition(q, a, p);
                }
            }
        }
    }
    let aut = builder
        .build()
        .expect("randomly drawn automaton is in range by construction");
    trace!("drew random automaton\n{aut:?}");
    aut
}

/// Draws a random deterministic automaton with `size` states over `symbols` symbols in
/// which every state has a transition on every symbol. Only state `0` is initial.
pub fn random_dfa(rng: &mut Rng, size: usize, symbols: usize) -> Automaton {
    let mut builder = Automaton::builder(size, symbols).with_initial([0]);
    for q in 0..size {
        if rng.bool() {
            builder = builder.with_accepting([q]);
        }
        for a in 0..symbols {
            builder.add_transition(q, a, rng.usize(..size));
        }
    }
    builder
        .build()
        .expect("randomly drawn automaton is in range by construction")
}

/// Generates a random [`Word`] over the symbols `0..symbols`. The length is drawn uniformly
/// from the range `min_len..=max_len`.
pub fn random_word(rng: &mut Rng, symbols: usize, min_len: usize, max_len: usize) -> Word {
    let length = rng.usize(min_len..=max_len);
    (0..length)
        .map(|_| rng.usize(..symbols) as Symbol)
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_dfa_is_complete() {
        let mut rng = Rng::with_seed(1);
        let dfa = random_dfa(&mut rng, 8, 3);
        assert!(dfa.is_deterministic());
        assert_eq!(dfa.transition_count(), 24);
    }

    #[test]
    fn random_words_respect_bounds() {
        let mut rng = Rng::with_seed(2);
        for _ in 0..100 {
            let word = random_word(&mut rng, 3, 2, 5);
            assert!((2..=5).contains(&word.len()));
            assert!(word.iter().all(|&a| a < 3));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = random_automaton(&mut Rng::with_seed(3), 5, 2, 0.4);
        let second = random_automaton(&mut Rng::with_seed(3), 5, 2, 0.4);
        assert_eq!(first, second);
    }
}
