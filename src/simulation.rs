use tracing::trace;

use crate::{
    automaton::{Automaton, StateId, Symbol},
    math::StateSet,
    word::{Word, WordParseError},
};

/// Selects how [`Automaton::accepts_with`] searches for an accepting run. Both strategies
/// decide the same language, they only differ in cost.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum Simulation {
    /// After each symbol, the search continues separately from every state that was reached.
    /// A state that is reached along several branches is explored once per branch, so the
    /// running time can be exponential in the length of the input. Memory for pending branches
    /// is taken from the heap, never from the call stack.
    #[default]
    Branching,
    /// Classic subset simulation which tracks the set of all states reachable after each
    /// prefix. Runs in time linear in the length of the input.
    Frontier,
}

impl Automaton {
    /// Returns true if there is a run on `word` that starts in an initial state and ends in an
    /// accepting state. Uses [`Simulation::Branching`].
    ///
    /// The empty word is accepted if and only if some initial state is accepting. A symbol for
    /// which no transition exists (including symbols outside the alphabet) ends a run without
    /// accepting.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        self.accepts_with(word, Simulation::default())
    }

    /// Like [`Self::accepts`], but uses the given strategy.
    pub fn accepts_with(&self, word: &[Symbol], strategy: Simulation) -> bool {
        let accepted = match strategy {
            Simulation::Branching => self.branch(word),
            Simulation::Frontier => self.frontier_run(word),
        };
        trace!("{strategy:?} simulation on word of length {} gives {accepted}", word.len());
        accepted
    }

    /// Decodes `input` into a [`Word`] and decides whether it is accepted.
    pub fn accepts_str(&self, input: &str) -> Result<bool, WordParseError> {
        Word::try_from_str(input).map(|word| self.accepts(&word))
    }

    /// The set of states reachable from some state in `from` by reading `symbol`.
    pub fn image(&self, from: &StateSet, symbol: Symbol) -> StateSet {
        let mut reached = StateSet::new();
        for q in from {
            if let Some(targets) = self.successors(q, symbol) {
                reached.union_with(targets);
            }
        }
        reached
    }

    /// Depth first search over `(state, position)` pairs. After the first symbol every reached
    /// state is explored as a branch of its own, even if another branch reaches it at the same
    /// position. The pending branches live on the heap, so long words do not grow the call stack.
    fn branch(&self, word: &[Symbol]) -> bool {
        let Some((&first, _)) = word.split_first() else {
            return self.initial_states().intersects(self.accepting_states());
        };
        let mut pending = Vec::new();
        let push_branches =
            |pending: &mut Vec<(StateId, usize)>, targets: &StateSet, position: usize| {
                let start = pending.len();
                pending.extend(targets.iter().map(|p| (p, position)));
                // smallest state on top, so branches are explored in ascending order
                pending[start..].reverse();
            };
        push_branches(&mut pending, &self.image(self.initial_states(), first), 1);

        while let Some((q, position)) = pending.pop() {
            let Some(&symbol) = word.get(position) else {
                if self.is_accepting(q) {
                    return true;
                }
                continue;
            };
            if let Some(targets) = self.successors(q, symbol) {
                push_branches(&mut pending, targets, position + 1);
            }
        }
        false
    }

    fn frontier_run(&self, word: &[Symbol]) -> bool {
        let mut frontier = self.initial_states().clone();
        for &symbol in word {
            frontier = self.image(&frontier, symbol);
            if frontier.is_empty() {
                return false;
            }
        }
        frontier.intersects(self.accepting_states())
    }
}
