use tracing::trace;

use crate::{
    alphabet::Alphabet,
    id::{id_to_index, StateIndex, Symbol},
};

use super::{Automaton, ModelError};

/// Helper struct for the construction of automata. It collects initial states, accepting states
/// and transitions, and only checks them against the dense state and symbol ranges once
/// [`AutomatonBuilder::build`] is called. Unless the number of states is fixed explicitly, it is
/// inferred as one more than the largest state that is mentioned anywhere.
///
/// # Example
///
/// We want a DFA with two states over an alphabet of two symbols, where state 0 is initial,
/// state 1 is accepting, reading 0 in state 0 leads to state 1 and reading 1 in state 1 leads
/// back to state 0. All other transitions are undefined.
/// ```
/// use alf_core::prelude::*;
///
/// let dfa = AutomatonBuilder::for_alphabet_size(2)
///     .with_accepting([1])
///     .with_transitions([(0, 0, 1), (1, 1, 0)])
///     .into_dfa(0)
///     .unwrap();
/// assert!(dfa.is_deterministic());
/// assert!(dfa.accepts(&[0, 1, 0]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    alphabet_size: usize,
    state_count: Option<usize>,
    initial: Vec<StateIndex>,
    accepting: Vec<StateIndex>,
    edges: Vec<(StateIndex, Symbol, StateIndex)>,
}

impl AutomatonBuilder {
    /// Creates an empty builder for automata over the symbols `0..alphabet_size`.
    pub fn for_alphabet_size(alphabet_size: usize) -> Self {
        Self {
            alphabet_size,
            ..Default::default()
        }
    }

    /// Fixes the number of states, this allows states that are not mentioned anywhere.
    pub fn with_state_count(mut self, state_count: usize) -> Self {
        self.state_count = Some(state_count);
        self
    }

    /// Marks the given states as initial.
    pub fn with_initial<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.initial.extend(states);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Adds transitions given as triples of source, symbol and target.
    pub fn with_transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (StateIndex, Symbol, StateIndex)>,
    {
        self.edges.extend(transitions);
        self
    }

    fn inferred_state_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|&(p, _, q)| [p, q])
            .chain(self.initial.iter().copied())
            .chain(self.accepting.iter().copied())
            .map(|q| id_to_index(q) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Builds the automaton, failing if a state or symbol lies outside of the dense ranges.
    pub fn build(self) -> Result<Automaton, ModelError> {
        let state_count = self
            .state_count
            .unwrap_or_else(|| self.inferred_state_count());
        let mut automaton = Automaton::new(Alphabet::of_size(self.alphabet_size), state_count)?;
        for q in self.initial {
            automaton.add_initial(q)?;
        }
        for q in self.accepting {
            automaton.set_accepting(q, true)?;
        }
        for (p, a, q) in self.edges {
            automaton.add_transition(p, a, q)?;
        }
        trace!(
            "built automaton with {} states and {} transitions",
            automaton.state_count(),
            automaton.transition_count()
        );
        Ok(automaton)
    }

    /// Adds `initial` as the initial state and builds the automaton.
    pub fn into_dfa(self, initial: StateIndex) -> Result<Automaton, ModelError> {
        self.with_initial([initial]).build()
    }
}
