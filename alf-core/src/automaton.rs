use bit_set::BitSet;
use itertools::Itertools;
use owo_colors::OwoColorize;
use thiserror::Error;

use crate::{
    alphabet::Alphabet,
    id::{id_to_index, index_to_id, StateIndex, Symbol},
    math, Show,
};

mod builder;
pub use builder::AutomatonBuilder;

/// Selects how an [`Automaton`] is interpreted and encoded. The discriminant is the kind tag
/// that SAF stores in its fourth byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AutomatonKind {
    /// Deterministic: precisely one initial state, at most one successor per state and symbol.
    Dfa = 0,
    /// Nondeterministic: any number of initial states and successors.
    Nfa = 1,
}

impl AutomatonKind {
    /// The tag byte identifying this kind in SAF.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Inverse of [`AutomatonKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Dfa),
            1 => Some(Self::Nfa),
            _ => None,
        }
    }
}

/// Raised when a state or symbol outside the dense ranges of an [`Automaton`] is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The state is not below the state count.
    #[error("state {state} does not exist in an automaton with {state_count} states")]
    StateOutOfRange {
        /// The offending state.
        state: StateIndex,
        /// Number of states of the automaton.
        state_count: usize,
    },
    /// The symbol is not below the alphabet size.
    #[error("symbol {symbol} does not exist in an alphabet of size {alphabet_size}")]
    SymbolOutOfRange {
        /// The offending symbol.
        symbol: Symbol,
        /// Size of the alphabet.
        alphabet_size: usize,
    },
    /// More states were requested than identifiers exist.
    #[error("cannot address {0} states with 32-bit identifiers")]
    TooManyStates(usize),
}

/// A finite automaton over a dense [`Alphabet`] with the states `0..state_count`.
///
/// Transitions are stored in hash maps without any ordering guarantees. Everything that exposes
/// the structure to the outside ([`Automaton::successors`], [`Automaton::initial_states`], the
/// SAF encoder...) goes through ascending states and symbols, so two automata that are equal
/// (in the sense of [`PartialEq`]) are indistinguishable from the outside, no matter in which
/// order they were assembled.
#[derive(Clone)]
pub struct Automaton {
    alphabet: Alphabet,
    state_count: usize,
    initial: math::OrderedSet<StateIndex>,
    accepting: BitSet,
    transitions: math::HashMap<StateIndex, math::HashMap<Symbol, math::HashSet<StateIndex>>>,
}

impl Automaton {
    /// Creates an automaton with `state_count` states over `alphabet`, none of which is initial
    /// or accepting and without any transitions.
    pub fn new(alphabet: Alphabet, state_count: usize) -> Result<Self, ModelError> {
        if state_count > 0 && index_to_id(state_count - 1).is_none() {
            return Err(ModelError::TooManyStates(state_count));
        }
        Ok(Self {
            alphabet,
            state_count,
            initial: math::OrderedSet::default(),
            accepting: BitSet::with_capacity(state_count),
            transitions: math::HashMap::default(),
        })
    }

    fn check_state(&self, state: StateIndex) -> Result<(), ModelError> {
        if id_to_index(state) < self.state_count {
            Ok(())
        } else {
            Err(ModelError::StateOutOfRange {
                state,
                state_count: self.state_count,
            })
        }
    }

    fn check_symbol(&self, symbol: Symbol) -> Result<(), ModelError> {
        if self.alphabet.contains(symbol) {
            Ok(())
        } else {
            Err(ModelError::SymbolOutOfRange {
                symbol,
                alphabet_size: self.alphabet.size(),
            })
        }
    }

    /// Marks `state` as initial, returns whether it was not initial before.
    pub fn add_initial(&mut self, state: StateIndex) -> Result<bool, ModelError> {
        self.check_state(state)?;
        Ok(self.initial.insert(state))
    }

    /// Sets whether `state` is accepting.
    pub fn set_accepting(&mut self, state: StateIndex, accepting: bool) -> Result<(), ModelError> {
        self.check_state(state)?;
        if accepting {
            self.accepting.insert(id_to_index(state));
        } else {
            self.accepting.remove(id_to_index(state));
        }
        Ok(())
    }

    /// Adds a transition from `source` on `symbol` to `target`, returns whether the transition
    /// did not exist before.
    pub fn add_transition(
        &mut self,
        source: StateIndex,
        symbol: Symbol,
        target: StateIndex,
    ) -> Result<bool, ModelError> {
        self.check_state(source)?;
        self.check_state(target)?;
        self.check_symbol(symbol)?;
        Ok(self
            .transitions
            .entry(source)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(target))
    }

    /// The alphabet of `self`.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of symbols in the alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet.size()
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Iterates over all states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        (0..self.state_count).map_while(index_to_id)
    }

    /// Iterates over the initial states in ascending order.
    pub fn initial_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.initial.iter().copied()
    }

    /// Number of initial states.
    pub fn initial_count(&self) -> usize {
        self.initial.len()
    }

    /// Returns `true` if `state` is accepting. States outside of the automaton never accept.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(id_to_index(state))
    }

    /// Iterates over the accepting states in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter().map_while(index_to_id)
    }

    /// Number of successors of `source` on `symbol`.
    pub fn successor_count(&self, source: StateIndex, symbol: Symbol) -> usize {
        self.targets(source, symbol).map_or(0, |targets| targets.len())
    }

    fn targets(&self, source: StateIndex, symbol: Symbol) -> Option<&math::HashSet<StateIndex>> {
        self.transitions.get(&source)?.get(&symbol)
    }

    /// The successors of `source` on `symbol`, in ascending order.
    pub fn successors(&self, source: StateIndex, symbol: Symbol) -> Vec<StateIndex> {
        self.targets(source, symbol)
            .map(|targets| targets.iter().copied().sorted().collect())
            .unwrap_or_default()
    }

    /// Total number of transitions, where each pair of source and target counts individually.
    pub fn transition_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(|by_symbol| by_symbol.values())
            .map(|targets| targets.len())
            .sum()
    }

    /// Returns `true` if `self` has precisely one initial state and no state has more than one
    /// successor on any symbol, i.e. if it may be encoded as [`AutomatonKind::Dfa`].
    pub fn is_deterministic(&self) -> bool {
        self.initial.len() == 1
            && self
                .transitions
                .values()
                .flat_map(|by_symbol| by_symbol.values())
                .all(|targets| targets.len() <= 1)
    }

    /// Computes the set of states reached from the initial states by reading `word`.
    pub fn reached_states(&self, word: &[Symbol]) -> math::OrderedSet<StateIndex> {
        word.iter().fold(self.initial.clone(), |current, &symbol| {
            current
                .into_iter()
                .filter_map(|state| self.targets(state, symbol))
                .flatten()
                .copied()
                .collect()
        })
    }

    /// Returns `true` if some run on `word` that starts in an initial state ends in an accepting
    /// state.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        self.reached_states(word)
            .into_iter()
            .any(|state| self.is_accepting(state))
    }
}

impl PartialEq for Automaton {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet
            && self.state_count == other.state_count
            && self.initial == other.initial
            && self.accepting.iter().eq(other.accepting.iter())
            && self.transitions == other.transitions
    }
}

impl Eq for Automaton {}

impl Show for Automaton {
    fn show(&self) -> String {
        let mut b = tabled::builder::Builder::default();
        b.push_record(
            std::iter::once("state".to_string()).chain(self.alphabet.universe().map(|a| a.show())),
        );
        for state in self.states() {
            let mut label = state.show();
            if self.initial.contains(&state) {
                label = format!("→{label}");
            }
            if self.is_accepting(state) {
                label = label.bold().to_string();
            }
            let mut row = vec![label];
            row.extend(self.alphabet.universe().map(|symbol| {
                match self.successors(state, symbol).as_slice() {
                    [] => "-".dimmed().to_string(),
                    [single] => single.show(),
                    many => format!("{{{}}}", many.iter().join(", ")),
                }
            }));
            b.push_record(row);
        }
        b.build().with(tabled::settings::Style::ascii()).to_string()
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}
