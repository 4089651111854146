use std::fmt::Debug;

use alf_core::{saf, Automaton, AutomatonKind, FormatError};

/// Describes a family of learning algorithms by the shape of what they exchange with the host:
/// how answers arrive on the boundary and how conjectures leave it.
pub trait Family {
    /// The kind under which conjectures are encoded.
    const KIND: AutomatonKind;

    /// The type of answers to membership queries.
    type Answer: Clone + Eq + Debug;

    /// Turns an answer as received from the host into its typed form.
    fn decode_answer(encoded: i32) -> Self::Answer;

    /// Encodes a conjecture for the host.
    fn encode_conjecture(conjecture: &Automaton) -> Result<Vec<u8>, FormatError> {
        saf::encode(conjecture, Self::KIND)
    }
}

/// Algorithms whose conjectures are deterministic finite automata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DfaFamily;

/// Algorithms whose conjectures are nondeterministic finite automata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NfaFamily;

impl Family for DfaFamily {
    const KIND: AutomatonKind = AutomatonKind::Dfa;
    type Answer = bool;

    fn decode_answer(encoded: i32) -> bool {
        encoded != 0
    }
}

impl Family for NfaFamily {
    const KIND: AutomatonKind = AutomatonKind::Nfa;
    type Answer = bool;

    fn decode_answer(encoded: i32) -> bool {
        encoded != 0
    }
}
