//! The Simple Automaton Format is a compact binary layout for finite automata. All multi-byte
//! integers are signed 32-bit values in big-endian byte order.
//!
//! ```text
//! bytes[0..3)  'S' 'A' 'F'
//! byte[3]      kind tag, 0 = DFA, 1 = NFA
//! int32        alphabet size
//! int32        number of states
//!   DFA:       int32 initial state
//!   NFA:       int32 size of the initial set, followed by the initial states (ascending)
//! int32 * w    acceptance bitset, bit i % 32 of word i / 32 is set iff state i accepts
//!   DFA:       for every state, for every symbol: int32 target or -1
//!   NFA:       for every state, for every symbol: int32 count, followed by the targets (ascending)
//! ```
//!
//! The number of acceptance words `w` is `ceil(states / 32)`, but at least one. States and
//! symbols are always visited in ascending order, so the encoding only depends on the structure
//! of an automaton and never on the order in which it was assembled.
use thiserror::Error;
use tracing::{debug, trace};

use crate::automaton::{Automaton, AutomatonKind, ModelError};

mod sink;
use sink::SliceSink;

mod writer;

mod reader;
pub use reader::decode;

/// The three magic bytes every encoding starts with.
pub const MAGIC: [u8; 3] = *b"SAF";

/// Width in bytes of a single encoded integer.
pub const WORD_BYTES: usize = 4;

/// Marks an undefined transition in the DFA layout.
pub const UNDEFINED_TARGET: i32 = -1;

/// Errors that are raised when an automaton cannot be represented in SAF, or when a byte buffer
/// is not a valid SAF encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A DFA needs precisely one initial state.
    #[error("a DFA requires precisely one initial state, but {0} are present")]
    InitialStateCount(usize),
    /// A DFA may have at most one successor per state and symbol.
    #[error("state {state} has {count} successors on symbol {symbol}, a DFA allows at most one")]
    Nondeterministic {
        /// The source state.
        state: u32,
        /// The symbol.
        symbol: u32,
        /// Number of successors.
        count: usize,
    },
    /// A size does not fit into a signed 32-bit integer.
    #[error("{what} of {value} exceeds the range of a signed 32-bit integer")]
    Overflow {
        /// Which quantity overflowed.
        what: &'static str,
        /// The offending value.
        value: usize,
    },
    /// The output buffer does not have the size [`compute_size`] determined.
    #[error("output buffer holds {actual} bytes, but the encoding takes {expected}")]
    BufferSize {
        /// The computed size.
        expected: usize,
        /// The length of the buffer.
        actual: usize,
    },
    /// The input does not start with [`MAGIC`].
    #[error("input does not start with the SAF magic bytes")]
    BadMagic,
    /// The kind tag is neither DFA nor NFA.
    #[error("unknown automaton kind tag {0}")]
    UnknownKind(u8),
    /// The input ended prematurely.
    #[error("input ended after {0} bytes")]
    UnexpectedEnd(usize),
    /// The input continued after a complete automaton.
    #[error("encountered {0} trailing bytes after the encoded automaton")]
    TrailingBytes(usize),
    /// A value was read that is not allowed at its position.
    #[error("invalid {what} `{value}`")]
    InvalidValue {
        /// What the value was supposed to be.
        what: &'static str,
        /// The offending value.
        value: i32,
    },
    /// The decoded structure references states or symbols that do not exist.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Number of 32-bit words in the acceptance bitset of an automaton with `state_count` states.
pub fn acceptance_words(state_count: usize) -> usize {
    state_count.div_ceil(32).max(1)
}

/// Computes the exact number of bytes the encoding of `automaton` as `kind` occupies. This only
/// depends on the shape of the automaton, whether it can actually be encoded is decided by
/// [`check`].
pub fn compute_size(automaton: &Automaton, kind: AutomatonKind) -> usize {
    let states = automaton.state_count();
    let cells = states * automaton.alphabet_size();
    // header with tag, alphabet size and state count
    let mut words = 3;
    words += acceptance_words(states);
    words += match kind {
        AutomatonKind::Dfa => 1 + cells,
        AutomatonKind::Nfa => 1 + automaton.initial_count() + cells + automaton.transition_count(),
    };
    words * WORD_BYTES
}

fn int32(what: &'static str, value: usize) -> Result<i32, FormatError> {
    i32::try_from(value).map_err(|_| FormatError::Overflow { what, value })
}

/// Verifies that `automaton` can be encoded as `kind` without writing anything.
pub fn check(automaton: &Automaton, kind: AutomatonKind) -> Result<(), FormatError> {
    int32("alphabet size", automaton.alphabet_size())?;
    int32("state count", automaton.state_count())?;
    if kind == AutomatonKind::Nfa {
        return Ok(());
    }
    if automaton.initial_count() != 1 {
        return Err(FormatError::InitialStateCount(automaton.initial_count()));
    }
    for state in automaton.states() {
        for symbol in automaton.alphabet().universe() {
            let count = automaton.successor_count(state, symbol);
            if count > 1 {
                return Err(FormatError::Nondeterministic {
                    state,
                    symbol,
                    count,
                });
            }
        }
    }
    Ok(())
}

/// Writes the encoding of `automaton` as `kind` into `buf`, whose length must be precisely
/// [`compute_size`]. Nothing is written if the automaton cannot be encoded.
pub fn encode_into(
    automaton: &Automaton,
    kind: AutomatonKind,
    buf: &mut [u8],
) -> Result<(), FormatError> {
    check(automaton, kind)?;
    let expected = compute_size(automaton, kind);
    if buf.len() != expected {
        return Err(FormatError::BufferSize {
            expected,
            actual: buf.len(),
        });
    }

    let mut sink = SliceSink::new(buf);
    match kind {
        AutomatonKind::Dfa => writer::write_dfa(&mut sink, automaton),
        AutomatonKind::Nfa => writer::write_nfa(&mut sink, automaton),
    }
    debug_assert_eq!(sink.written(), expected, "size computation and writer disagree");
    Ok(())
}

/// Encodes `automaton` as `kind` into a freshly allocated buffer of exactly the right size.
pub fn encode(automaton: &Automaton, kind: AutomatonKind) -> Result<Vec<u8>, FormatError> {
    if let Err(err) = check(automaton, kind) {
        debug!("refusing to encode automaton as {kind:?}: {err}");
        return Err(err);
    }
    let size = compute_size(automaton, kind);
    trace!(
        "encoding {kind:?} with {} states over {} symbols into {size} bytes",
        automaton.state_count(),
        automaton.alphabet_size()
    );
    let mut buf = vec![0u8; size];
    encode_into(automaton, kind, &mut buf)?;
    Ok(buf)
}

/// Encodes `automaton` as a DFA.
pub fn encode_dfa(automaton: &Automaton) -> Result<Vec<u8>, FormatError> {
    encode(automaton, AutomatonKind::Dfa)
}

/// Encodes `automaton` as an NFA.
pub fn encode_nfa(automaton: &Automaton) -> Result<Vec<u8>, FormatError> {
    encode(automaton, AutomatonKind::Nfa)
}

// state ids are bounded by a state count that passed `check`
fn state_id(value: u32) -> i32 {
    debug_assert!(i32::try_from(value).is_ok());
    value as i32
}
