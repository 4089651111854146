//! Finite automata over dense integer alphabets, together with the Simple Automaton Format (SAF),
//! the fixed binary layout in which conjectures are handed to a host process.
//!
//! An [`Automaton`] is deliberately plain: states are the dense range `0..state_count`, symbols
//! are the dense range `0..alphabet_size` and the transition relation maps a pair of state and
//! symbol to a set of successor states. Whether the automaton is viewed as a DFA or an NFA is not
//! part of the value itself but is decided when it is encoded, see [`AutomatonKind`] and the
//! [`saf`] module.
//!
//! Encoding is a two-phase process: [`saf::compute_size`] is a pure function of the shape of the
//! automaton, which allows the caller to allocate the output buffer exactly once before
//! [`saf::encode_into`] fills it.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use alf_core::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::Alphabet,
        automaton::{Automaton, AutomatonBuilder, AutomatonKind, ModelError},
        id::{StateIndex, Symbol},
        math, saf,
        saf::FormatError,
        word::{DecodeError, FlatWords, Word},
        Show,
    };
}

/// Type aliases for the collections used throughout the crate.
pub mod math;

mod show;
pub use show::Show;

/// Identifiers for states and symbols.
pub mod id;

/// Dense alphabets of integer symbols.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Finite words and their flat integer encoding.
pub mod word;
pub use word::{DecodeError, FlatWords, Word};

/// The structural representation of finite automata.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, AutomatonKind};

/// Encoding and decoding of automata in the Simple Automaton Format.
pub mod saf;
pub use saf::FormatError;
