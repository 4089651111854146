/// The integer type backing state and symbol identifiers.
pub type DefaultIdType = u32;

/// Identifies a state of an [`crate::Automaton`]. States of an automaton with `n` states are
/// precisely `0..n`.
pub type StateIndex = DefaultIdType;

/// Identifies a symbol of an [`crate::Alphabet`]. Symbols of an alphabet of size `k` are
/// precisely `0..k`.
pub type Symbol = DefaultIdType;

/// Converts an index of a dense range into an identifier, returning `None` if it does not fit.
pub fn index_to_id(index: usize) -> Option<DefaultIdType> {
    DefaultIdType::try_from(index).ok()
}

/// Converts an identifier back into an index.
pub fn id_to_index(id: DefaultIdType) -> usize {
    id as usize
}
