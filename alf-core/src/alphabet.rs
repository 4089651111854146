use crate::id::{index_to_id, Symbol};

/// An alphabet whose symbols are the dense range `0..size`. Named or sparse symbols are not
/// supported, a host that works with richer alphabets maps them to indices before crossing the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Alphabet {
    size: usize,
}

impl Alphabet {
    /// Creates an alphabet consisting of the symbols `0..size`.
    pub fn of_size(size: usize) -> Self {
        Self { size }
    }

    /// The number of symbols.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the alphabet has no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if `symbol` lies in `0..size`.
    pub fn contains(&self, symbol: Symbol) -> bool {
        (symbol as usize) < self.size
    }

    /// Iterates over all symbols in ascending order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.size).map_while(index_to_id)
    }
}

impl From<usize> for Alphabet {
    fn from(size: usize) -> Self {
        Self::of_size(size)
    }
}

#[cfg(test)]
mod tests {
    use super::Alphabet;
    use itertools::Itertools;

    #[test]
    fn dense_universe() {
        let alphabet = Alphabet::of_size(3);
        assert_eq!(alphabet.universe().collect_vec(), vec![0, 1, 2]);
        assert!(alphabet.contains(2));
        assert!(!alphabet.contains(3));
        assert!(Alphabet::of_size(0).is_empty());
        assert_eq!(Alphabet::of_size(0).universe().count(), 0);
    }
}
