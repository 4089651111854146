use std::collections::{BTreeMap, BTreeSet};

pub use indexmap::map;
pub use indexmap::set;

/// Type alias for sets whose iteration order is the natural order of the elements.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for sets that remember the order in which elements were inserted.
pub type Set<S> = indexmap::IndexSet<S>;

/// Type alias for maps whose iteration order is the natural order of the keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;
/// Type alias for maps that remember the order in which keys were inserted.
pub type Map<K, V> = indexmap::IndexMap<K, V>;

/// Unordered hash set, used where iteration order must never leak into observable behaviour.
pub type HashSet<S> = fxhash::FxHashSet<S>;
/// Unordered hash map, used where iteration order must never leak into observable behaviour.
pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
