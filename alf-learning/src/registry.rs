//! Construction of sessions by name. A [`Registry`] maps algorithm identifiers to factories and
//! is assembled once, before any session is created. Resolving a list of identifiers against it
//! yields an [`AlgorithmTable`] whose slots are later instantiated by index, together with an
//! alphabet size and an integer option vector that is interpreted by the respective algorithm.
use std::{fmt::Debug, sync::Arc};

use alf_core::{math, Alphabet};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::{
    algorithm::LearningAlgorithm,
    family::{DfaFamily, Family, NfaFamily},
    learner::{BoxedLearner, Learner},
};

/// The integer options an algorithm is instantiated with. Missing entries fall back to a default,
/// which allows callers to omit trailing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmOptions(Vec<i32>);

impl AlgorithmOptions {
    /// Wraps the given raw options.
    pub fn new(options: Vec<i32>) -> Self {
        Self(options)
    }

    /// The raw option at `index`, if present.
    pub fn get(&self, index: usize) -> Option<i32> {
        self.0.get(index).copied()
    }

    /// Interprets the option at `index` as a flag, absent options are `false`.
    pub fn flag(&self, index: usize) -> bool {
        self.get(index).is_some_and(|value| value != 0)
    }

    /// The option at `index`, or `default` if absent.
    pub fn int_or(&self, index: usize, default: i32) -> i32 {
        self.get(index).unwrap_or(default)
    }

    /// Number of options that were given.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no options were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[i32]> for AlgorithmOptions {
    fn from(value: &[i32]) -> Self {
        Self(value.to_vec())
    }
}

/// Creates a session for the given alphabet and options.
pub type Factory = Arc<dyn Fn(Alphabet, &AlgorithmOptions) -> BoxedLearner + Send + Sync>;

/// Maps algorithm identifiers to factories.
#[derive(Clone, Default)]
pub struct Registry {
    factories: math::Map<String, Factory>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous registration.
    pub fn with_factory(mut self, name: impl Into<String>, factory: Factory) -> Self {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            debug!("replacing factory for algorithm `{name}`");
        }
        self
    }

    /// Registers an algorithm of family `F` under `name`. `make` builds an algorithm instance
    /// from the alphabet and the options, the surrounding session is created by the registry.
    pub fn with_algorithm<F, L, M>(self, name: impl Into<String>, make: M) -> Self
    where
        F: Family + Send + 'static,
        L: LearningAlgorithm<Answer = F::Answer> + Send + 'static,
        F::Answer: Send,
        M: Fn(Alphabet, &AlgorithmOptions) -> L + Send + Sync + 'static,
    {
        self.with_factory(
            name,
            Arc::new(
                move |alphabet: Alphabet, options: &AlgorithmOptions| -> BoxedLearner {
                    Box::new(Learner::<F, L>::new(alphabet, make(alphabet, options)))
                },
            ),
        )
    }

    /// Registers an algorithm whose conjectures are DFAs.
    pub fn with_dfa_algorithm<L, M>(self, name: impl Into<String>, make: M) -> Self
    where
        L: LearningAlgorithm<Answer = bool> + Send + 'static,
        M: Fn(Alphabet, &AlgorithmOptions) -> L + Send + Sync + 'static,
    {
        self.with_algorithm::<DfaFamily, L, M>(name, make)
    }

    /// Registers an algorithm whose conjectures are NFAs.
    pub fn with_nfa_algorithm<L, M>(self, name: impl Into<String>, make: M) -> Self
    where
        L: LearningAlgorithm<Answer = bool> + Send + 'static,
        M: Fn(Alphabet, &AlgorithmOptions) -> L + Send + Sync + 'static,
    {
        self.with_algorithm::<NfaFamily, L, M>(name, make)
    }

    /// Returns `true` if an algorithm is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Resolves `names` into a table with one slot per name. Unknown names do not fail the
    /// resolution, their slots are unusable and instantiating them yields nothing.
    pub fn resolve<I, S>(&self, names: I) -> AlgorithmTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = names
            .into_iter()
            .enumerate()
            .map(|(slot, name)| {
                let name = name.as_ref();
                let factory = self.factories.get(name).cloned();
                if factory.is_none() {
                    warn!("unknown algorithm `{name}`, slot {slot} is unusable");
                }
                (name.to_string(), factory)
            })
            .collect_vec();
        AlgorithmTable { slots }
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// The result of resolving a list of algorithm identifiers. Each slot either holds a factory or
/// is unusable because its identifier was unknown.
#[derive(Clone, Default)]
pub struct AlgorithmTable {
    slots: Vec<(String, Option<Factory>)>,
}

impl AlgorithmTable {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The identifier that was resolved into `slot`.
    pub fn name(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(|(name, _)| name.as_str())
    }

    /// Returns `true` if `slot` exists and its identifier was known.
    pub fn is_usable(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|(_, factory)| factory.is_some())
    }

    /// Creates a session with the algorithm in `slot` over `alphabet_size` symbols. Gives `None`
    /// if the slot does not exist or is unusable.
    pub fn instantiate(
        &self,
        slot: usize,
        alphabet_size: usize,
        options: &[i32],
    ) -> Option<BoxedLearner> {
        let Some((name, factory)) = self.slots.get(slot) else {
            warn!("no algorithm slot {slot}, the table has {}", self.slots.len());
            return None;
        };
        let Some(factory) = factory else {
            warn!("cannot instantiate unknown algorithm `{name}` in slot {slot}");
            return None;
        };
        debug!("instantiating `{name}` over {alphabet_size} symbols with options {options:?}");
        Some(factory(
            Alphabet::of_size(alphabet_size),
            &AlgorithmOptions::from(options),
        ))
    }
}

impl Debug for AlgorithmTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.slots
                    .iter()
                    .map(|(name, factory)| format!("{name}{}", if factory.is_some() { "" } else { "?" })),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alf_core::AutomatonKind;

    use super::{AlgorithmOptions, Registry};
    use crate::{learner::Phase, testing::Exhaustive};

    fn registry() -> Registry {
        Registry::new()
            .with_dfa_algorithm("EXHAUSTIVE_DFA", |alphabet, _| Exhaustive::over(alphabet))
            .with_nfa_algorithm("EXHAUSTIVE_NFA", |alphabet, options| {
                let algorithm = Exhaustive::over(alphabet);
                if options.flag(0) {
                    algorithm.with_depth(options.int_or(1, 1) as usize)
                } else {
                    algorithm
                }
            })
    }

    #[test]
    fn options_default() {
        let options = AlgorithmOptions::from(&[1, 0, 7][..]);
        assert!(options.flag(0));
        assert!(!options.flag(1));
        assert!(!options.flag(5));
        assert_eq!(options.int_or(2, 3), 7);
        assert_eq!(options.int_or(3, 3), 3);
        assert_eq!(options.len(), 3);
        assert!(AlgorithmOptions::default().is_empty());
    }

    #[test_log::test]
    fn unknown_names_become_unusable_slots() {
        let registry = registry();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["EXHAUSTIVE_DFA", "EXHAUSTIVE_NFA"]
        );
        let table = registry.resolve(["EXHAUSTIVE_NFA", "RPNI", "EXHAUSTIVE_DFA"]);
        assert_eq!(table.len(), 3);
        assert_eq!(format!("{table:?}"), r#"["EXHAUSTIVE_NFA", "RPNI?", "EXHAUSTIVE_DFA"]"#);
        assert!(table.is_usable(0));
        assert!(!table.is_usable(1));
        assert!(!table.is_usable(3));
        assert_eq!(table.name(1), Some("RPNI"));

        assert!(table.instantiate(1, 2, &[]).is_none());
        assert!(table.instantiate(7, 2, &[]).is_none());

        let dfa = table.instantiate(2, 2, &[]).unwrap();
        assert_eq!(dfa.kind(), AutomatonKind::Dfa);
        assert_eq!(dfa.alphabet().size(), 2);
        assert_eq!(dfa.phase(), Phase::Created);
        dfa.dispose();
    }

    #[test]
    fn options_reach_the_algorithm() {
        let table = registry().resolve(["EXHAUSTIVE_NFA"]);
        let mut plain = table.instantiate(0, 2, &[]).unwrap();
        assert_eq!(plain.kind(), AutomatonKind::Nfa);
        assert_eq!(plain.advance(), Ok(None));
        assert_eq!(plain.queries().len(), 1);

        let mut deep = table.instantiate(0, 2, &[1, 2]).unwrap();
        assert_eq!(deep.advance(), Ok(None));
        assert_eq!(deep.queries().len(), 7);
    }

    #[test]
    fn sessions_move_between_threads() {
        let table = registry().resolve(["EXHAUSTIVE_DFA"]);
        let handles: Vec<_> = (1..=3)
            .map(|size| {
                let learner = table.instantiate(0, size, &[]).unwrap();
                std::thread::spawn(move || {
                    let mut learner = learner;
                    assert_eq!(learner.advance(), Ok(None));
                    let batch = learner.queries();
                    let answers = vec![1; batch.len()];
                    learner.process_answers(batch, &answers).unwrap();
                    let bytes = learner.advance().unwrap().map(|bytes| bytes.len());
                    (size, bytes)
                })
            })
            .collect();
        for handle in handles {
            // one state, hence one acceptance word and one undefined transition per symbol
            let (size, bytes) = handle.join().unwrap();
            assert_eq!(bytes, Some((5 + size) * 4));
        }
    }
}
