use std::fmt::Debug;

use alf_core::{Automaton, Word};

use crate::KnowledgeBase;

/// The capability a learning algorithm has to provide so that a [`crate::Learner`] can drive it.
/// How an algorithm arrives at its conjectures is entirely up to the implementation, the session
/// only relies on the following protocol:
///
/// - [`LearningAlgorithm::advance`] is called whenever new answers arrived. The algorithm looks up
///   what it needs in the knowledge base. Words whose answer is unknown are requested through
///   [`KnowledgeBase::resolve_or_request`] (or [`KnowledgeBase::request`]), in which case the
///   algorithm returns `None` and is asked again once the answers are in.
/// - [`LearningAlgorithm::add_counterexample`] hands over a word on which the last conjecture was
///   wrong. It goes straight into the internal state of the algorithm.
pub trait LearningAlgorithm {
    /// The type of answers to membership queries.
    type Answer: Clone + Eq + Debug;

    /// Attempts to produce a conjecture from what `knowledge` contains. Returning `None` is not
    /// an error, it signals that further membership queries have to be answered first.
    fn advance(&mut self, knowledge: &mut KnowledgeBase<Self::Answer>) -> Option<Automaton>;

    /// Refines the internal state of the algorithm with a counterexample to the last conjecture.
    fn add_counterexample(&mut self, word: Word);
}

impl<L: LearningAlgorithm + ?Sized> LearningAlgorithm for Box<L> {
    type Answer = L::Answer;

    fn advance(&mut self, knowledge: &mut KnowledgeBase<Self::Answer>) -> Option<Automaton> {
        (**self).advance(knowledge)
    }

    fn add_counterexample(&mut self, word: Word) {
        (**self).add_counterexample(word)
    }
}
