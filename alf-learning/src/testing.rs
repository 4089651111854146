//! A deliberately naive algorithm for exercising sessions: it asks for every word up to a depth
//! and conjectures the prefix tree of the answers. Counterexamples raise the depth to their
//! length.
use alf_core::{math, prelude::*};
use itertools::Itertools;

use crate::{algorithm::LearningAlgorithm, KnowledgeBase};

#[derive(Debug, Clone)]
pub(crate) struct Exhaustive {
    alphabet: Alphabet,
    depth: usize,
}

impl Exhaustive {
    pub(crate) fn over(alphabet: Alphabet) -> Self {
        Self { alphabet, depth: 0 }
    }

    pub(crate) fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    fn words(&self) -> Vec<Word> {
        let mut words = vec![Word::epsilon()];
        let mut frontier = 0;
        for _ in 0..self.depth {
            let layer = words[frontier..]
                .iter()
                .cartesian_product(self.alphabet.universe().collect_vec())
                .map(|(w, a)| w.concat(&[a]))
                .collect_vec();
            frontier = words.len();
            words.extend(layer);
        }
        words
    }
}

impl LearningAlgorithm for Exhaustive {
    type Answer = bool;

    fn advance(&mut self, knowledge: &mut KnowledgeBase<bool>) -> Option<Automaton> {
        let words = self.words();
        let answers = words
            .iter()
            .map(|w| knowledge.resolve_or_request(w))
            .collect_vec();
        if answers.iter().any(Option::is_none) {
            return None;
        }

        let index: math::Map<&Word, StateIndex> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w, i as StateIndex))
            .collect();
        let mut transitions = vec![];
        for (word, &source) in &index {
            for a in self.alphabet.universe() {
                if let Some(&target) = index.get(&word.concat(&[a])) {
                    transitions.push((source, a, target));
                }
            }
        }
        AutomatonBuilder::for_alphabet_size(self.alphabet.size())
            .with_state_count(words.len())
            .with_accepting(
                answers
                    .iter()
                    .positions(|answer| *answer == Some(true))
                    .map(|i| i as StateIndex),
            )
            .with_transitions(transitions)
            .into_dfa(0)
            .ok()
    }

    fn add_counterexample(&mut self, word: Word) {
        self.depth = self.depth.max(word.len());
    }
}
