use std::fmt::Debug;

use alf_core::{id::Symbol, math, Show, Word};
use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::{debug, trace};

/// Accumulates everything that is known about the target language: a mapping from words to their
/// answers, together with the words a learning algorithm asked about but that have not been
/// answered yet.
///
/// Answers for a word can never change. Adding a different answer for a word that is already
/// known is a consistency conflict, which [`KnowledgeBase::add_knowledge`] reports by returning
/// `false` while leaving everything untouched.
#[derive(Clone)]
pub struct KnowledgeBase<A> {
    answers: math::Map<Word, A>,
    pending: math::Set<Word>,
}

impl<A> Default for KnowledgeBase<A> {
    fn default() -> Self {
        Self {
            answers: math::Map::default(),
            pending: math::Set::default(),
        }
    }
}

impl<A: Clone + Eq + Debug> KnowledgeBase<A> {
    /// Creates an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the answer for `word` if it is known.
    pub fn answer(&self, word: &[Symbol]) -> Option<&A> {
        self.answers.get(word)
    }

    /// Returns `true` if an answer for `word` is known.
    pub fn is_answered(&self, word: &[Symbol]) -> bool {
        self.answers.contains_key(word)
    }

    /// Returns `true` if `word` is waiting for an answer.
    pub fn is_pending(&self, word: &[Symbol]) -> bool {
        self.pending.contains(word)
    }

    /// Returns the answer for `word` if it is known. Otherwise `word` is scheduled as a
    /// membership query and `None` is returned.
    pub fn resolve_or_request(&mut self, word: &[Symbol]) -> Option<A> {
        if let Some(answer) = self.answers.get(word) {
            return Some(answer.clone());
        }
        if self.pending.insert(Word::from(word)) {
            trace!("scheduling membership query for {}", Word::from(word).show());
        }
        None
    }

    /// Schedules `word` as a membership query unless its answer is known already. Returns
    /// whether the word was newly scheduled.
    pub fn request(&mut self, word: Word) -> bool {
        !self.answers.contains_key(word.symbols()) && self.pending.insert(word)
    }

    /// Records that `word` has the given `answer`. If the word is known to have a different
    /// answer, nothing changes and `false` is returned.
    pub fn add_knowledge(&mut self, word: Word, answer: A) -> bool {
        match self.answers.get(word.symbols()) {
            Some(known) if *known != answer => {
                debug!(
                    "conflicting answer {:?} for {}, which is known to be {:?}",
                    answer,
                    word.show(),
                    known
                );
                false
            }
            Some(_) => true,
            None => {
                self.pending.shift_remove(word.symbols());
                self.answers.insert(word, answer);
                true
            }
        }
    }

    /// Iterates over the words that await an answer, in the order they were requested.
    pub fn queries(&self) -> impl Iterator<Item = &Word> + '_ {
        self.pending.iter()
    }

    /// Iterates over all known words and their answers, in the order they became known.
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &A)> + '_ {
        self.answers.iter()
    }

    /// Number of words with a known answer.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Returns `true` if no answer is known.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of words awaiting an answer.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl<A: Debug> Show for KnowledgeBase<A> {
    fn show(&self) -> String {
        let mut b = tabled::builder::Builder::default();
        b.push_record(["word", "answer"]);
        for (word, answer) in &self.answers {
            b.push_record([word.show(), format!("{answer:?}")]);
        }
        for word in &self.pending {
            b.push_record([word.show().dimmed().to_string(), "?".dimmed().to_string()]);
        }
        b.build().with(tabled::settings::Style::ascii()).to_string()
    }
}

impl<A: Debug> Debug for KnowledgeBase<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KnowledgeBase {{ {} }}",
            self.answers
                .iter()
                .map(|(w, a)| format!("{} -> {a:?}", w.show()))
                .chain(self.pending.iter().map(|w| format!("{} -> ?", w.show())))
                .join(", ")
        )
    }
}
