use alf_core::{word::DecodeError, FlatWords, Show, Word};
use itertools::Itertools;

use crate::learner::SessionError;

/// The membership queries a learner hands out in one go. A batch is created by
/// [`crate::Learner::queries`] and consumed when its answers are processed, so it can be answered
/// at most once. It intentionally is not [`Clone`].
///
/// Towards the host a batch is represented by its flat form, see [`QueryBatch::flatten`].
#[derive(Debug, PartialEq, Eq, Default)]
pub struct QueryBatch {
    words: Vec<Word>,
}

impl QueryBatch {
    /// Creates a batch holding the given words in order.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Number of queries in the batch.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if there is nothing to ask.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words in the batch.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of integers [`QueryBatch::flatten`] produces.
    pub fn flat_len(&self) -> usize {
        1 + self.words.iter().map(Word::encoded_len).sum::<usize>()
    }

    /// Flattens the batch into `[count, len_0, w_0..., len_1, w_1..., ...]`. Answers have to be
    /// given in the order in which the words appear here.
    pub fn flatten(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.flat_len());
        out.push(self.words.len() as i32);
        for word in &self.words {
            word.encode_into(&mut out);
        }
        out
    }

    /// Reads a batch from its flat form.
    pub fn from_flat(flat: &[i32]) -> Result<Self, DecodeError> {
        let mut cursor = FlatWords::new(flat);
        let words = cursor.read_counted()?;
        cursor.finish()?;
        Ok(Self { words })
    }

    /// Consumes the batch and pairs every word with its answer. Fails without producing anything
    /// if the number of answers does not match the number of words.
    pub fn answered<T: Copy>(self, answers: &[T]) -> Result<Vec<(Word, T)>, SessionError> {
        if answers.len() != self.words.len() {
            return Err(SessionError::AnswerCount {
                expected: self.words.len(),
                actual: answers.len(),
            });
        }
        Ok(self.words.into_iter().zip(answers.iter().copied()).collect())
    }

    /// Consumes the batch, returning its words.
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

impl FromIterator<Word> for QueryBatch {
    fn from_iter<T: IntoIterator<Item = Word>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Show for QueryBatch {
    fn show(&self) -> String {
        format!("{{{}}}", self.words.iter().map(|w| w.show()).join(", "))
    }
}
