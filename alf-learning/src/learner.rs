use std::marker::PhantomData;

use alf_core::{prelude::*, word::DecodeError};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    algorithm::LearningAlgorithm,
    family::{DfaFamily, Family, NfaFamily},
    KnowledgeBase, QueryBatch,
};

/// Errors that session operations can raise. Consistency conflicts are not among them, they are
/// reported as `false` by [`Learner::add_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The conjecture could not be encoded.
    #[error("could not encode conjecture: {0}")]
    Format(#[from] FormatError),
    /// Input from the host was malformed.
    #[error("could not decode input: {0}")]
    Decode(#[from] DecodeError),
    /// The number of answers does not match the number of queries.
    #[error("expected {expected} answers, but {actual} were supplied")]
    AnswerCount {
        /// Number of words awaiting an answer.
        expected: usize,
        /// Number of answers supplied.
        actual: usize,
    },
    /// A word uses symbols that are not part of the alphabet.
    #[error("word {word:?} is not over an alphabet of size {alphabet_size}")]
    ForeignSymbol {
        /// The offending word.
        word: Word,
        /// Size of the alphabet of the session.
        alphabet_size: usize,
    },
}

/// The lifecycle of a [`Learner`]. A disposed session does not have a phase, disposing consumes
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing has been asked of the algorithm yet.
    Created,
    /// The algorithm waits for answers or was refuted by a counterexample.
    Querying,
    /// The algorithm produced a conjecture.
    Converged,
}

/// A learning session. It owns the knowledge base and one instance of a learning algorithm of
/// family `F`, and implements the protocol in which the host polls for conjectures, answers
/// batches of membership queries and supplies counterexamples.
///
/// All operations take `&mut self` or `self`, so a session can neither be used concurrently nor
/// after [`Learner::dispose`].
pub struct Learner<F: Family, L: LearningAlgorithm<Answer = F::Answer>> {
    alphabet: Alphabet,
    knowledge: KnowledgeBase<F::Answer>,
    algorithm: L,
    phase: Phase,
    _family: PhantomData<F>,
}

/// A session for an algorithm that conjectures DFAs.
pub type DfaLearner<L> = Learner<DfaFamily, L>;
/// A session for an algorithm that conjectures NFAs.
pub type NfaLearner<L> = Learner<NfaFamily, L>;

impl<F: Family, L: LearningAlgorithm<Answer = F::Answer>> Learner<F, L> {
    /// Starts a session over `alphabet` with the given algorithm instance.
    pub fn new(alphabet: Alphabet, algorithm: L) -> Self {
        debug!(
            "creating {:?} session over {} symbols",
            F::KIND,
            alphabet.size()
        );
        Self {
            alphabet,
            knowledge: KnowledgeBase::new(),
            algorithm,
            phase: Phase::Created,
            _family: PhantomData,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The alphabet the session works with.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// What is known so far.
    pub fn knowledge(&self) -> &KnowledgeBase<F::Answer> {
        &self.knowledge
    }

    /// The underlying algorithm.
    pub fn algorithm(&self) -> &L {
        &self.algorithm
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            trace!("session moves from {:?} to {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Asks the algorithm for a conjecture, handing ownership of it to the caller.
    pub fn next_conjecture(&mut self) -> Option<Automaton> {
        match self.algorithm.advance(&mut self.knowledge) {
            Some(conjecture) => {
                info!(
                    "conjecture with {} states after {} answers",
                    conjecture.state_count(),
                    self.knowledge.len()
                );
                self.set_phase(Phase::Converged);
                Some(conjecture)
            }
            None => {
                debug!(
                    "no conjecture yet, {} queries pending",
                    self.knowledge.pending_len()
                );
                self.set_phase(Phase::Querying);
                None
            }
        }
    }

    /// Asks the algorithm for a conjecture and returns its SAF encoding. `None` means that more
    /// membership queries need to be answered first. The conjecture itself is released once it
    /// is encoded.
    pub fn advance(&mut self) -> Result<Option<Vec<u8>>, SessionError> {
        let Some(conjecture) = self.next_conjecture() else {
            return Ok(None);
        };
        let encoded = F::encode_conjecture(&conjecture).map_err(|err| {
            warn!("conjecture cannot be encoded as {:?}: {err}", F::KIND);
            err
        })?;
        Ok(Some(encoded))
    }

    /// Collects the membership queries the algorithm is waiting for. The batch may be empty.
    pub fn queries(&self) -> QueryBatch {
        let batch: QueryBatch = self.knowledge.queries().cloned().collect();
        trace!("handing out {} queries", batch.len());
        batch
    }

    /// Records `answer` for `word`. Returns `false` without changing anything if a different
    /// answer for `word` is known.
    pub fn add_knowledge(&mut self, word: Word, answer: F::Answer) -> bool {
        self.knowledge.add_knowledge(word, answer)
    }

    /// Records the answer for `word` as received from the host.
    pub fn add_answer(&mut self, word: Word, encoded: i32) -> bool {
        self.add_knowledge(word, F::decode_answer(encoded))
    }

    /// Answers all queries of `batch` with the given answers, which must be in the order of the
    /// words in the batch. The batch is consumed. Conflicting answers are skipped and do not
    /// affect the remaining ones.
    pub fn process_answers(
        &mut self,
        batch: QueryBatch,
        answers: &[i32],
    ) -> Result<(), SessionError> {
        for (word, answer) in batch.answered(answers)? {
            if !self.add_answer(word.clone(), answer) {
                warn!("ignoring conflicting answer for {}", word.show());
            }
        }
        Ok(())
    }

    /// Hands a counterexample to the last conjecture to the algorithm. The knowledge base is not
    /// touched.
    pub fn add_counterexample(&mut self, word: Word) {
        debug!("adding counterexample {}", word.show());
        self.algorithm.add_counterexample(word);
        self.set_phase(Phase::Querying);
    }

    /// Reads a counterexample from the symbols the host sent and hands it to the algorithm.
    pub fn add_encoded_counterexample(&mut self, symbols: &[i32]) -> Result<(), SessionError> {
        let word = Word::from_encoded(symbols)?;
        if !word.is_over(&self.alphabet) {
            return Err(SessionError::ForeignSymbol {
                word,
                alphabet_size: self.alphabet.size(),
            });
        }
        self.add_counterexample(word);
        Ok(())
    }

    /// Ends the session, releasing the knowledge base and the algorithm.
    pub fn dispose(self) {
        debug!(
            "disposing {:?} session with {} answers",
            F::KIND,
            self.knowledge.len()
        );
    }
}

/// A type-erased view on a [`Learner`] that only speaks the primitive boundary protocol, which
/// lets sessions of different families and algorithms live behind the same type.
pub trait AnyLearner {
    /// The kind of conjectures this session produces.
    fn kind(&self) -> AutomatonKind;

    /// The current phase.
    fn phase(&self) -> Phase;

    /// The alphabet the session works with.
    fn alphabet(&self) -> &Alphabet;

    /// See [`Learner::advance`].
    fn advance(&mut self) -> Result<Option<Vec<u8>>, SessionError>;

    /// See [`Learner::queries`].
    fn queries(&self) -> QueryBatch;

    /// See [`Learner::add_answer`].
    fn add_answer(&mut self, word: Word, encoded: i32) -> bool;

    /// See [`Learner::process_answers`].
    fn process_answers(&mut self, batch: QueryBatch, answers: &[i32])
        -> Result<(), SessionError>;

    /// See [`Learner::add_counterexample`].
    fn add_counterexample(&mut self, word: Word);

    /// See [`Learner::add_encoded_counterexample`].
    fn add_encoded_counterexample(&mut self, symbols: &[i32]) -> Result<(), SessionError>;

    /// See [`Learner::dispose`].
    fn dispose(self: Box<Self>);
}

/// An owned, type-erased session that can be moved to another thread.
pub type BoxedLearner = Box<dyn AnyLearner + Send>;

impl<F: Family, L: LearningAlgorithm<Answer = F::Answer>> AnyLearner for Learner<F, L> {
    fn kind(&self) -> AutomatonKind {
        F::KIND
    }

    fn phase(&self) -> Phase {
        Learner::phase(self)
    }

    fn alphabet(&self) -> &Alphabet {
        Learner::alphabet(self)
    }

    fn advance(&mut self) -> Result<Option<Vec<u8>>, SessionError> {
        Learner::advance(self)
    }

    fn queries(&self) -> QueryBatch {
        Learner::queries(self)
    }

    fn add_answer(&mut self, word: Word, encoded: i32) -> bool {
        Learner::add_answer(self, word, encoded)
    }

    fn process_answers(&mut self, batch: QueryBatch, answers: &[i32]) -> Result<(), SessionError> {
        Learner::process_answers(self, batch, answers)
    }

    fn add_counterexample(&mut self, word: Word) {
        Learner::add_counterexample(self, word)
    }

    fn add_encoded_counterexample(&mut self, symbols: &[i32]) -> Result<(), SessionError> {
        Learner::add_encoded_counterexample(self, symbols)
    }

    fn dispose(self: Box<Self>) {
        Learner::dispose(*self)
    }
}

#[cfg(test)]
mod tests {
    use alf_core::{saf, Alphabet, AutomatonKind, Word};
    use itertools::Itertools;

    use super::{AnyLearner, DfaLearner, NfaLearner, Phase, SessionError};
    use crate::testing::Exhaustive;

    fn dfa_session(alphabet_size: usize) -> DfaLearner<Exhaustive> {
        let alphabet = Alphabet::of_size(alphabet_size);
        DfaLearner::new(alphabet, Exhaustive::over(alphabet))
    }

    fn answer_all<L: AnyLearner + ?Sized>(learner: &mut L, target: impl Fn(&Word) -> bool) {
        let batch = learner.queries();
        let answers = batch.words().iter().map(|w| target(w) as i32).collect_vec();
        learner.process_answers(batch, &answers).unwrap();
    }

    #[test_log::test]
    fn batch_round_trip() {
        let mut learner = dfa_session(3);
        let batch = [vec![0u32, 1], vec![1], vec![2, 2, 2]]
            .into_iter()
            .map(Word::from)
            .collect();
        learner.process_answers(batch, &[1, 0, 1]).unwrap();
        assert_eq!(
            learner
                .knowledge()
                .iter()
                .map(|(w, a)| (w.clone(), *a))
                .collect_vec(),
            vec![
                (Word::from([0, 1]), true),
                (Word::from([1]), false),
                (Word::from([2, 2, 2]), true)
            ]
        );
    }

    #[test]
    fn consistency_rejection() {
        let mut learner = dfa_session(1);
        assert!(learner.add_answer(Word::from([0]), 1));
        assert!(!learner.add_answer(Word::from([0]), 0));
        assert_eq!(learner.knowledge().answer(&[0]), Some(&true));

        // conflicts inside a batch are skipped, the remaining answers still count
        let batch = [vec![0u32], vec![0, 0]].into_iter().map(Word::from).collect();
        learner.process_answers(batch, &[0, 1]).unwrap();
        assert_eq!(learner.knowledge().answer(&[0]), Some(&true));
        assert_eq!(learner.knowledge().answer(&[0, 0]), Some(&true));
    }

    #[test]
    fn wrong_answer_count_changes_nothing() {
        let mut learner = dfa_session(2);
        assert_eq!(learner.advance(), Ok(None));
        let batch = learner.queries();
        assert_eq!(batch.len(), 1);
        assert_eq!(
            learner.process_answers(batch, &[]),
            Err(SessionError::AnswerCount {
                expected: 1,
                actual: 0
            })
        );
        assert!(learner.knowledge().is_empty());
        assert_eq!(learner.queries().len(), 1);
    }

    #[test_log::test]
    fn phases() {
        let even_zeros = |w: &Word| w.iter().filter(|&&a| a == 0).count() % 2 == 0;
        let mut learner = dfa_session(2);
        assert_eq!(learner.phase(), Phase::Created);

        assert_eq!(learner.advance(), Ok(None));
        assert_eq!(learner.phase(), Phase::Querying);
        assert_eq!(learner.queries().flatten(), vec![1, 0]);
        answer_all(&mut learner, even_zeros);

        let bytes = learner.advance().unwrap().expect("everything is answered");
        assert_eq!(learner.phase(), Phase::Converged);
        let (kind, conjecture) = saf::decode(&bytes).unwrap();
        assert_eq!(kind, AutomatonKind::Dfa);
        assert_eq!(conjecture.state_count(), 1);
        assert!(conjecture.accepts(&[]));
        assert!(learner.queries().is_empty());

        learner.add_counterexample(Word::from([0, 0]));
        assert_eq!(learner.phase(), Phase::Querying);
        assert!(learner.knowledge().answer(&[0, 0]).is_none());
        assert_eq!(learner.advance(), Ok(None));
        assert_eq!(learner.queries().len(), 6);
        answer_all(&mut learner, even_zeros);

        let (_, conjecture) = saf::decode(&learner.advance().unwrap().unwrap()).unwrap();
        assert_eq!(learner.phase(), Phase::Converged);
        for word in [vec![], vec![0], vec![0, 0], vec![1, 0], vec![0, 1]] {
            assert_eq!(
                conjecture.accepts(&word),
                even_zeros(&Word::from(word.clone())),
                "{word:?}"
            );
        }
        learner.dispose();
    }

    #[test]
    fn nfa_sessions_encode_as_nfa() {
        let alphabet = Alphabet::of_size(1);
        let mut learner: Box<dyn AnyLearner + Send> =
            Box::new(NfaLearner::new(alphabet, Exhaustive::over(alphabet)));
        assert_eq!(learner.kind(), AutomatonKind::Nfa);
        assert_eq!(learner.advance(), Ok(None));
        answer_all(learner.as_mut(), |_| false);
        let bytes = learner.advance().unwrap().unwrap();
        assert_eq!(&bytes[..4], b"SAF\x01");
        assert_eq!(learner.phase(), Phase::Converged);
        learner.dispose();
    }

    #[test]
    fn encoded_counterexamples_are_checked() {
        let mut learner = dfa_session(2);
        assert!(matches!(
            learner.add_encoded_counterexample(&[0, -1]),
            Err(SessionError::Decode(_))
        ));
        assert_eq!(
            learner.add_encoded_counterexample(&[1, 2]),
            Err(SessionError::ForeignSymbol {
                word: Word::from([1, 2]),
                alphabet_size: 2
            })
        );
        assert_eq!(learner.algorithm().depth(), 0);
        learner.add_encoded_counterexample(&[1, 1, 0]).unwrap();
        assert_eq!(learner.algorithm().depth(), 3);
    }
}
