//! Loading of samples for passive learning. A sample is an ordered sequence of words together
//! with their classification. Samples are applied one at a time and loading stops at the first
//! word whose classification contradicts what the session already knows. Only overall success
//! is reported: the entries before the conflict stay applied and the caller is not told how
//! many there were.
use alf_core::{FlatWords, Show, Word};
use tracing::{debug, warn};

use crate::{
    algorithm::LearningAlgorithm,
    family::Family,
    learner::{AnyLearner, Learner, SessionError},
};

/// Adds the classified words of `samples` to `learner` in order. Returns `false` as soon as one
/// of them conflicts with a known answer, the remaining samples are not looked at.
pub fn add_samples<F, L, I>(learner: &mut Learner<F, L>, samples: I) -> bool
where
    F: Family,
    L: LearningAlgorithm<Answer = F::Answer>,
    I: IntoIterator<Item = (Word, F::Answer)>,
{
    for (word, answer) in samples {
        let shown = word.show();
        if !learner.add_knowledge(word, answer) {
            warn!("sample {shown} contradicts known answer, stopping");
            return false;
        }
    }
    true
}

/// Adds samples as received from the host: `num_samples` words in `samples`, each given as its
/// length followed by its symbols, with the encoded answers in `answers`.
///
/// The input is decoded completely before anything is added, so malformed input leaves the
/// session untouched. Afterwards the semantics are those of [`add_samples`].
pub fn add_encoded_samples<L: AnyLearner + ?Sized>(
    learner: &mut L,
    num_samples: usize,
    samples: &[i32],
    answers: &[i32],
) -> Result<bool, SessionError> {
    let mut cursor = FlatWords::new(samples);
    let words = cursor.read_words(num_samples)?;
    cursor.finish()?;
    if answers.len() != num_samples {
        return Err(SessionError::AnswerCount {
            expected: num_samples,
            actual: answers.len(),
        });
    }
    debug!("loading {num_samples} samples");

    for (word, &answer) in words.into_iter().zip(answers) {
        let shown = word.show();
        if !learner.add_answer(word, answer) {
            warn!("sample {shown} contradicts known answer, stopping");
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use alf_core::{saf, Alphabet, Word};

    use super::{add_encoded_samples, add_samples};
    use crate::{learner::SessionError, testing::Exhaustive, DfaLearner, NfaLearner};

    fn session() -> DfaLearner<Exhaustive> {
        let alphabet = Alphabet::of_size(2);
        DfaLearner::new(alphabet, Exhaustive::over(alphabet))
    }

    #[test_log::test]
    fn halts_at_first_conflict() {
        let mut learner = session();
        let samples = [
            (Word::from([0]), true),
            (Word::from([1]), false),
            (Word::from([0]), false),
            (Word::from([1, 1]), true),
        ];
        assert!(!add_samples(&mut learner, samples));
        assert_eq!(learner.knowledge().len(), 2);
        assert_eq!(learner.knowledge().answer(&[0]), Some(&true));
        assert!(!learner.knowledge().is_answered(&[1, 1]));

        assert!(add_samples(
            &mut learner,
            [(Word::from([1, 1]), true), (Word::from([1]), false)]
        ));
        assert_eq!(learner.knowledge().len(), 3);
    }

    #[test]
    fn flat_samples() {
        let mut learner = session();
        // ε, 0, 1
        let samples = [0, 1, 0, 1, 1];
        assert_eq!(add_encoded_samples(&mut learner, 3, &samples, &[0, 1, 1]), Ok(true));
        assert_eq!(learner.knowledge().answer(&[]), Some(&false));
        assert_eq!(learner.knowledge().answer(&[1]), Some(&true));

        assert_eq!(
            add_encoded_samples(&mut learner, 2, &[1, 1, 1, 0], &[0, 1]),
            Ok(false)
        );
        assert_eq!(learner.knowledge().len(), 3);

        let bytes = learner.advance().unwrap().unwrap();
        let (_, conjecture) = saf::decode(&bytes).unwrap();
        assert!(!conjecture.accepts(&[]));
    }

    #[test]
    fn malformed_input_changes_nothing() {
        let mut learner = session();
        assert!(matches!(
            add_encoded_samples(&mut learner, 2, &[1, 0, 2, 1], &[1, 1]),
            Err(SessionError::Decode(_))
        ));
        assert!(matches!(
            add_encoded_samples(&mut learner, 1, &[1, 0, 9], &[1]),
            Err(SessionError::Decode(_))
        ));
        assert_eq!(
            add_encoded_samples(&mut learner, 1, &[1, 0], &[]),
            Err(SessionError::AnswerCount {
                expected: 1,
                actual: 0
            })
        );
        assert!(learner.knowledge().is_empty());
    }

    #[test]
    fn works_for_nfa_sessions() {
        let alphabet = Alphabet::of_size(1);
        let mut learner = NfaLearner::new(alphabet, Exhaustive::over(alphabet));
        assert!(add_samples(&mut learner, [(Word::epsilon(), true)]));
        assert!(!add_samples(&mut learner, [(Word::epsilon(), false)]));
    }
}
