use tracing::trace;

use crate::{
    alphabet::Alphabet,
    automaton::{Automaton, AutomatonKind},
    id::{index_to_id, StateIndex},
};

use super::{acceptance_words, FormatError, MAGIC, UNDEFINED_TARGET, WORD_BYTES};

/// Reads bytes and big-endian integers from an input slice.
struct Source<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Source<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self.position + len;
        let Some(out) = self.input.get(self.position..end) else {
            return Err(FormatError::UnexpectedEnd(self.input.len()));
        };
        self.position = end;
        Ok(out)
    }

    fn read_i32(&mut self) -> Result<i32, FormatError> {
        let bytes = self.take(WORD_BYTES)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_len(&mut self, what: &'static str) -> Result<usize, FormatError> {
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| FormatError::InvalidValue { what, value })
    }

    fn read_state(&mut self, what: &'static str, state_count: usize) -> Result<StateIndex, FormatError> {
        let value = self.read_i32()?;
        usize::try_from(value)
            .ok()
            .filter(|&q| q < state_count)
            .and_then(index_to_id)
            .ok_or(FormatError::InvalidValue { what, value })
    }
}

/// Decodes an automaton from its SAF encoding, returning the kind stored in the header along with
/// it. The input must contain precisely one encoded automaton.
pub fn decode(input: &[u8]) -> Result<(AutomatonKind, Automaton), FormatError> {
    let mut src = Source { input, position: 0 };
    if src.take(MAGIC.len())? != MAGIC {
        return Err(FormatError::BadMagic);
    }
    let tag = src.take(1)?[0];
    let kind = AutomatonKind::from_tag(tag).ok_or(FormatError::UnknownKind(tag))?;
    let alphabet_size = src.read_len("alphabet size")?;
    let state_count = src.read_len("state count")?;
    // every state occupies at least one acceptance bit and every transition cell one word
    let required = state_count
        .checked_mul(alphabet_size)
        .and_then(|cells| cells.checked_add(acceptance_words(state_count)))
        .and_then(|words| words.checked_mul(WORD_BYTES));
    if required.map_or(true, |bytes| bytes > input.len() - src.position) {
        return Err(FormatError::UnexpectedEnd(input.len()));
    }
    let mut automaton = Automaton::new(Alphabet::of_size(alphabet_size), state_count)?;

    match kind {
        AutomatonKind::Dfa => {
            let initial = src.read_state("initial state", state_count)?;
            automaton.add_initial(initial)?;
        }
        AutomatonKind::Nfa => {
            let count = src.read_len("initial set size")?;
            for _ in 0..count {
                let initial = src.read_state("initial state", state_count)?;
                automaton.add_initial(initial)?;
            }
        }
    }

    let mut state = 0usize;
    for _ in 0..acceptance_words(state_count) {
        let bits = src.read_i32()? as u32;
        for bit in 0..32 {
            if state < state_count && bits & (1 << bit) != 0 {
                if let Some(q) = index_to_id(state) {
                    automaton.set_accepting(q, true)?;
                }
            }
            state += 1;
        }
    }

    for source in automaton.states().collect::<Vec<_>>() {
        for symbol in automaton.alphabet().universe().collect::<Vec<_>>() {
            match kind {
                AutomatonKind::Dfa => {
                    let value = src.read_i32()?;
                    if value == UNDEFINED_TARGET {
                        continue;
                    }
                    let target = usize::try_from(value)
                        .ok()
                        .filter(|&q| q < state_count)
                        .and_then(index_to_id)
                        .ok_or(FormatError::InvalidValue {
                            what: "transition target",
                            value,
                        })?;
                    automaton.add_transition(source, symbol, target)?;
                }
                AutomatonKind::Nfa => {
                    let count = src.read_len("successor count")?;
                    for _ in 0..count {
                        let target = src.read_state("transition target", state_count)?;
                        automaton.add_transition(source, symbol, target)?;
                    }
                }
            }
        }
    }

    let trailing = input.len() - src.position;
    if trailing > 0 {
        return Err(FormatError::TrailingBytes(trailing));
    }
    trace!("decoded {kind:?} with {state_count} states from {} bytes", input.len());
    Ok((kind, automaton))
}
