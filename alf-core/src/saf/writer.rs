use crate::{
    automaton::{Automaton, AutomatonKind},
    id::id_to_index,
};

use super::{state_id, sink::Sink, MAGIC, UNDEFINED_TARGET};

fn write_header<S: Sink>(sink: &mut S, automaton: &Automaton, kind: AutomatonKind) {
    sink.write_bytes(&MAGIC);
    sink.write_u8(kind.tag());
    sink.write_i32(automaton.alphabet_size() as i32);
    sink.write_i32(automaton.state_count() as i32);
}

fn write_acceptance<S: Sink>(sink: &mut S, automaton: &Automaton) {
    let mut current = 0u32;
    for state in automaton.states() {
        let index = id_to_index(state);
        if index % 32 == 0 && index != 0 {
            sink.write_i32(current as i32);
            current = 0;
        }
        if automaton.is_accepting(state) {
            current |= 1 << (index % 32);
        }
    }
    sink.write_i32(current as i32);
}

fn write_set<S: Sink>(sink: &mut S, states: &[u32]) {
    sink.write_i32(states.len() as i32);
    for &q in states {
        sink.write_i32(state_id(q));
    }
}

pub(super) fn write_dfa<S: Sink>(sink: &mut S, automaton: &Automaton) {
    write_header(sink, automaton, AutomatonKind::Dfa);
    let initial = automaton
        .initial_states()
        .next()
        .map_or(UNDEFINED_TARGET, state_id);
    sink.write_i32(initial);
    write_acceptance(sink, automaton);

    for state in automaton.states() {
        for symbol in automaton.alphabet().universe() {
            let target = automaton
                .successors(state, symbol)
                .first()
                .map_or(UNDEFINED_TARGET, |&q| state_id(q));
            sink.write_i32(target);
        }
    }
}

pub(super) fn write_nfa<S: Sink>(sink: &mut S, automaton: &Automaton) {
    write_header(sink, automaton, AutomatonKind::Nfa);
    let initial: Vec<_> = automaton.initial_states().collect();
    write_set(sink, &initial);
    write_acceptance(sink, automaton);

    for state in automaton.states() {
        for symbol in automaton.alphabet().universe() {
            write_set(sink, &automaton.successors(state, symbol));
        }
    }
}
