/*!
A simulation of the NFA that advances the full set of live states one
haystack byte at a time.

The simulation keeps two state lists: the states live before the current
byte and the states live after it. Epsilon edges are collapsed as states
are added, so a list only ever contains byte matching states and the match
state, and each at most once. Search time is `O(states * haystack)` with
no per-byte allocation.
*/

use core::mem;

use crate::{
    nfa::{State, NFA},
    util::{memchr::memchr, primitives::StateID},
};

/// Mutable scratch space for simulating one NFA.
///
/// Separating the scratch from the automaton keeps the NFA immutable and
/// shareable. A cache must only be used with the NFA it was created for;
/// mixing them up leads to incorrect results or panics, never to memory
/// unsafety.
#[derive(Clone, Debug)]
pub struct Cache {
    /// States live before the byte currently being processed.
    clist: Vec<StateID>,
    /// States live after it. Rebuilt on every step, then swapped in.
    nlist: Vec<StateID>,
    /// For each state, the generation of the list it was last added to.
    /// Comparing against `listid` gives O(1) membership.
    lastlist: Vec<u64>,
    /// The current list generation. Bumped before each list is rebuilt.
    /// 64 bits cannot realistically wrap.
    listid: u64,
}

impl Cache {
    /// Create scratch space sized for the given NFA.
    pub fn new(nfa: &NFA) -> Cache {
        Cache {
            clist: Vec::with_capacity(nfa.len()),
            nlist: Vec::with_capacity(nfa.len()),
            lastlist: vec![0; nfa.len()],
            listid: 0,
        }
    }

    /// The states live after the most recent `closure` or `step`.
    pub(crate) fn current(&self) -> &[StateID] {
        &self.clist
    }

    /// Replace the current list wholesale. The caller is responsible for
    /// handing in a list with no splits and no duplicates, which holds for
    /// any list produced by `closure` or `step`.
    pub(crate) fn load(&mut self, set: &[StateID]) {
        self.clist.clear();
        self.clist.extend_from_slice(set);
    }
}

/// Set the current list to the epsilon closure of `start`.
pub(crate) fn closure(nfa: &NFA, cache: &mut Cache, start: StateID) {
    cache.listid += 1;
    cache.nlist.clear();
    add_state(nfa, cache, start);
    mem::swap(&mut cache.clist, &mut cache.nlist);
}

/// Advance the current list over one haystack byte: every state that
/// matches `byte` contributes the closure of its successor to the new
/// current list.
pub(crate) fn step(nfa: &NFA, cache: &mut Cache, byte: u8) {
    cache.listid += 1;
    cache.nlist.clear();
    // Indexing sidesteps the overlapping borrow an iterator over clist
    // would pin while add_state grows nlist.
    for i in 0..cache.clist.len() {
        let id = cache.clist[i];
        match nfa.states()[id.as_usize()] {
            State::Byte { byte: b, out } if b == byte => {
                add_state(nfa, cache, out)
            }
            State::Any { out } => add_state(nfa, cache, out),
            _ => {}
        }
    }
    mem::swap(&mut cache.clist, &mut cache.nlist);
}

/// Whether the current list contains the match state.
pub(crate) fn is_matched(nfa: &NFA, cache: &Cache) -> bool {
    cache
        .clist
        .iter()
        .any(|&id| matches!(nfa.states()[id.as_usize()], State::Match))
}

fn add_state(nfa: &NFA, cache: &mut Cache, id: StateID) {
    if cache.lastlist[id.as_usize()] == cache.listid {
        return;
    }
    cache.lastlist[id.as_usize()] = cache.listid;
    if let State::Split { out1, out2 } = nfa.states()[id.as_usize()] {
        // Splits are traversed, never listed, so a finished list holds
        // only byte matching states and the match state.
        add_state(nfa, cache, out1);
        add_state(nfa, cache, out2);
        return;
    }
    cache.nlist.push(id);
}

/// Whether the pattern matches somewhere in the haystack.
///
/// `anchor_head` requires the match to begin at offset 0; `anchor_tail`
/// requires it to end at the end of the haystack. Without `anchor_head`,
/// the simulation restarts from each subsequent offset until it finds a
/// match, skipping ahead with [`NFA::prefix_byte`] when possible.
pub fn is_match(
    nfa: &NFA,
    cache: &mut Cache,
    haystack: &[u8],
    anchor_head: bool,
    anchor_tail: bool,
) -> bool {
    let mut at = 0;
    loop {
        if !anchor_head {
            if let Some(byte) = nfa.prefix_byte() {
                match memchr(byte, &haystack[at..]) {
                    None => return false,
                    Some(i) => at += i,
                }
            }
        }
        if is_match_at(nfa, cache, haystack, at, anchor_tail) {
            return true;
        }
        if anchor_head || at >= haystack.len() {
            return false;
        }
        at += 1;
    }
}

/// Run the simulation with the match required to start at `at`.
fn is_match_at(
    nfa: &NFA,
    cache: &mut Cache,
    haystack: &[u8],
    at: usize,
    anchor_tail: bool,
) -> bool {
    closure(nfa, cache, nfa.start());
    if !anchor_tail && is_matched(nfa, cache) {
        return true;
    }
    for &byte in &haystack[at..] {
        if cache.clist.is_empty() {
            return false;
        }
        step(nfa, cache, byte);
        if !anchor_tail && is_matched(nfa, cache) {
            return true;
        }
    }
    is_matched(nfa, cache)
}
