/*!
The lazy DFA proper: its transition cache and search routine.
*/

use std::collections::HashMap;

use crate::{
    nfa::{sim, State, NFA},
    util::{memchr::memchr, primitives::StateID},
};

/// The default bound on live cached states when memory is bounded.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// The identifier of a cached DFA state. Identifiers index the cache's
/// state arena and are invalidated by a wholesale eviction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct LazyStateID(u32);

impl LazyStateID {
    /// A sentinel for a transition that has not been computed yet.
    const UNKNOWN: LazyStateID = LazyStateID(u32::MAX);

    fn new(index: usize) -> LazyStateID {
        assert!(index < u32::MAX as usize, "lazy DFA state overflow");
        LazyStateID(index as u32)
    }

    fn is_unknown(self) -> bool {
        self == LazyStateID::UNKNOWN
    }

    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Configuration for a lazy DFA cache.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    bound_mem: bool,
    cache_capacity: usize,
}

impl Config {
    /// A configuration with memory bounding disabled and the default
    /// capacity.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether to bound the cache. When enabled, reaching the capacity
    /// evicts every cached state before a new one is allocated.
    pub fn bound_mem(mut self, yes: bool) -> Config {
        self.bound_mem = yes;
        self
    }

    /// The maximum number of live cached states under
    /// [`Config::bound_mem`]. Values below 2 are raised to 2, the minimum
    /// needed to hold an in-flight state and its successor between
    /// evictions.
    pub fn cache_capacity(mut self, states: usize) -> Config {
        self.cache_capacity = states.max(2);
        self
    }

    /// Return whether memory bounding is enabled.
    pub fn get_bound_mem(&self) -> bool {
        self.bound_mem
    }

    /// Return the configured capacity.
    pub fn get_cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}

impl Default for Config {
    fn default() -> Config {
        Config { bound_mem: false, cache_capacity: DEFAULT_CACHE_CAPACITY }
    }
}

/// One cached DFA state: a canonical subset of NFA states plus its
/// transition row.
#[derive(Clone, Debug)]
struct DState {
    /// The member NFA states, sorted by ID. Two cached states are the
    /// same state exactly when these lists are equal.
    set: Vec<StateID>,
    /// Whether the member set contains the NFA's match state.
    is_match: bool,
    /// The transition for each input byte, filled lazily.
    trans: Box<[LazyStateID; 256]>,
}

impl DState {
    /// Whether this is the dead state: no members, so no haystack suffix
    /// can lead anywhere from here.
    fn is_dead(&self) -> bool {
        self.set.is_empty()
    }
}

/// The transition cache of a lazy DFA over one NFA.
///
/// All discovered states live here; the NFA itself stays immutable and is
/// passed into each routine alongside the cache. A cache must only be
/// used with the NFA it was created for.
#[derive(Clone, Debug)]
pub struct Cache {
    config: Config,
    /// The state arena, indexed by `LazyStateID`.
    states: Vec<DState>,
    /// Lookup from canonical member set to its arena slot. No two live
    /// states ever share a member set.
    states_to_id: HashMap<Box<[StateID]>, LazyStateID>,
    /// The cached start state, or unknown after creation or an eviction.
    start: LazyStateID,
    /// Evicted states retained so their allocations can be reused.
    free: Vec<DState>,
    /// Scratch for the NFA simulation primitives that compute new states.
    sim: sim::Cache,
    /// How many wholesale evictions have happened.
    clear_count: usize,
}

impl Cache {
    /// Create an empty cache for the given NFA.
    pub fn new(nfa: &NFA, config: Config) -> Cache {
        Cache {
            config,
            states: Vec::new(),
            states_to_id: HashMap::new(),
            start: LazyStateID::UNKNOWN,
            free: Vec::new(),
            sim: sim::Cache::new(nfa),
            clear_count: 0,
        }
    }

    /// The number of live cached states.
    pub fn state_len(&self) -> usize {
        self.states.len()
    }

    /// How many times this cache has been evicted wholesale.
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

/// Whether the pattern matches somewhere in the haystack, with the same
/// anchoring rules and restart loop as the NFA simulation.
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

/// Drive the DFA with the match required to start at `at`.
fn is_match_at(
    nfa: &NFA,
    cache: &mut Cache,
    haystack: &[u8],
    at: usize,
    anchor_tail: bool,
) -> bool {
    let mut sid = start_state(nfa, cache);
    if !anchor_tail && cache.states[sid.as_usize()].is_match {
        return true;
    }
    for &byte in &haystack[at..] {
        sid = next_state(nfa, cache, sid, byte);
        let state = &cache.states[sid.as_usize()];
        if state.is_dead() {
            return false;
        }
        if !anchor_tail && state.is_match {
            return true;
        }
    }
    cache.states[sid.as_usize()].is_match
}

/// The DFA state for the epsilon closure of the NFA start state.
fn start_state(nfa: &NFA, cache: &mut Cache) -> LazyStateID {
    if !cache.start.is_unknown() {
        return cache.start;
    }
    sim::closure(nfa, &mut cache.sim, nfa.start());
    let mut set = cache.sim.current().to_vec();
    set.sort();
    if needs_eviction(cache, &set) {
        clear(cache);
    }
    let sid = intern(nfa, cache, set);
    cache.start = sid;
    sid
}

/// The successor of `current` over `byte`, from the transition row when
/// present and computed (then remembered) otherwise.
///
/// When computing the successor forces an eviction, `current` is
/// re-interned from its member set into the fresh cache so the new
/// transition has a home; the identifier passed in is invalid afterwards
/// and callers must continue from the returned identifier only.
fn next_state(
    nfa: &NFA,
    cache: &mut Cache,
    current: LazyStateID,
    byte: u8,
) -> LazyStateID {
    let next = cache.states[current.as_usize()].trans[usize::from(byte)];
    if !next.is_unknown() {
        return next;
    }

    // Miss: run one step of the NFA simulation from the member set and
    // canonicalize the result.
    cache.sim.load(&cache.states[current.as_usize()].set);
    sim::step(nfa, &mut cache.sim, byte);
    let mut set = cache.sim.current().to_vec();
    set.sort();

    let mut current = current;
    if needs_eviction(cache, &set) {
        let kept = cache.states[current.as_usize()].set.clone();
        clear(cache);
        current = intern(nfa, cache, kept);
    }
    let next = intern(nfa, cache, set);
    cache.states[current.as_usize()].trans[usize::from(byte)] = next;
    next
}

/// Whether adding a state for `set` would overflow a bounded cache.
fn needs_eviction(cache: &Cache, set: &[StateID]) -> bool {
    cache.config.bound_mem
        && cache.states.len() >= cache.config.cache_capacity
        && !cache.states_to_id.contains_key(set)
}

/// Move every live state onto the freelist and forget all transitions,
/// start state included.
fn clear(cache: &mut Cache) {
    cache.clear_count += 1;
    trace!(
        "clearing lazy DFA cache ({} states, clear count {})",
        cache.states.len(),
        cache.clear_count,
    );
    cache.states_to_id.clear();
    cache.start = LazyStateID::UNKNOWN;
    cache.free.extend(cache.states.drain(..));
}

/// The identifier for the DFA state with the given canonical member set,
/// allocating (or reusing an evicted allocation) when it is new.
fn intern(nfa: &NFA, cache: &mut Cache, set: Vec<StateID>) -> LazyStateID {
    if let Some(&sid) = cache.states_to_id.get(set.as_slice()) {
        return sid;
    }
    let sid = LazyStateID::new(cache.states.len());
    let is_match = set
        .iter()
        .any(|&id| matches!(nfa.states()[id.as_usize()], State::Match));
    let state = match cache.free.pop() {
        Some(mut state) => {
            state.trans.fill(LazyStateID::UNKNOWN);
            state.set.clear();
            state.set.extend_from_slice(&set);
            state.is_match = is_match;
            state
        }
        None => DState {
            set: set.clone(),
            is_match,
            trans: Box::new([LazyStateID::UNKNOWN; 256]),
        },
    };
    cache.states.push(state);
    cache.states_to_id.insert(set.into_boxed_slice(), sid);
    sid
}
