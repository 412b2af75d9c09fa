/*!
A lazy DFA built on top of the NFA simulation.

Instead of stepping a set of NFA states for every haystack byte, the lazy
DFA remembers each set it has seen as a single cached state and fills in
per-byte transitions between those states on first use. Repeated input
quickly hits only cached transitions, giving DFA speed without paying the
exponential worst case of full determinization up front. The cache can be
bounded, in which case it is evicted wholesale when full; correctness is
unaffected because every cached state is a pure function of its member
set.

See [`dfa`] for the implementation and the search routine.
*/

pub mod dfa;
